// Stateful fake of the polla backend shared by the integration suites.
//
// Keeps teams and tournaments in memory, issues a fresh token per login
// (`admin` / `admin123`), answers 401 once the token is revoked, and counts
// hits per endpoint.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[derive(Default)]
struct BackendState {
    token: Option<String>,
    issued: u32,
    next_id: i64,
    teams: Vec<Value>,
    tournaments: Vec<Value>,
    hits: HashMap<String, usize>,
}

pub struct FakeBackend {
    pub base_url: String,
    state: Arc<Mutex<BackendState>>,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(BackendState {
            next_id: 100,
            ..Default::default()
        }));

        let shared = state.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let shared = shared.clone();
                tokio::spawn(async move {
                    let Some((path, auth, body)) = read_request(&mut socket).await else {
                        return;
                    };
                    let (status, reply) = handle(&shared, &path, auth.as_deref(), body);
                    let text = reply.to_string();
                    let response = format!(
                        "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{text}",
                        text.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                });
            }
        });

        FakeBackend {
            base_url: format!("http://{addr}/api/polla"),
            state,
        }
    }

    /// Invalidate the issued token; the next authenticated call gets a 401.
    pub fn revoke(&self) {
        self.state.lock().unwrap().token = None;
    }

    pub fn hits(&self, path: &str) -> usize {
        self.state.lock().unwrap().hits.get(path).copied().unwrap_or(0)
    }

    pub fn team_count(&self) -> usize {
        self.state.lock().unwrap().teams.len()
    }

    pub fn tournament_count(&self) -> usize {
        self.state.lock().unwrap().tournaments.len()
    }
}

fn handle(
    state: &Mutex<BackendState>,
    path: &str,
    auth: Option<&str>,
    body: Value,
) -> (u16, Value) {
    let mut s = state.lock().unwrap();
    let endpoint = path.trim_start_matches("/api/polla").to_string();
    *s.hits.entry(endpoint.clone()).or_default() += 1;

    if endpoint == "/auth/login" {
        return if body["usuario"] == "admin" && body["contrasena"] == "admin123" {
            s.issued += 1;
            let token = format!("token-{}", s.issued);
            s.token = Some(token.clone());
            (
                200,
                json!({"token": token, "usuario": "admin", "esAdmin": 1, "codUsuario": 1}),
            )
        } else {
            (401, json!({"message": "Credenciales inválidas"}))
        };
    }

    let expected = s.token.as_ref().map(|t| format!("Bearer {t}"));
    if expected.is_none() || auth.map(str::to_string) != expected {
        return (401, json!({"message": "Token inválido"}));
    }

    match endpoint.as_str() {
        "/lst-equipos" => (200, json!({"message": "ok", "status": 200, "data": s.teams})),
        "/lst-torneos" => (200, json!({"message": "ok", "status": 200, "data": s.tournaments})),
        "/register" => {
            let mut team = body;
            let id = team["codEquipo"].as_i64().unwrap_or(0);
            if id == 0 {
                let id = s.next_id;
                s.next_id += 1;
                team["codEquipo"] = json!(id);
                s.teams.push(team.clone());
                (201, json!({"success": true, "message": "Equipo creado", "data": team}))
            } else if let Some(existing) = s.teams.iter_mut().find(|t| t["codEquipo"] == json!(id)) {
                *existing = team.clone();
                (200, json!({"success": true, "message": "Equipo actualizado", "data": team}))
            } else {
                (404, json!({"message": "Equipo no encontrado"}))
            }
        }
        "/abm-equipo" => {
            let id = body["codEquipo"].clone();
            let before = s.teams.len();
            s.teams.retain(|t| t["codEquipo"] != id);
            if s.teams.len() < before {
                (200, json!({"message": "Equipo eliminado"}))
            } else {
                (404, json!({"message": "Equipo no encontrado"}))
            }
        }
        "/register-torneo" => {
            let mut t = body;
            let id = t["codTorneo"].as_i64().unwrap_or(0);
            if id == 0 {
                let id = s.next_id;
                s.next_id += 1;
                t["codTorneo"] = json!(id);
                s.tournaments.push(t.clone());
                (201, json!({"message": "Torneo creado", "data": t}))
            } else if let Some(existing) =
                s.tournaments.iter_mut().find(|x| x["codTorneo"] == json!(id))
            {
                *existing = t.clone();
                (200, json!({"message": "Torneo actualizado", "data": t}))
            } else {
                (404, json!({"message": "Torneo no encontrado"}))
            }
        }
        _ => (404, json!({"message": "no existe"})),
    }
}

async fn read_request(
    socket: &mut tokio::net::TcpStream,
) -> Option<(String, Option<String>, Value)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let path = head.split_whitespace().nth(1)?.to_string();
    let header = |name: &str| {
        head.lines()
            .filter_map(|l| l.split_once(':'))
            .find(|(k, _)| k.trim().eq_ignore_ascii_case(name))
            .map(|(_, v)| v.trim().to_string())
    };
    let auth = header("authorization");
    let len: usize = header("content-length").and_then(|v| v.parse().ok()).unwrap_or(0);
    while buf.len() < header_end + len {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = serde_json::from_slice(&buf[header_end..header_end + len]).unwrap_or(Value::Null);
    Some((path, auth, body))
}
