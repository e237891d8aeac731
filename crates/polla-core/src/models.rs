// Wire models exchanged with the polla backend.
//
// The backend speaks Spanish camelCase JSON (`codEquipo`, `fechaInicio`, ...).
// Field names on the Rust side are English; serde renames bridge the two.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Entity identity
// ---------------------------------------------------------------------------

/// Identity of a backend entity.
///
/// The backend decides between create and update from the id in the payload:
/// `0` means "new", anything positive names an existing row. Keeping the two
/// cases as variants means a save can never carry an ambiguous id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntityId {
    /// Not yet persisted; serialized as `0`.
    #[default]
    New,
    /// Server-assigned id (always > 0).
    Existing(i64),
}

impl EntityId {
    /// Interpret a raw wire id. Zero and negative values mean "new".
    pub fn from_raw(raw: i64) -> Self {
        if raw > 0 {
            EntityId::Existing(raw)
        } else {
            EntityId::New
        }
    }

    /// The value sent on the wire.
    pub fn raw(self) -> i64 {
        match self {
            EntityId::New => 0,
            EntityId::Existing(id) => id,
        }
    }

    pub fn is_new(self) -> bool {
        matches!(self, EntityId::New)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::New => write!(f, "new"),
            EntityId::Existing(id) => write!(f, "#{id}"),
        }
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.raw())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = wire::lenient_i64_opt(deserializer)?;
        Ok(raw.map(EntityId::from_raw).unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Team (equipo)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename = "codEquipo", default)]
    pub id: EntityId,
    #[serde(rename = "nombre", default, deserialize_with = "wire::string_or_empty")]
    pub name: String,
    #[serde(rename = "descripcion", default, deserialize_with = "wire::string_or_empty")]
    pub description: String,
    /// User id of the last editor (`audUsuario`).
    #[serde(
        rename = "audUsuario",
        default,
        deserialize_with = "wire::lenient_i64_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_edited_by: Option<i64>,
    #[serde(
        rename = "audFecha",
        default,
        with = "wire::timestamp_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_edited_at: Option<DateTime<Utc>>,
}

impl Team {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Team {
            id: EntityId::New,
            name: name.into(),
            description: description.into(),
            last_edited_by: None,
            last_edited_at: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tournament (torneo)
// ---------------------------------------------------------------------------

/// Whether a tournament is closed. Travels as `"SI"` / `"NO"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Finalized {
    Yes,
    #[default]
    No,
}

impl Finalized {
    pub fn as_wire(self) -> &'static str {
        match self {
            Finalized::Yes => "SI",
            Finalized::No => "NO",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Finalized::Yes => Finalized::No,
            Finalized::No => Finalized::Yes,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Finalized::Yes => "Finalizado",
            Finalized::No => "En Curso",
        }
    }
}

impl Serialize for Finalized {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for Finalized {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Text(String),
            Null(()),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(true) => Ok(Finalized::Yes),
            Raw::Flag(false) | Raw::Null(()) => Ok(Finalized::No),
            Raw::Text(s) => match s.trim().to_ascii_uppercase().as_str() {
                "SI" | "SÍ" | "S" | "YES" | "Y" | "TRUE" | "1" => Ok(Finalized::Yes),
                "NO" | "N" | "FALSE" | "0" | "" => Ok(Finalized::No),
                other => Err(serde::de::Error::custom(format!(
                    "unknown finalizado value `{other}`"
                ))),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    #[serde(rename = "codTorneo", default)]
    pub id: EntityId,
    #[serde(rename = "nombre", default, deserialize_with = "wire::string_or_empty")]
    pub name: String,
    #[serde(rename = "fechaInicio", default, with = "wire::date_opt")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "fechaFin", default, with = "wire::date_opt")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "montoTotal", default, deserialize_with = "wire::lenient_f64")]
    pub total_amount: f64,
    #[serde(rename = "montoFecha", default, deserialize_with = "wire::lenient_f64")]
    pub per_round_amount: f64,
    #[serde(rename = "montoPolla", default, deserialize_with = "wire::lenient_f64")]
    pub per_pool_amount: f64,
    #[serde(rename = "finalizado", default)]
    pub finalized: Finalized,
    #[serde(
        rename = "audUsuario",
        default,
        deserialize_with = "wire::lenient_i64_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_edited_by: Option<i64>,
}

// ---------------------------------------------------------------------------
// Authentication payloads
// ---------------------------------------------------------------------------

/// Body of `/auth/login`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginCredentials {
    pub usuario: String,
    pub contrasena: String,
}

impl LoginCredentials {
    pub fn new(usuario: impl Into<String>, contrasena: impl Into<String>) -> Self {
        LoginCredentials {
            usuario: usuario.into(),
            contrasena: contrasena.into(),
        }
    }
}

/// Response of `/auth/login`. Every field is optional on the wire; the auth
/// flow decides what a usable response looks like.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub usuario: Option<String>,
    #[serde(rename = "esAdmin", default, deserialize_with = "wire::lenient_flag")]
    pub es_admin: bool,
    #[serde(rename = "codUsuario", default, deserialize_with = "wire::lenient_i64_opt")]
    pub cod_usuario: Option<i64>,
}

/// The backend's uniform response shape `{message, data, status}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
    #[serde(default)]
    pub status: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Date display helpers
// ---------------------------------------------------------------------------

/// Format a date as `dd/MM/yyyy`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Parse a user- or backend-supplied date: `dd/MM/yyyy`, `yyyy-MM-dd`, or an
/// ISO datetime (only the calendar date is kept).
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if s.contains('/') {
        return NaiveDate::parse_from_str(s, "%d/%m/%Y").ok();
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    // Naive datetime such as `2025-06-01T00:00:00` or `2025-06-01 00:00:00`
    s.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

// ---------------------------------------------------------------------------
// Lenient serde helpers
// ---------------------------------------------------------------------------

pub(crate) mod wire {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
        Text(String),
        Flag(bool),
    }

    /// A string, with null read as empty.
    pub fn string_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
    }

    /// Accepts a number, a numeric string, or null.
    pub fn lenient_i64_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        Ok(match Option::<Number>::deserialize(d)? {
            Some(Number::Int(n)) => Some(n),
            Some(Number::Float(f)) => Some(f as i64),
            Some(Number::Text(s)) => s.trim().parse().ok(),
            Some(Number::Flag(_)) | None => None,
        })
    }

    /// Accepts a number or numeric string; anything else reads as `0.0`.
    pub fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(match Option::<Number>::deserialize(d)? {
            Some(Number::Int(n)) => n as f64,
            Some(Number::Float(f)) => f,
            Some(Number::Text(s)) => s.trim().parse().unwrap_or(0.0),
            Some(Number::Flag(_)) | None => 0.0,
        })
    }

    /// Accepts `true`/`false`, `1`/`0`, or `"1"`/`"0"`.
    pub fn lenient_flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match Option::<Number>::deserialize(d)? {
            Some(Number::Flag(b)) => b,
            Some(Number::Int(n)) => n != 0,
            Some(Number::Float(f)) => f != 0.0,
            Some(Number::Text(s)) => matches!(s.trim(), "1" | "true" | "SI" | "S"),
            None => false,
        })
    }

    pub mod date_opt {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
            let raw = Option::<String>::deserialize(d)?;
            Ok(raw.as_deref().and_then(crate::models::parse_date))
        }
    }

    pub mod timestamp_opt {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(ts) => serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let Some(raw) = Option::<String>::deserialize(d)? else {
                return Ok(None);
            };
            let s = raw.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Ok(Some(dt.with_timezone(&Utc)));
            }
            for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
                if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                    return Ok(Some(naive.and_utc()));
                }
            }
            Ok(crate::models::parse_date(s)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc()))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
