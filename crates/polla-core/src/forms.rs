// Edit forms for teams and tournaments. Inputs are raw strings as typed;
// validation turns them into a wire entity or a set of field errors.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

use crate::models::{format_date, parse_date, EntityId, Finalized, Team, Tournament};

pub const REQUIRED: &str = "Campo obligatorio";
pub const TEAM_SUMMARY: &str = "Todos los campos son obligatorios";
pub const MISSING_USER: &str = "No se pudo identificar al usuario. Inicia sesión nuevamente.";
pub const DATE_RANGE: &str = "La fecha de fin debe ser posterior a la de inicio";

// ---------------------------------------------------------------------------
// FormErrors
// ---------------------------------------------------------------------------

/// Field-keyed validation messages plus an optional form-level summary shown
/// as a toast.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, String>,
    summary: Option<String>,
}

impl FormErrors {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.summary.is_none()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.summary, self.fields.values().next()) {
            (Some(summary), _) => f.write_str(summary),
            (None, Some(first)) => f.write_str(first),
            (None, None) => f.write_str("formulario válido"),
        }
    }
}

impl std::error::Error for FormErrors {}

// ---------------------------------------------------------------------------
// Team form
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamForm {
    pub id: EntityId,
    pub name: String,
    pub description: String,
}

impl TeamForm {
    pub fn for_team(team: &Team) -> Self {
        Self {
            id: team.id,
            name: team.name.clone(),
            description: team.description.clone(),
        }
    }

    pub fn is_edit(&self) -> bool {
        !self.id.is_new()
    }

    /// Both fields are required. The editing user's id is stamped into
    /// `audUsuario`; without one the submission is rejected.
    pub fn validate(&self, user_id: Option<i64>) -> Result<Team, FormErrors> {
        let mut errors = FormErrors::default();
        let name = self.name.trim();
        let description = self.description.trim();

        if name.is_empty() {
            errors.add("nombre", REQUIRED);
        }
        if description.is_empty() {
            errors.add("descripcion", REQUIRED);
        }
        if !errors.fields.is_empty() {
            errors.summary = Some(TEAM_SUMMARY.to_string());
        } else if user_id.is_none() {
            errors.summary = Some(MISSING_USER.to_string());
        }

        errors.into_result(|| Team {
            id: self.id,
            name: name.to_string(),
            description: description.to_string(),
            last_edited_by: user_id,
            last_edited_at: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Tournament form
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TournamentForm {
    pub id: EntityId,
    pub name: String,
    /// `dd/MM/yyyy` or ISO.
    pub start_date: String,
    pub end_date: String,
    pub total_amount: String,
    pub per_round_amount: String,
    pub per_pool_amount: String,
    pub finalized: Finalized,
}

impl TournamentForm {
    /// Blank form: both dates set to `today`, amounts zero, not finalized.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            id: EntityId::New,
            name: String::new(),
            start_date: format_date(today),
            end_date: format_date(today),
            total_amount: "0".into(),
            per_round_amount: "0".into(),
            per_pool_amount: "0".into(),
            finalized: Finalized::No,
        }
    }

    /// Pre-populated form. Missing dates fall back to `today`.
    pub fn for_tournament(t: &Tournament, today: NaiveDate) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            start_date: format_date(t.start_date.unwrap_or(today)),
            end_date: format_date(t.end_date.unwrap_or(today)),
            total_amount: format_amount(t.total_amount),
            per_round_amount: format_amount(t.per_round_amount),
            per_pool_amount: format_amount(t.per_pool_amount),
            finalized: t.finalized,
        }
    }

    pub fn is_edit(&self) -> bool {
        !self.id.is_new()
    }

    pub fn validate(&self, user_id: Option<i64>) -> Result<Tournament, FormErrors> {
        let mut errors = FormErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.add("nombre", "El nombre del torneo es requerido");
        }

        let start = parse_required_date(
            &self.start_date,
            "fechaInicio",
            "La fecha de inicio es requerida",
            &mut errors,
        );
        let end = parse_required_date(
            &self.end_date,
            "fechaFin",
            "La fecha de fin es requerida",
            &mut errors,
        );
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                errors.add("fechaFin", DATE_RANGE);
            }
        }

        let total = parse_amount(&self.total_amount, "montoTotal", &mut errors);
        let per_round = parse_amount(&self.per_round_amount, "montoFecha", &mut errors);
        let per_pool = parse_amount(&self.per_pool_amount, "montoPolla", &mut errors);

        if errors.fields.is_empty() && user_id.is_none() {
            errors.summary = Some(MISSING_USER.to_string());
        }

        errors.into_result(|| Tournament {
            id: self.id,
            name: name.to_string(),
            start_date: start,
            end_date: end,
            total_amount: total.unwrap_or_default(),
            per_round_amount: per_round.unwrap_or_default(),
            per_pool_amount: per_pool.unwrap_or_default(),
            finalized: self.finalized,
            last_edited_by: user_id,
        })
    }
}

fn parse_required_date(
    raw: &str,
    field: &'static str,
    required: &str,
    errors: &mut FormErrors,
) -> Option<NaiveDate> {
    if raw.trim().is_empty() {
        errors.add(field, required);
        return None;
    }
    let parsed = parse_date(raw);
    if parsed.is_none() {
        errors.add(field, "Fecha inválida (dd/mm/aaaa)");
    }
    parsed
}

fn parse_amount(raw: &str, field: &'static str, errors: &mut FormErrors) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, "Este campo es requerido");
        return None;
    }
    match raw.replace(',', ".").parse::<f64>() {
        Ok(v) if !v.is_finite() => {
            errors.add(field, "Debe ser un número válido");
            None
        }
        Ok(v) if v < 0.0 => {
            errors.add(field, "Debe ser mayor o igual a 0");
            None
        }
        Ok(v) => Some(v),
        Err(_) => {
            errors.add(field, "Debe ser un número válido");
            None
        }
    }
}

fn format_amount(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        v.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
