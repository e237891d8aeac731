// Modal state: the edit forms and the delete confirmation.
//
// A form modal is a list of fields with one focused. Text fields take typed
// characters; the tournament's `finalizado` field is a toggle. Validation
// happens in the app task; its messages come back keyed by wire field name.

use polla_core::forms::{FormErrors, TeamForm, TournamentForm};
use polla_core::models::Finalized;

use crate::protocol::UserCommand;

/// One rendered form row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    pub label: &'static str,
    pub value: String,
    pub error: Option<String>,
    pub focused: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormModal {
    Team {
        form: TeamForm,
        focus: usize,
        errors: FormErrors,
    },
    Tournament {
        form: TournamentForm,
        focus: usize,
        errors: FormErrors,
    },
}

const TEAM_FIELDS: [(&str, &str); 2] = [("Nombre", "nombre"), ("Descripción", "descripcion")];

const TOURNAMENT_FIELDS: [(&str, &str); 7] = [
    ("Nombre", "nombre"),
    ("Fecha inicio", "fechaInicio"),
    ("Fecha fin", "fechaFin"),
    ("Monto total", "montoTotal"),
    ("Monto por fecha", "montoFecha"),
    ("Monto polla", "montoPolla"),
    ("Finalizado", "finalizado"),
];

/// Index of the toggle in `TOURNAMENT_FIELDS`.
const FINALIZED_FIELD: usize = 6;

impl FormModal {
    pub fn team(form: TeamForm) -> Self {
        FormModal::Team {
            form,
            focus: 0,
            errors: FormErrors::default(),
        }
    }

    pub fn tournament(form: TournamentForm) -> Self {
        FormModal::Tournament {
            form,
            focus: 0,
            errors: FormErrors::default(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            FormModal::Team { form, .. } if form.is_edit() => " Editar equipo ",
            FormModal::Team { .. } => " Nuevo equipo ",
            FormModal::Tournament { form, .. } if form.is_edit() => " Editar torneo ",
            FormModal::Tournament { .. } => " Nuevo torneo ",
        }
    }

    fn field_count(&self) -> usize {
        match self {
            FormModal::Team { .. } => TEAM_FIELDS.len(),
            FormModal::Tournament { .. } => TOURNAMENT_FIELDS.len(),
        }
    }

    pub fn focus(&self) -> usize {
        match self {
            FormModal::Team { focus, .. } | FormModal::Tournament { focus, .. } => *focus,
        }
    }

    fn focus_mut(&mut self) -> &mut usize {
        match self {
            FormModal::Team { focus, .. } | FormModal::Tournament { focus, .. } => focus,
        }
    }

    pub fn focus_next(&mut self) {
        let count = self.field_count();
        let focus = self.focus_mut();
        *focus = (*focus + 1) % count;
    }

    pub fn focus_prev(&mut self) {
        let count = self.field_count();
        let focus = self.focus_mut();
        *focus = (*focus + count - 1) % count;
    }

    /// The focused text buffer, or `None` when the toggle has focus.
    fn focused_text(&mut self) -> Option<&mut String> {
        match self {
            FormModal::Team { form, focus, .. } => match *focus {
                0 => Some(&mut form.name),
                _ => Some(&mut form.description),
            },
            FormModal::Tournament { form, focus, .. } => match *focus {
                0 => Some(&mut form.name),
                1 => Some(&mut form.start_date),
                2 => Some(&mut form.end_date),
                3 => Some(&mut form.total_amount),
                4 => Some(&mut form.per_round_amount),
                5 => Some(&mut form.per_pool_amount),
                _ => None,
            },
        }
    }

    pub fn type_char(&mut self, c: char) {
        if self.on_toggle() {
            if c == ' ' {
                self.toggle();
            }
            return;
        }
        if let Some(text) = self.focused_text() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text() {
            text.pop();
        }
    }

    fn on_toggle(&self) -> bool {
        matches!(self, FormModal::Tournament { focus, .. } if *focus == FINALIZED_FIELD)
    }

    pub fn toggle(&mut self) {
        if let FormModal::Tournament { form, .. } = self {
            form.finalized = form.finalized.toggled();
        }
    }

    pub fn set_errors(&mut self, new_errors: FormErrors) {
        match self {
            FormModal::Team { errors, .. } | FormModal::Tournament { errors, .. } => {
                *errors = new_errors
            }
        }
    }

    pub fn errors(&self) -> &FormErrors {
        match self {
            FormModal::Team { errors, .. } | FormModal::Tournament { errors, .. } => errors,
        }
    }

    pub fn rows(&self) -> Vec<FieldRow> {
        let focus = self.focus();
        let errors = self.errors();
        let row = |i: usize, (label, key): (&'static str, &str), value: String| FieldRow {
            label,
            value,
            error: errors.field(key).map(str::to_string),
            focused: i == focus,
        };

        match self {
            FormModal::Team { form, .. } => {
                let values = [form.name.clone(), form.description.clone()];
                TEAM_FIELDS
                    .into_iter()
                    .zip(values)
                    .enumerate()
                    .map(|(i, (field, value))| row(i, field, value))
                    .collect()
            }
            FormModal::Tournament { form, .. } => {
                let finalized = match form.finalized {
                    Finalized::Yes => "[x] SI",
                    Finalized::No => "[ ] NO",
                };
                let values = [
                    form.name.clone(),
                    form.start_date.clone(),
                    form.end_date.clone(),
                    form.total_amount.clone(),
                    form.per_round_amount.clone(),
                    form.per_pool_amount.clone(),
                    finalized.to_string(),
                ];
                TOURNAMENT_FIELDS
                    .into_iter()
                    .zip(values)
                    .enumerate()
                    .map(|(i, (field, value))| row(i, field, value))
                    .collect()
            }
        }
    }

    pub fn submit(&self) -> UserCommand {
        match self {
            FormModal::Team { form, .. } => UserCommand::SaveTeam(form.clone()),
            FormModal::Tournament { form, .. } => UserCommand::SaveTournament(form.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    Form(FormModal),
    ConfirmDelete { id: i64, name: String },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
