use chrono::{DateTime, NaiveDateTime};

use super::EditState;
use super::notice::{self, Notice, Operation};
use crate::api::ApiError;
use crate::models::{NewProject, Priority, Project};

/// Format a date-time input emits and the API stores.
pub const DUE_FORMAT: &str = "%Y-%m-%dT%H:%M";

const DUE_ACCEPTED_FORMATS: [&str; 4] = [
    DUE_FORMAT,
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

pub fn parse_due(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    DUE_ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Rewrites a server date-time into `DUE_FORMAT`. Unrecognised values are kept.
pub fn normalize_due(raw: &str) -> String {
    parse_due(raw)
        .map(|dt| dt.format(DUE_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Flag,
    Choice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Description,
    Completed,
    Due,
    Priority,
    Assignee,
    Category,
    Cost,
    Paid,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Self::Title,
        Self::Description,
        Self::Completed,
        Self::Due,
        Self::Priority,
        Self::Assignee,
        Self::Category,
        Self::Cost,
        Self::Paid,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::Completed => "Completed",
            Self::Due => "Due date",
            Self::Priority => "Priority",
            Self::Assignee => "Assigned to",
            Self::Category => "Category",
            Self::Cost => "Cost",
            Self::Paid => "Paid",
        }
    }

    pub fn required(self) -> bool {
        matches!(self, Self::Title | Self::Cost)
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Self::Completed | Self::Paid => FieldKind::Flag,
            Self::Priority => FieldKind::Choice,
            _ => FieldKind::Text,
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("Cost must be a number, got {0:?}")]
    InvalidCost(String),
    #[error("Due date must look like YYYY-MM-DDTHH:MM, got {0:?}")]
    InvalidDue(String),
}

/// A due value exactly as the server sent it, with the text shown for it.
#[derive(Debug, Clone, PartialEq)]
struct StoredDue {
    shown: String,
    raw: String,
}

/// The in-progress copy of a project's fields, as typed. Cost stays text
/// until submit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    title: String,
    description: String,
    completed: bool,
    due: String,
    stored_due: Option<StoredDue>,
    priority: Priority,
    assignee: String,
    category: String,
    cost: String,
    paid: bool,
}

impl Draft {
    pub fn from_project(project: &Project) -> Self {
        let due = normalize_due(&project.due);
        let stored_due = (!project.due.is_empty()).then(|| StoredDue {
            shown: due.clone(),
            raw: project.due.clone(),
        });
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            completed: project.completed,
            due,
            stored_due,
            priority: project.priority,
            assignee: project.assignee.clone(),
            category: project.category.clone(),
            cost: project.cost.to_string(),
            paid: project.paid,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn cost(&self) -> &str {
        &self.cost
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn set_title(&mut self, value: String) {
        self.title = value;
    }

    pub fn set_description(&mut self, value: String) {
        self.description = value;
    }

    pub fn set_completed(&mut self, value: bool) {
        self.completed = value;
    }

    pub fn set_due(&mut self, value: String) {
        self.due = value;
    }

    pub fn set_priority(&mut self, value: Priority) {
        self.priority = value;
    }

    pub fn set_assignee(&mut self, value: String) {
        self.assignee = value;
    }

    pub fn set_category(&mut self, value: String) {
        self.category = value;
    }

    pub fn set_cost(&mut self, value: String) {
        self.cost = value;
    }

    pub fn set_paid(&mut self, value: bool) {
        self.paid = value;
    }

    /// Current text of a text field; `None` for flags and choices.
    pub fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Title => Some(&self.title),
            Field::Description => Some(&self.description),
            Field::Due => Some(&self.due),
            Field::Assignee => Some(&self.assignee),
            Field::Category => Some(&self.category),
            Field::Cost => Some(&self.cost),
            Field::Completed | Field::Priority | Field::Paid => None,
        }
    }

    pub fn set_text(&mut self, field: Field, value: String) {
        match field {
            Field::Title => self.set_title(value),
            Field::Description => self.set_description(value),
            Field::Due => self.set_due(value),
            Field::Assignee => self.set_assignee(value),
            Field::Category => self.set_category(value),
            Field::Cost => self.set_cost(value),
            Field::Completed | Field::Priority | Field::Paid => {}
        }
    }

    pub fn flag(&self, field: Field) -> Option<bool> {
        match field {
            Field::Completed => Some(self.completed),
            Field::Paid => Some(self.paid),
            _ => None,
        }
    }

    pub fn set_flag(&mut self, field: Field, value: bool) {
        match field {
            Field::Completed => self.set_completed(value),
            Field::Paid => self.set_paid(value),
            _ => {}
        }
    }

    /// Applies the required markers and input-level checks, then builds the
    /// payload. No other validation happens client-side.
    pub fn to_new_project(&self) -> Result<NewProject, FormError> {
        if self.title.trim().is_empty() {
            return Err(FormError::Missing(Field::Title.label()));
        }
        if self.cost.trim().is_empty() {
            return Err(FormError::Missing(Field::Cost.label()));
        }
        let cost: f64 = self
            .cost
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|c| c.is_finite())
            .ok_or_else(|| FormError::InvalidCost(self.cost.clone()))?;

        // An untouched server value goes back verbatim; only typed text is checked.
        let due = match &self.stored_due {
            Some(stored) if stored.shown == self.due => stored.raw.clone(),
            _ if self.due.trim().is_empty() => String::new(),
            _ => parse_due(&self.due)
                .map(|dt| dt.format(DUE_FORMAT).to_string())
                .ok_or_else(|| FormError::InvalidDue(self.due.clone()))?,
        };

        Ok(NewProject {
            title: self.title.clone(),
            description: self.description.clone(),
            completed: self.completed,
            due,
            priority: self.priority,
            assignee: self.assignee.clone(),
            category: self.category.clone(),
            cost,
            paid: self.paid,
        })
    }
}

/// What a successful submit asks the caller to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// New record; the form's own create call.
    Create(NewProject),
    /// Edited record merged with the draft; handed to the save path.
    Save(Project),
}

#[derive(Debug, Clone)]
pub struct FormEditor {
    draft: Draft,
    focus: Field,
    notice: Option<Notice>,
}

impl Default for FormEditor {
    fn default() -> Self {
        Self::new()
    }
}

fn is_cost_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')
}

impl FormEditor {
    pub fn new() -> Self {
        Self {
            draft: Draft::default(),
            focus: Field::Title,
            notice: None,
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Back to blank defaults.
    pub fn reset(&mut self) {
        self.draft = Draft::default();
        self.focus = Field::Title;
    }

    /// Mirrors the container's edit state into the draft.
    pub fn sync(&mut self, edit: &EditState) {
        match edit {
            EditState::Editing(project) => {
                self.draft = Draft::from_project(project);
                self.focus = Field::Title;
            }
            EditState::Idle => self.reset(),
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let field = self.focus;
        match field.kind() {
            FieldKind::Text => {
                if field == Field::Cost && !is_cost_char(c) {
                    return;
                }
                let mut value = self.draft.text(field).unwrap_or_default().to_string();
                value.push(c);
                self.draft.set_text(field, value);
            }
            FieldKind::Flag if c == ' ' => self.toggle(),
            FieldKind::Choice if c == ' ' => self.cycle_priority(true),
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        let field = self.focus;
        if let Some(text) = self.draft.text(field) {
            let mut value = text.to_string();
            value.pop();
            self.draft.set_text(field, value);
        }
    }

    /// Flips the focused checkbox.
    pub fn toggle(&mut self) {
        let field = self.focus;
        if let Some(value) = self.draft.flag(field) {
            self.draft.set_flag(field, !value);
        }
    }

    pub fn cycle_priority(&mut self, forward: bool) {
        if self.focus != Field::Priority {
            return;
        }
        let current = self.draft.priority();
        let next = if forward { current.next() } else { current.prev() };
        self.draft.set_priority(next);
    }

    /// Turns the draft into a submission. On a failed check the draft is
    /// kept and the reason becomes the form's notice.
    pub fn submit(&mut self, edit: &EditState) -> Result<Submission, FormError> {
        let fields = match self.draft.to_new_project() {
            Ok(fields) => fields,
            Err(err) => {
                self.notice = Some(Notice::error(err.to_string()));
                return Err(err);
            }
        };

        Ok(match edit {
            EditState::Editing(project) => Submission::Save(project.with_fields(fields)),
            EditState::Idle => Submission::Create(fields),
        })
    }

    /// Completion of the form's create call. Returns the created record for
    /// the container on success. The draft is only reset while idle, so an
    /// edit started in the meantime keeps its pre-filled fields.
    pub fn on_created(
        &mut self,
        result: Result<Project, ApiError>,
        edit: &EditState,
    ) -> Option<Project> {
        match result {
            Ok(project) => {
                self.notice = Some(notice::succeeded(Operation::Create));
                if !edit.is_editing() {
                    self.reset();
                }
                Some(project)
            }
            Err(err) => {
                self.notice = Some(notice::failed(Operation::Create, &err));
                None
            }
        }
    }
}
