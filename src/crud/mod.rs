pub mod container;
pub mod form;
pub mod list;
pub mod notice;

#[cfg(test)]
pub(crate) mod fake;

pub use container::{Container, Outcome};
pub use form::{Draft, Field, FormEditor, Submission};
pub use list::{ListAction, ListView};
pub use notice::Notice;

use crate::models::Project;

/// Whether a record is loaded into the form for editing. At most one is.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditState {
    #[default]
    Idle,
    Editing(Project),
}

impl EditState {
    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }

    pub fn project(&self) -> Option<&Project> {
        match self {
            Self::Editing(project) => Some(project),
            Self::Idle => None,
        }
    }
}
