use crate::api::ApiError;

/// Short status line shown to the user. `is_error` drives the styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Create,
    Update,
    Delete,
}

impl Operation {
    fn gerund(self) -> &'static str {
        match self {
            Self::Load => "loading projects",
            Self::Create => "creating the project",
            Self::Update => "updating the project",
            Self::Delete => "deleting the project",
        }
    }

    fn done(self) -> &'static str {
        match self {
            Self::Load => "Projects loaded",
            Self::Create => "Project created",
            Self::Update => "Project updated",
            Self::Delete => "Project deleted",
        }
    }
}

pub fn succeeded(op: Operation) -> Notice {
    Notice::success(op.done())
}

/// All user-facing failure wording lives here. A server-supplied message is
/// shown verbatim; otherwise the two failure kinds get distinct text.
pub fn failed(op: Operation, err: &ApiError) -> Notice {
    if let Some(message) = err.server_message() {
        return Notice::error(format!("Error: {message}"));
    }
    match err {
        ApiError::Transport(_) => {
            Notice::error(format!("Could not reach the API while {}", op.gerund()))
        }
        ApiError::Application { status, .. } => Notice::error(format!(
            "Error {}: unexpected error (HTTP {status})",
            op.gerund()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_shown_verbatim() {
        let err = ApiError::Application {
            status: 422,
            message: Some("El título es obligatorio".into()),
        };
        let notice = failed(Operation::Create, &err);
        assert_eq!(notice.text, "Error: El título es obligatorio");
        assert!(notice.is_error);
    }

    #[test]
    fn generic_text_without_server_message() {
        let err = ApiError::Application {
            status: 500,
            message: None,
        };
        let notice = failed(Operation::Delete, &err);
        assert_eq!(
            notice.text,
            "Error deleting the project: unexpected error (HTTP 500)"
        );
    }

    #[test]
    fn transport_failure_is_distinguished() {
        let notice = failed(Operation::Load, &ApiError::Transport("refused".into()));
        assert_eq!(notice.text, "Could not reach the API while loading projects");
        assert!(notice.is_error);
    }

    #[test]
    fn success_notices() {
        assert_eq!(succeeded(Operation::Update), Notice::success("Project updated"));
        assert!(!succeeded(Operation::Create).is_error);
    }
}
