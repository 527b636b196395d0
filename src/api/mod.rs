pub mod http;

pub use http::HttpApi;

use async_trait::async_trait;
use serde::Deserialize;

use crate::models::{NewProject, Project, ProjectId};

pub const LIST_PATH: &str = "/api/proyectos/all";
pub const CREATE_PATH: &str = "/api/proyectos/create";
pub const UPDATE_PATH: &str = "/api/proyectos/update";
pub const DELETE_PATH: &str = "/api/proyectos/delete";

/// The two ways a call to the projects API can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No usable response: unreachable host, I/O error, unreadable body.
    #[error("transport failure: {0}")]
    Transport(String),
    /// A response arrived with a non-success status.
    #[error("server responded with status {status}")]
    Application {
        status: u16,
        message: Option<String>,
    },
}

impl ApiError {
    /// Free-text message supplied by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Application { message, .. } => message.as_deref(),
            Self::Transport(_) => None,
        }
    }
}

/// One method per REST operation.
#[async_trait]
pub trait ProjectApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Project>, ApiError>;
    async fn create(&self, project: &NewProject) -> Result<Project, ApiError>;
    async fn update(&self, project: &Project) -> Result<Project, ApiError>;
    async fn delete(&self, id: &ProjectId) -> Result<(), ApiError>;
}

/// `GET /all` answers either `{ "proyectos": [...] }` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListBody {
    Wrapped { proyectos: Vec<Project> },
    Bare(Vec<Project>),
}

impl ListBody {
    pub(crate) fn into_projects(self) -> Vec<Project> {
        match self {
            Self::Wrapped { proyectos } => proyectos,
            Self::Bare(projects) => projects,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectBody {
    pub proyecto: Project,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_body_accepts_both_shapes() {
        let wrapped: ListBody = serde_json::from_value(json!({
            "proyectos": [{ "id": 1, "titulo": "A", "Costo_proyecto": 10 }]
        }))
        .unwrap();
        let bare: ListBody =
            serde_json::from_value(json!([{ "id": 1, "titulo": "A", "Costo_proyecto": 10 }]))
                .unwrap();

        assert_eq!(wrapped.into_projects(), bare.into_projects());
    }

    #[test]
    fn list_body_rejects_unrelated_object() {
        let result = serde_json::from_value::<ListBody>(json!({ "data": [] }));
        assert!(result.is_err());
    }

    #[test]
    fn error_body_message_is_optional() {
        let with: ErrorBody =
            serde_json::from_value(json!({ "message": "titulo requerido" })).unwrap();
        let without: ErrorBody = serde_json::from_value(json!({ "error": "x" })).unwrap();
        assert_eq!(with.message.as_deref(), Some("titulo requerido"));
        assert!(without.message.is_none());
    }

    #[test]
    fn server_message_only_for_application_errors() {
        let app = ApiError::Application {
            status: 400,
            message: Some("bad".into()),
        };
        assert_eq!(app.server_message(), Some("bad"));
        assert_eq!(ApiError::Transport("refused".into()).server_message(), None);
    }
}
