//! In-memory `ProjectApi` used by unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Map;

use crate::api::{ApiError, ProjectApi};
use crate::models::{NewProject, Priority, Project, ProjectId};

pub fn project(id: i64, title: &str, cost: f64) -> Project {
    Project {
        id: ProjectId::Number(id),
        title: title.to_string(),
        description: String::new(),
        completed: false,
        due: String::new(),
        priority: Priority::Medium,
        assignee: String::new(),
        category: String::new(),
        cost,
        paid: false,
        extra: Map::new(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    Create(String),
    Update(ProjectId),
    Delete(ProjectId),
}

/// Behaves like the real server over a `Vec`, unless a failure is armed.
#[derive(Default)]
pub struct FakeApi {
    projects: Mutex<Vec<Project>>,
    next_id: Mutex<i64>,
    failure: Mutex<Option<ApiError>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn with_projects(projects: Vec<Project>) -> Self {
        let next_id = projects
            .iter()
            .filter_map(|p| match p.id {
                ProjectId::Number(n) => Some(n),
                ProjectId::Text(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            projects: Mutex::new(projects),
            next_id: Mutex::new(next_id),
            ..Default::default()
        }
    }

    /// Every following call fails with `err`.
    pub fn fail_with(&self, err: ApiError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProjectApi for FakeApi {
    async fn list(&self) -> Result<Vec<Project>, ApiError> {
        self.record(Call::List)?;
        Ok(self.projects.lock().unwrap().clone())
    }

    async fn create(&self, project: &NewProject) -> Result<Project, ApiError> {
        self.record(Call::Create(project.title.clone()))?;
        let mut next_id = self.next_id.lock().unwrap();
        let created = project.clone().into_project(ProjectId::Number(*next_id));
        *next_id += 1;
        self.projects.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, project: &Project) -> Result<Project, ApiError> {
        self.record(Call::Update(project.id.clone()))?;
        let mut projects = self.projects.lock().unwrap();
        let slot = projects
            .iter_mut()
            .find(|p| p.id == project.id)
            .ok_or_else(|| ApiError::Application {
                status: 404,
                message: Some("Proyecto no encontrado".into()),
            })?;
        *slot = project.clone();
        Ok(project.clone())
    }

    async fn delete(&self, id: &ProjectId) -> Result<(), ApiError> {
        self.record(Call::Delete(id.clone()))?;
        self.projects.lock().unwrap().retain(|p| &p.id != id);
        Ok(())
    }
}
