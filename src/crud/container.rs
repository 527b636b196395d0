use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::EditState;
use super::form::{FormEditor, Submission};
use super::notice::{self, Notice, Operation};
use crate::api::{ApiError, ProjectApi};
use crate::models::{NewProject, Project, ProjectId};

/// A finished network call, delivered back to the UI loop.
#[derive(Debug)]
pub enum Outcome {
    Loaded(Result<Vec<Project>, ApiError>),
    Created(Result<Project, ApiError>),
    Updated {
        id: ProjectId,
        result: Result<Project, ApiError>,
    },
    Deleted {
        id: ProjectId,
        result: Result<(), ApiError>,
    },
}

/// Owns the project cache, the edit state and the form. Requests run on
/// spawned tasks; their outcomes are applied one at a time by `apply`.
/// Nothing is deduplicated or cancelled, so the last completion wins.
pub struct Container {
    api: Arc<dyn ProjectApi>,
    tx: UnboundedSender<Outcome>,
    rx: UnboundedReceiver<Outcome>,
    projects: Vec<Project>,
    edit: EditState,
    notice: Option<Notice>,
    form: FormEditor,
}

impl Container {
    pub fn new(api: Arc<dyn ProjectApi>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            tx,
            rx,
            projects: Vec::new(),
            edit: EditState::Idle,
            notice: None,
            form: FormEditor::new(),
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Status messages that do not come from a request (settings writes).
    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn form(&self) -> &FormEditor {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormEditor {
        &mut self.form
    }

    fn spawn<F, Fut>(&self, call: F)
    where
        F: FnOnce(Arc<dyn ProjectApi>) -> Fut,
        Fut: Future<Output = Outcome> + Send + 'static,
    {
        let tx = self.tx.clone();
        let request = call(Arc::clone(&self.api));
        tokio::spawn(async move {
            // The receiver lives in `self`; a failed send means the UI is gone.
            let _ = tx.send(request.await);
        });
    }

    /// Fetches the full list. Replaces the cache on success.
    pub fn load(&self) {
        tracing::debug!("fetching all projects");
        self.spawn(|api| async move { Outcome::Loaded(api.list().await) });
    }

    pub fn delete(&self, id: ProjectId) {
        tracing::debug!(%id, "deleting project");
        self.spawn(move |api| async move {
            let result = api.delete(&id).await;
            Outcome::Deleted { id, result }
        });
    }

    /// Sends the merged record to the server. Edit mode ends when the
    /// outcome arrives, whether or not it succeeded.
    pub fn save_edit(&self, project: Project) {
        tracing::debug!(id = %project.id, "updating project");
        self.spawn(move |api| async move {
            let result = api.update(&project).await;
            Outcome::Updated {
                id: project.id,
                result,
            }
        });
    }

    fn create(&self, fields: NewProject) {
        tracing::debug!(title = %fields.title, "creating project");
        self.spawn(move |api| async move { Outcome::Created(api.create(&fields).await) });
    }

    pub fn start_edit(&mut self, project: Project) {
        self.edit = EditState::Editing(project);
        self.form.sync(&self.edit);
    }

    /// Leaves edit mode without touching the network.
    pub fn cancel_edit(&mut self) {
        self.edit = EditState::Idle;
        self.form.sync(&self.edit);
    }

    /// Submits the form: a create call when idle, the save path when
    /// editing. Returns `false` when the draft failed its checks.
    pub fn submit_form(&mut self) -> bool {
        match self.form.submit(&self.edit) {
            Ok(Submission::Create(fields)) => {
                self.create(fields);
                true
            }
            Ok(Submission::Save(project)) => {
                self.save_edit(project);
                true
            }
            Err(err) => {
                tracing::debug!(error = %err, "form submission blocked");
                false
            }
        }
    }

    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Loaded(Ok(projects)) => {
                tracing::info!(count = projects.len(), "projects loaded");
                self.projects = projects;
                self.notice = Some(notice::succeeded(Operation::Load));
            }
            Outcome::Loaded(Err(err)) => {
                tracing::warn!(error = %err, "failed to load projects");
                self.notice = Some(notice::failed(Operation::Load, &err));
            }
            Outcome::Created(result) => {
                if let Err(err) = &result {
                    tracing::warn!(error = %err, "failed to create project");
                }
                if let Some(project) = self.form.on_created(result, &self.edit) {
                    tracing::info!(id = %project.id, "project created");
                    self.projects.push(project);
                }
            }
            Outcome::Updated { id, result } => {
                match result {
                    Ok(updated) => {
                        tracing::info!(%id, "project updated");
                        for project in self.projects.iter_mut().filter(|p| p.id == id) {
                            *project = updated.clone();
                        }
                        self.notice = Some(notice::succeeded(Operation::Update));
                    }
                    Err(err) => {
                        tracing::warn!(%id, error = %err, "failed to update project");
                        self.notice = Some(notice::failed(Operation::Update, &err));
                    }
                }
                // The form only re-syncs when the edit state actually changes.
                if self.edit.is_editing() {
                    self.cancel_edit();
                }
            }
            Outcome::Deleted { id, result } => match result {
                Ok(()) => {
                    tracing::info!(%id, "project deleted");
                    self.projects.retain(|p| p.id != id);
                    self.notice = Some(notice::succeeded(Operation::Delete));
                }
                Err(err) => {
                    tracing::warn!(%id, error = %err, "failed to delete project");
                    self.notice = Some(notice::failed(Operation::Delete, &err));
                }
            },
        }
    }

    /// Applies every outcome that has already arrived. Never blocks.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.rx.try_recv() {
            self.apply(outcome);
            applied += 1;
        }
        applied
    }

    /// Waits for the next outcome and applies it.
    pub async fn settle(&mut self) -> bool {
        match self.rx.recv().await {
            Some(outcome) => {
                self.apply(outcome);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::fake::{Call, FakeApi, project};
    use crate::crud::form::Draft;
    use crate::models::Priority;

    async fn loaded(api: &Arc<FakeApi>) -> Container {
        let mut container = Container::new(api.clone());
        container.load();
        assert!(container.settle().await);
        container
    }

    fn fill(container: &mut Container, title: &str, cost: &str) {
        let draft = container.form_mut().draft_mut();
        draft.set_title(title.to_string());
        draft.set_cost(cost.to_string());
    }

    #[tokio::test]
    async fn load_replaces_cache() {
        let api = Arc::new(FakeApi::with_projects(vec![
            project(1, "A", 10.0),
            project(2, "B", 20.0),
        ]));
        let container = loaded(&api).await;

        assert_eq!(container.projects().len(), 2);
        assert_eq!(container.notice(), Some(&Notice::success("Projects loaded")));
        assert_eq!(api.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn load_failure_keeps_empty_cache_and_flags_error() {
        let api = Arc::new(FakeApi::with_projects(vec![project(1, "A", 10.0)]));
        api.fail_with(ApiError::Transport("connection refused".into()));
        let container = loaded(&api).await;

        assert!(container.projects().is_empty());
        assert!(container.notice().unwrap().is_error);
    }

    #[tokio::test]
    async fn reload_failure_keeps_previous_cache() {
        let api = Arc::new(FakeApi::with_projects(vec![project(1, "A", 10.0)]));
        let mut container = loaded(&api).await;

        api.fail_with(ApiError::Application {
            status: 503,
            message: None,
        });
        container.load();
        container.settle().await;

        assert_eq!(container.projects().len(), 1);
        assert!(container.notice().unwrap().is_error);
    }

    #[tokio::test]
    async fn create_appends_exactly_one_matching_record() {
        let api = Arc::new(FakeApi::with_projects(vec![project(1, "A", 10.0)]));
        let mut container = loaded(&api).await;

        fill(&mut container, "Test", "5");
        container
            .form_mut()
            .draft_mut()
            .set_priority(Priority::High);
        let expected = container.form().draft().to_new_project().unwrap();

        assert!(container.submit_form());
        container.settle().await;

        assert_eq!(container.projects().len(), 2);
        let created = &container.projects()[1];
        assert_eq!(created.id, ProjectId::Number(2));
        assert_eq!(created.title, expected.title);
        assert_eq!(created.cost, expected.cost);
        assert_eq!(created.priority, Priority::High);
        assert_eq!(container.form().draft(), &Draft::default());
        assert_eq!(api.calls(), vec![Call::List, Call::Create("Test".into())]);
    }

    #[tokio::test]
    async fn create_failure_keeps_draft_and_cache() {
        let api = Arc::new(FakeApi::default());
        let mut container = loaded(&api).await;

        api.fail_with(ApiError::Application {
            status: 400,
            message: Some("Costo inválido".into()),
        });
        fill(&mut container, "Test", "5");
        container.submit_form();
        container.settle().await;

        assert!(container.projects().is_empty());
        assert_eq!(container.form().draft().title(), "Test");
        let notice = container.form().notice().unwrap();
        assert!(notice.is_error);
        assert_eq!(notice.text, "Error: Costo inválido");
    }

    #[tokio::test]
    async fn invalid_draft_issues_no_request() {
        let api = Arc::new(FakeApi::default());
        let mut container = loaded(&api).await;

        fill(&mut container, "", "5");
        assert!(!container.submit_form());
        assert_eq!(container.drain(), 0);
        assert_eq!(api.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn double_submit_sends_two_creates() {
        let api = Arc::new(FakeApi::default());
        let mut container = loaded(&api).await;

        fill(&mut container, "Twice", "1");
        assert!(container.submit_form());
        assert!(container.submit_form());
        container.settle().await;
        container.settle().await;

        assert_eq!(container.projects().len(), 2);
        let creates = api
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Create(_)))
            .count();
        assert_eq!(creates, 2);
    }

    #[tokio::test]
    async fn delete_removes_only_that_record() {
        let api = Arc::new(FakeApi::with_projects(vec![
            project(1, "A", 1.0),
            project(2, "B", 2.0),
            project(3, "C", 3.0),
        ]));
        let mut container = loaded(&api).await;

        container.delete(ProjectId::Number(2));
        container.settle().await;

        let ids: Vec<_> = container.projects().iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec![ProjectId::Number(1), ProjectId::Number(3)]);
        assert_eq!(container.notice(), Some(&Notice::success("Project deleted")));
    }

    #[tokio::test]
    async fn delete_failure_leaves_cache_untouched() {
        let api = Arc::new(FakeApi::with_projects(vec![project(1, "A", 1.0)]));
        let mut container = loaded(&api).await;

        api.fail_with(ApiError::Transport("timed out".into()));
        container.delete(ProjectId::Number(1));
        container.settle().await;

        assert_eq!(container.projects().len(), 1);
        assert_eq!(
            container.notice().unwrap().text,
            "Could not reach the API while deleting the project"
        );
    }

    #[tokio::test]
    async fn edit_replaces_record_and_ends_edit_mode() {
        let api = Arc::new(FakeApi::with_projects(vec![
            project(1, "A", 1.0),
            project(2, "B", 2.0),
        ]));
        let mut container = loaded(&api).await;

        container.start_edit(container.projects()[0].clone());
        assert!(container.edit_state().is_editing());
        assert_eq!(container.form().draft().title(), "A");

        container.form_mut().draft_mut().set_title("A2".into());
        assert!(container.submit_form());
        container.settle().await;

        assert_eq!(container.projects()[0].title, "A2");
        assert_eq!(container.projects()[0].id, ProjectId::Number(1));
        assert_eq!(container.projects()[1].title, "B");
        assert_eq!(container.edit_state(), &EditState::Idle);
        assert_eq!(container.form().draft(), &Draft::default());
        assert_eq!(api.calls().last(), Some(&Call::Update(ProjectId::Number(1))));
    }

    #[tokio::test]
    async fn edit_failure_still_ends_edit_mode() {
        let api = Arc::new(FakeApi::with_projects(vec![project(1, "A", 1.0)]));
        let mut container = loaded(&api).await;

        container.start_edit(container.projects()[0].clone());
        container.form_mut().draft_mut().set_title("changed".into());
        api.fail_with(ApiError::Application {
            status: 500,
            message: None,
        });
        container.submit_form();
        container.settle().await;

        assert_eq!(container.projects()[0].title, "A");
        assert_eq!(container.edit_state(), &EditState::Idle);
        assert!(container.notice().unwrap().is_error);
    }

    #[tokio::test]
    async fn cancel_edit_clears_draft_without_network() {
        let api = Arc::new(FakeApi::with_projects(vec![project(1, "A", 1.0)]));
        let mut container = loaded(&api).await;

        container.start_edit(container.projects()[0].clone());
        container.cancel_edit();

        assert_eq!(container.edit_state(), &EditState::Idle);
        assert_eq!(container.form().draft(), &Draft::default());
        assert_eq!(container.drain(), 0);
        assert_eq!(api.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn late_update_does_not_wipe_a_new_draft() {
        let api = Arc::new(FakeApi::with_projects(vec![project(1, "A", 1.0)]));
        let mut container = loaded(&api).await;

        container.start_edit(container.projects()[0].clone());
        container.submit_form();
        container.cancel_edit();
        fill(&mut container, "fresh", "3");
        container.settle().await;

        assert_eq!(container.form().draft().title(), "fresh");
    }

    #[tokio::test]
    async fn late_create_does_not_wipe_an_edit_draft() {
        let api = Arc::new(FakeApi::with_projects(vec![project(1, "A", 1.0)]));
        let mut container = loaded(&api).await;

        fill(&mut container, "Test", "5");
        assert!(container.submit_form());
        container.start_edit(container.projects()[0].clone());
        container.settle().await;

        assert!(container.edit_state().is_editing());
        assert_eq!(container.form().draft().title(), "A");
        assert_eq!(container.form().draft().cost(), "1");
        assert_eq!(container.projects().len(), 2);
        assert_eq!(container.projects()[1].title, "Test");
    }

    #[tokio::test]
    async fn saving_an_untouched_edit_keeps_the_stored_due() {
        let mut dated = project(1, "A", 1.0);
        dated.due = "2024-05-01".into();
        let mut zoned = project(2, "B", 2.0);
        zoned.due = "2024-05-01T10:00:00.000Z".into();
        let api = Arc::new(FakeApi::with_projects(vec![dated, zoned]));
        let mut container = loaded(&api).await;

        for index in 0..2 {
            let before = container.projects()[index].clone();
            container.start_edit(before.clone());
            assert!(container.submit_form());
            container.settle().await;
            assert_eq!(container.projects()[index].due, before.due);
        }
        assert_eq!(
            &api.calls()[1..],
            &[
                Call::Update(ProjectId::Number(1)),
                Call::Update(ProjectId::Number(2))
            ]
        );
    }

    #[tokio::test]
    async fn delete_then_placeholder_scenario() {
        use crate::crud::list::{TableRow, rows};

        let api = Arc::new(FakeApi::with_projects(vec![project(1, "A", 10.0)]));
        let mut container = loaded(&api).await;
        assert!(matches!(&rows(container.projects())[0], TableRow::Project(r) if r.title == "A"));

        container.delete(ProjectId::Number(1));
        container.settle().await;
        assert_eq!(rows(container.projects()), vec![TableRow::Placeholder]);
    }
}
