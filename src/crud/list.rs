use crate::models::{Project, ProjectId};

pub const COLUMNS: [&str; 6] = [
    "Title",
    "Description",
    "Completed",
    "Due date",
    "Priority",
    "Paid",
];
pub const EMPTY_PLACEHOLDER: &str = "No projects registered";
pub const NO_DUE_DATE: &str = "Not assigned";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub title: String,
    pub description: String,
    pub completed: &'static str,
    pub due: String,
    pub priority: &'static str,
    pub paid: &'static str,
}

impl Row {
    pub fn cells(&self) -> [&str; 6] {
        [
            self.title.as_str(),
            self.description.as_str(),
            self.completed,
            self.due.as_str(),
            self.priority,
            self.paid,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRow {
    Project(Row),
    Placeholder,
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

pub fn row(project: &Project) -> Row {
    Row {
        title: project.title.clone(),
        description: project.description.clone(),
        completed: yes_no(project.completed),
        due: if project.due.is_empty() {
            NO_DUE_DATE.to_string()
        } else {
            project.due.clone()
        },
        priority: project.priority.label(),
        paid: yes_no(project.paid),
    }
}

/// Projects the cache into table rows; an empty cache yields the placeholder.
pub fn rows(projects: &[Project]) -> Vec<TableRow> {
    if projects.is_empty() {
        return vec![TableRow::Placeholder];
    }
    projects.iter().map(|p| TableRow::Project(row(p))).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListAction {
    Edit(Project),
    Delete(ProjectId),
}

/// Wraps an index by `delta` within `len`, returning `None` when the list is empty.
fn wrap_index(current: usize, len: usize, delta: isize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(((current as isize + delta).rem_euclid(len as isize)) as usize)
}

/// Row cursor over data owned by the container.
#[derive(Debug, Clone, Default)]
pub struct ListView {
    selected: usize,
}

impl ListView {
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn navigate(&mut self, len: usize, delta: isize) {
        if let Some(next) = wrap_index(self.selected, len, delta) {
            self.selected = next;
        }
    }

    /// Keeps the cursor in range after the cache shrinks.
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn edit_trigger(&self, projects: &[Project]) -> Option<ListAction> {
        projects
            .get(self.selected)
            .map(|p| ListAction::Edit(p.clone()))
    }

    pub fn delete_trigger(&self, projects: &[Project]) -> Option<ListAction> {
        projects
            .get(self.selected)
            .map(|p| ListAction::Delete(p.id.clone()))
    }
}
