use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Server-assigned identifier. The API may hand out numbers or strings, and
/// whichever shape arrives is echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ProjectId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for ProjectId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Priority {
    #[serde(rename = "baja")]
    Low,
    #[default]
    #[serde(rename = "media")]
    Medium,
    #[serde(rename = "alta")]
    High,
}

impl Priority {
    /// Value used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "baja",
            Self::Medium => "media",
            Self::High => "alta",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::Medium => Self::Low,
            Self::High => Self::Medium,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "baja" | "low" => Ok(Self::Low),
            "media" | "medium" => Ok(Self::Medium),
            "alta" | "high" => Ok(Self::High),
            other => anyhow::bail!("invalid priority: {other}"),
        }
    }
}

// Unknown or missing priorities fall back to medium, matching the form default.
impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|s| s.parse().ok()).unwrap_or_default())
    }
}

/// Treats an explicit `null` the same as an absent field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decimal columns often come back as strings (`"10.50"`).
fn lenient_cost<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(NumberOrText::Number(n)) => Ok(n),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid cost: {s:?}"))),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    #[serde(rename = "titulo", default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(rename = "descripcion", default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(rename = "completada", default, deserialize_with = "nullable")]
    pub completed: bool,
    #[serde(rename = "fecha_vencimiento", default, deserialize_with = "nullable")]
    pub due: String,
    #[serde(rename = "prioridad", default)]
    pub priority: Priority,
    #[serde(rename = "asignado_a", default, deserialize_with = "nullable")]
    pub assignee: String,
    #[serde(rename = "categoria", default, deserialize_with = "nullable")]
    pub category: String,
    #[serde(rename = "Costo_proyecto", default, deserialize_with = "lenient_cost")]
    pub cost: f64,
    #[serde(rename = "Pagado", default, deserialize_with = "nullable")]
    pub paid: bool,
    /// Server fields this client does not model (timestamps and the like).
    /// Carried through so an update sends back everything it received.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Project {
    /// Builds the record sent on update: `self` with every editable field
    /// replaced by `fields`. The identifier and unmodelled fields are kept.
    pub fn with_fields(&self, fields: NewProject) -> Project {
        Project {
            id: self.id.clone(),
            title: fields.title,
            description: fields.description,
            completed: fields.completed,
            due: fields.due,
            priority: fields.priority,
            assignee: fields.assignee,
            category: fields.category,
            cost: fields.cost,
            paid: fields.paid,
            extra: self.extra.clone(),
        }
    }
}

/// Create payload. Has no identifier; the server assigns one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProject {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "completada")]
    pub completed: bool,
    #[serde(rename = "fecha_vencimiento")]
    pub due: String,
    #[serde(rename = "prioridad")]
    pub priority: Priority,
    #[serde(rename = "asignado_a")]
    pub assignee: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "Costo_proyecto")]
    pub cost: f64,
    #[serde(rename = "Pagado")]
    pub paid: bool,
}

impl NewProject {
    /// Attaches a server-assigned identifier.
    pub fn into_project(self, id: ProjectId) -> Project {
        Project {
            id,
            title: self.title,
            description: self.description,
            completed: self.completed,
            due: self.due,
            priority: self.priority,
            assignee: self.assignee,
            category: self.category,
            cost: self.cost,
            paid: self.paid,
            extra: Map::new(),
        }
    }
}
