use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query results as delivered by the dashboard host: named series, each with
/// named fields holding one raw JSON value per row.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSet {
    #[serde(default)]
    pub series: Vec<Series>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    Json(String),
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameError::Json(msg) => write!(f, "invalid column set: {msg}"),
        }
    }
}

impl std::error::Error for FrameError {}

impl ColumnSet {
    pub fn new(series: Vec<Series>) -> Self {
        Self { series }
    }

    pub fn from_json_str(payload: &str) -> Result<Self, FrameError> {
        serde_json::from_str(payload).map_err(|e| FrameError::Json(e.to_string()))
    }

    /// First series carrying `name`. Unnamed series never match.
    pub fn series_named(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name.as_deref() == Some(name))
    }

    pub fn first_series(&self) -> Option<&Series> {
        self.series.first()
    }
}

impl Series {
    pub fn new(name: Option<&str>, fields: Vec<Field>) -> Self {
        Self {
            name: name.map(str::to_string),
            fields,
        }
    }

    pub fn field_named(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl Field {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}
