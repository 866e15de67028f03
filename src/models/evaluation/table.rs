//! Evaluation tables (task + dataset leaderboards).

use serde::{Deserialize, Serialize};

use crate::models::schema::{double_option, Field, Kind, Model};

/// Leaderboard of a task on a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationTable {
    /// Evaluation table ID
    pub id: String,

    /// ID of the task used in the evaluation
    pub task: String,

    /// ID of the dataset used in the evaluation
    pub dataset: String,

    /// Evaluation table description
    #[serde(default)]
    pub description: String,

    /// URL of the mirrored table, if any
    #[serde(default)]
    pub mirror_url: Option<String>,
}

impl Model for EvaluationTable {
    const SCHEMA: &'static [Field] = &[
        Field::required("id", Kind::Str),
        Field::required("task", Kind::Str),
        Field::required("dataset", Kind::Str),
        Field::defaulted("description", Kind::Str),
        Field::nullable("mirror_url", Kind::Str),
    ];
}

/// Request body for creating an evaluation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationTableCreateRequest {
    pub task: String,

    pub dataset: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_url: Option<String>,
}

impl EvaluationTableCreateRequest {
    pub fn new(task: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            dataset: dataset.into(),
            description: String::new(),
            mirror_url: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn mirror_url(mut self, mirror_url: impl Into<String>) -> Self {
        self.mirror_url = Some(mirror_url.into());
        self
    }
}

impl Model for EvaluationTableCreateRequest {
    const SCHEMA: &'static [Field] = &[
        Field::required("task", Kind::Str),
        Field::required("dataset", Kind::Str),
        Field::defaulted("description", Kind::Str),
        Field::nullable("mirror_url", Kind::Str),
    ];
}

/// Partial update of an evaluation table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationTableUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub mirror_url: Option<Option<String>>,
}

impl EvaluationTableUpdateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn task(mut self, task: impl Into<String>) -> Self {
        self.task = Some(task.into());
        self
    }

    pub fn dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = Some(dataset.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn mirror_url(mut self, mirror_url: impl Into<String>) -> Self {
        self.mirror_url = Some(Some(mirror_url.into()));
        self
    }

    pub fn clear_mirror_url(mut self) -> Self {
        self.mirror_url = Some(None);
        self
    }
}

impl Model for EvaluationTableUpdateRequest {
    const SCHEMA: &'static [Field] = &[
        Field::nullable("task", Kind::Str),
        Field::nullable("dataset", Kind::Str),
        Field::nullable("description", Kind::Str),
        Field::nullable("mirror_url", Kind::Str),
    ];
}
