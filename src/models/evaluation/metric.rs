//! Evaluation metric model and its write requests.

use serde::{Deserialize, Serialize};

use crate::models::schema::{Field, Kind, Model};

/// A metric declared by an evaluation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    /// Metric ID
    pub id: String,

    /// Metric name
    pub name: String,

    /// Metric description
    pub description: String,

    /// Whether lower values are better
    pub is_loss: bool,
}

impl Model for Metric {
    const SCHEMA: &'static [Field] = &[
        Field::required("id", Kind::Str),
        Field::required("name", Kind::Str),
        Field::required("description", Kind::Str),
        Field::required("is_loss", Kind::Bool),
    ];
}

/// Request body for adding a metric to an evaluation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricCreateRequest {
    pub name: String,
    pub description: String,
    pub is_loss: bool,
}

impl MetricCreateRequest {
    pub fn new(name: impl Into<String>, description: impl Into<String>, is_loss: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            is_loss,
        }
    }
}

impl Model for MetricCreateRequest {
    const SCHEMA: &'static [Field] = &[
        Field::required("name", Kind::Str),
        Field::required("description", Kind::Str),
        Field::required("is_loss", Kind::Bool),
    ];
}

/// Partial update of a metric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_loss: Option<bool>,
}

impl MetricUpdateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_loss(mut self, is_loss: bool) -> Self {
        self.is_loss = Some(is_loss);
        self
    }
}

impl Model for MetricUpdateRequest {
    const SCHEMA: &'static [Field] = &[
        Field::nullable("name", Kind::Str),
        Field::nullable("description", Kind::Str),
        Field::nullable("is_loss", Kind::Bool),
    ];
}
