//! Bulk synchronization of an evaluation table with its metrics and results.
//!
//! A sync request describes the full desired state of a table. The server matches
//! existing rows (by `external_id` when given), creates what is missing, and answers
//! with the stored state including server-assigned IDs.

use serde::{Deserialize, Serialize};

use crate::models::evaluation::result::{EvaluatedOn, MetricValues};
use crate::models::schema::{Field, Kind, Model};

fn default_true() -> bool {
    true
}

/// Metric entry of a sync request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSyncRequest {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_true")]
    pub is_loss: bool,
}

impl MetricSyncRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            is_loss: true,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_loss(mut self, is_loss: bool) -> Self {
        self.is_loss = is_loss;
        self
    }
}

impl Model for MetricSyncRequest {
    const SCHEMA: &'static [Field] = &[
        Field::required("name", Kind::Str),
        Field::defaulted("description", Kind::Str),
        Field::defaulted("is_loss", Kind::Bool),
    ];
}

/// Result entry of a sync request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSyncRequest {
    pub metrics: MetricValues,

    pub methodology: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper: Option<String>,

    #[serde(default)]
    pub uses_additional_data: bool,

    /// Caller-side identifier used to match existing rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    pub evaluated_on: EvaluatedOn,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_source_url: Option<String>,
}

impl ResultSyncRequest {
    pub fn new(
        metrics: MetricValues,
        methodology: impl Into<String>,
        evaluated_on: impl Into<EvaluatedOn>,
    ) -> Self {
        Self {
            metrics,
            methodology: methodology.into(),
            paper: None,
            uses_additional_data: false,
            external_id: None,
            evaluated_on: evaluated_on.into(),
            external_source_url: None,
        }
    }

    pub fn paper(mut self, paper: impl Into<String>) -> Self {
        self.paper = Some(paper.into());
        self
    }

    pub fn uses_additional_data(mut self, uses_additional_data: bool) -> Self {
        self.uses_additional_data = uses_additional_data;
        self
    }

    pub fn external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn external_source_url(mut self, url: impl Into<String>) -> Self {
        self.external_source_url = Some(url.into());
        self
    }
}

impl Model for ResultSyncRequest {
    const SCHEMA: &'static [Field] = &[
        Field::required("metrics", Kind::Map),
        Field::required("methodology", Kind::Str),
        Field::nullable("paper", Kind::Str),
        Field::defaulted("uses_additional_data", Kind::Bool),
        Field::nullable("external_id", Kind::Str),
        Field::required("evaluated_on", Kind::Str),
        Field::nullable("external_source_url", Kind::Str),
    ];
}

/// Desired state of an evaluation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationTableSyncRequest {
    pub task: String,

    pub dataset: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(default)]
    pub metrics: Vec<MetricSyncRequest>,

    #[serde(default)]
    pub results: Vec<ResultSyncRequest>,
}

impl EvaluationTableSyncRequest {
    pub fn new(task: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            dataset: dataset.into(),
            description: String::new(),
            mirror_url: None,
            external_id: None,
            metrics: Vec::new(),
            results: Vec::new(),
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

    pub fn external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn metric(mut self, metric: MetricSyncRequest) -> Self {
        self.metrics.push(metric);
        self
    }

    pub fn result(mut self, result: ResultSyncRequest) -> Self {
        self.results.push(result);
        self
    }
}

impl Model for EvaluationTableSyncRequest {
    const SCHEMA: &'static [Field] = &[
        Field::required("task", Kind::Str),
        Field::required("dataset", Kind::Str),
        Field::defaulted("description", Kind::Str),
        Field::nullable("mirror_url", Kind::Str),
        Field::nullable("external_id", Kind::Str),
        Field::defaulted("metrics", Kind::ObjectList(MetricSyncRequest::SCHEMA)),
        Field::defaulted("results", Kind::ObjectList(ResultSyncRequest::SCHEMA)),
    ];
}

/// Stored metric returned by a sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSyncResponse {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub is_loss: bool,
}

impl Model for MetricSyncResponse {
    const SCHEMA: &'static [Field] = &[
        Field::nullable("id", Kind::Str),
        Field::required("name", Kind::Str),
        Field::defaulted("description", Kind::Str),
        Field::defaulted("is_loss", Kind::Bool),
    ];
}

/// Stored result returned by a sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSyncResponse {
    pub id: String,
    pub metrics: MetricValues,
    pub methodology: String,
    #[serde(default)]
    pub paper: Option<String>,
    #[serde(default)]
    pub uses_additional_data: bool,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub evaluated_on: Option<String>,
    #[serde(default)]
    pub external_source_url: Option<String>,
}

impl Model for ResultSyncResponse {
    const SCHEMA: &'static [Field] = &[
        Field::required("id", Kind::Str),
        Field::required("metrics", Kind::Map),
        Field::required("methodology", Kind::Str),
        Field::nullable("paper", Kind::Str),
        Field::defaulted("uses_additional_data", Kind::Bool),
        Field::nullable("external_id", Kind::Str),
        Field::nullable("evaluated_on", Kind::Str),
        Field::nullable("external_source_url", Kind::Str),
    ];
}

/// Stored evaluation table returned by a sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationTableSyncResponse {
    pub id: String,
    pub task: String,
    pub dataset: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mirror_url: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub metrics: Vec<MetricSyncResponse>,
    #[serde(default)]
    pub results: Vec<ResultSyncResponse>,
}

impl Model for EvaluationTableSyncResponse {
    const SCHEMA: &'static [Field] = &[
        Field::required("id", Kind::Str),
        Field::required("task", Kind::Str),
        Field::required("dataset", Kind::Str),
        Field::defaulted("description", Kind::Str),
        Field::nullable("mirror_url", Kind::Str),
        Field::nullable("external_id", Kind::Str),
        Field::defaulted("metrics", Kind::ObjectList(MetricSyncResponse::SCHEMA)),
        Field::defaulted("results", Kind::ObjectList(ResultSyncResponse::SCHEMA)),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_metric_sync_defaults() {
        let metric = MetricSyncRequest::from_value(json!({"name": "Top 1 Accuracy"})).unwrap();
        assert_eq!(metric.description, "");
        assert!(metric.is_loss);
    }

    #[test]
    fn test_result_sync_requires_evaluated_on() {
        let err = ResultSyncRequest::from_value(json!({
            "metrics": {},
            "methodology": "m"
        }))
        .unwrap_err();
        assert_eq!(err.errors()[0].loc, "evaluated_on");
    }

    #[test]
    fn test_table_sync_payload() {
        let mut metrics = MetricValues::new();
        metrics.insert("Top 1 Accuracy".into(), json!("85%"));
        let request = EvaluationTableSyncRequest::new("image-classification", "imagenet")
            .metric(MetricSyncRequest::new("Top 1 Accuracy").is_loss(false))
            .result(
                ResultSyncRequest::new(
                    metrics,
                    "ResNet-50",
                    NaiveDate::from_ymd_opt(2016, 12, 10).unwrap(),
                )
                .external_id("row-1"),
            );

        let payload = request.to_payload().unwrap();
        assert_eq!(payload["metrics"][0]["is_loss"], json!(false));
        assert_eq!(payload["results"][0]["evaluated_on"], json!("2016-12-10"));
        assert_eq!(payload["results"][0]["external_id"], json!("row-1"));
        assert!(payload.get("mirror_url").is_none());
    }

    #[test]
    fn test_table_sync_nested_errors() {
        let err = EvaluationTableSyncRequest::from_value(json!({
            "task": "t",
            "dataset": "d",
            "results": [{"metrics": {}, "methodology": 1, "evaluated_on": "2020-01-01"}]
        }))
        .unwrap_err();
        assert_eq!(err.errors().len(), 1);
        assert_eq!(err.errors()[0].loc, "results.0.methodology");
    }

    #[test]
    fn test_sync_response_defaults() {
        let response = EvaluationTableSyncResponse::from_value(json!({
            "id": "tbl-1",
            "task": "image-classification",
            "dataset": "imagenet"
        }))
        .unwrap();
        assert_eq!(response.description, "");
        assert!(response.metrics.is_empty());
        assert!(response.results.is_empty());

        let result = ResultSyncResponse::from_value(json!({
            "id": "r-1",
            "metrics": {},
            "methodology": "ResNet-50"
        }))
        .unwrap();
        assert!(!result.uses_additional_data);

        let metric = MetricSyncResponse::from_value(json!({"name": "Top 1 Accuracy"})).unwrap();
        assert_eq!(metric.id, None);
        assert_eq!(metric.description, "");
        assert!(metric.is_loss);
    }
}
