//! Evaluation results (leaderboard rows) and their write requests.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::models::schema::{double_option, Field, Kind, Model};

/// Metric name to value. The set of keys depends on the metrics the evaluation
/// table declares, so it is kept as an open JSON map.
pub type MetricValues = Map<String, Value>;

/// Date a result was evaluated on, as accepted by write requests.
///
/// Dates and datetimes are sent as `YYYY-MM-DD`; text is sent unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluatedOn {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Text(String),
}

impl EvaluatedOn {
    /// Wire representation
    pub fn to_wire(&self) -> String {
        match self {
            EvaluatedOn::Date(date) => date.format("%Y-%m-%d").to_string(),
            EvaluatedOn::DateTime(datetime) => datetime.format("%Y-%m-%d").to_string(),
            EvaluatedOn::Text(text) => text.clone(),
        }
    }
}

impl Serialize for EvaluatedOn {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire())
    }
}

impl<'de> Deserialize<'de> for EvaluatedOn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(EvaluatedOn::Text)
    }
}

impl From<NaiveDate> for EvaluatedOn {
    fn from(date: NaiveDate) -> Self {
        EvaluatedOn::Date(date)
    }
}

impl From<NaiveDateTime> for EvaluatedOn {
    fn from(datetime: NaiveDateTime) -> Self {
        EvaluatedOn::DateTime(datetime)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for EvaluatedOn {
    fn from(datetime: DateTime<Tz>) -> Self {
        EvaluatedOn::DateTime(datetime.naive_local())
    }
}

impl From<String> for EvaluatedOn {
    fn from(text: String) -> Self {
        EvaluatedOn::Text(text)
    }
}

impl From<&str> for EvaluatedOn {
    fn from(text: &str) -> Self {
        EvaluatedOn::Text(text.to_string())
    }
}

/// A row of an evaluation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Result {
    /// Result ID
    pub id: String,

    /// Best rank reached by the row
    #[serde(default)]
    pub best_rank: Option<i64>,

    /// Metric values
    pub metrics: MetricValues,

    /// Methodology used for this implementation
    pub methodology: String,

    /// Whether the evaluation used data not provided by the dataset
    pub uses_additional_data: bool,

    /// ID of the paper describing the evaluation
    #[serde(default)]
    pub paper: Option<String>,

    /// Name of the best metric
    #[serde(default)]
    pub best_metric: Option<String>,

    /// Evaluation date (`YYYY-MM-DD`)
    #[serde(default)]
    pub evaluated_on: Option<String>,

    /// URL of an external source (e.g. a competition)
    #[serde(default)]
    pub external_source_url: Option<String>,
}

impl Model for Result {
    const SCHEMA: &'static [Field] = &[
        Field::required("id", Kind::Str),
        Field::nullable("best_rank", Kind::Int),
        Field::required("metrics", Kind::Map),
        Field::required("methodology", Kind::Str),
        Field::required("uses_additional_data", Kind::Bool),
        Field::nullable("paper", Kind::Str),
        Field::nullable("best_metric", Kind::Str),
        Field::nullable("evaluated_on", Kind::Str),
        Field::nullable("external_source_url", Kind::Str),
    ];
}

/// Request body for adding a result to an evaluation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultCreateRequest {
    pub metrics: MetricValues,

    pub methodology: String,

    #[serde(default)]
    pub uses_additional_data: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluated_on: Option<EvaluatedOn>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_source_url: Option<String>,
}

impl ResultCreateRequest {
    pub fn new(metrics: MetricValues, methodology: impl Into<String>) -> Self {
        Self {
            metrics,
            methodology: methodology.into(),
            uses_additional_data: false,
            paper: None,
            evaluated_on: None,
            external_source_url: None,
        }
    }

    pub fn uses_additional_data(mut self, uses_additional_data: bool) -> Self {
        self.uses_additional_data = uses_additional_data;
        self
    }

    pub fn paper(mut self, paper: impl Into<String>) -> Self {
        self.paper = Some(paper.into());
        self
    }

    pub fn evaluated_on(mut self, evaluated_on: impl Into<EvaluatedOn>) -> Self {
        self.evaluated_on = Some(evaluated_on.into());
        self
    }

    pub fn external_source_url(mut self, url: impl Into<String>) -> Self {
        self.external_source_url = Some(url.into());
        self
    }
}

impl Model for ResultCreateRequest {
    const SCHEMA: &'static [Field] = &[
        Field::required("metrics", Kind::Map),
        Field::required("methodology", Kind::Str),
        Field::defaulted("uses_additional_data", Kind::Bool),
        Field::nullable("paper", Kind::Str),
        Field::nullable("evaluated_on", Kind::Str),
        Field::nullable("external_source_url", Kind::Str),
    ];
}

/// Partial update of a result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricValues>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methodology: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses_additional_data: Option<bool>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub paper: Option<Option<String>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub evaluated_on: Option<Option<EvaluatedOn>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub external_source_url: Option<Option<String>>,
}

impl ResultUpdateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(mut self, metrics: MetricValues) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn methodology(mut self, methodology: impl Into<String>) -> Self {
        self.methodology = Some(methodology.into());
        self
    }

    pub fn uses_additional_data(mut self, uses_additional_data: bool) -> Self {
        self.uses_additional_data = Some(uses_additional_data);
        self
    }

    pub fn paper(mut self, paper: impl Into<String>) -> Self {
        self.paper = Some(Some(paper.into()));
        self
    }

    pub fn clear_paper(mut self) -> Self {
        self.paper = Some(None);
        self
    }

    pub fn evaluated_on(mut self, evaluated_on: impl Into<EvaluatedOn>) -> Self {
        self.evaluated_on = Some(Some(evaluated_on.into()));
        self
    }

    pub fn clear_evaluated_on(mut self) -> Self {
        self.evaluated_on = Some(None);
        self
    }

    pub fn external_source_url(mut self, url: impl Into<String>) -> Self {
        self.external_source_url = Some(Some(url.into()));
        self
    }

    pub fn clear_external_source_url(mut self) -> Self {
        self.external_source_url = Some(None);
        self
    }
}

impl Model for ResultUpdateRequest {
    const SCHEMA: &'static [Field] = &[
        Field::nullable("metrics", Kind::Map),
        Field::nullable("methodology", Kind::Str),
        Field::nullable("uses_additional_data", Kind::Bool),
        Field::nullable("paper", Kind::Str),
        Field::nullable("evaluated_on", Kind::Str),
        Field::nullable("external_source_url", Kind::Str),
    ];
}
