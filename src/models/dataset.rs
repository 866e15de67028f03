//! Dataset model and its write requests.

use serde::{Deserialize, Serialize};

use crate::models::schema::{double_option, Field, Kind, Model};

/// A dataset used to evaluate methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Dataset ID
    pub id: String,

    /// Dataset name
    pub name: String,

    /// Dataset full name
    #[serde(default)]
    pub full_name: Option<String>,

    /// URL for dataset download
    #[serde(default)]
    pub url: Option<String>,
}

impl Model for Dataset {
    const SCHEMA: &'static [Field] = &[
        Field::required("id", Kind::Str),
        Field::required("name", Kind::Str),
        Field::nullable("full_name", Kind::Str),
        Field::nullable("url", Kind::Str),
    ];
}

/// Request body for creating a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetCreateRequest {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl DatasetCreateRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_name: None,
            url: None,
        }
    }

    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl Model for DatasetCreateRequest {
    const SCHEMA: &'static [Field] = &[
        Field::required("name", Kind::Str),
        Field::nullable("full_name", Kind::Str),
        Field::nullable("url", Kind::Str),
    ];
}

/// Partial update of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// `Some(None)` removes the download URL
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub url: Option<Option<String>>,
}

impl DatasetUpdateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(Some(url.into()));
        self
    }

    pub fn clear_url(mut self) -> Self {
        self.url = Some(None);
        self
    }
}

impl Model for DatasetUpdateRequest {
    const SCHEMA: &'static [Field] = &[
        Field::nullable("name", Kind::Str),
        Field::nullable("url", Kind::Str),
    ];
}
