//! Method model.

use serde::{Deserialize, Serialize};

use crate::models::schema::{Field, Kind, Model};

/// A machine learning method (architecture, technique, loss...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    /// Method ID
    pub id: String,

    /// Short name
    pub name: String,

    /// Full name
    pub full_name: String,

    /// Description
    pub description: String,

    /// ID of the paper that introduced the method
    #[serde(default)]
    pub paper: Option<String>,
}

impl Model for Method {
    const SCHEMA: &'static [Field] = &[
        Field::required("id", Kind::Str),
        Field::required("name", Kind::Str),
        Field::required("full_name", Kind::Str),
        Field::required("description", Kind::Str),
        Field::nullable("paper", Kind::Str),
    ];
}
