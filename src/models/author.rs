//! Paper author model.

use serde::{Deserialize, Serialize};

use crate::models::schema::{Field, Kind, Model};

/// A paper author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Author ID
    pub id: String,

    /// Author full name
    pub full_name: String,
}

impl Model for Author {
    const SCHEMA: &'static [Field] = &[
        Field::required("id", Kind::Str),
        Field::required("full_name", Kind::Str),
    ];
}
