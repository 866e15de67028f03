//! Code repository model.

use serde::{Deserialize, Serialize};

use crate::models::schema::{Field, Kind, Model};

/// A source code repository implementing one or more papers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    /// URL of the repository
    pub url: String,

    /// Repository owner
    pub owner: String,

    /// Repository name
    pub name: String,

    /// Repository description
    pub description: String,

    /// Number of stars
    pub stars: u64,

    /// Implementation framework (tf, pytorch, mxnet, torch, caffe2, jax, paddle, mindspore...)
    pub framework: String,

    /// Whether this is the official implementation of the paper.
    /// Only reported when listing the repositories of a specific paper.
    #[serde(default)]
    pub is_official: Option<bool>,
}

impl Repository {
    /// Returns `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl Model for Repository {
    const SCHEMA: &'static [Field] = &[
        Field::required("url", Kind::Str),
        Field::required("owner", Kind::Str),
        Field::required("name", Kind::Str),
        Field::required("description", Kind::Str),
        Field::required("stars", Kind::UInt),
        Field::required("framework", Kind::Str),
        Field::nullable("is_official", Kind::Bool),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_negative_stars_rejected() {
        let err = Repository::from_value(json!({
            "url": "https://github.com/o/n",
            "owner": "o",
            "name": "n",
            "description": "",
            "stars": -3,
            "framework": "none"
        }))
        .unwrap_err();
        assert_eq!(err.errors().len(), 1);
        assert_eq!(err.errors()[0].loc, "stars");
    }

    #[test]
    fn test_full_name() {
        let repo = Repository::from_value(json!({
            "url": "https://github.com/huggingface/transformers",
            "owner": "huggingface",
            "name": "transformers",
            "description": "State-of-the-art NLP",
            "stars": 100,
            "framework": "pytorch",
            "is_official": null
        }))
        .unwrap();
        assert_eq!(repo.full_name(), "huggingface/transformers");
        assert_eq!(repo.is_official, None);
    }
}
