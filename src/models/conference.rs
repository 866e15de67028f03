//! Conference and conference proceeding models.

use serde::{Deserialize, Serialize};

use crate::models::schema::{Field, Kind, Model};

/// A conference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conference {
    /// Conference ID
    pub id: String,

    /// Conference name
    pub name: String,
}

impl Model for Conference {
    const SCHEMA: &'static [Field] = &[
        Field::required("id", Kind::Str),
        Field::required("name", Kind::Str),
    ];
}

/// One edition (proceeding) of a conference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proceeding {
    /// Proceeding ID
    pub id: String,

    /// Year the proceeding was held
    #[serde(default)]
    pub year: Option<u64>,

    /// Month the proceeding was held
    #[serde(default)]
    pub month: Option<u64>,
}

impl Model for Proceeding {
    const SCHEMA: &'static [Field] = &[
        Field::required("id", Kind::Str),
        Field::nullable("year", Kind::UInt),
        Field::nullable("month", Kind::UInt),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_proceeding_optional_dates() {
        let proceeding = Proceeding::from_value(json!({"id": "icml-2019-6"})).unwrap();
        assert_eq!(proceeding.year, None);

        let proceeding =
            Proceeding::from_value(json!({"id": "icml-2019-6", "year": 2019, "month": 6})).unwrap();
        assert_eq!(proceeding.year, Some(2019));
        assert_eq!(proceeding.month, Some(6));
    }

    #[test]
    fn test_proceeding_year_range_matches_schema() {
        let proceeding =
            Proceeding::from_value(json!({"id": "p", "year": 5_000_000_000u64})).unwrap();
        assert_eq!(proceeding.year, Some(5_000_000_000));

        let err = Proceeding::from_value(json!({"id": "p", "year": -1})).unwrap_err();
        assert_eq!(err.errors()[0].loc, "year");
    }
}
