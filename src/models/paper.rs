//! Paper model and the paper <-> repository link returned by search.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::repository::Repository;
use crate::models::schema::{Field, Kind, Model};

/// A research paper indexed by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    /// Paper ID
    pub id: String,

    /// arXiv ID
    #[serde(default)]
    pub arxiv_id: Option<String>,

    /// NeurIPS conference ID
    #[serde(default)]
    pub nips_id: Option<String>,

    /// URL to the paper abstract
    pub url_abs: String,

    /// URL to the paper PDF
    pub url_pdf: String,

    /// Paper title
    pub title: String,

    /// Abstract text
    pub r#abstract: String,

    /// Author names, in publication order
    pub authors: Vec<String>,

    /// Publication date
    pub published: NaiveDate,

    /// ID of the conference the paper was published in
    #[serde(default)]
    pub conference: Option<String>,

    /// URL to the conference paper page
    #[serde(default)]
    pub conference_url_abs: Option<String>,

    /// URL to the conference paper PDF
    #[serde(default)]
    pub conference_url_pdf: Option<String>,

    /// ID of the conference proceeding the paper was published in
    #[serde(default)]
    pub proceeding: Option<String>,
}

impl Paper {
    /// Returns the arXiv abstract page, when the paper has an arXiv ID
    pub fn arxiv_url(&self) -> Option<String> {
        self.arxiv_id
            .as_ref()
            .map(|id| format!("https://arxiv.org/abs/{}", id))
    }

    /// Returns the author names joined for display
    pub fn author_line(&self) -> String {
        self.authors.join(", ")
    }
}

impl Model for Paper {
    const SCHEMA: &'static [Field] = &[
        Field::required("id", Kind::Str),
        Field::nullable("arxiv_id", Kind::Str),
        Field::nullable("nips_id", Kind::Str),
        Field::required("url_abs", Kind::Str),
        Field::required("url_pdf", Kind::Str),
        Field::required("title", Kind::Str),
        Field::required("abstract", Kind::Str),
        Field::required("authors", Kind::StrList),
        Field::required("published", Kind::Date),
        Field::nullable("conference", Kind::Str),
        Field::nullable("conference_url_abs", Kind::Str),
        Field::nullable("conference_url_pdf", Kind::Str),
        Field::nullable("proceeding", Kind::Str),
    ];
}

/// A paper together with one of its implementations, as returned by search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperRepo {
    /// The paper
    pub paper: Paper,

    /// Implementation repository, if the paper has one
    #[serde(default)]
    pub repository: Option<Repository>,

    /// Whether this is the official implementation
    pub is_official: bool,
}

impl Model for PaperRepo {
    const SCHEMA: &'static [Field] = &[
        Field::required("paper", Kind::Object(Paper::SCHEMA)),
        Field::nullable("repository", Kind::Object(Repository::SCHEMA)),
        Field::required("is_official", Kind::Bool),
    ];
}
