//! Paginated listing responses.

use serde::Serialize;
use serde_json::Value;

use crate::error::{FieldError, ValidationError};
use crate::models::schema::{Model, ROOT};

/// One slice of a paginated listing.
///
/// The server returns `{count, next, previous, results}` where `next` and `previous`
/// are opaque URLs; only the `page` query parameter is kept from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// Number of elements matching the query
    pub count: u64,
    /// Number of the next page, `None` on the last page
    pub next_page: Option<u32>,
    /// Number of the previous page, `None` on the first page
    pub previous_page: Option<u32>,
    /// Elements on this page
    pub results: Vec<T>,
}

impl<T: Model> Page<T> {
    /// Normalize a raw listing response, validating every element.
    pub fn from_response(value: Value) -> Result<Self, ValidationError> {
        let Value::Object(mut raw) = value else {
            return Err(ValidationError::single(ROOT, "value is not a valid dict"));
        };

        let mut errors = Vec::new();

        let count = match raw.get("count") {
            Some(count) => count.as_u64().or_else(|| {
                errors.push(FieldError::new(
                    "count",
                    "value is not a valid non-negative integer",
                ));
                None
            }),
            None => {
                errors.push(FieldError::new("count", "field required"));
                None
            }
        };

        let next_page = link_page(raw.get("next"), "next", &mut errors);
        let previous_page = link_page(raw.get("previous"), "previous", &mut errors);

        let mut results = Vec::new();
        match raw.remove("results") {
            Some(Value::Array(items)) => {
                for (i, item) in items.into_iter().enumerate() {
                    match T::from_value(item) {
                        Ok(element) => results.push(element),
                        Err(err) => errors.extend(err.errors().iter().map(|e| {
                            let loc = if e.loc == ROOT {
                                format!("results.{}", i)
                            } else {
                                format!("results.{}.{}", i, e.loc)
                            };
                            FieldError::new(loc, e.msg.clone())
                        })),
                    }
                }
            }
            Some(_) => errors.push(FieldError::new("results", "value is not a valid list")),
            None => errors.push(FieldError::new("results", "field required")),
        }

        match count {
            Some(count) if errors.is_empty() => Ok(Page {
                count,
                next_page,
                previous_page,
                results,
            }),
            _ => Err(ValidationError::new(errors)),
        }
    }
}

impl<T> Page<T> {
    /// Whether a following page exists
    pub fn has_next(&self) -> bool {
        self.next_page.is_some()
    }

    /// Whether a preceding page exists
    pub fn has_previous(&self) -> bool {
        self.previous_page.is_some()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Transform the elements while keeping the navigation markers.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next_page: self.next_page,
            previous_page: self.previous_page,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

fn link_page(link: Option<&Value>, field: &str, errors: &mut Vec<FieldError>) -> Option<u32> {
    match link {
        None | Some(Value::Null) => None,
        Some(Value::String(url)) => match page_number(url) {
            Ok(page) => Some(page),
            Err(msg) => {
                errors.push(FieldError::new(field, msg));
                None
            }
        },
        Some(_) => {
            errors.push(FieldError::new(field, "str type expected"));
            None
        }
    }
}

/// Extract the `page` query parameter from a navigation URL.
///
/// A URL without a query string, or without a `page` key, points at page 1.
pub fn page_number(url: &str) -> Result<u32, String> {
    let Some((_, query)) = url.split_once('?') else {
        return Ok(1);
    };
    let query = query.split('#').next().unwrap_or_default();

    match url::form_urlencoded::parse(query.as_bytes()).find(|(key, _)| key == "page") {
        None => Ok(1),
        Some((_, value)) => match value.trim().parse::<u32>() {
            Ok(page) if page > 0 => Ok(page),
            _ => Err(format!("page '{}' is not a positive integer", value)),
        },
    }
}
