//! Query parameters for listing operations.
//!
//! Every listing sends `page` and `items_per_page`; resource filters only add the
//! keys the caller actually set. All values travel as strings.

use std::time::Duration;

/// Deadline requested for full-text queries, which the server answers slowly.
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Query string as ordered key/value pairs.
pub type Params = Vec<(String, String)>;

/// Page selection for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Desired page, starting at 1
    pub page: u32,
    /// Desired number of items per page
    pub items_per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            items_per_page: 50,
        }
    }
}

impl Pagination {
    pub fn new(page: u32, items_per_page: u32) -> Self {
        Self {
            page,
            items_per_page,
        }
    }

    /// Default page size, given page.
    pub fn page(page: u32) -> Self {
        Self {
            page,
            ..Default::default()
        }
    }

    /// Base parameters of every listing.
    pub fn params(&self) -> Params {
        vec![
            ("page".to_string(), self.page.to_string()),
            ("items_per_page".to_string(), self.items_per_page.to_string()),
        ]
    }
}

/// Resource filter turned into query parameters.
pub trait Filter {
    /// Parameters for the keys that were set, in declaration order.
    fn params(&self) -> Params;

    /// Whether the filter runs a full-text query (`q` or `abstract`).
    fn is_full_text(&self) -> bool;

    /// Transport deadline to request for this filter.
    fn timeout(&self) -> Option<Duration> {
        self.is_full_text().then_some(SEARCH_TIMEOUT)
    }
}

macro_rules! filter {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty => $key:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: Option<$ty>, )*
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            $(
                pub fn $field(mut self, value: impl Into<$ty>) -> Self {
                    self.$field = Some(value.into());
                    self
                }
            )*
        }

        impl Filter for $name {
            fn params(&self) -> Params {
                let mut params = Params::new();
                $(
                    if let Some(value) = &self.$field {
                        params.push(($key.to_string(), value.to_string()));
                    }
                )*
                params
            }

            fn is_full_text(&self) -> bool {
                $( (($key == "q" || $key == "abstract") && self.$field.is_some()) || )* false
            }
        }
    };
}

filter! {
    /// Front-page style search over papers and their implementations.
    SearchFilter {
        /// Query over paper title and abstract
        q: String => "q",
    }
}

filter! {
    /// Filters for paper listings.
    PaperFilter {
        /// Query over paper title and abstract
        q: String => "q",
        arxiv_id: String => "arxiv_id",
        /// Part of the title
        title: String => "title",
        /// Part of the abstract
        r#abstract: String => "abstract",
        /// Field used to order the results
        ordering: String => "ordering",
    }
}

filter! {
    /// Filters for repository listings.
    RepositoryFilter {
        q: String => "q",
        owner: String => "owner",
        name: String => "name",
        /// Minimum number of stars
        stars: u64 => "stars",
        /// One of tf, pytorch, mxnet, torch, caffe2, jax, paddle, mindspore
        framework: String => "framework",
        ordering: String => "ordering",
    }
}

filter! {
    /// Filters for author listings.
    AuthorFilter {
        q: String => "q",
        full_name: String => "full_name",
        ordering: String => "ordering",
    }
}

filter! {
    /// Filters for conference listings.
    ConferenceFilter {
        q: String => "q",
        name: String => "name",
        ordering: String => "ordering",
    }
}

filter! {
    /// Filters for area listings.
    AreaFilter {
        q: String => "q",
        name: String => "name",
        ordering: String => "ordering",
    }
}

filter! {
    /// Filters for task listings.
    TaskFilter {
        q: String => "q",
        name: String => "name",
        ordering: String => "ordering",
    }
}

filter! {
    /// Filters for dataset listings.
    DatasetFilter {
        q: String => "q",
        name: String => "name",
        full_name: String => "full_name",
        ordering: String => "ordering",
    }
}

filter! {
    /// Filters for method listings.
    MethodFilter {
        q: String => "q",
        name: String => "name",
        full_name: String => "full_name",
        ordering: String => "ordering",
    }
}

/// Pagination parameters followed by the filter's own.
pub(crate) fn listing(filter: &impl Filter, pagination: Pagination) -> Params {
    let mut params = pagination.params();
    params.extend(filter.params());
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(params: &Params) -> Vec<(&str, &str)> {
        params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn test_pagination_defaults() {
        let params = Pagination::default().params();
        assert_eq!(
            pairs(&params),
            vec![("page", "1"), ("items_per_page", "50")]
        );
        assert_eq!(Pagination::page(4).items_per_page, 50);
    }

    #[test]
    fn test_only_set_keys_are_sent() {
        let filter = RepositoryFilter::new().owner("facebookresearch").stars(100u64);
        let params = listing(&filter, Pagination::new(2, 10));
        assert_eq!(
            pairs(&params),
            vec![
                ("page", "2"),
                ("items_per_page", "10"),
                ("owner", "facebookresearch"),
                ("stars", "100")
            ]
        );
        assert_eq!(filter.timeout(), None);
    }

    #[test]
    fn test_full_text_filters_extend_the_deadline() {
        assert_eq!(
            PaperFilter::new().q("attention").timeout(),
            Some(SEARCH_TIMEOUT)
        );
        assert_eq!(
            PaperFilter::new().r#abstract("transformer").timeout(),
            Some(SEARCH_TIMEOUT)
        );
        assert_eq!(PaperFilter::new().title("BERT").timeout(), None);
        assert_eq!(DatasetFilter::new().full_name("ImageNet").timeout(), None);
        assert!(TaskFilter::new().q("segmentation").is_full_text());
    }

    #[test]
    fn test_abstract_key_is_not_escaped() {
        let params = PaperFilter::new().r#abstract("graph").params();
        assert_eq!(pairs(&params), vec![("abstract", "graph")]);
    }
}
