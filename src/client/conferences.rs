//! Conferences and their proceedings.

use super::{seg, Client, ConferenceFilter, Pagination};
use crate::error::Result;
use crate::models::{Conference, Page, Paper, Proceeding};

impl Client {
    pub async fn conference_list(
        &self,
        filter: &ConferenceFilter,
        pagination: Pagination,
    ) -> Result<Page<Conference>> {
        self.fetch_filtered("/conferences/", filter, pagination).await
    }

    pub async fn conference_get(&self, conference_id: &str) -> Result<Conference> {
        self.fetch(&format!("/conferences/{}/", seg(conference_id)))
            .await
    }

    /// Proceedings of a conference.
    pub async fn proceeding_list(
        &self,
        conference_id: &str,
        pagination: Pagination,
    ) -> Result<Page<Proceeding>> {
        self.fetch_listing(
            &format!("/conferences/{}/proceedings/", seg(conference_id)),
            pagination,
        )
        .await
    }

    pub async fn proceeding_get(
        &self,
        conference_id: &str,
        proceeding_id: &str,
    ) -> Result<Proceeding> {
        self.fetch(&format!(
            "/conferences/{}/proceedings/{}/",
            seg(conference_id),
            seg(proceeding_id)
        ))
        .await
    }

    /// Papers published in a proceeding.
    pub async fn proceeding_paper_list(
        &self,
        conference_id: &str,
        proceeding_id: &str,
        pagination: Pagination,
    ) -> Result<Page<Paper>> {
        self.fetch_listing(
            &format!(
                "/conferences/{}/proceedings/{}/papers/",
                seg(conference_id),
                seg(proceeding_id)
            ),
            pagination,
        )
        .await
    }
}
