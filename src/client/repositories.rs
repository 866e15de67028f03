//! Code repositories.

use super::{seg, Client, Pagination, RepositoryFilter};
use crate::error::Result;
use crate::models::{Page, Paper, Repository};

impl Client {
    /// Paginated list of repositories.
    pub async fn repository_list(
        &self,
        filter: &RepositoryFilter,
        pagination: Pagination,
    ) -> Result<Page<Repository>> {
        self.fetch_filtered("/repositories/", filter, pagination).await
    }

    /// Repositories of one owner.
    pub async fn repository_owner_list(
        &self,
        owner: &str,
        pagination: Pagination,
    ) -> Result<Page<Repository>> {
        self.fetch_listing(&format!("/repositories/{}/", seg(owner)), pagination)
            .await
    }

    /// Repository by its owner/name pair.
    pub async fn repository_get(&self, owner: &str, name: &str) -> Result<Repository> {
        self.fetch(&format!("/repositories/{}/{}/", seg(owner), seg(name)))
            .await
    }

    /// Papers implemented by a repository.
    pub async fn repository_paper_list(
        &self,
        owner: &str,
        name: &str,
        pagination: Pagination,
    ) -> Result<Page<Paper>> {
        self.fetch_listing(
            &format!("/repositories/{}/{}/papers/", seg(owner), seg(name)),
            pagination,
        )
        .await
    }
}
