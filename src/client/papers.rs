//! Search, papers and authors.

use super::{seg, AuthorFilter, Client, Pagination, PaperFilter, SearchFilter};
use crate::error::Result;
use crate::models::{
    Author, Dataset, Method, Page, Paper, PaperRepo, Repository, Result as EvaluationResult, Task,
};

impl Client {
    /// Search papers and their implementations, like the site's front page.
    pub async fn search(
        &self,
        filter: &SearchFilter,
        pagination: Pagination,
    ) -> Result<Page<PaperRepo>> {
        self.fetch_filtered("/search/", filter, pagination).await
    }

    /// Paginated list of papers.
    pub async fn paper_list(
        &self,
        filter: &PaperFilter,
        pagination: Pagination,
    ) -> Result<Page<Paper>> {
        self.fetch_filtered("/papers/", filter, pagination).await
    }

    /// Paper by ID.
    pub async fn paper_get(&self, paper_id: &str) -> Result<Paper> {
        self.fetch(&format!("/papers/{}/", seg(paper_id))).await
    }

    /// Datasets mentioned in a paper.
    pub async fn paper_dataset_list(
        &self,
        paper_id: &str,
        pagination: Pagination,
    ) -> Result<Page<Dataset>> {
        self.fetch_listing(&format!("/papers/{}/datasets/", seg(paper_id)), pagination)
            .await
    }

    /// Repositories implementing a paper.
    pub async fn paper_repository_list(
        &self,
        paper_id: &str,
        pagination: Pagination,
    ) -> Result<Page<Repository>> {
        self.fetch_listing(
            &format!("/papers/{}/repositories/", seg(paper_id)),
            pagination,
        )
        .await
    }

    /// Tasks addressed by a paper.
    pub async fn paper_task_list(
        &self,
        paper_id: &str,
        pagination: Pagination,
    ) -> Result<Page<Task>> {
        self.fetch_listing(&format!("/papers/{}/tasks/", seg(paper_id)), pagination)
            .await
    }

    /// Methods used in a paper.
    pub async fn paper_method_list(
        &self,
        paper_id: &str,
        pagination: Pagination,
    ) -> Result<Page<Method>> {
        self.fetch_listing(&format!("/papers/{}/methods/", seg(paper_id)), pagination)
            .await
    }

    /// Evaluation results reported by a paper.
    pub async fn paper_result_list(
        &self,
        paper_id: &str,
        pagination: Pagination,
    ) -> Result<Page<EvaluationResult>> {
        self.fetch_listing(&format!("/papers/{}/results/", seg(paper_id)), pagination)
            .await
    }

    pub async fn author_list(
        &self,
        filter: &AuthorFilter,
        pagination: Pagination,
    ) -> Result<Page<Author>> {
        self.fetch_filtered("/authors/", filter, pagination).await
    }

    pub async fn author_get(&self, author_id: &str) -> Result<Author> {
        self.fetch(&format!("/authors/{}/", seg(author_id))).await
    }

    /// Papers written by an author.
    pub async fn author_paper_list(
        &self,
        author_id: &str,
        pagination: Pagination,
    ) -> Result<Page<Paper>> {
        self.fetch_listing(&format!("/authors/{}/papers/", seg(author_id)), pagination)
            .await
    }
}
