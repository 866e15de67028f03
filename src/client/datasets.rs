//! Datasets and methods.

use super::{seg, Client, DatasetFilter, MethodFilter, Pagination};
use crate::error::Result;
use crate::models::{
    Dataset, DatasetCreateRequest, DatasetUpdateRequest, EvaluationTable, Method, Model, Page,
};

impl Client {
    /// Paginated list of datasets.
    pub async fn dataset_list(
        &self,
        filter: &DatasetFilter,
        pagination: Pagination,
    ) -> Result<Page<Dataset>> {
        self.fetch_filtered("/datasets/", filter, pagination).await
    }

    pub async fn dataset_get(&self, dataset_id: &str) -> Result<Dataset> {
        self.fetch(&format!("/datasets/{}/", seg(dataset_id))).await
    }

    pub async fn dataset_add(&self, dataset: &DatasetCreateRequest) -> Result<Dataset> {
        self.create("/datasets/", dataset.to_payload()?).await
    }

    /// Update the fields set in `dataset`.
    pub async fn dataset_update(
        &self,
        dataset_id: &str,
        dataset: &DatasetUpdateRequest,
    ) -> Result<Dataset> {
        self.modify(
            &format!("/datasets/{}/", seg(dataset_id)),
            dataset.to_payload()?,
        )
        .await
    }

    pub async fn dataset_delete(&self, dataset_id: &str) -> Result<()> {
        self.remove(&format!("/datasets/{}/", seg(dataset_id))).await
    }

    /// Evaluation tables using a dataset.
    pub async fn dataset_evaluation_list(
        &self,
        dataset_id: &str,
        pagination: Pagination,
    ) -> Result<Page<EvaluationTable>> {
        self.fetch_listing(
            &format!("/datasets/{}/evaluations/", seg(dataset_id)),
            pagination,
        )
        .await
    }

    /// Paginated list of methods.
    pub async fn method_list(
        &self,
        filter: &MethodFilter,
        pagination: Pagination,
    ) -> Result<Page<Method>> {
        self.fetch_filtered("/methods/", filter, pagination).await
    }

    pub async fn method_get(&self, method_id: &str) -> Result<Method> {
        self.fetch(&format!("/methods/{}/", seg(method_id))).await
    }
}
