//! Evaluation tables with their metrics and results.

use super::{seg, Client, Pagination};
use crate::error::Result;
use crate::models::{
    EvaluationTable, EvaluationTableCreateRequest, EvaluationTableSyncRequest,
    EvaluationTableSyncResponse, EvaluationTableUpdateRequest, Metric, MetricCreateRequest,
    MetricUpdateRequest, Model, Page, Result as EvaluationResult, ResultCreateRequest,
    ResultUpdateRequest,
};

impl Client {
    /// Paginated list of evaluation tables.
    pub async fn evaluation_list(&self, pagination: Pagination) -> Result<Page<EvaluationTable>> {
        self.fetch_listing("/evaluations/", pagination).await
    }

    pub async fn evaluation_get(&self, evaluation_id: &str) -> Result<EvaluationTable> {
        self.fetch(&format!("/evaluations/{}/", seg(evaluation_id)))
            .await
    }

    pub async fn evaluation_create(
        &self,
        evaluation: &EvaluationTableCreateRequest,
    ) -> Result<EvaluationTable> {
        self.create("/evaluations/", evaluation.to_payload()?).await
    }

    pub async fn evaluation_update(
        &self,
        evaluation_id: &str,
        evaluation: &EvaluationTableUpdateRequest,
    ) -> Result<EvaluationTable> {
        self.modify(
            &format!("/evaluations/{}/", seg(evaluation_id)),
            evaluation.to_payload()?,
        )
        .await
    }

    pub async fn evaluation_delete(&self, evaluation_id: &str) -> Result<()> {
        self.remove(&format!("/evaluations/{}/", seg(evaluation_id)))
            .await
    }

    // ========== METRICS ==========

    pub async fn evaluation_metric_list(
        &self,
        evaluation_id: &str,
        pagination: Pagination,
    ) -> Result<Page<Metric>> {
        self.fetch_listing(
            &format!("/evaluations/{}/metrics/", seg(evaluation_id)),
            pagination,
        )
        .await
    }

    pub async fn evaluation_metric_get(
        &self,
        evaluation_id: &str,
        metric_id: &str,
    ) -> Result<Metric> {
        self.fetch(&format!(
            "/evaluations/{}/metrics/{}/",
            seg(evaluation_id),
            seg(metric_id)
        ))
        .await
    }

    pub async fn evaluation_metric_add(
        &self,
        evaluation_id: &str,
        metric: &MetricCreateRequest,
    ) -> Result<Metric> {
        self.create(
            &format!("/evaluations/{}/metrics/", seg(evaluation_id)),
            metric.to_payload()?,
        )
        .await
    }

    pub async fn evaluation_metric_update(
        &self,
        evaluation_id: &str,
        metric_id: &str,
        metric: &MetricUpdateRequest,
    ) -> Result<Metric> {
        self.modify(
            &format!(
                "/evaluations/{}/metrics/{}/",
                seg(evaluation_id),
                seg(metric_id)
            ),
            metric.to_payload()?,
        )
        .await
    }

    pub async fn evaluation_metric_delete(
        &self,
        evaluation_id: &str,
        metric_id: &str,
    ) -> Result<()> {
        self.remove(&format!(
            "/evaluations/{}/metrics/{}/",
            seg(evaluation_id),
            seg(metric_id)
        ))
        .await
    }

    // ========== RESULTS ==========

    pub async fn evaluation_result_list(
        &self,
        evaluation_id: &str,
        pagination: Pagination,
    ) -> Result<Page<EvaluationResult>> {
        self.fetch_listing(
            &format!("/evaluations/{}/results/", seg(evaluation_id)),
            pagination,
        )
        .await
    }

    pub async fn evaluation_result_get(
        &self,
        evaluation_id: &str,
        result_id: &str,
    ) -> Result<EvaluationResult> {
        self.fetch(&format!(
            "/evaluations/{}/results/{}/",
            seg(evaluation_id),
            seg(result_id)
        ))
        .await
    }

    pub async fn evaluation_result_add(
        &self,
        evaluation_id: &str,
        result: &ResultCreateRequest,
    ) -> Result<EvaluationResult> {
        self.create(
            &format!("/evaluations/{}/results/", seg(evaluation_id)),
            result.to_payload()?,
        )
        .await
    }

    pub async fn evaluation_result_update(
        &self,
        evaluation_id: &str,
        result_id: &str,
        result: &ResultUpdateRequest,
    ) -> Result<EvaluationResult> {
        self.modify(
            &format!(
                "/evaluations/{}/results/{}/",
                seg(evaluation_id),
                seg(result_id)
            ),
            result.to_payload()?,
        )
        .await
    }

    pub async fn evaluation_result_delete(
        &self,
        evaluation_id: &str,
        result_id: &str,
    ) -> Result<()> {
        self.remove(&format!(
            "/evaluations/{}/results/{}/",
            seg(evaluation_id),
            seg(result_id)
        ))
        .await
    }

    /// Make the server-side table match `evaluation`, creating or updating its
    /// metrics and results in one call.
    pub async fn evaluation_synchronize(
        &self,
        evaluation: &EvaluationTableSyncRequest,
    ) -> Result<EvaluationTableSyncResponse> {
        self.create("/rpc/evaluation-synchronize/", evaluation.to_payload()?)
            .await
    }
}
