//! Areas and tasks.

use super::{seg, AreaFilter, Client, Pagination, TaskFilter};
use crate::error::Result;
use crate::models::{
    Area, EvaluationTable, Model, Page, Paper, Task, TaskCreateRequest, TaskUpdateRequest,
};

impl Client {
    pub async fn area_list(
        &self,
        filter: &AreaFilter,
        pagination: Pagination,
    ) -> Result<Page<Area>> {
        self.fetch_filtered("/areas/", filter, pagination).await
    }

    pub async fn area_get(&self, area_id: &str) -> Result<Area> {
        self.fetch(&format!("/areas/{}/", seg(area_id))).await
    }

    /// Tasks belonging to an area.
    pub async fn area_task_list(
        &self,
        area_id: &str,
        pagination: Pagination,
    ) -> Result<Page<Task>> {
        self.fetch_listing(&format!("/areas/{}/tasks/", seg(area_id)), pagination)
            .await
    }

    /// Paginated list of tasks.
    pub async fn task_list(
        &self,
        filter: &TaskFilter,
        pagination: Pagination,
    ) -> Result<Page<Task>> {
        self.fetch_filtered("/tasks/", filter, pagination).await
    }

    pub async fn task_get(&self, task_id: &str) -> Result<Task> {
        self.fetch(&format!("/tasks/{}/", seg(task_id))).await
    }

    /// Create a task.
    pub async fn task_add(&self, task: &TaskCreateRequest) -> Result<Task> {
        self.create("/tasks/", task.to_payload()?).await
    }

    /// Update the fields set in `task`.
    pub async fn task_update(&self, task_id: &str, task: &TaskUpdateRequest) -> Result<Task> {
        self.modify(&format!("/tasks/{}/", seg(task_id)), task.to_payload()?)
            .await
    }

    pub async fn task_delete(&self, task_id: &str) -> Result<()> {
        self.remove(&format!("/tasks/{}/", seg(task_id))).await
    }

    /// Parent tasks of a task.
    pub async fn task_parent_list(
        &self,
        task_id: &str,
        pagination: Pagination,
    ) -> Result<Page<Task>> {
        self.fetch_listing(&format!("/tasks/{}/parents/", seg(task_id)), pagination)
            .await
    }

    /// Child tasks of a task.
    pub async fn task_child_list(
        &self,
        task_id: &str,
        pagination: Pagination,
    ) -> Result<Page<Task>> {
        self.fetch_listing(&format!("/tasks/{}/children/", seg(task_id)), pagination)
            .await
    }

    pub async fn task_paper_list(
        &self,
        task_id: &str,
        pagination: Pagination,
    ) -> Result<Page<Paper>> {
        self.fetch_listing(&format!("/tasks/{}/papers/", seg(task_id)), pagination)
            .await
    }

    /// Evaluation tables measuring a task.
    pub async fn task_evaluation_list(
        &self,
        task_id: &str,
        pagination: Pagination,
    ) -> Result<Page<EvaluationTable>> {
        self.fetch_listing(&format!("/tasks/{}/evaluations/", seg(task_id)), pagination)
            .await
    }
}
