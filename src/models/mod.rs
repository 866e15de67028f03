//! Typed request and response models for every API resource.

mod author;
mod conference;
mod dataset;
pub mod evaluation;
mod method;
mod page;
mod paper;
mod repository;
pub mod schema;
mod task;

pub use author::Author;
pub use conference::{Conference, Proceeding};
pub use dataset::{Dataset, DatasetCreateRequest, DatasetUpdateRequest};
pub use evaluation::{
    EvaluatedOn, EvaluationTable, EvaluationTableCreateRequest, EvaluationTableSyncRequest,
    EvaluationTableSyncResponse, EvaluationTableUpdateRequest, Metric, MetricCreateRequest,
    MetricSyncRequest, MetricSyncResponse, MetricUpdateRequest, MetricValues, Result,
    ResultCreateRequest, ResultSyncRequest, ResultSyncResponse, ResultUpdateRequest,
};
pub use method::Method;
pub use page::{page_number, Page};
pub use paper::{Paper, PaperRepo};
pub use repository::Repository;
pub use schema::Model;
pub use task::{Area, Task, TaskCreateRequest, TaskUpdateRequest};
