//! Evaluation tables, their metrics and results, and bulk synchronization.

mod metric;
mod result;
mod sync;
mod table;

pub use metric::{Metric, MetricCreateRequest, MetricUpdateRequest};
pub use result::{EvaluatedOn, MetricValues, Result, ResultCreateRequest, ResultUpdateRequest};
pub use sync::{
    EvaluationTableSyncRequest, EvaluationTableSyncResponse, MetricSyncRequest,
    MetricSyncResponse, ResultSyncRequest, ResultSyncResponse,
};
pub use table::{EvaluationTable, EvaluationTableCreateRequest, EvaluationTableUpdateRequest};
