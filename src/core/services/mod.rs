pub mod adjustment_service;
pub mod assignment_service;
pub mod category_service;
pub mod projection_service;
pub mod similarity_service;
pub mod summary_service;
pub mod transaction_service;

pub use adjustment_service::AdjustmentService;
pub use assignment_service::{AssignmentService, CategoryStats};
pub use category_service::CategoryService;
pub use projection_service::{ProjectedMonth, ProjectionService};
pub use similarity_service::{
    CategorizationFlow, CategoryStatusFilter, DateRangeFilter, FlowOutcome, SimilarityService,
};
pub use summary_service::{
    DailyBucket, MonthKey, MonthlyBucket, MonthlyTotals, SummaryService, WeeklyBucket,
};
pub use transaction_service::TransactionService;

use crate::errors::EngineError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("{0}")]
    Invalid(String),
}
