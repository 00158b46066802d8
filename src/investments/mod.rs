// Module declarations
pub(crate) mod accrual;
pub(crate) mod investments_constants;
pub(crate) mod investments_errors;
pub(crate) mod investments_model;
pub(crate) mod investments_repository;
pub(crate) mod investments_service;

// Re-export the public interface
pub use accrual::{compound_by_minutes, diff_minutes, plan_redemption, RedemptionPlan};
pub use investments_constants::{
    POSITION_STATUS_ACTIVE, POSITION_STATUS_CLOSED, REDEMPTION_FEE_RATE,
};
pub use investments_model::{
    BuyRequest, InvestmentPositionDB, InvestmentProduct, InvestmentProductDB, PositionStatus,
    PositionView, ProductSeed, Redemption, RedemptionKind,
};
pub use investments_repository::InvestmentRepository;
pub use investments_service::InvestmentService;

// Re-export error types for convenience
pub use investments_errors::{InvestmentError, Result};
