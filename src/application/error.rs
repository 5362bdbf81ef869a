use thiserror::Error;

use crate::domain::{EligibilityError, ProductId};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Reward not found: {0}")]
    RewardNotFound(i64),

    #[error("Patient not found: {0}")]
    PatientNotFound(i64),

    #[error("Insufficient points: you need {shortfall} more points (balance {balance}, required {required})")]
    InsufficientPoints {
        balance: i64,
        required: i64,
        shortfall: i64,
    },

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Registration refused: {0}")]
    Ineligible(#[from] EligibilityError),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
