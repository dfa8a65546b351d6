use crate::domain::model::Frequency;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigError { field: String, message: String },

    #[error("Validation failed for {field}: {reason}")]
    ValidationError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid reference: {reason}")]
    ReferenceError { reason: String },

    #[error("Plan holds {count} sessions but frequency {frequency} allows at most {max}")]
    CapacityError {
        count: usize,
        max: usize,
        frequency: Frequency,
    },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Storage operation failed: {message}")]
    StorageError { message: String },
}

pub type Result<T> = std::result::Result<T, PlanError>;
