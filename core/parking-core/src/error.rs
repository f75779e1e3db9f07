//! Error types for parking-core operations.
//! Every variant is recoverable: callers report it and re-prompt.

use std::path::PathBuf;

use parking_protocol::{ErrorInfo, VehicleClass};

/// All errors that can occur while driving a parking session.
#[derive(Debug, thiserror::Error)]
pub enum ParkingError {
    // ─────────────────────────────────────────────────────────────────────
    // Lot Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("ParkingLot {dimension} cannot be less than {min} (got {value})")]
    SizeTooSmall {
        dimension: &'static str,
        value: usize,
        min: usize,
    },

    #[error("ParkingLot {dimension} cannot be more than {max} (got {value})")]
    SizeTooLarge {
        dimension: &'static str,
        value: usize,
        max: usize,
    },

    #[error("There are vehicles in the Parking Lot, you cannot change the space of the parking lot at the moment.")]
    CapacityConflict { occupied: usize },

    #[error("The parking lot hasn't been initialised. Please set up a space for the parking lot.")]
    NotInitialized,

    #[error("{}", lot_full_message(.class))]
    LotFull { class: Option<VehicleClass> },

    #[error("Invalid command! The parking is empty.")]
    EmptyLot,

    // ─────────────────────────────────────────────────────────────────────
    // Vehicle Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Vehicle {0} is already checked in")]
    DuplicateRegistration(String),

    #[error("The vehicle {0} is not present in the parking lot.")]
    UnknownVehicle(String),

    #[error("The vehicle {regn_id} is not at the checkout door. Please proceed to checkout door.")]
    NotAtDoor {
        regn_id: String,
        row: usize,
        col: usize,
    },

    #[error("Checkout datetime cannot be less than checkin datetime for the vehicle.")]
    InvalidInterval,

    #[error("The parking fee is too large to compute with the configured prices.")]
    FeeOverflow,

    #[error("Vehicle {0} has a checkout awaiting confirmation")]
    CheckoutPending(String),

    #[error("Vehicle {0} has no checkout awaiting confirmation")]
    NoPendingCheckout(String),

    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

fn lot_full_message(class: &Option<VehicleClass>) -> String {
    match class {
        Some(class) => format!(
            "Parking full for {}. Please come back later.",
            class.as_str().to_lowercase()
        ),
        None => "The parking is full. Please come back later.".to_string(),
    }
}

impl ParkingError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        ParkingError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Stable snake_case code carried over the wire protocol.
    pub fn code(&self) -> &'static str {
        match self {
            ParkingError::SizeTooSmall { .. } => "size_too_small",
            ParkingError::SizeTooLarge { .. } => "size_too_large",
            ParkingError::CapacityConflict { .. } => "capacity_conflict",
            ParkingError::NotInitialized => "not_initialized",
            ParkingError::LotFull { .. } => "lot_full",
            ParkingError::EmptyLot => "empty_lot",
            ParkingError::Validation { .. } => "validation",
            ParkingError::DuplicateRegistration(_) => "duplicate_registration",
            ParkingError::UnknownVehicle(_) => "unknown_vehicle",
            ParkingError::NotAtDoor { .. } => "not_at_door",
            ParkingError::InvalidInterval => "invalid_interval",
            ParkingError::FeeOverflow => "fee_overflow",
            ParkingError::CheckoutPending(_) => "checkout_pending",
            ParkingError::NoPendingCheckout(_) => "no_pending_checkout",
            ParkingError::ConfigMalformed { .. } => "config_malformed",
            ParkingError::Io { .. } => "io",
        }
    }
}

impl From<&ParkingError> for ErrorInfo {
    fn from(err: &ParkingError) -> Self {
        ErrorInfo::new(err.code(), err.to_string())
    }
}

impl From<ParkingError> for ErrorInfo {
    fn from(err: ParkingError) -> Self {
        ErrorInfo::from(&err)
    }
}

/// Convenience type alias for Results using ParkingError.
pub type Result<T> = std::result::Result<T, ParkingError>;
