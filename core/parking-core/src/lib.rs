//! # parking-core
//!
//! Core library for the parking lot simulator: the lot layout, the movement
//! rules that steer vehicles through it, and the fee model applied at
//! checkout.
//!
//! ## Design Principles
//!
//! - **Synchronous**: every operation is an in-memory computation.
//! - **Explicit state**: all state lives in a [`ParkingSession`] passed to
//!   each call; there are no globals.
//! - **All or nothing**: a failed operation leaves the session unchanged.
//!
//! ## Quick Start
//!
//! ```rust
//! use parking_core::{reduce, Outcome, ParkingSession, PriceTable};
//! use parking_protocol::Command;
//!
//! let mut session = ParkingSession::new(PriceTable::default());
//! let outcome = reduce(&mut session, Command::Init { width: 9, length: 11 }).unwrap();
//! assert!(matches!(outcome, Outcome::Initialized { .. }));
//! ```

pub mod config;
pub mod error;
pub mod fee;
pub mod grid;
pub mod movement;
pub mod reducer;
pub mod registry;
pub mod session;
pub mod validation;
pub mod vehicle;

pub use config::{load_config, ClassPrices, LotDefaults, ParkingConfig, PriceTable};
pub use error::{ParkingError, Result};
pub use fee::{format_amount, FeeBreakdown, StayDuration};
pub use grid::{Capacity, Cell, Lot, Position, WallKind};
pub use movement::{MoveOutcome, Obstacle, Refusal};
pub use reducer::{reduce, respond, Outcome};
pub use registry::Registry;
pub use session::{CheckIn, MoveReport, Occupancy, ParkingSession};
pub use vehicle::{CheckoutRecord, FeeQuote, Phase, Vehicle};
