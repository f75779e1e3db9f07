//! Maps protocol commands onto session operations.
//!
//! `reduce` is the only entry point the I/O layer needs: it takes one
//! command, applies it to the session, and returns either a typed outcome or
//! the error that left the session untouched.

use parking_protocol::{Command, ErrorInfo, Response, VehicleClass};
use serde::Serialize;

use crate::error::Result;
use crate::grid::Capacity;
use crate::session::{CheckIn, MoveReport, Occupancy, ParkingSession};
use crate::vehicle::{CheckoutRecord, FeeQuote, Vehicle};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
#[allow(clippy::large_enum_variant)]
pub enum Outcome {
    Initialized {
        capacity: Capacity,
        occupancy: Occupancy,
        layout: Vec<String>,
    },
    Layout {
        layout: Vec<String>,
    },
    Status {
        occupancy: Option<Occupancy>,
        vehicles: Vec<Vehicle>,
    },
    Slots {
        class: VehicleClass,
        available: i64,
    },
    CheckedIn {
        vehicle: Vehicle,
        occupancy: Option<Occupancy>,
    },
    Moved {
        report: MoveReport,
    },
    Quoted {
        quote: FeeQuote,
    },
    CheckedOut {
        record: CheckoutRecord,
        occupancy: Option<Occupancy>,
    },
    CheckoutAbandoned {
        regn_id: String,
    },
    FeeLog {
        records: Vec<CheckoutRecord>,
    },
}

pub fn reduce(session: &mut ParkingSession, command: Command) -> Result<Outcome> {
    match command {
        Command::Init { width, length } => {
            let lot = session.init_lot(width, length)?;
            let capacity = lot.capacity();
            let layout = lot.render();
            Ok(Outcome::Initialized {
                capacity,
                occupancy: Occupancy {
                    empty: capacity.total,
                    occupied: 0,
                },
                layout,
            })
        }
        Command::View => Ok(Outcome::Layout {
            layout: session.render_lot()?,
        }),
        Command::Status => Ok(Outcome::Status {
            occupancy: session.occupancy(),
            vehicles: session.registry().vehicles().cloned().collect(),
        }),
        Command::Slots { class } => Ok(Outcome::Slots {
            class,
            available: session.available_slots(class)?,
        }),
        Command::CheckIn {
            class,
            regn_id,
            model,
            colour,
            entry_date,
            entry_time,
        } => {
            let vehicle = session
                .check_in(CheckIn {
                    class,
                    regn_id,
                    model,
                    colour,
                    entry_date,
                    entry_time,
                })?
                .clone();
            Ok(Outcome::CheckedIn {
                vehicle,
                occupancy: session.occupancy(),
            })
        }
        Command::Move { regn_id, direction } => Ok(Outcome::Moved {
            report: session.move_vehicle(&regn_id, direction)?,
        }),
        Command::Checkout {
            regn_id,
            exit_date,
            exit_time,
        } => Ok(Outcome::Quoted {
            quote: session.checkout(&regn_id, &exit_date, &exit_time)?,
        }),
        Command::ConfirmCheckout { regn_id } => {
            let record = session.confirm_checkout(&regn_id)?;
            Ok(Outcome::CheckedOut {
                record,
                occupancy: session.occupancy(),
            })
        }
        Command::AbandonCheckout { regn_id } => {
            session.abandon_checkout(&regn_id)?;
            Ok(Outcome::CheckoutAbandoned { regn_id })
        }
        Command::FeeLog => Ok(Outcome::FeeLog {
            records: session.checkout_records().to_vec(),
        }),
    }
}

/// Applies `command` and wraps the result in a wire response.
pub fn respond(session: &mut ParkingSession, command: Command) -> Response {
    let name = command.name();
    match reduce(session, command) {
        Ok(outcome) => match serde_json::to_value(&outcome) {
            Ok(data) => Response::ok(data),
            Err(err) => Response::error("internal", format!("Failed to encode outcome: {}", err)),
        },
        Err(err) => {
            tracing::debug!(command = name, code = err.code(), error = %err, "Command rejected");
            Response::error_with_info(ErrorInfo::from(&err))
        }
    }
}
