//! Command and response types for the parking lot simulator.
//!
//! This crate is shared by the core and its clients so both sides agree on
//! the shape of a command. The core remains the authority on validation:
//! fields like registration ids and timestamps travel as raw strings and are
//! checked when the command is applied.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The four vehicle classes the lot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    Bike,
    Motorbike,
    Car,
    Truck,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 4] = [
        VehicleClass::Bike,
        VehicleClass::Motorbike,
        VehicleClass::Car,
        VehicleClass::Truck,
    ];

    /// Display name, as shown in quotes and the fee log.
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleClass::Bike => "Bike",
            VehicleClass::Motorbike => "Motorbike",
            VehicleClass::Car => "Car",
            VehicleClass::Truck => "Truck",
        }
    }

    /// Single-letter marker drawn on the grid where the vehicle stands.
    pub fn marker(&self) -> char {
        match self {
            VehicleClass::Bike => 'B',
            VehicleClass::Motorbike => 'M',
            VehicleClass::Car => 'C',
            VehicleClass::Truck => 'T',
        }
    }

    /// Case-insensitive parse of a user-typed class name.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(value))
    }

    /// Bikes and motorbikes share one pool of exit-side spots.
    pub fn is_two_wheeler(&self) -> bool {
        matches!(self, VehicleClass::Bike | VehicleClass::Motorbike)
    }
}

impl std::fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Row and column offsets for one step.
    pub fn delta(&self) -> (i64, i64) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// A key typed while steering a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKey {
    Step(Direction),
    Stop,
}

impl MoveKey {
    /// Parses the `w`/`a`/`s`/`d`/`q` keys, case-insensitive.
    pub fn parse(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "w" => Some(MoveKey::Step(Direction::Up)),
            "s" => Some(MoveKey::Step(Direction::Down)),
            "a" => Some(MoveKey::Step(Direction::Left)),
            "d" => Some(MoveKey::Step(Direction::Right)),
            "q" => Some(MoveKey::Stop),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Init {
        width: usize,
        length: usize,
    },
    View,
    Status,
    Slots {
        class: VehicleClass,
    },
    CheckIn {
        class: VehicleClass,
        regn_id: String,
        model: String,
        colour: String,
        entry_date: String,
        entry_time: String,
    },
    Move {
        regn_id: String,
        direction: Direction,
    },
    Checkout {
        regn_id: String,
        exit_date: String,
        exit_time: String,
    },
    ConfirmCheckout {
        regn_id: String,
    },
    AbandonCheckout {
        regn_id: String,
    },
    FeeLog,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Init { .. } => "init",
            Command::View => "view",
            Command::Status => "status",
            Command::Slots { .. } => "slots",
            Command::CheckIn { .. } => "check_in",
            Command::Move { .. } => "move",
            Command::Checkout { .. } => "checkout",
            Command::ConfirmCheckout { .. } => "confirm_checkout",
            Command::AbandonCheckout { .. } => "abandon_checkout",
            Command::FeeLog => "fee_log",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl Response {
    pub fn ok(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(ErrorInfo::new(code, message)),
        }
    }

    pub fn error_with_info(error: ErrorInfo) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Parses one JSON line into a command, mapping parse failures to the
/// `invalid_command` error the core would otherwise report.
pub fn parse_command(line: &str) -> Result<Command, ErrorInfo> {
    serde_json::from_str(line)
        .map_err(|err| ErrorInfo::new("invalid_command", format!("Invalid command: {}", err)))
}
