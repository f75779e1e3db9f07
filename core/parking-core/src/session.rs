//! Parking session orchestrator.
//!
//! Owns the lot, the registry and the occupancy counters, and sequences
//! check-in, moves and checkout. Every operation validates everything it
//! needs before mutating anything, so a failed call leaves the session
//! exactly as it was.

use parking_protocol::{Direction, VehicleClass};
use serde::Serialize;

use crate::config::PriceTable;
use crate::error::{ParkingError, Result};
use crate::grid::Lot;
use crate::movement::{step, MoveOutcome};
use crate::registry::Registry;
use crate::validation::{parse_timestamp, validate_regn_id};
use crate::vehicle::{CheckoutRecord, FeeQuote, Phase, Vehicle};

/// Empty and occupied slot counts. Always sum to the lot's total capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occupancy {
    pub empty: usize,
    pub occupied: usize,
}

/// Details entered at check-in, before validation.
#[derive(Debug, Clone)]
pub struct CheckIn {
    pub class: VehicleClass,
    pub regn_id: String,
    pub model: String,
    pub colour: String,
    pub entry_date: String,
    pub entry_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    pub outcome: MoveOutcome,
    pub message: Option<String>,
    pub phase: Phase,
    pub layout: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ParkingSession {
    lot: Option<Lot>,
    registry: Registry,
    occupancy: Option<Occupancy>,
    prices: PriceTable,
}

impl ParkingSession {
    pub fn new(prices: PriceTable) -> Self {
        Self {
            prices,
            ..Self::default()
        }
    }

    pub fn lot(&self) -> Option<&Lot> {
        self.lot.as_ref()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    /// `None` until a lot has been initialised.
    pub fn occupancy(&self) -> Option<Occupancy> {
        self.occupancy
    }

    /// Builds a new lot, replacing the current one. Refused while any
    /// vehicle is checked in.
    pub fn init_lot(&mut self, width: usize, length: usize) -> Result<&Lot> {
        let occupied = self.occupancy.map(|o| o.occupied).unwrap_or(0);
        if self.lot.is_some() && occupied > 0 {
            return Err(ParkingError::CapacityConflict { occupied });
        }
        let lot = Lot::new(width, length)?;
        let capacity = lot.capacity();
        tracing::info!(width, length, total = capacity.total, "Parking lot initialised");
        self.occupancy = Some(Occupancy {
            empty: capacity.total,
            occupied: 0,
        });
        Ok(self.lot.insert(lot))
    }

    pub fn render_lot(&self) -> Result<Vec<String>> {
        Ok(self.require_lot()?.render())
    }

    /// Remaining slots for `class`. Bikes and motorbikes draw on one pool;
    /// cars may take any spot not already taken.
    pub fn available_slots(&self, class: VehicleClass) -> Result<i64> {
        let capacity = self.require_lot()?.capacity();
        let (limit, used) = match class {
            VehicleClass::Truck => (capacity.truck, self.registry.count_of(VehicleClass::Truck)),
            VehicleClass::Bike | VehicleClass::Motorbike => {
                (capacity.bike, self.registry.two_wheeler_count())
            }
            VehicleClass::Car => (capacity.total, self.registry.len()),
        };
        Ok(limit as i64 - used as i64)
    }

    pub fn check_in(&mut self, request: CheckIn) -> Result<&Vehicle> {
        let occupancy = self.occupancy.ok_or(ParkingError::NotInitialized)?;
        let lot = self.lot.as_ref().ok_or(ParkingError::NotInitialized)?;
        if occupancy.empty == 0 {
            return Err(ParkingError::LotFull { class: None });
        }
        if self.available_slots(request.class)? <= 0 {
            return Err(ParkingError::LotFull {
                class: Some(request.class),
            });
        }
        let regn_id = validate_regn_id(&request.regn_id)?.to_string();
        if self.registry.contains(&regn_id) {
            return Err(ParkingError::DuplicateRegistration(regn_id));
        }
        let entered_at = parse_timestamp(&request.entry_date, &request.entry_time)?;

        let vehicle = Vehicle::new(
            request.class,
            regn_id.clone(),
            request.model,
            request.colour,
            entered_at,
            self.prices.for_class(request.class),
            lot,
        );
        self.registry.insert(vehicle);
        self.occupancy = Some(Occupancy {
            empty: occupancy.empty - 1,
            occupied: occupancy.occupied + 1,
        });
        tracing::info!(
            regn_id = %regn_id,
            class = %request.class,
            entered_at = %entered_at,
            "Vehicle checked in"
        );
        self.vehicle(&regn_id)
    }

    pub fn vehicle(&self, regn_id: &str) -> Result<&Vehicle> {
        self.registry
            .get(regn_id)
            .ok_or_else(|| ParkingError::UnknownVehicle(regn_id.to_string()))
    }

    /// Looks up a vehicle that is about to be steered or checked out.
    pub fn find_active(&self, regn_id: &str) -> Result<&Vehicle> {
        if self.lot.is_none() || self.registry.is_empty() {
            return Err(ParkingError::EmptyLot);
        }
        validate_regn_id(regn_id)?;
        self.vehicle(regn_id)
    }

    pub fn move_vehicle(&mut self, regn_id: &str, direction: Direction) -> Result<MoveReport> {
        if self.find_active(regn_id)?.checkout_pending() {
            return Err(ParkingError::CheckoutPending(regn_id.to_string()));
        }
        let (Some(lot), Some(vehicle)) = (self.lot.as_mut(), self.registry.get_mut(regn_id))
        else {
            return Err(ParkingError::UnknownVehicle(regn_id.to_string()));
        };
        let outcome = step(lot, vehicle, direction);
        Ok(MoveReport {
            message: outcome.message(vehicle.class),
            phase: vehicle.phase(lot),
            layout: lot.render(),
            outcome,
        })
    }

    /// Prices the stay and holds the exit time on the vehicle until the
    /// driver confirms or abandons. Calling again replaces the pending quote.
    pub fn checkout(&mut self, regn_id: &str, exit_date: &str, exit_time: &str) -> Result<FeeQuote> {
        let vehicle = self.find_active(regn_id)?;
        let lot = self.require_lot()?;
        if vehicle.phase(lot) != Phase::AtCheckoutAnchor {
            return Err(ParkingError::NotAtDoor {
                regn_id: regn_id.to_string(),
                row: vehicle.position.row,
                col: vehicle.position.col,
            });
        }
        let exit = parse_timestamp(exit_date, exit_time)?;
        let quote = vehicle.quote(exit)?;

        if let Some(vehicle) = self.registry.get_mut(regn_id) {
            vehicle.exited_at = Some(exit);
        }
        tracing::debug!(regn_id = %regn_id, total = quote.fee.total, "Checkout quoted");
        Ok(quote)
    }

    pub fn confirm_checkout(&mut self, regn_id: &str) -> Result<CheckoutRecord> {
        let vehicle = self.pending_vehicle(regn_id)?;
        let exit = vehicle
            .exited_at
            .ok_or_else(|| ParkingError::NoPendingCheckout(regn_id.to_string()))?;
        let record = CheckoutRecord::from(&vehicle.quote(exit)?);
        let occupancy = self.occupancy.ok_or(ParkingError::NotInitialized)?;

        let lot = self.lot.as_mut().ok_or(ParkingError::NotInitialized)?;
        let vehicle = self
            .registry
            .remove(regn_id)
            .ok_or_else(|| ParkingError::UnknownVehicle(regn_id.to_string()))?;
        lot.set(vehicle.position, vehicle.standing_on);
        self.registry.append_record(record.clone());
        self.occupancy = Some(Occupancy {
            empty: occupancy.empty + 1,
            occupied: occupancy.occupied - 1,
        });
        tracing::info!(
            regn_id = %record.regn_id,
            class = %record.class,
            fee = record.fee,
            "Vehicle checked out"
        );
        Ok(record)
    }

    /// Drops a pending quote; the vehicle stays checked in where it was.
    pub fn abandon_checkout(&mut self, regn_id: &str) -> Result<()> {
        self.pending_vehicle(regn_id)?;
        if let Some(vehicle) = self.registry.get_mut(regn_id) {
            vehicle.exited_at = None;
        }
        tracing::debug!(regn_id = %regn_id, "Checkout abandoned");
        Ok(())
    }

    pub fn checkout_records(&self) -> &[CheckoutRecord] {
        self.registry.records()
    }

    fn pending_vehicle(&self, regn_id: &str) -> Result<&Vehicle> {
        let vehicle = self.find_active(regn_id)?;
        if !vehicle.checkout_pending() {
            return Err(ParkingError::NoPendingCheckout(regn_id.to_string()));
        }
        Ok(vehicle)
    }

    fn require_lot(&self) -> Result<&Lot> {
        self.lot.as_ref().ok_or(ParkingError::NotInitialized)
    }
}
