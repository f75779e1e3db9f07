//! Checked-in vehicles and the immutable records left behind at checkout.

use chrono::NaiveDateTime;
use parking_protocol::VehicleClass;
use serde::Serialize;

use crate::config::ClassPrices;
use crate::fee::{FeeBreakdown, StayDuration};
use crate::error::Result;
use crate::grid::{Cell, Lot, Position};

/// Where a vehicle is in its trip through the lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AtDoor,
    Moving,
    AtCheckoutAnchor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vehicle {
    pub class: VehicleClass,
    pub regn_id: String,
    pub model: String,
    pub colour: String,
    pub entered_at: NaiveDateTime,
    /// Set while a checkout quote awaits confirmation.
    pub exited_at: Option<NaiveDateTime>,
    pub position: Position,
    /// Cell the vehicle covers, restored when it moves away.
    pub standing_on: Cell,
    pub hits: u32,
    pub prices: ClassPrices,
}

impl Vehicle {
    pub fn new(
        class: VehicleClass,
        regn_id: String,
        model: String,
        colour: String,
        entered_at: NaiveDateTime,
        prices: ClassPrices,
        lot: &Lot,
    ) -> Self {
        Self {
            class,
            regn_id,
            model,
            colour,
            entered_at,
            exited_at: None,
            position: lot.entry_door(),
            standing_on: Cell::EntryExitDoor,
            hits: 0,
            prices,
        }
    }

    pub fn phase(&self, lot: &Lot) -> Phase {
        if self.position == lot.entry_door() {
            Phase::AtDoor
        } else if self.position == lot.checkout_anchor() {
            Phase::AtCheckoutAnchor
        } else {
            Phase::Moving
        }
    }

    pub fn checkout_pending(&self) -> bool {
        self.exited_at.is_some()
    }

    pub fn quote(&self, exit: NaiveDateTime) -> Result<FeeQuote> {
        let duration = StayDuration::between(self.entered_at, exit)?;
        Ok(FeeQuote {
            class: self.class,
            regn_id: self.regn_id.clone(),
            entered_at: self.entered_at,
            exited_at: exit,
            hits: self.hits,
            fee: FeeBreakdown::compute(&duration, self.hits, &self.prices)?,
            duration,
        })
    }
}

/// Fee shown to the driver before they accept it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeQuote {
    pub class: VehicleClass,
    pub regn_id: String,
    pub entered_at: NaiveDateTime,
    pub exited_at: NaiveDateTime,
    pub hits: u32,
    pub duration: StayDuration,
    pub fee: FeeBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutRecord {
    pub class: VehicleClass,
    pub regn_id: String,
    pub entered_at: NaiveDateTime,
    pub exited_at: NaiveDateTime,
    pub fee: u64,
}

impl From<&FeeQuote> for CheckoutRecord {
    fn from(quote: &FeeQuote) -> Self {
        Self {
            class: quote.class,
            regn_id: quote.regn_id.clone(),
            entered_at: quote.entered_at,
            exited_at: quote.exited_at,
            fee: quote.fee.total,
        }
    }
}
