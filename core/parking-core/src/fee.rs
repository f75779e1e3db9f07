//! Fee model.
//!
//! A stay is billed as a count of full 24-hour blocks (overnight units) plus
//! the started hours of the final partial day. A stay of exactly N days bills
//! N overnight units and zero hours; it is not "hours since entry".

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::config::ClassPrices;
use crate::error::{ParkingError, Result};

/// Billable duration of a stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StayDuration {
    /// Elapsed hours, rounded up on any partial hour.
    pub total_hours: u64,
    pub overnight_count: u64,
    pub parking_hours: u64,
}

impl StayDuration {
    pub fn between(entry: NaiveDateTime, exit: NaiveDateTime) -> Result<Self> {
        if exit < entry {
            return Err(ParkingError::InvalidInterval);
        }
        let minutes = u64::try_from((exit - entry).num_minutes())
            .map_err(|_| ParkingError::InvalidInterval)?;
        let total_hours = minutes / 60 + u64::from(minutes % 60 > 0);
        Ok(Self {
            total_hours,
            overnight_count: total_hours / 24,
            parking_hours: total_hours % 24,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeBreakdown {
    pub parking_fee: u64,
    pub hit_fee: u64,
    pub overnight_fee: u64,
    pub total: u64,
}

impl FeeBreakdown {
    /// Fails with [`ParkingError::FeeOverflow`] when configured prices push
    /// any amount past `u64::MAX`.
    pub fn compute(duration: &StayDuration, hits: u32, prices: &ClassPrices) -> Result<Self> {
        let parking_fee = duration
            .parking_hours
            .checked_mul(prices.parking)
            .ok_or(ParkingError::FeeOverflow)?;
        let hit_fee = u64::from(hits)
            .checked_mul(prices.hit)
            .ok_or(ParkingError::FeeOverflow)?;
        let overnight_fee = duration
            .overnight_count
            .checked_mul(prices.overnight)
            .ok_or(ParkingError::FeeOverflow)?;
        let total = parking_fee
            .checked_add(hit_fee)
            .and_then(|sum| sum.checked_add(overnight_fee))
            .ok_or(ParkingError::FeeOverflow)?;
        Ok(Self {
            parking_fee,
            hit_fee,
            overnight_fee,
            total,
        })
    }
}

/// Fees are whole currency units; they are always shown with one decimal.
pub fn format_amount(amount: u64) -> String {
    format!("{}.0", amount)
}
