//! Vehicles currently in the lot plus the append-only checkout log.

use std::collections::BTreeMap;

use parking_protocol::VehicleClass;

use crate::vehicle::{CheckoutRecord, Vehicle};

#[derive(Debug, Default)]
pub struct Registry {
    active: BTreeMap<String, Vehicle>,
    log: Vec<CheckoutRecord>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn contains(&self, regn_id: &str) -> bool {
        self.active.contains_key(regn_id)
    }

    pub fn get(&self, regn_id: &str) -> Option<&Vehicle> {
        self.active.get(regn_id)
    }

    pub(crate) fn get_mut(&mut self, regn_id: &str) -> Option<&mut Vehicle> {
        self.active.get_mut(regn_id)
    }

    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.active.values()
    }

    pub fn count_of(&self, class: VehicleClass) -> usize {
        self.active.values().filter(|v| v.class == class).count()
    }

    /// Bikes and motorbikes counted together; they share one pool.
    pub fn two_wheeler_count(&self) -> usize {
        self.active
            .values()
            .filter(|v| v.class.is_two_wheeler())
            .count()
    }

    pub(crate) fn insert(&mut self, vehicle: Vehicle) {
        self.active.insert(vehicle.regn_id.clone(), vehicle);
    }

    pub(crate) fn remove(&mut self, regn_id: &str) -> Option<Vehicle> {
        self.active.remove(regn_id)
    }

    pub(crate) fn append_record(&mut self, record: CheckoutRecord) {
        self.log.push(record);
    }

    /// Checkout records in the order they were confirmed.
    pub fn records(&self) -> &[CheckoutRecord] {
        &self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PriceTable;
    use crate::grid::Lot;
    use crate::validation::parse_timestamp;

    fn vehicle(class: VehicleClass, regn_id: &str, lot: &Lot) -> Vehicle {
        Vehicle::new(
            class,
            regn_id.to_string(),
            "model".to_string(),
            "grey".to_string(),
            parse_timestamp("2024-01-01", "09:00").expect("entry"),
            PriceTable::default().for_class(class),
            lot,
        )
    }

    #[test]
    fn counts_by_class_and_shared_pool() {
        let lot = Lot::new(9, 11).expect("lot");
        let mut registry = Registry::new();
        registry.insert(vehicle(VehicleClass::Bike, "BIKE01", &lot));
        registry.insert(vehicle(VehicleClass::Motorbike, "MOTO01", &lot));
        registry.insert(vehicle(VehicleClass::Car, "CAR001", &lot));

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.count_of(VehicleClass::Car), 1);
        assert_eq!(registry.count_of(VehicleClass::Truck), 0);
        assert_eq!(registry.two_wheeler_count(), 2);
        assert!(registry.contains("MOTO01"));

        assert!(registry.remove("MOTO01").is_some());
        assert_eq!(registry.two_wheeler_count(), 1);
        assert!(registry.remove("MOTO01").is_none());
    }

    #[test]
    fn log_keeps_insertion_order() {
        let mut registry = Registry::new();
        let at = parse_timestamp("2024-01-01", "09:00").expect("ts");
        for (regn_id, fee) in [("ZZZ999", 5), ("AAA111", 7)] {
            registry.append_record(CheckoutRecord {
                class: VehicleClass::Car,
                regn_id: regn_id.to_string(),
                entered_at: at,
                exited_at: at,
                fee,
            });
        }
        let ids: Vec<_> = registry.records().iter().map(|r| r.regn_id.as_str()).collect();
        assert_eq!(ids, vec!["ZZZ999", "AAA111"]);
    }
}
