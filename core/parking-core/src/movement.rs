//! Single-step movement rules.
//!
//! A step either commits (the vehicle moves one cell), records a hit
//! (walls, pillars and other vehicles; the vehicle stays put and its hit
//! count grows by one), or is refused without penalty (doors, leaving the
//! grid, spots reserved for another class).

use parking_protocol::{Direction, VehicleClass};
use serde::Serialize;

use crate::grid::{Cell, Lot, Position};
use crate::vehicle::Vehicle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Obstacle {
    Wall,
    Pillar,
    Vehicle,
}

impl Obstacle {
    fn describe(&self) -> &'static str {
        match self {
            Obstacle::Wall => "the wall",
            Obstacle::Pillar => "the pillar",
            Obstacle::Vehicle => "a vehicle",
        }
    }

    /// Bikes are warned; every other class is told a damage fee applies.
    pub fn message(&self, class: VehicleClass) -> String {
        match class {
            VehicleClass::Bike => format!("You have hit {}!", self.describe()),
            _ => format!(
                "You have hit {}, there will be a damage fee!",
                self.describe()
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Refusal {
    ExitWithoutCheckout,
    TruckSpotReserved,
    TwoWheelerSpotReserved,
}

impl Refusal {
    pub fn message(&self) -> &'static str {
        match self {
            Refusal::ExitWithoutCheckout => "You cannot exit the parking lot without checkout.",
            Refusal::TruckSpotReserved => "You cannot park a truck in the parking lot anywhere except the parking spots near the entry.",
            Refusal::TwoWheelerSpotReserved => "You cannot park a bike or motorbike in the parking lot anywhere except the parking spots near the exit.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum MoveOutcome {
    Committed { from: Position, to: Position },
    Hit { obstacle: Obstacle, hits: u32 },
    Refused { reason: Refusal },
}

impl MoveOutcome {
    /// Text shown to the driver, if any. Committed moves are silent.
    pub fn message(&self, class: VehicleClass) -> Option<String> {
        match self {
            MoveOutcome::Committed { .. } => None,
            MoveOutcome::Hit { obstacle, .. } => Some(obstacle.message(class)),
            MoveOutcome::Refused { reason } => Some(reason.message().to_string()),
        }
    }
}

/// Applies one step to `vehicle`, updating both the vehicle and the lot.
pub fn step(lot: &mut Lot, vehicle: &mut Vehicle, direction: Direction) -> MoveOutcome {
    let target = vehicle.position.step(direction);
    let Some((to, cell)) = target.and_then(|pos| lot.get(pos).map(|cell| (pos, cell))) else {
        return MoveOutcome::Refused {
            reason: Refusal::ExitWithoutCheckout,
        };
    };

    let obstacle = match cell {
        Cell::EntryExitDoor => {
            return MoveOutcome::Refused {
                reason: Refusal::ExitWithoutCheckout,
            }
        }
        Cell::Wall(_) => Some(Obstacle::Wall),
        Cell::Pillar => Some(Obstacle::Pillar),
        Cell::Vehicle(_) => Some(Obstacle::Vehicle),
        Cell::Spot | Cell::Driveway => None,
    };
    if let Some(obstacle) = obstacle {
        vehicle.hits += 1;
        tracing::warn!(
            regn_id = %vehicle.regn_id,
            obstacle = ?obstacle,
            at = %to,
            hits = vehicle.hits,
            "Vehicle collision"
        );
        return MoveOutcome::Hit {
            obstacle,
            hits: vehicle.hits,
        };
    }

    if !lot.is_eligible(vehicle.class, to) {
        let reason = if vehicle.class == VehicleClass::Truck {
            Refusal::TruckSpotReserved
        } else {
            Refusal::TwoWheelerSpotReserved
        };
        return MoveOutcome::Refused { reason };
    }

    let from = vehicle.position;
    lot.set(from, vehicle.standing_on);
    vehicle.standing_on = cell;
    lot.set(to, Cell::Vehicle(vehicle.class));
    vehicle.position = to;
    tracing::debug!(regn_id = %vehicle.regn_id, %from, %to, "Vehicle moved");
    MoveOutcome::Committed { from, to }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PriceTable;
    use crate::validation::parse_timestamp;
    use Direction::{Down, Left, Right, Up};

    fn spawn(class: VehicleClass, lot: &Lot) -> Vehicle {
        Vehicle::new(
            class,
            "TEST01".to_string(),
            "model".to_string(),
            "white".to_string(),
            parse_timestamp("2024-01-01", "09:00").expect("entry"),
            PriceTable::default().for_class(class),
            lot,
        )
    }

    fn drive(lot: &mut Lot, vehicle: &mut Vehicle, steps: &[Direction]) -> Vec<MoveOutcome> {
        steps.iter().map(|&d| step(lot, vehicle, d)).collect()
    }

    #[test]
    fn committed_move_swaps_symbols() {
        let mut lot = Lot::new(9, 11).expect("lot");
        let mut car = spawn(VehicleClass::Car, &lot);

        let outcome = step(&mut lot, &mut car, Right);
        assert_eq!(
            outcome,
            MoveOutcome::Committed {
                from: Position::new(1, 0),
                to: Position::new(1, 1)
            }
        );
        assert_eq!(lot.get(Position::new(1, 0)), Some(Cell::EntryExitDoor));
        assert_eq!(lot.get(Position::new(1, 1)), Some(Cell::Vehicle(VehicleClass::Car)));
        assert_eq!(car.standing_on, Cell::Driveway);

        step(&mut lot, &mut car, Right);
        assert_eq!(lot.get(Position::new(1, 1)), Some(Cell::Driveway));
        assert_eq!(lot.render()[1], "D~C~~~~~~~|");
    }

    #[test]
    fn door_and_off_grid_are_refused_without_hit() {
        let mut lot = Lot::new(9, 11).expect("lot");
        let mut car = spawn(VehicleClass::Car, &lot);
        assert_eq!(
            step(&mut lot, &mut car, Left),
            MoveOutcome::Refused {
                reason: Refusal::ExitWithoutCheckout
            }
        );

        step(&mut lot, &mut car, Right);
        assert_eq!(
            step(&mut lot, &mut car, Left),
            MoveOutcome::Refused {
                reason: Refusal::ExitWithoutCheckout
            }
        );
        assert_eq!(car.hits, 0);
        assert_eq!(car.position, Position::new(1, 1));
    }

    #[test]
    fn collisions_add_one_hit_and_stay_put() {
        let mut lot = Lot::new(9, 11).expect("lot");
        let mut car = spawn(VehicleClass::Car, &lot);
        step(&mut lot, &mut car, Right);

        let before = lot.clone();
        let outcomes = drive(&mut lot, &mut car, &[Up, Down, Up]);
        assert_eq!(
            outcomes,
            vec![
                MoveOutcome::Hit {
                    obstacle: Obstacle::Wall,
                    hits: 1
                },
                MoveOutcome::Hit {
                    obstacle: Obstacle::Pillar,
                    hits: 2
                },
                MoveOutcome::Hit {
                    obstacle: Obstacle::Wall,
                    hits: 3
                },
            ]
        );
        assert_eq!(car.position, Position::new(1, 1));
        assert_eq!(lot, before);
    }

    #[test]
    fn hitting_another_vehicle() {
        let mut lot = Lot::new(9, 11).expect("lot");
        let mut first = spawn(VehicleClass::Car, &lot);
        let mut second = spawn(VehicleClass::Truck, &lot);
        step(&mut lot, &mut first, Right);

        let outcome = step(&mut lot, &mut second, Right);
        assert_eq!(
            outcome,
            MoveOutcome::Hit {
                obstacle: Obstacle::Vehicle,
                hits: 1
            }
        );
        assert_eq!(
            outcome.message(VehicleClass::Truck).as_deref(),
            Some("You have hit a vehicle, there will be a damage fee!")
        );
        assert_eq!(second.position, Position::new(1, 0));
    }

    #[test]
    fn only_bikes_skip_the_damage_fee_warning() {
        assert_eq!(
            Obstacle::Pillar.message(VehicleClass::Bike),
            "You have hit the pillar!"
        );
        assert_eq!(
            Obstacle::Wall.message(VehicleClass::Motorbike),
            "You have hit the wall, there will be a damage fee!"
        );
    }

    #[test]
    fn truck_spots_are_column_one_only() {
        let mut lot = Lot::new(9, 11).expect("lot");
        let mut truck = spawn(VehicleClass::Truck, &lot);
        // (1,0) -> (1,2) -> (2,2) -> (3,2), next to spots at (3,1) and (3,3)
        drive(&mut lot, &mut truck, &[Right, Right, Down, Down]);
        assert_eq!(truck.position, Position::new(3, 2));

        assert_eq!(
            step(&mut lot, &mut truck, Right),
            MoveOutcome::Refused {
                reason: Refusal::TruckSpotReserved
            }
        );
        assert_eq!(truck.hits, 0);

        assert!(matches!(
            step(&mut lot, &mut truck, Left),
            MoveOutcome::Committed { .. }
        ));
        assert_eq!(truck.position, Position::new(3, 1));
        assert_eq!(truck.standing_on, Cell::Spot);
        assert_eq!(lot.render()[3], "|T~.~.~.~.|");
    }

    #[test]
    fn two_wheelers_park_near_exit_only() {
        let mut lot = Lot::new(9, 11).expect("lot");
        let mut bike = spawn(VehicleClass::Motorbike, &lot);
        drive(&mut lot, &mut bike, &[Right, Right, Down, Down]);
        assert_eq!(
            step(&mut lot, &mut bike, Left),
            MoveOutcome::Refused {
                reason: Refusal::TwoWheelerSpotReserved
            }
        );

        let mut lot = Lot::new(9, 11).expect("lot");
        let mut bike = spawn(VehicleClass::Bike, &lot);
        let steps = [Right; 8].into_iter().chain([Down, Down, Right]).collect::<Vec<_>>();
        let outcomes = drive(&mut lot, &mut bike, &steps);
        assert!(outcomes
            .iter()
            .all(|o| matches!(o, MoveOutcome::Committed { .. })));
        assert_eq!(bike.position, Position::new(3, 9));
    }

    #[test]
    fn cars_park_anywhere() {
        let mut lot = Lot::new(9, 11).expect("lot");
        let mut car = spawn(VehicleClass::Car, &lot);
        drive(&mut lot, &mut car, &[Right, Right, Right, Right, Down, Down]);
        assert!(matches!(
            step(&mut lot, &mut car, Right),
            MoveOutcome::Committed { .. }
        ));
        assert_eq!(car.position, Position::new(3, 5));
        assert_eq!(car.hits, 0);
    }

    #[test]
    fn leaving_a_spot_restores_it() {
        let mut lot = Lot::new(9, 11).expect("lot");
        let mut car = spawn(VehicleClass::Car, &lot);
        drive(&mut lot, &mut car, &[Right, Right, Down, Down, Left, Right]);
        assert_eq!(car.position, Position::new(3, 2));
        assert_eq!(lot.get(Position::new(3, 1)), Some(Cell::Spot));
        assert_eq!(car.standing_on, Cell::Driveway);
    }
}
