//! Lot layout.
//!
//! The layout is fully determined by `(width, length)`: `width` rows and
//! `length` columns, walled on every side, with a driveway ring inside the
//! walls, a pillar row next to each driveway ring, and alternating
//! spot/driveway columns in between.
//!
//! ```text
//! |------|      row 0          end wall
//! D~~~~~~|      row 1          entry door + driveway
//! |P~P~P~|      row 2          pillar row
//! |.~.~.~|      rows 3..w-4    spots on odd columns
//! |P~P~P~|      row w-3        pillar row
//! |~~~~~~D      row w-2        driveway + exit door
//! |------|      row w-1        end wall
//! ```

use parking_protocol::{Direction, VehicleClass};
use serde::Serialize;

use crate::error::Result;
use crate::validation::check_dimension;

/// Rows used by walls, driveways and pillars rather than spots.
const NON_SPOT_ROWS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WallKind {
    /// Columns 0 and `length-1`.
    Side,
    /// Rows 0 and `width-1`.
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum Cell {
    Wall(WallKind),
    EntryExitDoor,
    Pillar,
    Spot,
    Driveway,
    Vehicle(VehicleClass),
}

impl Cell {
    pub fn glyph(&self) -> char {
        match self {
            Cell::Wall(WallKind::Side) => '|',
            Cell::Wall(WallKind::End) => '-',
            Cell::EntryExitDoor => 'D',
            Cell::Pillar => 'P',
            Cell::Spot => '.',
            Cell::Driveway => '~',
            Cell::Vehicle(class) => class.marker(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The neighbouring position, or `None` when the step leaves the
    /// non-negative quadrant.
    pub fn step(&self, direction: Direction) -> Option<Position> {
        let (d_row, d_col) = direction.delta();
        let row = self.row.checked_add_signed(d_row as isize)?;
        let col = self.col.checked_add_signed(d_col as isize)?;
        Some(Position { row, col })
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Slot counts derived from the lot dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capacity {
    pub truck: usize,
    /// Shared by bikes and motorbikes.
    pub bike: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lot {
    width: usize,
    length: usize,
    cells: Vec<Cell>,
}

impl Lot {
    pub fn new(width: usize, length: usize) -> Result<Self> {
        check_dimension("length", length)?;
        check_dimension("width", width)?;
        let cells = (0..width)
            .flat_map(|row| (0..length).map(move |col| classify(row, col, width, length)))
            .collect();
        Ok(Self {
            width,
            length,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn entry_door(&self) -> Position {
        Position::new(1, 0)
    }

    pub fn exit_door(&self) -> Position {
        Position::new(self.width - 2, self.length - 1)
    }

    /// The driveway cell next to the exit door; checkout starts here.
    pub fn checkout_anchor(&self) -> Position {
        Position::new(self.width - 2, self.length - 2)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.width && pos.col < self.length
    }

    pub fn get(&self, pos: Position) -> Option<Cell> {
        if self.contains(pos) {
            Some(self.cells[pos.row * self.length + pos.col])
        } else {
            None
        }
    }

    pub(crate) fn set(&mut self, pos: Position, cell: Cell) {
        if self.contains(pos) {
            self.cells[pos.row * self.length + pos.col] = cell;
        }
    }

    pub fn capacity(&self) -> Capacity {
        let spot_rows = self.width - NON_SPOT_ROWS;
        Capacity {
            truck: spot_rows,
            bike: spot_rows,
            total: spot_rows * ((self.length - 1) / 2),
        }
    }

    /// Trucks park only in the spot column next to the entry side.
    pub fn truck_spot_column(&self) -> usize {
        1
    }

    /// Bikes and motorbikes park only in the last spot column before the
    /// exit side.
    pub fn bike_spot_column(&self) -> usize {
        self.length - if self.length % 2 == 0 { 3 } else { 2 }
    }

    /// Whether `class` may stand on `pos`. Driveways are open to every
    /// class; spots are restricted by column for trucks and two-wheelers.
    pub fn is_eligible(&self, class: VehicleClass, pos: Position) -> bool {
        match self.get(pos) {
            Some(Cell::Driveway) => true,
            Some(Cell::Spot) => match class {
                VehicleClass::Truck => pos.col == self.truck_spot_column(),
                VehicleClass::Bike | VehicleClass::Motorbike => {
                    pos.col == self.bike_spot_column()
                }
                VehicleClass::Car => true,
            },
            _ => false,
        }
    }

    /// One line per row, top to bottom.
    pub fn render(&self) -> Vec<String> {
        self.cells
            .chunks(self.length)
            .map(|row| row.iter().map(Cell::glyph).collect())
            .collect()
    }
}

fn classify(row: usize, col: usize, width: usize, length: usize) -> Cell {
    if col == 0 || col == length - 1 {
        if (row == 1 && col == 0) || (row == width - 2 && col == length - 1) {
            return Cell::EntryExitDoor;
        }
        return Cell::Wall(WallKind::Side);
    }
    if row == 0 || row == width - 1 {
        Cell::Wall(WallKind::End)
    } else if row == 1 || row == width - 2 {
        Cell::Driveway
    } else if col % 2 == 0 {
        Cell::Driveway
    } else if row == 2 || row == width - 3 {
        Cell::Pillar
    } else {
        Cell::Spot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_minimum_lot() {
        let lot = Lot::new(7, 7).expect("lot");
        assert_eq!(
            lot.render(),
            vec![
                "|-----|", "D~~~~~|", "|P~P~P|", "|.~.~.|", "|P~P~P|", "|~~~~~D", "|-----|",
            ]
        );
    }

    #[test]
    fn renders_even_length_lot() {
        let lot = Lot::new(8, 10).expect("lot");
        assert_eq!(
            lot.render(),
            vec![
                "|--------|",
                "D~~~~~~~~|",
                "|P~P~P~P~|",
                "|.~.~.~.~|",
                "|.~.~.~.~|",
                "|P~P~P~P~|",
                "|~~~~~~~~D",
                "|--------|",
            ]
        );
    }

    #[test]
    fn every_size_has_exact_shape_and_two_doors() {
        for width in 7..=14 {
            for length in 7..=14 {
                let lot = Lot::new(width, length).expect("lot");
                let lines = lot.render();
                assert_eq!(lines.len(), width);
                assert!(lines.iter().all(|line| line.chars().count() == length));
                let doors = lines
                    .iter()
                    .flat_map(|line| line.chars())
                    .filter(|&c| c == 'D')
                    .count();
                assert_eq!(doors, 2, "{}x{}", width, length);
                assert_eq!(lot.get(lot.entry_door()), Some(Cell::EntryExitDoor));
                assert_eq!(lot.get(lot.exit_door()), Some(Cell::EntryExitDoor));
                assert_eq!(lot.get(lot.checkout_anchor()), Some(Cell::Driveway));
            }
        }
    }

    #[test]
    fn capacity_matches_spot_cells() {
        for (width, length) in [(7, 7), (9, 11), (8, 10), (12, 8)] {
            let lot = Lot::new(width, length).expect("lot");
            let spots = lot
                .render()
                .iter()
                .flat_map(|line| line.chars())
                .filter(|&c| c == '.')
                .count();
            let capacity = lot.capacity();
            assert_eq!(capacity.total, spots);
            assert_eq!(capacity.truck, width - 6);
            assert_eq!(capacity.bike, capacity.truck);
        }
    }

    #[test]
    fn rejects_small_dimensions() {
        assert!(Lot::new(6, 7).is_err());
        assert!(Lot::new(7, 6).is_err());
    }

    #[test]
    fn class_spot_columns() {
        let odd = Lot::new(9, 11).expect("lot");
        assert_eq!(odd.bike_spot_column(), 9);
        let even = Lot::new(9, 10).expect("lot");
        assert_eq!(even.bike_spot_column(), 7);
        assert_eq!(even.get(Position::new(3, 7)), Some(Cell::Spot));

        let spot_mid = Position::new(3, 3);
        assert!(odd.is_eligible(VehicleClass::Car, spot_mid));
        assert!(!odd.is_eligible(VehicleClass::Truck, spot_mid));
        assert!(!odd.is_eligible(VehicleClass::Bike, spot_mid));
        assert!(odd.is_eligible(VehicleClass::Truck, Position::new(3, 1)));
        assert!(odd.is_eligible(VehicleClass::Motorbike, Position::new(3, 9)));
        assert!(odd.is_eligible(VehicleClass::Truck, Position::new(3, 2)));
        assert!(!odd.is_eligible(VehicleClass::Car, Position::new(2, 1)));
    }

    #[test]
    fn step_off_grid_is_none() {
        assert_eq!(Position::new(1, 0).step(Direction::Left), None);
        assert_eq!(
            Position::new(1, 0).step(Direction::Right),
            Some(Position::new(1, 1))
        );
        assert_eq!(Position::new(0, 3).step(Direction::Up), None);
    }
}
