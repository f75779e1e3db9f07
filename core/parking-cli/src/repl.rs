//! Interactive console loop.
//!
//! Each top-level command opens a short dialogue: fields are asked for one
//! at a time and re-asked until valid, then the collected values are sent
//! through [`reduce`] as a single command. End of input ends the session
//! quietly, whatever dialogue was open.

use std::io::{self, BufRead, Write};

use parking_core::validation::{
    parse_date, parse_dimension, parse_time, validate_regn_id, MINIMUM_SIZE,
};
use parking_core::{reduce, Outcome, ParkingError, ParkingSession, Phase};
use parking_protocol::{Command, MoveKey, VehicleClass};

use crate::render::{self, main_prompt};

const BACK_TO_MENU: &str = "Taking you back to main menu.";
const INVALID_DETAIL: &str = "Invalid detail, please enter detail again!";
const PRESS_ANY_KEY: &str = "Press any key to return to parkinglot menu";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// `?` for dialogue steps: end of input quits the whole loop.
macro_rules! read_or_quit {
    ($repl:expr) => {
        match $repl.read_line()? {
            Some(line) => line,
            None => return Ok(Flow::Quit),
        }
    };
}

pub struct Repl<R, W> {
    session: ParkingSession,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(session: ParkingSession, input: R, output: W) -> Self {
        Self {
            session,
            input,
            output,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "{}", render::BANNER)?;
        writeln!(self.output)?;
        self.show_main_prompt()?;

        while let Some(line) = self.read_line()? {
            tracing::debug!(command = %line, "Prompt command");
            let flow = match line.to_lowercase().as_str() {
                "help" => self.help()?,
                "parkinglot" => self.parkinglot()?,
                "checkin" => self.check_in()?,
                "park" => self.park()?,
                "checkout" => self.checkout()?,
                "parkingfeelog" => self.fee_log()?,
                "exit" => {
                    writeln!(self.output, "{}", render::PROMPT_EXIT)?;
                    Flow::Quit
                }
                _ => {
                    writeln!(self.output, "Command not found!")?;
                    self.show_main_prompt()?;
                    Flow::Continue
                }
            };
            self.output.flush()?;
            if flow == Flow::Quit {
                break;
            }
        }
        self.output.flush()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn show_main_prompt(&mut self) -> io::Result<()> {
        write!(self.output, "{}", main_prompt(self.session.occupancy()))
    }

    fn back_to_menu(&mut self, message: impl std::fmt::Display) -> io::Result<Flow> {
        writeln!(self.output, "{} {}", message, BACK_TO_MENU)?;
        self.show_main_prompt()?;
        Ok(Flow::Continue)
    }

    // ─────────────────────────────────────────────────────────────────────
    // help
    // ─────────────────────────────────────────────────────────────────────

    fn help(&mut self) -> io::Result<Flow> {
        writeln!(self.output)?;
        write!(self.output, "{}", render::PROMPT_HELP)?;
        loop {
            let line = read_or_quit!(self);
            if line.eq_ignore_ascii_case("menu") {
                break;
            }
            if line.eq_ignore_ascii_case("commands") {
                writeln!(self.output)?;
                write!(self.output, "{}", render::PROMPT_COMMANDS)?;
            } else {
                write!(self.output, "{}", render::PROMPT_NOTFOUND_HELP)?;
            }
        }
        writeln!(self.output)?;
        self.show_main_prompt()?;
        Ok(Flow::Continue)
    }

    // ─────────────────────────────────────────────────────────────────────
    // parkinglot: init / view
    // ─────────────────────────────────────────────────────────────────────

    fn parkinglot(&mut self) -> io::Result<Flow> {
        write!(self.output, "{}", render::PROMPT_PARKINGLOT)?;
        loop {
            let line = read_or_quit!(self);
            let flow = match line.to_lowercase().as_str() {
                "menu" => break,
                "init" => self.init_lot()?,
                "view" => self.view_lot()?,
                _ => {
                    writeln!(self.output, "Command not found!")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Quit {
                return Ok(Flow::Quit);
            }
            write!(self.output, "{}", render::PROMPT_PARKINGLOT)?;
        }
        self.show_main_prompt()?;
        Ok(Flow::Continue)
    }

    fn init_lot(&mut self) -> io::Result<Flow> {
        if let Some(occupancy) = self.session.occupancy() {
            if occupancy.occupied > 0 {
                let err = ParkingError::CapacityConflict {
                    occupied: occupancy.occupied,
                };
                writeln!(self.output, "{}", err)?;
                return Ok(Flow::Continue);
            }
        }

        let Some(length) = self.ask_dimension("length")? else {
            return Ok(Flow::Quit);
        };
        let Some(width) = self.ask_dimension("width")? else {
            return Ok(Flow::Quit);
        };

        match reduce(&mut self.session, Command::Init { width, length }) {
            Ok(Outcome::Initialized { layout, .. }) => {
                writeln!(self.output, "Parking Lot Space is setup. Here is the layout -")?;
                write!(self.output, "{}", render::layout(&layout))?;
            }
            Ok(_) => {}
            Err(err) => writeln!(self.output, "{}", err)?,
        }
        writeln!(self.output, "{}", PRESS_ANY_KEY)?;
        read_or_quit!(self);
        Ok(Flow::Continue)
    }

    fn ask_dimension(&mut self, dimension: &'static str) -> io::Result<Option<usize>> {
        write!(
            self.output,
            "Please enter the {} of the parking lot.\n> ",
            dimension
        )?;
        loop {
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match parse_dimension(dimension, &line) {
                Ok(value) => return Ok(Some(value)),
                Err(ParkingError::SizeTooLarge { max, .. }) => write!(
                    self.output,
                    "The {} of the parking lot cannot be more than {}. Please re-enter.\n> ",
                    dimension, max
                )?,
                Err(_) => write!(
                    self.output,
                    "The {} of the parking lot cannot be less than {}. Please re-enter.\n> ",
                    dimension, MINIMUM_SIZE
                )?,
            }
        }
    }

    fn view_lot(&mut self) -> io::Result<Flow> {
        match reduce(&mut self.session, Command::View) {
            Ok(Outcome::Layout { layout }) => write!(self.output, "{}", render::layout(&layout))?,
            Ok(_) => {}
            Err(ParkingError::NotInitialized) => {
                writeln!(self.output, "The parking lot is not initialised. Please run init!")?
            }
            Err(err) => writeln!(self.output, "{}", err)?,
        }
        writeln!(self.output, "{}", PRESS_ANY_KEY)?;
        read_or_quit!(self);
        Ok(Flow::Continue)
    }

    // ─────────────────────────────────────────────────────────────────────
    // checkin
    // ─────────────────────────────────────────────────────────────────────

    fn check_in(&mut self) -> io::Result<Flow> {
        let Some(occupancy) = self.session.occupancy() else {
            return self.back_to_menu(ParkingError::NotInitialized);
        };
        if occupancy.empty == 0 {
            return self.back_to_menu(ParkingError::LotFull { class: None });
        }

        writeln!(self.output, "Please enter the vehicle details")?;
        let class = loop {
            write!(self.output, "> Vehicle Type: ")?;
            let line = read_or_quit!(self);
            match VehicleClass::parse(&line) {
                Some(class) => break class,
                None => writeln!(self.output, "{}", INVALID_DETAIL)?,
            }
        };
        if matches!(self.session.available_slots(class), Ok(slots) if slots <= 0) {
            return self.back_to_menu(ParkingError::LotFull { class: Some(class) });
        }

        let regn_id = loop {
            write!(self.output, "> Regn Id: ")?;
            let line = read_or_quit!(self);
            if validate_regn_id(&line).is_ok() && !self.session.registry().contains(&line) {
                break line;
            }
            writeln!(self.output, "{}", INVALID_DETAIL)?;
        };

        write!(self.output, "> Vehicle Model: ")?;
        let model = read_or_quit!(self);
        write!(self.output, "> Vehicle Colour: ")?;
        let colour = read_or_quit!(self);

        let Some(entry_date) = self.ask_date("Date of entry")? else {
            return Ok(Flow::Quit);
        };
        let Some(entry_time) = self.ask_time("Time of entry")? else {
            return Ok(Flow::Quit);
        };

        let command = Command::CheckIn {
            class,
            regn_id,
            model,
            colour,
            entry_date,
            entry_time,
        };
        if let Err(err) = reduce(&mut self.session, command) {
            return self.back_to_menu(err);
        }
        self.show_main_prompt()?;
        Ok(Flow::Continue)
    }

    fn ask_date(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "> {}: ", label)?;
        loop {
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match parse_date(&line) {
                Ok(_) => return Ok(Some(line)),
                Err(err) => write!(self.output, "{}\n> {}: ", retry_text(&err), label)?,
            }
        }
    }

    fn ask_time(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "> {}: ", label)?;
        loop {
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match parse_time(&line) {
                Ok(_) => return Ok(Some(line)),
                Err(err) => write!(self.output, "{}\n> {}: ", retry_text(&err), label)?,
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // park
    // ─────────────────────────────────────────────────────────────────────

    fn park(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "To park a vehicle provide the details.")?;
        if self.session.lot().is_none() || self.session.registry().is_empty() {
            writeln!(
                self.output,
                "No vehicle checked in the parking lot, taking you back to main menu"
            )?;
            self.show_main_prompt()?;
            return Ok(Flow::Continue);
        }

        let regn_id = loop {
            write!(self.output, "> Regn Id: ")?;
            let line = read_or_quit!(self);
            if validate_regn_id(&line).is_err() {
                writeln!(self.output, "{}", INVALID_DETAIL)?;
            } else if !self.session.registry().contains(&line) {
                writeln!(self.output, "The vehicle mentioned is not parked in the parking lot.")?;
            } else {
                break line;
            }
        };

        if let Ok(layout) = self.session.render_lot() {
            write!(self.output, "{}", render::layout(&layout))?;
        }
        if self.steer(&regn_id)? == Flow::Quit {
            return Ok(Flow::Quit);
        }
        self.show_main_prompt()?;
        Ok(Flow::Continue)
    }

    fn steer(&mut self, regn_id: &str) -> io::Result<Flow> {
        loop {
            write!(self.output, "{}", render::PROMPT_MOVE)?;
            let line = read_or_quit!(self);
            let direction = match MoveKey::parse(&line) {
                Some(MoveKey::Stop) => return Ok(Flow::Continue),
                Some(MoveKey::Step(direction)) => direction,
                None => {
                    writeln!(self.output, "Invalid command!")?;
                    continue;
                }
            };
            let command = Command::Move {
                regn_id: regn_id.to_string(),
                direction,
            };
            match reduce(&mut self.session, command) {
                Ok(Outcome::Moved { report }) => {
                    if let Some(message) = &report.message {
                        writeln!(self.output, "{}", message)?;
                    }
                    write!(self.output, "{}", render::layout(&report.layout))?;
                }
                Ok(_) => {}
                Err(err) => {
                    writeln!(self.output, "{}", err)?;
                    return Ok(Flow::Continue);
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // checkout
    // ─────────────────────────────────────────────────────────────────────

    fn checkout(&mut self) -> io::Result<Flow> {
        if self.session.lot().is_none() || self.session.registry().is_empty() {
            return self.back_to_menu(ParkingError::EmptyLot);
        }

        writeln!(self.output, "Please enter your vehicle details")?;
        let regn_id = loop {
            write!(self.output, "> Regn Id: ")?;
            let line = read_or_quit!(self);
            if validate_regn_id(&line).is_ok() {
                break line;
            }
            writeln!(self.output, "{}", INVALID_DETAIL)?;
        };

        let located = match (self.session.lot(), self.session.vehicle(&regn_id)) {
            (Some(lot), Ok(vehicle)) => Ok((vehicle.phase(lot), vehicle.position)),
            (_, Err(err)) => Err(err),
            (None, Ok(_)) => Err(ParkingError::NotInitialized),
        };
        let (phase, position) = match located {
            Ok(located) => located,
            Err(err) => return self.back_to_menu(err),
        };
        if phase != Phase::AtCheckoutAnchor {
            return self.back_to_menu(ParkingError::NotAtDoor {
                regn_id,
                row: position.row,
                col: position.col,
            });
        }

        let quote = loop {
            let Some(exit_date) = self.ask_date("Date of exit")? else {
                return Ok(Flow::Quit);
            };
            let Some(exit_time) = self.ask_time("Time of exit")? else {
                return Ok(Flow::Quit);
            };
            let command = Command::Checkout {
                regn_id: regn_id.clone(),
                exit_date,
                exit_time,
            };
            match reduce(&mut self.session, command) {
                Ok(Outcome::Quoted { quote }) => break quote,
                Ok(_) => return Ok(Flow::Continue),
                Err(ParkingError::InvalidInterval) => writeln!(
                    self.output,
                    "{} Please re-enter.",
                    ParkingError::InvalidInterval
                )?,
                Err(err) => return self.back_to_menu(err),
            }
        };

        write!(self.output, "{}", render::quote(&quote))?;
        write!(self.output, "{}", render::PROMPT_CONFIRM)?;
        let accepted = loop {
            let Some(line) = self.read_line()? else {
                self.abandon(&regn_id);
                return Ok(Flow::Quit);
            };
            if line.eq_ignore_ascii_case("y") {
                break true;
            }
            if line.eq_ignore_ascii_case("menu") {
                break false;
            }
            write!(
                self.output,
                "You cannot checkout your vehicle. Please accept the fee by pressing Y or type menu to return to main menu and park your vehicle.\n> "
            )?;
        };

        if !accepted {
            self.abandon(&regn_id);
            self.show_main_prompt()?;
            return Ok(Flow::Continue);
        }
        let command = Command::ConfirmCheckout {
            regn_id: regn_id.clone(),
        };
        match reduce(&mut self.session, command) {
            Ok(_) => {
                writeln!(self.output, "Thank you for visiting the Parking Lot. See you next time!")?;
                self.show_main_prompt()?;
                Ok(Flow::Continue)
            }
            Err(err) => self.back_to_menu(err),
        }
    }

    fn abandon(&mut self, regn_id: &str) {
        let command = Command::AbandonCheckout {
            regn_id: regn_id.to_string(),
        };
        if let Err(err) = reduce(&mut self.session, command) {
            tracing::warn!(regn_id = %regn_id, error = %err, "Failed to drop pending checkout");
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // parkingfeelog
    // ─────────────────────────────────────────────────────────────────────

    fn fee_log(&mut self) -> io::Result<Flow> {
        if let Ok(Outcome::FeeLog { records }) = reduce(&mut self.session, Command::FeeLog) {
            write!(self.output, "{}", render::fee_log(&records))?;
        }
        self.show_main_prompt()?;
        Ok(Flow::Continue)
    }
}

/// Re-ask text for a rejected field.
fn retry_text(err: &ParkingError) -> String {
    match err {
        ParkingError::Validation { reason, .. } => format!("{}!", reason),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_core::PriceTable;
    use std::io::Cursor;

    fn run(script: &[&str]) -> (String, ParkingSession) {
        let mut input = script.join("\n");
        input.push('\n');
        let mut output = Vec::new();
        let session = {
            let mut repl = Repl::new(
                ParkingSession::new(PriceTable::default()),
                Cursor::new(input),
                &mut output,
            );
            repl.run().expect("run");
            repl.session
        };
        (String::from_utf8(output).expect("utf8"), session)
    }

    const INIT_7X7: [&str; 6] = ["parkinglot", "init", "7", "7", "", "menu"];

    const CHECK_IN_CAR: [&str; 7] = [
        "checkin",
        "car",
        "CAR001",
        "Corolla",
        "red",
        "2024-05-10",
        "10:00",
    ];

    /// Entry door to the checkout anchor of a 7x7 lot.
    const TO_ANCHOR_7X7: [&str; 11] = ["park", "CAR001", "d", "d", "s", "s", "s", "s", "d", "d", "d"];

    #[test]
    fn banner_prompt_and_exit() {
        let (output, _) = run(&["exit"]);
        assert!(output.contains("Empty Lots: [None] | Occupied: [None]"));
        assert!(output.trim_end().ends_with(render::PROMPT_EXIT));
    }

    #[test]
    fn unknown_command_reprints_main_prompt() {
        let (output, _) = run(&["dance", "exit"]);
        assert!(output.contains("Command not found!\nEmpty Lots: [None]"));
    }

    #[test]
    fn help_lists_commands_until_menu() {
        let (output, _) = run(&["help", "commands", "nope", "menu", "exit"]);
        assert!(output.contains("parkingfeelog: view the transaction log for parking lot."));
        assert!(output.contains("Command not found!\n\nType 'commands'"));
    }

    #[test]
    fn init_re_asks_until_dimensions_are_valid() {
        let (output, session) = run(&["parkinglot", "init", "6", "abc", "7", "9", "", "menu", "exit"]);
        assert_eq!(
            output
                .matches("The length of the parking lot cannot be less than 7. Please re-enter.")
                .count(),
            2
        );
        assert!(output.contains("Parking Lot Space is setup. Here is the layout -"));
        let lot = session.lot().expect("lot");
        assert_eq!((lot.width(), lot.length()), (9, 7));
        assert!(output.contains("Empty Lots: 9 | Occupied: 0"));
    }

    #[test]
    fn init_refuses_oversized_dimensions() {
        let (output, session) = run(&["parkinglot", "init", "7", "100000", "9", "", "menu", "exit"]);
        assert!(output.contains("The width of the parking lot cannot be more than 200. Please re-enter."));
        let lot = session.lot().expect("lot");
        assert_eq!((lot.width(), lot.length()), (9, 7));
    }

    #[test]
    fn view_before_init_says_so() {
        let (output, _) = run(&["parkinglot", "view", "", "menu", "exit"]);
        assert!(output.contains("The parking lot is not initialised. Please run init!"));
    }

    #[test]
    fn checkin_before_init_returns_to_menu() {
        let (output, session) = run(&["checkin", "exit"]);
        assert!(output.contains("hasn't been initialised"));
        assert!(session.registry().is_empty());
    }

    #[test]
    fn checkin_re_asks_invalid_fields() {
        let steps = [
            &INIT_7X7[..],
            &[
                "checkin",
                "van",
                "car",
                "CAR 01",
                "CAR001",
                "m",
                "c",
                "2024-13-01",
                "2100-01-01",
                "2024-05-10",
                "9:00",
                "09:00",
                "exit",
            ],
        ].concat();
        let (output, session) = run(&steps);
        assert!(output.matches(INVALID_DETAIL).count() >= 2);
        assert!(output.contains("between 1970-01-01 and 2099-12-31!"));
        assert!(output.contains("please enter time in HH:mm format!"));
        assert!(session.registry().contains("CAR001"));
        assert!(output.contains("Empty Lots: 2 | Occupied: 1"));
    }

    #[test]
    fn park_checkout_and_fee_log() {
        let steps = [
            &INIT_7X7[..],
            &CHECK_IN_CAR,
            &TO_ANCHOR_7X7,
            &["q", "checkout", "CAR001", "2024-05-10", "12:31", "Y", "parkingfeelog", "exit"],
        ].concat();
        let (output, session) = run(&steps);
        assert!(output.contains("Total number of hours: 3"));
        assert!(output.contains("Total Parking Fee: $12.0"));
        assert!(output.contains("Thank you for visiting the Parking Lot."));
        assert!(output.contains("|           Car|           CAR001|2024-05-10 10:00|2024-05-10 12:31|         12.0|"));
        assert!(session.registry().is_empty());
        assert_eq!(session.checkout_records().len(), 1);
    }

    #[test]
    fn declining_the_fee_keeps_the_vehicle() {
        let steps = [
            &INIT_7X7[..],
            &CHECK_IN_CAR,
            &TO_ANCHOR_7X7,
            &["q", "checkout", "CAR001", "2024-05-10", "09:00", "2024-05-10", "11:00", "no", "menu", "exit"],
        ].concat();
        let (output, session) = run(&steps);
        assert!(output.contains("Checkout datetime cannot be less than checkin datetime"));
        assert!(output.contains("You cannot checkout your vehicle."));
        let vehicle = session.vehicle("CAR001").expect("still parked");
        assert!(!vehicle.checkout_pending());
        assert!(session.checkout_records().is_empty());
    }

    #[test]
    fn checkout_away_from_the_door_is_refused() {
        let steps = [&INIT_7X7[..], &CHECK_IN_CAR, &["checkout", "CAR001", "exit"]].concat();
        let (output, session) = run(&steps);
        assert!(output.contains("is not at the checkout door"));
        assert!(session.registry().contains("CAR001"));
    }

    #[test]
    fn hitting_a_wall_prints_the_damage_warning() {
        let steps = [&INIT_7X7[..], &CHECK_IN_CAR, &["park", "CAR001", "w", "x", "q", "exit"]].concat();
        let (output, session) = run(&steps);
        assert!(output.contains("You have hit the wall, there will be a damage fee!"));
        assert!(output.contains("Invalid command!"));
        assert_eq!(session.vehicle("CAR001").expect("car").hits, 1);
    }

    #[test]
    fn end_of_input_mid_dialogue_ends_quietly() {
        let steps = [&INIT_7X7[..], &["checkin", "car", "CAR001"]].concat();
        let (_, session) = run(&steps);
        assert!(session.registry().is_empty());
    }
}
