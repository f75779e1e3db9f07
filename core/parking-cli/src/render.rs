//! Text shown at the prompt: menus, quotes and the transaction log.

use parking_core::validation::DATETIME_FORMAT;
use parking_core::{format_amount, CheckoutRecord, FeeQuote, Occupancy};

pub const PROMPT_HELP: &str = "Type 'commands' to list all the available commands\n\
Type 'menu' to return to the main menu\n\
> ";

pub const PROMPT_NOTFOUND_HELP: &str = "Command not found!\n\
\n\
Type 'commands' to list all the available commands\n\
Type 'menu' to return to the main menu\n\
> ";

pub const PROMPT_COMMANDS: &str = "help: shows you list of commands that you can use.\n\
parkinglot: initialise the space for parking lot or view the layout of parking lot.\n\
checkin: add your car details while entering the parking lot.\n\
park: park your car to one of the empty spot.\n\
checkout: view the parking fee while exiting the parking lot.\n\
parkingfeelog: view the transaction log for parking lot.\n\
exit: To exit the program.\n\
\n\
Type 'commands' to list all the available commands\n\
Type 'menu' to return to the main menu\n\
> ";

pub const PROMPT_PARKINGLOT: &str = "Type 'init' to initialise the parking space\n\
Type 'view' to view the layout of the parking space\n\
Type 'menu' to return to the main menu\n\
> ";

pub const PROMPT_MOVE: &str =
    "Type w/s/a/d to move the vehicle to up/down/left/right or else press q to exit.\n> ";

pub const PROMPT_CONFIRM: &str = "Type Y to accept the fee or menu to return to main menu\n> ";

pub const PROMPT_EXIT: &str = "Good bye from the Parking Lot! See you next time!";

pub const BANNER: &str = " ____   _    ____  _  _____ _   _  ____   _     ___ _____ \n\
|  _ \\ / \\  |  _ \\| |/ /_ _| \\ | |/ ___| | |   / _ \\_   _|\n\
| |_) / _ \\ | |_) | ' / | ||  \\| | |  _  | |  | | | || |  \n\
|  __/ ___ \\|  _ <| . \\ | || |\\  | |_| | | |__| |_| || |  \n\
|_| /_/   \\_\\_| \\_\\_|\\_\\___|_| \\_|\\____| |_____\\___/ |_|  ";

/// Main prompt with the live counters; `[None]` before a lot exists or
/// when no slot is free.
pub fn main_prompt(occupancy: Option<Occupancy>) -> String {
    let (empty, occupied) = match occupancy {
        Some(o) if o.empty > 0 => (o.empty.to_string(), o.occupied.to_string()),
        Some(o) => ("[None]".to_string(), o.occupied.to_string()),
        None => ("[None]".to_string(), "[None]".to_string()),
    };
    format!(
        "Empty Lots: {} | Occupied: {}\n\
         Please enter a command to continue.\n\
         Type 'help' to learn how to get started.\n\
         > ",
        empty, occupied
    )
}

pub fn layout(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn quote(quote: &FeeQuote) -> String {
    let mut out = String::from("Please verify your details.\n");
    out.push_str(&format!(
        "Total number of hours: {}\n",
        quote.duration.parking_hours
    ));
    if quote.duration.overnight_count > 0 {
        out.push_str(&format!(
            "Total number of overnight parking: {}\n",
            quote.duration.overnight_count
        ));
    }
    out.push_str(&format!("Total number of hits: {}\n", quote.hits));
    out.push_str(&format!("Vehicle Type: {}\n", quote.class));
    out.push_str(&format!("Regn Id: {}\n", quote.regn_id));
    out.push_str(&format!(
        "Total Parking Fee: ${}\n",
        format_amount(quote.fee.total)
    ));
    out
}

const LOG_RULE: &str =
    "---------------------------------------------------------------------------------";

pub fn fee_log(records: &[CheckoutRecord]) -> String {
    let mut out = String::new();
    out.push_str(
        "============ Here are the Transaction logs for the Parking Lot ==================\n",
    );
    out.push_str(LOG_RULE);
    out.push('\n');
    out.push_str(
        "| Vehicle Type | Registration Id | Entry DateTime | Exit DateTime | Parking Fee |\n",
    );
    out.push_str(LOG_RULE);
    out.push('\n');
    if records.is_empty() {
        out.push_str("No records found!\n");
        return out;
    }
    for record in records {
        out.push_str(&format!(
            "|{:>14}|{:>17}|{:>16}|{:>16}|{:>13}|\n",
            record.class.as_str(),
            record.regn_id,
            record.entered_at.format(DATETIME_FORMAT),
            record.exited_at.format(DATETIME_FORMAT),
            format_amount(record.fee),
        ));
    }
    out
}
