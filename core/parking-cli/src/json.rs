//! Line-delimited JSON mode: one `Command` per input line, one `Response`
//! per output line.

use std::io::{self, BufRead, Write};

use parking_core::{respond, ParkingSession};
use parking_protocol::{parse_command, Response};

pub fn run<R: BufRead, W: Write>(
    session: &mut ParkingSession,
    input: R,
    mut output: W,
) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = match parse_command(&line) {
            Ok(command) => respond(session, command),
            Err(info) => {
                tracing::debug!(code = %info.code, "Rejected request line");
                Response::error_with_info(info)
            }
        };
        serde_json::to_writer(&mut output, &response)?;
        output.write_all(b"\n")?;
        output.flush()?;
    }
    Ok(())
}
