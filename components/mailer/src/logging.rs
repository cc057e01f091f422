use std::{borrow::Cow, io::Write};

use env_logger::{Builder, fmt::Formatter};
use log::Record;

/// Printed instead of anything that carries credentials.
pub const SECRET: &str = "/* secret */";

// lettre escapes line endings in its protocol trace
const CRLF: &str = "<CRLF>";
const WROTE: &str = "Wrote: ";

// Single word commands that never carry credentials
const BARE_COMMANDS: [&str; 7] = ["DATA", "QUIT", "RSET", "NOOP", "STARTTLS", "HELP", "AUTH"];

/// Hides credentials in lettre's protocol trace. `AUTH <mechanism> <response>` keeps the
/// mechanism, and the lone base64 lines answering a LOGIN challenge are dropped entirely.
pub fn redact_protocol_line(line: &str) -> Cow<'_, str> {
    let Some(command) = line
        .strip_prefix(WROTE)
        .and_then(|written| written.strip_suffix(CRLF))
    else {
        return Cow::Borrowed(line);
    };

    // Message content goes out in one write with many lines
    if command.contains(CRLF) {
        return Cow::Borrowed(line);
    }

    let mut words = command.split(' ');
    match (words.next(), words.next(), words.next()) {
        (Some(verb), Some(mechanism), Some(_)) if verb.eq_ignore_ascii_case("AUTH") => {
            Cow::Owned(format!("{WROTE}AUTH {mechanism} {SECRET}{CRLF}"))
        }
        (Some(token), None, None)
            if !token.is_empty()
                && !BARE_COMMANDS
                    .iter()
                    .any(|bare| bare.eq_ignore_ascii_case(token)) =>
        {
            Cow::Owned(format!("{WROTE}{SECRET}{CRLF}"))
        }
        _ => Cow::Borrowed(line),
    }
}

fn format_record(buf: &mut Formatter, record: &Record) -> std::io::Result<()> {
    let timestamp = buf.timestamp();
    let message = record.args().to_string();
    writeln!(
        buf,
        "[{} {:<5} {}] {}",
        timestamp,
        record.level(),
        record.target(),
        redact_protocol_line(&message)
    )
}

/// Logger with the protocol trace redacted. Filter and target are left to the caller.
pub fn builder() -> Builder {
    let mut builder = Builder::new();
    builder.format(format_record);
    builder
}
