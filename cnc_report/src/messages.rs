//! Protocol responses and operator messages.

use cnc_common::consts::{ASCII_EOL, PROTOCOL_VERSION};
use cnc_common::status::{AlarmCode, MessageCode, MessageType, StatusCode};

use crate::hooks::Hooks;
use crate::status::refresh::RefreshCounters;
use crate::stream::StreamWriter;

/// `ok` or `error:<n>`. Returns `status` so callers can forward it.
pub fn status_message(out: &mut dyn StreamWriter, status: StatusCode) -> StatusCode {
    match status {
        StatusCode::Ok => out.write("ok\r\n"),
        _ => write!(out, "error:{}{ASCII_EOL}", status.code()),
    }
    status
}

/// `ALARM:<n>`.
pub fn alarm_message(out: &mut dyn StreamWriter, alarm: AlarmCode) -> AlarmCode {
    write!(out, "ALARM:{alarm}{ASCII_EOL}");
    alarm
}

/// Free-text message, `[MSG:Info: ...]` and `[MSG:Warning: ...]` by type.
pub fn message(out: &mut dyn StreamWriter, text: &str, kind: MessageType) {
    let prefix = match kind {
        MessageType::Plain => "",
        MessageType::Info => "Info: ",
        MessageType::Warning => "Warning: ",
    };
    write!(out, "[MSG:{prefix}{text}]{ASCII_EOL}");
}

/// Fixed feedback message. Plugin codes get their text from the
/// unknown-feedback-message chain; an unclaimed code renders `[MSG:]`.
pub fn feedback_message(out: &mut dyn StreamWriter, code: MessageCode, hooks: &Hooks) -> MessageCode {
    out.write("[MSG:");
    match code {
        MessageCode::Extension(id) => {
            hooks.unknown_feedback_message(id, out);
        }
        _ => {
            if let Some(text) = code.text() {
                out.write(text);
            }
        }
    }
    out.write("]\r\n");
    code
}

/// Startup banner. Also restarts both refresh counters, so the first status
/// report after a reset carries `|WCO:` and `|Ov:`.
pub fn welcome(out: &mut dyn StreamWriter, counters: &RefreshCounters) {
    counters.reset();
    write!(
        out,
        "{ASCII_EOL}GrblHAL {PROTOCOL_VERSION} ['$' or '$HELP' for help]{ASCII_EOL}"
    );
}

pub fn help_line(out: &mut dyn StreamWriter) {
    out.write("[HLP:$$ $# $G $I $N $x=val $Nx=line $J=line $SLP $C $X $H $B ~ ! ? ctrl-x]\r\n");
}
