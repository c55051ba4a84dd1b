//! Auxiliary reports: parser state (`$G`), NGC parameters (`$#`), startup
//! lines, echo, spindle data and build info (`$I`).

pub mod build;

use cnc_common::config::ControllerConfig;
use cnc_common::consts::{ASCII_EOL, MAX_AXES, N_DECIMAL_RPMVALUE};
use cnc_common::snapshot::{
    ParserSnapshot, ProgramFlow, RetractMode, SpindleSpeedMode, ToolLengthOffsetMode,
};
use cnc_common::state::{
    AxesSignals, COORD_SYSTEM_G28, COORD_SYSTEM_G30, CoolantState, CoordSystemId, SpindleState,
};
use cnc_common::status::StatusCode;
use thiserror::Error;
use tracing::warn;

use crate::format::{ValueFormatter, push_axis_letters, push_coord_system};
use crate::line::LineBuffer;
use crate::messages::status_message;
use crate::stream::StreamWriter;

pub use self::build::{BuildInfo, build_info};

// ─── Collaborators ──────────────────────────────────────────────────

/// Coordinate data store read failure.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    #[error("coordinate slot {0} is not readable")]
    Unreadable(CoordSystemId),
    #[error("coordinate slot {0} failed its checksum")]
    Checksum(CoordSystemId),
}

/// Persistent coordinate data (G54..G59.3, G28, G30).
pub trait CoordinateStore {
    fn read_coord_data(&self, id: CoordSystemId) -> Result<[f32; MAX_AXES], StoreError>;
}

/// One tool table entry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ToolData {
    pub offset: [f32; MAX_AXES],
    pub radius: f32,
}

/// Non-persistent system parameters listed by `$#`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SystemParameters {
    /// Machine position of the last homing cycle [mm].
    pub home_position: [f32; MAX_AXES],
    pub homed: AxesSignals,
    /// Machine position of the last probe contact [mm].
    pub probe_position: [f32; MAX_AXES],
    pub probe_succeeded: bool,
    /// Tool length reference along the tool length axis [mm], once set.
    pub tlo_reference: Option<f32>,
}

/// Spindle encoder counters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpindleData {
    pub index_count: u32,
    pub pulse_count: u32,
    /// Angular position [revolutions].
    pub angular_position: f32,
}

/// Number of persistent coordinate slots listed before G92.
const N_STORED_COORD_SLOTS: CoordSystemId = COORD_SYSTEM_G30 + 1;

// ─── Parser State ───────────────────────────────────────────────────

/// `[GC:...]` parser state line.
pub fn gcode_modes(
    out: &mut dyn StreamWriter,
    parser: &ParserSnapshot,
    tool_change_pending: bool,
    config: &ControllerConfig,
) {
    let modal = &parser.modal;
    let formatter = ValueFormatter::from_config(config);
    let mut line = LineBuffer::new();

    out.write("[GC:G");
    match modal.motion.probe_subcode() {
        Some(sub) => write!(out, "38.{sub}"),
        None => write!(out, "{}", modal.motion as u8),
    }

    push_coord_system(&mut line, modal.coord_system);
    write!(out, " G{}", line.as_str());

    if parser.g92_active() {
        out.write(" G92");
    }
    if config.lathe_mode {
        out.write(if modal.diameter_mode { " G7" } else { " G8" });
    }

    write!(out, " G{}", 17 + modal.plane_select as u8);
    out.write(if modal.units_imperial { " G20" } else { " G21" });
    out.write(if modal.distance_incremental { " G91" } else { " G90" });
    write!(out, " G{}", modal.feed_mode.gcode());

    if config.lathe_mode && config.capabilities.variable_spindle {
        out.write(match modal.spindle_rpm_mode {
            SpindleSpeedMode::Rpm => " G97",
            SpindleSpeedMode::Css => " G96",
        });
    }

    out.write(match modal.tool_offset_mode {
        ToolLengthOffsetMode::Cancel => " G49",
        ToolLengthOffsetMode::Enable => " G43",
        ToolLengthOffsetMode::EnableDynamic => " G43.1",
        ToolLengthOffsetMode::ApplyAdditional => " G43.2",
    });

    out.write(match parser.retract_mode {
        RetractMode::RPos => " G99",
        RetractMode::Previous => " G98",
    });

    if modal.scaling_active {
        line.clear();
        push_axis_letters(&mut line, parser.scaled_axes);
        write!(out, " G51:{}", line.as_str());
    } else {
        out.write(" G50");
    }

    match modal.program_flow {
        ProgramFlow::Running => {}
        ProgramFlow::Paused => out.write(" M0"),
        ProgramFlow::OptionalStop => out.write(" M1"),
        ProgramFlow::CompletedM2 => out.write(" M2"),
        ProgramFlow::CompletedM30 => out.write(" M30"),
        ProgramFlow::CompletedM60 => out.write(" M60"),
    }

    out.write(match (modal.spindle.is_on(), modal.spindle.contains(SpindleState::CCW)) {
        (false, _) => " M5",
        (true, false) => " M3",
        (true, true) => " M4",
    });

    if tool_change_pending {
        out.write(" M6");
    }

    if modal.coolant.is_empty() {
        out.write(" M9");
    } else {
        if modal.coolant.contains(CoolantState::MIST) {
            out.write(" M7");
        }
        if modal.coolant.contains(CoolantState::FLOOD) {
            out.write(" M8");
        }
    }

    let control = &modal.override_control;
    if control.feed_rate_disable {
        out.write(" M50");
    }
    if control.spindle_rpm_disable {
        out.write(" M51");
    }
    if control.feed_hold_disable {
        out.write(" M53");
    }
    if config.parking_override_control && control.parking_disable {
        out.write(" M56");
    }

    write!(out, " T{} F{}", parser.tool, formatter.rate(parser.feed_rate));

    if config.capabilities.variable_spindle {
        line.clear();
        line.push_fixed(parser.spindle_rpm, N_DECIMAL_RPMVALUE);
        write!(out, " S{}", line.as_str());
    }

    out.write("]\r\n");
}

// ─── NGC Parameters ─────────────────────────────────────────────────

fn axis_record(
    out: &mut dyn StreamWriter,
    formatter: &ValueFormatter,
    tag: &str,
    values: &[f32; MAX_AXES],
    diameter_mode: bool,
) {
    let mut line = LineBuffer::new();
    formatter.push_axis_values(&mut line, values, diameter_mode);
    write!(out, "[{tag}:{}]{ASCII_EOL}", line.as_str());
}

/// `[PRB:<pos>:<0|1>]`.
pub fn probe_parameters(
    out: &mut dyn StreamWriter,
    formatter: &ValueFormatter,
    params: &SystemParameters,
    diameter_mode: bool,
) {
    let mut line = LineBuffer::new();
    formatter.push_axis_values(&mut line, &params.probe_position, diameter_mode);
    write!(
        out,
        "[PRB:{}:{}]{ASCII_EOL}",
        line.as_str(),
        u8::from(params.probe_succeeded)
    );
}

/// `[HOME:<pos>:<homed mask>]`.
pub fn home_position(
    out: &mut dyn StreamWriter,
    formatter: &ValueFormatter,
    params: &SystemParameters,
    diameter_mode: bool,
) {
    let mut line = LineBuffer::new();
    formatter.push_axis_values(&mut line, &params.home_position, diameter_mode);
    write!(out, "[HOME:{}:{}]{ASCII_EOL}", line.as_str(), params.homed.bits());
}

/// `[TLO:<offsets>]`.
pub fn tool_offsets(out: &mut dyn StreamWriter, formatter: &ValueFormatter, parser: &ParserSnapshot) {
    axis_record(
        out,
        formatter,
        "TLO",
        &parser.tool_length_offset,
        parser.modal.diameter_mode,
    );
}

/// `$#` dump. A coordinate store read failure reports `error:7` and ends
/// the dump at that slot.
pub fn ngc_parameters(
    out: &mut dyn StreamWriter,
    config: &ControllerConfig,
    parser: &ParserSnapshot,
    store: &dyn CoordinateStore,
    tools: &[ToolData],
    params: &SystemParameters,
) -> StatusCode {
    let formatter = ValueFormatter::from_config(config);
    let diameter = parser.modal.diameter_mode;

    if parser.modal.scaling_active {
        axis_record(out, &formatter, "G51", &parser.scale_factors, diameter);
    }

    let mut tag = LineBuffer::new();
    for id in 0..N_STORED_COORD_SLOTS {
        let data = match store.read_coord_data(id) {
            Ok(data) => data,
            Err(e) => {
                warn!(slot = id, error = %e, "parameter dump aborted");
                return status_message(out, StatusCode::SettingReadFail);
            }
        };

        tag.clear();
        tag.push('G');
        match id {
            COORD_SYSTEM_G28 => tag.push_str("28"),
            COORD_SYSTEM_G30 => tag.push_str("30"),
            _ => push_coord_system(&mut tag, id),
        }
        axis_record(out, &formatter, tag.as_str(), &data, diameter);
    }

    axis_record(out, &formatter, "G92", &parser.g92_offset, diameter);

    let mut line = LineBuffer::new();
    for (idx, tool) in tools.iter().enumerate() {
        line.clear();
        formatter.push_axis_values(&mut line, &tool.offset, diameter);
        write!(out, "[T:{}|{}|", idx + 1, line.as_str());
        line.clear();
        formatter.push_axis_value(&mut line, tool.radius);
        write!(out, "{}]{ASCII_EOL}", line.as_str());
    }

    if config.homing.enabled {
        home_position(out, &formatter, params, diameter);
    }
    tool_offsets(out, &formatter, parser);
    probe_parameters(out, &formatter, params, diameter);

    if let Some(reference) = params.tlo_reference {
        line.clear();
        formatter.push_axis_value(&mut line, reference);
        write!(out, "[TLR:{}]{ASCII_EOL}", line.as_str());
    }

    StatusCode::Ok
}

// ─── Line Echoes ────────────────────────────────────────────────────

/// `$N<n>=<line>`.
pub fn startup_line(out: &mut dyn StreamWriter, n: u8, line: &str) {
    write!(out, "$N{n}={line}{ASCII_EOL}");
}

/// `><line>:` followed by the status of executing it.
pub fn execute_startup_message(out: &mut dyn StreamWriter, line: &str, status: StatusCode) -> StatusCode {
    write!(out, ">{line}:");
    status_message(out, status)
}

/// `[echo: <line>]`.
pub fn echo_line(out: &mut dyn StreamWriter, line: &str) {
    write!(out, "[echo: {line}]{ASCII_EOL}");
}

/// `[SPINDLE:<index>,<pulses>,<angle>]`, or `InvalidStatement` without a
/// spindle encoder.
pub fn spindle_data(out: &mut dyn StreamWriter, data: Option<&SpindleData>) -> StatusCode {
    match data {
        Some(data) => {
            write!(
                out,
                "[SPINDLE:{},{},{:.3}]{ASCII_EOL}",
                data.index_count, data.pulse_count, data.angular_position
            );
            StatusCode::Ok
        }
        None => StatusCode::InvalidStatement,
    }
}
