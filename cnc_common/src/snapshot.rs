//! Machine snapshot read by the status report generator.
//!
//! The motion subsystem captures one [`MachineSnapshot`] per report request.
//! Positions are already converted to real-world millimeters; the reporting
//! layer never sees step counts.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_AXES;
use crate::state::{
    AxesSignals, ControlSignals, CoolantState, CoordSystemId, MachineState, ProbeState,
    ProbingState, SpindleState,
};

// ─── Parser (Modal) State ───────────────────────────────────────────

/// Active motion mode (G0/G1/G2/G3/G5/G33/G38.x/G73..G89/G80).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum MotionMode {
    #[default]
    Seek = 0,
    Linear = 1,
    CwArc = 2,
    CcwArc = 3,
    CubicSpline = 5,
    SpindleSynchronized = 33,
    DrillChipBreak = 73,
    Threading = 76,
    None = 80,
    CannedCycle81 = 81,
    CannedCycle82 = 82,
    CannedCycle83 = 83,
    CannedCycle85 = 85,
    CannedCycle86 = 86,
    CannedCycle89 = 89,
    ProbeToward = 140,
    ProbeTowardNoError = 141,
    ProbeAway = 142,
    ProbeAwayNoError = 143,
}

impl MotionMode {
    /// Returns the G38.x sub-number for probing modes.
    #[inline]
    pub const fn probe_subcode(self) -> Option<u8> {
        let v = self as u8;
        if v >= Self::ProbeToward as u8 {
            Some(v - (Self::ProbeToward as u8 - 2))
        } else {
            None
        }
    }
}

/// Active plane (G17/G18/G19).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum PlaneSelect {
    #[default]
    XY = 0,
    ZX = 1,
    YZ = 2,
}

impl PlaneSelect {
    /// Axis index perpendicular to the plane (tool length axis).
    pub const fn linear_axis(self) -> usize {
        match self {
            Self::XY => 2,
            Self::ZX => 1,
            Self::YZ => 0,
        }
    }
}

/// Feed rate mode (G93/G94/G95), stored as `94 - gcode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum FeedMode {
    #[default]
    UnitsPerMin = 0,
    InverseTime = 1,
    UnitsPerRev = 2,
}

impl FeedMode {
    /// G-code number for this mode.
    pub const fn gcode(self) -> u8 {
        match self {
            Self::UnitsPerMin => 94,
            Self::InverseTime => 93,
            Self::UnitsPerRev => 95,
        }
    }
}

/// Spindle speed mode (G96/G97).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum SpindleSpeedMode {
    #[default]
    Rpm = 0,
    Css = 1,
}

/// Tool length offset mode (G43/G43.1/G43.2/G49).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum ToolLengthOffsetMode {
    #[default]
    Cancel = 0,
    Enable = 1,
    EnableDynamic = 2,
    ApplyAdditional = 3,
}

/// Canned cycle retract mode (G98/G99).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum RetractMode {
    #[default]
    Previous = 0,
    RPos = 1,
}

/// Program flow state (M0/M1/M2/M30/M60).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum ProgramFlow {
    #[default]
    Running = 0,
    Paused = 3,
    OptionalStop = 1,
    CompletedM2 = 2,
    CompletedM30 = 30,
    CompletedM60 = 60,
}

/// M50..M56 override control switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct OverrideControl {
    pub feed_rate_disable: bool,
    pub spindle_rpm_disable: bool,
    pub feed_hold_disable: bool,
    pub parking_disable: bool,
}

/// Modal state of the G-code interpreter, compared as a whole to detect
/// parser state changes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GcModal {
    pub motion: MotionMode,
    pub coord_system: CoordSystemId,
    pub plane_select: PlaneSelect,
    pub units_imperial: bool,
    pub distance_incremental: bool,
    pub feed_mode: FeedMode,
    pub spindle_rpm_mode: SpindleSpeedMode,
    pub tool_offset_mode: ToolLengthOffsetMode,
    pub scaling_active: bool,
    pub diameter_mode: bool,
    pub program_flow: ProgramFlow,
    pub spindle: SpindleState,
    pub coolant: CoolantState,
    pub override_control: OverrideControl,
}

/// Interpreter values the reporting layer reads.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParserSnapshot {
    pub modal: GcModal,
    /// Programmed feed rate [mm/min].
    pub feed_rate: f32,
    /// Programmed spindle speed [RPM].
    pub spindle_rpm: f32,
    /// Active tool number.
    pub tool: u32,
    /// G92 coordinate offset [mm].
    pub g92_offset: [f32; MAX_AXES],
    /// Canned cycle retract mode.
    pub retract_mode: RetractMode,
    /// Axes with scaling applied (G51).
    pub scaled_axes: AxesSignals,
    /// Per-axis scale factors (G51).
    pub scale_factors: [f32; MAX_AXES],
    /// Tool length offset [mm].
    pub tool_length_offset: [f32; MAX_AXES],
}

impl ParserSnapshot {
    /// Returns true if any G92 offset component is non-zero.
    pub fn g92_active(&self) -> bool {
        self.g92_offset.iter().any(|v| *v != 0.0)
    }
}

// ─── Machine Snapshot ───────────────────────────────────────────────

/// Override percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Overrides {
    pub feed: u16,
    pub rapid: u16,
    pub spindle: u16,
}

impl Default for Overrides {
    fn default() -> Self {
        Self {
            feed: 100,
            rapid: 100,
            spindle: 100,
        }
    }
}

/// Per-report view of the machine, captured by the motion subsystem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineSnapshot {
    /// Raw machine state (never `ToolChange`).
    pub state: MachineState,
    /// Active alarm code (0 = none).
    pub alarm: u8,
    /// Feed hold stage (1-based).
    pub holding_state: u8,
    /// Safety door parking stage.
    pub parking_state: u8,
    /// Feed hold requested but not yet executed.
    pub feed_hold_pending: bool,
    /// Probing cycle progress.
    pub probing: ProbingState,
    /// Probe input, `None` when no probe is fitted.
    pub probe: Option<ProbeState>,

    /// Machine position [mm].
    pub machine_position: [f32; MAX_AXES],
    /// Total work offset (WCS + G92 + TLO) per axis [mm].
    pub work_offset: [f32; MAX_AXES],

    /// Free planner blocks, `None` when no planner is attached.
    pub planner_blocks_available: Option<u16>,
    /// Free input stream buffer bytes.
    pub rx_buffer_available: Option<u16>,
    /// Line number of the executing block.
    pub line_number: Option<i32>,

    /// Realtime feed rate [mm/min].
    pub realtime_rate: f32,
    /// Spindle output state.
    pub spindle: SpindleState,
    /// Commanded spindle speed including override [RPM].
    pub spindle_rpm: f32,
    /// Spindle encoder speed, `None` without a speed sensor.
    pub measured_rpm: Option<f32>,
    /// Coolant output state.
    pub coolant: CoolantState,

    /// Limit inputs.
    pub limits: AxesSignals,
    /// Control inputs.
    pub control: ControlSignals,
    /// Block delete switch enabled.
    pub block_delete_enabled: bool,
    /// Optional stop (M1) disabled by software.
    pub optional_stop_disable: bool,

    /// Override percentages.
    pub overrides: Overrides,
    /// MPG mode active.
    pub mpg_mode: bool,
    /// Axes participating in the homing cycle (empty = all).
    pub homing_mask: AxesSignals,
    /// Homed axes.
    pub homed: AxesSignals,
    /// M6 issued and not yet acknowledged.
    pub tool_change_pending: bool,
    /// Tool length offset reference established.
    pub tlo_reference_set: bool,

    /// Interpreter state.
    pub parser: ParserSnapshot,
}

impl Default for MachineSnapshot {
    fn default() -> Self {
        Self {
            state: MachineState::Idle,
            alarm: 0,
            holding_state: 0,
            parking_state: 0,
            feed_hold_pending: false,
            probing: ProbingState::Off,
            probe: None,
            machine_position: [0.0; MAX_AXES],
            work_offset: [0.0; MAX_AXES],
            planner_blocks_available: None,
            rx_buffer_available: None,
            line_number: None,
            realtime_rate: 0.0,
            spindle: SpindleState::empty(),
            spindle_rpm: 0.0,
            measured_rpm: None,
            coolant: CoolantState::empty(),
            limits: AxesSignals::empty(),
            control: ControlSignals::empty(),
            block_delete_enabled: false,
            optional_stop_disable: false,
            overrides: Overrides::default(),
            mpg_mode: false,
            homing_mask: AxesSignals::empty(),
            homed: AxesSignals::empty(),
            tool_change_pending: false,
            tlo_reference_set: false,
            parser: ParserSnapshot::default(),
        }
    }
}

impl MachineSnapshot {
    /// Probe state as reported; absent probes read as connected and open.
    #[inline]
    pub fn probe_state(&self) -> ProbeState {
        self.probe.unwrap_or_default()
    }
}
