//! Machine state and hardware signal types.
//!
//! State enums use `#[repr(u8)]` for compact layout. Hardware signal sets
//! (limit switches, control inputs, spindle and coolant outputs) use the
//! `bitflags` crate so a whole set can be sampled as one word.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::consts::{AXIS_LETTERS, MAX_AXES};

// ─── Machine State ──────────────────────────────────────────────────

/// Discrete machine state as seen by the reporting layer.
///
/// `ToolChange` is never stored by the motion subsystem: it is derived from
/// `Cycle` plus a pending tool change (see [`MachineState::display`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum MachineState {
    /// Ready, no motion.
    #[default]
    Idle = 0,
    /// Program running.
    Cycle = 1,
    /// Feed hold active or in progress.
    Hold = 2,
    /// Jogging.
    Jog = 3,
    /// Homing cycle.
    Homing = 4,
    /// Alarm lock.
    Alarm = 5,
    /// Emergency stop input asserted.
    EStop = 6,
    /// G-code check mode.
    CheckMode = 7,
    /// Safety door open.
    SafetyDoor = 8,
    /// Sleep mode.
    Sleep = 9,
    /// Running, waiting on a tool change.
    ToolChange = 10,
}

impl MachineState {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Idle),
            1 => Some(Self::Cycle),
            2 => Some(Self::Hold),
            3 => Some(Self::Jog),
            4 => Some(Self::Homing),
            5 => Some(Self::Alarm),
            6 => Some(Self::EStop),
            7 => Some(Self::CheckMode),
            8 => Some(Self::SafetyDoor),
            9 => Some(Self::Sleep),
            10 => Some(Self::ToolChange),
            _ => None,
        }
    }

    /// State shown to the host: a running machine with a pending tool
    /// change is displayed as `ToolChange`.
    #[inline]
    pub const fn display(self, tool_change_pending: bool) -> Self {
        match self {
            Self::Cycle if tool_change_pending => Self::ToolChange,
            other => other,
        }
    }

    /// Returns true for the busy set {Homing, Cycle, Hold, Jog, SafetyDoor}
    /// which selects the slow refresh intervals.
    #[inline]
    pub const fn is_busy(self) -> bool {
        matches!(
            self,
            Self::Homing | Self::Cycle | Self::Hold | Self::Jog | Self::SafetyDoor
        )
    }

    /// Status report token for this state (without sub-state).
    pub const fn token(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Cycle => "Run",
            Self::Hold => "Hold",
            Self::Jog => "Jog",
            Self::Homing => "Home",
            Self::Alarm | Self::EStop => "Alarm",
            Self::CheckMode => "Check",
            Self::SafetyDoor => "Door",
            Self::Sleep => "Sleep",
            Self::ToolChange => "Tool",
        }
    }
}

/// Probing cycle progress as tracked by the motion subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum ProbingState {
    /// No probing cycle.
    #[default]
    Off = 0,
    /// Probing motion in progress.
    Active = 1,
}

/// Probe input state. A controller without a probe reports
/// `connected = true, triggered = false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProbeState {
    /// Probe is connected.
    pub connected: bool,
    /// Probe contact is closed.
    pub triggered: bool,
}

impl Default for ProbeState {
    fn default() -> Self {
        Self {
            connected: true,
            triggered: false,
        }
    }
}

// ─── Signal Sets ────────────────────────────────────────────────────

bitflags! {
    /// One bit per axis; used for limit inputs, homed axes and scaling.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AxesSignals: u8 {
        const X = 0x01;
        const Y = 0x02;
        const Z = 0x04;
        const A = 0x08;
        const B = 0x10;
        const C = 0x20;
    }
}

impl AxesSignals {
    /// Mask with one bit set for each of the first `axis_count` axes.
    #[inline]
    pub const fn for_axis_count(axis_count: u8) -> Self {
        let n = if axis_count as usize > MAX_AXES {
            MAX_AXES as u8
        } else {
            axis_count
        };
        Self::from_bits_truncate(((1u16 << n) - 1) as u8)
    }

    /// Iterate the axis letters of the set bits, in axis order.
    pub fn letters(self) -> impl Iterator<Item = &'static str> {
        AXIS_LETTERS
            .iter()
            .enumerate()
            .filter(move |(idx, _)| self.bits() & (1 << idx) != 0)
            .map(|(_, letter)| *letter)
    }
}

bitflags! {
    /// Control input pins.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ControlSignals: u16 {
        const RESET            = 0x0001;
        const FEED_HOLD        = 0x0002;
        const CYCLE_START      = 0x0004;
        const SAFETY_DOOR_AJAR = 0x0008;
        const BLOCK_DELETE     = 0x0010;
        const STOP_DISABLE     = 0x0020;
        const E_STOP           = 0x0040;
        const PROBE_DISCONNECTED = 0x0080;
        const MOTOR_FAULT      = 0x0100;
        const MOTOR_WARNING    = 0x0200;
        const LIMITS_OVERRIDE  = 0x0400;
    }
}

bitflags! {
    /// Spindle output state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SpindleState: u8 {
        const ON            = 0x01;
        const CCW           = 0x02;
        const AT_SPEED      = 0x04;
        const ENCODER_ERROR = 0x08;
    }
}

impl SpindleState {
    #[inline]
    pub const fn is_on(self) -> bool {
        self.contains(Self::ON)
    }
}

bitflags! {
    /// Coolant output state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CoolantState: u8 {
        const FLOOD = 0x01;
        const MIST  = 0x02;
    }
}

/// Work coordinate system index: 0..=8 are G54..G59.3, then G28, G30, G92.
pub type CoordSystemId = u8;

/// Index of the G28 stored position in the coordinate data store.
pub const COORD_SYSTEM_G28: CoordSystemId = 9;
/// Index of the G30 stored position in the coordinate data store.
pub const COORD_SYSTEM_G30: CoordSystemId = 10;
/// Index of the (non-persistent) G92 offset.
pub const COORD_SYSTEM_G92: CoordSystemId = 11;
/// Number of coordinate data slots, G92 included.
pub const N_COORDINATE_SYSTEMS: CoordSystemId = 12;
