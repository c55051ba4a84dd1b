//! Prelude module for common re-exports.
//!
//! ```rust
//! use cnc_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{
    Capabilities, ConfigError, ConfigLoader, ControllerConfig, HomingConfig, LogLevel,
    RefreshConfig, SharedConfig, StatusReportConfig,
};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{ASCII_EOL, AXIS_LETTERS, MAX_AXES};

// ─── Machine State ──────────────────────────────────────────────────
pub use crate::snapshot::{GcModal, MachineSnapshot, Overrides, ParserSnapshot};
pub use crate::state::{
    AxesSignals, ControlSignals, CoolantState, MachineState, ProbeState, ProbingState,
    SpindleState,
};

// ─── Reporting ──────────────────────────────────────────────────────
pub use crate::report_flags::{ExecFlags, ReportFlags, SharedReportState};
pub use crate::status::{AlarmCode, MessageCode, MessageType, StatusCode};

// ─── Settings ───────────────────────────────────────────────────────
pub use crate::settings::{
    Datatype, GroupFilter, GroupId, SettingClass, SettingDescriptor, SettingGroupDescriptor,
    SettingId, SettingValue, SettingsRegistry, SettingsStore,
};
