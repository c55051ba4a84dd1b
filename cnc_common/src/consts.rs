//! System-wide constants for the CNC reporting workspace.
//!
//! Single source of truth for axis limits, number formatting precision and
//! the status report refresh intervals. Imported by all crates.

use static_assertions::const_assert;

/// Maximum number of axes (X, Y, Z, A, B, C).
pub const MAX_AXES: usize = 6;

/// Default number of configured axes.
pub const DEFAULT_AXIS_COUNT: u8 = 3;

/// Axis letters, indexed by axis number.
pub const AXIS_LETTERS: [&str; MAX_AXES] = ["X", "Y", "Z", "A", "B", "C"];

/// Index of the X axis (diameter mode doubles its reported value).
pub const X_AXIS: usize = 0;

/// Conversion factor from millimeters to inches.
pub const INCH_PER_MM: f32 = 0.039_370_08;

/// Decimals used for coordinate values reported in millimeters.
pub const N_DECIMAL_COORDVALUE_MM: usize = 3;

/// Decimals used for coordinate values reported in inches.
pub const N_DECIMAL_COORDVALUE_INCH: usize = 4;

/// Decimals used for spindle RPM values in the parser state report.
pub const N_DECIMAL_RPMVALUE: usize = 0;

/// Widest single coordinate value, sign and decimal point included.
pub const STRLEN_COORDVALUE: usize = 12;

/// Capacity of the shared scratch line: one coordinate vector plus separators.
pub const LINE_BUFFER_SIZE: usize = (STRLEN_COORDVALUE + 1) * MAX_AXES;

/// Number of planner blocks reported in build info (buffer size minus one).
pub const BLOCK_BUFFER_SIZE: u16 = 36;

/// Number of persistent coordinate systems G54..G59.3.
pub const N_WORK_COORDINATE_SYSTEMS: u8 = 9;

// ─── Status Report Refresh ──────────────────────────────────────────

/// Override field refresh interval while the machine is busy [reports].
pub const REPORT_OVERRIDE_REFRESH_BUSY_COUNT: u8 = 20;
/// Override field refresh interval while idle [reports].
pub const REPORT_OVERRIDE_REFRESH_IDLE_COUNT: u8 = 10;
/// WCO field refresh interval while the machine is busy [reports].
pub const REPORT_WCO_REFRESH_BUSY_COUNT: u8 = 30;
/// WCO field refresh interval while idle [reports].
pub const REPORT_WCO_REFRESH_IDLE_COUNT: u8 = 10;

const_assert!(REPORT_WCO_REFRESH_BUSY_COUNT >= REPORT_WCO_REFRESH_IDLE_COUNT);
const_assert!(REPORT_OVERRIDE_REFRESH_BUSY_COUNT >= REPORT_OVERRIDE_REFRESH_IDLE_COUNT);
const_assert!(REPORT_WCO_REFRESH_IDLE_COUNT >= 2);
const_assert!(REPORT_OVERRIDE_REFRESH_IDLE_COUNT >= 1);

/// Line terminator used by every protocol line.
pub const ASCII_EOL: &str = "\r\n";

/// Firmware name reported in `[FIRMWARE:..]` and the `|FW:` status field.
pub const FIRMWARE_NAME: &str = "grblHAL";

/// Protocol version string.
pub const PROTOCOL_VERSION: &str = "1.1f";

/// Protocol build date.
pub const PROTOCOL_BUILD: &str = "20210204";

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/controller.toml";
