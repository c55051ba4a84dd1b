//! Configuration loading traits and types.
//!
//! Every controller build loads one TOML file describing which optional
//! status report fields are enabled, which hardware capabilities exist and
//! how often the throttled report fields are refreshed.
//!
//! # Usage
//!
//! ```rust,no_run
//! use cnc_common::config::{ConfigLoader, ControllerConfig, ConfigError};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = ControllerConfig::load(Path::new("controller.toml"))?;
//!     config.validate()?;
//!     println!("Axes: {}", config.axis_count);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::consts::{
    DEFAULT_AXIS_COUNT, MAX_AXES, REPORT_OVERRIDE_REFRESH_BUSY_COUNT,
    REPORT_OVERRIDE_REFRESH_IDLE_COUNT, REPORT_WCO_REFRESH_BUSY_COUNT,
    REPORT_WCO_REFRESH_IDLE_COUNT,
};

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Common configuration fields.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "cnc-report-01"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    pub service_name: String,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            service_name: "cnc-report".to_string(),
        }
    }
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// ─── Status Report Configuration ────────────────────────────────────

/// Optional status report fields (`$10` equivalents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusReportConfig {
    /// Report `MPos` instead of `WPos`.
    pub machine_position: bool,
    /// `|Bf:` planner/stream buffer availability.
    pub buffer_state: bool,
    /// `|Ln:` executing line number.
    pub line_numbers: bool,
    /// `|FS:` / `|F:` feed and speed.
    pub feed_speed: bool,
    /// `|Pn:` input pin state.
    pub pin_state: bool,
    /// `|WCO:` work coordinate offset.
    pub work_coord_offset: bool,
    /// `|Ov:` overrides.
    pub overrides: bool,
    /// Emit parser state reports when modal state changes.
    pub parser_state: bool,
    /// Append alarm code to `Alarm`.
    pub alarm_substate: bool,
    /// Append probing sub-state `:2` to `Run`.
    pub run_substate: bool,
    /// Force a WCO report on coordinate system change.
    pub sync_on_wco_change: bool,
}

impl Default for StatusReportConfig {
    fn default() -> Self {
        Self {
            machine_position: true,
            buffer_state: true,
            line_numbers: false,
            feed_speed: true,
            pin_state: true,
            work_coord_offset: true,
            overrides: true,
            parser_state: false,
            alarm_substate: false,
            run_substate: false,
            sync_on_wco_change: true,
        }
    }
}

impl StatusReportConfig {
    /// Only the mandatory state and position fields.
    pub const fn minimal() -> Self {
        Self {
            machine_position: true,
            buffer_state: false,
            line_numbers: false,
            feed_speed: false,
            pin_state: false,
            work_coord_offset: false,
            overrides: false,
            parser_state: false,
            alarm_substate: false,
            run_substate: false,
            sync_on_wco_change: false,
        }
    }
}

/// Hardware and driver capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Capabilities {
    /// Variable spindle speed (PWM).
    pub variable_spindle: bool,
    /// Spindle synchronized motion (encoder fitted).
    pub spindle_sync: bool,
    /// Spindle speed sensor available.
    pub spindle_speed_sensor: bool,
    /// Mist coolant output.
    pub mist_control: bool,
    /// MPG mode switching.
    pub mpg_mode: bool,
    /// Door ajar input distinct from door open.
    pub safety_door_ajar: bool,
    /// Optional stop disable input.
    pub stop_disable: bool,
    /// Block delete input.
    pub block_delete: bool,
    /// Emergency stop input.
    pub e_stop: bool,
    /// Probe input.
    pub probe: bool,
    /// Probe disconnected input.
    pub probe_disconnected: bool,
    /// Manual tool change (M6) support.
    pub tool_change: bool,
    /// Software input debouncing.
    pub software_debounce: bool,
    /// Auto-squared (ganged) axes.
    pub auto_squared: bool,
}

/// Homing options relevant to reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomingConfig {
    pub enabled: bool,
    pub single_axis_commands: bool,
    pub manual: bool,
    pub init_lock: bool,
    pub force_set_origin: bool,
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            single_axis_commands: false,
            manual: false,
            init_lock: true,
            force_set_origin: false,
        }
    }
}

/// Refresh intervals for the throttled WCO and override fields [reports].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub wco_busy: u8,
    pub wco_idle: u8,
    pub override_busy: u8,
    pub override_idle: u8,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            wco_busy: REPORT_WCO_REFRESH_BUSY_COUNT,
            wco_idle: REPORT_WCO_REFRESH_IDLE_COUNT,
            override_busy: REPORT_OVERRIDE_REFRESH_BUSY_COUNT,
            override_idle: REPORT_OVERRIDE_REFRESH_IDLE_COUNT,
        }
    }
}

impl RefreshConfig {
    /// Busy interval must not be shorter than the idle interval.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wco_busy < self.wco_idle {
            return Err(ConfigError::ValidationError(format!(
                "wco_busy {} is less than wco_idle {}",
                self.wco_busy, self.wco_idle
            )));
        }
        if self.override_busy < self.override_idle {
            return Err(ConfigError::ValidationError(format!(
                "override_busy {} is less than override_idle {}",
                self.override_busy, self.override_idle
            )));
        }
        if self.wco_idle < 2 {
            return Err(ConfigError::ValidationError(format!(
                "wco_idle {} must be at least 2",
                self.wco_idle
            )));
        }
        if self.override_idle < 1 {
            return Err(ConfigError::ValidationError(
                "override_idle must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Top-level controller configuration.
///
/// # TOML Example
///
/// ```toml
/// axis_count = 3
/// report_inches = false
///
/// [shared]
/// service_name = "mill-01"
///
/// [status_report]
/// machine_position = false
/// pin_state = true
///
/// [capabilities]
/// variable_spindle = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default)]
    pub shared: SharedConfig,

    /// Number of configured axes (1..=6).
    #[serde(default = "default_axis_count")]
    pub axis_count: u8,

    /// Report positions and rates in inches.
    #[serde(default)]
    pub report_inches: bool,

    /// Lathe mode (diameter mode and G7/G8 reporting).
    #[serde(default)]
    pub lathe_mode: bool,

    /// Enable parking override control (M56).
    #[serde(default)]
    pub parking_override_control: bool,

    /// Use legacy single-character realtime commands.
    #[serde(default = "default_true")]
    pub legacy_rt_commands: bool,

    /// Number of tools in the tool table (0 = no table).
    #[serde(default)]
    pub n_tools: u8,

    #[serde(default)]
    pub status_report: StatusReportConfig,

    #[serde(default)]
    pub capabilities: Capabilities,

    #[serde(default)]
    pub homing: HomingConfig,

    #[serde(default)]
    pub refresh: RefreshConfig,
}

fn default_axis_count() -> u8 {
    DEFAULT_AXIS_COUNT
}

fn default_true() -> bool {
    true
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            shared: SharedConfig::default(),
            axis_count: DEFAULT_AXIS_COUNT,
            report_inches: false,
            lathe_mode: false,
            parking_override_control: false,
            legacy_rt_commands: true,
            n_tools: 0,
            status_report: StatusReportConfig::default(),
            capabilities: Capabilities::default(),
            homing: HomingConfig::default(),
            refresh: RefreshConfig::default(),
        }
    }
}

impl ControllerConfig {
    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        if self.axis_count == 0 || self.axis_count as usize > MAX_AXES {
            return Err(ConfigError::ValidationError(format!(
                "axis_count {} out of range [1, {}]",
                self.axis_count, MAX_AXES
            )));
        }
        self.refresh.validate()
    }

    /// Load from `path` and validate, logging the outcome.
    pub fn load_validated(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load(path).inspect_err(|e| {
            warn!(path = %path.display(), error = %e, "failed to load controller configuration");
        })?;
        config.validate().inspect_err(|e| {
            warn!(path = %path.display(), error = %e, "controller configuration rejected");
        })?;
        debug!(
            path = %path.display(),
            axes = config.axis_count,
            inches = config.report_inches,
            "controller configuration loaded"
        );
        Ok(config)
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
