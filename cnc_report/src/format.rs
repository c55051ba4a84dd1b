//! Value formatter: axis vectors, rates, coordinate systems and axis sets.
//!
//! The unit mode is selected once from configuration; positions arrive in
//! millimeters and are converted here when reporting in inches.

use cnc_common::config::ControllerConfig;
use cnc_common::consts::{
    INCH_PER_MM, MAX_AXES, N_DECIMAL_COORDVALUE_INCH, N_DECIMAL_COORDVALUE_MM, X_AXIS,
};
use cnc_common::state::{AxesSignals, CoordSystemId};

use crate::line::LineBuffer;

/// Reporting units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitMode {
    #[default]
    Metric,
    Imperial,
}

impl UnitMode {
    #[inline]
    const fn scale(self) -> f32 {
        match self {
            Self::Metric => 1.0,
            Self::Imperial => INCH_PER_MM,
        }
    }

    #[inline]
    const fn decimals(self) -> usize {
        match self {
            Self::Metric => N_DECIMAL_COORDVALUE_MM,
            Self::Imperial => N_DECIMAL_COORDVALUE_INCH,
        }
    }
}

/// Numeric formatter bound to a unit mode and axis count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueFormatter {
    units: UnitMode,
    axis_count: u8,
}

impl ValueFormatter {
    pub const fn new(units: UnitMode, axis_count: u8) -> Self {
        let axis_count = if axis_count as usize > MAX_AXES {
            MAX_AXES as u8
        } else {
            axis_count
        };
        Self { units, axis_count }
    }

    pub fn from_config(config: &ControllerConfig) -> Self {
        let units = if config.report_inches {
            UnitMode::Imperial
        } else {
            UnitMode::Metric
        };
        Self::new(units, config.axis_count)
    }

    #[inline]
    pub const fn units(&self) -> UnitMode {
        self.units
    }

    #[inline]
    pub const fn axis_count(&self) -> u8 {
        self.axis_count
    }

    /// Comma separated axis values. In diameter mode X is reported doubled.
    pub fn push_axis_values(
        &self,
        line: &mut LineBuffer,
        values: &[f32; MAX_AXES],
        diameter_mode: bool,
    ) {
        let scale = self.units.scale();
        for (idx, value) in values.iter().take(self.axis_count as usize).enumerate() {
            if idx > 0 {
                line.push(',');
            }
            let mut v = *value * scale;
            if idx == X_AXIS && diameter_mode {
                v *= 2.0;
            }
            line.push_fixed(v, self.units.decimals());
        }
    }

    /// Single linear value.
    pub fn push_axis_value(&self, line: &mut LineBuffer, value: f32) {
        line.push_fixed(value * self.units.scale(), self.units.decimals());
    }

    /// Rate in whole units per minute, truncated.
    #[inline]
    pub fn rate(&self, value: f32) -> u32 {
        (value * self.units.scale()) as u32
    }

    /// All-axes mask for the configured axis count.
    #[inline]
    pub const fn all_axes(&self) -> AxesSignals {
        AxesSignals::for_axis_count(self.axis_count)
    }
}

/// Append the G5x name of a work coordinate system without the `G`
/// (`54`..`59`, then `59.1`..`59.3`).
pub fn push_coord_system(line: &mut LineBuffer, id: CoordSystemId) {
    let g5x = id as u32 + 54;
    if g5x > 59 {
        line.push_str("59.");
        line.push_display(g5x - 59);
    } else {
        line.push_display(g5x);
    }
}

/// Append the letters of the axes set in `signals`.
pub fn push_axis_letters(line: &mut LineBuffer, signals: AxesSignals) {
    for letter in signals.letters() {
        line.push_str(letter);
    }
}

/// Round a speed to the nearest whole RPM, half away from zero.
#[inline]
pub fn round_rpm(rpm: f32) -> u32 {
    rpm.round() as u32
}
