//! Parser state change detection.

use cnc_common::snapshot::{GcModal, ParserSnapshot};

/// Last parser values seen by the status generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserWatch {
    feed_rate: f32,
    spindle_rpm: f32,
    tool: u32,
    g92_active: bool,
    modal: GcModal,
}

impl ParserWatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare against the previous call and remember what changed.
    ///
    /// Feed rate, spindle speed and tool are checked first, then the G92
    /// offset state, then the full modal state; only the first changed
    /// group is latched per call.
    pub fn changed(&mut self, parser: &ParserSnapshot) -> bool {
        if self.feed_rate != parser.feed_rate
            || self.spindle_rpm != parser.spindle_rpm
            || self.tool != parser.tool
        {
            self.feed_rate = parser.feed_rate;
            self.spindle_rpm = parser.spindle_rpm;
            self.tool = parser.tool;
            true
        } else if self.g92_active != parser.g92_active() {
            self.g92_active = !self.g92_active;
            true
        } else if self.modal != parser.modal {
            self.modal = parser.modal;
            true
        } else {
            false
        }
    }
}
