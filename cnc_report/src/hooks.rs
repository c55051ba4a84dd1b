//! Extension hook chains.
//!
//! Each entry point (state change, step pulse start, spindle state,
//! settings change, realtime report, report options, unknown system
//! command, unknown feedback message) owns an ordered list of handlers.
//! Handlers run in registration order; a plugin registers one shared object
//! into as many chains as it needs.

use std::fmt;
use std::sync::Arc;

use cnc_common::config::ControllerConfig;
use cnc_common::report_flags::ReportFlags;
use cnc_common::state::{AxesSignals, MachineState, SpindleState};
use cnc_common::status::StatusCode;
use static_assertions::assert_impl_all;
use tracing::debug;

use crate::stream::StreamWriter;

// ─── Handler Traits ─────────────────────────────────────────────────

/// Machine state transitions.
pub trait StateChangeHandler: Send + Sync {
    fn on_state_change(&self, state: MachineState);
}

/// Step pulse start; runs in the step generation context and must be short.
pub trait PulseStartHandler: Send + Sync {
    fn on_pulse_start(&self, step_outbits: AxesSignals);
}

/// Spindle output changes.
pub trait SpindleStateHandler: Send + Sync {
    fn on_spindle_set_state(&self, state: SpindleState, rpm: f32);
}

/// Settings were changed and applied.
pub trait SettingsChangedHandler: Send + Sync {
    fn on_settings_changed(&self, config: &ControllerConfig);
}

/// Appends plugin fields to the status line before its closing `>`.
pub trait RealtimeReportHandler: Send + Sync {
    fn on_realtime_report(&self, out: &mut dyn StreamWriter, flags: ReportFlags);
}

/// Build info extension: `newopt` is true while the `[NEWOPT:` line is
/// open (append `,NAME` entries), false after the fixed lines (append whole
/// lines such as `[PLUGIN:...]`).
pub trait ReportOptionsHandler: Send + Sync {
    fn on_report_options(&self, out: &mut dyn StreamWriter, newopt: bool);
}

/// `$` commands the core does not recognise. Return
/// [`StatusCode::Unhandled`] to pass the command on.
pub trait SysCommandHandler: Send + Sync {
    fn on_unknown_sys_command(
        &self,
        state: MachineState,
        line: &str,
        out: &mut dyn StreamWriter,
    ) -> StatusCode;
}

/// Text for plugin feedback message codes. Return true when handled.
pub trait FeedbackMessageHandler: Send + Sync {
    fn on_unknown_feedback_message(&self, code: u8, out: &mut dyn StreamWriter) -> bool;
}

// ─── Chain ──────────────────────────────────────────────────────────

/// Ordered handler list for one entry point.
pub struct HookChain<H: ?Sized> {
    handlers: Vec<Arc<H>>,
}

impl<H: ?Sized> HookChain<H> {
    pub const fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Append `handler`; it runs after every handler registered before it.
    pub fn push(&mut self, handler: Arc<H>) {
        self.handlers.push(handler);
    }

    pub fn iter(&self) -> impl Iterator<Item = &H> {
        self.handlers.iter().map(|h| &**h)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<H: ?Sized> Default for HookChain<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized> fmt::Debug for HookChain<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookChain")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

// ─── Hook Registry ──────────────────────────────────────────────────

/// All extension entry points of the controller.
#[derive(Debug, Default)]
pub struct Hooks {
    pub state_change: HookChain<dyn StateChangeHandler>,
    pub pulse_start: HookChain<dyn PulseStartHandler>,
    pub spindle_set_state: HookChain<dyn SpindleStateHandler>,
    pub settings_changed: HookChain<dyn SettingsChangedHandler>,
    pub realtime_report: HookChain<dyn RealtimeReportHandler>,
    pub report_options: HookChain<dyn ReportOptionsHandler>,
    pub sys_command: HookChain<dyn SysCommandHandler>,
    pub feedback_message: HookChain<dyn FeedbackMessageHandler>,
}

assert_impl_all!(Hooks: Send, Sync);

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_state_change(&mut self, handler: Arc<dyn StateChangeHandler>) {
        debug!(position = self.state_change.len(), "state change hook registered");
        self.state_change.push(handler);
    }

    pub fn on_pulse_start(&mut self, handler: Arc<dyn PulseStartHandler>) {
        debug!(position = self.pulse_start.len(), "pulse start hook registered");
        self.pulse_start.push(handler);
    }

    pub fn on_spindle_set_state(&mut self, handler: Arc<dyn SpindleStateHandler>) {
        debug!(position = self.spindle_set_state.len(), "spindle hook registered");
        self.spindle_set_state.push(handler);
    }

    pub fn on_settings_changed(&mut self, handler: Arc<dyn SettingsChangedHandler>) {
        debug!(position = self.settings_changed.len(), "settings hook registered");
        self.settings_changed.push(handler);
    }

    pub fn on_realtime_report(&mut self, handler: Arc<dyn RealtimeReportHandler>) {
        debug!(position = self.realtime_report.len(), "realtime report hook registered");
        self.realtime_report.push(handler);
    }

    pub fn on_report_options(&mut self, handler: Arc<dyn ReportOptionsHandler>) {
        debug!(position = self.report_options.len(), "report options hook registered");
        self.report_options.push(handler);
    }

    pub fn on_unknown_sys_command(&mut self, handler: Arc<dyn SysCommandHandler>) {
        debug!(position = self.sys_command.len(), "system command hook registered");
        self.sys_command.push(handler);
    }

    pub fn on_unknown_feedback_message(&mut self, handler: Arc<dyn FeedbackMessageHandler>) {
        self.feedback_message.push(handler);
    }

    // ─── Dispatch ───────────────────────────────────────────────────

    pub fn state_changed(&self, state: MachineState) {
        for handler in self.state_change.iter() {
            handler.on_state_change(state);
        }
    }

    pub fn pulse_started(&self, step_outbits: AxesSignals) {
        for handler in self.pulse_start.iter() {
            handler.on_pulse_start(step_outbits);
        }
    }

    pub fn spindle_state_set(&self, state: SpindleState, rpm: f32) {
        for handler in self.spindle_set_state.iter() {
            handler.on_spindle_set_state(state, rpm);
        }
    }

    pub fn settings_applied(&self, config: &ControllerConfig) {
        for handler in self.settings_changed.iter() {
            handler.on_settings_changed(config);
        }
    }

    pub fn realtime_report(&self, out: &mut dyn StreamWriter, flags: ReportFlags) {
        for handler in self.realtime_report.iter() {
            handler.on_realtime_report(out, flags);
        }
    }

    pub fn report_options(&self, out: &mut dyn StreamWriter, newopt: bool) {
        for handler in self.report_options.iter() {
            handler.on_report_options(out, newopt);
        }
    }

    /// Offer `line` to each handler until one handles it.
    pub fn unknown_sys_command(
        &self,
        state: MachineState,
        line: &str,
        out: &mut dyn StreamWriter,
    ) -> StatusCode {
        self.sys_command
            .iter()
            .map(|handler| handler.on_unknown_sys_command(state, line, out))
            .find(|status| *status != StatusCode::Unhandled)
            .unwrap_or(StatusCode::Unhandled)
    }

    pub fn unknown_feedback_message(&self, code: u8, out: &mut dyn StreamWriter) -> bool {
        self.feedback_message
            .iter()
            .any(|handler| handler.on_unknown_feedback_message(code, out))
    }
}
