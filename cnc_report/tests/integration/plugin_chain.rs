//! Integration test: plugins registered across several hook chains.
//!
//! An odometer plugin counts step pulses, tracks motion state, answers its
//! own `$` command, appends a status field and announces itself in the
//! build info. A second plugin checks chain ordering and pass-through.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use cnc_common::config::{ControllerConfig, StatusReportConfig};
use cnc_common::report_flags::{ReportFlags, SharedReportState};
use cnc_common::settings::{
    Datatype, GroupFilter, SettingClass, SettingDescriptor, SettingId, SettingValue,
    SettingsRegistry, SettingsStore, group,
};
use cnc_common::snapshot::MachineSnapshot;
use cnc_common::state::{AxesSignals, MachineState};
use cnc_common::status::{MessageCode, StatusCode};
use cnc_report::catalog::{Catalog, RenderMode};
use cnc_report::core_settings::core_chain;
use cnc_report::hooks::{
    FeedbackMessageHandler, Hooks, PulseStartHandler, RealtimeReportHandler,
    ReportOptionsHandler, StateChangeHandler, SysCommandHandler,
};
use cnc_report::messages::feedback_message;
use cnc_report::ngc::{BuildInfo, build_info};
use cnc_report::status::StatusReporter;
use cnc_report::stream::StreamWriter;

const ODOMETER_SAVED: u8 = 200;

static ODOMETER_SETTINGS: [SettingDescriptor; 1] = [SettingDescriptor::new(
    520,
    group::GENERAL,
    "Odometer save interval",
    Datatype::Integer,
)
.unit("s")
.class(SettingClass::NonCore)];

// ── Plugins ─────────────────────────────────────────────────────────

#[derive(Default)]
struct Odometer {
    moving: AtomicBool,
    x_steps: AtomicU32,
    pulses: AtomicU32,
}

/// States in which the motors accumulate run time.
fn is_moving(state: MachineState) -> bool {
    matches!(
        state,
        MachineState::Cycle | MachineState::Jog | MachineState::Homing
    )
}

impl StateChangeHandler for Odometer {
    fn on_state_change(&self, state: MachineState) {
        self.moving.store(is_moving(state), Ordering::Release);
    }
}

impl PulseStartHandler for Odometer {
    fn on_pulse_start(&self, step_outbits: AxesSignals) {
        if self.moving.load(Ordering::Acquire) {
            self.pulses.fetch_add(1, Ordering::Relaxed);
            if step_outbits.contains(AxesSignals::X) {
                self.x_steps.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

impl RealtimeReportHandler for Odometer {
    fn on_realtime_report(&self, out: &mut dyn StreamWriter, _flags: ReportFlags) {
        write!(out, "|ODO:{}", self.x_steps.load(Ordering::Relaxed));
    }
}

impl ReportOptionsHandler for Odometer {
    fn on_report_options(&self, out: &mut dyn StreamWriter, newopt: bool) {
        if newopt {
            out.write(",ODO");
        } else {
            out.write("[PLUGIN:ODOMETERS v0.02]\r\n");
        }
    }
}

impl SysCommandHandler for Odometer {
    fn on_unknown_sys_command(
        &self,
        _state: MachineState,
        line: &str,
        out: &mut dyn StreamWriter,
    ) -> StatusCode {
        match line {
            "ODO" => {
                write!(out, "[ODOMETER:X={}]\r\n", self.x_steps.load(Ordering::Relaxed));
                StatusCode::Ok
            }
            "ODORST" => {
                self.x_steps.store(0, Ordering::Relaxed);
                StatusCode::Ok
            }
            _ => StatusCode::Unhandled,
        }
    }
}

impl FeedbackMessageHandler for Odometer {
    fn on_unknown_feedback_message(&self, code: u8, out: &mut dyn StreamWriter) -> bool {
        if code == ODOMETER_SAVED {
            out.write("Odometer data saved");
            true
        } else {
            false
        }
    }
}

/// Records the order in which chains reach it.
struct Tracer {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl StateChangeHandler for Tracer {
    fn on_state_change(&self, state: MachineState) {
        if let Ok(mut log) = self.log.lock() {
            log.push(format!("{}:{}", self.name, state.token()));
        }
    }
}

impl RealtimeReportHandler for Tracer {
    fn on_realtime_report(&self, out: &mut dyn StreamWriter, _flags: ReportFlags) {
        write!(out, "|{}", self.name);
    }
}

impl SysCommandHandler for Tracer {
    fn on_unknown_sys_command(
        &self,
        _state: MachineState,
        line: &str,
        _out: &mut dyn StreamWriter,
    ) -> StatusCode {
        if let Ok(mut log) = self.log.lock() {
            log.push(format!("{}:${line}", self.name));
        }
        if line == "TRC" {
            StatusCode::Ok
        } else {
            StatusCode::Unhandled
        }
    }
}

fn install() -> (Hooks, Arc<Odometer>, Arc<Mutex<Vec<String>>>) {
    let mut hooks = Hooks::new();
    let odometer = Arc::new(Odometer::default());
    let log = Arc::new(Mutex::new(Vec::new()));
    let tracer = Arc::new(Tracer {
        name: "TRC",
        log: Arc::clone(&log),
    });

    hooks.on_state_change(tracer.clone());
    hooks.on_state_change(odometer.clone());
    hooks.on_pulse_start(odometer.clone());
    hooks.on_realtime_report(odometer.clone());
    hooks.on_realtime_report(tracer.clone());
    hooks.on_report_options(odometer.clone());
    hooks.on_unknown_sys_command(odometer.clone());
    hooks.on_unknown_sys_command(tracer);
    hooks.on_unknown_feedback_message(odometer.clone());

    (hooks, odometer, log)
}

// ── Dispatch ────────────────────────────────────────────────────────

#[test]
fn one_plugin_object_serves_several_chains() {
    let (hooks, odometer, log) = install();

    hooks.pulse_started(AxesSignals::X);
    assert_eq!(odometer.pulses.load(Ordering::Relaxed), 0);

    hooks.state_changed(MachineState::Cycle);
    for _ in 0..5 {
        hooks.pulse_started(AxesSignals::X | AxesSignals::Y);
    }
    hooks.pulse_started(AxesSignals::Z);
    hooks.state_changed(MachineState::Idle);
    hooks.pulse_started(AxesSignals::X);

    assert_eq!(odometer.x_steps.load(Ordering::Relaxed), 5);
    assert_eq!(odometer.pulses.load(Ordering::Relaxed), 6);
    assert_eq!(
        log.lock().map(|l| l.clone()).unwrap_or_default(),
        ["TRC:Run", "TRC:Idle"]
    );
}

#[test]
fn realtime_fields_follow_registration_order() {
    let (hooks, odometer, _) = install();
    odometer.x_steps.store(12, Ordering::Relaxed);

    let config = ControllerConfig {
        status_report: StatusReportConfig::minimal(),
        ..Default::default()
    };
    let mut reporter = StatusReporter::new(&config, Arc::new(SharedReportState::new()));
    let mut out = String::new();
    reporter.emit(&MachineSnapshot::default(), &hooks, &mut out);

    assert_eq!(out, "<Idle|MPos:0.000,0.000,0.000|ODO:12|TRC>\r\n");
}

#[test]
fn sys_commands_pass_down_the_chain() {
    let (hooks, odometer, log) = install();
    odometer.x_steps.store(3, Ordering::Relaxed);

    let mut out = String::new();
    assert_eq!(
        hooks.unknown_sys_command(MachineState::Idle, "ODO", &mut out),
        StatusCode::Ok
    );
    assert_eq!(out, "[ODOMETER:X=3]\r\n");
    // Claimed by the first handler, the tracer never sees it.
    assert!(log.lock().map(|l| l.is_empty()).unwrap_or(false));

    let mut out = String::new();
    assert_eq!(
        hooks.unknown_sys_command(MachineState::Idle, "TRC", &mut out),
        StatusCode::Ok
    );
    assert_eq!(
        hooks.unknown_sys_command(MachineState::Idle, "NOPE", &mut out),
        StatusCode::Unhandled
    );
    assert!(out.is_empty());
    assert_eq!(
        log.lock().map(|l| l.clone()).unwrap_or_default(),
        ["TRC:$TRC", "TRC:$NOPE"]
    );
}

#[test]
fn empty_chain_leaves_commands_unhandled() {
    let hooks = Hooks::new();
    let mut out = String::new();
    assert_eq!(
        hooks.unknown_sys_command(MachineState::Idle, "ODO", &mut out),
        StatusCode::Unhandled
    );
    assert!(!hooks.unknown_feedback_message(ODOMETER_SAVED, &mut out));
    assert!(out.is_empty());
}

// ── Reports ─────────────────────────────────────────────────────────

#[test]
fn plugin_feedback_text() {
    let (hooks, _, _) = install();
    let mut out = String::new();
    feedback_message(&mut out, MessageCode::Extension(ODOMETER_SAVED), &hooks);
    feedback_message(&mut out, MessageCode::Extension(ODOMETER_SAVED + 1), &hooks);
    feedback_message(&mut out, MessageCode::ProgramEnd, &hooks);
    assert_eq!(
        out,
        "[MSG:Odometer data saved]\r\n[MSG:]\r\n[MSG:Pgm End]\r\n"
    );
}

#[test]
fn build_info_carries_plugin_options() {
    let (hooks, _, _) = install();
    let info = BuildInfo {
        line: "mill".into(),
        rx_buffer_size: 1024,
        ..Default::default()
    };
    let mut out = String::new();
    build_info(&mut out, &info, &ControllerConfig::default(), true, &hooks);

    let newopt = out
        .lines()
        .find(|l| l.starts_with("[NEWOPT:"))
        .unwrap_or_default();
    assert!(newopt.ends_with(",ODO]"), "{newopt}");
    assert!(out.ends_with("[PLUGIN:ODOMETERS v0.02]\r\n"));

    let mut short = String::new();
    build_info(&mut short, &info, &ControllerConfig::default(), false, &hooks);
    assert!(!short.contains("ODO"));
}

// ── Settings ────────────────────────────────────────────────────────

struct Store;

impl SettingsStore for Store {
    fn setting_value(&self, id: SettingId) -> Option<SettingValue> {
        (id == 520).then_some(SettingValue::Integer(60))
    }
}

#[test]
fn plugin_settings_join_the_catalog() {
    let mut catalog = Catalog::new(core_chain(), &ControllerConfig::default());
    assert!(catalog.register(SettingsRegistry::new("odometer", &ODOMETER_SETTINGS, &[])));

    let mut out = String::new();
    catalog.settings_details(GroupFilter::Group(group::GENERAL), RenderMode::Human, &mut out);
    assert!(out.ends_with("$520: Odometer save interval in s\r\n"));

    let mut legacy = String::new();
    catalog.setting_values(false, &Store, &mut legacy);
    assert!(!legacy.contains("$520="));

    let mut all = String::new();
    catalog.setting_values(true, &Store, &mut all);
    assert!(all.contains("$520=60\r\n"));
}
