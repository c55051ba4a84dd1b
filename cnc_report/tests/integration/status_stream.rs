//! Integration test: status report streams over many cycles.
//!
//! Validates the line grammar for every machine state, the refresh interval
//! of the throttled fields and dirty-flag delivery between producers and
//! the generator.

use std::sync::Arc;
use std::thread;

use cnc_common::config::{ControllerConfig, RefreshConfig, StatusReportConfig};
use cnc_common::report_flags::{ReportFlags, SharedReportState};
use cnc_common::snapshot::MachineSnapshot;
use cnc_common::state::{AxesSignals, ControlSignals, MachineState, ProbeState};
use cnc_report::hooks::Hooks;
use cnc_report::status::StatusReporter;

const ALL_STATES: [MachineState; 11] = [
    MachineState::Idle,
    MachineState::Cycle,
    MachineState::Hold,
    MachineState::Jog,
    MachineState::Homing,
    MachineState::Alarm,
    MachineState::EStop,
    MachineState::CheckMode,
    MachineState::SafetyDoor,
    MachineState::Sleep,
    MachineState::ToolChange,
];

const TOKENS: [&str; 10] = [
    "Idle", "Run", "Hold", "Jog", "Home", "Alarm", "Check", "Door", "Sleep", "Tool",
];

fn reporter(config: &ControllerConfig) -> StatusReporter {
    StatusReporter::new(config, Arc::new(SharedReportState::new()))
}

fn emit(r: &mut StatusReporter, snapshot: &MachineSnapshot) -> String {
    let mut out = String::new();
    r.emit(snapshot, &Hooks::new(), &mut out);
    out
}

// ── Line grammar ────────────────────────────────────────────────────

#[test]
fn every_state_yields_one_token_and_closes_the_line() {
    let mut config = ControllerConfig::default();
    config.status_report.alarm_substate = true;
    config.status_report.run_substate = true;
    config.status_report.line_numbers = true;
    config.capabilities.variable_spindle = true;
    let mut r = reporter(&config);

    for state in ALL_STATES {
        for pending in [false, true] {
            let snapshot = MachineSnapshot {
                state,
                alarm: 3,
                holding_state: 1,
                parking_state: 2,
                tool_change_pending: pending,
                limits: AxesSignals::Y,
                control: ControlSignals::FEED_HOLD,
                line_number: Some(42),
                ..Default::default()
            };
            let line = emit(&mut r, &snapshot);

            assert!(line.starts_with('<'), "{line:?}");
            assert!(line.ends_with(">\r\n"), "{line:?}");
            assert_eq!(line.matches('<').count(), 1);

            let token = line[1..]
                .split(|c| c == '|' || c == ':')
                .next()
                .unwrap_or_default();
            assert_eq!(TOKENS.iter().filter(|t| **t == token).count(), 1, "{line:?}");
        }
    }
}

#[test]
fn minimal_idle_line_is_exact() {
    let config = ControllerConfig {
        status_report: StatusReportConfig::minimal(),
        ..Default::default()
    };
    let mut r = reporter(&config);
    assert_eq!(
        emit(&mut r, &MachineSnapshot::default()),
        "<Idle|MPos:0.000,0.000,0.000>\r\n"
    );
}

#[test]
fn six_axis_work_position_keeps_every_value() {
    let mut config = ControllerConfig {
        axis_count: 6,
        status_report: StatusReportConfig::minimal(),
        ..Default::default()
    };
    config.status_report.machine_position = false;
    let mut r = reporter(&config);
    let snapshot = MachineSnapshot {
        machine_position: [-1234567.0; 6],
        work_offset: [1234567.0; 6],
        ..Default::default()
    };

    let values = ["-2469134.000"; 6].join(",");
    assert_eq!(emit(&mut r, &snapshot), format!("<Idle|WPos:{values}>\r\n"));
}

#[test]
fn hold_stage_two_reports_one() {
    let config = ControllerConfig {
        status_report: StatusReportConfig::minimal(),
        ..Default::default()
    };
    let mut r = reporter(&config);
    let snapshot = MachineSnapshot {
        state: MachineState::Hold,
        holding_state: 2,
        ..Default::default()
    };
    assert_eq!(emit(&mut r, &snapshot), "<Hold:1|MPos:0.000,0.000,0.000>\r\n");
}

#[test]
fn default_fields_in_fixed_order() {
    let mut r = reporter(&ControllerConfig::default());
    let mut snapshot = MachineSnapshot {
        state: MachineState::Cycle,
        planner_blocks_available: Some(15),
        rx_buffer_available: Some(128),
        realtime_rate: 800.0,
        limits: AxesSignals::X | AxesSignals::Z,
        probe: Some(ProbeState {
            connected: true,
            triggered: true,
        }),
        ..Default::default()
    };
    snapshot.machine_position = [1.0, 2.0, 3.0, 0.0, 0.0, 0.0];
    snapshot.work_offset = [0.5, 0.0, 0.0, 0.0, 0.0, 0.0];

    assert_eq!(
        emit(&mut r, &snapshot),
        "<Run|MPos:1.000,2.000,3.000|Bf:15,128|F:800|Pn:PXZ|WCO:0.500,0.000,0.000|Ov:100,100,100>\r\n"
    );
}

// ── Refresh counters ────────────────────────────────────────────────

fn throttled_only() -> ControllerConfig {
    ControllerConfig {
        status_report: StatusReportConfig {
            work_coord_offset: true,
            overrides: true,
            ..StatusReportConfig::minimal()
        },
        ..Default::default()
    }
}

fn field_positions(r: &mut StatusReporter, snapshot: &MachineSnapshot, calls: usize, field: &str) -> Vec<usize> {
    (0..calls)
        .filter(|_| emit(r, snapshot).contains(field))
        .collect()
}

fn assert_period(positions: &[usize], interval: usize) {
    assert_eq!(positions.first(), Some(&0));
    for pair in positions.windows(2) {
        assert_eq!(pair[1] - pair[0], interval, "{positions:?}");
    }
}

#[test]
fn busy_machine_refreshes_at_busy_interval() {
    let config = throttled_only();
    let refresh = RefreshConfig::default();
    let mut r = reporter(&config);
    let running = MachineSnapshot {
        state: MachineState::Cycle,
        ..Default::default()
    };

    let wco = field_positions(&mut r, &running, 100, "|WCO:");
    assert_period(&wco, refresh.wco_busy as usize);

    let mut r = reporter(&config);
    let ov = field_positions(&mut r, &running, 100, "|Ov:");
    assert_period(&ov, refresh.override_busy as usize);
}

#[test]
fn idle_machine_refreshes_at_idle_interval() {
    let config = throttled_only();
    let refresh = RefreshConfig::default();
    let mut r = reporter(&config);
    let idle = MachineSnapshot::default();

    let wco = field_positions(&mut r, &idle, 50, "|WCO:");
    assert_period(&wco, refresh.wco_idle as usize);
    assert_eq!(wco.len(), 50 / refresh.wco_idle as usize);
}

#[test]
fn dirty_wco_restarts_the_interval() {
    let config = throttled_only();
    let mut r = reporter(&config);
    let idle = MachineSnapshot::default();

    assert!(emit(&mut r, &idle).contains("|WCO:"));
    for _ in 0..3 {
        assert!(!emit(&mut r, &idle).contains("|WCO:"));
    }
    r.shared().flags.raise(ReportFlags::WCO);
    assert!(emit(&mut r, &idle).contains("|WCO:"));

    let next: Vec<_> = (0..10).map(|_| emit(&mut r, &idle).contains("|WCO:")).collect();
    assert_eq!(next.iter().position(|hit| *hit), Some(9));
}

#[test]
fn disabled_fields_never_appear_even_when_flagged() {
    let config = ControllerConfig {
        status_report: StatusReportConfig::minimal(),
        ..Default::default()
    };
    let mut r = reporter(&config);
    r.shared().flags.raise(ReportFlags::WCO | ReportFlags::OVERRIDES);
    let line = emit(&mut r, &MachineSnapshot::default());
    assert_eq!(line, "<Idle|MPos:0.000,0.000,0.000>\r\n");
}

// ── Dirty flags across threads ──────────────────────────────────────

#[test]
fn flags_raised_by_other_threads_reach_the_next_report() {
    let config = ControllerConfig {
        status_report: StatusReportConfig::minimal(),
        ..Default::default()
    };
    let shared = Arc::new(SharedReportState::new());
    let mut r = StatusReporter::new(&config, Arc::clone(&shared));
    let snapshot = MachineSnapshot::default();

    let producer = {
        let shared = Arc::clone(&shared);
        thread::spawn(move || shared.flags.raise(ReportFlags::TOOL))
    };
    producer.join().expect("producer thread");

    assert!(emit(&mut r, &snapshot).contains("|T:0"));
    assert!(!emit(&mut r, &snapshot).contains("|T:"));
}
