//! Integration test: configuration-driven startup.
//!
//! Loads a controller configuration from TOML, brings up the reporter,
//! catalog and banner, and checks what the first reports look like before
//! and after a settings change.

use std::io::Write;
use std::sync::Arc;

use cnc_common::config::{ConfigError, ConfigLoader, ControllerConfig};
use cnc_common::report_flags::SharedReportState;
use cnc_common::settings::GroupFilter;
use cnc_common::snapshot::MachineSnapshot;
use cnc_common::state::MachineState;
use cnc_common::status::StatusCode;
use cnc_report::catalog::{Catalog, RenderMode};
use cnc_report::core_settings::core_chain;
use cnc_report::hooks::Hooks;
use cnc_report::messages::welcome;
use cnc_report::status::StatusReporter;

const MILL_CONFIG: &str = r#"
axis_count = 4
report_inches = false

[shared]
log_level = "debug"
service_name = "mill-01"

[status_report]
machine_position = false
buffer_state = false
feed_speed = false
pin_state = false

[capabilities]
variable_spindle = true
tool_change = true

[refresh]
wco_busy = 40
wco_idle = 10
"#;

fn mill() -> ControllerConfig {
    let config = ControllerConfig::from_toml(MILL_CONFIG).expect("mill config parses");
    config.validate().expect("mill config is valid");
    config
}

fn emit(reporter: &mut StatusReporter, snapshot: &MachineSnapshot) -> String {
    let mut out = String::new();
    reporter.emit(snapshot, &Hooks::new(), &mut out);
    out
}

#[test]
fn partial_toml_keeps_defaults() {
    let config = mill();
    assert_eq!(config.axis_count, 4);
    assert_eq!(config.shared.service_name, "mill-01");
    assert!(config.status_report.work_coord_offset);
    assert!(config.status_report.overrides);
    assert!(!config.status_report.machine_position);
    assert_eq!(config.refresh.wco_busy, 40);
    assert_eq!(config.refresh.override_busy, 20);
    assert!(config.legacy_rt_commands);
}

#[test]
fn first_report_after_startup_carries_wco_and_overrides() {
    let config = mill();
    let mut reporter = StatusReporter::new(&config, Arc::new(SharedReportState::new()));
    let mut banner = String::new();
    welcome(&mut banner, reporter.counters());
    assert!(banner.starts_with("\r\nGrblHAL "));

    let mut snapshot = MachineSnapshot::default();
    snapshot.machine_position[0] = 10.0;
    snapshot.work_offset[0] = 2.5;

    let first = emit(&mut reporter, &snapshot);
    assert_eq!(
        first,
        "<Idle|WPos:7.500,0.000,0.000,0.000|WCO:2.500,0.000,0.000,0.000|Ov:100,100,100>\r\n"
    );

    let second = emit(&mut reporter, &snapshot);
    assert_eq!(second, "<Idle|WPos:7.500,0.000,0.000,0.000>\r\n");
}

#[test]
fn welcome_restarts_refresh_counters() {
    let config = mill();
    let mut reporter = StatusReporter::new(&config, Arc::new(SharedReportState::new()));
    let snapshot = MachineSnapshot {
        state: MachineState::Cycle,
        ..Default::default()
    };

    for _ in 0..3 {
        emit(&mut reporter, &snapshot);
    }
    assert!(!emit(&mut reporter, &snapshot).contains("|WCO:"));

    let mut banner = String::new();
    welcome(&mut banner, reporter.counters());
    let line = emit(&mut reporter, &snapshot);
    assert!(line.contains("|WCO:"), "{line}");
    assert!(line.contains("|Ov:"), "{line}");
}

#[test]
fn reconfigure_applies_new_fields_and_units() {
    let mut config = mill();
    let mut reporter = StatusReporter::new(&config, Arc::new(SharedReportState::new()));
    let mut snapshot = MachineSnapshot::default();
    snapshot.machine_position[0] = 25.4;

    emit(&mut reporter, &snapshot);

    config.report_inches = true;
    config.status_report.machine_position = true;
    config.status_report.work_coord_offset = false;
    config.status_report.overrides = false;
    reporter.reconfigure(&config);

    assert_eq!(
        emit(&mut reporter, &snapshot),
        "<Idle|MPos:1.0000,0.0000,0.0000,0.0000>\r\n"
    );
}

#[test]
fn catalog_follows_configured_capabilities() {
    let config = mill();
    let catalog = Catalog::new(core_chain(), &config);

    let mut out = String::new();
    let status = catalog.settings_details(GroupFilter::All, RenderMode::Human, &mut out);
    assert_eq!(status, StatusCode::Ok);
    assert!(out.contains("$33: Spindle PWM frequency in Hz\r\n"));
    assert!(out.contains("$341: Tool change mode:"));
    assert!(out.contains("$103: A-axis travel resolution in step/mm\r\n"));
    assert!(!out.contains("$6: "));
}

#[test]
fn invalid_refresh_intervals_are_rejected() {
    let config = ControllerConfig::from_toml("[refresh]\nwco_busy = 5\nwco_idle = 10\n")
        .expect("toml parses");
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError(_))
    ));
}

#[test]
fn load_validated_reads_a_config_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(MILL_CONFIG.as_bytes()).expect("write config");

    let config = ControllerConfig::load_validated(file.path()).expect("config loads");
    assert_eq!(config.axis_count, 4);

    let missing = ControllerConfig::load_validated(std::path::Path::new("/nonexistent/cnc.toml"));
    assert!(matches!(missing, Err(ConfigError::FileNotFound)));
}
