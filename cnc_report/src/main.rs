//! # CNC Report
//!
//! Drives the status report generator and the catalog enumerator against a
//! simulated machine and writes the protocol stream to stdout. Useful for
//! checking a controller configuration against host software without
//! hardware attached.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use cnc_common::config::{ConfigLoader, ControllerConfig};
use cnc_common::consts::{DEFAULT_CONFIG_PATH, MAX_AXES};
use cnc_common::report_flags::{ExecFlags, ReportFlags, SharedReportState};
use cnc_common::settings::{SettingId, SettingValue, SettingsStore};
use cnc_common::snapshot::MachineSnapshot;
use cnc_common::state::{CoolantState, CoordSystemId, MachineState, SpindleState};
use cnc_common::status::{MessageCode, MessageType};
use cnc_report::catalog::Catalog;
use cnc_report::catalog::help::report_help;
use cnc_report::core_settings::core_chain;
use cnc_report::format::ValueFormatter;
use cnc_report::hooks::{Hooks, SpindleStateHandler, StateChangeHandler};
use cnc_report::messages::{feedback_message, help_line, message, welcome};
use cnc_report::ngc::{
    self, BuildInfo, CoordinateStore, StoreError, SystemParameters, ToolData, build_info,
};
use cnc_report::status::StatusReporter;
use cnc_report::stream::{IoStream, StreamWriter};
use serde::Deserialize;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// CNC Report: status and catalog protocol simulator
#[derive(Parser, Debug)]
#[command(name = "cnc_report")]
#[command(version)]
#[command(about = "Emit status reports and settings listings for a simulated CNC controller")]
struct Args {
    /// Path to controller configuration TOML.
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Number of status reports to emit.
    #[arg(long, default_value_t = 12)]
    cycles: u32,

    /// Dump build info, settings, parameters and help after the reports.
    #[arg(long)]
    dump: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

/// `[build]` table of the configuration file.
#[derive(Debug, Default, Deserialize)]
struct BuildSection {
    #[serde(default)]
    build: BuildTable,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BuildTable {
    info: String,
    rx_buffer_size: u16,
    driver: Option<String>,
    driver_version: Option<String>,
    board: Option<String>,
    max_step_rate: Option<u32>,
}

impl From<BuildTable> for BuildInfo {
    fn from(table: BuildTable) -> Self {
        Self {
            line: table.info,
            rx_buffer_size: table.rx_buffer_size,
            nvs_storage: None,
            driver: table.driver,
            driver_version: table.driver_version,
            driver_options: None,
            board: table.board,
            max_step_rate: table.max_step_rate,
        }
    }
}

fn main() {
    let args = Args::parse();

    // Tracing is configured from the file, so load before installing it.
    let loaded = ControllerConfig::load_validated(&args.config);
    let default_level = match &loaded {
        Ok(config) => config.shared.log_level.as_directive(),
        Err(_) => "info",
    };
    setup_tracing(&args, default_level);

    info!("CNC Report v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = loaded
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|config| run(&args, &config));

    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

fn run(args: &Args, config: &ControllerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let build: BuildInfo = BuildSection::load(&args.config)?.build.into();

    let mut hooks = Hooks::new();
    hooks.on_state_change(Arc::new(StateLogger));
    hooks.on_spindle_set_state(Arc::new(StateLogger));
    hooks.settings_applied(config);

    let shared = Arc::new(SharedReportState::new());
    let mut reporter = StatusReporter::new(config, Arc::clone(&shared));
    let catalog = Catalog::new(core_chain(), config);

    info!(
        service = %config.shared.service_name,
        axes = config.axis_count,
        settings = catalog.chain().setting_count(),
        "Config OK"
    );

    let stdout = io::stdout();
    let mut out = IoStream::new(stdout.lock());

    welcome(&mut out, reporter.counters());
    help_line(&mut out);

    let mut machine = SimulatedMachine::new(args.cycles);
    for cycle in 0..args.cycles {
        let snapshot = machine.step(cycle, &shared, &hooks);
        reporter.emit(&snapshot, &hooks, &mut out);

        let exec = shared.exec.take();
        if exec.contains(ExecFlags::GCODE_REPORT) {
            ngc::gcode_modes(&mut out, &snapshot.parser, snapshot.tool_change_pending, config);
        }
        if exec.contains(ExecFlags::TLO_REPORT) {
            ngc::tool_offsets(&mut out, &ValueFormatter::from_config(config), &snapshot.parser);
        }
    }

    feedback_message(&mut out, MessageCode::ProgramEnd, &hooks);

    if args.dump {
        dump(&mut out, config, &catalog, &build, &machine, &hooks);
    }

    out.flush()?;
    if let Some(e) = out.take_error() {
        return Err(Box::new(e));
    }

    info!(cycles = args.cycles, "simulation complete");
    Ok(())
}

fn dump(
    out: &mut dyn StreamWriter,
    config: &ControllerConfig,
    catalog: &Catalog,
    build: &BuildInfo,
    machine: &SimulatedMachine,
    hooks: &Hooks,
) {
    build_info(out, build, config, true, hooks);
    catalog.setting_values(false, &DefaultStore::new(), out);

    let params = SystemParameters {
        homed: machine.last.homed,
        ..Default::default()
    };
    let tools = vec![ToolData::default(); config.n_tools as usize];
    let status = ngc::ngc_parameters(
        out,
        config,
        &machine.last.parser,
        &ZeroCoordinates,
        &tools,
        &params,
    );
    debug!(?status, "parameter dump finished");

    report_help(catalog, "", out);
    message(out, "simulation finished", MessageType::Info);
}

// ─── Simulation ─────────────────────────────────────────────────────

/// Scripted machine: idle, a short X move with spindle and flood, a feed
/// hold, then idle again.
struct SimulatedMachine {
    cycles: u32,
    last: MachineSnapshot,
}

impl SimulatedMachine {
    fn new(cycles: u32) -> Self {
        let mut last = MachineSnapshot {
            planner_blocks_available: Some(35),
            rx_buffer_available: Some(1024),
            ..Default::default()
        };
        last.parser.feed_rate = 500.0;
        Self { cycles, last }
    }

    fn step(&mut self, cycle: u32, shared: &SharedReportState, hooks: &Hooks) -> MachineSnapshot {
        let mut s = self.last;
        let hold_at = self.cycles.saturating_sub(3);
        let state = match cycle {
            0 => MachineState::Idle,
            c if c + 1 >= self.cycles => MachineState::Idle,
            c if c >= hold_at => MachineState::Hold,
            _ => MachineState::Cycle,
        };

        if state != s.state {
            hooks.state_changed(state);
        }

        match state {
            MachineState::Cycle => {
                if s.state != MachineState::Cycle {
                    s.spindle = SpindleState::ON;
                    s.spindle_rpm = 12_000.0;
                    s.coolant = CoolantState::FLOOD;
                    s.parser.modal.spindle = s.spindle;
                    s.parser.modal.coolant = s.coolant;
                    s.parser.spindle_rpm = s.spindle_rpm;
                    hooks.spindle_state_set(s.spindle, s.spindle_rpm);
                    shared
                        .flags
                        .raise(ReportFlags::SPINDLE | ReportFlags::COOLANT);
                }
                s.machine_position[0] += 1.0;
                s.realtime_rate = s.parser.feed_rate;
                s.line_number = Some(cycle as i32 * 10);
            }
            MachineState::Hold => {
                s.holding_state = 2;
                s.realtime_rate = 0.0;
            }
            _ => {
                if s.spindle.is_on() {
                    s.spindle = SpindleState::empty();
                    s.spindle_rpm = 0.0;
                    hooks.spindle_state_set(s.spindle, 0.0);
                    shared.flags.raise(ReportFlags::SPINDLE);
                }
                s.coolant = CoolantState::empty();
                s.line_number = None;
                s.realtime_rate = 0.0;
            }
        }

        if cycle == 2 {
            s.work_offset[2] = -5.0;
            s.parser.modal.coord_system = 1;
            shared.flags.raise(ReportFlags::WCO | ReportFlags::GWCO);
        }

        s.state = state;
        self.last = s;
        s
    }
}

struct StateLogger;

impl StateChangeHandler for StateLogger {
    fn on_state_change(&self, state: MachineState) {
        debug!(?state, "machine state changed");
    }
}

impl SpindleStateHandler for StateLogger {
    fn on_spindle_set_state(&self, state: SpindleState, rpm: f32) {
        debug!(?state, rpm, "spindle state changed");
    }
}

/// Settings store holding factory defaults.
struct DefaultStore {
    values: BTreeMap<SettingId, SettingValue>,
}

impl DefaultStore {
    fn new() -> Self {
        let mut values = BTreeMap::from([
            (0, SettingValue::Decimal(10.0)),
            (1, SettingValue::Integer(25)),
            (10, SettingValue::Integer(511)),
            (11, SettingValue::Decimal(0.01)),
            (12, SettingValue::Decimal(0.002)),
            (22, SettingValue::Integer(1)),
            (24, SettingValue::Decimal(25.0)),
            (25, SettingValue::Decimal(500.0)),
            (26, SettingValue::Integer(250)),
            (27, SettingValue::Decimal(1.0)),
            (30, SettingValue::Decimal(24_000.0)),
        ]);
        for axis in 0..MAX_AXES as SettingId {
            values.insert(100 + axis, SettingValue::Decimal(250.0));
            values.insert(110 + axis, SettingValue::Decimal(500.0));
            values.insert(120 + axis, SettingValue::Decimal(10.0));
            values.insert(130 + axis, SettingValue::Decimal(200.0));
        }
        Self { values }
    }
}

impl SettingsStore for DefaultStore {
    fn setting_value(&self, id: SettingId) -> Option<SettingValue> {
        Some(self.values.get(&id).cloned().unwrap_or(SettingValue::Integer(0)))
    }
}

struct ZeroCoordinates;

impl CoordinateStore for ZeroCoordinates {
    fn read_coord_data(&self, _id: CoordSystemId) -> Result<[f32; MAX_AXES], StoreError> {
        Ok([0.0; MAX_AXES])
    }
}

/// Setup tracing subscriber based on CLI arguments and the configured level.
fn setup_tracing(args: &Args, default_level: &str) {
    let level = if args.verbose { "debug" } else { default_level };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .compact()
            .init();
    }
}
