//! Real-time status report generator.
//!
//! Composes `<STATE|MPos:...|...>` lines from a [`MachineSnapshot`] and the
//! process-wide report flags. The generator runs in the foreground at up to
//! 20 Hz, so it never allocates and never logs above `trace`.
//!
//! # Synchronization
//!
//! Producers raise [`ReportFlags`] with an atomic OR at any time. Each call
//! takes the whole set with a single atomic swap, so a flag raised while a
//! line is being composed shows up in the next line. The refresh counters
//! belong to the generator.

pub mod parser_watch;
pub mod pins;
pub mod refresh;

use std::sync::Arc;

use cnc_common::config::{Capabilities, ControllerConfig, HomingConfig, StatusReportConfig};
use cnc_common::consts::{ASCII_EOL, FIRMWARE_NAME};
use cnc_common::report_flags::{ExecFlags, ReportFlags, SharedReportState};
use cnc_common::snapshot::MachineSnapshot;
use cnc_common::state::{CoolantState, MachineState, ProbeState, ProbingState, SpindleState};
use tracing::trace;

use crate::format::{ValueFormatter, push_axis_letters, push_coord_system, round_rpm};
use crate::hooks::Hooks;
use crate::line::LineBuffer;
use crate::stream::StreamWriter;

use self::parser_watch::ParserWatch;
use self::refresh::RefreshCounters;

/// Status report generator state.
#[derive(Debug)]
pub struct StatusReporter {
    report: StatusReportConfig,
    caps: Capabilities,
    homing: HomingConfig,
    lathe_mode: bool,
    formatter: ValueFormatter,
    shared: Arc<SharedReportState>,
    counters: RefreshCounters,
    parser_watch: ParserWatch,
    line: LineBuffer,
}

impl StatusReporter {
    pub fn new(config: &ControllerConfig, shared: Arc<SharedReportState>) -> Self {
        Self {
            report: config.status_report,
            caps: config.capabilities,
            homing: config.homing,
            lathe_mode: config.lathe_mode,
            formatter: ValueFormatter::from_config(config),
            shared,
            counters: RefreshCounters::new(&config.refresh),
            parser_watch: ParserWatch::new(),
            line: LineBuffer::new(),
        }
    }

    /// Re-read configuration after a settings change. Counters restart.
    pub fn reconfigure(&mut self, config: &ControllerConfig) {
        self.report = config.status_report;
        self.caps = config.capabilities;
        self.homing = config.homing;
        self.lathe_mode = config.lathe_mode;
        self.formatter = ValueFormatter::from_config(config);
        self.counters = RefreshCounters::new(&config.refresh);
    }

    pub fn counters(&self) -> &RefreshCounters {
        &self.counters
    }

    pub fn formatter(&self) -> &ValueFormatter {
        &self.formatter
    }

    pub fn shared(&self) -> &Arc<SharedReportState> {
        &self.shared
    }

    /// Write one status line for `snapshot`.
    ///
    /// Realtime report hooks in `hooks` may append fields before the
    /// closing delimiter.
    pub fn emit(&mut self, snapshot: &MachineSnapshot, hooks: &Hooks, out: &mut dyn StreamWriter) {
        let mut flags = self.shared.flags.take();
        if flags.contains(ReportFlags::ALL) {
            flags |= ReportFlags::FULL;
        }
        let probe = snapshot.probe_state();
        let busy = snapshot.state.is_busy();

        out.write("<");
        self.write_state(snapshot, probe, flags, out);

        flags = self.tick_counters(snapshot, flags, busy);

        let diameter = snapshot.parser.modal.diameter_mode;
        let mut position = snapshot.machine_position;
        if !self.report.machine_position {
            for (pos, offset) in position.iter_mut().zip(snapshot.work_offset.iter()) {
                *pos -= *offset;
            }
        }

        // Scratch line holds axis values only, sized for MAX_AXES of them.
        out.write(if self.report.machine_position {
            "|MPos:"
        } else {
            "|WPos:"
        });
        self.line.clear();
        self.formatter
            .push_axis_values(&mut self.line, &position, diameter);
        out.write(self.line.as_str());

        if self.report.buffer_state {
            if let (Some(blocks), Some(rx)) = (
                snapshot.planner_blocks_available,
                snapshot.rx_buffer_available,
            ) {
                write!(out, "|Bf:{blocks},{rx}");
            }
        }

        if self.report.line_numbers {
            if let Some(n) = snapshot.line_number.filter(|n| *n > 0) {
                write!(out, "|Ln:{n}");
            }
        }

        if self.report.feed_speed {
            let rate = self.formatter.rate(snapshot.realtime_rate);
            if self.caps.variable_spindle {
                let rpm = if snapshot.spindle.is_on() {
                    round_rpm(snapshot.spindle_rpm)
                } else {
                    0
                };
                write!(out, "|FS:{rate},{rpm}");
                if self.caps.spindle_speed_sensor {
                    if let Some(measured) = snapshot.measured_rpm {
                        write!(out, ",{}", round_rpm(measured));
                    }
                }
            } else {
                write!(out, "|F:{rate}");
            }
        }

        if self.report.pin_state && pins::any_active(snapshot, probe) {
            self.line.assemble(&["|Pn:"]);
            pins::push_pin_letters(&mut self.line, snapshot, probe, &self.caps);
            out.write(self.line.as_str());
        }

        if !flags.is_empty() || snapshot.tool_change_pending {
            self.write_dirty_fields(snapshot, flags, out);
        }

        hooks.realtime_report(out, flags);

        if flags.contains(ReportFlags::ALL) {
            write!(out, "|FW:{FIRMWARE_NAME}");
        } else if self.report.parser_state {
            if self.parser_watch.changed(&snapshot.parser) {
                trace!("parser state changed");
                self.shared.exec.raise(ExecFlags::GCODE_REPORT);
            }
            if flags.contains(ReportFlags::TOOL_OFFSET) {
                self.shared.exec.raise(ExecFlags::TLO_REPORT);
            }
        }

        out.write(">");
        out.write(ASCII_EOL);

        if self.report.work_coord_offset && self.counters.wco.is_due() {
            self.shared.flags.raise(ReportFlags::WCO);
        }
    }

    fn write_state(
        &self,
        snapshot: &MachineSnapshot,
        probe: ProbeState,
        flags: ReportFlags,
        out: &mut dyn StreamWriter,
    ) {
        let state = snapshot.state.display(snapshot.tool_change_pending);
        out.write(state.token());

        match state {
            MachineState::Cycle => {
                let probing = self.report.run_substate
                    && snapshot.probing == ProbingState::Active
                    && !probe.triggered;
                if snapshot.feed_hold_pending {
                    out.write(":1");
                } else if probing {
                    out.write(":2");
                }
            }
            MachineState::Hold => {
                write!(out, ":{}", snapshot.holding_state.saturating_sub(1));
            }
            MachineState::SafetyDoor => {
                write!(out, ":{}", snapshot.parking_state);
            }
            MachineState::Alarm | MachineState::EStop => {
                if (flags.contains(ReportFlags::ALL) || self.report.alarm_substate)
                    && snapshot.alarm != 0
                {
                    write!(out, ":{}", snapshot.alarm);
                }
            }
            _ => {}
        }
    }

    /// Advance both refresh counters and fold their decisions into `flags`.
    fn tick_counters(
        &self,
        snapshot: &MachineSnapshot,
        mut flags: ReportFlags,
        busy: bool,
    ) -> ReportFlags {
        if self.report.work_coord_offset {
            if self.counters.wco.tick(flags.contains(ReportFlags::WCO), busy) {
                flags |= ReportFlags::WCO;
            }
        } else {
            flags.remove(ReportFlags::WCO);
        }

        if self.report.overrides {
            if self
                .counters
                .overrides
                .tick(flags.contains(ReportFlags::OVERRIDES), busy)
            {
                flags |= ReportFlags::OVERRIDES;
                if snapshot.spindle.is_on() {
                    flags |= ReportFlags::SPINDLE;
                }
                if !snapshot.coolant.is_empty() {
                    flags |= ReportFlags::COOLANT;
                }
            }
        } else {
            flags.remove(ReportFlags::OVERRIDES);
        }

        flags
    }

    fn write_dirty_fields(
        &mut self,
        snapshot: &MachineSnapshot,
        flags: ReportFlags,
        out: &mut dyn StreamWriter,
    ) {
        let parser = &snapshot.parser;

        if flags.contains(ReportFlags::WCO) {
            out.write("|WCO:");
            self.line.clear();
            self.formatter.push_axis_values(
                &mut self.line,
                &snapshot.work_offset,
                parser.modal.diameter_mode,
            );
            out.write(self.line.as_str());
        }

        if flags.contains(ReportFlags::GWCO) {
            self.line.assemble(&["|WCS:G"]);
            push_coord_system(&mut self.line, parser.modal.coord_system);
            out.write(self.line.as_str());
        }

        if flags.contains(ReportFlags::OVERRIDES) {
            let ov = snapshot.overrides;
            write!(out, "|Ov:{},{},{}", ov.feed, ov.rapid, ov.spindle);
        }

        if flags.intersects(ReportFlags::SPINDLE | ReportFlags::COOLANT | ReportFlags::TOOL)
            || snapshot.tool_change_pending
        {
            self.line.assemble(&["|A:"]);
            let spindle = snapshot.spindle;
            if spindle.is_on() {
                self.line
                    .push(if spindle.contains(SpindleState::CCW) { 'C' } else { 'S' });
            }
            if spindle.contains(SpindleState::ENCODER_ERROR) && self.caps.spindle_sync {
                self.line.push('E');
            }
            if snapshot.coolant.contains(CoolantState::FLOOD) {
                self.line.push('F');
            }
            if snapshot.coolant.contains(CoolantState::MIST) {
                self.line.push('M');
            }
            if snapshot.tool_change_pending && !flags.contains(ReportFlags::TOOL) {
                self.line.push('T');
            }
            out.write(self.line.as_str());
        }

        if flags.contains(ReportFlags::SCALING) {
            self.line.assemble(&["|Sc:"]);
            push_axis_letters(&mut self.line, parser.scaled_axes);
            out.write(self.line.as_str());
        }

        if flags.contains(ReportFlags::MPG_MODE) && self.caps.mpg_mode {
            out.write(if snapshot.mpg_mode { "|MPG:1" } else { "|MPG:0" });
        }

        if flags.contains(ReportFlags::HOMED)
            && (!snapshot.homing_mask.is_empty()
                || self.homing.single_axis_commands
                || self.homing.manual)
        {
            let mask = if snapshot.homing_mask.is_empty() {
                self.formatter.all_axes()
            } else {
                snapshot.homing_mask
            };
            out.write(if snapshot.homed.contains(mask) {
                "|H:1"
            } else {
                "|H:0"
            });
            if self.homing.single_axis_commands {
                write!(out, ",{}", snapshot.homed.bits());
            }
        }

        if flags.contains(ReportFlags::XMODE) && self.lathe_mode {
            out.write(if parser.modal.diameter_mode {
                "|D:1"
            } else {
                "|D:0"
            });
        }

        if flags.contains(ReportFlags::TOOL) {
            write!(out, "|T:{}", parser.tool);
        }

        if flags.contains(ReportFlags::TLO_REFERENCE) {
            write!(out, "|TLR:{}", u8::from(snapshot.tlo_reference_set));
        }
    }
}
