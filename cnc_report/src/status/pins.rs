//! Input pin letters for the `|Pn:` field.

use cnc_common::config::Capabilities;
use cnc_common::snapshot::MachineSnapshot;
use cnc_common::state::{ControlSignals, ProbeState};

use crate::format::push_axis_letters;
use crate::line::LineBuffer;

/// True when any pin-state letter could be reported.
pub fn any_active(snapshot: &MachineSnapshot, probe: ProbeState) -> bool {
    !snapshot.limits.is_empty()
        || !snapshot.control.is_empty()
        || probe.triggered
        || !probe.connected
        || snapshot.block_delete_enabled
}

/// Append pin letters in protocol order: probe, probe disconnected, limit
/// axes, door, reset, hold, cycle start, e-stop, block delete, optional
/// stop, motor warning, motor fault.
pub fn push_pin_letters(
    line: &mut LineBuffer,
    snapshot: &MachineSnapshot,
    probe: ProbeState,
    caps: &Capabilities,
) {
    let ctrl = snapshot.control;

    if probe.triggered {
        line.push('P');
    }
    if !probe.connected {
        line.push('O');
    }
    if !ctrl.contains(ControlSignals::LIMITS_OVERRIDE) {
        push_axis_letters(line, snapshot.limits);
    }

    if ctrl.is_empty() {
        return;
    }
    if ctrl.contains(ControlSignals::SAFETY_DOOR_AJAR) && caps.safety_door_ajar {
        line.push('D');
    }
    if ctrl.contains(ControlSignals::RESET) {
        line.push('R');
    }
    if ctrl.contains(ControlSignals::FEED_HOLD) {
        line.push('H');
    }
    if ctrl.contains(ControlSignals::CYCLE_START) {
        line.push('S');
    }
    if ctrl.contains(ControlSignals::E_STOP) {
        line.push('E');
    }
    if ctrl.contains(ControlSignals::BLOCK_DELETE) && snapshot.block_delete_enabled {
        line.push('L');
    }
    let stop_disabled = if caps.stop_disable {
        ctrl.contains(ControlSignals::STOP_DISABLE)
    } else {
        snapshot.optional_stop_disable
    };
    if stop_disabled {
        line.push('T');
    }
    if ctrl.contains(ControlSignals::MOTOR_WARNING) {
        line.push('W');
    }
    if ctrl.contains(ControlSignals::MOTOR_FAULT) {
        line.push('M');
    }
}
