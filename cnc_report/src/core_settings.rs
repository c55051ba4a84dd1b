//! Controller core settings registry.
//!
//! The first registry of every chain. Plugins append their own registries
//! after it.

use cnc_common::config::ControllerConfig;
use cnc_common::settings::{
    Datatype, SettingClass, SettingDescriptor, SettingGroupDescriptor, SettingsRegistry, group,
};

use crate::catalog::chain::RegistryChain;

use Datatype::{AxisMask, Bitfield, Bool, Decimal, Int16, Integer, RadioButtons, XBitfield};
use SettingClass::{Extended, NonCore};

fn has_probe(_: &SettingDescriptor, config: &ControllerConfig) -> bool {
    config.capabilities.probe
}

fn has_variable_spindle(_: &SettingDescriptor, config: &ControllerConfig) -> bool {
    config.capabilities.variable_spindle
}

fn has_spindle_encoder(_: &SettingDescriptor, config: &ControllerConfig) -> bool {
    config.capabilities.spindle_sync || config.capabilities.spindle_speed_sensor
}

fn has_tool_change(_: &SettingDescriptor, config: &ControllerConfig) -> bool {
    config.capabilities.tool_change
}

fn has_e_stop(_: &SettingDescriptor, config: &ControllerConfig) -> bool {
    config.capabilities.e_stop
}

fn has_mist(_: &SettingDescriptor, config: &ControllerConfig) -> bool {
    config.capabilities.mist_control
}

const STATUS_REPORT_OPTIONS: &str = "Position in machine coordinate,Buffer state,Line numbers,\
Feed & speed,Pin state,Work coordinate offset,Overrides,Probe coordinates,\
Buffer sync on WCO change,Parser state,Alarm substatus,Run substatus";

const CONTROL_PINS: &str =
    "Reset,Feed hold,Cycle start,Safety door,Block delete,Optional stop,EStop,Probe connected";

const HOMING_CYCLE: &str = "Enable,Enable single axis commands,Homing on startup required,\
Set machine origin to 0,Two switches shares one input pin,Allow manual,Override locks";

pub static CORE_SETTINGS: [SettingDescriptor; 41] = [
    SettingDescriptor::new(0, group::STEPPER, "Step pulse time", Decimal)
        .unit("microseconds")
        .format("#0.0")
        .min("2.0"),
    SettingDescriptor::new(1, group::STEPPER, "Step idle delay", Int16)
        .unit("milliseconds")
        .format("####0")
        .max("65535"),
    SettingDescriptor::new(2, group::STEPPER, "Step pulse invert", AxisMask),
    SettingDescriptor::new(3, group::STEPPER, "Step direction invert", AxisMask),
    SettingDescriptor::new(4, group::STEPPER, "Invert stepper enable pin(s)", AxisMask),
    SettingDescriptor::new(5, group::LIMITS, "Invert limit pins", AxisMask),
    SettingDescriptor::new(6, group::PROBING, "Invert probe pin", Bool).available_when(has_probe),
    SettingDescriptor::new(10, group::GENERAL, "Status report options", Bitfield)
        .format(STATUS_REPORT_OPTIONS),
    SettingDescriptor::new(11, group::GENERAL, "Junction deviation", Decimal)
        .unit("mm")
        .format("#####0.000"),
    SettingDescriptor::new(12, group::GENERAL, "Arc tolerance", Decimal)
        .unit("mm")
        .format("#####0.000"),
    SettingDescriptor::new(13, group::GENERAL, "Report in inches", Bool),
    SettingDescriptor::new(14, group::CONTROL_SIGNALS, "Invert control pins", Bitfield)
        .format(CONTROL_PINS)
        .class(Extended),
    SettingDescriptor::new(15, group::COOLANT, "Invert coolant pins", Bitfield)
        .format("Flood,Mist")
        .class(Extended),
    SettingDescriptor::new(16, group::SPINDLE, "Invert spindle signals", Bitfield)
        .format("Spindle enable,Spindle direction,PWM")
        .class(Extended),
    SettingDescriptor::new(20, group::LIMITS, "Soft limits enable", Bool),
    SettingDescriptor::new(21, group::LIMITS, "Hard limits enable", XBitfield)
        .format("Enable,Strict mode"),
    SettingDescriptor::new(22, group::HOMING, "Homing cycle", XBitfield).format(HOMING_CYCLE),
    SettingDescriptor::new(23, group::HOMING, "Homing direction invert", AxisMask),
    SettingDescriptor::new(24, group::HOMING, "Homing locate feed rate", Decimal)
        .unit("mm/min")
        .format("#####0.0"),
    SettingDescriptor::new(25, group::HOMING, "Homing search seek rate", Decimal)
        .unit("mm/min")
        .format("#####0.0"),
    SettingDescriptor::new(26, group::HOMING, "Homing switch debounce delay", Int16)
        .unit("milliseconds")
        .format("##0"),
    SettingDescriptor::new(27, group::HOMING, "Homing switch pull-off distance", Decimal)
        .unit("mm")
        .format("###0.000"),
    SettingDescriptor::new(28, group::GENERAL, "G73 Retract distance", Decimal)
        .unit("mm")
        .format("###0.000")
        .class(Extended),
    SettingDescriptor::new(30, group::SPINDLE, "Maximum spindle speed", Decimal)
        .unit("RPM")
        .format("#####0.000"),
    SettingDescriptor::new(31, group::SPINDLE, "Minimum spindle speed", Decimal)
        .unit("RPM")
        .format("#####0.000"),
    SettingDescriptor::new(32, group::GENERAL, "Mode of operation", RadioButtons)
        .format("Normal,Laser mode,Lathe mode"),
    SettingDescriptor::new(33, group::SPINDLE, "Spindle PWM frequency", Decimal)
        .unit("Hz")
        .format("#####0")
        .class(Extended)
        .available_when(has_variable_spindle),
    SettingDescriptor::new(38, group::SPINDLE, "Spindle encoder pulses per revolution", Integer)
        .unit("PPR")
        .format("###0")
        .class(Extended)
        .available_when(has_spindle_encoder),
    SettingDescriptor::new(60, group::GENERAL, "Restore overrides", Bool).class(Extended),
    SettingDescriptor::new(62, group::GENERAL, "Sleep enable", Bool).class(Extended),
    SettingDescriptor::new(63, group::GENERAL, "Feed hold actions", Bitfield)
        .format("Disable laser during hold,Restore spindle and coolant state on resume")
        .class(Extended),
    SettingDescriptor::new(64, group::GENERAL, "Force init alarm", Bool).class(Extended),
    SettingDescriptor::new(65, group::PROBING, "Probing feed override", Bool)
        .class(Extended)
        .available_when(has_probe),
    SettingDescriptor::new(72, group::COOLANT, "Mist delay on", Decimal)
        .unit("s")
        .format("#0.0")
        .range("0.0", "20.0")
        .class(Extended)
        .available_when(has_mist),
    SettingDescriptor::new(100, group::AXIS0, "-axis travel resolution", Decimal)
        .unit("step/mm")
        .format("#####0.000")
        .per_axis(),
    SettingDescriptor::new(110, group::AXIS0, "-axis maximum rate", Decimal)
        .unit("mm/min")
        .format("#####0.000")
        .per_axis(),
    SettingDescriptor::new(120, group::AXIS0, "-axis acceleration", Decimal)
        .unit("mm/sec^2")
        .format("#####0.000")
        .per_axis(),
    SettingDescriptor::new(130, group::AXIS0, "-axis maximum travel", Decimal)
        .unit("mm")
        .format("#####0.000")
        .per_axis(),
    SettingDescriptor::new(341, group::TOOL_CHANGE, "Tool change mode", RadioButtons)
        .format("Normal,Manual touch off,Manual touch off @ G59.3,Automatic touch off @ G59.3,Ignore M6")
        .class(Extended)
        .available_when(has_tool_change),
    SettingDescriptor::new(342, group::TOOL_CHANGE, "Tool change probing distance", Decimal)
        .unit("mm")
        .format("#####0.0")
        .class(Extended)
        .available_when(has_tool_change),
    SettingDescriptor::new(484, group::CONTROL_SIGNALS, "Unlock required after E-Stop", Bool)
        .class(NonCore)
        .available_when(has_e_stop),
];

pub static CORE_GROUPS: [SettingGroupDescriptor; 18] = [
    SettingGroupDescriptor::new(group::ROOT, group::ROOT, "Root"),
    SettingGroupDescriptor::new(group::GENERAL, group::ROOT, "General"),
    SettingGroupDescriptor::new(group::CONTROL_SIGNALS, group::ROOT, "Control signals"),
    SettingGroupDescriptor::new(group::LIMITS, group::GENERAL, "Limits"),
    SettingGroupDescriptor::new(group::COOLANT, group::ROOT, "Coolant"),
    SettingGroupDescriptor::new(group::SPINDLE, group::ROOT, "Spindle"),
    SettingGroupDescriptor::new(group::TOOL_CHANGE, group::ROOT, "Tool change"),
    SettingGroupDescriptor::new(group::HOMING, group::ROOT, "Homing"),
    SettingGroupDescriptor::new(group::PROBING, group::ROOT, "Probing"),
    SettingGroupDescriptor::new(group::STEPPER, group::ROOT, "Stepper"),
    SettingGroupDescriptor::new(group::AXIS, group::ROOT, "Axis"),
    SettingGroupDescriptor::new(group::X_AXIS, group::AXIS, "X-axis"),
    SettingGroupDescriptor::new(group::Y_AXIS, group::AXIS, "Y-axis"),
    SettingGroupDescriptor::new(group::Z_AXIS, group::AXIS, "Z-axis"),
    SettingGroupDescriptor::new(group::A_AXIS, group::AXIS, "A-axis"),
    SettingGroupDescriptor::new(group::B_AXIS, group::AXIS, "B-axis"),
    SettingGroupDescriptor::new(group::C_AXIS, group::AXIS, "C-axis"),
    SettingGroupDescriptor::new(group::JOGGING, group::ROOT, "Jogging"),
];

/// The core registry.
pub fn core_registry() -> SettingsRegistry {
    SettingsRegistry::new("core", &CORE_SETTINGS, &CORE_GROUPS)
}

/// A chain holding only the core registry.
pub fn core_chain() -> RegistryChain {
    RegistryChain::with_core(core_registry())
}
