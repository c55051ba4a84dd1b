//! Protocol status, alarm and feedback message codes.
//!
//! `StatusCode` is the explicit outcome of every command-layer operation in
//! the reporting core. Numeric values are the protocol `error:<n>` numbers.

use serde::{Deserialize, Serialize};

/// Protocol status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum StatusCode {
    Ok = 0,
    ExpectedCommandLetter = 1,
    BadNumberFormat = 2,
    InvalidStatement = 3,
    NegativeValue = 4,
    /// Setting (or setting scope) disabled or not found.
    SettingDisabled = 5,
    SettingStepPulseMin = 6,
    /// Non-volatile settings read failure.
    SettingReadFail = 7,
    IdleError = 8,
    SystemGClock = 9,
    SoftLimitError = 10,
    Overflow = 11,
    MaxStepRateExceeded = 12,
    CheckDoor = 13,
    LineLengthExceeded = 14,
    TravelExceeded = 15,
    InvalidJogCommand = 16,
    SettingDisabledLaser = 17,
    Reset = 18,
    NonPositiveValue = 19,
    GcodeUnsupportedCommand = 20,
    GcodeModalGroupViolation = 21,
    GcodeUndefinedFeedRate = 22,
    GcodeCommandValueNotInteger = 23,
    GcodeAxisCommandConflict = 24,
    GcodeWordRepeated = 25,
    GcodeNoAxisWords = 26,
    GcodeInvalidLineNumber = 27,
    GcodeValueWordMissing = 28,
    GcodeUnsupportedCoordSys = 29,
    GcodeG53InvalidMotionMode = 30,
    GcodeAxisWordsExist = 31,
    GcodeNoAxisWordsInPlane = 32,
    GcodeInvalidTarget = 33,
    GcodeArcRadiusError = 34,
    GcodeNoOffsetsInPlane = 35,
    GcodeUnusedWords = 36,
    GcodeG43DynamicAxisError = 37,
    GcodeIllegalToolTableEntry = 38,
    GcodeValueOutOfRange = 39,
    /// Internal only: the request was not handled and should be tried elsewhere.
    Unhandled = 255,
}

impl StatusCode {
    /// Protocol number.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Alarm code. Zero means no alarm.
pub type AlarmCode = u8;

pub const ALARM_HARD_LIMIT: AlarmCode = 1;
pub const ALARM_SOFT_LIMIT: AlarmCode = 2;
pub const ALARM_ABORT_CYCLE: AlarmCode = 3;
pub const ALARM_PROBE_FAIL_INITIAL: AlarmCode = 4;
pub const ALARM_PROBE_FAIL_CONTACT: AlarmCode = 5;
pub const ALARM_HOMING_FAIL_RESET: AlarmCode = 6;
pub const ALARM_HOMING_FAIL_DOOR: AlarmCode = 7;
pub const ALARM_HOMING_FAIL_PULLOFF: AlarmCode = 8;
pub const ALARM_HOMING_FAIL_APPROACH: AlarmCode = 9;
pub const ALARM_ESTOP: AlarmCode = 10;
pub const ALARM_HOMING_REQUIRED: AlarmCode = 11;
pub const ALARM_LIMITS_ENGAGED: AlarmCode = 12;
pub const ALARM_PROBE_PROTECT: AlarmCode = 13;
pub const ALARM_SPINDLE: AlarmCode = 14;
pub const ALARM_HOMING_FAIL_AUTO_SQUARING: AlarmCode = 15;
pub const ALARM_SELFTEST_FAILED: AlarmCode = 16;
pub const ALARM_MOTOR_FAULT: AlarmCode = 17;

/// Category prefix for free-text messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MessageType {
    #[default]
    Plain,
    Info,
    Warning,
}

/// Fixed feedback messages (`[MSG:...]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageCode {
    None,
    CriticalEvent,
    AlarmLock,
    AlarmUnlock,
    Enabled,
    Disabled,
    SafetyDoorAjar,
    CheckLimits,
    ProgramEnd,
    RestoreDefaults,
    SpindleRestore,
    SleepMode,
    EStop,
    HomingCycleRequired,
    CycleStartToRerun,
    ReferenceTloEstablished,
    MotorFault,
    /// Plugin-defined message; text is supplied by a registered handler.
    Extension(u8),
}

impl MessageCode {
    /// Message text, `None` for codes that carry no built-in text.
    pub const fn text(self) -> Option<&'static str> {
        match self {
            Self::None | Self::Extension(_) => None,
            Self::CriticalEvent => Some("Reset to continue"),
            Self::AlarmLock => Some("'$H'|'$X' to unlock"),
            Self::AlarmUnlock => Some("Caution: Unlocked"),
            Self::Enabled => Some("Enabled"),
            Self::Disabled => Some("Disabled"),
            Self::SafetyDoorAjar => Some("Check Door"),
            Self::CheckLimits => Some("Check Limits"),
            Self::ProgramEnd => Some("Pgm End"),
            Self::RestoreDefaults => Some("Restoring defaults"),
            Self::SpindleRestore => Some("Restoring spindle"),
            Self::SleepMode => Some("Sleeping"),
            Self::EStop => Some("Emergency stop"),
            Self::HomingCycleRequired => Some("Homing cycle required"),
            Self::CycleStartToRerun => Some("Press cycle start to rerun job"),
            Self::ReferenceTloEstablished => Some("Reference tool length offset established"),
            Self::MotorFault => Some("Motor fault"),
        }
    }
}
