//! Report dirty flags and report requests shared across execution contexts.
//!
//! Any subsystem (including interrupt-context producers) may raise a dirty
//! flag with [`AtomicReportFlags::raise`]. The status report generator takes
//! the whole set with a single atomic swap at the start of each report, so a
//! flag raised while a report is being composed lands in the next one.

use core::sync::atomic::{AtomicU16, AtomicU8, Ordering};

use bitflags::bitflags;

bitflags! {
    /// Optional status report fields that must appear in the next report.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ReportFlags: u16 {
        /// Work coordinate offset (`|WCO:`). Throttled by its refresh counter.
        const WCO           = 0x0001;
        /// Active work coordinate system (`|WCS:`).
        const GWCO          = 0x0002;
        /// Override percentages (`|Ov:`). Throttled by its refresh counter.
        const OVERRIDES     = 0x0004;
        /// Spindle activity (`|A:`).
        const SPINDLE       = 0x0008;
        /// Coolant activity (`|A:`).
        const COOLANT       = 0x0010;
        /// Tool number (`|T:`).
        const TOOL          = 0x0020;
        /// Scaled axes (`|Sc:`).
        const SCALING       = 0x0040;
        /// MPG mode (`|MPG:`).
        const MPG_MODE      = 0x0080;
        /// Homed summary (`|H:`).
        const HOMED         = 0x0100;
        /// Lathe diameter mode (`|D:`).
        const XMODE         = 0x0200;
        /// Tool length offset reference (`|TLR:`).
        const TLO_REFERENCE = 0x0400;
        /// Tool length offset changed: request a TLO report.
        const TOOL_OFFSET   = 0x0800;
        /// Full report requested: expands to [`ReportFlags::FULL`], adds `|FW:`
        /// and forces the alarm sub-state.
        const ALL           = 0x8000;
    }
}

impl ReportFlags {
    /// Fields a full report (`ALL`) carries. The generator expands `ALL`
    /// into this set; fields disabled in configuration stay omitted.
    pub const FULL: Self = Self::from_bits_truncate(
        Self::WCO.bits()
            | Self::GWCO.bits()
            | Self::OVERRIDES.bits()
            | Self::SPINDLE.bits()
            | Self::COOLANT.bits()
            | Self::TOOL.bits()
            | Self::SCALING.bits()
            | Self::MPG_MODE.bits()
            | Self::HOMED.bits()
            | Self::XMODE.bits()
            | Self::TLO_REFERENCE.bits()
            | Self::ALL.bits(),
    );
}

/// Lock-free cell holding the process-wide [`ReportFlags`].
#[derive(Debug, Default)]
pub struct AtomicReportFlags(AtomicU16);

impl AtomicReportFlags {
    pub const fn new(flags: ReportFlags) -> Self {
        Self(AtomicU16::new(flags.bits()))
    }

    /// Mark fields dirty. Safe from any context.
    #[inline]
    pub fn raise(&self, flags: ReportFlags) {
        self.0.fetch_or(flags.bits(), Ordering::AcqRel);
    }

    /// Clear specific flags.
    #[inline]
    pub fn clear(&self, flags: ReportFlags) {
        self.0.fetch_and(!flags.bits(), Ordering::AcqRel);
    }

    /// Current flags without consuming them.
    #[inline]
    pub fn load(&self) -> ReportFlags {
        ReportFlags::from_bits_truncate(self.0.load(Ordering::Acquire))
    }

    /// Atomically take every pending flag, leaving the cell empty.
    #[inline]
    pub fn take(&self) -> ReportFlags {
        ReportFlags::from_bits_truncate(self.0.swap(0, Ordering::AcqRel))
    }
}

bitflags! {
    /// Follow-up reports requested by the status report generator. These
    /// are emitted by the protocol loop on a later cycle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ExecFlags: u8 {
        /// Parser state changed: emit a `[GC:...]` report.
        const GCODE_REPORT = 0x01;
        /// Tool length offset changed: emit a `[TLO:...]` report.
        const TLO_REPORT   = 0x02;
    }
}

/// Lock-free cell holding pending [`ExecFlags`].
#[derive(Debug, Default)]
pub struct AtomicExecFlags(AtomicU8);

impl AtomicExecFlags {
    pub const fn new() -> Self {
        Self(AtomicU8::new(0))
    }

    #[inline]
    pub fn raise(&self, flags: ExecFlags) {
        self.0.fetch_or(flags.bits(), Ordering::AcqRel);
    }

    #[inline]
    pub fn load(&self) -> ExecFlags {
        ExecFlags::from_bits_truncate(self.0.load(Ordering::Acquire))
    }

    #[inline]
    pub fn take(&self) -> ExecFlags {
        ExecFlags::from_bits_truncate(self.0.swap(0, Ordering::AcqRel))
    }
}

/// Report state shared between producers and the status report generator.
#[derive(Debug, Default)]
pub struct SharedReportState {
    /// Dirty flags raised by producers.
    pub flags: AtomicReportFlags,
    /// Follow-up reports requested by the generator.
    pub exec: AtomicExecFlags,
}

impl SharedReportState {
    pub const fn new() -> Self {
        Self {
            flags: AtomicReportFlags::new(ReportFlags::empty()),
            exec: AtomicExecFlags::new(),
        }
    }
}
