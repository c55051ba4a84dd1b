//! Setting, setting-group and registry descriptor types.
//!
//! Descriptors are declared statically by the controller core and by
//! plugins, and are immutable after registration. A [`SettingsRegistry`]
//! bundles one contributor's settings and groups; the reporting core merges
//! any number of registries into one catalog.

use crate::config::ControllerConfig;
use crate::consts::MAX_AXES;

/// Setting identifier (`$<id>`).
pub type SettingId = u16;

/// Setting group identifier.
pub type GroupId = u8;

/// Well-known setting groups.
pub mod group {
    use super::GroupId;

    pub const ROOT: GroupId = 0;
    pub const GENERAL: GroupId = 1;
    pub const CONTROL_SIGNALS: GroupId = 2;
    pub const LIMITS: GroupId = 3;
    pub const LIMITS_DUAL_AXIS: GroupId = 4;
    pub const COOLANT: GroupId = 5;
    pub const SPINDLE: GroupId = 6;
    pub const SPINDLE_SYNC: GroupId = 7;
    pub const TOOL_CHANGE: GroupId = 9;
    pub const HOMING: GroupId = 11;
    pub const PROBING: GroupId = 12;
    pub const SAFETY_DOOR: GroupId = 13;
    pub const JOGGING: GroupId = 14;
    pub const NETWORKING: GroupId = 15;
    pub const STEPPER: GroupId = 27;
    pub const MOTOR_DRIVER: GroupId = 28;
    pub const AXIS: GroupId = 40;
    /// First per-axis group; axis `n` settings live in `AXIS0 + n`.
    pub const AXIS0: GroupId = 41;
    pub const X_AXIS: GroupId = AXIS0;
    pub const Y_AXIS: GroupId = AXIS0 + 1;
    pub const Z_AXIS: GroupId = AXIS0 + 2;
    pub const A_AXIS: GroupId = AXIS0 + 3;
    pub const B_AXIS: GroupId = AXIS0 + 4;
    pub const C_AXIS: GroupId = AXIS0 + 5;
    pub const UNKNOWN: GroupId = 99;
}

/// Map a per-axis group (`AXIS0 + n`) to `(AXIS0, n)`; other groups map to
/// `(group, 0)`.
#[inline]
pub const fn normalize_group(id: GroupId) -> (GroupId, u8) {
    if id >= group::AXIS0 && id < group::AXIS0 + MAX_AXES as u8 {
        (group::AXIS0, id - group::AXIS0)
    } else {
        (id, 0)
    }
}

/// Group selector for catalog requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GroupFilter {
    #[default]
    All,
    Group(GroupId),
}

// ─── Datatypes ──────────────────────────────────────────────────────

/// Setting value datatype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Datatype {
    Bool = 0,
    Bitfield = 1,
    /// Bitfield where bit 0 enables the remaining bits.
    XBitfield = 2,
    RadioButtons = 3,
    AxisMask = 4,
    Integer = 5,
    Decimal = 6,
    String = 7,
    Password = 8,
    IPv4 = 9,
    // Internal storage widths, reported as `Integer`.
    Int8 = 10,
    Int16 = 11,
}

impl Datatype {
    /// Datatype as exposed to hosts.
    #[inline]
    pub const fn external(self) -> Self {
        match self {
            Self::Int8 | Self::Int16 => Self::Integer,
            other => other,
        }
    }

    /// Numeric type code used in machine-readable output.
    #[inline]
    pub const fn code(self) -> u8 {
        self.external() as u8
    }

    /// List types carry their choices in the format string.
    #[inline]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::Bitfield | Self::XBitfield | Self::RadioButtons)
    }
}

/// Legacy settings are listed by a plain `$$`; the others only with the
/// extended listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingClass {
    Legacy,
    Extended,
    NonCore,
}

// ─── Values ─────────────────────────────────────────────────────────

/// A setting value as read from the settings store.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Integer(i64),
    Decimal(f32),
    Text(String),
}

/// Persistent settings store collaborator.
pub trait SettingsStore {
    /// Raw value for `id` (axis offset already applied).
    fn setting_value(&self, id: SettingId) -> Option<SettingValue>;
}

/// Availability predicate: hides a descriptor when the capability it
/// configures is absent from the controller configuration.
pub type AvailabilityFn = fn(&SettingDescriptor, &ControllerConfig) -> bool;

/// Value accessor: reads the value of `id` through the store.
pub type ValueFn = fn(&dyn SettingsStore, SettingId) -> Option<SettingValue>;

/// Default value accessor: plain store lookup.
pub fn stored_value(store: &dyn SettingsStore, id: SettingId) -> Option<SettingValue> {
    store.setting_value(id)
}

// ─── Descriptors ────────────────────────────────────────────────────

/// Static description of one setting (or one per-axis setting family).
#[derive(Debug, Clone, Copy)]
pub struct SettingDescriptor {
    /// Setting id; per-axis settings use the X axis id as base.
    pub id: SettingId,
    /// Owning group.
    pub group: GroupId,
    /// Display name.
    pub name: &'static str,
    /// Unit of measure.
    pub unit: Option<&'static str>,
    /// Value datatype.
    pub datatype: Datatype,
    /// Format: comma-separated labels for list types, a numeric pattern
    /// such as `###0.000` otherwise.
    pub format: Option<&'static str>,
    /// Minimum value, textual.
    pub min_value: Option<&'static str>,
    /// Maximum value, textual.
    pub max_value: Option<&'static str>,
    /// Listing class.
    pub class: SettingClass,
    /// Number of axis repetitions: 0 for scalars.
    pub axis_repeat: u8,
    /// Availability predicate, `None` means always available.
    pub is_available: Option<AvailabilityFn>,
    /// Value accessor, `None` renders as `N/A`.
    pub value: Option<ValueFn>,
}

impl SettingDescriptor {
    /// Scalar legacy setting with a stored value.
    pub const fn new(id: SettingId, group: GroupId, name: &'static str, datatype: Datatype) -> Self {
        Self {
            id,
            group,
            name,
            unit: None,
            datatype,
            format: None,
            min_value: None,
            max_value: None,
            class: SettingClass::Legacy,
            axis_repeat: 0,
            is_available: None,
            value: Some(stored_value),
        }
    }

    pub const fn unit(mut self, unit: &'static str) -> Self {
        self.unit = Some(unit);
        self
    }

    pub const fn format(mut self, format: &'static str) -> Self {
        self.format = Some(format);
        self
    }

    pub const fn range(mut self, min: &'static str, max: &'static str) -> Self {
        self.min_value = Some(min);
        self.max_value = Some(max);
        self
    }

    pub const fn min(mut self, min: &'static str) -> Self {
        self.min_value = Some(min);
        self
    }

    pub const fn max(mut self, max: &'static str) -> Self {
        self.max_value = Some(max);
        self
    }

    pub const fn class(mut self, class: SettingClass) -> Self {
        self.class = class;
        self
    }

    /// Repeat this setting once per axis (ids `id..id + axes`).
    pub const fn per_axis(mut self) -> Self {
        self.axis_repeat = MAX_AXES as u8;
        self
    }

    pub const fn available_when(mut self, predicate: AvailabilityFn) -> Self {
        self.is_available = Some(predicate);
        self
    }

    pub const fn without_value(mut self) -> Self {
        self.value = None;
        self
    }

    pub const fn value_with(mut self, accessor: ValueFn) -> Self {
        self.value = Some(accessor);
        self
    }

    /// Evaluate the availability predicate.
    #[inline]
    pub fn available(&self, config: &ControllerConfig) -> bool {
        self.is_available.is_none_or(|f| f(self, config))
    }

    #[inline]
    pub const fn is_legacy(&self) -> bool {
        matches!(self.class, SettingClass::Legacy)
    }

    /// Number of ids this descriptor covers for `axis_count` axes.
    #[inline]
    pub const fn instances(&self, axis_count: u8) -> u8 {
        if self.axis_repeat == 0 {
            1
        } else if self.axis_repeat < axis_count {
            self.axis_repeat
        } else {
            axis_count
        }
    }

    /// Axis offset of `id` within this descriptor, if it covers `id`.
    #[inline]
    pub fn offset_of(&self, id: SettingId, axis_count: u8) -> Option<u8> {
        let offset = id.checked_sub(self.id)?;
        (offset < self.instances(axis_count) as SettingId).then_some(offset as u8)
    }
}

/// Setting group: a node in the help/filter tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingGroupDescriptor {
    pub id: GroupId,
    pub parent: GroupId,
    pub name: &'static str,
}

impl SettingGroupDescriptor {
    pub const fn new(id: GroupId, parent: GroupId, name: &'static str) -> Self {
        Self { id, parent, name }
    }
}

/// One contributor's descriptors (controller core or a plugin).
#[derive(Debug, Clone, Copy)]
pub struct SettingsRegistry {
    /// Contributor name, used in logs.
    pub name: &'static str,
    pub settings: &'static [SettingDescriptor],
    pub groups: &'static [SettingGroupDescriptor],
}

impl SettingsRegistry {
    pub const fn new(
        name: &'static str,
        settings: &'static [SettingDescriptor],
        groups: &'static [SettingGroupDescriptor],
    ) -> Self {
        Self {
            name,
            settings,
            groups,
        }
    }
}
