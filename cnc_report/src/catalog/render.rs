//! Row renderers for settings, groups, alarms and errors.

use cnc_common::codes::{AlarmDescriptor, ErrorDescriptor};
use cnc_common::consts::{ASCII_EOL, AXIS_LETTERS};
use cnc_common::settings::{
    Datatype, SettingDescriptor, SettingGroupDescriptor, SettingValue, SettingsStore, group,
};

use crate::bitfield::{LegendStyle, write_legend};
use crate::stream::StreamWriter;

/// Output form of catalog rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// `$<id>: <name> ...` lines for people.
    #[default]
    Human,
    /// `[SETTING:...]` records for host software.
    Machine,
}

/// Axis letter prefix for per-axis settings.
fn axis_prefix(setting: &SettingDescriptor, offset: u8) -> &'static str {
    if setting.group == group::AXIS0 {
        AXIS_LETTERS.get(offset as usize).copied().unwrap_or("")
    } else {
        ""
    }
}

/// Render one setting instance (`setting.id + offset`).
pub fn render_setting(
    out: &mut dyn StreamWriter,
    setting: &SettingDescriptor,
    offset: u8,
    mode: RenderMode,
) {
    let id = setting.id + offset as u16;
    let letter = axis_prefix(setting, offset);

    match mode {
        RenderMode::Human => {
            write!(out, "${id}: {letter}{}", setting.name);

            match setting.datatype.external() {
                Datatype::AxisMask => out.write(" as axismask"),
                Datatype::Bool => out.write(" as boolean"),
                Datatype::Bitfield => {
                    out.write(" as bitfield:");
                    write_legend(out, setting.format.unwrap_or(""), LegendStyle::Bitmap);
                }
                Datatype::XBitfield => {
                    out.write(" as bitfield where setting bit 0 enables the rest:");
                    write_legend(out, setting.format.unwrap_or(""), LegendStyle::Bitmap);
                }
                Datatype::RadioButtons => {
                    out.write(":");
                    write_legend(out, setting.format.unwrap_or(""), LegendStyle::Sequential);
                }
                Datatype::IPv4 => out.write(" as IP address"),
                _ => {
                    if let Some(unit) = setting.unit {
                        write!(out, " in {unit}");
                    }
                }
            }

            match (setting.min_value, setting.max_value) {
                (Some(min), Some(max)) => write!(out, ", range: {min} - {max}"),
                _ if setting.datatype.is_list() => {}
                (min, max) => {
                    if let Some(min) = min {
                        write!(out, ", min: {min}");
                    }
                    if let Some(max) = max {
                        write!(out, ", max: {max}");
                    }
                }
            }
        }
        RenderMode::Machine => {
            let group_id = if setting.group == group::AXIS0 {
                setting.group + offset
            } else {
                setting.group
            };
            let min = if setting.datatype.is_list() {
                ""
            } else {
                setting.min_value.unwrap_or("")
            };
            write!(
                out,
                "[SETTING:{id}|{group_id}|{letter}{}|{}|{}|{}|{min}|{}]",
                setting.name,
                setting.unit.unwrap_or(""),
                setting.datatype.code(),
                setting.format.unwrap_or(""),
                setting.max_value.unwrap_or(""),
            );
        }
    }

    out.write(ASCII_EOL);
}

/// Render a group: a `[SETTINGGROUP:...]` record without a prefix, or
/// `<prefix><name>` with one (the root group is omitted then).
pub fn render_group(out: &mut dyn StreamWriter, group: &SettingGroupDescriptor, prefix: Option<&str>) {
    match prefix {
        None => write!(
            out,
            "[SETTINGGROUP:{}|{}|{}]{ASCII_EOL}",
            group.id, group.parent, group.name
        ),
        Some(_) if group.id == group::ROOT => {}
        Some(prefix) => write!(out, "{prefix}{}{ASCII_EOL}", group.name),
    }
}

pub fn render_alarm(out: &mut dyn StreamWriter, alarm: &AlarmDescriptor) {
    write!(
        out,
        "[ALARMCODE:{}|{}|{}]{ASCII_EOL}",
        alarm.id,
        alarm.name,
        alarm.description.unwrap_or("")
    );
}

pub fn render_error(out: &mut dyn StreamWriter, error: &ErrorDescriptor) {
    write!(
        out,
        "[ERRORCODE:{}|{}|{}]{ASCII_EOL}",
        error.id,
        error.name,
        error.description.unwrap_or("")
    );
}

/// Number of fractional digits in a `###0.000` style format.
fn format_decimals(format: Option<&str>) -> usize {
    format
        .and_then(|f| f.split_once('.'))
        .map(|(_, frac)| frac.len())
        .unwrap_or(3)
}

/// Render `$<id>=<value>`. Descriptors without an accessor print `N/A`;
/// a value the store cannot supply prints nothing.
pub fn render_setting_value(
    out: &mut dyn StreamWriter,
    setting: &SettingDescriptor,
    offset: u8,
    store: &dyn SettingsStore,
) {
    let id = setting.id + offset as u16;

    let Some(accessor) = setting.value else {
        write!(out, "${id}=N/A{ASCII_EOL}");
        return;
    };

    match accessor(store, id) {
        Some(SettingValue::Integer(v)) => write!(out, "${id}={v}{ASCII_EOL}"),
        Some(SettingValue::Decimal(v)) => {
            let decimals = format_decimals(setting.format);
            write!(out, "${id}={v:.decimals$}{ASCII_EOL}");
        }
        Some(SettingValue::Text(v)) => write!(out, "${id}={v}{ASCII_EOL}"),
        None => {}
    }
}
