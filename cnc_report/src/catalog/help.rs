//! `$HELP` topics.

use cnc_common::consts::ASCII_EOL;
use cnc_common::settings::GroupFilter;
use cnc_common::status::StatusCode;

use super::{Catalog, GroupOrder, RenderMode};
use crate::stream::StreamWriter;

/// Answer `$HELP <args>`.
///
/// No argument lists the topics followed by every available group; the
/// `COMMANDS` and `SETTINGS` topics are matched ignoring case, anything else
/// is looked up as a group name across the registry chain.
pub fn report_help(catalog: &Catalog, args: &str, out: &mut dyn StreamWriter) -> StatusCode {
    let topic = args.trim_start();

    if topic.is_empty() {
        write!(out, "Help arguments:{ASCII_EOL} Commands{ASCII_EOL} Settings{ASCII_EOL}");
        catalog.group_details(GroupOrder::ByName, Some(" "), out);
    } else if starts_with_ignore_case(topic, "COMMANDS") {
        command_help(catalog, out);
    } else if starts_with_ignore_case(topic, "SETTINGS") {
        catalog.settings_details(GroupFilter::All, RenderMode::Human, out);
    } else if let Some(group) = catalog.chain().find_group_by_name(topic.trim_end()) {
        catalog.settings_details(GroupFilter::Group(group.id), RenderMode::Human, out);
    }

    StatusCode::Ok
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn command_help(catalog: &Catalog, out: &mut dyn StreamWriter) {
    let config = catalog.config();

    let mut line = |text: &str| write!(out, "{text}{ASCII_EOL}");

    line("$I - list system information");
    line("$$ - list settings");
    line("$# - list offsets, tool table, probing and home position");
    line("$G - list parser state");
    line("$N - list startup lines");
    if config.homing.enabled {
        line("$H - home configured axes");
    }
    if config.homing.single_axis_commands {
        line("$H<axisletter> - home single axis");
    }
    line("$X - unlock machine");
    line("$SLP - enter sleep mode");
    line("$HELP <arg> - help");
    line("$RST=* - restore/reset all");
    line("$RST=$ - restore default settings");
    if catalog.chain().len() > 1 {
        line("$RST=& - restore driver and plugin default settings");
    }
    if config.n_tools > 0 {
        line("$RST=# - reset offsets and tool data");
    } else {
        line("$RST=# - reset offsets");
    }
}
