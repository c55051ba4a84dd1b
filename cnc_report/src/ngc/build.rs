//! `$I` build info.

use cnc_common::config::ControllerConfig;
use cnc_common::consts::{ASCII_EOL, BLOCK_BUFFER_SIZE, FIRMWARE_NAME, PROTOCOL_BUILD, PROTOCOL_VERSION};

use crate::hooks::Hooks;
use crate::stream::StreamWriter;

/// Driver and board identification reported by `$I`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildInfo {
    /// User-stored build info line (`$I=...`).
    pub line: String,
    pub rx_buffer_size: u16,
    pub nvs_storage: Option<String>,
    pub driver: Option<String>,
    pub driver_version: Option<String>,
    pub driver_options: Option<String>,
    pub board: Option<String>,
    /// Maximum step rate [Hz].
    pub max_step_rate: Option<u32>,
}

fn option_letters(config: &ControllerConfig) -> String {
    let caps = &config.capabilities;
    let homing = &config.homing;

    [
        (caps.variable_spindle, 'V'),
        (true, 'N'),
        (caps.mist_control, 'M'),
        (homing.force_set_origin, 'Z'),
        (homing.single_axis_commands, 'H'),
        (caps.software_debounce, 'S'),
        (config.parking_override_control, 'R'),
        (!homing.init_lock, 'L'),
        (caps.safety_door_ajar, '+'),
        (!config.status_report.sync_on_wco_change, 'W'),
        (caps.auto_squared, '2'),
    ]
    .into_iter()
    .filter_map(|(set, letter)| set.then_some(letter))
    .collect()
}

fn new_options(config: &ControllerConfig) -> Vec<&'static str> {
    let caps = &config.capabilities;
    let mut opts = vec![
        "ENUMS",
        if config.legacy_rt_commands { "RT+" } else { "RT-" },
    ];

    if config.homing.enabled {
        opts.push("HOME");
    }
    if !caps.probe {
        opts.push("NOPROBE");
    } else if caps.probe_disconnected {
        opts.push("PC");
    }
    for (set, name) in [
        (caps.stop_disable, "OS"),
        (caps.block_delete, "BD"),
        (caps.e_stop, "ES"),
        (caps.mpg_mode, "MPG"),
        (config.lathe_mode, "LATHE"),
        (caps.tool_change, "TC"),
        (caps.spindle_sync, "SS"),
    ] {
        if set {
            opts.push(name);
        }
    }
    opts
}

/// `[VER:]` and `[OPT:]`, then with `extended` the `[NEWOPT:]` and
/// `[FIRMWARE:]` blocks. Report options handlers append to `[NEWOPT:` and
/// after the fixed lines.
pub fn build_info(
    out: &mut dyn StreamWriter,
    info: &BuildInfo,
    config: &ControllerConfig,
    extended: bool,
    hooks: &Hooks,
) {
    write!(
        out,
        "[VER:{PROTOCOL_VERSION}.{PROTOCOL_BUILD}:{}]{ASCII_EOL}",
        info.line
    );

    write!(
        out,
        "[OPT:{},{},{}",
        option_letters(config),
        BLOCK_BUFFER_SIZE - 1,
        info.rx_buffer_size
    );
    if extended {
        write!(out, ",{},{}", config.axis_count, config.n_tools);
    }
    out.write("]\r\n");

    if !extended {
        return;
    }

    write!(out, "[NEWOPT:{}", new_options(config).join(","));
    hooks.report_options(out, true);
    out.write("]\r\n");

    write!(out, "[FIRMWARE:{FIRMWARE_NAME}]{ASCII_EOL}");

    let tagged = [
        ("NVS STORAGE", &info.nvs_storage),
        ("DRIVER", &info.driver),
        ("DRIVER VERSION", &info.driver_version),
        ("DRIVER OPTIONS", &info.driver_options),
        ("BOARD", &info.board),
    ];
    for (tag, value) in tagged {
        if let Some(value) = value {
            write!(out, "[{tag}:{value}]{ASCII_EOL}");
        }
    }
    if let Some(rate) = info.max_step_rate {
        write!(out, "[MAX STEP RATE:{rate} Hz]{ASCII_EOL}");
    }

    hooks.report_options(out, false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::ReportOptionsHandler;
    use std::sync::Arc;

    struct Odometer;

    impl ReportOptionsHandler for Odometer {
        fn on_report_options(&self, out: &mut dyn StreamWriter, newopt: bool) {
            if newopt {
                out.write(",ODO");
            } else {
                out.write("[PLUGIN:ODOMETER v0.03]\r\n");
            }
        }
    }

    fn info() -> BuildInfo {
        BuildInfo {
            line: "bench".into(),
            rx_buffer_size: 1024,
            driver: Some("SIM".into()),
            max_step_rate: Some(100_000),
            ..Default::default()
        }
    }

    #[test]
    fn short_form() {
        let mut out = String::new();
        build_info(&mut out, &info(), &ControllerConfig::default(), false, &Hooks::new());
        assert_eq!(out, "[VER:1.1f.20210204:bench]\r\n[OPT:N,35,1024]\r\n");
    }

    #[test]
    fn extended_form_with_plugin() {
        let mut config = ControllerConfig::default();
        config.capabilities.variable_spindle = true;
        config.capabilities.probe = true;
        config.capabilities.e_stop = true;
        config.homing.init_lock = false;
        config.n_tools = 8;

        let mut hooks = Hooks::new();
        hooks.on_report_options(Arc::new(Odometer));

        let mut out = String::new();
        build_info(&mut out, &info(), &config, true, &hooks);
        assert_eq!(
            out,
            "[VER:1.1f.20210204:bench]\r\n\
             [OPT:VNL,35,1024,3,8]\r\n\
             [NEWOPT:ENUMS,RT+,HOME,ES,ODO]\r\n\
             [FIRMWARE:grblHAL]\r\n\
             [DRIVER:SIM]\r\n\
             [MAX STEP RATE:100000 Hz]\r\n\
             [PLUGIN:ODOMETER v0.03]\r\n"
        );
    }

    #[test]
    fn probe_capability_options() {
        let mut config = ControllerConfig::default();
        assert!(new_options(&config).contains(&"NOPROBE"));
        config.capabilities.probe = true;
        config.capabilities.probe_disconnected = true;
        config.legacy_rt_commands = false;
        assert_eq!(new_options(&config)[..4], ["ENUMS", "RT-", "HOME", "PC"]);
    }
}
