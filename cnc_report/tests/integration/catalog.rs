//! Integration test: catalog listings over the core registry plus plugins.
//!
//! Covers ordering across registries, the unsorted fallback, per-axis
//! group scoping, capability gating and repeatability of every listing.

use std::collections::BTreeSet;

use cnc_common::codes::{ALARM_DETAILS, ERROR_DETAILS};
use cnc_common::config::ControllerConfig;
use cnc_common::settings::{
    Datatype, GroupFilter, SettingClass, SettingDescriptor, SettingGroupDescriptor, SettingId,
    SettingValue, SettingsRegistry, SettingsStore, group,
};
use cnc_common::status::StatusCode;
use cnc_report::catalog::{Catalog, CatalogKind, GroupOrder, RenderMode};
use cnc_report::core_settings::core_chain;

const GUARD_GROUP: u8 = 90;

static GUARD_SETTINGS: [SettingDescriptor; 2] = [
    SettingDescriptor::new(450, GUARD_GROUP, "Probe protection", Datatype::Bool)
        .class(SettingClass::NonCore),
    SettingDescriptor::new(7, group::GENERAL, "Guard retries", Datatype::Integer)
        .range("0", "9")
        .class(SettingClass::NonCore),
];

static GUARD_GROUPS: [SettingGroupDescriptor; 1] =
    [SettingGroupDescriptor::new(GUARD_GROUP, group::ROOT, "Probe guard")];

struct EchoStore;

impl SettingsStore for EchoStore {
    fn setting_value(&self, id: SettingId) -> Option<SettingValue> {
        Some(SettingValue::Integer(i64::from(id)))
    }
}

fn catalog(config: &ControllerConfig) -> Catalog {
    let mut catalog = Catalog::new(core_chain(), config);
    assert!(catalog.register(SettingsRegistry::new(
        "probe-guard",
        &GUARD_SETTINGS,
        &GUARD_GROUPS
    )));
    catalog
}

fn setting_ids(out: &str) -> Vec<u16> {
    out.lines()
        .filter_map(|l| l.strip_prefix('$'))
        .filter_map(|l| l.split([':', '=']).next())
        .filter_map(|id| id.parse().ok())
        .collect()
}

fn settings(catalog: &Catalog, filter: GroupFilter) -> (StatusCode, String) {
    let mut out = String::new();
    let status = catalog.settings_details(filter, RenderMode::Human, &mut out);
    (status, out)
}

// ── Ordering ────────────────────────────────────────────────────────

#[test]
fn sorted_listing_interleaves_plugin_settings() {
    let c = catalog(&ControllerConfig::default());
    let (status, out) = settings(&c, GroupFilter::All);
    assert_eq!(status, StatusCode::Ok);

    let ids = setting_ids(&out);
    assert!(ids.windows(2).all(|w| w[0] < w[1]), "{ids:?}");
    let seven = ids.iter().position(|id| *id == 7);
    let ten = ids.iter().position(|id| *id == 10);
    assert!(seven < ten);
    assert_eq!(ids.last(), Some(&450));

    assert!(out.contains("$7: Guard retries, range: 0 - 9\r\n"));
    assert!(out.contains("$30: Maximum spindle speed in RPM\r\n"));
}

#[test]
fn axis_families_expand_in_id_order() {
    let c = catalog(&ControllerConfig::default());
    let (_, out) = settings(&c, GroupFilter::Group(group::AXIS0));
    assert_eq!(
        setting_ids(&out),
        [100, 101, 102, 110, 111, 112, 120, 121, 122, 130, 131, 132]
    );
    assert!(out.starts_with("$100: X-axis travel resolution in step/mm\r\n"));
}

// ── Unsorted fallback ───────────────────────────────────────────────

#[test]
fn unsorted_fallback_lists_the_same_rows() {
    let config = ControllerConfig::default();
    let sorted = catalog(&config);
    let mut unsorted = catalog(&config);
    unsorted.set_sorting(false);

    let rows = |c: &Catalog| {
        let (status, out) = settings(c, GroupFilter::All);
        assert_eq!(status, StatusCode::Ok);
        out.lines().map(str::to_owned).collect::<BTreeSet<_>>()
    };
    assert_eq!(rows(&sorted), rows(&unsorted));

    let values = |c: &Catalog, all: bool| {
        let mut out = String::new();
        c.setting_values(all, &EchoStore, &mut out);
        out.lines().map(str::to_owned).collect::<BTreeSet<_>>()
    };
    assert_eq!(values(&sorted, false), values(&unsorted, false));
    assert_eq!(values(&sorted, true), values(&unsorted, true));

    let groups = |c: &Catalog| {
        let mut out = String::new();
        c.group_details(GroupOrder::ById, None, &mut out);
        out.lines().map(str::to_owned).collect::<BTreeSet<_>>()
    };
    assert_eq!(groups(&sorted), groups(&unsorted));
}

#[test]
fn unsorted_fallback_walks_registries_in_order() {
    let mut c = catalog(&ControllerConfig::default());
    c.set_sorting(false);
    let (_, out) = settings(&c, GroupFilter::All);
    let ids = setting_ids(&out);
    // Plugin rows follow the whole core registry.
    assert_eq!(&ids[ids.len() - 2..], [450, 7]);
}

// ── Group scoping ───────────────────────────────────────────────────

#[test]
fn single_axis_group_suppresses_other_axes() {
    let c = catalog(&ControllerConfig::default());
    let (status, out) = settings(&c, GroupFilter::Group(group::Y_AXIS));
    assert_eq!(status, StatusCode::Ok);
    assert_eq!(setting_ids(&out), [101, 111, 121, 131]);
    assert!(out.starts_with("$101: Y-axis travel resolution in step/mm\r\n"));
}

#[test]
fn axis_beyond_axis_count_is_disabled() {
    let c = catalog(&ControllerConfig::default());
    let (status, out) = settings(&c, GroupFilter::Group(group::A_AXIS));
    assert_eq!(status, StatusCode::SettingDisabled);
    assert!(out.is_empty());

    let config = ControllerConfig {
        axis_count: 4,
        ..Default::default()
    };
    let c = catalog(&config);
    let (status, out) = settings(&c, GroupFilter::Group(group::A_AXIS));
    assert_eq!(status, StatusCode::Ok);
    assert_eq!(setting_ids(&out), [103, 113, 123, 133]);
}

#[test]
fn plugin_group_is_scoped() {
    let c = catalog(&ControllerConfig::default());
    let (status, out) = settings(&c, GroupFilter::Group(GUARD_GROUP));
    assert_eq!(status, StatusCode::Ok);
    assert_eq!(out, "$450: Probe protection as boolean\r\n");
}

// ── Capability gating ───────────────────────────────────────────────

#[test]
fn capability_gated_settings_follow_config() {
    let mut config = ControllerConfig::default();
    let c = catalog(&config);
    let (status, _) = settings(&c, GroupFilter::Group(group::TOOL_CHANGE));
    assert_eq!(status, StatusCode::SettingDisabled);

    let mut out = String::new();
    c.group_details(GroupOrder::ByName, Some(""), &mut out);
    assert!(!out.contains("Tool change"));

    config.capabilities.tool_change = true;
    let mut c = c;
    c.set_config(&config);
    let (status, out) = settings(&c, GroupFilter::Group(group::TOOL_CHANGE));
    assert_eq!(status, StatusCode::Ok);
    assert_eq!(setting_ids(&out), [341, 342]);

    let mut out = String::new();
    c.group_details(GroupOrder::ByName, Some(""), &mut out);
    assert!(out.contains("Tool change\r\n"));
}

#[test]
fn machine_group_records_cover_available_groups_only() {
    let c = catalog(&ControllerConfig::default());
    let mut out = String::new();
    assert_eq!(
        c.enumerate(
            CatalogKind::Groups(GroupOrder::ById),
            GroupFilter::All,
            RenderMode::Machine,
            &mut out
        ),
        StatusCode::Ok
    );
    assert!(out.starts_with("[SETTINGGROUP:0|0|Root]\r\n"));
    assert!(out.contains("[SETTINGGROUP:90|0|Probe guard]\r\n"));
    assert!(!out.contains("|Jogging]"));
    assert!(!out.contains("|A-axis]"));
}

// ── Values ──────────────────────────────────────────────────────────

#[test]
fn legacy_value_listing_excludes_plugins_and_extended() {
    let c = catalog(&ControllerConfig::default());
    let mut out = String::new();
    c.setting_values(false, &EchoStore, &mut out);
    let legacy = setting_ids(&out);
    assert!(legacy.contains(&30));
    assert!(legacy.contains(&132));
    assert!(!legacy.contains(&7));
    assert!(!legacy.contains(&14));
    assert!(!legacy.contains(&450));

    let mut out = String::new();
    c.setting_values(true, &EchoStore, &mut out);
    let all = setting_ids(&out);
    assert!(all.contains(&7));
    assert!(all.contains(&14));
    assert!(all.contains(&450));
    assert!(all.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn single_value_resolves_axis_instances() {
    let c = catalog(&ControllerConfig::default());
    let mut out = String::new();
    assert_eq!(c.setting_value(111, &EchoStore, &mut out), StatusCode::Ok);
    assert_eq!(out, "$111=111\r\n");

    let mut out = String::new();
    assert_eq!(
        c.setting_value(113, &EchoStore, &mut out),
        StatusCode::SettingDisabled
    );
    assert!(out.is_empty());
}

// ── Tables and repeatability ────────────────────────────────────────

#[test]
fn alarm_and_error_tables_are_complete() {
    let mut out = String::new();
    assert_eq!(Catalog::alarm_details(&mut out), StatusCode::Ok);
    assert_eq!(out.lines().count(), ALARM_DETAILS.len());
    assert!(out.starts_with("[ALARMCODE:1|"));

    let mut out = String::new();
    assert_eq!(Catalog::error_details(&mut out), StatusCode::Ok);
    assert_eq!(out.lines().count(), ERROR_DETAILS.len());
    assert!(out.lines().all(|l| l.starts_with("[ERRORCODE:") && l.ends_with(']')));
}

#[test]
fn every_listing_is_repeatable() {
    let c = catalog(&ControllerConfig::default());
    let kinds = [
        CatalogKind::Setting(102),
        CatalogKind::Settings,
        CatalogKind::Groups(GroupOrder::ById),
        CatalogKind::Groups(GroupOrder::ByName),
        CatalogKind::Alarms,
        CatalogKind::Errors,
    ];

    for kind in kinds {
        for mode in [RenderMode::Human, RenderMode::Machine] {
            let mut first = String::new();
            let mut second = String::new();
            let a = c.enumerate(kind, GroupFilter::All, mode, &mut first);
            let b = c.enumerate(kind, GroupFilter::All, mode, &mut second);
            assert_eq!(a, b);
            assert_eq!(first, second, "{kind:?} {mode:?}");
        }
    }
}

#[test]
fn duplicate_registry_is_rejected() {
    let mut c = catalog(&ControllerConfig::default());
    assert!(!c.register(SettingsRegistry::new("probe-guard", &GUARD_SETTINGS, &[])));
    assert_eq!(c.chain().len(), 2);
}
