//! Catalog enumerator: settings, setting groups, alarm and error tables.
//!
//! Descriptors from every registry in the chain are merged, filtered,
//! sorted by id and rendered. Sorting needs one scratch array sized to the
//! whole chain; when that allocation fails the enumerator walks the
//! registries in declaration order instead. Both paths render the same set
//! of rows.

pub mod chain;
pub mod help;
pub mod render;

use cnc_common::codes::{ALARM_DETAILS, ERROR_DETAILS};
use cnc_common::config::ControllerConfig;
use cnc_common::settings::{
    GroupFilter, GroupId, SettingDescriptor, SettingGroupDescriptor, SettingId, SettingsRegistry,
    SettingsStore, normalize_group,
};
use cnc_common::status::StatusCode;
use tracing::{debug, warn};

use crate::stream::StreamWriter;

use self::chain::RegistryChain;
pub use self::render::RenderMode;
use self::render::{render_alarm, render_error, render_group, render_setting, render_setting_value};

/// What to enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    /// One setting by id (axis ids resolve to their family).
    Setting(SettingId),
    /// All settings matching the group filter.
    Settings,
    /// Setting groups.
    Groups(GroupOrder),
    Alarms,
    Errors,
}

/// Sort key for group listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupOrder {
    #[default]
    ById,
    ByName,
}

/// Group filter resolved to a normalized group and axis offset.
#[derive(Debug, Clone, Copy)]
struct Scope {
    filter: GroupFilter,
    group: GroupId,
    offset: u8,
}

impl Scope {
    fn new(filter: GroupFilter) -> Self {
        let (group, offset) = match filter {
            GroupFilter::All => (0, 0),
            GroupFilter::Group(id) => normalize_group(id),
        };
        Self {
            filter,
            group,
            offset,
        }
    }

    fn matches(&self, setting: &SettingDescriptor) -> bool {
        match self.filter {
            GroupFilter::All => true,
            GroupFilter::Group(_) => setting.group == self.group,
        }
    }

    /// Per-axis instances of other axes are skipped when one axis group was
    /// requested.
    fn suppresses(&self, setting: &SettingDescriptor, offset: u8) -> bool {
        matches!(self.filter, GroupFilter::Group(_))
            && setting.group == self.group
            && offset != self.offset
    }
}

/// Settings, groups, alarms and errors of the controller and its plugins.
#[derive(Debug, Clone)]
pub struct Catalog {
    chain: RegistryChain,
    config: ControllerConfig,
    sorted: bool,
}

impl Catalog {
    pub fn new(chain: RegistryChain, config: &ControllerConfig) -> Self {
        Self {
            chain,
            config: config.clone(),
            sorted: true,
        }
    }

    pub fn chain(&self) -> &RegistryChain {
        &self.chain
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Add a plugin registry to the end of the chain.
    pub fn register(&mut self, registry: SettingsRegistry) -> bool {
        self.chain.register(registry)
    }

    pub fn set_config(&mut self, config: &ControllerConfig) {
        self.config = config.clone();
    }

    /// Enable or disable the sorted path. With sorting disabled every
    /// listing takes the unsorted per-registry walk.
    pub fn set_sorting(&mut self, enabled: bool) {
        self.sorted = enabled;
    }

    /// Scratch array for `count` entries, `None` selects the unsorted path.
    /// Both paths apply the same filter and render closure; only the order
    /// of the rows differs.
    fn scratch<T>(&self, count: usize) -> Option<Vec<T>> {
        if !self.sorted {
            debug!(count, "catalog sorting disabled, listing unsorted");
            return None;
        }
        let mut list = Vec::new();
        match list.try_reserve_exact(count) {
            Ok(()) => Some(list),
            Err(e) => {
                warn!(count, error = %e, "catalog scratch allocation failed, listing unsorted");
                None
            }
        }
    }

    /// Enumerate `kind`, restricted by `filter` for settings.
    pub fn enumerate(
        &self,
        kind: CatalogKind,
        filter: GroupFilter,
        mode: RenderMode,
        out: &mut dyn StreamWriter,
    ) -> StatusCode {
        match kind {
            CatalogKind::Setting(id) => self.setting_details(id, mode, out),
            CatalogKind::Settings => self.settings_details(filter, mode, out),
            CatalogKind::Groups(order) => {
                let prefix = match mode {
                    RenderMode::Human => Some(""),
                    RenderMode::Machine => None,
                };
                self.group_details(order, prefix, out)
            }
            CatalogKind::Alarms => Self::alarm_details(out),
            CatalogKind::Errors => Self::error_details(out),
        }
    }

    /// Details of the setting covering `id`.
    pub fn setting_details(
        &self,
        id: SettingId,
        mode: RenderMode,
        out: &mut dyn StreamWriter,
    ) -> StatusCode {
        match self.chain.find_setting(id, &self.config) {
            Some((setting, offset)) => {
                render_setting(out, setting, offset, mode);
                StatusCode::Ok
            }
            None => StatusCode::SettingDisabled,
        }
    }

    /// Details of every available setting in `filter`, ascending by id.
    ///
    /// Returns [`StatusCode::SettingDisabled`] when a named group renders
    /// no rows.
    pub fn settings_details(
        &self,
        filter: GroupFilter,
        mode: RenderMode,
        out: &mut dyn StreamWriter,
    ) -> StatusCode {
        let scope = Scope::new(filter);
        let axis_count = self.config.axis_count;
        let selected = |s: &&'static SettingDescriptor| scope.matches(s) && s.available(&self.config);

        let mut reported = false;
        let mut render = |setting: &SettingDescriptor| {
            for offset in 0..setting.instances(axis_count) {
                if !scope.suppresses(setting, offset) {
                    render_setting(out, setting, offset, mode);
                    reported = true;
                }
            }
        };

        match self.scratch::<&SettingDescriptor>(self.chain.setting_count()) {
            Some(mut list) => {
                list.extend(self.chain.settings().filter(selected));
                list.sort_by_key(|s| s.id);
                list.into_iter().for_each(&mut render);
            }
            None => self.chain.settings().filter(selected).for_each(&mut render),
        }

        if filter == GroupFilter::All || reported {
            StatusCode::Ok
        } else {
            StatusCode::SettingDisabled
        }
    }

    /// Available setting groups. `prefix` selects the plain `<prefix><name>`
    /// form; without it groups render as `[SETTINGGROUP:...]` records.
    pub fn group_details(
        &self,
        order: GroupOrder,
        prefix: Option<&str>,
        out: &mut dyn StreamWriter,
    ) -> StatusCode {
        let mut render = |group: &SettingGroupDescriptor| {
            if self.chain.group_available(group.id, &self.config) {
                render_group(out, group, prefix);
            }
        };

        match self.scratch::<&SettingGroupDescriptor>(self.chain.group_count()) {
            Some(mut list) => {
                list.extend(self.chain.groups());
                match order {
                    GroupOrder::ById => list.sort_by_key(|g| g.id),
                    GroupOrder::ByName => list.sort_by(|a, b| a.name.cmp(b.name)),
                }
                list.into_iter().for_each(&mut render);
            }
            None => self.chain.groups().for_each(&mut render),
        }

        StatusCode::Ok
    }

    pub fn alarm_details(out: &mut dyn StreamWriter) -> StatusCode {
        for alarm in ALARM_DETAILS.iter() {
            render_alarm(out, alarm);
        }
        StatusCode::Ok
    }

    pub fn error_details(out: &mut dyn StreamWriter) -> StatusCode {
        for error in ERROR_DETAILS.iter() {
            render_error(out, error);
        }
        StatusCode::Ok
    }

    /// `$<id>=<value>` for one setting.
    pub fn setting_value(
        &self,
        id: SettingId,
        store: &dyn SettingsStore,
        out: &mut dyn StreamWriter,
    ) -> StatusCode {
        match self.chain.find_setting(id, &self.config) {
            Some((setting, offset)) => {
                render_setting_value(out, setting, offset, store);
                StatusCode::Ok
            }
            None => StatusCode::SettingDisabled,
        }
    }

    /// `$$` listing. Without `all` only legacy settings of the controller
    /// core are listed; with it every registry contributes everything.
    pub fn setting_values(
        &self,
        all: bool,
        store: &dyn SettingsStore,
        out: &mut dyn StreamWriter,
    ) -> StatusCode {
        let axis_count = self.config.axis_count;
        let registries = self.chain.registries();
        let count = if all {
            self.chain.setting_count()
        } else {
            registries.first().map_or(0, |r| r.settings.len())
        };
        let selected = registries
            .iter()
            .take(if all { registries.len() } else { 1 })
            .flat_map(|r| r.settings.iter())
            .filter(|s| (all || s.is_legacy()) && s.available(&self.config));

        let mut render = |setting: &SettingDescriptor| {
            for offset in 0..setting.instances(axis_count) {
                render_setting_value(out, setting, offset, store);
            }
        };

        match self.scratch::<&SettingDescriptor>(count) {
            Some(mut list) => {
                list.extend(selected);
                list.sort_by_key(|s| s.id);
                list.into_iter().for_each(&mut render);
            }
            None => selected.for_each(&mut render),
        }

        StatusCode::Ok
    }
}
