//! Ordered collection of settings registries (controller core first, then
//! plugins in registration order).

use cnc_common::config::ControllerConfig;
use cnc_common::settings::{
    GroupId, SettingDescriptor, SettingGroupDescriptor, SettingId, SettingsRegistry,
    normalize_group,
};
use tracing::{info, warn};

/// Registry chain discovered by iteration.
#[derive(Debug, Clone, Default)]
pub struct RegistryChain {
    registries: Vec<SettingsRegistry>,
}

impl RegistryChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain holding only the controller core registry.
    pub fn with_core(core: SettingsRegistry) -> Self {
        let mut chain = Self::new();
        chain.register(core);
        chain
    }

    /// Append a registry. A registry whose name is already present is
    /// rejected, which keeps the chain free of repeats.
    pub fn register(&mut self, registry: SettingsRegistry) -> bool {
        if self.registries.iter().any(|r| r.name == registry.name) {
            warn!(registry = registry.name, "settings registry already registered");
            return false;
        }
        info!(
            registry = registry.name,
            settings = registry.settings.len(),
            groups = registry.groups.len(),
            "settings registry registered"
        );
        self.registries.push(registry);
        true
    }

    pub fn registries(&self) -> &[SettingsRegistry] {
        &self.registries
    }

    /// The controller core registry, if any.
    pub fn core(&self) -> Option<&SettingsRegistry> {
        self.registries.first()
    }

    pub fn len(&self) -> usize {
        self.registries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registries.is_empty()
    }

    pub fn settings(&self) -> impl Iterator<Item = &'static SettingDescriptor> + '_ {
        self.registries.iter().flat_map(|r| r.settings.iter())
    }

    pub fn groups(&self) -> impl Iterator<Item = &'static SettingGroupDescriptor> + '_ {
        self.registries.iter().flat_map(|r| r.groups.iter())
    }

    /// Total descriptor count across the chain.
    pub fn setting_count(&self) -> usize {
        self.registries.iter().map(|r| r.settings.len()).sum()
    }

    pub fn group_count(&self) -> usize {
        self.registries.iter().map(|r| r.groups.len()).sum()
    }

    /// Find the descriptor covering `id` and the axis offset of `id` in it.
    pub fn find_setting(
        &self,
        id: SettingId,
        config: &ControllerConfig,
    ) -> Option<(&'static SettingDescriptor, u8)> {
        self.settings()
            .filter(|s| s.available(config))
            .find_map(|s| s.offset_of(id, config.axis_count).map(|offset| (s, offset)))
    }

    pub fn find_group(&self, id: GroupId) -> Option<&'static SettingGroupDescriptor> {
        self.groups().find(|g| g.id == id)
    }

    /// Case-insensitive lookup of a group by name.
    pub fn find_group_by_name(&self, name: &str) -> Option<&'static SettingGroupDescriptor> {
        self.groups().find(|g| g.name.eq_ignore_ascii_case(name))
    }

    /// A group is available when it holds an available setting, or when
    /// one of its descendants does.
    pub fn group_available(&self, id: GroupId, config: &ControllerConfig) -> bool {
        let mut pending = vec![id];
        let mut visited: Vec<GroupId> = Vec::new();

        while let Some(group) = pending.pop() {
            if visited.contains(&group) {
                continue;
            }
            visited.push(group);

            if self.group_has_setting(group, config) {
                return true;
            }
            pending.extend(
                self.groups()
                    .filter(|g| g.parent == group && g.id != group)
                    .map(|g| g.id),
            );
        }
        false
    }

    fn group_has_setting(&self, group: GroupId, config: &ControllerConfig) -> bool {
        let (normalized, offset) = normalize_group(group);
        self.settings().any(|s| {
            s.group == normalized
                && offset < s.instances(config.axis_count)
                && s.available(config)
        })
    }
}
