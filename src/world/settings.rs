use crate::error::HostError;
use crate::host::Server;
use crate::persistence::config_store::MonsterPolicy;
use log::{debug, info};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ApplyReport {
    pub worlds: usize,
    pub removed: usize,
}

/// Pushes the policy into every loaded world.
///
/// The hostile spawn flag follows the policy while the passive flag is read
/// back and kept. Disabling also sweeps the hostile creatures that already
/// exist; later spawns are left to the host honoring the flag. The first
/// world that refuses the flag change aborts the pass.
pub fn apply_settings(
    server: &mut dyn Server,
    policy: MonsterPolicy,
) -> Result<ApplyReport, HostError> {
    let mut report = ApplyReport::default();
    for world in server.worlds_mut() {
        let allow_animals = world.allow_animals();
        world.set_spawn_flags(policy.enabled, allow_animals)?;
        report.worlds += 1;

        if policy.enabled {
            continue;
        }
        let mut removed = 0;
        for id in world.monsters() {
            if world.remove_entity(id) {
                removed += 1;
            }
        }
        if removed > 0 {
            debug!("removed {} monsters from world '{}'", removed, world.name());
        }
        report.removed += removed;
    }
    info!(
        "monsters {} in {} worlds, {} removed",
        if policy.enabled { "allowed" } else { "denied" },
        report.worlds,
        report.removed
    );
    Ok(report)
}
