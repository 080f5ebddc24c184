//! Plugin lifecycle: start, command handling and stop.

use crate::admin::commands::{
    complete_args, parse_monsters_args, status_message, toggled_message, CommandOutcome,
    MonstersCommand, MONSTERS_COMMAND,
};
use crate::error::PluginError;
use crate::host::{CommandExecutor, CommandRegistry, Server, TabCompleter};
use crate::persistence::config_store::{ConfigStore, MonsterPolicy};
use crate::world::settings::apply_settings;
use log::{error, info, warn};
use std::path::Path;

pub const APPLY_FAILED_MESSAGE: &str = "Unable to apply monster settings.";

/// A running plugin instance. Owns the policy and its backing store.
#[derive(Debug)]
pub struct Plugin {
    store: ConfigStore,
    policy: MonsterPolicy,
}

impl Plugin {
    /// Loads the config from `data_dir`, applies it to every world and
    /// registers the `monsters` command.
    ///
    /// Nothing is applied or registered when the config cannot be loaded.
    pub fn start(
        data_dir: &Path,
        server: &mut dyn Server,
        registry: &mut dyn CommandRegistry,
    ) -> Result<Self, PluginError> {
        let mut store = ConfigStore::from_data_dir(data_dir);
        let policy = match store.load() {
            Ok(policy) => policy,
            Err(err) => {
                error!("Unable to load plugin configuration.");
                error!("{}", err);
                return Err(PluginError::Load(err));
            }
        };

        if let Err(err) = apply_settings(server, policy) {
            error!("Unable to apply monster settings: {}", err);
            return Err(err.into());
        }
        registry.register(MONSTERS_COMMAND)?;

        info!("XMonsters plugin enabled.");
        Ok(Self { store, policy })
    }

    pub fn policy(&self) -> MonsterPolicy {
        self.policy
    }

    pub fn config_path(&self) -> &Path {
        self.store.path()
    }

    /// Persists the policy one last time. A failed save is logged and
    /// otherwise lost.
    pub fn stop(mut self) {
        if let Err(err) = self.store.save(self.policy) {
            warn!("config save on shutdown failed: {}", err);
        }
        info!("XMonsters plugin disabled.");
    }
}

impl CommandExecutor for Plugin {
    fn on_command(&mut self, server: &mut dyn Server, args: &[&str]) -> CommandOutcome {
        let enabled = match parse_monsters_args(args) {
            Ok(MonstersCommand::Status) => {
                return CommandOutcome::success(status_message(self.policy.enabled))
            }
            Ok(MonstersCommand::Set { enabled }) => enabled,
            Err(rejection) => return CommandOutcome::failure(rejection.message()),
        };

        self.policy.enabled = enabled;
        let applied = apply_settings(server, self.policy);
        if let Err(err) = self.store.save(self.policy) {
            warn!("config save after toggle failed, retrying on shutdown: {}", err);
        }
        match applied {
            Ok(_) => CommandOutcome::success(toggled_message(enabled)),
            Err(err) => {
                error!("Unable to apply monster settings: {}", err);
                CommandOutcome::failure(APPLY_FAILED_MESSAGE)
            }
        }
    }
}

impl TabCompleter for Plugin {
    fn on_tab_complete(&self, args: &[&str]) -> Vec<String> {
        complete_args(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::{CommandMap, CreatureKind, MemoryServer, MemoryWorld};
    use crate::error::HostError;
    use crate::host::{CommandRegistry, World};
    use crate::persistence::config_store::CONFIG_FILE_NAME;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(label: &str) -> PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        std::env::temp_dir().join(format!("xmonsters-{}-test-{}", label, suffix))
    }

    fn server_with_creatures() -> MemoryServer {
        let mut world = MemoryWorld::new("world");
        world.spawn("Creeper", CreatureKind::Monster);
        world.spawn("Skeleton", CreatureKind::Monster);
        world.spawn("Chicken", CreatureKind::Animal);
        let mut server = MemoryServer::new();
        server.add_world(world);
        server
    }

    fn write_config(dir: &Path, data: &str) {
        fs::create_dir_all(dir).expect("dir");
        fs::write(dir.join(CONFIG_FILE_NAME), data).expect("write");
    }

    #[test]
    fn start_applies_loaded_policy_and_registers_command() {
        let dir = temp_dir("plugin-start");
        let mut server = server_with_creatures();
        let mut commands = CommandMap::new();

        let plugin = Plugin::start(&dir, &mut server, &mut commands).expect("start");
        assert_eq!(plugin.policy(), MonsterPolicy::new(false));
        assert!(commands.get("monsters").is_some());
        let world = server.world("world").expect("world");
        assert!(!world.allow_monsters());
        assert_eq!(world.count(CreatureKind::Monster), 0);
        assert_eq!(world.count(CreatureKind::Animal), 1);
        assert!(plugin.config_path().exists());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn start_fails_without_side_effects_on_broken_config() {
        let dir = temp_dir("plugin-broken");
        write_config(&dir, "monstersEnabled: {\n");
        let mut server = server_with_creatures();
        let mut commands = CommandMap::new();

        let result = Plugin::start(&dir, &mut server, &mut commands);
        assert!(matches!(result, Err(PluginError::Load(_))));
        assert!(commands.is_empty());
        let world = server.world("world").expect("world");
        assert!(world.allow_monsters());
        assert_eq!(world.count(CreatureKind::Monster), 2);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn start_fails_when_world_is_locked() {
        let dir = temp_dir("plugin-locked");
        let mut server = server_with_creatures();
        server.world_mut("world").expect("world").set_locked(true);
        let mut commands = CommandMap::new();

        let result = Plugin::start(&dir, &mut server, &mut commands);
        assert!(matches!(result, Err(PluginError::Host(_))));
        assert!(commands.is_empty());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn start_fails_after_applying_when_command_is_taken() {
        let dir = temp_dir("plugin-taken");
        let mut server = server_with_creatures();
        let mut commands = CommandMap::new();
        commands.register(MONSTERS_COMMAND).expect("register");

        let result = Plugin::start(&dir, &mut server, &mut commands);
        assert!(matches!(
            result,
            Err(PluginError::Host(HostError::CommandTaken(ref name))) if name == "monsters"
        ));
        let world = server.world("world").expect("world");
        assert!(!world.allow_monsters());
        assert_eq!(world.count(CreatureKind::Monster), 0);
        assert!(dir.join(CONFIG_FILE_NAME).exists());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn status_reports_without_mutation() {
        let dir = temp_dir("plugin-status");
        write_config(&dir, "monstersEnabled: true\n");
        let mut server = server_with_creatures();
        let mut plugin = Plugin::start(&dir, &mut server, &mut CommandMap::new()).expect("start");

        let outcome = plugin.on_command(&mut server, &[]);
        assert_eq!(outcome, CommandOutcome::success("Monsters are turned on."));
        assert!(plugin.policy().enabled);
        assert_eq!(
            server.world("world").expect("world").count(CreatureKind::Monster),
            2
        );
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn toggle_on_applies_and_persists() {
        let dir = temp_dir("plugin-on");
        let mut server = server_with_creatures();
        let mut plugin = Plugin::start(&dir, &mut server, &mut CommandMap::new()).expect("start");
        assert!(!server.world("world").expect("world").allow_monsters());

        let outcome = plugin.on_command(&mut server, &["on"]);
        assert_eq!(outcome, CommandOutcome::success("Monsters turned on."));
        assert!(plugin.policy().enabled);
        assert!(server.world("world").expect("world").allow_monsters());
        let data = fs::read_to_string(dir.join(CONFIG_FILE_NAME)).expect("config");
        assert!(data.contains("monstersEnabled: true"));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn toggle_off_sweeps_monsters() {
        let dir = temp_dir("plugin-off");
        write_config(&dir, "monstersEnabled: true\n");
        let mut server = server_with_creatures();
        let mut plugin = Plugin::start(&dir, &mut server, &mut CommandMap::new()).expect("start");
        assert_eq!(
            server.world("world").expect("world").count(CreatureKind::Monster),
            2
        );

        let outcome = plugin.on_command(&mut server, &["off"]);
        assert_eq!(outcome, CommandOutcome::success("Monsters turned off."));
        let world = server.world("world").expect("world");
        assert_eq!(world.count(CreatureKind::Monster), 0);
        assert_eq!(world.count(CreatureKind::Animal), 1);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn repeated_toggle_is_harmless() {
        let dir = temp_dir("plugin-repeat");
        write_config(&dir, "monstersEnabled: true\n");
        let mut server = server_with_creatures();
        let mut plugin = Plugin::start(&dir, &mut server, &mut CommandMap::new()).expect("start");

        for _ in 0..2 {
            let outcome = plugin.on_command(&mut server, &["on"]);
            assert_eq!(outcome, CommandOutcome::success("Monsters turned on."));
        }
        assert_eq!(
            server.world("world").expect("world").count(CreatureKind::Monster),
            2
        );
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn invalid_input_leaves_state_alone() {
        let dir = temp_dir("plugin-invalid");
        let mut server = server_with_creatures();
        let mut plugin = Plugin::start(&dir, &mut server, &mut CommandMap::new()).expect("start");

        let outcome = plugin.on_command(&mut server, &["off", "maybe"]);
        assert_eq!(outcome, CommandOutcome::failure("Invalid number of arguments."));
        let outcome = plugin.on_command(&mut server, &["purple"]);
        assert_eq!(outcome, CommandOutcome::failure("Invalid option."));
        assert!(!plugin.policy().enabled);
        assert!(!server.world("world").expect("world").allow_monsters());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn toggle_survives_failed_save() {
        let dir = temp_dir("plugin-savefail");
        let mut server = server_with_creatures();
        let mut plugin = Plugin::start(&dir, &mut server, &mut CommandMap::new()).expect("start");
        fs::remove_file(dir.join(CONFIG_FILE_NAME)).expect("remove");
        fs::create_dir_all(dir.join(CONFIG_FILE_NAME)).expect("block config path");

        let outcome = plugin.on_command(&mut server, &["on"]);
        assert_eq!(outcome, CommandOutcome::success("Monsters turned on."));
        assert!(plugin.policy().enabled);
        plugin.stop();
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn toggle_reports_apply_failure() {
        let dir = temp_dir("plugin-applyfail");
        let mut server = server_with_creatures();
        let mut plugin = Plugin::start(&dir, &mut server, &mut CommandMap::new()).expect("start");
        server.world_mut("world").expect("world").set_locked(true);

        let outcome = plugin.on_command(&mut server, &["on"]);
        assert_eq!(outcome, CommandOutcome::failure(APPLY_FAILED_MESSAGE));
        assert!(plugin.policy().enabled);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn stop_persists_policy() {
        let dir = temp_dir("plugin-stop");
        let mut server = server_with_creatures();
        let mut plugin = Plugin::start(&dir, &mut server, &mut CommandMap::new()).expect("start");
        plugin.on_command(&mut server, &["on"]);
        fs::remove_file(dir.join(CONFIG_FILE_NAME)).expect("remove");

        plugin.stop();
        let data = fs::read_to_string(dir.join(CONFIG_FILE_NAME)).expect("config");
        assert!(data.contains("monstersEnabled: true"));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn tab_complete_offers_options() {
        let dir = temp_dir("plugin-complete");
        let mut server = MemoryServer::new();
        let plugin = Plugin::start(&dir, &mut server, &mut CommandMap::new()).expect("start");
        assert_eq!(plugin.on_tab_complete(&[""]), vec!["on", "off"]);
        assert!(plugin.on_tab_complete(&["on", ""]).is_empty());
        let _ = fs::remove_dir_all(dir);
    }
}
