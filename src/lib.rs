pub mod admin;
mod config;
pub mod error;
pub mod host;
pub mod persistence;
pub mod plugin;
pub mod telemetry;
pub mod world;

pub use admin::commands::{CommandOutcome, MONSTERS_COMMAND};
pub use error::{ConfigError, HostError, PluginError};
pub use host::{CommandExecutor, CommandRegistry, CommandSpec, EntityId, Server, TabCompleter, World};
pub use persistence::config_store::{ConfigStore, MonsterPolicy};
pub use plugin::Plugin;
pub use world::settings::{apply_settings, ApplyReport};

use host::memory::{CommandMap, MemoryServer};

pub fn run(args: &[String]) -> Result<(), String> {
    let config = config::AppConfig::from_args(args)?;
    telemetry::logging::init(&config.data_dir, config.log)?;

    let mut server = if config.worlds_file.exists() {
        MemoryServer::from_seed_file(&config.worlds_file)?
    } else {
        log::info!(
            "no world seed at {}, loading empty world '{}'",
            config.worlds_file.display(),
            host::memory::DEFAULT_WORLD_NAME
        );
        MemoryServer::with_default_world()
    };
    println!("xmonsters: data dir {}", config.data_dir.display());
    for world in server.worlds() {
        println!(
            "- world {}: entities={}, monsters={}",
            world.name(),
            world.entities().count(),
            world.monsters().len()
        );
    }

    let mut commands = CommandMap::new();
    let mut plugin = Plugin::start(&config.data_dir, &mut server, &mut commands)
        .map_err(|err| err.to_string())?;
    println!("xmonsters: ready, type \"help\" for commands");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let result = admin::console::run_console(
        stdin.lock(),
        stdout.lock(),
        &mut plugin,
        &mut server,
        &commands,
    )
    .map_err(|err| format!("console error: {}", err));
    plugin.stop();
    log::logger().flush();
    result
}
