//! Capabilities the plugin consumes from the server runtime that hosts it.
//!
//! The runtime owns worlds, entities and command dispatch. The plugin only
//! sees them through these traits, for the duration of a single call.

pub mod memory;

use crate::admin::commands::CommandOutcome;
use crate::error::HostError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// A loaded world as exposed by the host.
pub trait World {
    fn name(&self) -> &str;

    /// Whether hostile creatures may spawn naturally.
    fn allow_monsters(&self) -> bool;

    /// Whether passive creatures may spawn naturally.
    fn allow_animals(&self) -> bool;

    /// Sets both spawn flags at once. Hosts may refuse the change.
    fn set_spawn_flags(
        &mut self,
        allow_monsters: bool,
        allow_animals: bool,
    ) -> Result<(), HostError>;

    /// Snapshot of the hostile creatures currently in this world.
    fn monsters(&self) -> Vec<EntityId>;

    /// Removes an entity, returning false if it no longer exists.
    fn remove_entity(&mut self, id: EntityId) -> bool;
}

pub trait Server {
    /// Worlds loaded at the time of the call.
    fn worlds_mut(&mut self) -> Vec<&mut dyn World>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
}

/// Where a plugin announces the commands it handles.
pub trait CommandRegistry {
    fn register(&mut self, spec: CommandSpec) -> Result<(), HostError>;
}

pub trait CommandExecutor {
    fn on_command(&mut self, server: &mut dyn Server, args: &[&str]) -> CommandOutcome;
}

pub trait TabCompleter {
    /// `args` holds every argument typed so far; the last one is being
    /// completed and may be empty.
    fn on_tab_complete(&self, args: &[&str]) -> Vec<String>;
}
