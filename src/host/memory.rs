use crate::error::HostError;
use crate::host::{CommandRegistry, CommandSpec, EntityId, Server, World};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_WORLD_NAME: &str = "world";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatureKind {
    Player,
    Npc,
    Monster,
    Animal,
}

impl CreatureKind {
    pub fn is_hostile(self) -> bool {
        matches!(self, CreatureKind::Monster)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub kind: CreatureKind,
}

#[derive(Debug, Clone)]
pub struct MemoryWorld {
    name: String,
    allow_monsters: bool,
    allow_animals: bool,
    locked: bool,
    entities: BTreeMap<EntityId, Entity>,
    next_id: u32,
}

impl MemoryWorld {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            allow_monsters: true,
            allow_animals: true,
            locked: false,
            entities: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn spawn(&mut self, name: impl Into<String>, kind: CreatureKind) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(
            id,
            Entity {
                id,
                name: name.into(),
                kind,
            },
        );
        id
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn count(&self, kind: CreatureKind) -> usize {
        self.entities
            .values()
            .filter(|entity| entity.kind == kind)
            .count()
    }

    /// A locked world rejects spawn flag changes.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }
}

impl World for MemoryWorld {
    fn name(&self) -> &str {
        &self.name
    }

    fn allow_monsters(&self) -> bool {
        self.allow_monsters
    }

    fn allow_animals(&self) -> bool {
        self.allow_animals
    }

    fn set_spawn_flags(
        &mut self,
        allow_monsters: bool,
        allow_animals: bool,
    ) -> Result<(), HostError> {
        if self.locked {
            return Err(HostError::SpawnFlagsLocked {
                world: self.name.clone(),
            });
        }
        self.allow_monsters = allow_monsters;
        self.allow_animals = allow_animals;
        Ok(())
    }

    fn monsters(&self) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|entity| entity.kind.is_hostile())
            .map(|entity| entity.id)
            .collect()
    }

    fn remove_entity(&mut self, id: EntityId) -> bool {
        self.entities.remove(&id).is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryServer {
    worlds: Vec<MemoryWorld>,
}

impl MemoryServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_world() -> Self {
        let mut server = Self::new();
        server.add_world(MemoryWorld::new(DEFAULT_WORLD_NAME));
        server
    }

    /// Builds the world set described by a `worlds.yaml` seed file.
    pub fn from_seed_file(path: &Path) -> Result<Self, String> {
        let data = fs::read_to_string(path)
            .map_err(|err| format!("world seed read failed for {}: {}", path.display(), err))?;
        Self::from_seed_str(&data)
            .map_err(|err| format!("world seed parse failed for {}: {}", path.display(), err))
    }

    pub fn from_seed_str(data: &str) -> Result<Self, serde_yaml::Error> {
        let seeds: Vec<WorldSeed> = serde_yaml::from_str(data)?;
        let mut server = Self::new();
        for seed in seeds {
            let mut world = MemoryWorld::new(seed.name);
            world.allow_monsters = seed.allow_monsters;
            world.allow_animals = seed.allow_animals;
            for entity in seed.entities {
                world.spawn(entity.name, entity.kind);
            }
            server.add_world(world);
        }
        Ok(server)
    }

    pub fn add_world(&mut self, world: MemoryWorld) {
        self.worlds.push(world);
    }

    pub fn world(&self, name: &str) -> Option<&MemoryWorld> {
        self.worlds.iter().find(|world| world.name == name)
    }

    pub fn world_mut(&mut self, name: &str) -> Option<&mut MemoryWorld> {
        self.worlds.iter_mut().find(|world| world.name == name)
    }

    pub fn worlds(&self) -> &[MemoryWorld] {
        &self.worlds
    }
}

impl Server for MemoryServer {
    fn worlds_mut(&mut self) -> Vec<&mut dyn World> {
        self.worlds
            .iter_mut()
            .map(|world| world as &mut dyn World)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct WorldSeed {
    name: String,
    #[serde(default = "default_true")]
    allow_monsters: bool,
    #[serde(default = "default_true")]
    allow_animals: bool,
    #[serde(default)]
    entities: Vec<EntitySeed>,
}

#[derive(Debug, Deserialize)]
struct EntitySeed {
    name: String,
    kind: CreatureKind,
}

fn default_true() -> bool {
    true
}

/// Command table of the in-memory host.
#[derive(Debug, Default)]
pub struct CommandMap {
    commands: BTreeMap<&'static str, CommandSpec>,
}

impl CommandMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }
}

impl CommandRegistry for CommandMap {
    fn register(&mut self, spec: CommandSpec) -> Result<(), HostError> {
        if self.commands.contains_key(spec.name) {
            return Err(HostError::CommandTaken(spec.name.to_string()));
        }
        self.commands.insert(spec.name, spec);
        Ok(())
    }
}
