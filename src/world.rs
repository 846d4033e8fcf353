use crate::{
    allocator::{AllocatorConfig, SerialAllocator},
    error::WorldError,
    registry::Registry,
    store, Serial,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::Path, sync::Arc};
use tokio::sync::Mutex;

/// The world as seen by connection tasks. Allocation and insertion happen
/// under this one lock.
pub type SharedWorld = Arc<Mutex<World>>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub serial: Serial,
    pub name: String,
}

/// What gets written to disk: the live entities plus the allocator position.
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub last_serial: Serial,
    pub entities: Vec<Entity>,
}

/// Live entities keyed by serial, together with the allocator that names them.
#[derive(Debug, Default)]
pub struct World {
    entities: HashMap<Serial, Entity>,
    allocator: SerialAllocator,
}

impl World {
    pub fn new(config: AllocatorConfig) -> Self {
        Self {
            entities: HashMap::new(),
            allocator: SerialAllocator::with_config(config),
        }
    }

    pub fn shared(self) -> SharedWorld {
        Arc::new(Mutex::new(self))
    }

    pub fn spawn<S: Into<String>>(&mut self, name: S) -> Result<Entity, WorldError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(WorldError::EmptyName);
        }

        let serial = self.allocator.next(&self.entities)?;
        let entity = Entity { serial, name };
        self.entities.insert(serial, entity.clone());

        debug!("Spawned {:?} as {}", entity.name, serial);
        Ok(entity)
    }

    pub fn despawn(&mut self, serial: Serial) -> Result<Entity, WorldError> {
        if !serial.is_valid() {
            return Err(WorldError::InvalidSerial(serial));
        }

        let entity = self
            .entities
            .remove(&serial)
            .ok_or(WorldError::NotFound(serial))?;

        debug!("Despawned {}", serial);
        Ok(entity)
    }

    pub fn get(&self, serial: Serial) -> Option<&Entity> {
        self.entities.get(&serial)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn last_serial(&self) -> Serial {
        self.allocator.last()
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut entities: Vec<Entity> = self.entities.values().cloned().collect();
        entities.sort_by_key(|entity| entity.serial);

        Snapshot {
            last_serial: self.allocator.last(),
            entities,
        }
    }

    /// Rebuilds a world from a snapshot. The allocator resumes above both the
    /// saved counter and the highest restored serial, so a stale counter can
    /// not hand out a serial that is already in use.
    pub fn restore(snapshot: Snapshot, config: AllocatorConfig) -> Result<Self, WorldError> {
        let mut entities = HashMap::with_capacity(snapshot.entities.len());
        let mut highest = snapshot.last_serial;

        for entity in snapshot.entities {
            let serial = entity.serial;

            if !serial.is_valid() {
                return Err(WorldError::CorruptSnapshot(format!(
                    "entity {:?} has invalid serial {}",
                    entity.name, serial
                )));
            }

            if entities.insert(serial, entity).is_some() {
                return Err(WorldError::CorruptSnapshot(format!(
                    "serial {} appears twice",
                    serial
                )));
            }

            highest = highest.max(serial);
        }

        Ok(Self {
            entities,
            allocator: SerialAllocator::resume_from(highest, config),
        })
    }

    /// Loads the world saved at `path`, falling back to its backup when the
    /// primary file is missing or unreadable. Returns `None` when neither
    /// exists.
    pub async fn load<P: AsRef<Path>>(
        path: P,
        config: AllocatorConfig,
    ) -> Result<Option<Self>, WorldError> {
        let snapshot = match store::load_snapshot(path.as_ref()).await? {
            Some(snapshot) => snapshot,
            None => return Ok(None),
        };
        let world = Self::restore(snapshot, config)?;

        info!(
            "Loaded {} entities from {}, last serial {}",
            world.len(),
            path.as_ref().display(),
            world.last_serial()
        );
        Ok(Some(world))
    }

    pub async fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), WorldError> {
        store::save_snapshot(path.as_ref(), &self.snapshot()).await?;

        info!("Saved {} entities to {}", self.len(), path.as_ref().display());
        Ok(())
    }
}

impl Registry for World {
    type Object = Entity;

    fn lookup(&self, serial: Serial) -> Option<&Entity> {
        self.get(serial)
    }
}
