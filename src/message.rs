use crate::{world::Entity, Serial};
use serde::{Deserialize, Serialize};

/// A request sent by a connected client.
#[non_exhaustive]
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Directive {
    CloseConnection,
    Spawn { name: String },
    Despawn { serial: Serial },
    Inspect { serial: Serial },
    LastSerial,
}

/// A reply pushed to a client, one per directive.
#[non_exhaustive]
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Notification {
    Spawned { entity: Entity },
    Despawned { entity: Entity },
    Entity { entity: Entity },
    LastSerial { serial: Serial },
    Rejected { reason: String },
}
