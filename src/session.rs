use crate::{
    client::{Client, ListenError},
    error::WorldError,
    world::{SharedWorld, World},
    Directive, Notification, Serial,
};
use log::{debug, warn};

/// Serves one connected client until it leaves.
pub struct Session {
    client: Client,
    world: SharedWorld,
}

impl Session {
    pub fn spawn(client: Client, world: SharedWorld) {
        let session = Self { client, world };
        tokio::spawn(session.listen());
    }

    async fn listen(mut self) {
        debug!("Listening to a new session");

        loop {
            let notification = match self.client.listen().await {
                Ok(directive) => {
                    // The lock is released before the reply is sent.
                    let reply = apply(&mut *self.world.lock().await, directive);

                    match reply {
                        Some(notification) => notification,
                        None => break,
                    }
                }

                // Nothing more can be read, so the client gets dropped.
                Err(ListenError::SocketExhausted) | Err(ListenError::InvalidMessage(_)) => break,

                Err(error) => Notification::Rejected {
                    reason: error.to_string(),
                },
            };

            if let Err(error) = self.client.notify(&notification).await {
                warn!("Couldn't notify a client: {}", error);
                break;
            }
        }

        debug!("A session dropped");
    }
}

/// Runs a directive against the world and builds the reply. Returns `None`
/// when the client asked to close the connection.
pub fn apply(world: &mut World, directive: Directive) -> Option<Notification> {
    let result = match directive {
        Directive::Spawn { name } => world
            .spawn(name)
            .map(|entity| Notification::Spawned { entity }),
        Directive::Despawn { serial } => world
            .despawn(serial)
            .map(|entity| Notification::Despawned { entity }),
        Directive::Inspect { serial } => inspect(world, serial),
        Directive::LastSerial => Ok(Notification::LastSerial {
            serial: world.last_serial(),
        }),
        Directive::CloseConnection => return None,
    };

    let notification = result.unwrap_or_else(|error| {
        debug!("Directive rejected: {}", error);
        Notification::Rejected {
            reason: error.to_string(),
        }
    });

    Some(notification)
}

fn inspect(world: &World, serial: Serial) -> Result<Notification, WorldError> {
    if !serial.is_valid() {
        return Err(WorldError::InvalidSerial(serial));
    }

    world
        .get(serial)
        .cloned()
        .map(|entity| Notification::Entity { entity })
        .ok_or(WorldError::NotFound(serial))
}

#[cfg(test)]
mod test {
    use super::*;

    fn rejected(reply: Option<Notification>) -> bool {
        matches!(reply, Some(Notification::Rejected { .. }))
    }

    #[test]
    fn spawn_then_inspect() {
        let mut world = World::default();

        let spawned = apply(&mut world, Directive::Spawn { name: "a key".into() });
        let Some(Notification::Spawned { entity }) = spawned else {
            panic!("expected a spawn notification");
        };

        assert_eq!(entity.serial, Serial::from_raw(1));
        assert_eq!(
            apply(&mut world, Directive::Inspect { serial: entity.serial }),
            Some(Notification::Entity { entity })
        );
    }

    #[test]
    fn reports_last_serial() {
        let mut world = World::default();

        assert_eq!(
            apply(&mut world, Directive::LastSerial),
            Some(Notification::LastSerial { serial: Serial::ZERO })
        );

        apply(&mut world, Directive::Spawn { name: "a map".into() });

        assert_eq!(
            apply(&mut world, Directive::LastSerial),
            Some(Notification::LastSerial { serial: Serial::from_raw(1) })
        );
    }

    #[test]
    fn rejects_failed_directives() {
        let mut world = World::default();

        assert!(rejected(apply(&mut world, Directive::Spawn { name: String::new() })));
        assert!(rejected(apply(&mut world, Directive::Inspect { serial: Serial::ZERO })));
        assert!(rejected(apply(&mut world, Directive::Inspect { serial: Serial::from_raw(3) })));
        assert!(rejected(apply(&mut world, Directive::Despawn { serial: Serial::from_raw(3) })));
    }

    #[test]
    fn close_has_no_reply() {
        let mut world = World::default();

        assert_eq!(apply(&mut world, Directive::CloseConnection), None);
    }
}
