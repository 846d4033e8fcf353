use crate::{error::WorldError, store, world::SharedWorld};
use log::{debug, error};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AutosaveConfig {
    /// Zero turns autosave off.
    pub interval_seconds: u64,
}

impl AutosaveConfig {
    pub fn interval(self) -> Option<Duration> {
        if self.interval_seconds == 0 {
            None
        } else {
            Some(Duration::from_secs(self.interval_seconds))
        }
    }
}

/// Copies the world out under the lock and writes it after releasing it.
pub async fn save_shared(world: &SharedWorld, path: &Path) -> Result<usize, WorldError> {
    let snapshot = world.lock().await.snapshot();
    let count = snapshot.entities.len();

    store::save_snapshot(path, &snapshot).await?;
    Ok(count)
}

/// Saves the world every `period` until the task is aborted. The first save
/// happens one period after the start.
pub fn spawn(world: SharedWorld, path: PathBuf, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticks = interval_at(Instant::now() + period, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticks.tick().await;

            match save_shared(&world, &path).await {
                Ok(count) => debug!("Autosaved {} entities to {}", count, path.display()),
                Err(err) => error!("Autosave to {} failed: {}", path.display(), err),
            }
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{allocator::AllocatorConfig, World};

    #[test]
    fn zero_seconds_disables_autosave() {
        assert_eq!(AutosaveConfig { interval_seconds: 0 }.interval(), None);
        assert_eq!(AutosaveConfig::default().interval(), None);
        assert_eq!(
            AutosaveConfig { interval_seconds: 30 }.interval(),
            Some(Duration::from_secs(30))
        );
    }

    #[tokio::test]
    async fn tick_writes_latest_world() {
        let dir = std::env::temp_dir().join(format!("serial_autosave_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("world.json");

        let world = World::default().shared();
        let handle = spawn(world.clone(), path.clone(), Duration::from_millis(20));

        let serial = world.lock().await.spawn("a barrel").unwrap().serial;

        let mut loaded = None;
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(20)).await;

            if let Ok(Some(found)) = World::load(&path, AllocatorConfig::default()).await {
                if found.get(serial).is_some() {
                    loaded = Some(found);
                    break;
                }
            }
        }
        handle.abort();

        let loaded = loaded.expect("autosave never wrote the spawned entity");
        assert_eq!(loaded.last_serial(), serial);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
