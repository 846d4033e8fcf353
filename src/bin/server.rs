use log::{error, info};
use shard::{autosave, config::Config, World};
use tokio::{net::TcpListener, signal};

#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<()> {
    let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;

    tokio::select! {
        result = signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<()> {
    signal::ctrl_c().await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;

    let world = match &config.snapshot {
        Some(path) => World::load(path, config.allocator).await?,
        None => None,
    };
    let world = world.unwrap_or_else(|| World::new(config.allocator)).shared();

    let autosave = match (&config.snapshot, config.autosave.interval()) {
        (Some(path), Some(period)) => {
            info!("Autosaving every {}s", period.as_secs());
            Some(autosave::spawn(world.clone(), path.clone(), period))
        }
        _ => None,
    };

    let listener = TcpListener::bind(config.addr).await?;

    tokio::select! {
        _ = shard::serve(listener, world.clone()) => {}
        result = shutdown_signal() => {
            result?;
            info!("Shutting down");
        }
    }

    if let Some(handle) = autosave {
        handle.abort();
        let _ = handle.await;
    }

    if let Some(path) = &config.snapshot {
        if let Err(error) = autosave::save_shared(&world, path).await {
            error!("Couldn't save the world: {}", error);
            return Err(error.into());
        }
        info!("Saved the world to {}", path.display());
    }

    Ok(())
}
