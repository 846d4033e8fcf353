use crate::{client::Client, session::Session, world::SharedWorld};
use log::{debug, info, warn};
use tokio::net::{TcpListener, TcpStream};
use tungstenite::Error as TungsteniteError;

async fn handle_new_connection(tcp_stream: TcpStream, world: SharedWorld) -> Result<(), TungsteniteError> {
    let socket = tokio_tungstenite::accept_async(tcp_stream).await?;
    Session::spawn(Client::new(socket), world);
    Ok(())
}

/// Accepts connections until the listener fails. Each one gets its own
/// session task that shares `world`.
pub async fn serve(listener: TcpListener, world: SharedWorld) {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on {}", addr);
    }

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(error) => {
                warn!("Stopped accepting connections: {}", error);
                break;
            }
        };

        debug!("Connection from {}", peer);
        let world = world.clone();

        tokio::spawn(async move {
            if let Err(error) = handle_new_connection(stream, world).await {
                warn!("Handshake with {} failed: {}", peer, error);
            }
        });
    }
}
