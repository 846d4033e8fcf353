use crate::{Directive, Notification};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::WebSocketStream;
use tungstenite::{Error as TungsteniteError, Message};

pub type ListenResult = Result<Directive, ListenError>;

pub struct Client {
    socket: WebSocketStream<TcpStream>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListenError {
    #[error("socket stream is exhausted")]
    SocketExhausted,
    #[error("could not read a message: {0}")]
    InvalidMessage(#[from] TungsteniteError),
    #[error("message is not a text frame")]
    UnknownMessage,
    #[error("text is not a directive: {0}")]
    InvalidDirective(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("could not encode notification: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("could not send notification: {0}")]
    Send(#[from] TungsteniteError),
}

impl Client {
    pub fn new(socket: WebSocketStream<TcpStream>) -> Self {
        Self { socket }
    }

    /// Waits for the next directive. Pings and pongs are answered by the
    /// socket itself and skipped here.
    pub async fn listen(&mut self) -> ListenResult {
        loop {
            let message = self
                .socket
                .next()
                .await
                .ok_or(ListenError::SocketExhausted)??;

            return match message {
                Message::Text(ref text) => Ok(serde_json::from_str(text)?),
                Message::Close(_) => Ok(Directive::CloseConnection),
                Message::Ping(_) | Message::Pong(_) => continue,
                _ => Err(ListenError::UnknownMessage),
            };
        }
    }

    pub async fn notify(&mut self, n: &Notification) -> Result<(), NotifyError> {
        let json = serde_json::to_string(n)?;

        self.socket.send(Message::Text(json)).await?;
        Ok(())
    }
}
