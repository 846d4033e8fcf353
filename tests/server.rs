use futures_util::{SinkExt, StreamExt};
use shard::{Directive, Notification, Serial, World};
use std::collections::HashSet;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tungstenite::Message;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start(world: World) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(shard::serve(listener, world.shared()));

    format!("ws://{}", addr)
}

async fn connect(url: &str) -> Socket {
    connect_async(url).await.unwrap().0
}

async fn send_text(socket: &mut Socket, text: &str) -> Notification {
    socket.send(Message::Text(text.to_string())).await.unwrap();

    loop {
        match socket.next().await.unwrap().unwrap() {
            Message::Text(reply) => return serde_json::from_str(&reply).unwrap(),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected message {:?}", other),
        }
    }
}

async fn request(socket: &mut Socket, directive: &Directive) -> Notification {
    send_text(socket, &serde_json::to_string(directive).unwrap()).await
}

async fn spawn_serial(socket: &mut Socket, name: &str) -> Serial {
    match request(socket, &Directive::Spawn { name: name.into() }).await {
        Notification::Spawned { entity } => entity.serial,
        other => panic!("expected a spawn, got {:?}", other),
    }
}

#[tokio::test]
async fn spawns_inspects_and_despawns() {
    let url = start(World::default()).await;
    let mut socket = connect(&url).await;

    let serial = spawn_serial(&mut socket, "a candle").await;
    assert_eq!(serial, Serial::from_raw(1));

    match request(&mut socket, &Directive::Inspect { serial }).await {
        Notification::Entity { entity } => assert_eq!(entity.name, "a candle"),
        other => panic!("expected an entity, got {:?}", other),
    }

    assert!(matches!(
        request(&mut socket, &Directive::Despawn { serial }).await,
        Notification::Despawned { entity } if entity.serial == serial
    ));
    assert!(matches!(
        request(&mut socket, &Directive::Inspect { serial }).await,
        Notification::Rejected { .. }
    ));
    assert_eq!(
        request(&mut socket, &Directive::LastSerial).await,
        Notification::LastSerial { serial }
    );
}

#[tokio::test]
async fn rejects_garbage_and_keeps_listening() {
    let url = start(World::default()).await;
    let mut socket = connect(&url).await;

    assert!(matches!(
        send_text(&mut socket, "not a directive").await,
        Notification::Rejected { .. }
    ));
    assert_eq!(spawn_serial(&mut socket, "a stool").await, Serial::from_raw(1));
}

#[tokio::test]
async fn clients_share_one_allocator() {
    let url = start(World::default()).await;
    let mut first = connect(&url).await;
    let mut second = connect(&url).await;
    let mut seen = HashSet::new();

    for round in 0..10 {
        let a = spawn_serial(&mut first, &format!("a coin {}", round)).await;
        let b = spawn_serial(&mut second, &format!("a gem {}", round)).await;

        assert!(a < b);
        assert!(seen.insert(a));
        assert!(seen.insert(b));
    }

    assert_eq!(seen.len(), 20);
}

#[tokio::test]
async fn close_ends_the_session() {
    let url = start(World::default()).await;
    let mut socket = connect(&url).await;

    socket
        .send(Message::Text(
            serde_json::to_string(&Directive::CloseConnection).unwrap(),
        ))
        .await
        .unwrap();

    // The server drops the socket without replying.
    loop {
        match socket.next().await {
            None | Some(Err(_)) | Some(Ok(Message::Close(_))) => break,
            Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
            Some(Ok(other)) => panic!("unexpected reply {:?}", other),
        }
    }
}
