//! Integration tests for mcpi-client.
//!
//! These run the client over real TCP against a small fake game server.

use mcpi_client::{BlockType, ConnectionConfig, EntityApi, McpiError, SessionState, Vec3, World};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// Fake game: answers queries, records every line it receives
struct FakeGame {
    port: u16,
    received: Arc<Mutex<Vec<String>>>,
}

impl FakeGame {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let received = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&received);
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let log = Arc::clone(&log);
                tokio::spawn(async move {
                    let (read_half, mut write_half) = socket.into_split();
                    let mut lines = BufReader::new(read_half).lines();
                    while let Ok(Some(line)) = lines.next_line().await {
                        let reply = respond(&line);
                        log.lock().unwrap().push(line);
                        if let Some(reply) = reply {
                            if write_half.write_all(reply.as_bytes()).await.is_err() {
                                break;
                            }
                        }
                    }
                });
            }
        });

        Self { port, received }
    }

    fn world(&self) -> World {
        let config = ConnectionConfig::new("127.0.0.1", self.port)
            .with_response_timeout(Duration::from_millis(100));
        World::connect(config)
    }

    fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

/// Replies of a flat, empty world with two players
fn respond(line: &str) -> Option<String> {
    let reply = match line {
        "world.getPlayerIds()" => "1|2",
        "entity.getPos(2)" => "10.5,4,-3.5",
        "player.getPos()" => "0.5,4,0.5",
        "events.block.hits()" => "",
        "events.chat.posts()" => "2,hello, world",
        l if l.starts_with("world.getHeight(") => "3",
        l if l.starts_with("world.getBlockWithData(") => "0,0",
        l if l.starts_with("entity.getPos(") => "Fail",
        // Fire-and-forget commands get no reply
        _ => return None,
    };
    Some(format!("{}\n", reply))
}

#[tokio::test]
async fn test_queries_over_tcp() {
    let game = FakeGame::start().await;
    let world = game.world();
    world.ready().await.unwrap();

    assert_eq!(world.blocks.fetch_height(0, 0).await.unwrap(), 3);

    let players = world.players().await.unwrap();
    assert_eq!(players.len(), 2);
    assert_eq!(
        players[1].fetch_position().await.unwrap(),
        Vec3::new(10.5, 4.0, -3.5)
    );

    let block = world.blocks.fetch([5, 10, 5]).await.unwrap();
    assert_eq!(block.block_type, BlockType::AIR);

    assert!(world.blocks.poll_hits().await.unwrap().is_empty());

    let messages = world.chat.poll().await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "hello, world");

    world.close();
}

#[tokio::test]
async fn test_fire_and_forget_order() {
    let game = FakeGame::start().await;
    let world = game.world();

    world
        .blocks
        .set([0, 4, 0], BlockType::GOLD_BLOCK, None)
        .await
        .unwrap();
    world.chat.send("line one\nline two").await.unwrap();
    world.me.set_tile(Vec3::new(0.0, 5.0, 0.0)).await.unwrap();
    world.checkpoint.create().await.unwrap();

    assert_eq!(
        game.received(),
        vec![
            "world.setBlock(0,4,0,41)",
            "chat.post(line one)",
            "chat.post(line two)",
            "player.setTile(0,5,0)",
            "world.checkpoint.save()",
        ]
    );
    world.close();
}

#[tokio::test]
async fn test_concurrent_callers_are_serialized() {
    let game = FakeGame::start().await;
    let world = game.world();

    let (height, position) = tokio::join!(
        world.blocks.fetch_height(1, 1),
        world.me.fetch_position()
    );
    assert_eq!(height.unwrap(), 3);
    assert_eq!(position.unwrap(), Vec3::new(0.5, 4.0, 0.5));
    world.close();
}

#[tokio::test]
async fn test_fail_reply_and_timeout() {
    let game = FakeGame::start().await;
    let world = game.world();

    let result = world.entity(99).fetch_position().await;
    assert!(matches!(result, Err(McpiError::Command { .. })));

    // The fake game never answers this query
    let result = world.connection().request("player.getTile()").await;
    assert!(matches!(result, Err(McpiError::NoResponse { .. })));

    // The session is still usable afterwards
    assert_eq!(world.blocks.fetch_height(2, 2).await.unwrap(), 3);
    world.close();
}

#[tokio::test]
async fn test_connection_refused() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };

    let world = World::connect(ConnectionConfig::new("127.0.0.1", port));
    assert!(world.ready().await.is_err());
    assert_eq!(world.connection().state(), SessionState::Errored);

    let result = world.blocks.fetch_height(0, 0).await;
    assert!(matches!(result, Err(McpiError::Disconnected { .. })));
}
