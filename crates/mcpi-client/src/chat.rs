//! In-game chat

use mcpi_bridge::Connection;
use mcpi_bridge::protocol::{Command, parse_field, records};
use mcpi_core::{ChatMessage, Result};

/// Posts and polls chat messages
#[derive(Debug, Clone)]
pub struct Chat {
    connection: Connection,
}

impl Chat {
    pub(crate) fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// Post a message. Each line becomes its own `chat.post`, queued back to
    /// back so no other command lands between them.
    pub async fn send(&self, message: &str) -> Result<()> {
        let commands = message
            .split('\n')
            .map(|line| Command::new("chat.post").arg(line).render())
            .collect::<Result<Vec<_>>>()?;
        let posts: Vec<_> = commands
            .iter()
            .map(|command| self.connection.execute(command))
            .collect();

        for post in posts {
            post.await?;
        }
        Ok(())
    }

    /// Fetch new chat messages (RaspberryJuice servers only)
    pub async fn poll(&self) -> Result<Vec<ChatMessage>> {
        let reply = self
            .connection
            .request(&Command::new("events.chat.posts").to_string())
            .await?;
        records(&reply).map(parse_message).collect()
    }
}

/// `authorId,content`; the content may itself contain commas
fn parse_message(record: &str) -> Result<ChatMessage> {
    let (author, content) = record.split_once(',').unwrap_or((record, ""));
    Ok(ChatMessage {
        author_id: parse_field(author)?,
        content: content.to_string(),
    })
}
