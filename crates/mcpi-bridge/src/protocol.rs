//! Wire protocol for the Pi Edition API
//!
//! Requests are single lines of the form `name(arg1,arg2,...)`.
//! Replies are single lines: either the literal `Fail`, or a payload using
//! `,` between fields of a record and `|` between records.
//! Both directions are terminated by `\n`.

use mcpi_core::{McpiError, Result, Vec3};
use std::fmt;
use std::str::FromStr;

/// Frame terminator for both directions
pub const TERMINATOR: u8 = b'\n';

/// Reply sent by the game when a command fails
pub const FAIL_SENTINEL: &str = "Fail";

/// Longest partial line accepted before the peer is considered broken (1 MiB)
pub const MAX_LINE_LEN: usize = 1024 * 1024;

/// A command invocation, rendered as `name(arg,...)`
///
/// ```
/// use mcpi_bridge::protocol::Command;
/// let cmd = Command::new("world.setBlock").arg(0).arg(64).arg(0).arg(1).opt_arg(None::<u8>);
/// assert_eq!(cmd.to_string(), "world.setBlock(0,64,0,1)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: &'static str,
    args: Vec<String>,
}

impl Command {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            args: Vec::new(),
        }
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl fmt::Display) -> Self {
        self.args.push(value.to_string());
        self
    }

    /// Append a trailing optional argument; `None` omits it
    pub fn opt_arg<T: fmt::Display>(self, value: Option<T>) -> Self {
        match value {
            Some(value) => self.arg(value),
            None => self,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Render the command text, rejecting arguments that would break framing
    pub fn render(&self) -> Result<String> {
        let text = self.to_string();
        validate_command(&text)?;
        Ok(text)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.args.join(","))
    }
}

/// Check that a command fits in exactly one frame
pub fn validate_command(command: &str) -> Result<()> {
    if command.bytes().any(|b| b == TERMINATOR) {
        return Err(McpiError::InvalidArgument(format!(
            "command contains a line break: {:?}",
            command
        )));
    }
    Ok(())
}

/// Serialize a command into a request frame
pub fn encode_frame(command: &str) -> Vec<u8> {
    let mut frame = Vec::with_capacity(command.len() + 1);
    frame.extend_from_slice(command.as_bytes());
    frame.push(TERMINATOR);
    frame
}

/// Accumulates received bytes and splits them into lines
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append received bytes
    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Extract the next complete line, without its terminator.
    ///
    /// Bytes after the terminator stay buffered as the start of the next line.
    pub fn next_line(&mut self) -> Option<String> {
        let end = self.buf.iter().position(|&b| b == TERMINATOR)?;
        let rest = self.buf.split_off(end + 1);
        let mut line = std::mem::replace(&mut self.buf, rest);
        line.truncate(end);
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    /// Fail if the partial line has grown past [`MAX_LINE_LEN`]
    pub fn check_len(&self) -> Result<()> {
        if self.buf.len() > MAX_LINE_LEN {
            return Err(McpiError::Protocol(format!(
                "reply exceeds {} bytes without a line break",
                MAX_LINE_LEN
            )));
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

/// A classified reply line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The game rejected the command
    Fail,
    /// Anything else, including an empty acknowledgment
    Payload(String),
}

impl Reply {
    /// Only an exact match of the sentinel counts as failure
    pub fn classify(line: String) -> Self {
        if line == FAIL_SENTINEL {
            Reply::Fail
        } else {
            Reply::Payload(line)
        }
    }
}

/// Split a payload into `|`-separated records; an empty payload has none
pub fn records(payload: &str) -> impl Iterator<Item = &str> {
    payload.split('|').filter(|record| !record.is_empty())
}

/// Split a record into its `,`-separated fields
pub fn fields(record: &str) -> Vec<&str> {
    record.split(',').collect()
}

/// Parse one field, naming the offending text on failure
pub fn parse_field<T: FromStr>(field: &str) -> Result<T> {
    field
        .trim()
        .parse()
        .map_err(|_| McpiError::InvalidResponse(format!("unexpected field `{}`", field)))
}

/// Parse an `x,y,z` payload
pub fn parse_vec3(payload: &str) -> Result<Vec3> {
    payload.trim().parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_rendering() {
        assert_eq!(Command::new("world.checkpoint.save").to_string(), "world.checkpoint.save()");
        assert_eq!(
            Command::new("camera.mode.setFollow").opt_arg(Some(7)).to_string(),
            "camera.mode.setFollow(7)"
        );
        assert_eq!(
            Command::new("camera.setPos").arg(Vec3::new(1.5, 2.0, -3.0)).to_string(),
            "camera.setPos(1.5,2,-3)"
        );
    }

    #[test]
    fn test_command_rejects_line_breaks() {
        let cmd = Command::new("chat.post").arg("hello\nworld.setBlock(0,0,0,46)");
        assert!(matches!(cmd.render(), Err(McpiError::InvalidArgument(_))));
        assert!(validate_command("chat.post(hi)").is_ok());
    }

    #[test]
    fn test_encode_frame() {
        assert_eq!(encode_frame("world.getHeight(0,0)"), b"world.getHeight(0,0)\n".to_vec());
    }

    #[test]
    fn test_fragmented_line_reassembles() {
        let mut whole = LineBuffer::new();
        whole.push(b"1,2,3|4,5,6\n");

        let mut pieces = LineBuffer::new();
        pieces.push(b"1,2");
        assert_eq!(pieces.next_line(), None);
        pieces.push(b",3|4,");
        assert_eq!(pieces.next_line(), None);
        pieces.push(b"5,6\n");

        assert_eq!(pieces.next_line(), whole.next_line());
        assert!(pieces.is_empty());
    }

    #[test]
    fn test_bytes_after_terminator_are_kept() {
        let mut buf = LineBuffer::new();
        buf.push(b"64\n12");
        assert_eq!(buf.next_line().as_deref(), Some("64"));
        assert_eq!(buf.len(), 2);
        buf.push(b"8\n");
        assert_eq!(buf.next_line().as_deref(), Some("128"));
        assert_eq!(buf.next_line(), None);
    }

    #[test]
    fn test_empty_line_is_a_frame() {
        let mut buf = LineBuffer::new();
        buf.push(b"\n");
        assert_eq!(buf.next_line().as_deref(), Some(""));
    }

    #[test]
    fn test_oversized_partial_line() {
        let mut buf = LineBuffer::new();
        buf.push(&vec![b'a'; MAX_LINE_LEN + 1]);
        assert!(matches!(buf.check_len(), Err(McpiError::Protocol(_))));
        buf.clear();
        assert!(buf.check_len().is_ok());
    }

    #[test]
    fn test_sentinel_is_exact() {
        assert_eq!(Reply::classify("Fail".into()), Reply::Fail);
        assert_eq!(Reply::classify("Failed".into()), Reply::Payload("Failed".into()));
        assert_eq!(Reply::classify("1,Fail".into()), Reply::Payload("1,Fail".into()));
        assert_eq!(Reply::classify("fail".into()), Reply::Payload("fail".into()));
    }

    #[test]
    fn test_record_and_field_parsing() {
        let payload = "1,2,3,1,42|4,5,6,0,42";
        let parsed: Vec<Vec<&str>> = records(payload).map(fields).collect();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1], vec!["4", "5", "6", "0", "42"]);
        assert_eq!(records("").count(), 0);

        assert_eq!(parse_field::<i32>(" 64").unwrap(), 64);
        assert!(matches!(parse_field::<i32>("x"), Err(McpiError::InvalidResponse(_))));
        assert_eq!(parse_vec3("1,2,3").unwrap(), Vec3::new(1.0, 2.0, 3.0));
    }
}
