//! Connection session
//!
//! Turns a raw byte stream into a strictly sequential request/response
//! channel. The protocol has no correlation ids, so at most one request is
//! ever in flight: the rest wait in a FIFO queue owned by a background task.
//!
//! The task multiplexes five event sources with `tokio::select!`:
//! - commands from [`Connection`] handles (send, reconnect, destroy)
//! - completion of a connect attempt
//! - completion of the head request's write
//! - bytes arriving from the transport
//! - the response timer of the in-flight request
//!
//! A write that cannot complete never blocks the loop: it is bounded by the
//! response timeout, and reconnect or destroy drop it.
//!
//! Data and timer race to settle the in-flight request. Whichever is handled
//! first clears `in_flight_since`, which disables the timer branch and turns
//! any later line into an unsolicited one.

use crate::protocol::{FAIL_SENTINEL, LineBuffer, Reply, encode_frame, validate_command};
use crate::tcp::TcpConnector;
use crate::transport::{AsyncReader, AsyncWriter, Connector, Transport};
use mcpi_core::{CallSite, McpiError, Result};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 4711;
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Capacity of the lifecycle event channel
const EVENT_CAPACITY: usize = 16;

/// Configuration for a connection
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Game host (default: localhost)
    pub host: String,
    /// API port (default: 4711)
    pub port: u16,
    /// How long to wait for a reply before giving up.
    /// Longer is slower for fire-and-forget commands but less likely to error.
    pub response_timeout: Duration,
    /// Reject queued requests when the transport fails instead of keeping
    /// them for the next `reconnect()`
    pub fail_pending_on_error: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
            fail_pending_on_error: true,
        }
    }
}

impl ConnectionConfig {
    /// Create config for a specific game address
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    pub fn with_fail_pending_on_error(mut self, fail: bool) -> Self {
        self.fail_pending_on_error = fail;
        self
    }

    /// Defaults overridden by `MCPI_HOST`, `MCPI_PORT` and
    /// `MCPI_RESPONSE_TIMEOUT_MS`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("MCPI_HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("MCPI_PORT") {
            match port.parse() {
                Ok(port) => config.port = port,
                Err(_) => warn!("Ignoring invalid MCPI_PORT: {}", port),
            }
        }
        if let Ok(timeout) = std::env::var("MCPI_RESPONSE_TIMEOUT_MS") {
            match timeout.parse() {
                Ok(ms) => config.response_timeout = Duration::from_millis(ms),
                Err(_) => warn!("Ignoring invalid MCPI_RESPONSE_TIMEOUT_MS: {}", timeout),
            }
        }

        config
    }
}

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the transport to open
    Connecting,
    /// Transport open; requests are being served
    Ready,
    /// Transport failed; waiting for `reconnect()`
    Errored,
    /// Closed for good
    Destroyed,
}

/// Session-wide lifecycle signals.
///
/// Each event is broadcast after the state it reports has been published,
/// so `Connection::state()` already reflects it when the event is received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Ready,
    Error(String),
}

/// Handle to a connection session.
///
/// Cheap to clone; all clones feed the same queue. The session task stops
/// once `destroy()` is called or every handle has been dropped.
#[derive(Clone)]
pub struct Connection {
    command_tx: mpsc::UnboundedSender<SessionCommand>,
    state_rx: watch::Receiver<SessionState>,
    error_rx: watch::Receiver<Option<String>>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl Connection {
    /// Open a TCP session to the game. Must be called inside a tokio runtime.
    pub fn open(config: ConnectionConfig) -> Self {
        let connector = TcpConnector::new(config.host.clone(), config.port);
        Self::with_connector(Arc::new(connector), config)
    }

    /// Open a session over any transport; `config.host`/`config.port` are
    /// not used.
    pub fn with_connector(connector: Arc<dyn Connector>, config: ConnectionConfig) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SessionState::Connecting);
        let (error_tx, error_rx) = watch::channel(None);
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);

        let session = Session::new(connector, &config, state_tx, error_tx, event_tx.clone());
        tokio::spawn(session.run(command_rx));

        Self {
            command_tx,
            state_rx,
            error_rx,
            event_tx,
        }
    }

    /// Queue a command and wait for it to settle.
    ///
    /// The request is queued when this is called, not when the returned
    /// future is first polled, so calls are served in call order.
    /// Resolves to `Some(reply)` when `expects_response`, `None` otherwise.
    #[track_caller]
    pub fn send(
        &self,
        command: &str,
        expects_response: bool,
    ) -> impl Future<Output = Result<Option<String>>> + Send + use<> {
        let origin = CallSite::caller();
        let (response_tx, response_rx) = oneshot::channel();

        let queued = match validate_command(command) {
            Ok(()) => self
                .command_tx
                .send(SessionCommand::Send(Request {
                    command: command.to_string(),
                    expects_response,
                    origin,
                    response_tx,
                }))
                .map_err(|_| McpiError::Destroyed),
            Err(e) => Err(e),
        };

        async move {
            queued?;
            response_rx.await.map_err(|_| McpiError::Destroyed)?
        }
    }

    /// Queue a command whose reply payload is needed
    #[track_caller]
    pub fn request(&self, command: &str) -> impl Future<Output = Result<String>> + Send + use<> {
        let reply = self.send(command, true);
        async move {
            reply
                .await?
                .ok_or_else(|| McpiError::InvalidResponse("reply carried no payload".into()))
        }
    }

    /// Queue a fire-and-forget command
    #[track_caller]
    pub fn execute(&self, command: &str) -> impl Future<Output = Result<()>> + Send + use<> {
        let reply = self.send(command, false);
        async move { reply.await.map(|_| ()) }
    }

    /// Drop the current transport and open a new one, keeping the queue
    pub fn reconnect(&self) {
        // Already destroyed if the task is gone
        let _ = self.command_tx.send(SessionCommand::Reconnect);
    }

    /// Close the session for good
    pub fn destroy(&self) {
        let _ = self.command_tx.send(SessionCommand::Destroy);
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        *self.state_rx.borrow()
    }

    /// Reason of the most recent transport failure, if any
    pub fn last_error(&self) -> Option<String> {
        self.error_rx.borrow().clone()
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    /// Wait until the session leaves `Connecting`; fails unless it became `Ready`
    pub async fn ready(&self) -> Result<()> {
        let mut state_rx = self.state_rx.clone();
        let state = *state_rx
            .wait_for(|state| *state != SessionState::Connecting)
            .await
            .map_err(|_| McpiError::Destroyed)?;

        match state {
            SessionState::Ready => Ok(()),
            SessionState::Errored => Err(McpiError::Connection(
                self.last_error().unwrap_or_else(|| "connection failed".into()),
            )),
            _ => Err(McpiError::Destroyed),
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("state", &self.state())
            .finish()
    }
}

/// Commands from handles to the session task
enum SessionCommand {
    Send(Request),
    Reconnect,
    Destroy,
}

/// A queued command and the slot its result settles into
struct Request {
    command: String,
    expects_response: bool,
    origin: CallSite,
    response_tx: oneshot::Sender<Result<Option<String>>>,
}

impl Request {
    /// Consumes the request, so a result can only be delivered once
    fn settle(self, outcome: Result<Option<String>>) {
        // Caller may have stopped waiting
        let _ = self.response_tx.send(outcome);
    }
}

type ConnectFuture = Pin<Box<dyn Future<Output = Result<Transport>> + Send>>;

/// A frame being written; hands the writer back when done
type WriteFuture = Pin<Box<dyn Future<Output = (Box<dyn AsyncWriter>, Result<()>)> + Send>>;

/// What woke the session task up
enum Wakeup {
    Command(Option<SessionCommand>),
    Connected(Result<Transport>),
    Written(Box<dyn AsyncWriter>, Result<()>),
    Received(Result<Vec<u8>>),
    TimedOut,
}

struct Session {
    connector: Arc<dyn Connector>,
    response_timeout: Duration,
    fail_pending_on_error: bool,
    state_tx: watch::Sender<SessionState>,
    /// Reason of the last transport failure
    error_tx: watch::Sender<Option<String>>,
    event_tx: broadcast::Sender<SessionEvent>,
    /// Pending requests; the head is in flight while `in_flight_since` is set
    queue: VecDeque<Request>,
    /// When the head request was written
    in_flight_since: Option<Instant>,
    line: LineBuffer,
    connecting: Option<ConnectFuture>,
    /// Head request being written; holds the writer meanwhile
    writing: Option<WriteFuture>,
    reader: Option<Box<dyn AsyncReader>>,
    writer: Option<Box<dyn AsyncWriter>>,
}

impl Session {
    fn new(
        connector: Arc<dyn Connector>,
        config: &ConnectionConfig,
        state_tx: watch::Sender<SessionState>,
        error_tx: watch::Sender<Option<String>>,
        event_tx: broadcast::Sender<SessionEvent>,
    ) -> Self {
        Self {
            connector,
            response_timeout: config.response_timeout,
            fail_pending_on_error: config.fail_pending_on_error,
            state_tx,
            error_tx,
            event_tx,
            queue: VecDeque::new(),
            in_flight_since: None,
            line: LineBuffer::new(),
            connecting: None,
            writing: None,
            reader: None,
            writer: None,
        }
    }

    async fn run(mut self, mut command_rx: mpsc::UnboundedReceiver<SessionCommand>) {
        self.start_connect();

        loop {
            let deadline = self
                .in_flight_since
                .map(|sent_at| sent_at + self.response_timeout);

            // A finished write is seen before the reply it provoked
            let wakeup = tokio::select! {
                biased;
                command = command_rx.recv() => Wakeup::Command(command),
                result = next_connect(&mut self.connecting), if self.connecting.is_some() => {
                    Wakeup::Connected(result)
                }
                (writer, written) = next_write(&mut self.writing), if self.writing.is_some() => {
                    Wakeup::Written(writer, written)
                }
                chunk = next_chunk(&mut self.reader), if self.reader.is_some() => {
                    Wakeup::Received(chunk)
                }
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    Wakeup::TimedOut
                }
            };

            match wakeup {
                Wakeup::Command(Some(SessionCommand::Send(request))) => self.enqueue(request),
                Wakeup::Command(Some(SessionCommand::Reconnect)) => self.reconnect(),
                Wakeup::Command(Some(SessionCommand::Destroy)) => {
                    self.destroy();
                    break;
                }
                Wakeup::Command(None) => {
                    debug!("All connection handles dropped, session exiting");
                    self.destroy();
                    break;
                }
                Wakeup::Connected(Ok((reader, writer))) => {
                    self.connecting = None;
                    self.reader = Some(reader);
                    self.writer = Some(writer);
                    self.set_state(SessionState::Ready);
                    info!("Connected to {}", self.connector.describe());
                    // No subscribers is fine
                    let _ = self.event_tx.send(SessionEvent::Ready);
                    self.pump();
                }
                Wakeup::Connected(Err(e)) => {
                    self.connecting = None;
                    self.fail(e);
                }
                Wakeup::Written(writer, Ok(())) => {
                    self.writing = None;
                    self.writer = Some(writer);
                    // The timeout budget starts now, not at enqueue time
                    self.in_flight_since = Some(Instant::now());
                }
                Wakeup::Written(_, Err(e)) => {
                    self.writing = None;
                    self.fail(e);
                }
                Wakeup::Received(Ok(chunk)) if chunk.is_empty() => {
                    self.fail(McpiError::Connection("connection closed by the game".into()));
                }
                Wakeup::Received(Ok(chunk)) => self.on_data(&chunk),
                Wakeup::Received(Err(e)) => self.fail(e),
                Wakeup::TimedOut => self.on_timeout(),
            }
        }
    }

    fn state(&self) -> SessionState {
        *self.state_tx.borrow()
    }

    fn set_state(&self, state: SessionState) {
        self.state_tx.send_replace(state);
    }

    fn start_connect(&mut self) {
        let connector = Arc::clone(&self.connector);
        info!("Connecting to {}", connector.describe());
        self.connecting = Some(Box::pin(async move { connector.connect().await }));
    }

    fn enqueue(&mut self, request: Request) {
        if self.fail_pending_on_error && self.state() == SessionState::Errored {
            let err = McpiError::Disconnected {
                request: request.command.clone(),
                reason: self.error_tx.borrow().clone().unwrap_or_default(),
                origin: request.origin,
            };
            request.settle(Err(err));
            return;
        }

        debug!(pending = self.queue.len(), "Queued: {}", preview(&request.command));
        self.queue.push_back(request);
        self.pump();
    }

    /// Start writing the head request if nothing is in flight and the
    /// transport is up
    fn pump(&mut self) {
        if self.in_flight_since.is_some() || self.writing.is_some() {
            return;
        }
        let Some(request) = self.queue.front() else {
            return;
        };
        if self.state() != SessionState::Ready {
            // Re-run by the ready transition
            debug!(pending = self.queue.len(), "Session not ready, deferring");
            return;
        }
        let Some(mut writer) = self.writer.take() else {
            return;
        };

        debug!("[Rust→Game] {}", preview(&request.command));
        let frame = encode_frame(&request.command);
        let limit = self.response_timeout;
        self.writing = Some(Box::pin(async move {
            let written = match tokio::time::timeout(limit, writer.write_frame(&frame)).await {
                Ok(result) => result,
                Err(_) => Err(McpiError::Connection(format!(
                    "write stalled for {}ms",
                    limit.as_millis()
                ))),
            };
            (writer, written)
        }));
    }

    fn on_data(&mut self, chunk: &[u8]) {
        let chunk_preview: String = String::from_utf8_lossy(chunk).chars().take(100).collect();
        debug!("[Game→Rust] len={} data={:?}", chunk.len(), chunk_preview);

        self.line.push(chunk);
        while let Some(line) = self.line.next_line() {
            if self.in_flight_since.is_none() {
                warn!("Discarding unsolicited reply: {}", preview(&line));
                continue;
            }
            self.complete(line);
            self.pump();
        }

        if let Err(e) = self.line.check_len() {
            self.fail(e);
        }
    }

    /// Settle the in-flight request with a reply line
    fn complete(&mut self, line: String) {
        self.in_flight_since = None;
        let Some(request) = self.queue.pop_front() else {
            return;
        };

        let outcome = match Reply::classify(line) {
            Reply::Fail => {
                debug!("Command failed: {}", preview(&request.command));
                Err(McpiError::Command {
                    request: request.command.clone(),
                    response: FAIL_SENTINEL.to_string(),
                    origin: request.origin,
                })
            }
            Reply::Payload(payload) => Ok(request.expects_response.then_some(payload)),
        };
        request.settle(outcome);
    }

    /// Settle the in-flight request because its timer fired
    fn on_timeout(&mut self) {
        self.in_flight_since = None;

        if let Some(request) = self.queue.pop_front() {
            let outcome = if request.expects_response {
                warn!("No response for {}", preview(&request.command));
                Err(McpiError::NoResponse {
                    request: request.command.clone(),
                    origin: request.origin,
                })
            } else {
                // Silence within the window counts as success
                Ok(None)
            };
            request.settle(outcome);
        }

        self.pump();
    }

    fn reconnect(&mut self) {
        if self.state() == SessionState::Destroyed {
            return;
        }
        info!(pending = self.queue.len(), "Reconnecting");

        self.drop_transport();
        // The interrupted request stays at the head and is re-sent once ready
        self.in_flight_since = None;
        self.set_state(SessionState::Connecting);
        self.start_connect();
    }

    fn destroy(&mut self) {
        info!(pending = self.queue.len(), "Connection destroyed");

        self.set_state(SessionState::Destroyed);
        self.drop_transport();
        self.in_flight_since = None;
        for request in self.queue.drain(..) {
            request.settle(Err(McpiError::Destroyed));
        }
    }

    /// Transport-level failure: needs an explicit `reconnect()` to recover
    fn fail(&mut self, err: McpiError) {
        let reason = match err {
            McpiError::Connection(reason) => reason,
            other => other.to_string(),
        };
        warn!("Connection error: {}", reason);

        self.drop_transport();
        self.in_flight_since = None;
        // Published before the state so `ready()` can report it
        self.error_tx.send_replace(Some(reason.clone()));
        self.set_state(SessionState::Errored);
        let _ = self.event_tx.send(SessionEvent::Error(reason.clone()));

        if self.fail_pending_on_error {
            for request in self.queue.drain(..) {
                let err = McpiError::Disconnected {
                    request: request.command.clone(),
                    reason: reason.clone(),
                    origin: request.origin,
                };
                request.settle(Err(err));
            }
        }
    }

    fn drop_transport(&mut self) {
        self.connecting = None;
        self.writing = None;
        self.reader = None;
        self.writer = None;
        self.line.clear();
    }
}

async fn next_connect(connecting: &mut Option<ConnectFuture>) -> Result<Transport> {
    match connecting {
        Some(connect) => connect.await,
        None => std::future::pending().await,
    }
}

async fn next_write(writing: &mut Option<WriteFuture>) -> (Box<dyn AsyncWriter>, Result<()>) {
    match writing {
        Some(write) => write.await,
        None => std::future::pending().await,
    }
}

async fn next_chunk(reader: &mut Option<Box<dyn AsyncReader>>) -> Result<Vec<u8>> {
    match reader {
        Some(reader) => reader.read_chunk().await,
        None => std::future::pending().await,
    }
}

fn preview(text: &str) -> String {
    text.chars().take(100).collect()
}
