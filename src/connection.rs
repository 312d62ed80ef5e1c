use crate::error::{Result, YncaError};
use crate::protocol::{self, Command, ProtocolEvent};
use crate::types::SubunitId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// TCP port receivers expose the YNCA protocol on.
pub const YNCA_PORT: u16 = 50000;

/// Minimum spacing between consecutive outbound commands. Receivers need
/// roughly 100 ms to process a command; sending faster loses replies.
pub const COMMAND_SPACING: Duration = Duration::from_millis(100);

/// Callback receiving every parsed inbound [`ProtocolEvent`].
///
/// Runs on the reader task, so it must not block.
pub type MessageCallback = Arc<dyn Fn(&ProtocolEvent) + Send + Sync>;

/// Handle for unregistering a previously registered message callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackId(u64);

/// Registered message callbacks, dispatched in registration order.
struct CallbackRegistry {
    callbacks: Mutex<Vec<(u64, MessageCallback)>>,
    next_id: AtomicU64,
}

impl CallbackRegistry {
    fn new() -> Self {
        Self {
            callbacks: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    fn register(&self, callback: MessageCallback) -> CallbackId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.callbacks.lock().unwrap().push((id, callback));
        CallbackId(id)
    }

    fn unregister(&self, id: CallbackId) {
        self.callbacks.lock().unwrap().retain(|(cb_id, _)| *cb_id != id.0);
    }

    fn dispatch(&self, event: &ProtocolEvent) {
        // Snapshot so a callback can register/unregister without deadlocking.
        let snapshot: Vec<MessageCallback> = self
            .callbacks
            .lock()
            .unwrap()
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        for callback in snapshot {
            callback(event);
        }
    }
}

/// Protocol session with a YNCA receiver.
///
/// Owns the transport through two background tasks: a writer that serializes
/// and paces outbound commands, and a reader that parses inbound lines and
/// fans the resulting events out to registered callbacks. `get` and `put`
/// enqueue a command and return immediately; replies arrive asynchronously
/// through the callbacks.
pub struct YncaConnection {
    cmd_tx: mpsc::UnboundedSender<Command>,
    num_commands_sent: AtomicU64,
    registry: Arc<CallbackRegistry>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl YncaConnection {
    /// Connect to a receiver over TCP. The standard port is [`YNCA_PORT`].
    pub async fn connect(host: &str, port: u16) -> Result<Arc<Self>> {
        tracing::info!("Connecting to {}:{}", host, port);
        let stream = TcpStream::connect((host, port)).await?;
        Ok(Self::from_stream(stream))
    }

    /// Run the session over an already-open duplex line channel, e.g. a
    /// serial bridge. The channel must carry raw YNCA lines.
    pub fn from_stream<S>(stream: S) -> Arc<Self>
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        Self::from_stream_with_spacing(stream, COMMAND_SPACING)
    }

    /// Like [`from_stream`](Self::from_stream) with a custom command
    /// spacing. Mainly useful for tests.
    pub fn from_stream_with_spacing<S>(stream: S, spacing: Duration) -> Arc<Self>
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        let (read_half, mut write_half) = tokio::io::split(stream);
        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<Command>();
        let registry = Arc::new(CallbackRegistry::new());
        // Address of the most recently transmitted command, used by the
        // reader to attribute bare status replies.
        let last_sent = Arc::new(Mutex::new(None::<(String, String)>));

        let writer_last_sent = last_sent.clone();
        let writer = tokio::spawn(async move {
            while let Some(command) = cmd_rx.recv().await {
                let line = command.encode();
                tracing::debug!("Sending: {}", line.trim_end());
                *writer_last_sent.lock().unwrap() = Some((
                    command.subunit.to_wire().to_string(),
                    command.function.clone(),
                ));
                if let Err(e) = write_half.write_all(line.as_bytes()).await {
                    tracing::error!("Failed to send command: {}", e);
                    break;
                }
                if let Err(e) = write_half.flush().await {
                    tracing::error!("Failed to flush command: {}", e);
                    break;
                }
                if !spacing.is_zero() {
                    tokio::time::sleep(spacing).await;
                }
            }
        });

        let reader_registry = registry.clone();
        let reader = tokio::spawn(async move {
            let mut lines = BufReader::new(read_half).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let line = line.trim_end_matches('\r');
                        if line.is_empty() {
                            continue;
                        }
                        tracing::debug!("Received: {}", line);
                        let last = last_sent.lock().unwrap().clone();
                        match protocol::parse_line(line, last.as_ref()) {
                            Some(event) => reader_registry.dispatch(&event),
                            None => tracing::debug!("Discarding unparseable line: {}", line),
                        }
                    }
                    Ok(None) => {
                        tracing::info!("Connection closed by device");
                        break;
                    }
                    Err(e) => {
                        tracing::error!("Read error: {}", e);
                        break;
                    }
                }
            }
        });

        Arc::new(Self {
            cmd_tx,
            num_commands_sent: AtomicU64::new(0),
            registry,
            tasks: Mutex::new(vec![writer, reader]),
        })
    }

    /// Request the current value of a function. Non-blocking; the reply
    /// arrives through the registered message callbacks.
    pub fn get(&self, subunit: SubunitId, function: &str) -> Result<()> {
        self.send(Command::get(subunit, function))
    }

    /// Set the value of a function. Non-blocking; state is only updated
    /// once the device reports the new value back.
    pub fn put(&self, subunit: SubunitId, function: &str, value: &str) -> Result<()> {
        self.send(Command::put(subunit, function, value))
    }

    fn send(&self, command: Command) -> Result<()> {
        self.cmd_tx
            .send(command)
            .map_err(|_| YncaError::ConnectionClosed)?;
        self.num_commands_sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Number of commands accepted for transmission since the connection
    /// was opened. Timeouts elsewhere are derived from deltas of this
    /// counter, one pacing slot per queued command.
    pub fn num_commands_sent(&self) -> u64 {
        self.num_commands_sent.load(Ordering::SeqCst)
    }

    /// Register a callback for every inbound protocol event. Callbacks are
    /// invoked on the reader task, in registration order.
    pub fn register_message_callback<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&ProtocolEvent) + Send + Sync + 'static,
    {
        self.registry.register(Arc::new(callback))
    }

    /// Remove a previously registered callback. Unknown ids are ignored.
    pub fn unregister_message_callback(&self, id: CallbackId) {
        self.registry.unregister(id);
    }

    /// Tear down the session. Subsequent `get`/`put` calls fail with
    /// [`YncaError::ConnectionClosed`]. Idempotent.
    pub fn close(&self) {
        for task in self.tasks.lock().unwrap().drain(..) {
            task.abort();
        }
    }
}

impl Drop for YncaConnection {
    fn drop(&mut self) {
        self.close();
    }
}
