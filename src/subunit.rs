use crate::connection::{CallbackId, YncaConnection};
use crate::error::{Result, YncaError};
use crate::function::{Access, FunctionDescriptor};
use crate::protocol::{ProtocolEvent, Status};
use crate::types::{SubunitId, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Lifecycle of a subunit instance.
///
/// Instances move `Uninitialized → Initializing → Ready` and never revert;
/// `close()` moves any state to `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubunitState {
    Uninitialized,
    Initializing,
    Ready,
    Closed,
}

/// Callback invoked with `(subunit, function, new_value)` after a
/// device-confirmed value has been stored.
///
/// Runs on the connection's reader task, so it must not block.
pub type UpdateCallback = Arc<dyn Fn(SubunitId, &str, &Value) + Send + Sync>;

/// Handle for unregistering an update callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateCallbackId(u64);

/// Decoder for function families that have no fixed descriptor, like the
/// numbered `SCENE<n>NAME` functions. Returns the decoded value when the
/// function is recognized.
pub(crate) type FallbackHandler = fn(function: &str, value: &str) -> Option<Value>;

/// Shared machinery behind every concrete subunit type.
///
/// Holds the static descriptor table, the per-instance value cache and the
/// update-callback list, and routes the connection's events for this
/// subunit id. Concrete subunits wrap this and add typed accessors.
pub(crate) struct SubunitCore {
    connection: Arc<YncaConnection>,
    shared: Arc<SubunitShared>,
    callback: Mutex<Option<CallbackId>>,
}

struct SubunitShared {
    id: SubunitId,
    functions: &'static [FunctionDescriptor],
    fallback: Option<FallbackHandler>,
    values: Mutex<BTreeMap<String, Value>>,
    state: Mutex<SubunitState>,
    update_callbacks: Mutex<Vec<(u64, UpdateCallback)>>,
    next_update_id: AtomicU64,
}

impl SubunitCore {
    /// Create the core and subscribe it to the connection's event stream.
    pub(crate) fn new(
        id: SubunitId,
        connection: Arc<YncaConnection>,
        functions: &'static [FunctionDescriptor],
        fallback: Option<FallbackHandler>,
    ) -> Self {
        let shared = Arc::new(SubunitShared {
            id,
            functions,
            fallback,
            values: Mutex::new(BTreeMap::new()),
            state: Mutex::new(SubunitState::Uninitialized),
            update_callbacks: Mutex::new(Vec::new()),
            next_update_id: AtomicU64::new(0),
        });

        let dispatch = shared.clone();
        let callback =
            connection.register_message_callback(move |event| dispatch.handle_event(event));

        Self {
            connection,
            shared,
            callback: Mutex::new(Some(callback)),
        }
    }

    pub(crate) fn id(&self) -> SubunitId {
        self.shared.id
    }

    pub(crate) fn state(&self) -> SubunitState {
        *self.shared.state.lock().unwrap()
    }

    /// Reset cached state and request the current value of every declared
    /// function, one GET per distinct init group. Returns once the requests
    /// have been issued; replies populate the cache through event dispatch.
    pub(crate) fn initialize(&self, extra_polls: &[&str]) -> Result<()> {
        *self.shared.state.lock().unwrap() = SubunitState::Initializing;
        self.shared.values.lock().unwrap().clear();

        let mut issued: Vec<&str> = Vec::new();
        for descriptor in self.shared.functions {
            let command = descriptor.init_command();
            if !issued.contains(&command) {
                issued.push(command);
                self.connection.get(self.shared.id, command)?;
            }
        }
        for extra in extra_polls {
            if !issued.contains(extra) {
                issued.push(extra);
                self.connection.get(self.shared.id, extra)?;
            }
        }

        *self.shared.state.lock().unwrap() = SubunitState::Ready;
        Ok(())
    }

    /// Last known value of a function, `None` if never received.
    pub(crate) fn value(&self, function: &str) -> Option<Value> {
        self.shared.values.lock().unwrap().get(function).cloned()
    }

    /// Snapshot of all cached values.
    pub(crate) fn snapshot(&self) -> BTreeMap<String, Value> {
        self.shared.values.lock().unwrap().clone()
    }

    /// Convert `value` and send a PUT for a declared writable function.
    pub(crate) fn put(&self, function: &str, value: &Value) -> Result<()> {
        let descriptor = self
            .shared
            .functions
            .iter()
            .find(|d| d.name == function)
            .ok_or_else(|| {
                YncaError::UnsupportedOperation(format!(
                    "{} has no function {}",
                    self.shared.id, function
                ))
            })?;
        if descriptor.access != Access::GetPut {
            return Err(YncaError::UnsupportedOperation(format!(
                "{}:{} is read-only",
                self.shared.id, function
            )));
        }
        let raw = descriptor.converter.to_wire(function, value)?;
        self.connection.put(self.shared.id, function, &raw)
    }

    /// Send a PUT with a preformatted wire value, for imperative functions
    /// like `PLAYBACK` or `SCENE` that have no cached attribute.
    pub(crate) fn put_raw(&self, function: &str, value: &str) -> Result<()> {
        self.connection.put(self.shared.id, function, value)
    }

    pub(crate) fn register_update_callback(&self, callback: UpdateCallback) -> UpdateCallbackId {
        let id = self.shared.next_update_id.fetch_add(1, Ordering::Relaxed);
        self.shared
            .update_callbacks
            .lock()
            .unwrap()
            .push((id, callback));
        UpdateCallbackId(id)
    }

    pub(crate) fn unregister_update_callback(&self, id: UpdateCallbackId) {
        self.shared
            .update_callbacks
            .lock()
            .unwrap()
            .retain(|(cb_id, _)| *cb_id != id.0);
    }

    /// Unsubscribe from the connection. Idempotent.
    pub(crate) fn close(&self) {
        if let Some(callback) = self.callback.lock().unwrap().take() {
            self.connection.unregister_message_callback(callback);
        }
        *self.shared.state.lock().unwrap() = SubunitState::Closed;
    }
}

impl Drop for SubunitCore {
    fn drop(&mut self) {
        self.close();
    }
}

impl SubunitShared {
    fn handle_event(&self, event: &ProtocolEvent) {
        if event.subunit != self.id.to_wire() {
            return;
        }

        match self.functions.iter().find(|d| d.name == event.function) {
            Some(descriptor) => {
                if event.status != Status::Ok {
                    tracing::debug!(
                        "{}:{} reported {}",
                        self.id,
                        event.function,
                        event.status
                    );
                    return;
                }
                match descriptor.converter.from_wire(descriptor.name, &event.value) {
                    Ok(value) => self.store(descriptor.name, value),
                    Err(e) => tracing::warn!("{}: dropping value: {}", self.id, e),
                }
            }
            None => {
                if event.status != Status::Ok {
                    return;
                }
                match self.fallback.and_then(|f| f(&event.function, &event.value)) {
                    Some(value) => self.store(&event.function, value),
                    None => {
                        tracing::debug!("{}: unhandled function {}", self.id, event.function);
                    }
                }
            }
        }
    }

    fn store(&self, function: &str, value: Value) {
        self.values
            .lock()
            .unwrap()
            .insert(function.to_string(), value.clone());

        // Snapshot so a callback can register/unregister without deadlocking.
        let callbacks: Vec<UpdateCallback> = self
            .update_callbacks
            .lock()
            .unwrap()
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        for callback in callbacks {
            callback(self.id, function, &value);
        }
    }
}
