use crate::connection::YncaConnection;
use crate::error::{Result, YncaError};
use crate::mediaplayback::MediaPlayback;
use crate::protocol::Status;
use crate::system::System;
use crate::tuner::Tuner;
use crate::types::SubunitId;
use crate::zone::Zone;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::timeout;

/// Margin allowed per queued command while waiting for the availability
/// scan to finish. Slightly above the command spacing so every probe gets
/// a full round trip.
pub const PER_COMMAND_MARGIN: Duration = Duration::from_millis(120);

/// Controller for one receiver.
///
/// Connects, discovers which subunits the device actually has, and exposes
/// one typed interface per discovered subunit. The protocol offers no "list
/// subunits" command, so discovery probes every candidate id with `AVAIL`
/// and uses a `SYS VERSION` reply as end-of-scan marker (every device
/// supports VERSION unconditionally).
///
/// # Example
///
/// ```no_run
/// use ynca::{Receiver, YNCA_PORT};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut receiver = Receiver::connect("192.168.1.100", YNCA_PORT).await?;
///     receiver.initialize().await?;
///
///     if let Some(main) = receiver.main() {
///         main.set_volume(-35.0)?;
///     }
///     Ok(())
/// }
/// ```
pub struct Receiver {
    connection: Arc<YncaConnection>,
    catalog: Vec<SubunitId>,
    per_command_margin: Duration,
    available: BTreeMap<SubunitId, bool>,
    system: Option<Arc<System>>,
    zones: BTreeMap<SubunitId, Arc<Zone>>,
    players: BTreeMap<SubunitId, Arc<MediaPlayback>>,
    tuner: Option<Arc<Tuner>>,
}

impl Receiver {
    /// Connect to a receiver over TCP. Call
    /// [`initialize`](Self::initialize) next; it takes a few seconds.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let connection = YncaConnection::connect(host, port).await?;
        Ok(Self::from_connection(connection))
    }

    /// Build a receiver on an existing session, e.g. one opened over a
    /// serial bridge with [`YncaConnection::from_stream`].
    pub fn from_connection(connection: Arc<YncaConnection>) -> Self {
        Self {
            connection,
            catalog: SubunitId::ALL.to_vec(),
            per_command_margin: PER_COMMAND_MARGIN,
            available: BTreeMap::new(),
            system: None,
            zones: BTreeMap::new(),
            players: BTreeMap::new(),
            tuner: None,
        }
    }

    /// Replace the candidate catalog probed during discovery.
    pub fn with_subunit_catalog(mut self, catalog: Vec<SubunitId>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Adjust the per-command margin the discovery timeout is computed
    /// from. The default works for the ~100 ms turnaround of real devices.
    pub fn with_per_command_margin(mut self, margin: Duration) -> Self {
        self.per_command_margin = margin;
        self
    }

    /// The underlying protocol session.
    pub fn connection(&self) -> Arc<YncaConnection> {
        self.connection.clone()
    }

    /// Discover which subunits the device has and initialize each of them.
    ///
    /// Fails with [`YncaError::InitializationFailed`] if the scan does not
    /// complete in time; the whole sequence may be retried by the caller.
    pub async fn initialize(&mut self) -> Result<()> {
        self.available = self.detect_available_subunits().await?;
        self.initialize_available_subunits()
    }

    async fn detect_available_subunits(&self) -> Result<BTreeMap<SubunitId, bool>> {
        tracing::debug!("Subunit availability scan start");

        let available = Arc::new(Mutex::new(BTreeMap::new()));
        let scan_done = Arc::new(Notify::new());
        let start_count = self.connection.num_commands_sent();

        let availability = available.clone();
        let done = scan_done.clone();
        let callback = self.connection.register_message_callback(move |event| {
            if event.function == "AVAIL" {
                if let Some(id) = SubunitId::from_wire(&event.subunit) {
                    availability
                        .lock()
                        .unwrap()
                        .insert(id, event.status == Status::Ok);
                }
            }
            if event.subunit == "SYS" && event.function == "VERSION" {
                done.notify_one();
            }
        });

        let probes = (|| -> Result<()> {
            for &id in &self.catalog {
                self.connection.get(id, "AVAIL")?;
            }
            // End-of-scan marker; answered by every device.
            self.connection.get(SubunitId::Sys, "VERSION")
        })();
        if let Err(e) = probes {
            self.connection.unregister_message_callback(callback);
            return Err(e);
        }

        let commands_sent = self.connection.num_commands_sent() - start_count;
        let wait = self.per_command_margin * commands_sent as u32;
        let scan = timeout(wait, scan_done.notified()).await;
        self.connection.unregister_message_callback(callback);

        if scan.is_err() {
            return Err(YncaError::InitializationFailed(format!(
                "availability scan did not complete within {wait:?}"
            )));
        }

        tracing::debug!("Subunit availability scan done");
        let result = available.lock().unwrap().clone();
        Ok(result)
    }

    fn initialize_available_subunits(&mut self) -> Result<()> {
        // Every receiver has a System subunit; its availability cannot
        // even be queried.
        let system = Arc::new(System::new(self.connection.clone()));
        system.initialize()?;
        self.system = Some(system);

        for (&id, &is_available) in &self.available {
            if !is_available {
                continue;
            }
            if id.is_zone() {
                let zone = Arc::new(Zone::new(id, self.connection.clone()));
                zone.initialize()?;
                self.zones.insert(id, zone);
            } else if id == SubunitId::Tun {
                let tuner = Arc::new(Tuner::new(self.connection.clone()));
                tuner.initialize()?;
                self.tuner = Some(tuner);
            } else if id != SubunitId::Sys {
                let player = Arc::new(MediaPlayback::new(id, self.connection.clone()));
                player.initialize()?;
                self.players.insert(id, player);
            }
        }
        Ok(())
    }

    /// Subunit ids the device reported as present.
    pub fn available_subunits(&self) -> Vec<SubunitId> {
        self.available
            .iter()
            .filter_map(|(&id, &is_available)| is_available.then_some(id))
            .collect()
    }

    /// The System subunit. `None` before `initialize()`.
    pub fn system(&self) -> Option<Arc<System>> {
        self.system.clone()
    }

    /// The MAIN zone, if the device has one.
    pub fn main(&self) -> Option<Arc<Zone>> {
        self.zone(SubunitId::Main)
    }

    /// A zone by id.
    pub fn zone(&self, id: SubunitId) -> Option<Arc<Zone>> {
        self.zones.get(&id).cloned()
    }

    /// All discovered zones.
    pub fn zones(&self) -> Vec<Arc<Zone>> {
        self.zones.values().cloned().collect()
    }

    /// A media playback source by id.
    pub fn player(&self, id: SubunitId) -> Option<Arc<MediaPlayback>> {
        self.players.get(&id).cloned()
    }

    /// All discovered media playback sources.
    pub fn players(&self) -> Vec<Arc<MediaPlayback>> {
        self.players.values().cloned().collect()
    }

    /// The tuner, if the device has one.
    pub fn tuner(&self) -> Option<Arc<Tuner>> {
        self.tuner.clone()
    }

    /// All inputs a zone can select: external connectors with their labels
    /// from the System subunit, plus the inputs provided by the available
    /// media subunits (the TUN subunit provides "TUNER", and so on).
    pub fn inputs(&self) -> BTreeMap<String, String> {
        let mut inputs = match &self.system {
            Some(system) => system.inputs(),
            None => BTreeMap::new(),
        };
        for (&id, &is_available) in &self.available {
            if is_available {
                if let Some(name) = id.input_name() {
                    inputs.insert(name.to_string(), name.to_string());
                }
            }
        }
        inputs
    }

    /// Close all subunits and the connection.
    pub fn close(&self) {
        if let Some(system) = &self.system {
            system.close();
        }
        for zone in self.zones.values() {
            zone.close();
        }
        for player in self.players.values() {
            player.close();
        }
        if let Some(tuner) = &self.tuner {
            tuner.close();
        }
        self.connection.close();
    }
}
