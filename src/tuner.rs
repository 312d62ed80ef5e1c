use crate::connection::YncaConnection;
use crate::converter::{Converter, FloatCodec};
use crate::error::Result;
use crate::function::{Access, FunctionDescriptor};
use crate::subunit::{SubunitCore, SubunitState, UpdateCallbackId};
use crate::types::{Avail, Band, SubunitId, Value};
use std::sync::Arc;

static TUNER_FUNCTIONS: &[FunctionDescriptor] = &[
    FunctionDescriptor {
        name: "AVAIL",
        access: Access::Get,
        converter: Converter::Enum(Avail::CODEC),
        init: None,
    },
    FunctionDescriptor {
        name: "BAND",
        access: Access::GetPut,
        converter: Converter::Enum(Band::CODEC),
        init: None,
    },
    // AM tunes in 10 kHz steps, FM in 0.05 MHz steps.
    FunctionDescriptor {
        name: "AMFREQ",
        access: Access::GetPut,
        converter: Converter::Float(FloatCodec { step: 10.0 }),
        init: None,
    },
    FunctionDescriptor {
        name: "FMFREQ",
        access: Access::GetPut,
        converter: Converter::Float(FloatCodec { step: 0.05 }),
        init: None,
    },
];

/// Interface for the AM/FM tuner subunit.
pub struct Tuner {
    core: SubunitCore,
}

impl Tuner {
    pub fn new(connection: Arc<YncaConnection>) -> Self {
        Self {
            core: SubunitCore::new(SubunitId::Tun, connection, TUNER_FUNCTIONS, None),
        }
    }

    pub fn initialize(&self) -> Result<()> {
        self.core.initialize(&[])
    }

    pub fn id(&self) -> SubunitId {
        self.core.id()
    }

    pub fn state(&self) -> SubunitState {
        self.core.state()
    }

    pub fn register_update_callback<F>(&self, callback: F) -> UpdateCallbackId
    where
        F: Fn(SubunitId, &str, &Value) + Send + Sync + 'static,
    {
        self.core.register_update_callback(Arc::new(callback))
    }

    pub fn unregister_update_callback(&self, id: UpdateCallbackId) {
        self.core.unregister_update_callback(id);
    }

    pub fn close(&self) {
        self.core.close();
    }

    pub fn avail(&self) -> Option<Avail> {
        match self.core.value("AVAIL") {
            Some(Value::Avail(v)) => Some(v),
            _ => None,
        }
    }

    /// Get the selected band
    pub fn band(&self) -> Option<Band> {
        match self.core.value("BAND") {
            Some(Value::Band(v)) => Some(v),
            _ => None,
        }
    }

    /// Switch between AM and FM
    pub fn set_band(&self, band: Band) -> Result<()> {
        self.core.put("BAND", &Value::Band(band))
    }

    /// Get the AM frequency in kHz
    pub fn am_freq(&self) -> Option<f64> {
        match self.core.value("AMFREQ") {
            Some(Value::Float(v)) => Some(v),
            _ => None,
        }
    }

    /// Tune AM to the given frequency in kHz, rounded to the 10 kHz grid
    pub fn set_am_freq(&self, khz: f64) -> Result<()> {
        self.core.put("AMFREQ", &Value::Float(khz))
    }

    /// Get the FM frequency in MHz
    pub fn fm_freq(&self) -> Option<f64> {
        match self.core.value("FMFREQ") {
            Some(Value::Float(v)) => Some(v),
            _ => None,
        }
    }

    /// Tune FM to the given frequency in MHz, rounded to the 0.05 MHz grid
    pub fn set_fm_freq(&self, mhz: f64) -> Result<()> {
        self.core.put("FMFREQ", &Value::Float(mhz))
    }
}
