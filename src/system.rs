use crate::connection::YncaConnection;
use crate::converter::{Converter, StrCodec};
use crate::error::Result;
use crate::function::{Access, FunctionDescriptor};
use crate::subunit::{SubunitCore, SubunitState, UpdateCallbackId};
use crate::types::{Pwr, SubunitId, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

static SYSTEM_FUNCTIONS: &[FunctionDescriptor] = &[
    FunctionDescriptor {
        name: "VERSION",
        access: Access::Get,
        converter: Converter::Str(StrCodec::ANY),
        init: None,
    },
    FunctionDescriptor {
        name: "MODELNAME",
        access: Access::Get,
        converter: Converter::Str(StrCodec::ANY),
        init: None,
    },
    FunctionDescriptor {
        name: "PWR",
        access: Access::GetPut,
        converter: Converter::Enum(Pwr::CODEC),
        init: None,
    },
];

/// The user-visible input label arrives as `INPNAMEHDMI1`, `INPNAMEAV2`,
/// etc. for every external connector the model has; matched by prefix.
fn system_fallback(function: &str, value: &str) -> Option<Value> {
    input_id(function)?;
    Some(Value::Str(value.to_string()))
}

fn input_id(function: &str) -> Option<&str> {
    let id = function.strip_prefix("INPNAME")?;
    (!id.is_empty()).then_some(id)
}

/// Interface for the SYS subunit.
///
/// Every receiver has one; its own availability cannot even be queried, so
/// [`Receiver`](crate::Receiver) creates it unconditionally.
pub struct System {
    core: SubunitCore,
}

impl System {
    pub fn new(connection: Arc<YncaConnection>) -> Self {
        Self {
            core: SubunitCore::new(
                SubunitId::Sys,
                connection,
                SYSTEM_FUNCTIONS,
                Some(system_fallback),
            ),
        }
    }

    /// Request firmware version, model name, power state and the input
    /// labels of all external connectors.
    pub fn initialize(&self) -> Result<()> {
        self.core.initialize(&["INPNAME"])
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

    /// Firmware version string
    pub fn version(&self) -> Option<String> {
        match self.core.value("VERSION") {
            Some(Value::Str(v)) => Some(v),
            _ => None,
        }
    }

    /// Model name, e.g. "RX-A810"
    pub fn model_name(&self) -> Option<String> {
        match self.core.value("MODELNAME") {
            Some(Value::Str(v)) => Some(v),
            _ => None,
        }
    }

    /// Get the power state of the whole unit
    pub fn pwr(&self) -> Option<Pwr> {
        match self.core.value("PWR") {
            Some(Value::Pwr(v)) => Some(v),
            _ => None,
        }
    }

    /// Turn the whole unit on or put it in standby
    pub fn set_pwr(&self, pwr: Pwr) -> Result<()> {
        self.core.put("PWR", &Value::Pwr(pwr))
    }

    /// External input connectors with their user-configured labels,
    /// keyed by input id (`HDMI1`, `AV2`, ...)
    pub fn inputs(&self) -> BTreeMap<String, String> {
        self.core
            .snapshot()
            .into_iter()
            .filter_map(|(function, value)| {
                let id = input_id(&function)?.to_string();
                match value {
                    Value::Str(label) => Some((id, label)),
                    _ => None,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_id_matches_only_labels() {
        assert_eq!(input_id("INPNAMEHDMI1"), Some("HDMI1"));
        assert_eq!(input_id("INPNAMEAV2"), Some("AV2"));
        assert_eq!(input_id("INPNAME"), None);
        assert_eq!(input_id("MODELNAME"), None);
    }
}
