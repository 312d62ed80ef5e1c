use crate::connection::YncaConnection;
use crate::converter::{Converter, FloatCodec, StrCodec};
use crate::error::Result;
use crate::function::{Access, FunctionDescriptor};
use crate::subunit::{SubunitCore, SubunitState, UpdateCallbackId};
use crate::types::{
    Avail, InitVolLvl, InitVolMode, Input, Mute, Playback, PureDirMode, Pwr, Sleep, SoundPrg,
    Straight, SubunitId, TwoChDecoder, Value,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Functions shared by all zones.
///
/// `BASIC` reports PWR, SLEEP, VOL, MUTE, INP, STRAIGHT, SOUNDPRG and more
/// in one reply, which keeps initialization to a handful of commands on a
/// ~100 ms per-command link.
static ZONE_FUNCTIONS: &[FunctionDescriptor] = &[
    FunctionDescriptor {
        name: "AVAIL",
        access: Access::Get,
        converter: Converter::Enum(Avail::CODEC),
        init: None,
    },
    FunctionDescriptor {
        name: "PWR",
        access: Access::GetPut,
        converter: Converter::Enum(Pwr::CODEC),
        init: Some("BASIC"),
    },
    FunctionDescriptor {
        name: "SLEEP",
        access: Access::GetPut,
        converter: Converter::Enum(Sleep::CODEC),
        init: Some("BASIC"),
    },
    FunctionDescriptor {
        name: "VOL",
        access: Access::GetPut,
        converter: Converter::Float(FloatCodec::HALF_DB),
        init: Some("BASIC"),
    },
    FunctionDescriptor {
        name: "MUTE",
        access: Access::GetPut,
        converter: Converter::Enum(Mute::CODEC),
        init: Some("BASIC"),
    },
    FunctionDescriptor {
        name: "INP",
        access: Access::GetPut,
        converter: Converter::Enum(Input::CODEC),
        init: Some("BASIC"),
    },
    FunctionDescriptor {
        name: "STRAIGHT",
        access: Access::GetPut,
        converter: Converter::Enum(Straight::CODEC),
        init: Some("BASIC"),
    },
    FunctionDescriptor {
        name: "SOUNDPRG",
        access: Access::GetPut,
        converter: Converter::Enum(SoundPrg::CODEC),
        init: Some("BASIC"),
    },
    FunctionDescriptor {
        name: "PUREDIRMODE",
        access: Access::GetPut,
        converter: Converter::Enum(PureDirMode::CODEC),
        init: Some("BASIC"),
    },
    FunctionDescriptor {
        name: "MAXVOL",
        access: Access::Get,
        converter: Converter::Float(FloatCodec::HALF_DB),
        init: None,
    },
    FunctionDescriptor {
        name: "ZONENAME",
        access: Access::GetPut,
        converter: Converter::Str(StrCodec::max(9)),
        init: None,
    },
    FunctionDescriptor {
        name: "INITVOLLVL",
        access: Access::GetPut,
        converter: Converter::Multi(&[
            Converter::Enum(InitVolLvl::CODEC),
            Converter::Float(FloatCodec::HALF_DB),
        ]),
        init: None,
    },
    FunctionDescriptor {
        name: "INITVOLMODE",
        access: Access::GetPut,
        converter: Converter::Enum(InitVolMode::CODEC),
        init: None,
    },
    FunctionDescriptor {
        name: "2CHDECODER",
        access: Access::GetPut,
        converter: Converter::Enum(TwoChDecoder::CODEC),
        init: None,
    },
];

/// The numbered part of a `SCENE<n>NAME` function name.
fn scene_number(function: &str) -> Option<&str> {
    let number = function.strip_prefix("SCENE")?.strip_suffix("NAME")?;
    (!number.is_empty() && number.bytes().all(|b| b.is_ascii_digit())).then_some(number)
}

/// Scene names arrive as `SCENE1NAME` .. `SCENE12NAME`; matched by pattern
/// instead of twelve separate descriptors.
fn zone_fallback(function: &str, value: &str) -> Option<Value> {
    scene_number(function)?;
    Some(Value::Str(value.to_string()))
}

/// Interface for controlling a power zone (MAIN, ZONE2, ZONE3, ZONE4).
///
/// Attribute accessors return the last device-confirmed value; `None` means
/// no report has been received yet. Setters send a command and return
/// immediately; the cached value updates once the device reports back.
pub struct Zone {
    core: SubunitCore,
}

impl Zone {
    /// Create a zone on an existing connection. Normally done by
    /// [`Receiver`](crate::Receiver) for each zone the device reports.
    pub fn new(id: SubunitId, connection: Arc<YncaConnection>) -> Self {
        Self {
            core: SubunitCore::new(id, connection, ZONE_FUNCTIONS, Some(zone_fallback)),
        }
    }

    /// Request the current value of every zone function, plus the scene
    /// names. Replies populate the accessors as they arrive.
    pub fn initialize(&self) -> Result<()> {
        self.core.initialize(&["SCENENAME"])
    }

    /// The zone's subunit id.
    pub fn id(&self) -> SubunitId {
        self.core.id()
    }

    pub fn state(&self) -> SubunitState {
        self.core.state()
    }

    /// Register a callback invoked on every device-confirmed update.
    pub fn register_update_callback<F>(&self, callback: F) -> UpdateCallbackId
    where
        F: Fn(SubunitId, &str, &Value) + Send + Sync + 'static,
    {
        self.core.register_update_callback(Arc::new(callback))
    }

    pub fn unregister_update_callback(&self, id: UpdateCallbackId) {
        self.core.unregister_update_callback(id);
    }

    /// Stop receiving events for this zone. Idempotent.
    pub fn close(&self) {
        self.core.close();
    }

    // ========== Power ==========

    /// Get the power state
    pub fn pwr(&self) -> Option<Pwr> {
        match self.core.value("PWR") {
            Some(Value::Pwr(v)) => Some(v),
            _ => None,
        }
    }

    /// Turn the zone on or put it in standby
    pub fn set_pwr(&self, pwr: Pwr) -> Result<()> {
        self.core.put("PWR", &Value::Pwr(pwr))
    }

    /// Get the sleep timer setting
    pub fn sleep(&self) -> Option<Sleep> {
        match self.core.value("SLEEP") {
            Some(Value::Sleep(v)) => Some(v),
            _ => None,
        }
    }

    /// Set the sleep timer
    pub fn set_sleep(&self, sleep: Sleep) -> Result<()> {
        self.core.put("SLEEP", &Value::Sleep(sleep))
    }

    // ========== Volume ==========

    /// Get the current volume in dB
    pub fn volume(&self) -> Option<f64> {
        match self.core.value("VOL") {
            Some(Value::Float(v)) => Some(v),
            _ => None,
        }
    }

    /// Set the volume in dB. The receiver works in 0.5 dB increments;
    /// input values are rounded to the nearest step.
    pub fn set_volume(&self, db: f64) -> Result<()> {
        self.core.put("VOL", &Value::Float(db))
    }

    /// Get the configured maximum volume in dB
    pub fn max_volume(&self) -> Option<f64> {
        match self.core.value("MAXVOL") {
            Some(Value::Float(v)) => Some(v),
            _ => None,
        }
    }

    /// Increase the volume with the given step size.
    /// Supported step sizes are 0.5, 1, 2 and 5 dB.
    pub fn volume_up(&self, step_size: f64) -> Result<()> {
        self.core.put_raw("VOL", &stepped_move("Up", step_size))
    }

    /// Decrease the volume with the given step size.
    /// Supported step sizes are 0.5, 1, 2 and 5 dB.
    pub fn volume_down(&self, step_size: f64) -> Result<()> {
        self.core.put_raw("VOL", &stepped_move("Down", step_size))
    }

    /// Get the mute state
    pub fn mute(&self) -> Option<Mute> {
        match self.core.value("MUTE") {
            Some(Value::Mute(v)) => Some(v),
            _ => None,
        }
    }

    /// Set the mute state
    pub fn set_mute(&self, mute: Mute) -> Result<()> {
        self.core.put("MUTE", &Value::Mute(mute))
    }

    // ========== Input and sound ==========

    /// Get the selected input
    pub fn input(&self) -> Option<Input> {
        match self.core.value("INP") {
            Some(Value::Input(v)) => Some(v),
            _ => None,
        }
    }

    /// Select an input
    pub fn set_input(&self, input: Input) -> Result<()> {
        self.core.put("INP", &Value::Input(input))
    }

    /// Get the Straight setting
    pub fn straight(&self) -> Option<Straight> {
        match self.core.value("STRAIGHT") {
            Some(Value::Straight(v)) => Some(v),
            _ => None,
        }
    }

    /// Set the Straight setting
    pub fn set_straight(&self, straight: Straight) -> Result<()> {
        self.core.put("STRAIGHT", &Value::Straight(straight))
    }

    /// Get the DSP sound program
    pub fn sound_prg(&self) -> Option<SoundPrg> {
        match self.core.value("SOUNDPRG") {
            Some(Value::SoundPrg(v)) => Some(v),
            _ => None,
        }
    }

    /// Set the DSP sound program
    pub fn set_sound_prg(&self, program: SoundPrg) -> Result<()> {
        self.core.put("SOUNDPRG", &Value::SoundPrg(program))
    }

    /// Get the Pure Direct setting
    pub fn pure_dir_mode(&self) -> Option<PureDirMode> {
        match self.core.value("PUREDIRMODE") {
            Some(Value::PureDirMode(v)) => Some(v),
            _ => None,
        }
    }

    /// Set the Pure Direct setting
    pub fn set_pure_dir_mode(&self, mode: PureDirMode) -> Result<()> {
        self.core.put("PUREDIRMODE", &Value::PureDirMode(mode))
    }

    /// Get the decoder used for 2-channel sources
    pub fn two_ch_decoder(&self) -> Option<TwoChDecoder> {
        match self.core.value("2CHDECODER") {
            Some(Value::TwoChDecoder(v)) => Some(v),
            _ => None,
        }
    }

    /// Set the decoder used for 2-channel sources
    pub fn set_two_ch_decoder(&self, decoder: TwoChDecoder) -> Result<()> {
        self.core.put("2CHDECODER", &Value::TwoChDecoder(decoder))
    }

    // ========== Names, scenes, initial volume ==========

    /// Get the zone name
    pub fn zone_name(&self) -> Option<String> {
        match self.core.value("ZONENAME") {
            Some(Value::Str(v)) => Some(v),
            _ => None,
        }
    }

    /// Rename the zone. Names are limited to 9 characters.
    pub fn set_zone_name(&self, name: impl Into<String>) -> Result<()> {
        self.core.put("ZONENAME", &Value::Str(name.into()))
    }

    /// Get the initial volume level: a fixed level in dB, or one of the
    /// [`InitVolLvl`] modes.
    pub fn init_vol_lvl(&self) -> Option<Value> {
        self.core.value("INITVOLLVL")
    }

    /// Set the initial volume to a fixed level in dB
    pub fn set_init_vol_lvl_db(&self, db: f64) -> Result<()> {
        self.core.put("INITVOLLVL", &Value::Float(db))
    }

    /// Set the initial volume to one of the special modes
    pub fn set_init_vol_lvl(&self, level: InitVolLvl) -> Result<()> {
        self.core.put("INITVOLLVL", &Value::InitVolLvl(level))
    }

    /// Get whether the initial volume is applied at power-on
    pub fn init_vol_mode(&self) -> Option<InitVolMode> {
        match self.core.value("INITVOLMODE") {
            Some(Value::InitVolMode(v)) => Some(v),
            _ => None,
        }
    }

    pub fn set_init_vol_mode(&self, mode: InitVolMode) -> Result<()> {
        self.core.put("INITVOLMODE", &Value::InitVolMode(mode))
    }

    /// Get the availability reported by the zone
    pub fn avail(&self) -> Option<Avail> {
        match self.core.value("AVAIL") {
            Some(Value::Avail(v)) => Some(v),
            _ => None,
        }
    }

    /// Scene names keyed by scene id, as far as reported by the device
    pub fn scenes(&self) -> BTreeMap<String, String> {
        self.core
            .snapshot()
            .into_iter()
            .filter_map(|(function, value)| {
                let number = scene_number(&function)?.to_string();
                match value {
                    Value::Str(name) => Some((number, name)),
                    _ => None,
                }
            })
            .collect()
    }

    /// Recall a scene
    pub fn scene(&self, scene_id: impl std::fmt::Display) -> Result<()> {
        self.core.put_raw("SCENE", &format!("Scene {scene_id}"))
    }

    /// Change the playback state of the source playing in this zone
    pub fn playback(&self, playback: Playback) -> Result<()> {
        self.core.put_raw("PLAYBACK", playback.to_wire())
    }
}

fn stepped_move(direction: &str, step_size: f64) -> String {
    if [1.0, 2.0, 5.0].contains(&step_size) {
        format!("{direction} {step_size:.0} dB")
    } else {
        direction.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_number_matches_only_numbered_names() {
        assert_eq!(scene_number("SCENE1NAME"), Some("1"));
        assert_eq!(scene_number("SCENE12NAME"), Some("12"));
        assert_eq!(scene_number("SCENENAME"), None);
        assert_eq!(scene_number("SCENEXNAME"), None);
        assert_eq!(scene_number("SCENE1"), None);
        assert_eq!(scene_number("ZONENAME"), None);
    }

    #[test]
    fn stepped_moves_render_supported_steps() {
        assert_eq!(stepped_move("Up", 0.5), "Up");
        assert_eq!(stepped_move("Up", 1.0), "Up 1 dB");
        assert_eq!(stepped_move("Down", 2.0), "Down 2 dB");
        assert_eq!(stepped_move("Down", 5.0), "Down 5 dB");
        assert_eq!(stepped_move("Down", 3.0), "Down");
    }
}
