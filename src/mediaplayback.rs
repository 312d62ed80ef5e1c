use crate::connection::YncaConnection;
use crate::converter::{Converter, StrCodec};
use crate::error::Result;
use crate::function::{Access, FunctionDescriptor};
use crate::subunit::{SubunitCore, SubunitState, UpdateCallbackId};
use crate::types::{Avail, Playback, PlaybackInfo, Repeat, Shuffle, SubunitId, Value};
use std::sync::Arc;

/// Functions shared by the media playback sources (USB, PC, NET RADIO,
/// Bluetooth, iPod, the streaming services, ...). `METAINFO` reports
/// artist, album and song in one reply. Sources without a STATION answer
/// UNDEFINED for it, which leaves the cache untouched.
static MEDIA_FUNCTIONS: &[FunctionDescriptor] = &[
    FunctionDescriptor {
        name: "AVAIL",
        access: Access::Get,
        converter: Converter::Enum(Avail::CODEC),
        init: None,
    },
    FunctionDescriptor {
        name: "ARTIST",
        access: Access::Get,
        converter: Converter::Str(StrCodec::ANY),
        init: Some("METAINFO"),
    },
    FunctionDescriptor {
        name: "ALBUM",
        access: Access::Get,
        converter: Converter::Str(StrCodec::ANY),
        init: Some("METAINFO"),
    },
    FunctionDescriptor {
        name: "SONG",
        access: Access::Get,
        converter: Converter::Str(StrCodec::ANY),
        init: Some("METAINFO"),
    },
    FunctionDescriptor {
        name: "STATION",
        access: Access::Get,
        converter: Converter::Str(StrCodec::ANY),
        init: None,
    },
    FunctionDescriptor {
        name: "PLAYBACKINFO",
        access: Access::Get,
        converter: Converter::Enum(PlaybackInfo::CODEC),
        init: None,
    },
    FunctionDescriptor {
        name: "REPEAT",
        access: Access::GetPut,
        converter: Converter::Enum(Repeat::CODEC),
        init: None,
    },
    FunctionDescriptor {
        name: "SHUFFLE",
        access: Access::GetPut,
        converter: Converter::Enum(Shuffle::CODEC),
        init: None,
    },
];

/// Interface for a media playback source subunit.
pub struct MediaPlayback {
    core: SubunitCore,
}

impl MediaPlayback {
    pub fn new(id: SubunitId, connection: Arc<YncaConnection>) -> Self {
        Self {
            core: SubunitCore::new(id, connection, MEDIA_FUNCTIONS, None),
        }
    }

    /// Request current metadata, playback state and repeat/shuffle modes.
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

    pub fn artist(&self) -> Option<String> {
        match self.core.value("ARTIST") {
            Some(Value::Str(v)) => Some(v),
            _ => None,
        }
    }

    pub fn album(&self) -> Option<String> {
        match self.core.value("ALBUM") {
            Some(Value::Str(v)) => Some(v),
            _ => None,
        }
    }

    pub fn song(&self) -> Option<String> {
        match self.core.value("SONG") {
            Some(Value::Str(v)) => Some(v),
            _ => None,
        }
    }

    /// Station name, for the radio-like sources
    pub fn station(&self) -> Option<String> {
        match self.core.value("STATION") {
            Some(Value::Str(v)) => Some(v),
            _ => None,
        }
    }

    /// Current playback state as reported by the source
    pub fn playback_info(&self) -> Option<PlaybackInfo> {
        match self.core.value("PLAYBACKINFO") {
            Some(Value::PlaybackInfo(v)) => Some(v),
            _ => None,
        }
    }

    pub fn repeat(&self) -> Option<Repeat> {
        match self.core.value("REPEAT") {
            Some(Value::Repeat(v)) => Some(v),
            _ => None,
        }
    }

    pub fn set_repeat(&self, repeat: Repeat) -> Result<()> {
        self.core.put("REPEAT", &Value::Repeat(repeat))
    }

    pub fn shuffle(&self) -> Option<Shuffle> {
        match self.core.value("SHUFFLE") {
            Some(Value::Shuffle(v)) => Some(v),
            _ => None,
        }
    }

    pub fn set_shuffle(&self, shuffle: Shuffle) -> Result<()> {
        self.core.put("SHUFFLE", &Value::Shuffle(shuffle))
    }

    /// Change the playback state
    pub fn playback(&self, playback: Playback) -> Result<()> {
        self.core.put_raw("PLAYBACK", playback.to_wire())
    }
}
