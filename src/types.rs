use crate::converter::EnumCodec;
use std::fmt;

/// A typed function value.
///
/// Every attribute a subunit exposes is cached as a `Value`. The tag makes it
/// possible to distinguish, for example, a numeric initial-volume override
/// (`Value::Float`) from the enum modes of the same function
/// (`Value::InitVolLvl`).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Pwr(Pwr),
    Avail(Avail),
    Mute(Mute),
    Straight(Straight),
    PureDirMode(PureDirMode),
    InitVolMode(InitVolMode),
    InitVolLvl(InitVolLvl),
    Sleep(Sleep),
    Repeat(Repeat),
    Shuffle(Shuffle),
    Playback(Playback),
    PlaybackInfo(PlaybackInfo),
    Band(Band),
    SoundPrg(SoundPrg),
    TwoChDecoder(TwoChDecoder),
    Input(Input),
    /// A decimal number (volume in dB, tuner frequency, ...)
    Float(f64),
    /// Free-form text (names, metadata, version strings)
    Str(String),
}

/// Defines a protocol enum together with its exact wire spellings.
///
/// Generates `from_wire`/`to_wire`, the `Value` conversion, a `Display`
/// impl and the [`EnumCodec`] used by descriptor tables.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// All members in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Codec for use in function descriptor tables.
            pub const CODEC: EnumCodec = EnumCodec {
                decode: |raw| $name::from_wire(raw).map(Value::$name),
                encode: |value| match value {
                    Value::$name(v) => Some(v.to_wire()),
                    _ => None,
                },
            };

            /// Parse the protocol representation. Unknown strings are `None`.
            pub fn from_wire(raw: &str) -> Option<Self> {
                match raw {
                    $($wire => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// The exact string sent on the wire.
            pub fn to_wire(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl From<$name> for Value {
            fn from(v: $name) -> Value {
                Value::$name(v)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.to_wire())
            }
        }
    };
}

wire_enum! {
    /// Power state of a zone or the whole unit.
    Pwr {
        On => "On",
        Standby => "Standby",
    }
}

wire_enum! {
    /// Whether a subunit is usable right now.
    Avail {
        NotConnected => "Not Connected",
        NotReady => "Not Ready",
        Ready => "Ready",
    }
}

wire_enum! {
    /// Mute state. Receivers support full mute and two attenuation levels.
    Mute {
        On => "On",
        AttMinus20 => "Att -20 dB",
        AttMinus40 => "Att -40 dB",
        Off => "Off",
    }
}

wire_enum! {
    Straight {
        On => "On",
        Off => "Off",
    }
}

wire_enum! {
    PureDirMode {
        On => "On",
        Off => "Off",
    }
}

wire_enum! {
    InitVolMode {
        On => "On",
        Off => "Off",
    }
}

wire_enum! {
    /// Initial volume behavior. A fixed level is expressed as a
    /// `Value::Float` through the multi converter on INITVOLLVL.
    InitVolLvl {
        Mute => "Mute",
        Off => "Off",
    }
}

wire_enum! {
    Sleep {
        Off => "Off",
        ThirtyMin => "30 min",
        SixtyMin => "60 min",
        NinetyMin => "90 min",
        OneHundredTwentyMin => "120 min",
    }
}

wire_enum! {
    Repeat {
        Off => "Off",
        Single => "Single",
        All => "All",
    }
}

wire_enum! {
    Shuffle {
        On => "On",
        Off => "Off",
    }
}

wire_enum! {
    /// Playback transport commands. PUT only; the current state is
    /// reported through [`PlaybackInfo`].
    Playback {
        Play => "Play",
        Pause => "Pause",
        Stop => "Stop",
        SkipFwd => "Skip Fwd",
        SkipRev => "Skip Rev",
    }
}

wire_enum! {
    PlaybackInfo {
        Play => "Play",
        Pause => "Pause",
        Stop => "Stop",
    }
}

wire_enum! {
    /// Tuner band.
    Band {
        Am => "AM",
        Fm => "FM",
    }
}

wire_enum! {
    /// DSP sound programs.
    SoundPrg {
        HallInMunich => "Hall in Munich",
        HallInVienna => "Hall in Vienna",
        Chamber => "Chamber",
        CellarClub => "Cellar Club",
        TheRoxyTheatre => "The Roxy Theatre",
        TheBottomLine => "The Bottom Line",
        Sports => "Sports",
        ActionGame => "Action Game",
        RoleplayingGame => "Roleplaying Game",
        MusicVideo => "Music Video",
        Standard => "Standard",
        Spectacle => "Spectacle",
        SciFi => "Sci-Fi",
        Adventure => "Adventure",
        Drama => "Drama",
        MonoMovie => "Mono Movie",
        TwoChStereo => "2ch Stereo",
        SevenChStereo => "7ch Stereo",
        NineChStereo => "9ch Stereo",
        SurroundDecoder => "Surround Decoder",
    }
}

wire_enum! {
    /// Decoder used for 2-channel sources.
    TwoChDecoder {
        DolbyPl2Movie => "Dolby PLII Movie",
        DolbyPl2Music => "Dolby PLII Music",
        DolbyPl2Game => "Dolby PLII Game",
        DolbyPl2xMovie => "Dolby PLIIx Movie",
        DolbyPl2xMusic => "Dolby PLIIx Music",
        DolbyPl2xGame => "Dolby PLIIx Game",
        DtsNeo6Cinema => "DTS NEO:6 Cinema",
        DtsNeo6Music => "DTS NEO:6 Music",
    }
}

wire_enum! {
    /// Selectable zone inputs. External connectors plus the inputs provided
    /// by media subunits.
    Input {
        Hdmi1 => "HDMI1",
        Hdmi2 => "HDMI2",
        Hdmi3 => "HDMI3",
        Hdmi4 => "HDMI4",
        Hdmi5 => "HDMI5",
        Hdmi6 => "HDMI6",
        Hdmi7 => "HDMI7",
        Av1 => "AV1",
        Av2 => "AV2",
        Av3 => "AV3",
        Av4 => "AV4",
        Av5 => "AV5",
        Av6 => "AV6",
        Av7 => "AV7",
        Audio1 => "AUDIO1",
        Audio2 => "AUDIO2",
        Audio3 => "AUDIO3",
        Audio4 => "AUDIO4",
        Phono => "PHONO",
        Tuner => "TUNER",
        Tv => "TV",
        VAux => "V-AUX",
        MultiCh => "MULTI CH",
        Usb => "USB",
        IpodUsb => "iPod (USB)",
        Ipod => "iPod",
        Bluetooth => "Bluetooth",
        NetRadio => "NET RADIO",
        Server => "SERVER",
        Airplay => "AirPlay",
        Spotify => "Spotify",
        Pandora => "Pandora",
        Napster => "Napster",
        Rhapsody => "Rhapsody",
        Sirius => "SIRIUS",
        SiriusIr => "SIRIUS InternetRadio",
        Pc => "PC",
        Uaw => "UAW",
    }
}

/// A logical subsystem of the receiver, addressed by a fixed id on the wire.
///
/// The full list doubles as the candidate catalog for the availability scan;
/// [`crate::Receiver`] probes each of these with `AVAIL` to find out what the
/// connected model actually has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SubunitId {
    Sys,
    Main,
    Zone2,
    Zone3,
    Zone4,
    Tun,
    Sirius,
    Ipod,
    Bt,
    Rhap,
    SiriusIr,
    Pandora,
    Napster,
    Pc,
    NetRadio,
    Usb,
    IpodUsb,
    Uaw,
}

impl SubunitId {
    /// Every known subunit id, in probe order.
    pub const ALL: &'static [SubunitId] = &[
        SubunitId::Sys,
        SubunitId::Main,
        SubunitId::Zone2,
        SubunitId::Zone3,
        SubunitId::Zone4,
        SubunitId::Tun,
        SubunitId::Sirius,
        SubunitId::Ipod,
        SubunitId::Bt,
        SubunitId::Rhap,
        SubunitId::SiriusIr,
        SubunitId::Pandora,
        SubunitId::Napster,
        SubunitId::Pc,
        SubunitId::NetRadio,
        SubunitId::Usb,
        SubunitId::IpodUsb,
        SubunitId::Uaw,
    ];

    /// Parse a wire subunit id. Unknown ids are `None`.
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "SYS" => Some(SubunitId::Sys),
            "MAIN" => Some(SubunitId::Main),
            "ZONE2" => Some(SubunitId::Zone2),
            "ZONE3" => Some(SubunitId::Zone3),
            "ZONE4" => Some(SubunitId::Zone4),
            "TUN" => Some(SubunitId::Tun),
            "SIRIUS" => Some(SubunitId::Sirius),
            "IPOD" => Some(SubunitId::Ipod),
            "BT" => Some(SubunitId::Bt),
            "RHAP" => Some(SubunitId::Rhap),
            "SIRIUSIR" => Some(SubunitId::SiriusIr),
            "PANDORA" => Some(SubunitId::Pandora),
            "NAPSTER" => Some(SubunitId::Napster),
            "PC" => Some(SubunitId::Pc),
            "NETRADIO" => Some(SubunitId::NetRadio),
            "USB" => Some(SubunitId::Usb),
            "IPODUSB" => Some(SubunitId::IpodUsb),
            "UAW" => Some(SubunitId::Uaw),
            _ => None,
        }
    }

    /// The id as it appears on the wire.
    pub fn to_wire(self) -> &'static str {
        match self {
            SubunitId::Sys => "SYS",
            SubunitId::Main => "MAIN",
            SubunitId::Zone2 => "ZONE2",
            SubunitId::Zone3 => "ZONE3",
            SubunitId::Zone4 => "ZONE4",
            SubunitId::Tun => "TUN",
            SubunitId::Sirius => "SIRIUS",
            SubunitId::Ipod => "IPOD",
            SubunitId::Bt => "BT",
            SubunitId::Rhap => "RHAP",
            SubunitId::SiriusIr => "SIRIUSIR",
            SubunitId::Pandora => "PANDORA",
            SubunitId::Napster => "NAPSTER",
            SubunitId::Pc => "PC",
            SubunitId::NetRadio => "NETRADIO",
            SubunitId::Usb => "USB",
            SubunitId::IpodUsb => "IPODUSB",
            SubunitId::Uaw => "UAW",
        }
    }

    /// Whether this id addresses a power zone.
    pub fn is_zone(self) -> bool {
        matches!(
            self,
            SubunitId::Main | SubunitId::Zone2 | SubunitId::Zone3 | SubunitId::Zone4
        )
    }

    /// The input name this subunit provides when present, e.g. the TUN
    /// subunit provides the "TUNER" input. External connectors (HDMI, AV)
    /// are not tied to a subunit and come from the System input labels.
    pub fn input_name(self) -> Option<&'static str> {
        match self {
            SubunitId::Tun => Some("TUNER"),
            SubunitId::Sirius => Some("SIRIUS"),
            SubunitId::Ipod => Some("iPod"),
            SubunitId::Bt => Some("Bluetooth"),
            SubunitId::Rhap => Some("Rhapsody"),
            SubunitId::SiriusIr => Some("SIRIUS InternetRadio"),
            SubunitId::Pandora => Some("Pandora"),
            SubunitId::Napster => Some("Napster"),
            SubunitId::Pc => Some("PC"),
            SubunitId::NetRadio => Some("NET RADIO"),
            SubunitId::Usb => Some("USB"),
            SubunitId::IpodUsb => Some("iPod (USB)"),
            SubunitId::Uaw => Some("UAW"),
            _ => None,
        }
    }
}

impl fmt::Display for SubunitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_wire_roundtrip() {
        for &mute in Mute::ALL {
            assert_eq!(Mute::from_wire(mute.to_wire()), Some(mute));
        }
        for &prg in SoundPrg::ALL {
            assert_eq!(SoundPrg::from_wire(prg.to_wire()), Some(prg));
        }
    }

    #[test]
    fn enum_membership_is_strict() {
        assert_eq!(Pwr::from_wire("on"), None);
        assert_eq!(Pwr::from_wire(""), None);
        assert_eq!(Mute::from_wire("Att -30 dB"), None);
    }

    #[test]
    fn subunit_wire_roundtrip() {
        for &id in SubunitId::ALL {
            assert_eq!(SubunitId::from_wire(id.to_wire()), Some(id));
        }
        assert_eq!(SubunitId::from_wire("BOGUS"), None);
    }

    #[test]
    fn zone_classification() {
        assert!(SubunitId::Main.is_zone());
        assert!(SubunitId::Zone4.is_zone());
        assert!(!SubunitId::Sys.is_zone());
        assert!(!SubunitId::Usb.is_zone());
    }

    #[test]
    fn media_subunits_provide_inputs() {
        assert_eq!(SubunitId::Tun.input_name(), Some("TUNER"));
        assert_eq!(SubunitId::NetRadio.input_name(), Some("NET RADIO"));
        assert_eq!(SubunitId::Sys.input_name(), None);
        assert_eq!(SubunitId::Main.input_name(), None);
    }
}
