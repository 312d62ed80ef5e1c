//! Conversion between wire strings and typed [`Value`]s.
//!
//! Converters are pure and carry no state; descriptor tables embed them as
//! `const` data. Failures are reported per function so a bad value for one
//! attribute never affects any other.

use crate::error::{Result, YncaError};
use crate::types::Value;

/// Codec for one protocol enum, built by the `wire_enum!` macro.
///
/// Plain function pointers keep descriptor tables `const`-constructible.
#[derive(Debug, Clone, Copy)]
pub struct EnumCodec {
    /// Parse a wire string into a tagged [`Value`], `None` when the string
    /// is not a member.
    pub decode: fn(&str) -> Option<Value>,
    /// Render a [`Value`] of the matching variant, `None` for any other tag.
    pub encode: fn(&Value) -> Option<&'static str>,
}

/// Codec for decimal values that the device only accepts on a fixed grid.
#[derive(Debug, Clone, Copy)]
pub struct FloatCodec {
    /// Grid step size. Outgoing values are rounded to the nearest multiple.
    pub step: f64,
}

impl FloatCodec {
    /// The common 0.5 dB grid used by volume functions.
    pub const HALF_DB: FloatCodec = FloatCodec { step: 0.5 };
}

/// Codec for free-form text with length limits enforced on PUT.
#[derive(Debug, Clone, Copy)]
pub struct StrCodec {
    pub min_len: usize,
    pub max_len: usize,
}

impl StrCodec {
    /// No length restriction.
    pub const ANY: StrCodec = StrCodec {
        min_len: 0,
        max_len: usize::MAX,
    };

    /// At most `max` characters.
    pub const fn max(max: usize) -> StrCodec {
        StrCodec {
            min_len: 0,
            max_len: max,
        }
    }
}

/// A value converter as referenced by a
/// [`FunctionDescriptor`](crate::function::FunctionDescriptor).
#[derive(Debug, Clone, Copy)]
pub enum Converter {
    /// Strict enum membership.
    Enum(EnumCodec),
    /// Decimal number rounded onto a step grid when sent.
    Float(FloatCodec),
    /// Text, identity on receive, length-checked on send.
    Str(StrCodec),
    /// Ordered fallback chain; first successful decode wins.
    Multi(&'static [Converter]),
}

impl Converter {
    /// Decode a wire string into a typed value.
    pub fn from_wire(&self, function: &str, raw: &str) -> Result<Value> {
        match self {
            Converter::Enum(codec) => (codec.decode)(raw).ok_or_else(|| YncaError::Conversion {
                function: function.to_string(),
                message: format!("'{raw}' is not a recognized value"),
            }),
            Converter::Float(_) => match raw.parse::<f64>() {
                Ok(v) => Ok(Value::Float(v)),
                Err(_) => Err(YncaError::Conversion {
                    function: function.to_string(),
                    message: format!("'{raw}' is not a number"),
                }),
            },
            Converter::Str(_) => Ok(Value::Str(raw.to_string())),
            Converter::Multi(converters) => {
                for converter in *converters {
                    if let Ok(value) = converter.from_wire(function, raw) {
                        return Ok(value);
                    }
                }
                Err(YncaError::Conversion {
                    function: function.to_string(),
                    message: format!("'{raw}' matched none of the accepted forms"),
                })
            }
        }
    }

    /// Encode a typed value into its wire string.
    pub fn to_wire(&self, function: &str, value: &Value) -> Result<String> {
        match self {
            Converter::Enum(codec) => {
                (codec.encode)(value)
                    .map(str::to_string)
                    .ok_or_else(|| YncaError::Conversion {
                        function: function.to_string(),
                        message: format!("{value:?} does not belong to this enum"),
                    })
            }
            Converter::Float(codec) => match value {
                Value::Float(v) => Ok(render_stepped(*v, codec.step)),
                other => Err(YncaError::Conversion {
                    function: function.to_string(),
                    message: format!("expected a number, got {other:?}"),
                }),
            },
            Converter::Str(codec) => match value {
                Value::Str(s) if s.len() >= codec.min_len && s.len() <= codec.max_len => {
                    Ok(s.clone())
                }
                Value::Str(s) => Err(YncaError::Conversion {
                    function: function.to_string(),
                    message: format!(
                        "string length {} outside allowed range {}..={}",
                        s.len(),
                        codec.min_len,
                        codec.max_len
                    ),
                }),
                other => Err(YncaError::Conversion {
                    function: function.to_string(),
                    message: format!("expected text, got {other:?}"),
                }),
            },
            Converter::Multi(converters) => {
                let mut encodings: Vec<String> = converters
                    .iter()
                    .filter_map(|c| c.to_wire(function, value).ok())
                    .collect();
                match encodings.len() {
                    1 => Ok(encodings.remove(0)),
                    0 => Err(YncaError::Conversion {
                        function: function.to_string(),
                        message: format!("{value:?} is not accepted by any converter in the chain"),
                    }),
                    // More than one match means the chain was misconfigured.
                    _ => Err(YncaError::Conversion {
                        function: function.to_string(),
                        message: format!("{value:?} is accepted by multiple converters"),
                    }),
                }
            }
        }
    }
}

/// Round `value` to the nearest multiple of `step` and render it with the
/// minimal precision that still represents the result exactly. A 0.5 grid
/// renders whole values without a decimal point and half values with one
/// decimal digit.
fn render_stepped(value: f64, step: f64) -> String {
    let mut stepped = (value / step).round() * step;
    if stepped == 0.0 {
        stepped = 0.0; // collapse negative zero
    }
    for decimals in 0..=3 {
        let rendered = format!("{stepped:.decimals$}");
        if rendered
            .parse::<f64>()
            .is_ok_and(|parsed| (parsed - stepped).abs() < 1e-9)
        {
            return rendered;
        }
    }
    format!("{stepped}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InitVolLvl, Pwr};

    const VOL: Converter = Converter::Float(FloatCodec::HALF_DB);

    #[test]
    fn float_rounds_onto_grid() {
        let cases = [
            (0.3, "0.5"),
            (0.0, "0"),
            (-0.2, "0"),
            (-24.0, "-24"),
            (-24.26, "-24.5"),
            (16.5, "16.5"),
        ];
        for (input, expected) in cases {
            assert_eq!(
                VOL.to_wire("VOL", &Value::Float(input)).unwrap(),
                expected,
                "input {input}"
            );
        }
    }

    #[test]
    fn float_rounding_is_idempotent() {
        for v in [-80.5, -33.3, -0.24, 0.26, 7.75, 16.49] {
            let once = VOL.to_wire("VOL", &Value::Float(v)).unwrap();
            let parsed = match VOL.from_wire("VOL", &once).unwrap() {
                Value::Float(f) => f,
                other => panic!("unexpected {other:?}"),
            };
            let twice = VOL.to_wire("VOL", &Value::Float(parsed)).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn float_step_grids() {
        let am = Converter::Float(FloatCodec { step: 10.0 });
        assert_eq!(am.to_wire("AMFREQ", &Value::Float(1008.0)).unwrap(), "1010");

        let fm = Converter::Float(FloatCodec { step: 0.05 });
        assert_eq!(fm.to_wire("FMFREQ", &Value::Float(101.12)).unwrap(), "101.1");
    }

    #[test]
    fn float_rejects_non_numbers() {
        assert!(VOL.from_wire("VOL", "loud").is_err());
        assert!(VOL.to_wire("VOL", &Value::Str("loud".into())).is_err());
    }

    #[test]
    fn enum_roundtrip_and_strictness() {
        let conv = Converter::Enum(Pwr::CODEC);
        assert_eq!(
            conv.from_wire("PWR", "Standby").unwrap(),
            Value::Pwr(Pwr::Standby)
        );
        assert_eq!(
            conv.to_wire("PWR", &Value::Pwr(Pwr::On)).unwrap(),
            "On"
        );
        assert!(conv.from_wire("PWR", "standby").is_err());
        assert!(conv.to_wire("PWR", &Value::Float(1.0)).is_err());
    }

    #[test]
    fn str_enforces_bounds_on_send_only() {
        let conv = Converter::Str(StrCodec::max(9));
        assert_eq!(
            conv.to_wire("ZONENAME", &Value::Str("Kitchen".into())).unwrap(),
            "Kitchen"
        );
        assert!(conv
            .to_wire("ZONENAME", &Value::Str("Livingroom".into()))
            .is_err());
        // receive side is identity, even past the bound
        assert_eq!(
            conv.from_wire("ZONENAME", "Unreasonably long").unwrap(),
            Value::Str("Unreasonably long".into())
        );
    }

    #[test]
    fn multi_tries_in_order() {
        const CHAIN: Converter = Converter::Multi(&[
            Converter::Enum(InitVolLvl::CODEC),
            Converter::Float(FloatCodec::HALF_DB),
        ]);

        assert_eq!(
            CHAIN.from_wire("INITVOLLVL", "Mute").unwrap(),
            Value::InitVolLvl(InitVolLvl::Mute)
        );
        assert_eq!(
            CHAIN.from_wire("INITVOLLVL", "-20.0").unwrap(),
            Value::Float(-20.0)
        );
        assert!(CHAIN.from_wire("INITVOLLVL", "Loudish").is_err());

        assert_eq!(
            CHAIN
                .to_wire("INITVOLLVL", &Value::InitVolLvl(InitVolLvl::Off))
                .unwrap(),
            "Off"
        );
        assert_eq!(
            CHAIN.to_wire("INITVOLLVL", &Value::Float(-20.3)).unwrap(),
            "-20.5"
        );
        assert!(CHAIN.to_wire("INITVOLLVL", &Value::Str("x".into())).is_err());
    }

    #[test]
    fn multi_rejects_ambiguous_chains() {
        const AMBIGUOUS: Converter = Converter::Multi(&[
            Converter::Float(FloatCodec::HALF_DB),
            Converter::Float(FloatCodec { step: 1.0 }),
        ]);
        assert!(AMBIGUOUS.to_wire("X", &Value::Float(1.0)).is_err());
    }
}
