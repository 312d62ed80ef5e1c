//! YNCA wire format.
//!
//! Outbound commands are ASCII lines `@SUBUNIT:FUNCTION=VALUE` terminated
//! with CRLF; a GET uses `?` as the value. Inbound traffic is either a
//! value report in the same shape or a bare status token (`@UNDEFINED`,
//! `@RESTRICTED`, `@ERROR`). Bare tokens carry no address, so they are
//! attributed to the most recently transmitted command.

use std::fmt;

use crate::types::SubunitId;

/// Line terminator used by the protocol.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Value that turns a command into a GET.
const GET_VALUE: &str = "?";

/// One outbound protocol command.
///
/// `value = None` encodes a GET; a present value encodes a PUT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub subunit: SubunitId,
    pub function: String,
    pub value: Option<String>,
}

impl Command {
    /// Create a GET command.
    pub fn get(subunit: SubunitId, function: impl Into<String>) -> Self {
        Self {
            subunit,
            function: function.into(),
            value: None,
        }
    }

    /// Create a PUT command.
    pub fn put(
        subunit: SubunitId,
        function: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            subunit,
            function: function.into(),
            value: Some(value.into()),
        }
    }

    /// Render the command as a wire line, including the terminator.
    pub fn encode(&self) -> String {
        format!(
            "@{}:{}={}{}",
            self.subunit,
            self.function,
            self.value.as_deref().unwrap_or(GET_VALUE),
            LINE_TERMINATOR
        )
    }
}

/// Classification of a device reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// A value report; the only status that updates cached state.
    Ok,
    /// The function does not exist on this device or subunit.
    Undefined,
    /// The function exists but cannot be used right now.
    Restricted,
    /// The device considered the request malformed.
    Error,
    /// An unrecognized bare status token.
    Other,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Ok => "OK",
            Status::Undefined => "UNDEFINED",
            Status::Restricted => "RESTRICTED",
            Status::Error => "ERROR",
            Status::Other => "OTHER",
        };
        f.write_str(s)
    }
}

/// One parsed inbound line.
///
/// Subunit and function are kept as raw strings; devices report functions
/// the catalog does not know about and those still flow through dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolEvent {
    pub status: Status,
    pub subunit: String,
    pub function: String,
    pub value: String,
}

/// Parse one inbound line (without its terminator).
///
/// `last_sent` is the `(subunit, function)` of the most recently transmitted
/// command; bare status tokens are attributed to it. Returns `None` for
/// lines that are not part of the protocol; the caller logs and drops those.
pub fn parse_line(line: &str, last_sent: Option<&(String, String)>) -> Option<ProtocolEvent> {
    let body = line.strip_prefix('@')?;

    if let Some((address, value)) = body.split_once('=') {
        let (subunit, function) = address.split_once(':')?;
        if subunit.is_empty() || function.is_empty() {
            return None;
        }
        return Some(ProtocolEvent {
            status: Status::Ok,
            subunit: subunit.to_string(),
            function: function.to_string(),
            value: value.to_string(),
        });
    }

    // Bare status token; no address of its own.
    let status = match body {
        "UNDEFINED" => Status::Undefined,
        "RESTRICTED" => Status::Restricted,
        "ERROR" => Status::Error,
        token if !token.is_empty() && token.chars().all(|c| c.is_ascii_uppercase()) => {
            Status::Other
        }
        _ => return None,
    };

    let (subunit, function) = match last_sent {
        Some((subunit, function)) => (subunit.clone(), function.clone()),
        None => (String::new(), String::new()),
    };

    Some(ProtocolEvent {
        status,
        subunit,
        function,
        value: String::new(),
    })
}
