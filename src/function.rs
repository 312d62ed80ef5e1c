use crate::converter::Converter;

/// Which commands a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Readable only; a PUT is rejected before it reaches the transport.
    Get,
    /// Readable and writable.
    GetPut,
}

/// Binds one protocol function name to one typed attribute of a subunit.
///
/// Descriptors are declared once per subunit type as a `static` table and
/// shared by every instance; the current value lives in the owning subunit,
/// keyed by function name. A descriptor with an `init` group is populated by
/// a single shared GET for that group instead of one GET per function, which
/// is the main way to keep initialization fast on a ~100 ms per-command link.
#[derive(Debug, Clone, Copy)]
pub struct FunctionDescriptor {
    /// Protocol function name, e.g. `VOL`.
    pub name: &'static str,
    /// GET-only or GET and PUT.
    pub access: Access,
    /// Conversion between wire strings and typed values.
    pub converter: Converter,
    /// Initialization group. `None` means `initialize()` GETs the function
    /// by its own name.
    pub init: Option<&'static str>,
}

impl FunctionDescriptor {
    /// The GET issued during initialization to populate this descriptor.
    pub fn init_command(&self) -> &'static str {
        self.init.unwrap_or(self.name)
    }
}
