//! Built-in format handlers.

#[cfg(feature = "crunch")]
pub mod crn;
pub mod dds;
pub mod properties;
pub mod table;
pub mod tim2;

use crate::registry::FormatRegistry;

/// Registers every built-in handler. Handlers that recognise a magic come first and the
/// property bag fallback last, so ties resolve towards self-describing formats.
pub fn register_builtin_formats(registry: &mut FormatRegistry) {
    registry
        .register(dds::DdsDecoder)
        .register(tim2::Tim2Decoder);
    #[cfg(feature = "crunch")]
    registry.register(crn::CrnDecoder);
    registry.register(properties::PropertyBagDecoder);
}
