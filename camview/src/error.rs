//! Stable error codes shared by every module's error type.
//!
//! Each module owns its own `thiserror` enum; this trait maps them onto the
//! failure taxonomy the host reports (`E_SOURCE_UNAVAILABLE`, ...), so log
//! lines and control-channel replies stay greppable regardless of which
//! module produced the error.

/// Map an error value to a stable, machine-readable code.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;
}
