//! Camera viewing core: digital pan/zoom, recording and the per-tick frame pipeline.
//!
//! The crate owns everything between a capture device and a display surface
//! except the device and the encoders themselves, which plug in through the
//! traits in [`device`]. A host (window toolkit, terminal loop, test) drives a
//! [`player::Player`] with pointer gestures, control commands and ticks, and
//! shows the RGBA image each tick returns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`player`] | Session object composing the controllers and the pipeline |
//! | [`pipeline`] | One tick: acquire, overlay, record, crop, fit, present |
//! | [`viewport`] | Zoom/pan state, crop rectangle and coordinate mapping |
//! | [`controller`] | Gesture-to-viewport controller with drag/click disambiguation |
//! | [`gesture`] | Pointer event types and the press/motion/release tracker |
//! | [`recording`] | Video recording state machine and the snapshot trigger |
//! | [`resolution`] | Device resolution switching and option bookkeeping |
//! | [`device`] | Frame source and sink capability traits |
//! | [`sink`] | Image-file snapshot sink and timestamped file names |
//! | [`frame`] | Raw frame and display image buffers |
//! | [`overlay`] | Crosshair overlays and the custom frame processor trait |
//! | [`error`] | Stable error codes shared by every module's error enum |
//! | [`consts`] | Shared numeric constants (zoom step, click threshold, etc.) |

pub mod consts;
pub mod controller;
pub mod device;
pub mod error;
pub mod frame;
pub mod gesture;
pub mod overlay;
pub mod pipeline;
pub mod player;
pub mod recording;
pub mod resolution;
pub mod sink;
pub mod viewport;

#[cfg(test)]
mod test_support;
