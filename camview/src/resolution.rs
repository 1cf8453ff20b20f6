//! Resolution controller: device reconfiguration and proportional viewport rescale.
//!
//! DESIGN
//! ======
//! The candidate list is fixed at startup. Which option is highlighted is an
//! explicit `Option<Resolution>` here, never inferred from UI state. An
//! option the device refuses is marked unavailable for the rest of the
//! session; only a reconnect (a possibly different device) re-enables them.

#[cfg(test)]
#[path = "resolution_test.rs"]
mod resolution_test;

use tracing::{info, warn};

use crate::device::{FrameSource, SourceError};
use crate::error::ErrorCode;
use crate::viewport::{self, Resolution, ResolutionParseError, ViewportState};

#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("resolution {0} is not supported by the device")]
    Unsupported(Resolution),
    #[error("resolution {0} was disabled earlier this session")]
    Disabled(Resolution),
    #[error("resolution {0} is not one of the configured options")]
    UnknownOption(Resolution),
    #[error(transparent)]
    Source(SourceError),
}

impl ErrorCode for ResolutionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unsupported(_) | Self::Disabled(_) => "E_UNSUPPORTED_RESOLUTION",
            Self::UnknownOption(_) => "E_UNKNOWN_RESOLUTION",
            Self::Source(e) => e.error_code(),
        }
    }
}

/// One selectable resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionOption {
    pub resolution: Resolution,
    pub available: bool,
}

/// Candidate resolutions parsed from `WIDTHxHEIGHT` strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolutionList {
    /// Sorted by `(width, height)`, no duplicates.
    pub options: Vec<Resolution>,
    /// The option marked with a leading `+`, if any.
    pub initial: Option<Resolution>,
}

impl ResolutionList {
    /// Parse `["800x600", "+1024x768", ...]`.
    ///
    /// When nothing carries a `+`, the first listed entry is the initial one.
    pub fn parse<S: AsRef<str>>(items: &[S]) -> Result<Self, ResolutionParseError> {
        let mut options = Vec::with_capacity(items.len());
        let mut initial = None;
        for item in items {
            let item = item.as_ref().trim();
            if let Some(rest) = item.strip_prefix('+') {
                let res: Resolution = rest.parse()?;
                initial = Some(res);
                options.push(res);
            } else {
                options.push(item.parse()?);
            }
        }
        let initial = initial.or_else(|| options.first().copied());
        options.sort_unstable();
        options.dedup();
        Ok(Self { options, initial })
    }
}

/// Tracks the options, the highlighted one and which are disabled.
#[derive(Debug, Clone)]
pub struct ResolutionController {
    options: Vec<ResolutionOption>,
    highlighted: Option<Resolution>,
}

impl ResolutionController {
    #[must_use]
    pub fn new(options: &[Resolution]) -> Self {
        Self {
            options: options.iter().map(|&resolution| ResolutionOption { resolution, available: true }).collect(),
            highlighted: None,
        }
    }

    #[must_use]
    pub fn options(&self) -> &[ResolutionOption] {
        &self.options
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<Resolution> {
        self.highlighted
    }

    #[must_use]
    pub fn is_available(&self, resolution: Resolution) -> bool {
        self.options.iter().any(|o| o.resolution == resolution && o.available)
    }

    /// Highlight whatever the device reports, without touching the device.
    pub fn sync_with_device(&mut self, device: Option<Resolution>) {
        self.highlighted = device;
    }

    /// Re-enable every option (after a reconnect).
    pub fn reset_availability(&mut self) {
        for option in &mut self.options {
            option.available = true;
        }
    }

    /// Ask the device for `resolution` and return the rescaled viewport.
    ///
    /// On failure nothing changes except that the option is disabled.
    pub fn change_resolution(
        &mut self,
        source: &mut dyn FrameSource,
        state: ViewportState,
        resolution: Resolution,
    ) -> Result<ViewportState, ResolutionError> {
        let Some(index) = self.options.iter().position(|o| o.resolution == resolution) else {
            return Err(ResolutionError::UnknownOption(resolution));
        };
        if !self.options[index].available {
            return Err(ResolutionError::Disabled(resolution));
        }

        match source.set_resolution(resolution) {
            Ok(()) => {
                let next = viewport::rescale_for_resolution(state, resolution);
                info!(
                    from = %state.frame_dims,
                    to = %resolution,
                    offset_x = next.offset_x,
                    offset_y = next.offset_y,
                    "resolution changed"
                );
                self.highlighted = Some(resolution);
                Ok(next)
            }
            Err(SourceError::UnsupportedResolution(_)) => {
                self.options[index].available = false;
                warn!(%resolution, "resolution not supported; option disabled");
                Err(ResolutionError::Unsupported(resolution))
            }
            Err(e) => Err(ResolutionError::Source(e)),
        }
    }
}
