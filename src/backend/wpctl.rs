//! [`OutputSink`] implementation backed by PipeWire's `wpctl`.
//!
//! Levels are discrete steps `0..=max_level`; each step is written as a
//! linear volume fraction to the default sink (media) or default source
//! (capture):
//!
//! ```text
//! wpctl set-volume @DEFAULT_AUDIO_SINK@ 0.733
//! ```

use crate::config::Channel;
use crate::traits::OutputSink;
use log::debug;
use std::process::Command;

/// PipeWire-backed output.
///
/// `wpctl` has no on-screen indicator of its own, so the `show_ui` flag is
/// only logged.
#[derive(Debug, Clone)]
pub struct WpctlOutput {
    program: String,
    max_level: u32,
}

/// Errors that can occur when running `wpctl`.
#[derive(Debug, thiserror::Error)]
#[error("wpctl error: {0}")]
pub struct WpctlError(String);

impl WpctlOutput {
    /// Create a sink exposing `max_level` steps.
    pub fn new(max_level: u32) -> Self {
        Self::with_program("wpctl", max_level)
    }

    /// Like [`new`](Self::new) but runs `program` instead of `wpctl`.
    pub fn with_program(program: impl Into<String>, max_level: u32) -> Self {
        Self {
            program: program.into(),
            max_level: max_level.max(1),
        }
    }
}

/// The PipeWire node alias for `channel`.
fn target(channel: Channel) -> &'static str {
    match channel {
        Channel::Media => "@DEFAULT_AUDIO_SINK@",
        Channel::Capture => "@DEFAULT_AUDIO_SOURCE@",
    }
}

/// Arguments for `wpctl` that set `channel` to `level / max_level`.
fn set_volume_args(channel: Channel, level: u32, max_level: u32) -> Vec<String> {
    let fraction = level.min(max_level) as f64 / max_level as f64;
    vec![
        "set-volume".to_string(),
        target(channel).to_string(),
        format!("{:.3}", fraction),
    ]
}

impl OutputSink for WpctlOutput {
    type Error = WpctlError;

    fn max_level(&self, _channel: Channel) -> Result<u32, WpctlError> {
        Ok(self.max_level)
    }

    fn set_level(&self, channel: Channel, level: u32, show_ui: bool) -> Result<(), WpctlError> {
        let args = set_volume_args(channel, level, self.max_level);
        debug!("{} {} (show_ui={})", self.program, args.join(" "), show_ui);
        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|e| WpctlError(format!("spawn {}: {}", self.program, e)))?;
        if !status.success() {
            return Err(WpctlError(format!("{} exited with {}", self.program, status)));
        }
        Ok(())
    }
}
