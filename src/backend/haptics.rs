//! [`HapticSink`] implementations.

use crate::traits::HapticSink;
use log::trace;

/// Haptics for machines without a vibration motor: every pulse is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl HapticSink for NoHaptics {
    fn pulse(&self, duration_ms: u64) {
        trace!("haptic pulse {}ms (no hardware)", duration_ms);
    }
}
