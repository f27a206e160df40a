//! Concrete output and feedback backends.
//!
//! This module provides implementations of the
//! [`OutputSink`](crate::traits::OutputSink) and
//! [`HapticSink`](crate::traits::HapticSink) traits for a desktop Linux
//! session.
//!
//! Nothing outside this module should reference PipeWire directly.

pub mod haptics;
pub mod wpctl;
