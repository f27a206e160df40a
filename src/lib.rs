//! **edgevol**: drag along a thin strip at the screen edge to change the
//! volume.
//!
//! Strips sit on an always-on-top overlay layer, anchored to the left
//! edge, the right edge, or both.  Dragging up raises the value, dragging
//! down lowers it; the value is a percentage in `[0, 100]` mapped onto the
//! output's level steps.
//!
//! # Architecture
//!
//! * [`slider::GestureSlider`] turns pointer samples on one strip into a
//!   bounded value.  It knows nothing about windows or other strips.
//! * [`coordinator::OverlayCoordinator`] owns one slider per edge, keeps
//!   the attached strips in line with the configuration (edges,
//!   sensitivity, master switch) and forwards value changes.
//!
//! The coordinator only talks to the outside world through the traits in
//! [`traits`]: a [`traits::SurfaceHost`] shows strips, a
//! [`traits::OutputSink`] sets the level, a [`traits::HapticSink`] gives
//! feedback, and [`traits::CommandSource`]s deliver requests.  Concrete
//! implementations live in [`overlay`] (layer-shell / headless),
//! [`backend`] (PipeWire, haptics) and [`ipc`] (Unix-socket commands).

pub mod backend;
pub mod command;
pub mod config;
pub mod coordinator;
pub mod geometry;
pub mod ipc;
pub mod overlay;
pub mod slider;
pub mod traits;
