//! Surface hosts that put strips on screen.
//!
//! [`headless::HeadlessHost`] is always available and only logs.  When the
//! `overlay-gtk` feature is enabled, [`gtk::run_main_loop`] takes over the
//! main thread and drives both command processing and strip rendering
//! through the GLib main loop.

pub mod headless;

#[cfg(feature = "overlay-gtk")]
pub mod gtk;
