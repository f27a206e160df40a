//! Core traits that decouple edgevol from any specific compositor, audio
//! stack, or transport mechanism.
//!
//! Every concrete backend (a layer-shell overlay, `wpctl`, a Unix-socket
//! listener, a test harness, …) implements one of these traits.  The
//! [`OverlayCoordinator`](crate::coordinator::OverlayCoordinator) only
//! depends on these abstractions.

use crate::command::{Command, Edge};
use crate::config::Channel;
use crate::geometry::{Placement, ScreenInfo};
use std::sync::mpsc;

/// Abstraction over whatever shows strips on screen and delivers their
/// input.
///
/// Each edge owns at most one surface, so the edge doubles as the surface
/// handle.
pub trait SurfaceHost {
    /// The error type produced by this host.
    type Error: std::error::Error + Send + 'static;

    /// Size of the screen strips are placed on.
    fn screen(&self) -> Result<ScreenInfo, Self::Error>;

    /// Show the surface for `edge` at `placement`.
    ///
    /// Attaching an edge that is already attached may fail; the caller
    /// treats that as harmless.
    fn attach(&self, edge: Edge, placement: &Placement) -> Result<(), Self::Error>;

    /// Remove the surface for `edge`.
    ///
    /// Detaching an edge that is not attached must succeed as a no-op.
    fn detach(&self, edge: Edge) -> Result<(), Self::Error>;

    /// Redraw the surface for `edge` showing `value`.
    ///
    /// Hosts without visuals can ignore this.
    fn render(&self, _edge: Edge, _value: f64) {}
}

/// The system output whose level the strips control.
pub trait OutputSink {
    /// The error type produced by this sink.
    type Error: std::error::Error + Send + 'static;

    /// Highest level `channel` accepts.
    fn max_level(&self, channel: Channel) -> Result<u32, Self::Error>;

    /// Set `channel` to `level` (`0..=max_level`).  `show_ui` asks the
    /// backend to display its own level indicator.
    fn set_level(&self, channel: Channel, level: u32, show_ui: bool) -> Result<(), Self::Error>;
}

/// Tactile feedback.
///
/// Fire-and-forget: implementations without hardware do nothing, and
/// failures are never reported.
pub trait HapticSink {
    fn pulse(&self, duration_ms: u64);
}

//  Command Source

/// A source of [`Command`]s.
///
/// Implementations listen on some transport (a Unix socket, a settings
/// front-end, a test harness) and forward parsed commands into the provided
/// [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received command must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Command`] into `sink`.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ConfigUpdate, EdgeSet};
    use std::cell::RefCell;

    //  Mock SurfaceHost

    #[derive(Debug, Default)]
    struct MockHost {
        attached: RefCell<Vec<Edge>>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    impl SurfaceHost for MockHost {
        type Error = MockError;

        fn screen(&self) -> Result<ScreenInfo, MockError> {
            Ok(ScreenInfo {
                width: 1080,
                height: 1920,
            })
        }

        fn attach(&self, edge: Edge, _placement: &Placement) -> Result<(), MockError> {
            if self.attached.borrow().contains(&edge) {
                return Err(MockError);
            }
            self.attached.borrow_mut().push(edge);
            Ok(())
        }

        fn detach(&self, edge: Edge) -> Result<(), MockError> {
            self.attached.borrow_mut().retain(|e| *e != edge);
            Ok(())
        }
    }

    #[test]
    fn mock_host_tracks_attachments() {
        let host = MockHost::default();
        let screen = host.screen().unwrap();
        let p = Placement::for_edge(Edge::Left, screen, 36, 0.6);
        host.attach(Edge::Left, &p).unwrap();
        assert!(host.attach(Edge::Left, &p).is_err());
        host.detach(Edge::Left).unwrap();
        host.detach(Edge::Left).unwrap();
        assert!(host.attached.borrow().is_empty());
        // Default render is a no-op.
        host.render(Edge::Left, 40.0);
    }

    //  Mock CommandSource

    struct MockSource {
        commands: Vec<Command>,
    }

    impl CommandSource for MockSource {
        type Error = MockError;

        fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), MockError> {
            for cmd in self.commands.drain(..) {
                let _ = sink.send(cmd);
            }
            Ok(())
        }
    }

    #[test]
    fn mock_source_emits_commands() {
        let mut src = MockSource {
            commands: vec![
                Command::Configure(ConfigUpdate::new().with_edges(EdgeSet::both())),
                Command::Shutdown,
            ],
        };
        let (tx, rx) = mpsc::channel();
        src.run(tx).unwrap();
        let cmds: Vec<Command> = rx.try_iter().collect();
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[1], Command::Shutdown);
    }
}
