//! Unix-socket [`CommandSource`] implementation.
//!
//! Binds a Unix stream socket and accepts one connection at a time.
//! Each line received is parsed as a JSON-encoded [`Command`].
//!
//! # Wire format
//!
//! Every message is a single line of JSON followed by `\n`:
//!
//! ```json
//! {"Configure":{"sensitivity":80,"active_edges":["left","right"]}}
//! {"Configure":{"enabled":false}}
//! {"Pointer":{"edge":"left","event":{"Down":{"x":18,"y":300}}}}
//! {"SyncValue":40}
//! "Shutdown"
//! ```

use crate::command::Command;
use crate::traits::CommandSource;
use log::{debug, error, info};
use std::io::{BufRead, BufReader};
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// A [`CommandSource`] that listens on a Unix stream socket for
/// JSON-encoded commands.
///
/// Each accepted connection can send multiple newline-delimited JSON
/// commands.  When the connection closes, the listener waits for the
/// next one.
pub struct UnixSocketListener {
    path: PathBuf,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl UnixSocketListener {
    /// Create a new listener bound to `path`.
    ///
    /// The socket file is created when [`run`](CommandSource::run) is called.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The filesystem path of the socket.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CommandSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and start accepting connections.
    ///
    /// This method **blocks** until the sink is closed.  Run it on a
    /// dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error> {
        // Remove stale socket if present.
        let _ = std::fs::remove_file(&self.path);

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    debug!("client connected");
                    let reader = BufReader::new(stream);
                    for line in reader.lines() {
                        match line {
                            Ok(ref text) if text.trim().is_empty() => continue,
                            Ok(text) => match serde_json::from_str::<Command>(&text) {
                                Ok(cmd) => {
                                    debug!("received {:?}", cmd);
                                    if sink.send(cmd).is_err() {
                                        info!("sink closed, shutting down");
                                        let _ = std::fs::remove_file(&self.path);
                                        return Ok(());
                                    }
                                }
                                Err(e) => {
                                    error!("bad command: {} ({})", text, e);
                                }
                            },
                            Err(e) => {
                                error!("read error: {}", e);
                                break;
                            }
                        }
                    }
                    debug!("client disconnected");
                }
                Err(e) => {
                    error!("accept error: {}", e);
                }
            }
        }
        Ok(())
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ConfigUpdate, Edge, EdgeSet, PointerEvent};
    use std::io::Write;
    use std::os::unix::net::UnixStream;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Monotonic counter to generate unique socket paths per test.
    static TEST_ID: AtomicU32 = AtomicU32::new(0);

    fn tmp_socket_path() -> PathBuf {
        let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!("edgevol-test-{}-{}.sock", std::process::id(), id))
    }

    fn spawn_listener(path: &Path) -> mpsc::Receiver<Command> {
        let (tx, rx) = mpsc::channel();
        let path = path.to_path_buf();
        std::thread::spawn(move || {
            let mut listener = UnixSocketListener::new(&path);
            let _ = listener.run(tx);
        });
        // Give the listener a moment to bind.
        std::thread::sleep(std::time::Duration::from_millis(150));
        rx
    }

    #[test]
    fn round_trip_commands_over_socket() {
        let path = tmp_socket_path();
        let rx = spawn_listener(&path);

        {
            let mut stream = UnixStream::connect(&path).expect("connect");
            writeln!(stream, r#"{{"Configure":{{"active_edges":"both","sensitivity":80}}}}"#).unwrap();
            writeln!(stream).unwrap();
            writeln!(
                stream,
                r#"{{"Pointer":{{"edge":"right","event":{{"Down":{{"x":18,"y":300}}}}}}}}"#
            )
            .unwrap();
            writeln!(stream, r#""Shutdown""#).unwrap();
            stream.shutdown(std::net::Shutdown::Write).unwrap();
        }

        std::thread::sleep(std::time::Duration::from_millis(150));
        let cmds: Vec<Command> = rx.try_iter().collect();

        assert_eq!(cmds.len(), 3);
        assert_eq!(
            cmds[0],
            Command::Configure(
                ConfigUpdate::new()
                    .with_edges(EdgeSet::both())
                    .with_sensitivity(80.0)
            )
        );
        assert_eq!(
            cmds[1],
            Command::Pointer {
                edge: Edge::Right,
                event: PointerEvent::Down { x: 18.0, y: 300.0 },
            }
        );
        assert_eq!(cmds[2], Command::Shutdown);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn malformed_and_invalid_lines_are_skipped() {
        let path = tmp_socket_path();
        let rx = spawn_listener(&path);

        {
            let mut stream = UnixStream::connect(&path).expect("connect");
            writeln!(stream, "not json at all").unwrap();
            writeln!(stream, r#"{{"Configure":{{"active_edges":["top"]}}}}"#).unwrap();
            writeln!(stream, r#"{{"SyncValue":40}}"#).unwrap();
            stream.shutdown(std::net::Shutdown::Write).unwrap();
        }

        std::thread::sleep(std::time::Duration::from_millis(150));
        let cmds: Vec<Command> = rx.try_iter().collect();
        assert_eq!(cmds, vec![Command::SyncValue(40.0)]);

        let _ = std::fs::remove_file(&path);
    }
}
