//! IPC listener that accepts commands over a Unix socket.
//!
//! A settings front-end (or a script) connects to the socket and sends
//! newline-delimited JSON commands.

pub mod listener;
