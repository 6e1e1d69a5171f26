//! Command handlers, one module per command group.

pub mod history;
pub mod init;
pub mod maintenance;
pub mod misc;
pub mod timer;
pub mod watch;
