//! Logger initialization.
//!
//! The crate logs through the `log` facade. Applications install whatever
//! backend they like; [`init_logging`] sets up `env_logger` for native
//! builds.

mod init;

pub use init::{init_logging, LogStyle, LoggingConfig};
