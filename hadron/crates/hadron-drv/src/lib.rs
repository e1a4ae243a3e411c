//! hadron-drv - Driver for the Hadron pipeline
//!
//! Wires the phases together behind the `hadronc` binary: command-line
//! parsing, `hadron.toml` configuration, tracing setup, and the
//! [`Session`] that compiles sources, runs `.hbc` files and hosts the REPL.
//!
//! # Module Structure
//!
//! - [`cli`] - clap definition of the command line
//! - [`config`] - `hadron.toml` lookup and validation
//! - [`logging`] - tracing subscriber installation
//! - [`session`] - per-unit driving and error reporting
//! - [`error`] - driver errors
//!
//! # Example
//!
//! ```
//! use hadron_drv::{Options, Session};
//!
//! let mut session = Session::new(Options::default(), Vec::new(), Vec::new());
//! assert!(session.repl("(1 + 2) * 3\n".as_bytes()).unwrap());
//! let (out, _) = session.into_streams();
//! assert_eq!(out, b"> 9\n> \n");
//! ```

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;

pub use cli::Cli;
pub use config::{Config, ConfigError};
pub use error::{DriverError, DriverResult};
pub use session::{Options, Session};
