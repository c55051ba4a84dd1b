//! CNC Common Library
//!
//! Shared types for the CNC reporting core: constants, configuration
//! loading, machine state, report dirty flags, protocol status codes and the
//! setting descriptor types contributed by the controller core and plugins.
//!
//! # Module Structure
//!
//! - [`consts`] - Axis, formatting and protocol constants
//! - [`config`] - Configuration loading traits and types
//! - [`state`] - Machine state enums and signal bitflags
//! - [`snapshot`] - Per-report machine and parser snapshot
//! - [`report_flags`] - Atomic report dirty flags
//! - [`status`] - Status, alarm and message codes
//! - [`settings`] - Setting, group and registry descriptors
//! - [`codes`] - Alarm and error code tables
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use cnc_common::prelude::*;
//!
//! let snapshot = MachineSnapshot::default();
//! assert_eq!(snapshot.state, MachineState::Idle);
//! ```

pub mod codes;
pub mod config;
pub mod consts;
pub mod prelude;
pub mod report_flags;
pub mod settings;
pub mod snapshot;
pub mod state;
pub mod status;
