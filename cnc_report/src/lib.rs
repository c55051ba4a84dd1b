//! # CNC Report
//!
//! Telemetry and configuration disclosure layer of a CNC motion controller.
//! Turns live machine state into the line-oriented text protocol read by
//! host software, and exposes the settings, setting groups, alarm and error
//! tables of the controller core and its plugins on the same stream.
//!
//! ## Components
//!
//! 1. **Value formatter / line assembler** (`format`, `line`): unit-aware
//!    axis values in a fixed-capacity scratch buffer.
//! 2. **Status report generator** (`status`): `<STATE|MPos:...>` lines with
//!    adaptive refresh of the WCO and override fields.
//! 3. **Catalog enumerator** (`catalog`): merged, filtered and sorted
//!    setting, group, alarm and error listings across a registry chain.
//! 4. **Hook chains** (`hooks`): ordered extension handlers for plugins.
//!
//! ## No Heap On The Status Path
//!
//! The status generator composes every field in a `heapless` buffer. Only
//! catalog listings allocate, and they degrade to an unsorted walk when the
//! allocation fails.

pub mod bitfield;
pub mod catalog;
pub mod core_settings;
pub mod format;
pub mod hooks;
pub mod line;
pub mod messages;
pub mod ngc;
pub mod status;
pub mod stream;
