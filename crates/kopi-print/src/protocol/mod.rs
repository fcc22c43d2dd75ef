//! # ESC/POS Protocol
//!
//! Command builders and text encoding for ESC/POS thermal printers.
//!
//! - [`commands`] - byte builders for control sequences
//! - [`cp850`] - Unicode to Code Page 850 text encoding

pub mod commands;
pub mod cp850;
