//! Unread IMAP mail count for status bars.

pub mod bar;
pub mod client;
pub mod config;
pub mod eval;
pub mod output;
pub mod palette;
pub mod paths;
