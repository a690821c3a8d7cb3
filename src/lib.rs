//! qute-script-manager library
//!
//! Tracks remote userscripts, compares them with the copies installed in
//! qutebrowser's greasemonkey directory and installs new versions.

pub mod commands;
pub mod config;
pub mod diff;
pub mod fetch;
pub mod logging;
pub mod report;
pub mod script;
