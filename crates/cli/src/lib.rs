//! Interactive command-line front end for the retouch editor.

pub mod commands;
pub mod config;
pub mod session;
