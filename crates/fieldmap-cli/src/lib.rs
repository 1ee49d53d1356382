//! Library side of the `fieldmap` command.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
