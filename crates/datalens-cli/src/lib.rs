//! Library side of the `datalens` command-line tool.

pub mod commands;
pub mod logging;
pub mod render;
