pub mod commands;
pub mod format;
pub mod logging;
