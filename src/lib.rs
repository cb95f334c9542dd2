#![forbid(unsafe_code)]

pub mod api;
pub mod cli;
pub mod commands;
pub mod content;
pub mod extract;
pub mod listing;
pub mod logging;
pub mod preview;
pub mod records;
