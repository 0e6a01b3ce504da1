//! Command-line front end for the Pagecraft upload queue.

pub mod cli;
pub mod commands;
pub mod output;
pub mod timing;
