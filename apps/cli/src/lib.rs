//! Library side of the `dreg` binary: argument definitions and command handlers.

#![allow(clippy::print_stdout)]

pub mod args;
pub mod handlers;
