//! Shows text at the largest font size that fits a fixed display area.
//!
//! `layout` is the fitting engine. The remaining modules are the host around
//! it: configuration, the startup text source, render sinks, and the HTTP
//! endpoint that pushes new text to a running instance.

pub mod config;
pub mod display;
pub mod errors;
pub mod input;
pub mod layout;
pub mod render;
pub mod routes;
pub mod state;
