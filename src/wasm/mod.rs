//! WebAssembly bindings for the CIA1 port core.
//!
//! This module provides JavaScript-callable interfaces for driving the
//! keyboard matrix and joysticks and for accessing the port registers from
//! a browser front end.

#[cfg(feature = "wasm")]
pub mod api;

#[cfg(feature = "wasm")]
pub use api::KeyboardPorts;
