//! Minimal IR container used by the metadata layer.
//!
//! - [`module`]: modules, functions, globals and struct types addressed by
//!   stable handles.
//! - [`metadata`]: the generic metadata node tree and the named attachment
//!   store hanging off modules and functions.
pub mod metadata;
pub mod module;
pub mod utils;
