//! Typed compiler metadata for GPU shader and kernel compilation.
//!
//! Passes record what they learn about a module in a [`ModuleMetaData`], with
//! a [`FunctionMetaData`] per function. [`serialize`] attaches those facts to
//! the IR module so they survive across passes that only see the IR, and
//! [`deserialize`] reads them back, substituting defaults for anything missing
//! or malformed.
//!
//! The crate also hosts the pieces that consume the facts at the edges of the
//! pipeline: the sub-compiler [`loader`] and the kernel argument
//! [`annotations`] builder.

pub mod annotations;
pub mod codec;
pub mod loader;
pub mod magic;
pub mod queries;
pub mod schema;
pub mod serialize;
pub mod utils;

pub use schema::{FunctionMetaData, ModuleMetaData};
pub use serialize::{deserialize, serialize};
