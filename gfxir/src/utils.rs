use strum::{EnumIs, EnumTryAs};
use thiserror::Error;

use crate::module::FunctionRef;

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs, Error)]
pub enum Error {
    /// A user metadata name collides with one of the reserved roots.
    #[error(
        "The metadata name `{name}` is reserved for compiler-owned facts and cannot be read or written through the user metadata interface."
    )]
    ReservedMetadataName { name: String },

    /// The function handle does not resolve in this module.
    #[error(
        "The function `{function}` is not defined within the module. It may have been removed or belong to another module."
    )]
    UndefinedFunction { function: FunctionRef },

    /// A function with the same name is already defined.
    #[error("A function named `{0}` is already defined within the module.")]
    FunctionNameAlreadyExists(String),
}
