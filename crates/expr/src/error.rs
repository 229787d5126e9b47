//! Error types for lazy array expressions and kernel assembly.

use symgrad_core::CoreError;
use thiserror::Error;

/// Errors raised while building lazy array expressions or kernels.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodegenError {
    /// A required kernel parameter was never supplied.
    #[error("Kernel parameter `{parameter}` was not set before build")]
    MissingParameter { parameter: &'static str },

    /// A 0-dimensional result has no loop domain.
    #[error("Cannot build a loop kernel for a 0-dimensional result")]
    ScalarKernel,

    /// Only placeholders can be subscripted.
    #[error("Subscript is only supported on placeholder arrays")]
    SubscriptOfExpression,

    #[error(transparent)]
    Core(#[from] CoreError),
}
