//! Compiler Node groups data compilers and provides utilities required for data compilation.
//!
//! registry defines an interface between different compiler types
//! (executable, in-process, etc).

use core::fmt;
use std::sync::Arc;

mod binary_stub;
mod inproc_stub;

mod compiler_registry;
pub use compiler_registry::*;

use lgn_data_runtime::AssetRegistry;

/// A group of compilers with compilation utilities.
pub struct CompilerNode {
    compilers: CompilerRegistry,
    registry: Arc<AssetRegistry>,
}

impl CompilerNode {
    /// Creates a new `CompilerNode`.
    pub fn new(compilers: CompilerRegistry, registry: Arc<AssetRegistry>) -> Self {
        Self {
            compilers,
            registry,
        }
    }

    /// Access to all compilers.
    pub fn compilers(&self) -> &CompilerRegistry {
        &self.compilers
    }

    /// Access to `AssetRegistry` shared between compilers.
    pub fn registry(&self) -> Arc<AssetRegistry> {
        self.registry.clone()
    }
}

impl fmt::Debug for CompilerNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompilerNode")
            .field("compilers", &self.compilers)
            .finish()
    }
}
