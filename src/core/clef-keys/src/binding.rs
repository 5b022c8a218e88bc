//! Algorithm bindings.
//!
//! An [`AlgorithmBinding`] ties one static cipher descriptor to one owned
//! [`KeyRegistry`]. Every operation entry point exposed to a host holds a
//! [`BindingRef`]; the binding (and every schedule still in its registry) is
//! released when the last reference goes away.

use std::ops::Deref;
use std::sync::{Arc, Weak};

use clef_cipher::CipherDescriptor;
use tracing::{debug, trace};

use crate::registry::KeyRegistry;

/// The live association of one cipher descriptor with one key registry.
pub struct AlgorithmBinding {
    descriptor: &'static dyn CipherDescriptor,
    registry: KeyRegistry,
}

impl AlgorithmBinding {
    /// Creates a binding with an empty registry.
    ///
    /// The returned `Arc` is the creator's own reference; entry points should
    /// each take a [`BindingRef`] via [`AlgorithmBinding::register_operation`].
    pub fn new(descriptor: &'static dyn CipherDescriptor) -> Arc<Self> {
        let name = descriptor.info().name;
        debug!(cipher = name, "Algorithm binding created");

        Arc::new(Self {
            descriptor,
            registry: KeyRegistry::new(name),
        })
    }

    /// Registers one more operation entry point against this binding.
    pub fn register_operation(self: &Arc<Self>) -> BindingRef {
        trace!(cipher = self.name(), "Operation registered");
        BindingRef {
            binding: Arc::clone(self),
        }
    }

    /// The cipher descriptor this binding dispatches to.
    pub fn descriptor(&self) -> &'static dyn CipherDescriptor {
        self.descriptor
    }

    /// The registry holding this algorithm's live key schedules.
    pub fn registry(&self) -> &KeyRegistry {
        &self.registry
    }

    /// Algorithm name.
    pub fn name(&self) -> &'static str {
        self.registry.algorithm()
    }

    /// Number of live key schedules.
    pub fn live_keys(&self) -> usize {
        self.registry.len()
    }
}

impl Drop for AlgorithmBinding {
    fn drop(&mut self) {
        let drained = self.registry.drain_all();
        debug!(cipher = self.name(), drained, "Algorithm binding released");
    }
}

impl std::fmt::Debug for AlgorithmBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmBinding")
            .field("cipher", &self.name())
            .field("registry", &self.registry)
            .finish()
    }
}

/// One operation entry point's reference to an [`AlgorithmBinding`].
///
/// Dropping it releases the operation; the binding drains its registry once
/// no reference remains.
#[derive(Debug)]
pub struct BindingRef {
    binding: Arc<AlgorithmBinding>,
}

impl BindingRef {
    /// Number of references currently keeping the binding alive.
    pub fn operation_count(&self) -> usize {
        Arc::strong_count(&self.binding)
    }

    /// Weak pointer for observing the binding without keeping it alive.
    pub fn downgrade(&self) -> Weak<AlgorithmBinding> {
        Arc::downgrade(&self.binding)
    }

    /// Releases this operation's reference.
    pub fn release(self) {
        drop(self);
    }
}

impl Deref for BindingRef {
    type Target = AlgorithmBinding;

    fn deref(&self) -> &Self::Target {
        &self.binding
    }
}

impl Drop for BindingRef {
    fn drop(&mut self) {
        trace!(
            cipher = self.binding.name(),
            remaining = Arc::strong_count(&self.binding) - 1,
            "Operation released"
        );
    }
}
