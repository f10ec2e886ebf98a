//! Type-erased handle to a navigation stack composed beneath a coordinator.

use std::fmt;
use std::sync::Arc;

use super::navigator::Navigator;
use super::stack::NavigationStack;

/// The operations a parent may perform on a child stack without knowing
/// its destination type.
pub trait StackHandle: Send + Sync {
    fn depth(&self) -> usize;

    /// Returns the number of frames popped.
    fn pop_to_root(&self) -> usize;

    fn platform_popped_to(&self, len: usize) -> bool;
}

impl<N: Navigator> StackHandle for NavigationStack<N> {
    fn depth(&self) -> usize {
        NavigationStack::depth(self)
    }

    fn pop_to_root(&self) -> usize {
        NavigationStack::pop_to_root(self).popped.len()
    }

    fn platform_popped_to(&self, len: usize) -> bool {
        NavigationStack::platform_popped_to(self, len)
    }
}

/// A child navigation stack, compared by identity.
#[derive(Clone)]
pub struct ChildStack(Arc<dyn StackHandle>);

impl ChildStack {
    pub fn new<N: Navigator>(stack: Arc<NavigationStack<N>>) -> Self {
        Self(stack)
    }

    pub fn depth(&self) -> usize {
        self.0.depth()
    }

    /// Pop every frame. Returns how many were popped.
    pub fn pop_to_root(&self) -> usize {
        self.0.pop_to_root()
    }

    pub fn platform_popped_to(&self, len: usize) -> bool {
        self.0.platform_popped_to(len)
    }

    /// Whether this handle refers to `stack`.
    pub fn is<N: Navigator>(&self, stack: &Arc<NavigationStack<N>>) -> bool {
        self.addr() == Arc::as_ptr(stack).cast::<()>()
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0).cast::<()>()
    }
}

impl PartialEq for ChildStack {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for ChildStack {}

impl fmt::Debug for ChildStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildStack")
            .field("depth", &self.depth())
            .finish()
    }
}
