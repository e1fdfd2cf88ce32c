//! Opaque shared handles.
//!
//! A view's execution context and composer are caller-supplied values the
//! engine only passes along. They are compared by identity, never by value.

use std::any::Any;
use std::rc::Rc;

/// Reference-counted, type-erased value compared by identity
#[derive(Clone)]
pub struct Handle(Rc<dyn Any>);

impl Handle {
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    /// Whether both handles point at the same value
    pub fn ptr_eq(&self, other: &Handle) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl std::fmt::Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Handle({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}
