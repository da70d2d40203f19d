//! Targets and target resolution.
//!
//! A target is an external, writable value slot. The engine reads it only to
//! resolve deferred start values and writes interpolated values into it; it
//! never owns it. Identity is the identity of the shared slot, so two
//! [`TargetRef`]s cloned from the same `Rc` are the same target.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use hashbrown::HashMap;

use crate::value::Value;

/// Writable value slot animated by the engine.
///
/// Methods take `&self`; implementors use interior mutability. The engine is
/// single-threaded, so `Cell`/`RefCell` are sufficient.
pub trait Target {
    /// Current live value.
    fn read(&self) -> Value;

    /// Store an interpolated value.
    fn write(&self, value: Value);

    /// Human readable name for logs.
    fn label(&self) -> Option<&str> {
        None
    }
}

/// Shared handle to a target.
pub type TargetRef = Rc<dyn Target>;

/// Identity of a target (address of its shared slot).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetKey(usize);

impl TargetKey {
    #[inline]
    pub fn of(target: &TargetRef) -> Self {
        TargetKey(Rc::as_ptr(target) as *const () as usize)
    }
}

/// Display helper for logging a target by label or identity.
pub(crate) struct TargetName<'a>(pub &'a TargetRef);

impl fmt::Display for TargetName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.label() {
            Some(label) => f.write_str(label),
            None => write!(f, "target@{:#x}", TargetKey::of(self.0).0),
        }
    }
}

/// Simple in-memory target.
#[derive(Debug, Default)]
pub struct ValueCell {
    label: Option<String>,
    value: RefCell<Value>,
    writes: Cell<usize>,
}

impl ValueCell {
    pub fn new(value: Value) -> Self {
        Self {
            label: None,
            value: RefCell::new(value),
            writes: Cell::new(0),
        }
    }

    pub fn named(label: impl Into<String>, value: Value) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::new(value)
        }
    }

    /// Shared handle, ready to be placed in key values.
    pub fn shared(label: impl Into<String>, value: Value) -> Rc<Self> {
        Rc::new(Self::named(label, value))
    }

    /// Current value (same as [`Target::read`]).
    pub fn get(&self) -> Value {
        self.value.borrow().clone()
    }

    /// Set the live value without counting it as an engine write.
    pub fn set(&self, value: Value) {
        *self.value.borrow_mut() = value;
    }

    /// Number of engine writes received so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl Target for ValueCell {
    fn read(&self) -> Value {
        self.get()
    }

    fn write(&self, value: Value) {
        *self.value.borrow_mut() = value;
        self.writes.set(self.writes.get() + 1);
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Trait for resolving target paths (as used in stored timelines) to targets.
pub trait TargetResolver {
    fn resolve(&mut self, path: &str) -> Option<TargetRef>;
}

/// Path-keyed table of targets.
#[derive(Default)]
pub struct TargetRegistry {
    targets: HashMap<String, TargetRef>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the target registered at `path`.
    pub fn insert(&mut self, path: impl Into<String>, target: TargetRef) {
        self.targets.insert(path.into(), target);
    }

    pub fn get(&self, path: &str) -> Option<&TargetRef> {
        self.targets.get(path)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl TargetResolver for TargetRegistry {
    fn resolve(&mut self, path: &str) -> Option<TargetRef> {
        self.targets.get(path).cloned()
    }
}

impl fmt::Debug for TargetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetRegistry")
            .field("paths", &self.targets.keys().collect::<Vec<_>>())
            .finish()
    }
}
