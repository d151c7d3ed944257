//! Valid-ready handshake signals.
//!
//! A transfer is accepted on an interface iff `valid` and `ready` are both
//! asserted in the same cycle. Neither side may retract an assertion based
//! on the other side's same-cycle signal; see [`crate::module::Module`] for
//! the evaluation rules.

use crate::signal::Signal;

/// Forward half of a valid-ready interface: a value and its validity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Valid<V: Signal> {
    /// Inner data. Meaningful only while `valid` is asserted.
    pub inner: V,
    /// Valid bit.
    pub valid: bool,
}

impl<V: Signal> Signal for Valid<V> {
    const WIDTH: usize = V::WIDTH + 1;
}

impl<V: Signal> Valid<V> {
    /// Creates a new signal.
    pub fn new(valid: bool, inner: V) -> Self {
        Self { inner, valid }
    }

    /// Creates an invalid signal.
    pub fn invalid() -> Self {
        Self::default()
    }

    /// Creates a valid signal.
    pub fn valid(inner: V) -> Self {
        Self { inner, valid: true }
    }

    /// Maps the inner value, preserving validity.
    pub fn map_inner<W: Signal>(self, f: impl FnOnce(V) -> W) -> Valid<W> {
        Valid { inner: f(self.inner), valid: self.valid }
    }

    /// Returns whether a transfer fires this cycle. (fire: valid & ready)
    pub fn fire(self, ready: Ready) -> bool {
        self.valid && ready.ready
    }

    /// Returns the inner value if valid.
    pub fn transfer(self) -> Option<V> {
        self.valid.then_some(self.inner)
    }
}

/// Backward half of a valid-ready interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ready {
    /// Ready bit.
    pub ready: bool,
}

impl Signal for Ready {
    const WIDTH: usize = 1;
}

impl Ready {
    /// Creates a new signal.
    pub fn new(ready: bool) -> Self {
        Self { ready }
    }

    /// An asserted ready signal.
    pub fn asserted() -> Self {
        Self { ready: true }
    }
}
