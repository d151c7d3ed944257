//! Values carried on wires.

use std::fmt;

use static_assertions::assert_impl_all;
use thiserror::Error;

/// Widest supported [`Bits`] signal. Payloads are stored in a `u64`.
pub const MAX_WIDTH: usize = 64;

/// Signal width mismatch errors.
#[derive(Debug, Error)]
pub enum SignalError {
    /// The value does not fit in the declared bit width.
    #[error("value {value:#x} does not fit in {width} bits")]
    Oversized {
        /// Offending value.
        value: u64,
        /// Declared bit width.
        width: usize,
    },
}

/// A value transported by an interface in one cycle.
///
/// The `Default` value of a signal is its quiescent value (invalid, not
/// ready, zero). The simulator drives quiescent inputs during a reset cycle.
pub trait Signal: 'static + Copy + fmt::Debug + Default + PartialEq {
    /// Bit width of the signal.
    const WIDTH: usize;
}

impl Signal for () {
    const WIDTH: usize = 0;
}

impl Signal for bool {
    const WIDTH: usize = 1;
}

/// Fixed-width unsigned integer signal.
///
/// Arithmetic wraps around at `W` bits. The width is a storage sizing
/// concern only; it has no effect on any state machine built over it.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bits<const W: usize>(u64);

impl<const W: usize> Bits<W> {
    /// All-ones value at this width.
    pub const MAX: u64 = {
        assert!(W >= 1 && W <= MAX_WIDTH, "unsupported bit width");
        if W == MAX_WIDTH {
            u64::MAX
        } else {
            (1u64 << W) - 1
        }
    };

    /// Creates a value, truncating to `W` bits.
    pub fn new(value: u64) -> Self {
        Self(value & Self::MAX)
    }

    /// Creates a value, failing if it does not fit in `W` bits.
    pub fn try_new(value: u64) -> Result<Self, SignalError> {
        if value > Self::MAX {
            return Err(SignalError::Oversized { value, width: W });
        }
        Ok(Self(value))
    }

    /// Returns the inner value.
    pub fn value(self) -> u64 {
        self.0
    }

    /// Returns whether the value is all-ones.
    pub fn is_max(self) -> bool {
        self.0 == Self::MAX
    }

    /// Increments by one, wrapping around at `W` bits.
    #[must_use]
    pub fn wrapping_incr(self) -> Self {
        Self::new(self.0.wrapping_add(1))
    }
}

impl<const W: usize> Signal for Bits<W> {
    const WIDTH: usize = W;
}

impl<const W: usize> From<u64> for Bits<W> {
    fn from(value: u64) -> Self {
        assert!(value <= Self::MAX, "value {:#x} does not fit in {} bits", value, W);
        Self(value)
    }
}

impl<const W: usize> fmt::Debug for Bits<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl<const W: usize> fmt::Display for Bits<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Occupancy-tagged value: an empty slot or a held signal.
impl<V: Signal> Signal for Option<V> {
    const WIDTH: usize = V::WIDTH + 1;
}

assert_impl_all!(Bits<MAX_WIDTH>: Signal);
assert_impl_all!(Option<Bits<8>>: Signal);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_wraps() {
        assert_eq!(Bits::<8>::new(0x1ff).value(), 0xff);
        assert_eq!(Bits::<8>::new(0x100).value(), 0);
    }

    #[test]
    fn try_new_rejects_oversized() {
        assert!(Bits::<4>::try_new(0xf).is_ok());
        assert!(matches!(Bits::<4>::try_new(0x10), Err(SignalError::Oversized { value: 0x10, width: 4 })));
    }

    #[test]
    fn wrapping_incr_wraps_at_width() {
        let max = Bits::<3>::new(Bits::<3>::MAX);
        assert!(max.is_max());
        assert_eq!(max.wrapping_incr().value(), 0);
        assert_eq!(Bits::<3>::new(2).wrapping_incr().value(), 3);
    }

    #[test]
    fn full_width_max() {
        assert_eq!(Bits::<64>::MAX, u64::MAX);
    }
}
