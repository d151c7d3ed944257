//! Counter modules.

use flowsim::{Bits, Module, Signal, Uni};

/// Registered outputs of a [`Counter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterOutput<const W: usize> {
    /// Current count.
    pub count: Bits<W>,
    /// Wraparound flag. Pulses for exactly one cycle, the cycle the count
    /// wraps to zero.
    pub overflow: bool,
}

impl<const W: usize> Signal for CounterOutput<W> {
    const WIDTH: usize = W + 1;
}

/// Synchronous up-counter with enable gating and overflow detection.
///
/// While enabled, the count advances by one per cycle and wraps at
/// `2^W - 1`. While disabled, the count holds and `overflow` is deasserted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Counter<const W: usize>;

impl<const W: usize> Module for Counter<W> {
    type Egress = Uni<CounterOutput<W>>;
    type Ingress = Uni<bool>;
    type State = CounterOutput<W>;

    fn init(&self) -> CounterOutput<W> {
        CounterOutput::default()
    }

    fn step(&self, enable: bool, _o_bwd: (), state: &CounterOutput<W>) -> (CounterOutput<W>, (), CounterOutput<W>) {
        let state_next = if enable {
            CounterOutput { count: state.count.wrapping_incr(), overflow: state.count.is_max() }
        } else {
            CounterOutput { count: state.count, overflow: false }
        };
        (*state, (), state_next)
    }
}
