//! Synchronous modules.
//!
//! A module is a state machine evaluated exactly once per cycle. The
//! transition function is pure: it reads a consistent snapshot of the
//! current state and this cycle's inputs, and produces this cycle's outputs
//! together with the next state. No intra-cycle feedback is possible, so a
//! module's backward output (e.g. its ingress `ready`) can never depend on
//! its own same-cycle forward input. This is what lets a buffer built here
//! break a combinational path without dropping throughput.

use std::fmt;
use std::fmt::Debug;
use std::marker::PhantomData;

use crate::interface::Interface;

/// Ingress forward signal of a module.
pub type IFwd<M> = <<M as Module>::Ingress as Interface>::Fwd;
/// Ingress backward signal of a module.
pub type IBwd<M> = <<M as Module>::Ingress as Interface>::Bwd;
/// Egress forward signal of a module.
pub type OFwd<M> = <<M as Module>::Egress as Interface>::Fwd;
/// Egress backward signal of a module.
pub type OBwd<M> = <<M as Module>::Egress as Interface>::Bwd;

/// A synchronous module with one ingress and one egress interface.
pub trait Module {
    /// Ingress interface.
    type Ingress: Interface;
    /// Egress interface.
    type Egress: Interface;
    /// Architectural state.
    type State: 'static + Clone + Debug + PartialEq;

    /// Returns the state after reset.
    fn init(&self) -> Self::State;

    /// Computes one cycle: this cycle's outputs and the next state.
    ///
    /// `i_fwd` is the ingress forward input and `o_bwd` the egress backward
    /// input for this cycle. The returned `(o_fwd, i_bwd)` are the egress
    /// forward and ingress backward outputs for the same cycle.
    fn step(&self, i_fwd: IFwd<Self>, o_bwd: OBwd<Self>, state: &Self::State) -> (OFwd<Self>, IBwd<Self>, Self::State);
}

/// A module described by an initial state and a transition closure.
pub struct Fsm<I: Interface, O: Interface, S, F> {
    init: S,
    f: F,
    _marker: PhantomData<fn() -> (I, O)>,
}

impl<I: Interface, O: Interface, S: Debug, F> fmt::Debug for Fsm<I, O, S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fsm").field("init", &self.init).finish_non_exhaustive()
    }
}

/// Creates a module from an initial state and a transition closure.
pub fn fsm<I: Interface, O: Interface, S, F>(init: S, f: F) -> Fsm<I, O, S, F>
where
    S: 'static + Clone + Debug + PartialEq,
    F: Fn(I::Fwd, O::Bwd, &S) -> (O::Fwd, I::Bwd, S),
{
    Fsm { init, f, _marker: PhantomData }
}

impl<I: Interface, O: Interface, S, F> Module for Fsm<I, O, S, F>
where
    S: 'static + Clone + Debug + PartialEq,
    F: Fn(I::Fwd, O::Bwd, &S) -> (O::Fwd, I::Bwd, S),
{
    type Egress = O;
    type Ingress = I;
    type State = S;

    fn init(&self) -> S {
        self.init.clone()
    }

    fn step(&self, i_fwd: I::Fwd, o_bwd: O::Bwd, state: &S) -> (O::Fwd, I::Bwd, S) {
        (self.f)(i_fwd, o_bwd, state)
    }
}
