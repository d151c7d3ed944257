//! Interfaces of modules.
//!
//! An interface is a pair of signals flowing in opposite directions: the
//! forward signal travels with the data (producer to consumer) and the
//! backward signal carries flow control (consumer to producer).

use std::fmt::Debug;
use std::marker::PhantomData;

use crate::signal::Signal;
use crate::valid_ready::{Ready, Valid};

/// Interface of a module boundary.
pub trait Interface: 'static + Debug {
    /// Forward signal.
    type Fwd: Signal;
    /// Backward signal.
    type Bwd: Signal;
}

/// Valid-ready interface: flow-controlled in both directions.
#[derive(Debug)]
pub struct Vr<V: Signal>(PhantomData<V>);

impl<V: Signal> Interface for Vr<V> {
    type Bwd = Ready;
    type Fwd = Valid<V>;
}

/// Unidirectional interface: forward data with no backpressure.
#[derive(Debug)]
pub struct Uni<V: Signal>(PhantomData<V>);

impl<V: Signal> Interface for Uni<V> {
    type Bwd = ();
    type Fwd = V;
}
