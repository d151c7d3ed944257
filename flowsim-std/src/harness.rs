//! Stream drivers for exercising valid-ready modules.
//!
//! These are testbench collaborators, not part of any module's core: a
//! [`StreamSource`] plays the producer role and keeps re-offering a beat
//! until it is accepted, and a [`StreamSink`] plays the consumer role with a
//! scripted per-cycle ready pattern, collecting every beat it accepts.

use std::collections::VecDeque;

use flowsim::{Ready, Signal, Simulator, Valid};
use itertools::{Itertools, Position};

use crate::buffer_skid::{SkidBuffer, Transfer};

/// Producer-side driver.
///
/// Offers queued beats in order. A beat stays offered until the module
/// asserts ready in the same cycle; the driver performs no retry logic
/// beyond re-offering, matching the handshake contract.
#[derive(Debug, Clone, Default)]
pub struct StreamSource<V: Signal> {
    pending: VecDeque<Transfer<V>>,
}

impl<V: Signal> StreamSource<V> {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self { pending: VecDeque::new() }
    }

    /// Queues one beat.
    pub fn push_beat(&mut self, beat: Transfer<V>) {
        self.pending.push_back(beat);
    }

    /// Queues a packet: the end-of-packet marker is set on the final beat.
    pub fn push_packet(&mut self, payloads: impl IntoIterator<Item = V>) {
        for position in payloads.into_iter().with_position() {
            let (payload, last) = match position {
                Position::Last(payload) | Position::Only(payload) => (payload, true),
                Position::First(payload) | Position::Middle(payload) => (payload, false),
            };
            self.pending.push_back(Transfer::new(payload, last));
        }
    }

    /// This cycle's forward signal.
    pub fn offer(&self) -> Valid<Transfer<V>> {
        match self.pending.front() {
            Some(beat) => Valid::valid(*beat),
            None => Valid::invalid(),
        }
    }

    /// Observes this cycle's ready and retires the offered beat if accepted.
    pub fn advance(&mut self, ready: Ready) {
        if self.offer().fire(ready) {
            let beat = self.pending.pop_front();
            log::trace!("source: accepted {:?}", beat);
        }
    }

    /// Returns whether every queued beat has been accepted.
    pub fn is_drained(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of beats not yet accepted.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

/// Consumer-side driver.
///
/// Plays back a scripted stall pattern (`true` = ready); once the script is
/// exhausted it stays ready so the stream can drain.
#[derive(Debug, Clone, Default)]
pub struct StreamSink<V: Signal> {
    stalls: VecDeque<bool>,
    received: Vec<Transfer<V>>,
}

impl<V: Signal> StreamSink<V> {
    /// Creates a sink that is ready every cycle.
    pub fn always_ready() -> Self {
        Self { stalls: VecDeque::new(), received: Vec::new() }
    }

    /// Creates a sink from a per-cycle ready pattern.
    pub fn with_pattern(pattern: impl IntoIterator<Item = bool>) -> Self {
        Self { stalls: pattern.into_iter().collect(), received: Vec::new() }
    }

    /// Consumes this cycle's ready decision.
    pub fn next_ready(&mut self) -> Ready {
        Ready::new(self.stalls.pop_front().unwrap_or(true))
    }

    /// Records a delivery if the forward signal fired against `ready`.
    pub fn capture(&mut self, o_fwd: Valid<Transfer<V>>, ready: Ready) {
        if o_fwd.fire(ready) {
            log::trace!("sink: received {:?}", o_fwd.inner);
            self.received.push(o_fwd.inner);
        }
    }

    /// Beats accepted so far, in delivery order.
    pub fn received(&self) -> &[Transfer<V>] {
        &self.received
    }
}

/// Drives a skid buffer from `source` into `sink`.
///
/// Runs until the source is drained and the buffer is empty, or until
/// `max_cycles` elapse. Returns the number of cycles consumed.
pub fn run_stream<V: Signal>(
    sim: &mut Simulator<SkidBuffer<V>>, source: &mut StreamSource<V>, sink: &mut StreamSink<V>, max_cycles: u64,
) -> u64 {
    let mut cycles = 0;
    while cycles < max_cycles && !(source.is_drained() && sim.state().is_empty()) {
        let ready = sink.next_ready();
        let (o_fwd, i_bwd) = sim.tick(false, source.offer(), ready);
        source.advance(i_bwd);
        sink.capture(o_fwd, ready);
        cycles += 1;
    }
    cycles
}
