//! Skid buffer for valid-ready streams.
//!
//! A two-slot elastic buffer between a producer and a consumer. It absorbs
//! one cycle of consumer stall without stalling the producer, never drops or
//! reorders beats, and sustains one accepted beat per cycle while the
//! consumer stays ready.
//!
//! The ingress `ready` is a function of current occupancy only (the skid
//! slot is free), never of this cycle's incoming `valid`. The producer's
//! decision to offer therefore never depends on what it is offering, which
//! is the property that breaks the combinational path through the buffer.

use std::marker::PhantomData;

use flowsim::{Module, Ready, Signal, Valid, Vr};

/// One beat of a stream: a payload and its end-of-packet marker.
///
/// The marker is opaque metadata. It is never computed or regenerated by a
/// buffer; it moves atomically with the payload it was offered with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transfer<V: Signal> {
    /// Payload.
    pub payload: V,
    /// End-of-packet marker.
    pub last: bool,
}

impl<V: Signal> Signal for Transfer<V> {
    const WIDTH: usize = V::WIDTH + 1;
}

impl<V: Signal> Transfer<V> {
    /// Creates a beat.
    pub fn new(payload: V, last: bool) -> Self {
        Self { payload, last }
    }

    /// Creates a mid-packet beat.
    pub fn beat(payload: V) -> Self {
        Self { payload, last: false }
    }
}

/// Slot state of a [`SkidBuffer`].
///
/// `skid` is occupied only while `primary` is; an occupied skid slot under
/// an empty primary slot is unrepresentable by the transition function and
/// checked after every step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkidState<V: Signal> {
    /// Beat the consumer currently observes.
    pub primary: Option<Transfer<V>>,
    /// Overflow storage, used only when the consumer stalls while `primary`
    /// is occupied.
    pub skid: Option<Transfer<V>>,
}

impl<V: Signal> SkidState<V> {
    /// Number of resident beats (0, 1 or 2).
    pub fn occupancy(&self) -> usize {
        usize::from(self.primary.is_some()) + usize::from(self.skid.is_some())
    }

    /// Returns whether no beat is resident.
    pub fn is_empty(&self) -> bool {
        self.primary.is_none()
    }
}

/// Two-slot skid buffer module.
///
/// Ingress and egress are both valid-ready interfaces carrying [`Transfer`]
/// beats. When end-of-packet marking is disabled, the marker is masked off
/// at acceptance and never asserted downstream.
#[derive(Debug, Clone, Copy)]
pub struct SkidBuffer<V: Signal> {
    last_enable: bool,
    _marker: PhantomData<V>,
}

impl<V: Signal> SkidBuffer<V> {
    /// Creates a skid buffer with end-of-packet marking enabled.
    pub fn new() -> Self {
        Self { last_enable: true, _marker: PhantomData }
    }

    /// Creates a skid buffer with end-of-packet marking disabled.
    pub fn without_last_marking() -> Self {
        Self { last_enable: false, _marker: PhantomData }
    }

    fn admit(&self, beat: Transfer<V>) -> Transfer<V> {
        if self.last_enable {
            beat
        } else {
            Transfer { last: false, ..beat }
        }
    }
}

impl<V: Signal> Default for SkidBuffer<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Signal> Module for SkidBuffer<V> {
    type Egress = Vr<Transfer<V>>;
    type Ingress = Vr<Transfer<V>>;
    type State = SkidState<V>;

    fn init(&self) -> SkidState<V> {
        SkidState::default()
    }

    fn step(
        &self, i_fwd: Valid<Transfer<V>>, o_bwd: Ready, state: &SkidState<V>,
    ) -> (Valid<Transfer<V>>, Ready, SkidState<V>) {
        // Both predicates are evaluated against the pre-step snapshot.
        let producer_ready = state.skid.is_none();
        let consumer_accept = state.primary.is_some() && o_bwd.ready;

        // `offered` is `Some` only when the producer-side handshake fires,
        // i.e. the skid slot is currently free.
        let offered = (i_fwd.valid && producer_ready).then(|| self.admit(i_fwd.inner));

        let state_next = if consumer_accept {
            match state.skid {
                // Delivered from primary; skid moves up and a fired offer
                // lands behind it.
                Some(skid) => SkidState { primary: Some(skid), skid: offered },
                // Delivered from primary; a fired offer replaces it the
                // same cycle (zero-bubble path).
                None => SkidState { primary: offered, skid: None },
            }
        } else if state.primary.is_none() {
            SkidState { primary: offered, skid: None }
        } else {
            // Consumer stalled with primary held: a fired offer is captured
            // into the skid slot, which `producer_ready` guarantees is free.
            SkidState { primary: state.primary, skid: offered.or(state.skid) }
        };

        debug_assert!(
            state_next.skid.is_none() || state_next.primary.is_some(),
            "skid slot occupied while primary slot is empty"
        );

        let o_fwd = match state.primary {
            Some(beat) => Valid::valid(beat),
            None => Valid::invalid(),
        };
        (o_fwd, Ready::new(producer_ready), state_next)
    }
}

#[cfg(test)]
mod tests {
    use flowsim::{Bits, Ready, Simulator, Valid};

    use super::*;

    type Beat = Transfer<Bits<8>>;

    fn beat(payload: u64) -> Valid<Beat> {
        Valid::valid(Transfer::beat(Bits::new(payload)))
    }

    fn beat_last(payload: u64) -> Valid<Beat> {
        Valid::valid(Transfer::new(Bits::new(payload), true))
    }

    #[test]
    fn post_reset_contract() {
        let mut sim = Simulator::new(SkidBuffer::<Bits<8>>::new());
        let (o_fwd, i_bwd) = sim.tick(true, beat(0xaa), Ready::asserted());
        assert!(!o_fwd.valid, "output valid should be deasserted after reset");
        assert!(i_bwd.ready, "input ready should be asserted after reset");
        assert!(sim.state().is_empty());
    }

    #[test]
    fn reset_discards_resident_beats() {
        let mut sim = Simulator::new(SkidBuffer::<Bits<8>>::new());
        let _ = sim.tick(false, beat(0x11), Ready::new(false));
        let _ = sim.tick(false, beat(0x22), Ready::new(false));
        assert_eq!(sim.state().occupancy(), 2);

        let (o_fwd, i_bwd) = sim.tick(true, beat(0x33), Ready::asserted());
        assert!(!o_fwd.valid);
        assert!(i_bwd.ready);
        assert!(sim.state().is_empty());

        // Nothing left to deliver.
        let (o_fwd, _) = sim.tick(false, Valid::invalid(), Ready::asserted());
        assert!(!o_fwd.valid);
    }

    #[test]
    fn passthrough_in_order_with_last_marker() {
        let mut sim = Simulator::new(SkidBuffer::<Bits<8>>::new());
        let _ = sim.tick(true, Valid::invalid(), Ready::new(false));

        let mut received = Vec::new();
        for i in 0..10 {
            let i_fwd = if i == 9 { beat_last(i) } else { beat(i) };
            let (o_fwd, i_bwd) = sim.tick(false, i_fwd, Ready::asserted());
            assert!(i_bwd.ready, "skid stays free while the consumer keeps up");
            received.extend(o_fwd.transfer());
        }
        for _ in 0..2 {
            let (o_fwd, _) = sim.tick(false, Valid::invalid(), Ready::asserted());
            received.extend(o_fwd.transfer());
        }

        assert_eq!(received.len(), 10);
        for (i, beat) in received.iter().enumerate() {
            assert_eq!(beat.payload.value(), i as u64);
            assert_eq!(beat.last, i == 9, "marker must ride with payload 9 only");
        }
    }

    #[test]
    fn output_backpressure_fills_skid_then_recovers() {
        let mut sim = Simulator::new(SkidBuffer::<Bits<8>>::new());
        let _ = sim.tick(true, Valid::invalid(), Ready::new(false));

        // First beat lands in primary; skid still free.
        let (_, i_bwd) = sim.tick(false, beat(0xaa), Ready::new(false));
        assert!(i_bwd.ready);

        // Second beat is captured into the skid slot.
        let (o_fwd, i_bwd) = sim.tick(false, beat(0xbb), Ready::new(false));
        assert!(i_bwd.ready, "ready reflects pre-step occupancy");
        assert_eq!(o_fwd.transfer().map(|b| b.payload.value()), Some(0xaa));

        // Third beat is refused: both slots occupied.
        let (o_fwd, i_bwd) = sim.tick(false, beat(0xcc), Ready::new(false));
        assert!(!i_bwd.ready);
        assert_eq!(o_fwd.transfer().map(|b| b.payload.value()), Some(0xaa));
        assert_eq!(sim.state().occupancy(), 2);

        // Consumer unblocks: 0xAA delivered, 0xCC still refused this cycle.
        let (o_fwd, i_bwd) = sim.tick(false, beat(0xcc), Ready::asserted());
        assert!(!i_bwd.ready);
        assert_eq!(o_fwd.transfer().map(|b| b.payload.value()), Some(0xaa));

        // Skid moved up; 0xCC is finally accepted behind 0xBB.
        let (o_fwd, i_bwd) = sim.tick(false, beat(0xcc), Ready::asserted());
        assert!(i_bwd.ready);
        assert_eq!(o_fwd.transfer().map(|b| b.payload.value()), Some(0xbb));

        let (o_fwd, _) = sim.tick(false, Valid::invalid(), Ready::asserted());
        assert_eq!(o_fwd.transfer().map(|b| b.payload.value()), Some(0xcc));

        let (o_fwd, i_bwd) = sim.tick(false, Valid::invalid(), Ready::asserted());
        assert!(!o_fwd.valid);
        assert!(i_bwd.ready);
    }

    #[test]
    fn input_stalls_leave_ready_asserted() {
        let mut sim = Simulator::new(SkidBuffer::<Bits<8>>::new());
        let _ = sim.tick(true, Valid::invalid(), Ready::new(false));

        let mut received = Vec::new();
        for i in 0..5 {
            let (o_fwd, i_bwd) = sim.tick(false, beat(i), Ready::asserted());
            assert!(i_bwd.ready);
            received.extend(o_fwd.transfer());
            // Gap: no offer for two cycles.
            for _ in 0..2 {
                let (o_fwd, i_bwd) = sim.tick(false, Valid::invalid(), Ready::asserted());
                assert!(i_bwd.ready);
                received.extend(o_fwd.transfer());
            }
        }

        assert_eq!(received.iter().map(|b| b.payload.value()).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        let (o_fwd, _) = sim.tick(false, Valid::invalid(), Ready::asserted());
        assert!(!o_fwd.valid, "pipe drains during input gaps");
    }

    #[test]
    fn zero_bubble_throughput() {
        let mut sim = Simulator::new(SkidBuffer::<Bits<8>>::new());
        let _ = sim.tick(true, Valid::invalid(), Ready::new(false));

        let ready = Ready::asserted();
        let (o_fwd, _) = sim.tick(false, beat(0), ready);
        assert!(!o_fwd.valid, "one cycle of fill latency");

        // From the second cycle on, every cycle fires a delivery.
        for i in 1..20 {
            let (o_fwd, i_bwd) = sim.tick(false, beat(i), ready);
            assert!(i_bwd.ready);
            assert!(o_fwd.fire(ready), "bubble at cycle {}", i);
            assert_eq!(o_fwd.inner.payload.value(), i - 1);
        }
    }

    #[test]
    fn capacity_is_bounded_by_two_slots() {
        let mut sim = Simulator::new(SkidBuffer::<Bits<8>>::new());
        let _ = sim.tick(true, Valid::invalid(), Ready::new(false));

        let mut accepted = 0;
        for i in 0..8 {
            let (_, i_bwd) = sim.tick(false, beat(i), Ready::new(false));
            if i_bwd.ready {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 2);
        assert_eq!(sim.state().occupancy(), 2);

        // Ready stays deasserted until the consumer takes a beat.
        let (_, i_bwd) = sim.tick(false, beat(0xff), Ready::new(false));
        assert!(!i_bwd.ready);
        let _ = sim.tick(false, Valid::invalid(), Ready::asserted());
        let (_, i_bwd) = sim.tick(false, Valid::invalid(), Ready::new(false));
        assert!(i_bwd.ready);
    }

    #[test]
    fn disabled_marking_masks_last() {
        let mut sim = Simulator::new(SkidBuffer::<Bits<8>>::without_last_marking());
        let _ = sim.tick(true, Valid::invalid(), Ready::new(false));

        let _ = sim.tick(false, beat_last(0x42), Ready::asserted());
        let (o_fwd, _) = sim.tick(false, Valid::invalid(), Ready::asserted());
        let delivered = o_fwd.transfer().expect("beat should be delivered");
        assert_eq!(delivered.payload.value(), 0x42);
        assert!(!delivered.last, "marker is never asserted when marking is disabled");
    }

    #[test]
    fn refused_offer_corrupts_nothing() {
        let mut sim = Simulator::new(SkidBuffer::<Bits<8>>::new());
        let _ = sim.tick(true, Valid::invalid(), Ready::new(false));

        let _ = sim.tick(false, beat(1), Ready::new(false));
        let _ = sim.tick(false, beat(2), Ready::new(false));
        let before = *sim.state();
        let _ = sim.tick(false, beat(3), Ready::new(false));
        assert_eq!(*sim.state(), before, "a refused offer must not touch either slot");
    }
}
