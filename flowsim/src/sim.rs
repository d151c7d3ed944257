//! Clocked scheduler.

use crate::module::{IBwd, IFwd, Module, OBwd, OFwd};

/// Drives a [`Module`] one cycle at a time.
///
/// The simulator owns the architectural state; modules never mutate state
/// themselves. Each [`tick`](Simulator::tick) applies one full transition
/// atomically, so a cycle is never partially applied.
#[derive(Debug)]
pub struct Simulator<M: Module> {
    module: M,
    state: M::State,
    cycle: u64,
}

impl<M: Module> Simulator<M> {
    /// Creates a simulator in the module's post-reset state.
    pub fn new(module: M) -> Self {
        let state = module.init();
        Self { module, state, cycle: 0 }
    }

    /// Current cycle count.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Current architectural state.
    pub fn state(&self) -> &M::State {
        &self.state
    }

    /// Forces the post-reset state without consuming a cycle.
    pub fn reset(&mut self) {
        log::debug!("cycle {}: reset", self.cycle);
        self.state = self.module.init();
    }

    /// Advances one cycle and returns this cycle's outputs.
    ///
    /// A cycle with `reset` asserted overrides any in-flight activity: the
    /// state is forced to [`Module::init`] and the module is evaluated from
    /// that snapshot with quiescent inputs, so nothing is accepted and the
    /// outputs reflect the empty state (for a valid-ready module: ingress
    /// `ready` asserted, egress `valid` deasserted).
    pub fn tick(&mut self, reset: bool, i_fwd: IFwd<M>, o_bwd: OBwd<M>) -> (OFwd<M>, IBwd<M>) {
        if reset {
            self.state = self.module.init();
            let (o_fwd, i_bwd, _) = self.module.step(IFwd::<M>::default(), OBwd::<M>::default(), &self.state);
            log::trace!("cycle {}: reset, o_fwd {:?}, i_bwd {:?}", self.cycle, o_fwd, i_bwd);
            self.cycle += 1;
            return (o_fwd, i_bwd);
        }

        let (o_fwd, i_bwd, state_next) = self.module.step(i_fwd, o_bwd, &self.state);
        log::trace!(
            "cycle {}: i_fwd {:?}, o_bwd {:?} -> o_fwd {:?}, i_bwd {:?}, state {:?}",
            self.cycle,
            i_fwd,
            o_bwd,
            o_fwd,
            i_bwd,
            state_next,
        );
        self.state = state_next;
        self.cycle += 1;
        (o_fwd, i_bwd)
    }
}
