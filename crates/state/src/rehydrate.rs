//! Cache timestamp correction after state rehydration.
//!
//! A server-rendered snapshot carries cache entries whose ages were stamped
//! by the server's clock, which may sit in a different time zone than the
//! client. On rehydration every entry's staleness timestamp is rebased to
//! the client's "now", treating the snapshot as freshly obtained: relative
//! expiry math stays correct at the cost of a small over-estimate of
//! freshness.

use std::cell::Cell;
use std::rc::Rc;

/// One-shot correction applied to every cache entry's staleness timestamp.
///
/// Never stored; built per rehydration event and handed straight to the
/// [`CacheResetPort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTimestampReset {
    /// Epoch milliseconds every entry's `time_added` is rebased to.
    pub new_timestamp: i64,
}

/// Wall-clock seam, injectable so reactions can be tested at a fixed time.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// The real clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Where timestamp resets are dispatched.
///
/// The receiving cache must set every entry's `time_added` to
/// `new_timestamp` without altering its time-to-live or payload.
pub trait CacheResetPort {
    fn apply(&self, reset: CacheTimestampReset);
}

/// Reactor phase, observable for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactorState {
    Idle,
    Reacting,
}

/// Turns each "store rehydrated" event into exactly one timestamp reset.
pub struct RehydrationReactor {
    port: Rc<dyn CacheResetPort>,
    clock: Rc<dyn Clock>,
    state: Cell<ReactorState>,
}

impl RehydrationReactor {
    pub fn new(port: Rc<dyn CacheResetPort>) -> Self {
        Self::with_clock(port, Rc::new(SystemClock))
    }

    pub fn with_clock(port: Rc<dyn CacheResetPort>, clock: Rc<dyn Clock>) -> Self {
        RehydrationReactor { port, clock, state: Cell::new(ReactorState::Idle) }
    }

    pub fn state(&self) -> ReactorState {
        self.state.get()
    }

    /// Handle one rehydration event: dispatch a single reset carrying the
    /// current wall-clock time, then return to idle. Each invocation
    /// produces an independent reset timestamped at its own moment.
    pub fn on_rehydrated(&self) {
        self.state.set(ReactorState::Reacting);
        let reset = CacheTimestampReset { new_timestamp: self.clock.now_millis() };
        tracing::debug!(new_timestamp = reset.new_timestamp, "rebasing cache timestamps after rehydration");
        self.port.apply(reset);
        self.state.set(ReactorState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FixedClock {
        now: Cell<i64>,
    }

    impl Clock for FixedClock {
        fn now_millis(&self) -> i64 {
            self.now.get()
        }
    }

    #[derive(Default)]
    struct RecordingPort {
        resets: RefCell<Vec<CacheTimestampReset>>,
    }

    impl CacheResetPort for RecordingPort {
        fn apply(&self, reset: CacheTimestampReset) {
            self.resets.borrow_mut().push(reset);
        }
    }

    #[test]
    fn test_rehydration_dispatches_one_reset_with_clock_time() {
        let port = Rc::new(RecordingPort::default());
        let clock = Rc::new(FixedClock { now: Cell::new(1_234_567) });
        let reactor = RehydrationReactor::with_clock(Rc::clone(&port) as Rc<dyn CacheResetPort>, clock);

        reactor.on_rehydrated();

        assert_eq!(*port.resets.borrow(), vec![CacheTimestampReset { new_timestamp: 1_234_567 }]);
    }

    #[test]
    fn test_each_event_gets_its_own_timestamp() {
        let port = Rc::new(RecordingPort::default());
        let clock = Rc::new(FixedClock { now: Cell::new(1_000) });
        let reactor =
            RehydrationReactor::with_clock(Rc::clone(&port) as Rc<dyn CacheResetPort>, Rc::clone(&clock) as Rc<dyn Clock>);

        reactor.on_rehydrated();
        clock.now.set(2_000);
        reactor.on_rehydrated();

        assert_eq!(
            *port.resets.borrow(),
            vec![CacheTimestampReset { new_timestamp: 1_000 }, CacheTimestampReset { new_timestamp: 2_000 }]
        );
    }

    #[test]
    fn test_reactor_returns_to_idle() {
        let port = Rc::new(RecordingPort::default());
        let reactor = RehydrationReactor::new(port);
        assert_eq!(reactor.state(), ReactorState::Idle);
        reactor.on_rehydrated();
        assert_eq!(reactor.state(), ReactorState::Idle);
    }

    #[test]
    fn test_system_clock_is_epoch_millis() {
        // 2020-01-01T00:00:00Z in epoch millis; anything earlier means the
        // clock is not reporting milliseconds.
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }
}
