use std::time::Duration;

/// Purpose tag of a scheduled callback. At most one of each kind is pending.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum TimerKind {
    Countdown,
    BonusClear,
    MessageClear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerHandle {
    pub kind: TimerKind,
    /// Unique per scheduling, never reused
    pub id: u64,
    pub due: Duration,
    pub period: Option<Duration>,
}

/// Cancellable timers on a virtual monotonic clock.
///
/// The clock only moves when the owner advances it, so firing order is fully
/// determined by the events fed in.
#[derive(Clone, Debug, Default)]
pub struct Timers {
    now: Duration,
    next_id: u64,
    countdown: Option<TimerHandle>,
    bonus_clear: Option<TimerHandle>,
    message_clear: Option<TimerHandle>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    fn slot(&mut self, kind: TimerKind) -> &mut Option<TimerHandle> {
        match kind {
            TimerKind::Countdown => &mut self.countdown,
            TimerKind::BonusClear => &mut self.bonus_clear,
            TimerKind::MessageClear => &mut self.message_clear,
        }
    }

    fn slots(&self) -> [Option<TimerHandle>; 3] {
        [self.countdown, self.bonus_clear, self.message_clear]
    }

    fn schedule(&mut self, kind: TimerKind, after: Duration, period: Option<Duration>) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle {
            kind,
            id: self.next_id,
            due: self.now + after,
            period,
        };

        if let Some(replaced) = self.slot(kind).replace(handle) {
            tracing::trace!(%kind, id = replaced.id, "replaced pending timer");
        }
        handle
    }

    /// Fires once after `after`, cancelling any pending timer of the same kind
    pub fn schedule_once(&mut self, kind: TimerKind, after: Duration) -> TimerHandle {
        self.schedule(kind, after, None)
    }

    /// Fires every `period`, first after one full period
    pub fn schedule_repeating(&mut self, kind: TimerKind, period: Duration) -> TimerHandle {
        self.schedule(kind, period, Some(period))
    }

    pub fn cancel(&mut self, kind: TimerKind) -> Option<TimerHandle> {
        let cancelled = self.slot(kind).take();
        if let Some(handle) = cancelled {
            tracing::trace!(%kind, id = handle.id, "cancelled timer");
        }
        cancelled
    }

    pub fn cancel_all(&mut self) {
        self.cancel(TimerKind::Countdown);
        self.cancel(TimerKind::BonusClear);
        self.cancel(TimerKind::MessageClear);
    }

    pub fn pending(&self, kind: TimerKind) -> Option<TimerHandle> {
        match kind {
            TimerKind::Countdown => self.countdown,
            TimerKind::BonusClear => self.bonus_clear,
            TimerKind::MessageClear => self.message_clear,
        }
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.pending(kind).is_some()
    }

    pub fn has_pending(&self) -> bool {
        self.slots().iter().any(Option::is_some)
    }

    /// Removes and returns the earliest timer due at or before `until`,
    /// moving the clock to its deadline. Repeating timers are re-armed one
    /// period later under the same id. Ties go to the earlier scheduling.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerHandle> {
        let next = self
            .slots()
            .into_iter()
            .flatten()
            .filter(|h| h.due <= until)
            .min_by_key(|h| (h.due, h.id))?;

        self.now = self.now.max(next.due);
        let slot = self.slot(next.kind);
        *slot = next.period.map(|period| TimerHandle {
            due: next.due + period,
            ..next
        });

        Some(next)
    }

    /// Moves the clock forward to `until` without firing anything
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}
