use std::collections::HashMap;

use anyhow::bail;

/// Drop users whose logs have emptied out every this many tracker operations.
const SWEEP_EVERY: u64 = 512;

fn ensure_monotonic(last_now_ms: &mut u64, now_ms: u64) -> anyhow::Result<()> {
    if now_ms < *last_now_ms {
        bail!(
            "clock went backwards: now {}ms is before last observed {}ms",
            now_ms,
            *last_now_ms
        );
    }

    *last_now_ms = now_ms;
    Ok(())
}

/// Sliding-window log of message timestamps, one log per user.
///
/// Entries live in the half-open window `(now - timeframe, now]`; an entry
/// exactly `timeframe` old is expired. Eviction is lazy: a user's log is
/// pruned when that user is next touched, and a periodic sweep drops users
/// whose logs have emptied out.
#[derive(Debug, Default)]
pub struct MessageWindow {
    logs: HashMap<u64, Vec<u64>>,
    last_now_ms: u64,
    ops: u64,
}

impl MessageWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message sent by `user_id` at `now_ms`, creating the user's
    /// log lazily. Rejects a `now_ms` earlier than the last one observed.
    pub fn record(&mut self, user_id: u64, now_ms: u64) -> anyhow::Result<()> {
        ensure_monotonic(&mut self.last_now_ms, now_ms)?;
        self.ops += 1;

        self.logs.entry(user_id).or_default().push(now_ms);
        Ok(())
    }

    /// Prune entries that fell out of the window ending at `now_ms` from the
    /// user's log, keep the pruned log, and return how many entries remain.
    /// Calling twice with the same `now_ms` returns the same count.
    pub fn count_within(
        &mut self,
        user_id: u64,
        now_ms: u64,
        timeframe_ms: u64,
    ) -> anyhow::Result<usize> {
        ensure_monotonic(&mut self.last_now_ms, now_ms)?;
        self.ops += 1;
        self.maybe_sweep(now_ms, timeframe_ms);

        let cutoff = now_ms.saturating_sub(timeframe_ms);
        let Some(log) = self.logs.get_mut(&user_id) else {
            return Ok(0);
        };

        log.retain(|&at_ms| at_ms > cutoff);
        Ok(log.len())
    }

    /// Clear one user's log. Called after a triggered action so the same
    /// burst doesn't re-trigger on the next message.
    pub fn reset(&mut self, user_id: u64) {
        self.logs.remove(&user_id);
    }

    /// Number of users currently holding a log.
    pub fn tracked_users(&self) -> usize {
        self.logs.len()
    }

    fn maybe_sweep(&mut self, now_ms: u64, timeframe_ms: u64) {
        if self.ops % SWEEP_EVERY != 0 {
            return;
        }

        let cutoff = now_ms.saturating_sub(timeframe_ms);
        self.logs.retain(|_, log| {
            log.retain(|&at_ms| at_ms > cutoff);
            !log.is_empty()
        });
    }
}

/// A single join inside the guild's join window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JoinEvent {
    pub user_id: u64,
    pub at_ms: u64,
}

/// Sliding-window log of guild joins.
///
/// One shared log for the whole guild; entries keep the joining user so a
/// triggered directive can name every contributor, not just the newest one.
#[derive(Debug, Default)]
pub struct JoinWindow {
    log: Vec<JoinEvent>,
    last_now_ms: u64,
}

impl JoinWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `user_id` joined at `now_ms`.
    pub fn record(&mut self, user_id: u64, now_ms: u64) -> anyhow::Result<()> {
        ensure_monotonic(&mut self.last_now_ms, now_ms)?;
        self.log.push(JoinEvent {
            user_id,
            at_ms: now_ms,
        });
        Ok(())
    }

    /// Prune joins that fell out of the window ending at `now_ms` and return
    /// how many remain.
    pub fn count_within(&mut self, now_ms: u64, timeframe_ms: u64) -> anyhow::Result<usize> {
        ensure_monotonic(&mut self.last_now_ms, now_ms)?;

        let cutoff = now_ms.saturating_sub(timeframe_ms);
        self.log.retain(|event| event.at_ms > cutoff);
        Ok(self.log.len())
    }

    /// Users currently inside the pruned window, in join order.
    pub fn contributors(&self) -> Vec<u64> {
        self.log.iter().map(|event| event.user_id).collect()
    }

    pub fn reset(&mut self) {
        self.log.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{JoinWindow, MessageWindow, SWEEP_EVERY};

    #[test]
    fn boundary_timestamp_is_expired() {
        let mut window = MessageWindow::new();
        window.record(1, 1000).unwrap();

        assert_eq!(window.count_within(1, 5999, 5000).unwrap(), 1);
        assert_eq!(window.count_within(1, 6000, 5000).unwrap(), 0);
    }

    #[test]
    fn count_is_idempotent_for_a_fixed_now() {
        let mut window = MessageWindow::new();
        window.record(1, 0).unwrap();
        window.record(1, 10).unwrap();
        window.record(1, 20).unwrap();

        assert_eq!(window.count_within(1, 25, 100).unwrap(), 3);
        assert_eq!(window.count_within(1, 25, 100).unwrap(), 3);
    }

    #[test]
    fn identical_timestamps_are_kept_distinct() {
        let mut window = MessageWindow::new();
        window.record(1, 50).unwrap();
        window.record(1, 50).unwrap();
        window.record(1, 50).unwrap();

        assert_eq!(window.count_within(1, 50, 100).unwrap(), 3);
    }

    #[test]
    fn identities_are_independent() {
        let mut window = MessageWindow::new();
        window.record(1, 0).unwrap();
        window.record(2, 5).unwrap();
        window.record(1, 10).unwrap();

        assert_eq!(window.count_within(1, 10, 100).unwrap(), 2);
        assert_eq!(window.count_within(2, 10, 100).unwrap(), 1);

        window.reset(1);
        assert_eq!(window.count_within(1, 10, 100).unwrap(), 0);
        assert_eq!(window.count_within(2, 10, 100).unwrap(), 1);
    }

    #[test]
    fn clock_going_backwards_is_rejected() {
        let mut window = MessageWindow::new();
        window.record(1, 1000).unwrap();

        assert!(window.record(1, 999).is_err());
        assert!(window.count_within(1, 500, 100).is_err());

        // The failed calls left the log untouched.
        assert_eq!(window.count_within(1, 1000, 5000).unwrap(), 1);
    }

    #[test]
    fn sweep_drops_emptied_identities() {
        let mut window = MessageWindow::new();
        window.record(1, 0).unwrap();
        window.record(2, 0).unwrap();
        assert_eq!(window.tracked_users(), 2);

        // Touch an unrelated user until the sweep cadence fires with both
        // logs outside the window.
        for _ in 0..SWEEP_EVERY {
            window.count_within(3, 60_000, 1000).unwrap();
        }

        assert_eq!(window.tracked_users(), 0);
    }

    #[test]
    fn join_window_lists_contributors_in_order() {
        let mut joins = JoinWindow::new();
        joins.record(10, 0).unwrap();
        joins.record(11, 15_000).unwrap();
        joins.record(12, 40_000).unwrap();

        assert_eq!(joins.count_within(40_000, 30_000).unwrap(), 2);
        assert_eq!(joins.contributors(), vec![11, 12]);

        joins.reset();
        assert!(joins.contributors().is_empty());
    }

    #[test]
    fn join_window_rejects_backwards_clock() {
        let mut joins = JoinWindow::new();
        joins.record(10, 5000).unwrap();

        assert!(joins.record(11, 4999).is_err());
        assert_eq!(joins.count_within(5000, 30_000).unwrap(), 1);
    }
}
