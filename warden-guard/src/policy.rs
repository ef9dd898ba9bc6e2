use std::collections::HashSet;

use crate::config::GuardConfig;
use crate::window::{JoinWindow, MessageWindow};

/// How many recent channel messages a message-flood purge looks back over.
pub const FLOOD_PURGE_LOOKBACK: u8 = 10;

const MESSAGE_FLOOD_TIMEOUT_SECS: u64 = 10 * 60;
const MENTION_FLOOD_TIMEOUT_SECS: u64 = 5 * 60;

/// Which detection policy produced a directive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyKind {
    MessageFlood,
    MentionFlood,
    JoinFlood,
}

/// Audit severity tag. The presentation layer maps each variant to an embed
/// color exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
    Moderate,
}

/// A punitive step the caller should carry out against the targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Delete the targets' messages among the channel's `lookback` most
    /// recent ones.
    PurgeRecent { lookback: u8 },
    /// Delete the message that triggered the policy.
    DeleteMessage,
    /// Disable the targets' communication for this long.
    Timeout { secs: u64 },
    /// Remove the targets from the guild.
    Kick,
}

/// What to do, against whom, and why.
///
/// Produced by [`AutoMod`], consumed once by the caller, never stored. The
/// evaluator recomputes directives from current window state, so a caller
/// whose platform calls fail can simply wait for the condition to recur.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directive {
    pub policy: PolicyKind,
    pub targets: Vec<u64>,
    pub actions: Vec<Action>,
    pub reason: String,
    pub severity: Severity,
}

/// Detection-only abuse evaluator.
///
/// Consults the sliding windows and returns at most one [`Directive`] per
/// inbound event. Crossings are edge-triggered: a triggered policy resets
/// its window, so the same burst emits one directive, not one per message.
/// Never touches the platform.
#[derive(Debug)]
pub struct AutoMod {
    config: GuardConfig,
    messages: MessageWindow,
    joins: JoinWindow,
}

impl AutoMod {
    pub fn new(config: GuardConfig) -> Self {
        Self {
            config,
            messages: MessageWindow::new(),
            joins: JoinWindow::new(),
        }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Evaluate an authored message.
    ///
    /// Automated authors (bots, webhooks) never update the windows and never
    /// produce directives. When a message trips both message-flood and
    /// mention-flood, message-flood wins.
    pub fn on_message(
        &mut self,
        author_id: u64,
        is_automated: bool,
        mentioned_user_ids: &[u64],
        now_ms: u64,
    ) -> anyhow::Result<Option<Directive>> {
        if is_automated {
            return Ok(None);
        }

        if let Some(directive) = self.check_message_flood(author_id, now_ms)? {
            return Ok(Some(directive));
        }

        Ok(self.check_mention_flood(author_id, mentioned_user_ids))
    }

    /// Evaluate a membership-join event.
    pub fn on_member_join(
        &mut self,
        user_id: u64,
        now_ms: u64,
    ) -> anyhow::Result<Option<Directive>> {
        self.joins.record(user_id, now_ms)?;
        let count = self
            .joins
            .count_within(now_ms, self.config.join_flood_timeframe_ms)?;

        if count < self.config.join_flood_threshold as usize {
            return Ok(None);
        }

        let targets = self.joins.contributors();
        self.joins.reset();

        Ok(Some(Directive {
            policy: PolicyKind::JoinFlood,
            targets,
            actions: vec![Action::Kick],
            reason: format!(
                "{} members joined within {}s",
                count,
                self.config.join_flood_timeframe_ms / 1000
            ),
            severity: Severity::Error,
        }))
    }

    fn check_message_flood(
        &mut self,
        author_id: u64,
        now_ms: u64,
    ) -> anyhow::Result<Option<Directive>> {
        self.messages.record(author_id, now_ms)?;
        let count = self.messages.count_within(
            author_id,
            now_ms,
            self.config.message_flood_timeframe_ms,
        )?;

        if count < self.config.message_flood_threshold as usize {
            return Ok(None);
        }

        self.messages.reset(author_id);

        Ok(Some(Directive {
            policy: PolicyKind::MessageFlood,
            targets: vec![author_id],
            actions: vec![
                Action::PurgeRecent {
                    lookback: FLOOD_PURGE_LOOKBACK,
                },
                Action::Timeout {
                    secs: MESSAGE_FLOOD_TIMEOUT_SECS,
                },
            ],
            reason: format!(
                "Sent {} messages within {}s",
                count,
                self.config.message_flood_timeframe_ms / 1000
            ),
            severity: Severity::Moderate,
        }))
    }

    fn check_mention_flood(&self, author_id: u64, mentioned_user_ids: &[u64]) -> Option<Directive> {
        let distinct: HashSet<u64> = mentioned_user_ids.iter().copied().collect();
        if distinct.len() <= self.config.mention_flood_max as usize {
            return None;
        }

        Some(Directive {
            policy: PolicyKind::MentionFlood,
            targets: vec![author_id],
            actions: vec![
                Action::DeleteMessage,
                Action::Timeout {
                    secs: MENTION_FLOOD_TIMEOUT_SECS,
                },
            ],
            reason: format!("Sent a message mentioning {} users", distinct.len()),
            severity: Severity::Moderate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, AutoMod, PolicyKind};
    use crate::config::GuardConfig;

    fn automod() -> AutoMod {
        AutoMod::new(GuardConfig::default())
    }

    #[test]
    fn message_flood_triggers_on_threshold_and_resets() {
        let mut automod = automod();

        for at_ms in [0, 1000, 2000, 3000] {
            assert!(automod.on_message(7, false, &[], at_ms).unwrap().is_none());
        }

        let directive = automod
            .on_message(7, false, &[], 4000)
            .unwrap()
            .expect("fifth message crosses the threshold");
        assert_eq!(directive.policy, PolicyKind::MessageFlood);
        assert_eq!(directive.targets, vec![7]);
        assert!(directive.actions.contains(&Action::Timeout { secs: 600 }));
        assert!(
            directive
                .actions
                .contains(&Action::PurgeRecent { lookback: 10 })
        );

        // Reset-on-trigger: the same burst doesn't re-trigger.
        assert!(automod.on_message(7, false, &[], 4500).unwrap().is_none());
        // A later message starts a fresh count of one.
        assert!(automod.on_message(7, false, &[], 9000).unwrap().is_none());
    }

    #[test]
    fn stale_messages_fall_out_of_the_window() {
        let mut automod = automod();

        for at_ms in [0, 100, 200, 300] {
            assert!(automod.on_message(7, false, &[], at_ms).unwrap().is_none());
        }

        // A long pause drains the window; the fifth message no longer crosses.
        assert!(automod.on_message(7, false, &[], 20_000).unwrap().is_none());
    }

    #[test]
    fn message_flood_tracks_authors_independently() {
        let mut automod = automod();

        for at_ms in [0, 1000, 2000, 3000] {
            assert!(automod.on_message(7, false, &[], at_ms).unwrap().is_none());
            assert!(automod.on_message(8, false, &[], at_ms).unwrap().is_none());
        }

        let directive = automod.on_message(7, false, &[], 4000).unwrap().unwrap();
        assert_eq!(directive.targets, vec![7]);
    }

    #[test]
    fn mention_flood_requires_more_than_max_distinct() {
        let mut automod = automod();

        assert!(
            automod
                .on_message(7, false, &[1, 2, 3, 4, 5], 0)
                .unwrap()
                .is_none()
        );

        let directive = automod
            .on_message(7, false, &[1, 2, 3, 4, 5, 6], 1)
            .unwrap()
            .expect("six distinct mentions trigger");
        assert_eq!(directive.policy, PolicyKind::MentionFlood);
        assert_eq!(
            directive.actions,
            vec![Action::DeleteMessage, Action::Timeout { secs: 300 }]
        );
    }

    #[test]
    fn mention_flood_counts_distinct_users() {
        let mut automod = automod();

        // Eight mentions of the same two users stay under the limit.
        assert!(
            automod
                .on_message(7, false, &[1, 2, 1, 2, 1, 2, 1, 2], 0)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn join_flood_kicks_every_contributor() {
        let mut automod = automod();

        for (user_id, at_ms) in [(1, 0), (2, 2000), (3, 4000), (4, 6000)] {
            assert!(automod.on_member_join(user_id, at_ms).unwrap().is_none());
        }

        let directive = automod
            .on_member_join(5, 8000)
            .unwrap()
            .expect("fifth join crosses the threshold");
        assert_eq!(directive.policy, PolicyKind::JoinFlood);
        assert_eq!(directive.targets, vec![1, 2, 3, 4, 5]);
        assert_eq!(directive.actions, vec![Action::Kick]);

        // The join log was reset; the next join starts a fresh window.
        assert!(automod.on_member_join(6, 9000).unwrap().is_none());
    }

    #[test]
    fn automated_authors_never_update_state() {
        let mut automod = automod();

        for at_ms in 0..10 {
            assert!(
                automod
                    .on_message(7, true, &[1, 2, 3, 4, 5, 6, 7], at_ms)
                    .unwrap()
                    .is_none()
            );
        }

        // The burst above left no trace: a human message counts from one.
        assert!(automod.on_message(7, false, &[], 100).unwrap().is_none());
    }

    #[test]
    fn clock_violations_surface_as_errors() {
        let mut automod = automod();

        automod.on_message(7, false, &[], 1000).unwrap();
        assert!(automod.on_message(7, false, &[], 999).is_err());
    }
}
