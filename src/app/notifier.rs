use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::models::ReferenceKey;

const READY_TTL: Duration = Duration::from_secs(2);
const ERROR_TTL: Duration = Duration::from_secs(3);
/// Only the newest toast is drawn; older ones just wait to expire.
const MAX_QUEUED: usize = 8;
/// References named in a readiness toast before the rest are counted.
const READY_SHOWN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Error,
    Info,
}

#[derive(Debug)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub expires_at: Instant,
    /// References whose results became available, for coalesced readiness toasts.
    ready: Vec<ReferenceKey>,
}

impl Notification {
    fn is_ready_notice(&self) -> bool {
        !self.ready.is_empty()
    }
}

/// Short-lived messages shown in the corner of the screen.
///
/// Tag feeds tend to complete in bursts, so readiness notices fold into the
/// toast on screen instead of queueing one per reference.
pub struct Notifier {
    notifications: VecDeque<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            notifications: VecDeque::new(),
        }
    }

    pub fn info(&mut self, message: impl Into<String>, duration_secs: u64) {
        self.push(Notification {
            message: message.into(),
            kind: NotificationKind::Info,
            expires_at: Instant::now() + Duration::from_secs(duration_secs),
            ready: Vec::new(),
        });
    }

    /// Repeats of the toast on screen only extend its lifetime.
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        let now = Instant::now();
        if let Some(last) = self.live_back_mut(now)
            && last.kind == NotificationKind::Error
            && last.message == message
        {
            last.expires_at = now + ERROR_TTL;
            return;
        }
        self.push(Notification {
            message,
            kind: NotificationKind::Error,
            expires_at: now + ERROR_TTL,
            ready: Vec::new(),
        });
    }

    /// Announce that results for `key` can be opened.
    pub fn ready(&mut self, key: ReferenceKey) {
        let now = Instant::now();
        if let Some(last) = self.live_back_mut(now)
            && last.is_ready_notice()
        {
            if !last.ready.contains(&key) {
                last.ready.push(key);
            }
            last.message = ready_message(&last.ready);
            last.expires_at = now + READY_TTL;
            return;
        }
        let ready = vec![key];
        self.push(Notification {
            message: ready_message(&ready),
            kind: NotificationKind::Info,
            expires_at: now + READY_TTL,
            ready,
        });
    }

    pub fn recent(&self) -> Option<&Notification> {
        self.notifications.back()
    }

    pub fn prune_expired(&mut self) {
        let now = Instant::now();
        self.notifications.retain(|n| n.expires_at > now);
    }

    fn live_back_mut(&mut self, now: Instant) -> Option<&mut Notification> {
        self.notifications
            .back_mut()
            .filter(|last| last.expires_at > now)
    }

    fn push(&mut self, notification: Notification) {
        if self.notifications.len() == MAX_QUEUED {
            self.notifications.pop_front();
        }
        self.notifications.push_back(notification);
    }
}

fn ready_message(keys: &[ReferenceKey]) -> String {
    let shown: Vec<String> = keys.iter().take(READY_SHOWN).map(|k| k.to_string()).collect();
    let mut message = format!("Results ready: {}", shown.join(", "));
    if keys.len() > READY_SHOWN {
        message.push_str(&format!(" +{} more", keys.len() - READY_SHOWN));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_recent_wins_and_expired_are_pruned() {
        let mut notifier = Notifier::new();
        notifier.info("ready", 0);
        notifier.error("no results loaded for v0.17");
        assert_eq!(notifier.recent().map(|n| n.kind), Some(NotificationKind::Error));

        notifier.prune_expired();
        assert_eq!(notifier.notifications.len(), 1);
        assert_eq!(
            notifier.recent().map(|n| n.message.as_str()),
            Some("no results loaded for v0.17")
        );
    }

    #[test]
    fn burst_of_ready_references_shares_one_toast() {
        let mut notifier = Notifier::new();
        notifier.ready(ReferenceKey::branch("master"));
        notifier.ready(ReferenceKey::tag("v0.17"));
        notifier.ready(ReferenceKey::tag("v0.17"));

        assert_eq!(notifier.notifications.len(), 1);
        assert_eq!(
            notifier.recent().map(|n| n.message.as_str()),
            Some("Results ready: master, v0.17")
        );

        notifier.ready(ReferenceKey::tag("v0.16"));
        notifier.ready(ReferenceKey::tag("v0.15"));
        notifier.ready(ReferenceKey::tag("v0.14"));
        assert_eq!(
            notifier.recent().map(|n| n.message.as_str()),
            Some("Results ready: master, v0.17, v0.16 +2 more")
        );
    }

    #[test]
    fn error_in_between_starts_a_new_ready_toast() {
        let mut notifier = Notifier::new();
        notifier.ready(ReferenceKey::branch("master"));
        notifier.error("no results loaded for v0.17");
        notifier.ready(ReferenceKey::tag("v0.16"));

        assert_eq!(notifier.notifications.len(), 3);
        assert_eq!(
            notifier.recent().map(|n| n.message.as_str()),
            Some("Results ready: v0.16")
        );
    }

    #[test]
    fn repeated_errors_do_not_stack() {
        let mut notifier = Notifier::new();
        for _ in 0..5 {
            notifier.error("no results loaded for v0.17");
        }
        notifier.error("request timed out");
        assert_eq!(notifier.notifications.len(), 2);
    }

    #[test]
    fn queue_is_bounded() {
        let mut notifier = Notifier::new();
        for i in 0..20 {
            notifier.info(format!("copied {}", i), 5);
        }
        assert_eq!(notifier.notifications.len(), MAX_QUEUED);
        assert_eq!(
            notifier.recent().map(|n| n.message.as_str()),
            Some("copied 19")
        );
    }
}
