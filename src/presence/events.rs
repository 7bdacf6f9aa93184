//! Presence service callbacks, queued for the game thread.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

/// Events kept before the oldest ones are discarded.
pub const EVENT_QUEUE_CAPACITY: usize = 64;

/// A user as reported by the presence service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PresenceUser {
    pub username: String,
    pub discriminator: String,
    pub user_id: String,
}

impl std::fmt::Display for PresenceUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{} - {}", self.username, self.discriminator, self.user_id)
    }
}

/// Something the presence service told us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceEvent {
    /// Connected to the service as `user`.
    Ready { user: PresenceUser },
    Disconnected { code: i32, message: String },
    Errored { code: i32, message: String },
    /// A friend asked to join through a join secret we published.
    JoinGame { secret: String },
    SpectateGame { secret: String },
    /// Someone asked to join; no answer is sent.
    JoinRequest { user: PresenceUser },
}

/// Bounded queue shared between service callbacks and the game loop.
///
/// Cloning yields another handle to the same queue.
#[derive(Debug, Clone)]
pub struct EventQueue {
    inner: Arc<Mutex<VecDeque<PresenceEvent>>>,
    capacity: usize,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::with_capacity(EVENT_QUEUE_CAPACITY)
    }
}

impl EventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A capacity of 0 is treated as 1.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Queue an event, dropping the oldest one when full.
    pub fn push(&self, event: PresenceEvent) {
        let mut queue = self.inner.lock();
        if queue.len() >= self.capacity {
            if let Some(dropped) = queue.pop_front() {
                log::debug!("Presence queue full, dropping {:?}", dropped);
            }
        }
        queue.push_back(event);
    }

    /// Take everything queued so far, oldest first.
    pub fn drain(&self) -> Vec<PresenceEvent> {
        self.inner.lock().drain(..).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn join(secret: &str) -> PresenceEvent {
        PresenceEvent::JoinGame {
            secret: secret.to_string(),
        }
    }

    #[test]
    fn test_drain_in_order() {
        let queue = EventQueue::new();
        queue.push(join("a"));
        queue.push(join("b"));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.drain(), vec![join("a"), join("b")]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_full_queue_drops_oldest() {
        let queue = EventQueue::with_capacity(2);
        queue.push(join("a"));
        queue.push(join("b"));
        queue.push(join("c"));
        assert_eq!(queue.drain(), vec![join("b"), join("c")]);
    }

    #[test]
    fn test_zero_capacity_keeps_latest() {
        let queue = EventQueue::with_capacity(0);
        queue.push(join("a"));
        queue.push(join("b"));
        assert_eq!(queue.drain(), vec![join("b")]);
    }

    #[test]
    fn test_push_from_other_threads() {
        let queue = EventQueue::with_capacity(128);
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let queue = queue.clone();
                thread::spawn(move || {
                    for i in 0..10 {
                        queue.push(PresenceEvent::Errored {
                            code: t * 100 + i,
                            message: String::new(),
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(queue.drain().len(), 40);
    }

    #[test]
    fn test_user_display() {
        let user = PresenceUser {
            username: "padawan".into(),
            discriminator: "0042".into(),
            user_id: "1234".into(),
        };
        assert_eq!(user.to_string(), "padawan#0042 - 1234");
    }
}
