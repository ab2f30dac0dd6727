use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};

/// Number of event keys remembered by default
pub const DEFAULT_CAPACITY: usize = 200;

#[derive(Debug, Default)]
struct SeenKeys {
    order: VecDeque<String>,
    members: HashSet<String>,
}

/// Bounded FIFO set of recently admitted event keys.
///
/// Check-and-insert happens under a single lock so two concurrent deliveries
/// of the same key admit at most one of them.
#[derive(Debug)]
pub struct EventDeduplicator {
    capacity: usize,
    seen: Mutex<SeenKeys>,
}

impl EventDeduplicator {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A capacity of zero is treated as one
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            seen: Mutex::new(SeenKeys {
                order: VecDeque::with_capacity(capacity),
                members: HashSet::with_capacity(capacity),
            }),
        }
    }

    /// Build the key for an event; missing parts become empty strings
    #[must_use]
    pub fn key(item_id: Option<&str>, event: Option<&str>, channel: Option<&str>) -> String {
        format!(
            "{}_{}_{}",
            item_id.unwrap_or_default(),
            event.unwrap_or_default(),
            channel.unwrap_or_default()
        )
    }

    /// Record `key`. Returns `false` if it was already present.
    pub fn admit(&self, key: &str) -> bool {
        let mut seen = self.seen.lock();
        if seen.members.contains(key) {
            return false;
        }

        if seen.order.len() >= self.capacity
            && let Some(oldest) = seen.order.pop_front()
        {
            seen.members.remove(&oldest);
        }

        seen.order.push_back(key.to_string());
        seen.members.insert(key.to_string());
        true
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.seen.lock().members.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.lock().order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventDeduplicator {
    fn default() -> Self {
        Self::new()
    }
}
