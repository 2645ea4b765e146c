use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Sliding window limiter allowing `limit` calls per `duration` seconds for each key.
pub struct RateLimiter<K> {
    limit: usize,
    duration: i32,
    history: HashMap<K, VecDeque<i32>>,
}

impl<K: Eq + Hash> RateLimiter<K> {
    pub fn new(limit: usize, duration: i32) -> Self {
        Self { limit, duration, history: HashMap::new() }
    }

    /// Records a call made at `time`, or returns the remaining cooldown in seconds if the
    /// window is full. Rejected calls are not recorded.
    pub fn update_rate_limit(&mut self, key: K, time: i32) -> Option<i32> {
        let calls = self.history.entry(key).or_default();
        calls.retain(|&call| time - call < self.duration);

        if calls.len() >= self.limit {
            let oldest = calls.front().copied().unwrap_or(time);
            return Some(self.duration - (time - oldest));
        }

        calls.push_back(time);
        None
    }
}

pub struct RateLimits {
    pub rate_limit_exceeded: RateLimiter<i64>,
}
