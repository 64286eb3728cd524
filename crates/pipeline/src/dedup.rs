//! Run-wide username deduplication.
//!
//! One [`Deduplicator`] is shared by every strategy of a run. It is seeded
//! with the usernames already found for the job and only ever grows.
//! Usernames are compared case-insensitively, as GitHub does.

use parking_lot::Mutex;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: Mutex<HashSet<String>>,
}

fn key(username: &str) -> String {
    username.trim().to_lowercase()
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from usernames found in earlier runs of the same job.
    pub fn seeded<I, S>(usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let seen = usernames.into_iter().map(|u| key(u.as_ref())).collect();
        Self {
            seen: Mutex::new(seen),
        }
    }

    pub fn is_seen(&self, username: &str) -> bool {
        self.seen.lock().contains(&key(username))
    }

    /// Record an accepted username. Returns `false` when it was already
    /// present, i.e. another strategy accepted it first.
    pub fn mark_accepted(&self, username: &str) -> bool {
        self.seen.lock().insert(key(username))
    }

    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
