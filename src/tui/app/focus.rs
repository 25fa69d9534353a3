//! Mount tracking for rows
//!
//! Rows that want focus when they first appear (the new job draft) get it
//! once per identity. Re-rendering the same row does not steal focus again.

use std::collections::HashSet;

use crate::models::JobId;

/// Identity of a rendered row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    Job(JobId),
    Draft(u64),
}

#[derive(Debug, Default)]
pub struct MountEffects {
    mounted: HashSet<RowKey>,
}

impl MountEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a row is on screen.
    ///
    /// Returns true only the first time a row with `autofocus` is mounted.
    pub fn mount(&mut self, key: RowKey, autofocus: bool) -> bool {
        let first = self.mounted.insert(key);
        first && autofocus
    }

    /// Unmount rows no longer on screen so a returning identity mounts fresh
    pub fn retain_live<'a>(&mut self, live: impl IntoIterator<Item = &'a RowKey>) {
        let live: HashSet<&RowKey> = live.into_iter().collect();
        self.mounted.retain(|key| live.contains(key));
    }

    #[must_use]
    pub fn is_mounted(&self, key: &RowKey) -> bool {
        self.mounted.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autofocus_fires_once_per_identity() {
        let mut mounts = MountEffects::new();
        assert!(mounts.mount(RowKey::Draft(1), true));
        assert!(!mounts.mount(RowKey::Draft(1), true));

        // A new draft is a new identity
        assert!(mounts.mount(RowKey::Draft(2), true));
    }

    #[test]
    fn test_existing_rows_never_autofocus() {
        let mut mounts = MountEffects::new();
        assert!(!mounts.mount(RowKey::Job(JobId::new("a")), false));
        assert!(mounts.is_mounted(&RowKey::Job(JobId::new("a"))));
    }

    #[test]
    fn test_unmount_cleanup() {
        let mut mounts = MountEffects::new();
        mounts.mount(RowKey::Draft(1), true);
        mounts.mount(RowKey::Job(JobId::new("a")), false);

        let live = [RowKey::Job(JobId::new("a"))];
        mounts.retain_live(live.iter());
        assert!(!mounts.is_mounted(&RowKey::Draft(1)));
        assert!(mounts.mount(RowKey::Draft(1), true));
    }
}
