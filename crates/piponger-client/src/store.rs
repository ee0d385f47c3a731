use piponger_model::Snapshot;

/// Holds the latest accepted snapshot. Every replacement is wholesale; no
/// field survives from an older snapshot.
#[derive(Debug, Default)]
pub struct StatusStore {
    snapshot: Option<Snapshot>,
    replacements: u64,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, snapshot: Snapshot) {
        self.snapshot = Some(snapshot);
        self.replacements += 1;
    }

    /// `None` until the first successful poll.
    pub fn current(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Number of snapshots accepted so far.
    pub fn replacements(&self) -> u64 {
        self.replacements
    }
}
