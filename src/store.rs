use crate::models::StoredLead;
use std::sync::RwLock;

/// Storage for scored leads, owned by the serving layer.
///
/// The scoring pipeline never touches the store; handlers append after a
/// successful score.
pub trait LeadStore: Send + Sync {
    fn append(&self, lead: StoredLead);
    /// All stored leads in insertion order.
    fn list(&self) -> Vec<StoredLead>;
    fn count(&self) -> usize;
}

/// Process-lifetime store. Appends are serialized behind a lock.
#[derive(Debug, Default)]
pub struct InMemoryLeadStore {
    leads: RwLock<Vec<StoredLead>>,
}

impl InMemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LeadStore for InMemoryLeadStore {
    fn append(&self, lead: StoredLead) {
        // A poisoned lock only means another append panicked; the Vec is still usable.
        let mut leads = self.leads.write().unwrap_or_else(|e| e.into_inner());
        leads.push(lead);
    }

    fn list(&self) -> Vec<StoredLead> {
        self.leads
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn count(&self) -> usize {
        self.leads.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}
