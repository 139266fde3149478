use std::collections::HashMap;

use serde::Serialize;
use th_core::{Draft, DraftField, PreviewHandle, WizardProgress};
use tokio::sync::{Mutex, MutexGuard};

/// Guards coordinating the persistence trigger with hydration and clearing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PersistenceGuards {
    /// Set once the stored snapshot has been read. No write happens before.
    pub has_hydrated: bool,
    /// Swallows the next persistence trigger after the snapshot was removed.
    pub skip_next_persist: bool,
}

/// Everything one wizard session owns.
pub(crate) struct WizardState {
    pub progress: WizardProgress,
    pub draft: Draft,
    pub guards: PersistenceGuards,
    pub previews: HashMap<DraftField, PreviewHandle>,
    pub account_id: Option<String>,
}

impl WizardState {
    fn initial() -> Self {
        Self {
            progress: WizardProgress::initial(),
            draft: Draft::default(),
            guards: PersistenceGuards::default(),
            previews: HashMap::new(),
            account_id: None,
        }
    }

    /// Back to a blank wizard. Guards are left to the caller.
    pub fn reinitialize(&mut self) {
        let guards = self.guards;
        *self = Self::initial();
        self.guards = guards;
    }
}

/// Shared wizard context.
///
/// The state lock is never held across a submission round trip, so a second
/// submit issued while the first is pending observes the in-flight flag.
pub(crate) struct WizardContext {
    state: Mutex<WizardState>,
}

impl WizardContext {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(WizardState::initial()),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, WizardState> {
        self.state.lock().await
    }
}
