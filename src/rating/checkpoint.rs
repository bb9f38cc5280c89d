use crate::registry::DecisionState;
use crate::storage::{DecisionStore, StorageResult};

/// Durable sink for decisions made during a session.
pub trait Checkpoint {
    fn save(&mut self, state: &DecisionState) -> StorageResult<()>;
}

impl Checkpoint for DecisionStore {
    fn save(&mut self, state: &DecisionState) -> StorageResult<()> {
        self.flush(state)
    }
}

impl<C: Checkpoint + ?Sized> Checkpoint for &mut C {
    fn save(&mut self, state: &DecisionState) -> StorageResult<()> {
        (**self).save(state)
    }
}
