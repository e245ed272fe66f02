use crate::model::ModelManager;

/// Shared state handed to every handler. Holds only the model manager;
/// config is a process-wide singleton and is read where needed.
#[derive(Debug, Clone)]
pub struct AppState {
    mm: ModelManager,
}

impl AppState {
    pub fn new(mm: ModelManager) -> Self {
        Self { mm }
    }

    pub fn mm(&self) -> &ModelManager {
        &self.mm
    }
}
