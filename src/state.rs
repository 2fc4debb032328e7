use crate::reports::ScopeLocks;
use crate::store::DayStore;
use crate::summarizer::Summarizer;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DayStore>,
    pub summarizer: Arc<dyn Summarizer>,
    pub locks: Arc<ScopeLocks>,
}

impl AppState {
    pub fn new(store: DayStore, summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            store: Arc::new(store),
            summarizer,
            locks: Arc::new(ScopeLocks::default()),
        }
    }
}
