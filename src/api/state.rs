use std::sync::Arc;

use chrono::FixedOffset;

use crate::calculate::StatsContext;
use crate::storage::StorageConfig;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageConfig>,
    pub offset: FixedOffset,
    pub cors_origin: String,
}

impl AppState {
    /// Evaluation context for one request.
    pub fn context(&self) -> StatsContext {
        StatsContext::at_offset(self.offset)
    }
}
