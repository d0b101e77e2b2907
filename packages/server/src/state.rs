use common::RecordStore;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub records: RecordStore,
    pub config: AppConfig,
}
