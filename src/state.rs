use roadtrip_search::config::AppConfig;
use roadtrip_search::search::SearchService;

/// Shared, read-only application state / 共享只读应用状态
pub struct AppState {
    pub config: AppConfig,
    pub search: SearchService,
}

impl AppState {
    pub fn new(config: AppConfig, search: SearchService) -> Self {
        Self { config, search }
    }
}
