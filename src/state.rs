use crate::config::AppConfig;
use crate::models::ServiceCatalog;
use crate::services::dialogue::Planner;

pub struct AppState {
    pub config: AppConfig,
    pub planner: Planner,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let planner = Planner::new(ServiceCatalog::default(), config.date_format.clone());
        Self { config, planner }
    }
}
