use crate::chat::Session;
use crate::core::AppConfig;

pub struct AppState {
    /// The single conversation owned by this process. Initialized
    /// empty; reset only by the clear action or a restart.
    pub session: Session,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            session: Session::new(),
            config,
        }
    }
}
