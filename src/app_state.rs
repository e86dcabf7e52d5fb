use sqlx::SqlitePool;
use std::sync::Arc;

use crate::config::Config;
use crate::middleware::rate_limit::RateLimits;
use crate::notify::TelegramNotifier;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub env: Config,
    pub notifier: Option<TelegramNotifier>,
    pub limits: Arc<RateLimits>,
}

impl AppState {
    pub fn new(db: SqlitePool, env: Config) -> Self {
        let notifier = env.telegram.as_ref().map(TelegramNotifier::new);
        let limits = Arc::new(RateLimits::from_config(&env.app.rate_limit));
        Self {
            db,
            env,
            notifier,
            limits,
        }
    }
}
