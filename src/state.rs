use crate::config::Config;
use crate::db::user_repository::UserRepository;
use crate::utils::session_token::SessionCodec;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn UserRepository>,
    pub sessions: Arc<SessionCodec>,
    pub config: Arc<Config>,
}
