use std::sync::Arc;

use crate::{
    config::Config, services::user_directory::UserDirectory, storage::MessageStore,
    websocket::ConnectionRegistry,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MessageStore>,
    pub users: Arc<dyn UserDirectory>,
    pub registry: ConnectionRegistry,
    pub config: Arc<Config>,
}
