// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{ai::Assistant, config::Config, store::Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub assistant: Arc<dyn Assistant>,
    pub config: Config,
}

impl FromRef<AppState> for Arc<Store> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Arc<dyn Assistant> {
    fn from_ref(state: &AppState) -> Self {
        state.assistant.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
