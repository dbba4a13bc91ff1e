use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use axum::extract::FromRef;

use crate::config::Config;
use crate::models::solar::RegionRecord;
use crate::services::prediction_service::PredictionClient;
use crate::session::{self, Event, SessionState, Transition};

#[derive(Clone, Debug)]
pub struct AppState {
    /// Map of session_id to current session snapshot
    pub sessions: Arc<RwLock<HashMap<String, SessionState>>>,
    /// Regional dataset, loaded once at startup and read-only after
    pub dataset: Arc<Vec<RegionRecord>>,
    started_at: Instant,
}

impl AppState {
    pub fn new(dataset: Vec<RegionRecord>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            dataset: Arc::new(dataset),
            started_at: Instant::now(),
        }
    }

    pub fn insert_session(&self, session_id: &str, state: SessionState) {
        if let Ok(mut map) = self.sessions.write() {
            map.insert(session_id.to_string(), state);
        }
    }

    pub fn get_session(&self, session_id: &str) -> Option<SessionState> {
        if let Ok(map) = self.sessions.read() {
            map.get(session_id).cloned()
        } else {
            None
        }
    }

    pub fn remove_session(&self, session_id: &str) -> bool {
        if let Ok(mut map) = self.sessions.write() {
            map.remove(session_id).is_some()
        } else {
            false
        }
    }

    /// Reduce one event against the stored snapshot and commit the result,
    /// all under the write lock so concurrent events on the same session
    /// serialize cleanly. Returns `None` for unknown sessions.
    pub fn apply_event(&self, session_id: &str, event: Event) -> Option<Transition> {
        if let Ok(mut map) = self.sessions.write() {
            let current = map.get(session_id)?;
            let transition = session::reduce(current, event);
            map.insert(session_id.to_string(), transition.next.clone());
            Some(transition)
        } else {
            None
        }
    }

    pub fn session_count(&self) -> usize {
        if let Ok(map) = self.sessions.read() {
            map.len()
        } else {
            0
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Top-level axum state. Handlers extract the slice they need
/// (`State<AppState>`, `State<Config>`, `State<PredictionClient>`) via the
/// `FromRef` impls below.
#[derive(Clone)]
pub struct SharedState {
    pub app: AppState,
    pub config: Config,
    pub predictor: PredictionClient,
}

impl FromRef<SharedState> for AppState {
    fn from_ref(shared: &SharedState) -> AppState {
        shared.app.clone()
    }
}

impl FromRef<SharedState> for Config {
    fn from_ref(shared: &SharedState) -> Config {
        shared.config.clone()
    }
}

impl FromRef<SharedState> for PredictionClient {
    fn from_ref(shared: &SharedState) -> PredictionClient {
        shared.predictor.clone()
    }
}
