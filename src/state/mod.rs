//! Shared application state.

pub mod quiz;
pub mod session;
mod sse;
pub mod state_machine;

use std::sync::Arc;

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::{Mutex, MutexGuard, RwLock, TryLockError, mpsc};

use crate::{config::AppConfig, dao::question_source::QuestionSource};

pub use self::session::{ConnectionId, Session};
pub use self::sse::SseHub;

/// Cloneable handle on the application state.
pub type SharedState = Arc<AppState>;

const PUBLIC_SSE_CAPACITY: usize = 64;

/// Handle used to push messages to a connected client; keyed by its
/// [`ConnectionId`] in the registry.
#[derive(Clone)]
pub struct ClientConnection {
    /// Writer channel drained by the socket's writer task.
    pub tx: mpsc::UnboundedSender<Message>,
}

/// Central application state: the live session, the connection registry and
/// the generative backend handle.
pub struct AppState {
    config: Arc<AppConfig>,
    question_source: RwLock<Option<Arc<dyn QuestionSource>>>,
    sse: SseHub,
    connections: DashMap<ConnectionId, ClientConnection>,
    session: Mutex<Session>,
    generation_gate: Mutex<()>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a question source is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let session = Session::new(config.scoring.points_per_correct);
        Arc::new(Self {
            config: Arc::new(config),
            question_source: RwLock::new(None),
            sse: SseHub::new(PUBLIC_SSE_CAPACITY),
            connections: DashMap::new(),
            session: Mutex::new(session),
            generation_gate: Mutex::new(()),
        })
    }

    /// Configuration loaded at startup.
    pub fn config(&self) -> Arc<AppConfig> {
        self.config.clone()
    }

    /// Obtain a handle to the current question source, if one is installed.
    pub async fn question_source(&self) -> Option<Arc<dyn QuestionSource>> {
        let guard = self.question_source.read().await;
        guard.as_ref().cloned()
    }

    /// Install a question source and leave degraded mode.
    pub async fn install_question_source(&self, source: Arc<dyn QuestionSource>) {
        let mut guard = self.question_source.write().await;
        *guard = Some(source);
    }

    /// Whether quizzes cannot be generated because no backend is installed.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.question_source.read().await;
        guard.is_none()
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        &self.sse
    }

    /// Registry of open realtime connections keyed by their identifier.
    pub fn connections(&self) -> &DashMap<ConnectionId, ClientConnection> {
        &self.connections
    }

    /// Run `f` against the session while holding the session lock.
    pub async fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        let guard = self.session.lock().await;
        f(&guard)
    }

    /// Run `f` against the mutable session while holding the session lock.
    ///
    /// Broadcasts queued from inside `f` are therefore ordered exactly like the
    /// mutations that produced them.
    pub async fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut guard = self.session.lock().await;
        f(&mut guard)
    }

    /// Claim the single quiz-generation slot without waiting.
    pub fn try_claim_generation(&self) -> Result<MutexGuard<'_, ()>, TryLockError> {
        self.generation_gate.try_lock()
    }
}
