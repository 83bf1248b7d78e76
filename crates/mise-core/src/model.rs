//! # Model Lifecycle
//!
//! Owns the process-wide tagger. The model artifact is opened lazily on
//! first use, exactly once, and shared read-only afterwards. The English
//! model is compiled into the crate; `MISE_MODEL_PATH` swaps in a file.

use std::env;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, LazyLock, Mutex, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{MiseError, Result};
use crate::tagger::{CrfTagger, LoadTagger};

/// Environment variable overriding the bundled English model.
pub const MODEL_PATH_ENV: &str = "MISE_MODEL_PATH";

/// The English CRF artifact shipped with this crate.
pub const BUNDLED_ENGLISH_MODEL: &str = include_str!("../models/model.en.json");

/// The process-wide English model.
pub static ENGLISH_MODEL: LazyLock<ModelManager<CrfTagger>> =
    LazyLock::new(|| ModelManager::from_source(english_model_source(env::var_os(MODEL_PATH_ENV))));

/// Bundled English model unless `path_override` names a file.
fn english_model_source(path_override: Option<OsString>) -> ModelSource {
    match path_override.filter(|p| !p.is_empty()) {
        Some(path) => ModelSource::File(PathBuf::from(path)),
        None => ModelSource::Embedded {
            name: "model.en.json",
            json: BUNDLED_ENGLISH_MODEL,
        },
    }
}

/// Where a managed model is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Artifact compiled into the binary.
    Embedded {
        name: &'static str,
        json: &'static str,
    },
    /// Artifact on disk.
    File(PathBuf),
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded { name, .. } => write!(f, "bundled {name}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Observable lifecycle state of a managed model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelStatus {
    /// Nothing has tried to load the model yet.
    Unloaded,
    /// A load is in progress on some thread.
    Loading,
    /// The model is loaded and shared.
    Ready,
    /// Loading failed. Terminal.
    Failed,
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unloaded => write!(f, "unloaded"),
            Self::Loading => write!(f, "loading"),
            Self::Ready => write!(f, "ready"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

enum State<T> {
    Unloaded,
    Loading,
    Ready(Arc<T>),
    Failed(String),
}

/// Marks the state `Failed` if a load unwinds before settling.
struct LoadingGuard<'a, T> {
    state: &'a RwLock<State<T>>,
}

impl<T> Drop for LoadingGuard<'_, T> {
    fn drop(&mut self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if matches!(*state, State::Loading) {
            *state = State::Failed("model load panicked".into());
        }
    }
}

/// Lazily loads a tagger from an artifact and hands out shared handles.
pub struct ModelManager<T> {
    source: ModelSource,
    state: RwLock<State<T>>,
    load_lock: Mutex<()>,
}

impl<T: LoadTagger> ModelManager<T> {
    /// Creates a manager for the artifact file at `path`. Nothing is read
    /// until [`ensure_ready`](Self::ensure_ready) is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::from_source(ModelSource::File(path.into()))
    }

    /// Creates a manager reading from `source`.
    pub fn from_source(source: ModelSource) -> Self {
        Self {
            source,
            state: RwLock::new(State::Unloaded),
            load_lock: Mutex::new(()),
        }
    }

    /// Where the artifact is read from.
    pub fn source(&self) -> &ModelSource {
        &self.source
    }

    /// Current lifecycle state.
    pub fn status(&self) -> ModelStatus {
        match &*self.state.read().unwrap_or_else(PoisonError::into_inner) {
            State::Unloaded => ModelStatus::Unloaded,
            State::Loading => ModelStatus::Loading,
            State::Ready(_) => ModelStatus::Ready,
            State::Failed(_) => ModelStatus::Failed,
        }
    }

    /// Returns `true` once the model is loaded.
    pub fn is_ready(&self) -> bool {
        self.status() == ModelStatus::Ready
    }

    /// Returns the loaded model, loading it first if nobody has yet.
    ///
    /// Concurrent first callers block until the single load finishes and
    /// then share its outcome.
    ///
    /// # Errors
    ///
    /// Returns `MiseError::ModelLoad` if the artifact is missing or corrupt,
    /// or if loading panicked. The failure is remembered; the load is never
    /// retried.
    pub fn ensure_ready(&self) -> Result<Arc<T>> {
        if let Some(outcome) = self.settled() {
            return outcome;
        }

        let _lock = self.load_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(outcome) = self.settled() {
            return outcome;
        }

        self.set_state(State::Loading);
        let _loading = LoadingGuard { state: &self.state };
        info!(source = %self.source, "loading tagger model");

        let loaded = match &self.source {
            ModelSource::Embedded { json, .. } => T::from_json(json),
            ModelSource::File(path) => T::load(path),
        };
        match loaded {
            Ok(model) => {
                let model = Arc::new(model);
                self.set_state(State::Ready(Arc::clone(&model)));
                Ok(model)
            }
            Err(err) => {
                let message = err.to_string();
                error!(source = %self.source, error = %message, "failed to load tagger model");
                self.set_state(State::Failed(message.clone()));
                Err(MiseError::ModelLoad(message))
            }
        }
    }

    /// Outcome of a finished load, or `None` while unloaded or loading.
    fn settled(&self) -> Option<Result<Arc<T>>> {
        match &*self.state.read().unwrap_or_else(PoisonError::into_inner) {
            State::Ready(model) => Some(Ok(Arc::clone(model))),
            State::Failed(message) => Some(Err(MiseError::ModelLoad(message.clone()))),
            State::Unloaded | State::Loading => None,
        }
    }

    fn set_state(&self, state: State<T>) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

impl<T> fmt::Debug for ModelManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelManager")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
