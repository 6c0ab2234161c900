//! Application state management

use kbgate_core::{AnswerGenerator, AppConfig};
use std::sync::Arc;

/// Application state shared across handlers
///
/// Holds no mutable data; the generator handle is shared by all in-flight
/// requests.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Knowledge base answer generator
    pub generator: Arc<dyn AnswerGenerator>,
}

impl AppState {
    /// Create new application state with config and generator
    pub fn new(config: AppConfig, generator: Arc<dyn AnswerGenerator>) -> Self {
        Self { config, generator }
    }

    /// Whether generated answers are checked before being relayed
    pub fn validates_answers(&self) -> bool {
        self.config.answer.validate_answers
    }
}
