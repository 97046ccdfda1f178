//! Engine construction.

use std::sync::Arc;

use crate::recognize::{AddressParser, Recognizer};
use crate::resource::ResourceFactory;

use super::{EngineConfig, NavigationEngine};

/// Builder for [`NavigationEngine`].
///
/// The parser, recognizer, factory and root kind are mandatory and taken up
/// front; everything else has a default and can be overridden before
/// [`build`](Self::build).
pub struct EngineBuilder {
    parser: Arc<dyn AddressParser>,
    recognizer: Arc<dyn Recognizer>,
    factory: Arc<dyn ResourceFactory>,
    root_kind: String,
    config: EngineConfig,
}

impl EngineBuilder {
    /// Start a builder with the mandatory collaborators.
    ///
    /// `root_kind` names the route configuration the recognizer matches
    /// addresses against.
    pub fn new(
        parser: Arc<dyn AddressParser>,
        recognizer: Arc<dyn Recognizer>,
        factory: Arc<dyn ResourceFactory>,
        root_kind: impl Into<String>,
    ) -> Self {
        Self {
            parser,
            recognizer,
            factory,
            root_kind: root_kind.into(),
            config: EngineConfig::default(),
        }
    }

    /// Override the outlet names available at the top level.
    pub fn with_root_slots(mut self, slots: Vec<String>) -> Self {
        self.config.root_slots = slots;
        self
    }

    /// Override the change broadcast channel capacity.
    pub fn with_change_capacity(mut self, capacity: usize) -> Self {
        self.config.change_capacity = capacity;
        self
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Construct the engine.
    pub fn build(self) -> NavigationEngine {
        NavigationEngine::from_parts(
            self.parser,
            self.recognizer,
            self.factory,
            self.root_kind,
            self.config,
        )
    }
}
