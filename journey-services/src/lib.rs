//! Journey services for the liberation platform.
//!
//! Wraps the `liberation` engine in the operations route handlers call:
//!
//! - **Content review**: Scanning, strict validation and community benefit
//! - **Interaction turns**: Stage detection, bounded history and support messages
//! - **Revenue review**: Share checks and creator sovereignty
//! - **Stage transitions**: Readiness gates over the transition graph
//!
//! # Example
//!
//! ```ignore
//! use journey_services::{JourneyServices, ServicesConfig};
//!
//! let services = JourneyServices::new(ServicesConfig::default());
//! let result = services.interaction.process_turn(&turn).await?;
//! ```

pub mod config;
pub mod history;
pub mod services;
pub mod types;

use std::sync::Arc;

pub use config::ServicesConfig;
pub use history::{InMemoryHistoryStore, JourneyHistoryStore};
pub use services::*;
pub use types::*;

/// All services wired to one configuration and history store.
pub struct JourneyServices {
    pub content: ContentService,
    pub interaction: InteractionService,
    pub revenue: RevenueService,
    pub progression: ProgressionService,
    store: Arc<dyn JourneyHistoryStore>,
}

impl JourneyServices {
    /// Build the services over an in-memory history store.
    pub fn new(config: ServicesConfig) -> Self {
        let store = Arc::new(InMemoryHistoryStore::from_config(&config.history));
        Self::with_store(config, store)
    }

    /// Build the services over a caller-provided history store.
    pub fn with_store(config: ServicesConfig, store: Arc<dyn JourneyHistoryStore>) -> Self {
        tracing::info!(
            policy = %config.policy.fingerprint(),
            history_cap = config.history.cap,
            expiry_secs = ?config.history.expiry_secs,
            "Journey services initialized"
        );

        Self {
            content: ContentService::new(&config),
            interaction: InteractionService::new(&config, Arc::clone(&store)),
            revenue: RevenueService::new(&config),
            progression: ProgressionService::new(&config, Arc::clone(&store)),
            store,
        }
    }

    /// The shared history store.
    pub fn history(&self) -> &Arc<dyn JourneyHistoryStore> {
        &self.store
    }
}
