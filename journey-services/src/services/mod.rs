//! Business-logic services.
//!
//! Each service returns the shared operation envelope. Services that touch
//! journey history are async and share one [`JourneyHistoryStore`].
//!
//! [`JourneyHistoryStore`]: crate::history::JourneyHistoryStore

pub mod content;
pub mod interaction;
pub mod progression;
pub mod revenue;

pub use content::{ContentReview, ContentService, ContentSubmission};
pub use interaction::{InteractionService, InteractionTurn, TurnAssessment};
pub use progression::{ProgressionService, TransitionDecision, TransitionRequest};
pub use revenue::{RevenueArrangement, RevenueReview, RevenueService};
