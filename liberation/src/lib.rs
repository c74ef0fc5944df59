//! Liberation values validation and journey progression.
//!
//! The rule-based core every business-logic service calls into:
//!
//! - **Values validation**: Score a record against five weighted policy dimensions
//! - **Stage classification**: Map free text to one of five support stages
//! - **Progression**: Gate stage transitions on policy and community sign-off
//! - **Harmful-pattern scanning**: Categorized indicators with severity escalation
//!
//! # Key Components
//!
//! - [`ValueValidator`]: Threshold checks and the additive empowerment score
//! - [`StageClassifier`]: Keyword stage detection with history continuity
//! - [`ProgressionRuleEngine`]: The four-edge transition graph and readiness gates
//! - [`OppressionScanner`]: Catalog matching with context windows and remedies
//! - [`ResultAggregator`]: Folds outcome and validation into the shared envelope
//!
//! All thresholds and weights come from a single [`PolicyConfig`].
//!
//! # Example
//!
//! ```ignore
//! use liberation::{LiberationValues, ValidationMode, ValueValidator};
//!
//! let validator = ValueValidator::new();
//! let values = LiberationValues::new(0.5, true, 0.8, 0.9, 0.9);
//! let result = validator.validate(&values, ValidationMode::Strict);
//! assert!(!result.is_valid);
//! ```

pub mod aggregate;
pub mod catalog;
pub mod classifier;
pub mod impact;
pub mod journey;
pub mod policy;
pub mod progression;
pub mod scanner;
pub mod types;
pub mod validator;

// Re-export main types
pub use aggregate::{BusinessLogicOperationResult, ImpactScores, OperationOutcome, ResultAggregator};
pub use classifier::{StageAssessment, StageClassifier, StageScore};
pub use impact::AlignmentSignal;
pub use journey::*;
pub use policy::PolicyConfig;
pub use progression::{ProgressionRuleEngine, ReadinessAssessment, TransitionContext};
pub use scanner::OppressionScanner;
pub use types::*;
pub use validator::ValueValidator;
