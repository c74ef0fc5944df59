//! Subcommands and their execution.
//!
//! Every command reads JSON (from `--json`, `--input` or stdin) and prints
//! pretty JSON to stdout.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Subcommand, ValueEnum};
use journey_services::{ContentSubmission, JourneyServices, RevenueArrangement, TransitionRequest};
use liberation::{
    JourneyStage, LiberationValues, OppressionScanner, PolicyConfig, StageClassifier,
    TransitionContext, UserProfile, ValidationMode, ValueValidator,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

/// CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate a liberation values record
    Validate {
        #[command(flatten)]
        input: InputArgs,
        /// Which violations invalidate the record
        #[arg(short, long, value_enum, default_value_t = ModeArg::Strict)]
        mode: ModeArg,
    },

    /// Scan text for harmful patterns
    Scan {
        /// Text to scan (stdin when omitted)
        text: Option<String>,
    },

    /// Classify text into a journey stage
    Classify {
        /// Text to classify (stdin when omitted)
        text: Option<String>,
        /// Prior stages, oldest first
        #[arg(long, value_delimiter = ',', value_parser = parse_stage)]
        history: Vec<JourneyStage>,
        /// Known location
        #[arg(long)]
        location: Option<String>,
    },

    /// Evaluate a stage transition
    Transition {
        /// Current stage
        #[arg(long, value_parser = parse_stage)]
        from: JourneyStage,
        /// Requested stage
        #[arg(long, value_parser = parse_stage)]
        to: JourneyStage,
        /// Community has validated the move
        #[arg(long)]
        community_validated: bool,
        /// Completed requirements
        #[arg(long, value_delimiter = ',')]
        completed: Vec<String>,
        /// Liberation values of the user
        #[command(flatten)]
        input: InputArgs,
    },

    /// Review a content submission
    ReviewContent {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Review a revenue arrangement
    ReviewRevenue {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Print the active policy and its fingerprint
    Policy,
}

/// Where JSON input comes from.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Read JSON from a file
    #[arg(short, long, conflicts_with = "json")]
    pub input: Option<PathBuf>,
    /// Inline JSON
    #[arg(long)]
    pub json: Option<String>,
}

impl InputArgs {
    fn parse<T: DeserializeOwned>(&self) -> anyhow::Result<T> {
        let raw = match (&self.json, &self.input) {
            (Some(json), _) => json.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            (None, None) => read_stdin()?,
        };
        serde_json::from_str(&raw).context("Input is not valid JSON for this command")
    }
}

/// Validation mode flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Strict,
    CriticalOnly,
}

impl From<ModeArg> for ValidationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Strict => ValidationMode::Strict,
            ModeArg::CriticalOnly => ValidationMode::CriticalOnly,
        }
    }
}

/// Parse a stage name as it appears on the wire.
pub fn parse_stage(raw: &str) -> Result<JourneyStage, String> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_lowercase()))
        .map_err(|_| format!("unknown stage '{}'", raw))
}

/// Execute a command, returning the JSON to print.
pub async fn execute(
    services: &JourneyServices,
    policy: &PolicyConfig,
    command: Commands,
) -> anyhow::Result<String> {
    match command {
        Commands::Validate { input, mode } => {
            let values: LiberationValues = input.parse()?;
            let result = ValueValidator::with_policy(policy).validate(&values, mode.into());
            to_json(&result)
        }

        Commands::Scan { text } => {
            let text = text_or_stdin(text)?;
            let indicators = OppressionScanner::with_policy(policy).scan(&text);
            to_json(&indicators)
        }

        Commands::Classify {
            text,
            history,
            location,
        } => {
            let text = text_or_stdin(text)?;
            let classifier = StageClassifier::with_policy(policy);
            let profile = UserProfile {
                location,
                ..Default::default()
            };
            let context = classifier.detect_stage(&text, &history, Some(&profile));
            let assessment = classifier.assess_stage(&text, &history);
            to_json(&serde_json::json!({
                "context": context,
                "assessment": assessment,
            }))
        }

        Commands::Transition {
            from,
            to,
            community_validated,
            completed,
            input,
        } => {
            let values: LiberationValues = input.parse()?;
            let mut context = TransitionContext::default().with_completed(completed);
            context.community_validated = community_validated;

            let request = TransitionRequest {
                user_id: "cli".to_string(),
                from_stage: from,
                to_stage: to,
                values,
                context,
            };
            let result = services.progression.request_transition(&request).await?;
            to_json(&result)
        }

        Commands::ReviewContent { input } => {
            let submission: ContentSubmission = input.parse()?;
            to_json(&services.content.review_content(&submission))
        }

        Commands::ReviewRevenue { input } => {
            let arrangement: RevenueArrangement = input.parse()?;
            to_json(&services.revenue.review_arrangement(&arrangement))
        }

        Commands::Policy => {
            info!(fingerprint = %policy.fingerprint(), "Printing active policy");
            to_json(&serde_json::json!({
                "fingerprint": policy.fingerprint(),
                "policy": policy,
            }))
        }
    }
}

fn text_or_stdin(text: Option<String>) -> anyhow::Result<String> {
    match text {
        Some(text) => Ok(text),
        None => read_stdin(),
    }
}

fn read_stdin() -> anyhow::Result<String> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read stdin")?;
    if buffer.trim().is_empty() {
        bail!("No input given: pass it as an argument, with --json/--input, or on stdin");
    }
    Ok(buffer)
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}
