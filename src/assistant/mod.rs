//! Decision session orchestration.
//!
//! [`DecisionAssistant`] drives one decision through the generative model:
//!
//! ```text
//! extract ──▶ analyze_context ──▶ plan_questions ──▶ elicit_turn* ──▶ analyze
//!  (model)        (model)             (model)           (model)        (pure)
//! ```
//!
//! Every model call is optional. When the model is unreachable or its answer
//! cannot be normalized the assistant falls back to a deterministic result
//! (vague extraction, no context questions, templated questions, unchanged
//! matrix) and logs a warning. Only [`DecisionAssistant::analyze`] can fail,
//! and only when the ranking itself would be meaningless.

mod types;

pub use types::ElicitationTurn;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::analysis::{self, DecisionAnalysis};
use crate::config::Config;
use crate::elicitation::{self, question_budget, ElicitationQuestion};
use crate::error::ScoringError;
use crate::extraction::{is_abstract_option_set, ContextAnalysis, ExtractionResult, UserContext};
use crate::model::{Decision, RatingScale};
use crate::normalize::{excerpt, extract_json, serialize_for_log};
use crate::prompts::{
    context_analysis_prompt, elicitation_system_prompt, extraction_prompt,
    question_generation_prompt,
};
use crate::reconcile::{MatrixUpdate, RatingMatrix};
use crate::scoring::rank;
use crate::traits::{CompletionConfig, GenerativeClient, Message};

/// Scale of the conversational rating turns.
pub const ELICITATION_SCALE: RatingScale = RatingScale::FivePoint;

/// Question asked when a turn could not be read.
pub const FALLBACK_QUESTION: &str =
    "I'd love to understand more about your options. Could you tell me about each one?";

/// Sampling temperature for every model call.
pub const TEMPERATURE: f32 = 0.7;

/// Token limit for every model call.
pub const MAX_TOKENS: u32 = 1024;

const OPENING_MESSAGE: &str = "I'm ready to compare my options.";

const LOG_PREVIEW_CHARS: usize = 300;

/// Orchestrates one decision session over a [`GenerativeClient`].
pub struct DecisionAssistant<C>
where
    C: GenerativeClient,
{
    client: C,
    config: Config,
}

impl<C> DecisionAssistant<C>
where
    C: GenerativeClient,
{
    /// Create a new assistant.
    #[must_use]
    pub const fn new(client: C, config: Config) -> Self {
        Self { client, config }
    }

    /// The underlying client.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Structure a free-text dilemma description.
    ///
    /// Descriptions shorter than `min_description_chars` are vague without a
    /// model call. Any failure also yields [`ExtractionResult::vague`].
    pub async fn extract(&self, description: &str) -> ExtractionResult {
        let description = description.trim();
        if description.chars().count() < self.config.min_description_chars {
            info!(
                chars = description.chars().count(),
                "Description too short, treating as vague"
            );
            return ExtractionResult::vague();
        }

        let messages = vec![Message::user(extraction_prompt(description))];
        let Some(value) = self.ask_json("extraction", messages, completion_config()).await else {
            return ExtractionResult::vague();
        };

        let result = ExtractionResult::from_value(&value);
        info!(
            options = result.options.len(),
            criteria = result.criteria.len(),
            vague = result.is_vague,
            "Extracted dilemma"
        );
        debug!(extraction = %serialize_for_log(&result, LOG_PREVIEW_CHARS), "Extraction payload");
        result
    }

    /// What is known about the user and what is still worth asking.
    ///
    /// Skipped for placeholder options such as "Option A"; any failure means
    /// nothing more is asked.
    pub async fn analyze_context(
        &self,
        decision: &Decision,
        dilemma: &str,
        description: &str,
    ) -> ContextAnalysis {
        if is_abstract_option_set(decision.options()) {
            debug!("Placeholder options, skipping context analysis");
            return ContextAnalysis::complete();
        }

        let prompt = context_analysis_prompt(
            dilemma,
            description,
            decision.options(),
            &decision.criterion_names(),
        );
        let analysis = self
            .ask_json("context", vec![Message::user(prompt)], completion_config())
            .await
            .map_or_else(ContextAnalysis::complete, |value| {
                ContextAnalysis::from_value(&value)
            });
        debug!(context = %serialize_for_log(&analysis, LOG_PREVIEW_CHARS), "Context payload");
        analysis
    }

    /// One comparative question per criterion.
    ///
    /// Model-written questions are coerced onto the plan; without them the
    /// templated plan is used.
    pub async fn plan_questions(
        &self,
        decision: &Decision,
        dilemma: &str,
        context: &UserContext,
    ) -> Vec<ElicitationQuestion> {
        let options = decision.options();
        let criteria = decision.criterion_names();
        if criteria.is_empty() {
            return Vec::new();
        }

        let budget = question_budget(criteria.len(), options.len());
        let prompt = question_generation_prompt(dilemma, options, &criteria, context, budget);
        match self
            .ask_json("questions", vec![Message::user(prompt)], completion_config())
            .await
        {
            Some(value) => elicitation::coerce_questions(&value, options, &criteria),
            None => elicitation::plan_questions(options, &criteria),
        }
    }

    /// A fresh matrix for `decision` on the configured scale.
    #[must_use]
    pub fn start_matrix(&self, decision: &Decision) -> RatingMatrix {
        RatingMatrix::new(
            decision.options().iter().cloned(),
            decision.criterion_names(),
            self.config.rating_scale,
        )
    }

    /// Run one conversational rating turn.
    ///
    /// The model sees the matrix on the 1–5 scale and the conversation so
    /// far. Its proposed update is coerced and folded in. The turn is
    /// finished when every pair is settled or `proceed` is set; the model's
    /// own claim is not trusted.
    pub async fn elicit_turn(
        &self,
        matrix: &RatingMatrix,
        conversation: &[Message],
        proceed: bool,
    ) -> ElicitationTurn {
        let system_prompt = elicitation_system_prompt(matrix, ELICITATION_SCALE);
        let config = completion_config().with_system_prompt(system_prompt);
        let mut messages = conversation.to_vec();
        if !messages.iter().any(Message::is_user) {
            messages.push(Message::user(OPENING_MESSAGE));
        }

        let Some(value) = self.ask_json("elicitation", messages, config).await else {
            let finished = matrix.is_finished(proceed);
            return ElicitationTurn {
                matrix: matrix.clone(),
                next_question: (!finished).then(|| FALLBACK_QUESTION.to_string()),
                finished,
                reasoning: None,
                degraded: true,
            };
        };

        let update = MatrixUpdate::from_value(&value, ELICITATION_SCALE);
        let next = matrix.apply(&update);
        let finished = next.is_finished(proceed);

        if let Some(claimed) = value.get("is_finished").and_then(Value::as_bool) {
            if claimed != finished {
                debug!(claimed, finished, "Model completion claim overridden");
            }
        }

        let next_question = if finished {
            None
        } else {
            Some(
                string_field(&value, "next_question")
                    .unwrap_or_else(|| FALLBACK_QUESTION.to_string()),
            )
        };

        info!(
            version = next.version(),
            coverage = next.coverage(),
            finished,
            "Elicitation turn"
        );

        ElicitationTurn {
            matrix: next,
            next_question,
            finished,
            reasoning: string_field(&value, "reasoning"),
            degraded: false,
        }
    }

    /// Rank the options and explain the result.
    ///
    /// Unknown pairs are filled with the configured neutral rating and
    /// reported in `defaulted_pairs`.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError`] if the decision cannot be ranked (fewer than
    /// two options, no criteria, invalid weights).
    pub fn analyze(
        &self,
        decision: &Decision,
        matrix: &RatingMatrix,
    ) -> Result<DecisionAnalysis, ScoringError> {
        let resolved = matrix.resolve(matrix.scale(), self.config.neutral_rating);
        let input = decision.scoring_input(resolved.ratings, resolved.scale);
        let outcome = rank(&input)?;
        let result = analysis::analyze(
            outcome,
            resolved.defaulted_pairs,
            &self.config.analysis_settings(),
        );
        info!(
            winner = result.winner.as_deref().unwrap_or("none"),
            tie = result.has_tie,
            reduced_confidence = result.reduced_confidence,
            "Analysis complete"
        );
        Ok(result)
    }

    /// Call the model and normalize its reply; `None` on any failure.
    async fn ask_json(
        &self,
        phase: &str,
        messages: Vec<Message>,
        config: CompletionConfig,
    ) -> Option<Value> {
        let response = match self.client.complete(messages, config).await {
            Ok(response) => response,
            Err(e) => {
                warn!(phase, error = %e, "Model unavailable, using fallback");
                return None;
            }
        };
        debug!(phase, tokens = response.usage.total(), "Model replied");

        match extract_json(&response.content) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(
                    phase,
                    error = %e,
                    reply = %excerpt(&response.content),
                    "Unreadable model reply, using fallback"
                );
                None
            }
        }
    }
}

fn completion_config() -> CompletionConfig {
    CompletionConfig::new()
        .with_max_tokens(MAX_TOKENS)
        .with_temperature(TEMPERATURE)
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
