//! Extraction and context-analysis prompts.

use crate::extraction::{ContextAnalysis, ExtractionResult};

use super::{json_list, schema_of};

/// Prompt that structures a free-text dilemma description.
#[must_use]
pub fn extraction_prompt(description: &str) -> String {
    format!(
        r#"You are helping a user structure a decision.

Analyze the dilemma description and extract:
1. options: the distinct alternatives the user is considering
2. criteria: the factors that matter to them
3. userContext: personal details such as budget, currency, location, timeline, constraints, preferences
4. summarizedDilemma: one short question capturing the decision, without listing options or criteria

Rules:
- Extract options and criteria ONLY if explicitly mentioned; do not invent criteria
- Correct obvious spelling mistakes in extracted names
- Set isVague to true if the description does not describe a decision
- Set isOverlyDetailed to true if the user already listed options, criteria or extensive context

Respond ONLY with a JSON object matching this schema:
{schema}

Dilemma description:
{description}"#,
        schema = schema_of::<ExtractionResult>(),
    )
}

/// Prompt that lists what is known about the user and what is worth asking.
#[must_use]
pub fn context_analysis_prompt(
    dilemma: &str,
    description: &str,
    options: &[String],
    criteria: &[String],
) -> String {
    let dilemma = if dilemma.trim().is_empty() {
        description
    } else {
        dilemma
    };
    format!(
        r#"You gather the context needed for a fact-based comparison of options.

1. Extract every objective fact about the user that the description states or makes certain.
2. Identify missing facts that matter for the criteria, e.g. current role for career growth,
   budget for cost of living, hobbies for lifestyle.
3. Ask at most 4 short questions, one per missing field.
4. Never ask for a field you already extracted.

Respond ONLY with a JSON object matching this schema:
{schema}

Dilemma: "{dilemma}"
Description: "{description}"
Options: {options}
Criteria: {criteria}"#,
        schema = schema_of::<ContextAnalysis>(),
        options = json_list(options),
        criteria = json_list(criteria),
    )
}
