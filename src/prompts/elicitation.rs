//! Elicitation prompts.

use serde_json::{json, Map, Value};

use crate::elicitation::ElicitationQuestion;
use crate::extraction::UserContext;
use crate::model::RatingScale;
use crate::reconcile::RatingMatrix;

use super::{json_list, schema_of};

/// Prompt that writes one comparative question per criterion.
#[must_use]
pub fn question_generation_prompt(
    dilemma: &str,
    options: &[String],
    criteria: &[String],
    context: &UserContext,
    budget: usize,
) -> String {
    format!(
        r#"You write short, conversational questions that help the user rate their options.

Rules:
1. Write exactly {budget} questions, one per criterion.
2. Every question asks the user to rate ALL options from 1 to 10.
3. Use plain language, no preamble.
4. relates_to holds the single criterion and the full list of options.

Respond ONLY with a JSON array whose items match this schema:
{schema}

Dilemma: "{dilemma}"
Options: {options}
Criteria: {criteria}
Context: {context}"#,
        schema = schema_of::<ElicitationQuestion>(),
        options = json_list(options),
        criteria = json_list(criteria),
        context = serde_json::to_string(context).unwrap_or_else(|_| "{}".to_string()),
    )
}

/// System prompt for one turn of the rating conversation.
///
/// Carries the matrix state on `scale` so the model can see which pairs are
/// still unknown.
#[must_use]
pub fn elicitation_system_prompt(matrix: &RatingMatrix, scale: RatingScale) -> String {
    let (scores, confidence, evidence) = matrix_view(matrix, scale);
    let min = scale.min();
    let max = scale.max();
    format!(
        r#"You help the user compare options across criteria by collecting evidence.

Options: {options}
Criteria: {criteria}
Current scores (null = unknown): {scores}
Current confidence: {confidence}
Evidence so far: {evidence}

Style:
- Ask one short, natural question at a time about a single option
- Do not ask "is A better than B" questions
- Prefer facts and constraints over asking for ratings
- You may propose a tentative score and ask the user to confirm it

Scoring:
- Rate from {min} (very poor) to {max} (excellent); use null while evidence is missing
- For cost, risk or commute time, lower real-world values earn higher scores
- Confidence is "high" for explicit detailed evidence, "medium" for partial evidence,
  "low" when the score is a placeholder

End EVERY reply with a fenced JSON block:
```json
{{
  "next_question": "your next question, empty when finished",
  "is_finished": false,
  "scores": {{"<option>": {{"<criterion>": 4}}}},
  "confidence": {{"<option>": {{"<criterion>": "high"}}}},
  "evidence": {{"<option>": {{"<criterion>": "what the user said"}}}},
  "reasoning": "what you learned"
}}
```"#,
        options = json_list(matrix.options()),
        criteria = json_list(matrix.criteria()),
    )
}

/// Scores, confidence and evidence as option → criterion objects.
fn matrix_view(matrix: &RatingMatrix, scale: RatingScale) -> (Value, Value, Value) {
    let mut scores = Map::new();
    let mut confidence = Map::new();
    let mut evidence = Map::new();

    for (pair, state) in matrix.pairs() {
        let score = state
            .score
            .map_or(Value::Null, |s| json!(matrix.scale().convert(s, scale)));
        insert(&mut scores, &pair.option, &pair.criterion, score);
        insert(
            &mut confidence,
            &pair.option,
            &pair.criterion,
            json!(state.confidence),
        );
        insert(
            &mut evidence,
            &pair.option,
            &pair.criterion,
            json!(state.evidence),
        );
    }

    (
        Value::Object(scores),
        Value::Object(confidence),
        Value::Object(evidence),
    )
}

fn insert(map: &mut Map<String, Value>, option: &str, criterion: &str, value: Value) {
    if let Value::Object(row) = map
        .entry(option.to_string())
        .or_insert_with(|| Value::Object(Map::new()))
    {
        row.insert(criterion.to_string(), value);
    }
}
