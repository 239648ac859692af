//! Assistant result types.

use serde::{Deserialize, Serialize};

use crate::reconcile::RatingMatrix;

/// Outcome of one elicitation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElicitationTurn {
    /// The matrix after the turn's update; unchanged when the model failed.
    pub matrix: RatingMatrix,
    /// Question to put to the user, absent once finished.
    pub next_question: Option<String>,
    /// No further questions are needed.
    pub finished: bool,
    /// The model's account of what it learned.
    pub reasoning: Option<String>,
    /// The model could not be reached or its reply could not be read.
    pub degraded: bool,
}

impl ElicitationTurn {
    /// Whether the turn changed the matrix.
    #[must_use]
    pub fn changed(&self, before: &RatingMatrix) -> bool {
        self.matrix.version() != before.version()
    }
}
