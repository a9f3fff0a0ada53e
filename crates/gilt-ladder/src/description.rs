//! Deferred cash-flow descriptions.
//!
//! A description may embed an LP expression (e.g. "Sell 12.34 units of
//! T26") whose value is only known once the solve completes. This models
//! that as a small expression template with a `render` method that
//! resolves against the solution.

use good_lp::{Expression, Solution};

/// A cash-flow-row description, possibly embedding a value that only
/// resolves once the LP has been solved.
#[derive(Clone)]
pub enum Description {
    /// A fixed label with no embedded expression.
    Literal(String),
    /// `prefix` + the resolved value of `amount`, formatted to 2dp, + `suffix`.
    Templated {
        /// Text preceding the resolved value.
        prefix: String,
        /// The expression whose solved value is substituted in.
        amount: Expression,
        /// Text following the resolved value.
        suffix: String,
    },
}

impl Description {
    /// A fixed label.
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// A label with an embedded expression, resolved post-solve.
    #[must_use]
    pub fn templated(prefix: impl Into<String>, amount: Expression, suffix: impl Into<String>) -> Self {
        Self::Templated {
            prefix: prefix.into(),
            amount,
            suffix: suffix.into(),
        }
    }

    /// Resolves the description against a solved LP.
    #[must_use]
    pub fn render(&self, solution: &impl Solution) -> String {
        match self {
            Self::Literal(text) => text.clone(),
            Self::Templated {
                prefix,
                amount,
                suffix,
            } => format!("{prefix}{:.2}{suffix}", amount.eval_with(solution)),
        }
    }
}
