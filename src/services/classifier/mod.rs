pub mod http;

use async_trait::async_trait;

use crate::constants::limits::NEUTRAL_PROBABILITIES;

pub use http::HttpClassifier;

/// Verdict for a single message
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub is_spam: bool,
    /// Class probabilities, index 1 being spam
    pub probabilities: Vec<f32>,
}

impl Classification {
    pub fn new(is_spam: bool, probabilities: Vec<f32>) -> Self {
        Self {
            is_spam,
            probabilities,
        }
    }

    /// "Not spam" with no confidence either way; used whenever classification fails
    pub fn neutral() -> Self {
        Self::new(false, NEUTRAL_PROBABILITIES.to_vec())
    }

    pub fn spam_probability(&self) -> f32 {
        self.probabilities.get(1).copied().unwrap_or(0.0)
    }
}

/// Spam classifier boundary. Implementations must never fail past this call:
/// any internal error degrades to [`Classification::neutral`].
#[async_trait]
pub trait SpamClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Classification;
}
