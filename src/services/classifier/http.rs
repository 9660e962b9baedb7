// Client for a hosted text-classification model (Hugging Face inference shape)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::bot::error::Error;
use crate::constants::limits::{CLASSIFIER_TIMEOUT, MAX_CLASSES, MAX_CLASSIFIER_INPUT_CHARS};
use crate::services::classifier::{Classification, SpamClassifier};

pub struct HttpClassifier {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

// what we send to the model
#[derive(Serialize)]
struct Request<'a> {
    inputs: &'a str,
    parameters: Parameters,
}

#[derive(Serialize)]
struct Parameters {
    top_k: u32,
}

// what the model sends back, either batched or flat
#[derive(Deserialize)]
#[serde(untagged)]
enum Response {
    Batched(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

impl HttpClassifier {
    pub fn new(url: impl Into<String>, token: Option<String>) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(CLASSIFIER_TIMEOUT)
            .build()
            .map_err(|e| Error::Classifier(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            token,
        })
    }

    async fn request(&self, text: &str) -> Result<Classification, Error> {
        let input: String = text.chars().take(MAX_CLASSIFIER_INPUT_CHARS).collect();
        let body = Request {
            inputs: &input,
            parameters: Parameters { top_k: 2 },
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Classifier(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            return Err(Error::Classifier(format!("{}: {}", status, error)));
        }

        let response: Response = response
            .json()
            .await
            .map_err(|e| Error::Classifier(e.to_string()))?;

        let scores = match response {
            Response::Batched(batches) => batches.into_iter().next().unwrap_or_default(),
            Response::Flat(scores) => scores,
        };

        interpret(&scores)
            .ok_or_else(|| Error::Classifier("response contained no labels".to_string()))
    }
}

#[async_trait]
impl SpamClassifier for HttpClassifier {
    async fn classify(&self, text: &str) -> Classification {
        match self.request(text).await {
            Ok(classification) => {
                debug!(
                    "Classified message: spam={} (p={:.2})",
                    classification.is_spam,
                    classification.spam_probability()
                );
                classification
            }
            Err(e) => {
                error!("Spam classification failed: {}", e);
                Classification::neutral()
            }
        }
    }
}

/// Class index for a model label: `LABEL_<n>` below [`MAX_CLASSES`], or a
/// named spam/ham label
fn label_index(label: &str) -> Option<usize> {
    if let Some(n) = label.strip_prefix("LABEL_") {
        return n.parse::<usize>().ok().filter(|i| *i < MAX_CLASSES);
    }
    match label.to_ascii_lowercase().as_str() {
        "spam" => Some(1),
        "ham" | "not_spam" | "clean" => Some(0),
        _ => None,
    }
}

/// Turn label scores into a probability vector ordered by class index
fn interpret(scores: &[LabelScore]) -> Option<Classification> {
    let indexed: Vec<(usize, f32)> = scores
        .iter()
        .filter_map(|s| label_index(&s.label).map(|i| (i, s.score)))
        .collect();

    if indexed.is_empty() {
        return None;
    }

    let mut probabilities = vec![0.0; MAX_CLASSES];
    for (i, score) in indexed {
        probabilities[i] = score;
    }

    let argmax = probabilities
        .iter()
        .enumerate()
        .fold(0, |best, (i, p)| if *p > probabilities[best] { i } else { best });

    Some(Classification::new(argmax == 1, probabilities))
}
