//! Dietary classification of extracted receipt items
//!
//! The remote language-model service sits behind the [`CategoryClassifier`]
//! port. [`ClassificationService`] owns the fallback policy: whatever goes
//! wrong remotely, every input item comes back as an [`ExpenseItem`], tagged
//! `Shared` where no usable label was obtained.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ClassifierSettings;
use crate::models::{ExpenseItem, ExtractedItem, ItemCategory};

const SYSTEM_PROMPT: &str = "You are a helpful assistant that classifies food items. \
For each item, respond with only one word: \"Vegetarian\", \"Non-Vegetarian\", or \"Shared\". \
Shared items are things like drinks, sides, or items that both vegetarians and \
non-vegetarians would consume.";

/// Failure talking to the remote classifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Port to a remote service that labels item names
///
/// Implementations return the service's raw answer: a comma-delimited list of
/// labels in request order.
#[async_trait]
pub trait CategoryClassifier: Send + Sync {
    async fn classify_names(&self, names: &[String]) -> Result<String, ClassifierError>;
}

/// Why categories could not be resolved automatically
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// No credential was supplied
    MissingCredential,
    /// The remote call failed
    ServiceFailed(String),
    /// The service answered with fewer labels than items
    ShortResponse { expected: usize, received: usize },
}

/// Outcome of a classification attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationStatus {
    /// Labels were applied; `unrecognized` positions fell back to `Shared`
    Resolved { unrecognized: usize },
    /// Every item was tagged `Shared`; the user should review categories
    Unresolved(UnresolvedReason),
}

impl ClassificationStatus {
    /// A user-facing hint, if the user should act on the outcome
    pub fn hint(&self) -> Option<String> {
        match self {
            ClassificationStatus::Resolved { unrecognized: 0 } => None,
            ClassificationStatus::Resolved { unrecognized } => Some(format!(
                "{} item(s) could not be classified and were marked Shared",
                unrecognized
            )),
            ClassificationStatus::Unresolved(UnresolvedReason::MissingCredential) => Some(
                "Items were marked Shared. Edit categories manually, or supply an API key for automatic tagging"
                    .to_string(),
            ),
            ClassificationStatus::Unresolved(_) => Some(
                "Automatic categorization failed; items were marked Shared. Edit categories manually"
                    .to_string(),
            ),
        }
    }
}

/// Categorized items plus how they were categorized
#[derive(Debug, Clone)]
pub struct Classification {
    pub items: Vec<ExpenseItem>,
    pub status: ClassificationStatus,
}

impl Classification {
    pub fn is_resolved(&self) -> bool {
        matches!(self.status, ClassificationStatus::Resolved { .. })
    }

    fn all_shared(items: Vec<ExtractedItem>, reason: UnresolvedReason) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|item| item.into_expense(ItemCategory::Shared))
                .collect(),
            status: ClassificationStatus::Unresolved(reason),
        }
    }
}

/// Applies dietary categories to extracted items
#[derive(Debug, Clone, Default)]
pub struct ClassificationService {
    settings: ClassifierSettings,
}

impl ClassificationService {
    pub fn new(settings: ClassifierSettings) -> Self {
        Self { settings }
    }

    /// Classify items through the configured remote service
    ///
    /// Without a credential no request is made and every item is `Shared`.
    pub async fn classify(
        &self,
        items: Vec<ExtractedItem>,
        credential: Option<&str>,
    ) -> Classification {
        let Some(key) = credential.map(str::trim).filter(|k| !k.is_empty()) else {
            debug!(items = items.len(), "classification_skipped_no_credential");
            return Classification::all_shared(items, UnresolvedReason::MissingCredential);
        };

        match OpenAiClassifier::new(&self.settings, key) {
            Ok(classifier) => classify_with(items, &classifier).await,
            Err(e) => {
                warn!(error = %e, "classifier_client_build_failed");
                Classification::all_shared(items, UnresolvedReason::ServiceFailed(e.to_string()))
            }
        }
    }
}

/// Classify items with default classifier settings
pub async fn classify_items(items: Vec<ExtractedItem>, credential: Option<&str>) -> Classification {
    ClassificationService::default()
        .classify(items, credential)
        .await
}

/// Classify items through any classifier implementation
pub async fn classify_with(
    items: Vec<ExtractedItem>,
    classifier: &dyn CategoryClassifier,
) -> Classification {
    if items.is_empty() {
        return Classification {
            items: Vec::new(),
            status: ClassificationStatus::Resolved { unrecognized: 0 },
        };
    }

    // Commas inside names would shift every label after them
    let names: Vec<String> = items.iter().map(|i| i.name.replace(',', " ")).collect();

    let response = match classifier.classify_names(&names).await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, items = items.len(), "classification_failed");
            return Classification::all_shared(items, UnresolvedReason::ServiceFailed(e.to_string()));
        }
    };

    let labels = parse_labels(&response);
    let expected = items.len();
    let received = labels.len();
    if received < expected {
        warn!(expected, received, "classification_short_response");
        return Classification::all_shared(
            items,
            UnresolvedReason::ShortResponse { expected, received },
        );
    }

    let mut unrecognized = 0;
    let items = items
        .into_iter()
        .zip(labels)
        .map(|(item, label)| {
            let category = match ItemCategory::from_label(label) {
                // Total is not a label the service may assign
                Some(ItemCategory::Total) | None => {
                    unrecognized += 1;
                    ItemCategory::Shared
                }
                Some(category) => category,
            };
            item.into_expense(category)
        })
        .collect();

    if unrecognized > 0 {
        debug!(unrecognized, "classification_labels_unrecognized");
    }

    Classification {
        items,
        status: ClassificationStatus::Resolved { unrecognized },
    }
}

/// Split the answer into positional labels
///
/// Empty fields keep their position so later labels stay aligned with their
/// items. Only one trailing empty field (a trailing comma) is dropped.
fn parse_labels(response: &str) -> Vec<&str> {
    let mut labels: Vec<&str> = response.split(',').map(str::trim).collect();
    if labels.last().is_some_and(|label| label.is_empty()) {
        labels.pop();
    }
    labels
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Chat-completions client for OpenAI-compatible endpoints
pub struct OpenAiClassifier {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    api_key: String,
}

impl OpenAiClassifier {
    pub fn new(settings: &ClassifierSettings, api_key: &str) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ClassifierError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            api_key: api_key.to_string(),
        })
    }

    fn build_request(&self, names: &[String]) -> ChatRequest<'_> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!(
                        "Classify these food items: {}. Respond with classifications in the same order, separated by commas.",
                        names.join(", ")
                    ),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl CategoryClassifier for OpenAiClassifier {
    async fn classify_names(&self, names: &[String]) -> Result<String, ClassifierError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.build_request(names))
            .send()
            .await
            .map_err(|e| ClassifierError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            return Err(ClassifierError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::MalformedResponse(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ClassifierError::MalformedResponse("No choices in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    fn extracted(names: &[&str]) -> Vec<ExtractedItem> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| ExtractedItem {
                name: name.to_string(),
                amount: Money::from_cents(100 * (i as i64 + 1)),
                raw_text: format!("{} {}.00", name, i + 1),
            })
            .collect()
    }

    fn categories(classification: &Classification) -> Vec<ItemCategory> {
        classification.items.iter().map(|i| i.category).collect()
    }

    /// Answers with a canned response and records the names it was asked about
    struct StubClassifier {
        response: Result<String, ClassifierError>,
        seen: Mutex<Vec<String>>,
    }

    impl StubClassifier {
        fn answering(response: &str) -> Self {
            Self {
                response: Ok(response.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(err: ClassifierError) -> Self {
            Self {
                response: Err(err),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CategoryClassifier for StubClassifier {
        async fn classify_names(&self, names: &[String]) -> Result<String, ClassifierError> {
            self.seen.lock().unwrap().extend(names.iter().cloned());
            self.response.clone()
        }
    }

    #[tokio::test]
    async fn test_labels_applied_in_order() {
        let stub = StubClassifier::answering("Vegetarian, Non-Vegetarian, Shared");
        let result = classify_with(extracted(&["Paneer Tikka", "Lamb Curry", "Cola"]), &stub).await;

        assert_eq!(
            categories(&result),
            vec![
                ItemCategory::Vegetarian,
                ItemCategory::NonVegetarian,
                ItemCategory::Shared
            ]
        );
        assert_eq!(result.status, ClassificationStatus::Resolved { unrecognized: 0 });
        assert_eq!(result.items[1].name, "Lamb Curry");
        assert_eq!(result.items[1].amount, Money::from_cents(200));
    }

    #[tokio::test]
    async fn test_unrecognized_label_falls_back_per_item() {
        let stub = StubClassifier::answering("Vegan, Non-Vegetarian, Total");
        let result = classify_with(extracted(&["Salad", "Wings", "Bill"]), &stub).await;

        assert_eq!(
            categories(&result),
            vec![
                ItemCategory::Shared,
                ItemCategory::NonVegetarian,
                ItemCategory::Shared
            ]
        );
        assert_eq!(result.status, ClassificationStatus::Resolved { unrecognized: 2 });
        assert!(result.status.hint().is_some());
    }

    #[tokio::test]
    async fn test_short_response_falls_back_entirely() {
        let stub = StubClassifier::answering("Vegetarian");
        let result = classify_with(extracted(&["Salad", "Wings"]), &stub).await;

        assert_eq!(categories(&result), vec![ItemCategory::Shared; 2]);
        assert_eq!(
            result.status,
            ClassificationStatus::Unresolved(UnresolvedReason::ShortResponse {
                expected: 2,
                received: 1
            })
        );
    }

    #[tokio::test]
    async fn test_empty_label_keeps_later_labels_aligned() {
        let stub = StubClassifier::answering("Vegetarian,,Vegetarian,Non-Vegetarian");
        let result = classify_with(extracted(&["Dal", "Salad", "Wings", "Kebab"]), &stub).await;

        assert_eq!(
            categories(&result),
            vec![
                ItemCategory::Vegetarian,
                ItemCategory::Shared,
                ItemCategory::Vegetarian,
                ItemCategory::NonVegetarian
            ]
        );
        assert_eq!(result.status, ClassificationStatus::Resolved { unrecognized: 1 });

        // Three items against four fields: Wings takes the third label
        let stub = StubClassifier::answering("Vegetarian,,Vegetarian,Non-Vegetarian");
        let result = classify_with(extracted(&["Dal", "Salad", "Wings"]), &stub).await;
        assert_eq!(
            categories(&result),
            vec![
                ItemCategory::Vegetarian,
                ItemCategory::Shared,
                ItemCategory::Vegetarian
            ]
        );
    }

    #[tokio::test]
    async fn test_blank_label_falls_back_only_at_its_position() {
        let stub = StubClassifier::answering("Vegetarian, , Non-Vegetarian");
        let result = classify_with(extracted(&["Dal", "Salad", "Wings"]), &stub).await;

        assert_eq!(
            categories(&result),
            vec![
                ItemCategory::Vegetarian,
                ItemCategory::Shared,
                ItemCategory::NonVegetarian
            ]
        );
        assert_eq!(result.status, ClassificationStatus::Resolved { unrecognized: 1 });
    }

    #[tokio::test]
    async fn test_trailing_comma_is_not_a_label() {
        let stub = StubClassifier::answering("Vegetarian, Non-Vegetarian,");
        let result = classify_with(extracted(&["Dal", "Wings", "Cola"]), &stub).await;

        assert_eq!(
            result.status,
            ClassificationStatus::Unresolved(UnresolvedReason::ShortResponse {
                expected: 3,
                received: 2
            })
        );
    }

    #[tokio::test]
    async fn test_extra_labels_are_ignored() {
        let stub = StubClassifier::answering("Vegetarian, Shared, Non-Vegetarian");
        let result = classify_with(extracted(&["Dal"]), &stub).await;

        assert_eq!(categories(&result), vec![ItemCategory::Vegetarian]);
    }

    #[tokio::test]
    async fn test_service_failure_falls_back_to_shared() {
        let stub = StubClassifier::failing(ClassifierError::Network("connection reset".into()));
        let result = classify_with(extracted(&["Dal", "Fish Fry", "Rice"]), &stub).await;

        assert_eq!(result.items.len(), 3);
        assert_eq!(categories(&result), vec![ItemCategory::Shared; 3]);
        assert!(!result.is_resolved());
    }

    #[tokio::test]
    async fn test_commas_in_names_are_neutralized() {
        let stub = StubClassifier::answering("Non-Vegetarian, Shared");
        classify_with(extracted(&["Fish, Chips", "Soda"]), &stub).await;

        assert_eq!(*stub.seen.lock().unwrap(), vec!["Fish  Chips", "Soda"]);
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_request() {
        let stub = StubClassifier::failing(ClassifierError::Network("unused".into()));
        let result = classify_with(Vec::new(), &stub).await;

        assert!(result.items.is_empty());
        assert!(result.is_resolved());
        assert!(stub.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_credential_tags_everything_shared() {
        let service = ClassificationService::default();
        for credential in [None, Some(""), Some("   ")] {
            let result = service.classify(extracted(&["Dal", "Wings"]), credential).await;
            assert_eq!(categories(&result), vec![ItemCategory::Shared; 2]);
            assert_eq!(
                result.status,
                ClassificationStatus::Unresolved(UnresolvedReason::MissingCredential)
            );
        }
    }

    /// Serve one HTTP response on a local port, handing back the request body
    async fn serve_once(status_line: &str, body: &str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if buf.len() >= header_end + 4 + content_length {
                        let body = String::from_utf8_lossy(&buf[header_end + 4..]).to_string();
                        let _ = tx.send(body);
                        break;
                    }
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        (format!("http://{}/v1/chat/completions", addr), rx)
    }

    fn settings_for(endpoint: String) -> ClassifierSettings {
        ClassifierSettings {
            endpoint,
            timeout_secs: 5,
            ..ClassifierSettings::default()
        }
    }

    #[tokio::test]
    async fn test_openai_round_trip() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Non-Vegetarian, Vegetarian"}}]}"#;
        let (endpoint, request_rx) = serve_once("200 OK", body).await;
        let service = ClassificationService::new(settings_for(endpoint));

        let result = service
            .classify(extracted(&["Butter Chicken", "Palak Paneer"]), Some("sk-test"))
            .await;

        assert_eq!(
            categories(&result),
            vec![ItemCategory::NonVegetarian, ItemCategory::Vegetarian]
        );

        let request: serde_json::Value = serde_json::from_str(&request_rx.await.unwrap()).unwrap();
        assert_eq!(request["model"], "gpt-3.5-turbo");
        assert_eq!(request["max_tokens"], 200);
        assert_eq!(request["messages"][0]["role"], "system");
        let user = request["messages"][1]["content"].as_str().unwrap();
        assert!(user.contains("Butter Chicken, Palak Paneer"));
    }

    #[tokio::test]
    async fn test_openai_error_status_falls_back() {
        let body = r#"{"error":{"message":"Incorrect API key provided"}}"#;
        let (endpoint, _request_rx) = serve_once("401 Unauthorized", body).await;
        let service = ClassificationService::new(settings_for(endpoint));

        let result = service.classify(extracted(&["Dal", "Wings"]), Some("sk-bad")).await;

        assert_eq!(categories(&result), vec![ItemCategory::Shared; 2]);
        match result.status {
            ClassificationStatus::Unresolved(UnresolvedReason::ServiceFailed(msg)) => {
                assert!(msg.contains("401"));
                assert!(msg.contains("Incorrect API key provided"));
            }
            other => panic!("unexpected status: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_openai_malformed_body_falls_back() {
        let (endpoint, _request_rx) = serve_once("200 OK", r#"{"unexpected":true}"#).await;
        let service = ClassificationService::new(settings_for(endpoint));

        let result = service.classify(extracted(&["Dal"]), Some("sk-test")).await;

        assert_eq!(categories(&result), vec![ItemCategory::Shared]);
        assert!(!result.is_resolved());
    }

    #[tokio::test]
    async fn test_unreachable_service_falls_back() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let service = ClassificationService::new(settings_for(format!("http://{}/v1", addr)));
        let result = service
            .classify(extracted(&["Dal", "Wings", "Rice"]), Some("sk-test"))
            .await;

        assert_eq!(result.items.len(), 3);
        assert_eq!(categories(&result), vec![ItemCategory::Shared; 3]);
    }
}
