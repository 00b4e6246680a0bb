//! Suggestion generation — validate, prompt, send, normalize.
//!
//! One call is one network request. There is no retry and no cache: the same
//! inputs sent twice produce two independent provider calls, and the
//! suggestion count is re-drawn every time.

use std::sync::Arc;

use rand::Rng;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm_client::{strip_json_fences, Transport, TransportError};
use crate::models::suggestion::SuggestionRecord;
use crate::suggestions::prompts::SuggestionPrompt;
use crate::suggestions::provider::{Credential, Endpoints, ProviderId};

pub const MIN_SUGGESTIONS: u8 = 10;
pub const MAX_SUGGESTIONS: u8 = 20;

/// What the user typed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SuggestionInputs {
    pub skills: String,
    pub experience_level: String,
    pub interests: String,
}

impl SuggestionInputs {
    /// Returns the first blank field, in form order.
    fn first_missing(&self) -> Option<&'static str> {
        [
            ("skills", &self.skills),
            ("experienceLevel", &self.experience_level),
            ("interests", &self.interests),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing {} credential", .0.display_name())]
    MissingCredential(ProviderId),

    #[error("missing input: {0}")]
    MissingInput(&'static str),
}

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("malformed provider response: {0}")]
    Format(String),
}

/// Draws the number of suggestions to ask for, uniformly in `[10, 20]`.
pub fn pick_suggestion_count<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(MIN_SUGGESTIONS..=MAX_SUGGESTIONS)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<SuggestionRecord>),
    One(SuggestionRecord),
}

/// Parses fence-stripped provider text into records.
///
/// Accepts an array or a single object. Any malformed element rejects the
/// whole payload; partial results are never returned.
pub fn parse_suggestions(text: &str) -> Result<Vec<SuggestionRecord>, SuggestError> {
    let text = strip_json_fences(text);

    let records = match serde_json::from_str::<OneOrMany>(text) {
        Ok(OneOrMany::Many(records)) => records,
        Ok(OneOrMany::One(record)) => vec![record],
        Err(e) => return Err(SuggestError::Format(format!("not a suggestion list: {e}"))),
    };

    if let Some(pos) = records.iter().position(|r| r.title.trim().is_empty()) {
        return Err(SuggestError::Format(format!(
            "suggestion at index {pos} has an empty title"
        )));
    }

    Ok(records)
}

/// Sends suggestion requests through a [`Transport`] to whichever provider is asked for.
#[derive(Clone)]
pub struct SuggestionGenerator {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
}

impl SuggestionGenerator {
    pub fn new(transport: Arc<dyn Transport>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    pub async fn generate(
        &self,
        inputs: &SuggestionInputs,
        provider: ProviderId,
        credential: &Credential,
    ) -> Result<Vec<SuggestionRecord>, SuggestError> {
        let count = pick_suggestion_count(&mut rand::thread_rng());
        self.generate_with_count(inputs, provider, credential, count)
            .await
    }

    /// Same as [`generate`](Self::generate) with the suggestion count fixed by the caller.
    pub async fn generate_with_count(
        &self,
        inputs: &SuggestionInputs,
        provider: ProviderId,
        credential: &Credential,
        count: u8,
    ) -> Result<Vec<SuggestionRecord>, SuggestError> {
        if credential.is_blank() {
            return Err(ValidationError::MissingCredential(provider).into());
        }
        if let Some(field) = inputs.first_missing() {
            return Err(ValidationError::MissingInput(field).into());
        }

        let adapter = provider.adapter();
        let prompt = SuggestionPrompt::new(inputs, count);
        let request = adapter.build_request(self.endpoints.get(provider), credential, &prompt);

        info!(%provider, count, "Requesting project suggestions");
        debug!(?request, "Outbound suggestion request");

        let envelope = self.transport.send(request).await.map_err(|e| {
            warn!(%provider, "Suggestion request failed: {e}");
            SuggestError::from(e)
        })?;

        let text = adapter.extract_text(&envelope).ok_or_else(|| {
            SuggestError::Format(format!("{provider} response has no generated text"))
        })?;

        let records = parse_suggestions(text).map_err(|e| {
            warn!(%provider, "Discarding provider output: {e}");
            e
        })?;

        info!(%provider, requested = count, received = records.len(), "Suggestions parsed");
        Ok(records)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::{json, Value};

    use crate::llm_client::OutboundRequest;

    /// Records every request and replies with a canned result.
    pub(crate) struct FakeTransport {
        pub reply: Mutex<Option<Result<Value, TransportError>>>,
        pub sent: Mutex<Vec<OutboundRequest>>,
    }

    impl FakeTransport {
        pub(crate) fn replying(value: Value) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(Ok(value))),
                sent: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(Err(TransportError::Api {
                    status,
                    message: "upstream said no".to_string(),
                }))),
                sent: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn calls(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn send(&self, request: OutboundRequest) -> Result<Value, TransportError> {
            self.sent.lock().unwrap().push(request);
            match self.reply.lock().unwrap().as_ref() {
                Some(Ok(value)) => Ok(value.clone()),
                Some(Err(TransportError::Api { status, message })) => Err(TransportError::Api {
                    status: *status,
                    message: message.clone(),
                }),
                _ => Err(TransportError::Decode("no reply configured".to_string())),
            }
        }
    }

    pub(crate) fn chat_envelope(content: &str) -> Value {
        json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
    }

    pub(crate) fn gemini_envelope(text: &str) -> Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    pub(crate) fn inputs() -> SuggestionInputs {
        SuggestionInputs {
            skills: "JavaScript, Python, React".to_string(),
            experience_level: "beginner".to_string(),
            interests: "music and games".to_string(),
        }
    }

    const FENCED_ONE: &str = "```json\n[{\"title\":\"A\",\"description\":\"d\",\"techStack\":[\"X\"],\"difficulty\":\"Beginner\"}]\n```";

    #[tokio::test]
    async fn test_blank_credential_fails_without_network_call() {
        let transport = FakeTransport::replying(chat_envelope("[]"));
        let generator = SuggestionGenerator::new(transport.clone(), Endpoints::default());

        for provider in ProviderId::ALL {
            let err = generator
                .generate(&inputs(), provider, &Credential::new("  "))
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                SuggestError::Validation(ValidationError::MissingCredential(p)) if p == provider
            ));
        }
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_input_fails_without_network_call() {
        let transport = FakeTransport::replying(chat_envelope("[]"));
        let generator = SuggestionGenerator::new(transport.clone(), Endpoints::default());

        let mut partial = inputs();
        partial.experience_level = String::new();

        let err = generator
            .generate(&partial, ProviderId::OpenAi, &Credential::new("sk"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SuggestError::Validation(ValidationError::MissingInput("experienceLevel"))
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_whitespace_only_input_counts_as_missing() {
        let transport = FakeTransport::replying(chat_envelope("[]"));
        let generator = SuggestionGenerator::new(transport.clone(), Endpoints::default());

        let mut padded = inputs();
        padded.interests = " \t\n".to_string();

        let err = generator
            .generate(&padded, ProviderId::Gemini, &Credential::new("g-key"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SuggestError::Validation(ValidationError::MissingInput("interests"))
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_credential_is_checked_before_inputs() {
        let transport = FakeTransport::replying(chat_envelope("[]"));
        let generator = SuggestionGenerator::new(transport, Endpoints::default());

        let err = generator
            .generate(&SuggestionInputs::default(), ProviderId::Gemini, &Credential::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SuggestError::Validation(ValidationError::MissingCredential(ProviderId::Gemini))
        ));
    }

    #[tokio::test]
    async fn test_fenced_array_yields_records() {
        let transport = FakeTransport::replying(chat_envelope(FENCED_ONE));
        let generator = SuggestionGenerator::new(transport.clone(), Endpoints::default());

        let records = generator
            .generate(&inputs(), ProviderId::Perplexity, &Credential::new("pplx"))
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "A");
        assert_eq!(records[0].tech_stack, vec!["X".to_string()]);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_bare_object_becomes_one_element_list() {
        let transport = FakeTransport::replying(gemini_envelope(
            r#"{"title":"B","description":"d","techStack":["Y"],"difficulty":"Advanced"}"#,
        ));
        let generator = SuggestionGenerator::new(transport, Endpoints::default());

        let records = generator
            .generate(&inputs(), ProviderId::Gemini, &Credential::new("g"))
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "B");
    }

    #[tokio::test]
    async fn test_requested_count_reaches_the_prompt() {
        let transport = FakeTransport::replying(chat_envelope("[]"));
        let generator = SuggestionGenerator::new(transport.clone(), Endpoints::default());

        generator
            .generate_with_count(&inputs(), ProviderId::OpenAi, &Credential::new("sk"), 17)
            .await
            .unwrap();

        let sent = transport.sent.lock().unwrap();
        let body = sent[0].body.as_ref().unwrap();
        let system = body["messages"][0]["content"].as_str().unwrap();
        let user = body["messages"][1]["content"].as_str().unwrap();
        assert!(system.contains("Provide 17 detailed"));
        assert!(user.contains("Please suggest 17 unique"));
    }

    #[tokio::test]
    async fn test_identical_calls_hit_the_network_each_time() {
        let transport = FakeTransport::replying(chat_envelope(FENCED_ONE));
        let generator = SuggestionGenerator::new(transport.clone(), Endpoints::default());

        for _ in 0..2 {
            generator
                .generate(&inputs(), ProviderId::OpenAi, &Credential::new("sk"))
                .await
                .unwrap();
        }
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_non_success_status_is_transport_error() {
        let transport = FakeTransport::failing(401);
        let generator = SuggestionGenerator::new(transport, Endpoints::default());

        let err = generator
            .generate(&inputs(), ProviderId::OpenAi, &Credential::new("bad"))
            .await
            .unwrap_err();
        assert!(matches!(err, SuggestError::Transport(TransportError::Api { status: 401, .. })));
    }

    #[tokio::test]
    async fn test_wrong_envelope_is_format_error() {
        // Chat-shaped envelope returned for a Gemini request
        let transport = FakeTransport::replying(chat_envelope(FENCED_ONE));
        let generator = SuggestionGenerator::new(transport, Endpoints::default());

        let err = generator
            .generate(&inputs(), ProviderId::Gemini, &Credential::new("g"))
            .await
            .unwrap_err();
        assert!(matches!(err, SuggestError::Format(_)));
    }

    #[test]
    fn test_count_stays_in_range_and_varies() {
        let mut rng = StdRng::seed_from_u64(7);
        let counts: Vec<u8> = (0..500).map(|_| pick_suggestion_count(&mut rng)).collect();

        assert!(counts
            .iter()
            .all(|n| (MIN_SUGGESTIONS..=MAX_SUGGESTIONS).contains(n)));
        assert!(counts.contains(&MIN_SUGGESTIONS));
        assert!(counts.contains(&MAX_SUGGESTIONS));
        assert!(counts.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_parse_rejects_whole_payload_on_one_bad_element() {
        let text = r#"[
            {"title":"Good","description":"d","techStack":[],"difficulty":"Beginner"},
            {"description":"no title here"}
        ]"#;
        assert!(matches!(parse_suggestions(text), Err(SuggestError::Format(_))));
    }

    #[test]
    fn test_parse_rejects_empty_title() {
        let text = r#"[{"title":"  ","description":"d"}]"#;
        assert!(matches!(parse_suggestions(text), Err(SuggestError::Format(_))));
    }

    #[test]
    fn test_parse_rejects_prose() {
        let text = "Here are some ideas you might like!";
        assert!(matches!(parse_suggestions(text), Err(SuggestError::Format(_))));
    }

    #[test]
    fn test_parse_accepts_unfenced_array() {
        let text = r#"[{"title":"A","description":"d"},{"title":"C","description":"e"}]"#;
        let records = parse_suggestions(text).unwrap();
        assert_eq!(
            records.iter().map(|r| r.title.as_str()).collect::<Vec<_>>(),
            vec!["A", "C"]
        );
    }
}
