//! Provider table — one [`ProviderAdapter`] per supported LLM vendor.
//!
//! Each adapter is a pair of pure functions: build the vendor request from a
//! prompt, and find the generated text inside the vendor's response envelope.
//! Auth placement differs per vendor and is kept that way: Gemini takes the
//! key as a `key` query parameter, the chat-completions vendors take a bearer
//! header.

use std::fmt;
use std::str::FromStr;

use reqwest::Url;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use crate::llm_client::OutboundRequest;
use crate::suggestions::prompts::SuggestionPrompt;

pub const GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";
pub const PERPLEXITY_API_URL: &str = "https://api.perplexity.ai/chat/completions";
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

pub const PERPLEXITY_MODEL: &str = "llama-3.1-sonar-large-128k-online";
pub const OPENAI_MODEL: &str = "gpt-4";

/// Sampling is deliberately loose so repeated calls give different ideas.
pub const TEMPERATURE: f64 = 0.9;
const GEMINI_TOP_K: u32 = 40;
const GEMINI_TOP_P: f64 = 0.95;

/// Serializes lowercase; deserializes through [`FromStr`], so request bodies
/// accept the same spellings as `DEFAULT_PROVIDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Gemini,
    Perplexity,
    OpenAi,
}

impl ProviderId {
    pub const ALL: [ProviderId; 3] = [ProviderId::Gemini, ProviderId::Perplexity, ProviderId::OpenAi];

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderId::Gemini => "gemini",
            ProviderId::Perplexity => "perplexity",
            ProviderId::OpenAi => "openai",
        }
    }

    /// Human-facing vendor name, used in validation messages.
    pub fn display_name(self) -> &'static str {
        match self {
            ProviderId::Gemini => "Gemini",
            ProviderId::Perplexity => "Perplexity",
            ProviderId::OpenAi => "OpenAI",
        }
    }

    pub fn adapter(self) -> &'static dyn ProviderAdapter {
        match self {
            ProviderId::Gemini => &GEMINI,
            ProviderId::Perplexity => &PERPLEXITY,
            ProviderId::OpenAi => &OPENAI,
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider '{0}' (expected gemini, perplexity or openai)")]
pub struct UnknownProvider(pub String);

impl FromStr for ProviderId {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderId::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownProvider(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for ProviderId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A caller-supplied provider secret. Held in memory for one request only;
/// `Debug` never prints the value.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    #[cfg(test)]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        self.0.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Endpoint per provider. Defaults to the vendors' public URLs; overridable from config.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    pub gemini: Url,
    pub perplexity: Url,
    pub openai: Url,
}

impl Endpoints {
    pub fn get(&self, provider: ProviderId) -> &Url {
        match provider {
            ProviderId::Gemini => &self.gemini,
            ProviderId::Perplexity => &self.perplexity,
            ProviderId::OpenAi => &self.openai,
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        let parse = |s: &str| Url::parse(s).expect("built-in provider URL is valid");
        Self {
            gemini: parse(GEMINI_API_URL),
            perplexity: parse(PERPLEXITY_API_URL),
            openai: parse(OPENAI_API_URL),
        }
    }
}

pub trait ProviderAdapter: Send + Sync {
    /// Builds the vendor-specific request. Pure: no I/O.
    fn build_request(
        &self,
        endpoint: &Url,
        credential: &Credential,
        prompt: &SuggestionPrompt,
    ) -> OutboundRequest;

    /// Finds the generated text inside the vendor's response envelope.
    fn extract_text<'a>(&self, envelope: &'a Value) -> Option<&'a str>;
}

/// Google Gemini `generateContent`: one content part, key in the query string.
pub struct GeminiAdapter;

impl ProviderAdapter for GeminiAdapter {
    fn build_request(
        &self,
        endpoint: &Url,
        credential: &Credential,
        prompt: &SuggestionPrompt,
    ) -> OutboundRequest {
        let mut url = endpoint.clone();
        url.query_pairs_mut().append_pair("key", credential.expose());

        let body = json!({
            "contents": [{
                "parts": [{ "text": prompt.single_part_text() }]
            }],
            "generationConfig": {
                "temperature": TEMPERATURE,
                "topK": GEMINI_TOP_K,
                "topP": GEMINI_TOP_P,
            }
        });

        OutboundRequest::post_json(url, body).with_header("Content-Type", "application/json")
    }

    fn extract_text<'a>(&self, envelope: &'a Value) -> Option<&'a str> {
        envelope
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
    }
}

/// OpenAI-style `chat/completions` (OpenAI and Perplexity): system + user
/// messages, bearer auth.
pub struct ChatCompletionsAdapter {
    pub model: &'static str,
}

impl ProviderAdapter for ChatCompletionsAdapter {
    fn build_request(
        &self,
        endpoint: &Url,
        credential: &Credential,
        prompt: &SuggestionPrompt,
    ) -> OutboundRequest {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user", "content": prompt.user },
            ],
            "temperature": TEMPERATURE,
        });

        OutboundRequest::post_json(endpoint.clone(), body)
            .with_header("Authorization", format!("Bearer {}", credential.expose()))
            .with_header("Content-Type", "application/json")
    }

    fn extract_text<'a>(&self, envelope: &'a Value) -> Option<&'a str> {
        envelope
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
    }
}

static GEMINI: GeminiAdapter = GeminiAdapter;
static PERPLEXITY: ChatCompletionsAdapter = ChatCompletionsAdapter {
    model: PERPLEXITY_MODEL,
};
static OPENAI: ChatCompletionsAdapter = ChatCompletionsAdapter {
    model: OPENAI_MODEL,
};
