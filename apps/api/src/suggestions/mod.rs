// Suggestion Request Adapter: inputs + provider + credential in, normalized
// SuggestionRecords out. All outbound HTTP goes through llm_client::Transport.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod provider;
