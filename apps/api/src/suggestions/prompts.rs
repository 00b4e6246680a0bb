// Prompt text for the suggestion request. Every provider gets the same
// wording; only the envelope differs (see provider.rs).

use crate::suggestions::generator::SuggestionInputs;

/// System instruction for chat-style providers. `{count}` is replaced per call.
pub const SUGGESTION_SYSTEM_TEMPLATE: &str =
    "You are a creative AI that suggests unique programming projects based on developer \
    skills and interests. Provide {count} detailed project suggestions in JSON format with \
    title, description, techStack, and difficulty fields. Ensure each project is unique and \
    innovative.";

/// Appended to the user prompt for single-part providers, which have no system slot.
pub const SINGLE_PART_INSTRUCTION_TEMPLATE: &str =
    "Respond with exactly {count} unique project suggestions in JSON format. Each project \
    should have: title, description, techStack (array), and difficulty (string). Make each \
    project different and innovative.";

/// The rendered prompt for one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionPrompt {
    pub count: u8,
    pub system: String,
    pub user: String,
}

impl SuggestionPrompt {
    pub fn new(inputs: &SuggestionInputs, count: u8) -> Self {
        let count_str = count.to_string();
        Self {
            count,
            system: SUGGESTION_SYSTEM_TEMPLATE.replace("{count}", &count_str),
            // Inputs are interpolated with format! so user text is never re-scanned
            // for placeholders.
            user: format!(
                "Skills: {}\nExperience Level: {}\nInterests: {}\nPlease suggest {count} unique \
                and creative projects I could build. Make them diverse, innovative, and \
                different from typical tutorial projects. Include projects of varying \
                complexity and scope.",
                inputs.skills.trim(),
                inputs.experience_level.trim(),
                inputs.interests.trim(),
            ),
        }
    }

    /// User prompt plus the JSON instruction, for providers that take one text part.
    pub fn single_part_text(&self) -> String {
        format!(
            "{}\n{}",
            self.user,
            SINGLE_PART_INSTRUCTION_TEMPLATE.replace("{count}", &self.count.to_string())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> SuggestionInputs {
        SuggestionInputs {
            skills: "Rust, Postgres".to_string(),
            experience_level: "intermediate".to_string(),
            interests: " developer tooling ".to_string(),
        }
    }

    #[test]
    fn test_user_prompt_carries_inputs_and_count() {
        let prompt = SuggestionPrompt::new(&inputs(), 14);
        assert!(prompt.user.starts_with("Skills: Rust, Postgres\n"));
        assert!(prompt.user.contains("Experience Level: intermediate\n"));
        assert!(prompt.user.contains("Interests: developer tooling\n"));
        assert!(prompt.user.contains("Please suggest 14 unique"));
        assert!(prompt.user.ends_with("complexity and scope."));
    }

    #[test]
    fn test_placeholders_in_inputs_are_left_alone() {
        let mut raw = inputs();
        raw.skills = "{count} {interests}".to_string();
        let prompt = SuggestionPrompt::new(&raw, 11);
        assert!(prompt.user.starts_with("Skills: {count} {interests}\n"));
    }

    #[test]
    fn test_system_prompt_names_the_fields() {
        let prompt = SuggestionPrompt::new(&inputs(), 10);
        assert!(prompt.system.contains("Provide 10 detailed project suggestions"));
        assert!(prompt.system.contains("title, description, techStack, and difficulty"));
    }

    #[test]
    fn test_single_part_text_appends_instruction() {
        let prompt = SuggestionPrompt::new(&inputs(), 20);
        let text = prompt.single_part_text();
        assert!(text.starts_with(&prompt.user));
        assert!(text.contains("Respond with exactly 20 unique project suggestions"));
    }
}
