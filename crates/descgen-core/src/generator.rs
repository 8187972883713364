use descgen_llm::{LlmError, LlmProvider, Message};

use crate::dataset::CompanyRecord;
use crate::prompt::{PromptDocument, SYSTEM_PROMPT, build_prompt};

/// Turns company records into descriptions through a chat provider.
///
/// One provider call per record, no caching or retry.
#[derive(Debug)]
pub struct DescriptionGenerator<P> {
    provider: P,
}

impl<P: LlmProvider> DescriptionGenerator<P> {
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// # Errors
    ///
    /// Returns the provider's error unchanged; callers decide how to record it.
    pub async fn generate(&self, record: &CompanyRecord) -> Result<String, LlmError> {
        let prompt = build_prompt(record);
        self.generate_from_prompt(&prompt).await
    }

    /// # Errors
    ///
    /// Returns the provider's error unchanged.
    pub async fn generate_from_prompt(
        &self,
        prompt: &PromptDocument,
    ) -> Result<String, LlmError> {
        let messages = [Message::system(SYSTEM_PROMPT), Message::user(prompt.as_str())];
        self.provider.chat(&messages).await
    }
}
