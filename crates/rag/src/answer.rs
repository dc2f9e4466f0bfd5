//! Answer generation.
//!
//! Builds the fixed two-part prompt from the context block and the user's
//! question, and submits it to the chat completion provider with bounded
//! output and deterministic sampling.

use gridfin_core::AppResult;
use gridfin_llm::{ChatMessage, ChatRequest, LlmClient};

/// System role statement for every completion.
pub const SYSTEM_PROMPT: &str =
    "You are an AI assistant specialized in financial data analysis.";

/// Templated answer when retrieval produced no context. The language model
/// is never called in that case.
pub const NO_CONTEXT_ANSWER: &str =
    "No relevant financial data was found for this question.";

/// Maximum completion length in tokens.
const MAX_ANSWER_TOKENS: u32 = 300;

/// Build the user-role message embedding the context block and question.
pub fn build_user_prompt(context: &str, query: &str) -> String {
    format!(
        "You are an AI assistant specialized in financial data analysis for an Electric Utility Company.\n\
         You have access to the following financial data:\n\
         \n\
         {}\n\
         \n\
         Using the above data, answer the following question accurately and concisely:\n\
         \n\
         Question: {}\n\
         \n\
         Answer:",
        context, query
    )
}

/// Generate an answer from the context block and question.
///
/// Temperature is pinned to 0 and output bounded; the trimmed text of the
/// first completion choice is returned. Failures surface as
/// `AppError::Generation` and are not retried.
pub async fn generate_answer(
    client: &dyn LlmClient,
    model: &str,
    context: &str,
    query: &str,
) -> AppResult<String> {
    let request = ChatRequest::new(
        model,
        vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_user_prompt(context, query)),
        ],
    )
    .with_max_tokens(MAX_ANSWER_TOKENS)
    .with_temperature(0.0);

    let response = client.complete(&request).await?;

    Ok(response.content.trim().to_string())
}
