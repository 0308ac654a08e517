//! Prompt templating that feeds a user's past phrasing back into the model.

/// Joins stored preference text, newest first, into one context string.
#[must_use]
pub fn personalization_context(preferences: &[String]) -> String {
    preferences.join("; ")
}

/// The fixed lighting-designer instruction sent alongside the image.
#[must_use]
pub fn build_instruction(context: &str, prompt: &str) -> String {
    format!(
        "
      You are a professional lighting designer.
      User's Past Style: [{context}]
      Current Request: {prompt}

      Task: Analyze the architecture in this image. Suggest a lighting design plan.
      If the user has a specific style in their history, try to match it.
    "
    )
}

/// Text persisted for one interaction: the prompt plus a prefix of the answer.
#[must_use]
pub fn summarize_interaction(prompt: &str, response: &str, max_response_chars: usize) -> String {
    let style: String = response.chars().take(max_response_chars).collect();
    format!("Request: {prompt} -> Style used: {style}...")
}
