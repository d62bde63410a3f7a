use crate::ai::prompts::{fill_template, COVER_LETTER_PARAMS, COVER_LETTER_PROMPT_TEMPLATE};
use crate::llm_client::{LlmClient, LlmError};

fn build_prompt(resume_text: &str, company: &str, position: &str, job_description: &str) -> String {
    fill_template(
        COVER_LETTER_PROMPT_TEMPLATE,
        &[
            ("resume_text", resume_text),
            ("company", company),
            ("position", position),
            ("job_description", job_description),
        ],
    )
}

/// Generates a cover letter; the provider's text is returned verbatim.
pub async fn generate_cover_letter(
    llm: &LlmClient,
    resume_text: &str,
    company: &str,
    position: &str,
    job_description: &str,
) -> Result<String, LlmError> {
    let prompt = build_prompt(resume_text, company, position, job_description);
    llm.complete(&prompt, COVER_LETTER_PARAMS).await
}
