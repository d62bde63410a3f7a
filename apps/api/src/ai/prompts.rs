// Prompt constants for the AI endpoints. Placeholders are filled by `fill_template` before sending.

use crate::llm_client::CompletionParams;

pub const RESUME_ANALYSIS_PARAMS: CompletionParams = CompletionParams {
    temperature: 0.7,
    max_tokens: 1500,
};

pub const COVER_LETTER_PARAMS: CompletionParams = CompletionParams {
    temperature: 0.8,
    max_tokens: 800,
};

/// Replace `{resume_text}` and `{job_description}` before sending.
pub const RESUME_ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert resume analyzer and career coach.

Resume:
{resume_text}

Job Description:
{job_description}

Analyze how well this resume matches the job description. Provide:
1. Match Score (0-100%)
2. Key Strengths (3-5 points)
3. Areas to Improve (3-5 points)
4. Missing Keywords (list important ones)
5. Overall Recommendation

Format your response as JSON with these exact keys: matchScore, strengths, improvements, missingKeywords, recommendation"#;

/// Replace `{resume_text}`, `{company}`, `{position}` and `{job_description}` before sending.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"You are a professional cover letter writer.

Resume Summary:
{resume_text}

Company: {company}
Position: {position}
Job Description:
{job_description}

Write a compelling, professional cover letter (250-300 words) that:
1. Shows enthusiasm for the role
2. Highlights relevant experience from the resume
3. Explains why they're a great fit
4. Includes specific details about the company/role

Write in first person, professional but personable tone."#;

/// Substitutes each `{name}` in `template` with its value in one scan of the
/// template. Inserted text is never rescanned; unknown names stay literal.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let filled = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match filled {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
