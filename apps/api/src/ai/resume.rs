//! Resume analysis: asks the provider for a JSON verdict and falls back to
//! the raw text when the reply is not the expected object.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ai::prompts::{fill_template, RESUME_ANALYSIS_PARAMS, RESUME_ANALYSIS_PROMPT_TEMPLATE};
use crate::llm_client::{strip_json_fences, LlmClient, LlmError};

/// Models report the score as `85`, `"85%"` or similar; both are kept as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchScore {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredAnalysis {
    pub match_score: MatchScore,
    #[serde(default, deserialize_with = "one_or_many")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub improvements: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub recommendation: String,
}

/// Outcome of a resume analysis. Callers match on both shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeAnalysis {
    Structured(StructuredAnalysis),
    Unstructured { text: String },
}

// Wire shape keeps the keys the client already reads (`matchScore`, `analysis`)
// and adds a `kind` tag.
impl Serialize for ResumeAnalysis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(tag = "kind", rename_all = "snake_case")]
        enum Wire<'a> {
            Structured(&'a StructuredAnalysis),
            Unstructured {
                #[serde(rename = "matchScore")]
                match_score: &'static str,
                analysis: &'a str,
            },
        }

        match self {
            ResumeAnalysis::Structured(analysis) => Wire::Structured(analysis),
            ResumeAnalysis::Unstructured { text } => Wire::Unstructured {
                match_score: "N/A",
                analysis: text,
            },
        }
        .serialize(serializer)
    }
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(item) => vec![item],
        OneOrMany::Many(items) => items,
    })
}

/// Interprets provider output. Never fails: anything that is not the expected
/// JSON object becomes `Unstructured`.
pub fn parse_analysis(raw: &str) -> ResumeAnalysis {
    match serde_json::from_str::<StructuredAnalysis>(strip_json_fences(raw)) {
        Ok(analysis) => ResumeAnalysis::Structured(analysis),
        Err(_) => ResumeAnalysis::Unstructured {
            text: raw.to_string(),
        },
    }
}

fn build_prompt(resume_text: &str, job_description: &str) -> String {
    fill_template(
        RESUME_ANALYSIS_PROMPT_TEMPLATE,
        &[("resume_text", resume_text), ("job_description", job_description)],
    )
}

pub async fn analyze_resume(
    llm: &LlmClient,
    resume_text: &str,
    job_description: &str,
) -> Result<ResumeAnalysis, LlmError> {
    let prompt = build_prompt(resume_text, job_description);
    let raw = llm.complete(&prompt, RESUME_ANALYSIS_PARAMS).await?;
    Ok(parse_analysis(&raw))
}
