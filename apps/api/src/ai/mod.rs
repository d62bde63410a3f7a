// Resume analysis and cover-letter generation.
// All provider calls go through llm_client.

pub mod cover_letter;
pub mod handlers;
pub mod prompts;
pub mod resume;
