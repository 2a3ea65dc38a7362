// Resume evaluation: similarity check, LLM analysis, resume rewriting.
// All LLM calls go through llm_client — no direct OpenAI calls here.

pub mod evaluator;
pub mod handlers;
pub mod prompts;
pub mod store;
