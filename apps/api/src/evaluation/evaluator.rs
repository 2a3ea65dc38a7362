//! Evaluation pipeline.
//!
//! Flow: similarity (only with a job description) → prompt → LLM → Markdown report.
//! Improvement reuses the same inputs and returns the rewritten resume verbatim.

use tracing::info;

use crate::evaluation::prompts::{
    EVALUATION_SYSTEM, GENERAL_EVALUATION_TEMPLATE, GENERAL_IMPROVEMENT_TEMPLATE,
    IMPROVEMENT_SYSTEM, MATCH_EVALUATION_TEMPLATE, TARGETED_IMPROVEMENT_TEMPLATE,
};
use crate::llm_client::prompts::{fill_template, FACTUAL_INSTRUCTION, MARKDOWN_FORMAT_INSTRUCTION};
use crate::llm_client::{ChatModel, ChatRequest, LlmError};
use crate::similarity::{SimilarityScore, Verdict};

const EVALUATION_MAX_TOKENS: u32 = 1500;
const EVALUATION_TEMPERATURE: f32 = 0.3;
const IMPROVEMENT_MAX_TOKENS: u32 = 2000;
const IMPROVEMENT_TEMPERATURE: f32 = 0.4;

/// Result of one evaluation run.
#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    pub similarity: Option<SimilarityScore>,
    pub verdict: Verdict,
    /// Verdict header plus the model's analysis, as Markdown source.
    pub report_markdown: String,
}

/// Scores the resume (when a job description is given) and asks the model for an ATS analysis.
pub async fn evaluate(
    model: &dyn ChatModel,
    resume_text: &str,
    job_description: Option<&str>,
    threshold: f64,
) -> Result<EvaluationOutcome, LlmError> {
    let similarity =
        job_description.map(|jd| SimilarityScore::compute(resume_text, jd, threshold));
    let verdict = similarity
        .map(|s| s.verdict)
        .unwrap_or(Verdict::NotScored);

    if let Some(s) = &similarity {
        info!("Similarity {:.3} against threshold {:.2}: {:?}", s.score, s.threshold, s.verdict);
    }

    let prompt = build_evaluation_prompt(resume_text, job_description, similarity.as_ref());
    let analysis = model
        .complete(ChatRequest {
            system: EVALUATION_SYSTEM,
            prompt: &prompt,
            max_tokens: EVALUATION_MAX_TOKENS,
            temperature: EVALUATION_TEMPERATURE,
        })
        .await?;

    let report_markdown = render_report(verdict, similarity.as_ref(), &analysis);

    Ok(EvaluationOutcome {
        similarity,
        verdict,
        report_markdown,
    })
}

/// Asks the model for a rewritten resume.
pub async fn improve(
    model: &dyn ChatModel,
    resume_text: &str,
    job_description: Option<&str>,
) -> Result<String, LlmError> {
    let prompt = build_improvement_prompt(resume_text, job_description);
    model
        .complete(ChatRequest {
            system: IMPROVEMENT_SYSTEM,
            prompt: &prompt,
            max_tokens: IMPROVEMENT_MAX_TOKENS,
            temperature: IMPROVEMENT_TEMPERATURE,
        })
        .await
}

pub fn build_evaluation_prompt(
    resume_text: &str,
    job_description: Option<&str>,
    similarity: Option<&SimilarityScore>,
) -> String {
    match (job_description, similarity) {
        (Some(jd), Some(score)) => {
            let score = format!("{:.3}", score.score);
            fill_template(
                MATCH_EVALUATION_TEMPLATE,
                &[
                    ("job_description", jd),
                    ("resume_text", resume_text),
                    ("similarity_score", &score),
                    ("format_instruction", MARKDOWN_FORMAT_INSTRUCTION),
                ],
            )
        }
        _ => fill_template(
            GENERAL_EVALUATION_TEMPLATE,
            &[
                ("resume_text", resume_text),
                ("format_instruction", MARKDOWN_FORMAT_INSTRUCTION),
            ],
        ),
    }
}

pub fn build_improvement_prompt(resume_text: &str, job_description: Option<&str>) -> String {
    match job_description {
        Some(jd) => fill_template(
            TARGETED_IMPROVEMENT_TEMPLATE,
            &[
                ("job_description", jd),
                ("resume_text", resume_text),
                ("factual_instruction", FACTUAL_INSTRUCTION),
            ],
        ),
        None => fill_template(
            GENERAL_IMPROVEMENT_TEMPLATE,
            &[
                ("resume_text", resume_text),
                ("factual_instruction", FACTUAL_INSTRUCTION),
            ],
        ),
    }
}

/// Builds the Markdown shown in the evaluation tab.
pub fn render_report(
    verdict: Verdict,
    similarity: Option<&SimilarityScore>,
    analysis: &str,
) -> String {
    let score_line = match similarity {
        Some(s) => s.summary(),
        None => "No job description provided. Keyword similarity was not scored.".to_string(),
    };

    format!(
        "## ATS Resume Evaluation Results\n\n### {}\n**{}**\n\n### Detailed Analysis\n{}\n",
        verdict.label(),
        score_line,
        analysis.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedModel;

    const RESUME: &str = "Jane Doe. Rust engineer. Built distributed Tokio services on PostgreSQL.";
    const JD: &str = "Hiring a Rust engineer for distributed Tokio services and PostgreSQL.";

    #[tokio::test]
    async fn test_evaluate_with_jd_scores_and_uses_match_prompt() {
        let model = ScriptedModel::replying("Overall ATS Score: 81");
        let outcome = evaluate(&model, RESUME, Some(JD), 0.30).await.unwrap();

        let similarity = outcome.similarity.unwrap();
        assert_eq!(outcome.verdict, Verdict::Pass);
        assert!(similarity.score > 0.30);
        assert!(outcome.report_markdown.contains("✅ PASS"));
        assert!(outcome.report_markdown.contains("Threshold: 0.30"));
        assert!(outcome.report_markdown.ends_with("Overall ATS Score: 81\n"));

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system, EVALUATION_SYSTEM);
        assert_eq!(calls[0].max_tokens, 1500);
        assert!((calls[0].temperature - 0.3).abs() < f32::EPSILON);
        assert!(calls[0].prompt.contains("Job Description:\nHiring a Rust engineer"));
        assert!(calls[0]
            .prompt
            .contains(&format!("Cosine Similarity Score: {:.3}", similarity.score)));
    }

    #[tokio::test]
    async fn test_evaluate_without_jd_is_not_scored() {
        let model = ScriptedModel::replying("Looks parseable.");
        let outcome = evaluate(&model, RESUME, None, 0.30).await.unwrap();

        assert!(outcome.similarity.is_none());
        assert_eq!(outcome.verdict, Verdict::NotScored);
        assert!(outcome.report_markdown.contains("was not scored"));

        let calls = model.calls();
        let prompt = &calls[0].prompt;
        assert!(prompt.contains("No specific job description was provided"));
        assert!(!prompt.contains("Cosine Similarity Score"));
    }

    #[tokio::test]
    async fn test_evaluate_low_similarity_fails() {
        let model = ScriptedModel::replying("Weak match.");
        let outcome = evaluate(&model, "Pastry chef, croissants.", Some(JD), 0.30)
            .await
            .unwrap();
        assert_eq!(outcome.verdict, Verdict::Fail);
        assert!(outcome.report_markdown.contains("❌ FAIL"));
    }

    #[tokio::test]
    async fn test_evaluate_propagates_model_errors() {
        let model = ScriptedModel::failing_missing_key();
        let result = evaluate(&model, RESUME, Some(JD), 0.30).await;
        assert!(matches!(result, Err(LlmError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_improve_uses_improvement_parameters() {
        let model = ScriptedModel::replying("JANE DOE\nSenior Rust Engineer");
        let improved = improve(&model, RESUME, Some(JD)).await.unwrap();
        assert_eq!(improved, "JANE DOE\nSenior Rust Engineer");

        let calls = model.calls();
        let call = &calls[0];
        assert_eq!(call.system, IMPROVEMENT_SYSTEM);
        assert_eq!(call.max_tokens, 2000);
        assert!((call.temperature - 0.4).abs() < f32::EPSILON);
        assert!(call.prompt.contains("Original Resume:\nJane Doe"));
        assert!(call.prompt.contains(FACTUAL_INSTRUCTION));
    }

    #[test]
    fn test_resume_placeholders_are_not_expanded_twice() {
        // A resume that happens to contain a template placeholder must come through verbatim.
        let prompt = build_improvement_prompt("Skills: {job_description}", Some("Rust role"));
        assert!(prompt.contains("Original Resume:\nSkills: {job_description}"));
    }

    #[test]
    fn test_job_description_placeholders_are_not_expanded() {
        let prompt = build_improvement_prompt("UNIQUE_RESUME_BODY", Some("Need {resume_text} skills"));
        assert_eq!(prompt.matches("UNIQUE_RESUME_BODY").count(), 1);
        assert!(prompt.contains("Job Description:\nNeed {resume_text} skills"));

        let score = SimilarityScore {
            score: 0.0,
            threshold: 0.30,
            verdict: Verdict::Fail,
        };
        let prompt = build_evaluation_prompt(
            "UNIQUE_RESUME_BODY",
            Some("JD {resume_text} {similarity_score} {format_instruction}"),
            Some(&score),
        );
        assert_eq!(prompt.matches("UNIQUE_RESUME_BODY").count(), 1);
        assert!(prompt.contains("Job Description:\nJD {resume_text} {similarity_score} {format_instruction}"));
        assert!(prompt.contains("Cosine Similarity Score: 0.000"));
    }

    #[test]
    fn test_render_report_layout() {
        let score = SimilarityScore {
            score: 0.25,
            threshold: 0.30,
            verdict: Verdict::Fail,
        };
        let report = render_report(Verdict::Fail, Some(&score), "  analysis body \n");
        assert_eq!(
            report,
            "## ATS Resume Evaluation Results\n\n### ❌ FAIL\n**Similarity Score: 0.250 (Threshold: 0.30)**\n\n### Detailed Analysis\nanalysis body\n"
        );
    }
}
