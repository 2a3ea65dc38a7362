// All LLM prompt constants for the Evaluation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for ATS evaluation.
pub const EVALUATION_SYSTEM: &str = "You are an expert ATS analyzer and resume consultant \
    with extensive experience in recruitment and resume optimization.";

/// Match evaluation prompt. Replace: {job_description}, {resume_text}, {similarity_score},
/// {format_instruction}
pub const MATCH_EVALUATION_TEMPLATE: &str = r#"As an expert ATS analyzer and resume consultant, please evaluate how well this resume matches the job description.

Job Description:
{job_description}

Resume:
{resume_text}

Cosine Similarity Score: {similarity_score}

Please provide:
1. Overall ATS Score (0-100)
2. Key strengths of the resume
3. Missing keywords and skills
4. Specific improvement recommendations
5. ATS optimization suggestions

{format_instruction}"#;

/// General review when no job description was supplied.
/// Replace: {resume_text}, {format_instruction}
pub const GENERAL_EVALUATION_TEMPLATE: &str = r#"As an expert ATS analyzer and resume consultant, please evaluate how well this resume will be parsed and ranked by Applicant Tracking Systems. No specific job description was provided, so judge it against the role the resume itself targets.

Resume:
{resume_text}

Please provide:
1. Overall ATS Compatibility Score (0-100)
2. Parsing risks (layout, tables, headers, unusual section names, missing contact details)
3. Key strengths of the resume
4. Keywords and skills a recruiter for this kind of role would expect but cannot find
5. Specific improvement recommendations

{format_instruction}"#;

/// System prompt for resume rewriting.
pub const IMPROVEMENT_SYSTEM: &str = "You are an expert resume writer and ATS optimization \
    specialist with proven success in helping candidates get interviews.";

/// Rewrite targeted at a job description.
/// Replace: {job_description}, {resume_text}, {factual_instruction}
pub const TARGETED_IMPROVEMENT_TEMPLATE: &str = r#"As an expert resume writer and ATS optimization specialist, please rewrite and improve this resume to better match the job description.

Job Description:
{job_description}

Original Resume:
{resume_text}

Please:
1. Incorporate relevant keywords from the job description
2. Restructure content for better ATS compatibility
3. Enhance bullet points with quantifiable achievements
4. Optimize formatting and sections
5. Add relevant skills that align with the job requirements

{factual_instruction}

Provide the complete improved resume in a professional format."#;

/// Rewrite without a job description. Replace: {resume_text}, {factual_instruction}
pub const GENERAL_IMPROVEMENT_TEMPLATE: &str = r#"As an expert resume writer and ATS optimization specialist, please rewrite and improve this resume so Applicant Tracking Systems parse and rank it well.

Original Resume:
{resume_text}

Please:
1. Use standard section headings (Summary, Experience, Education, Skills)
2. Restructure content for better ATS compatibility
3. Enhance bullet points with quantifiable achievements
4. Surface the keywords already implied by the candidate's experience

{factual_instruction}

Provide the complete improved resume in a professional format."#;
