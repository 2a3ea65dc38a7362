// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments.

/// Appended to every prompt whose reply is rendered as Markdown in the UI.
pub const MARKDOWN_FORMAT_INSTRUCTION: &str =
    "Format your response clearly with headings and bullet points.";

/// Keeps rewritten content honest.
pub const FACTUAL_INSTRUCTION: &str = "\
Maintain factual accuracy. Do NOT invent employers, job titles, dates, degrees, \
certifications, or metrics that are not present in the original resume.";

/// Fills `{name}` placeholders in a single pass over `template`.
///
/// Substituted values are never rescanned, so user text containing
/// `{resume_text}` or similar comes through verbatim. Unknown placeholders
/// are left as-is.
pub fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let candidate = &rest[open..];

        let value = candidate.find('}').and_then(|close| {
            let name = &candidate[1..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &candidate[close + 1..];
            }
            None => {
                out.push('{');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
