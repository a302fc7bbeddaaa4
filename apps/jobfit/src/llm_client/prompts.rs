// Cross-cutting prompt fragments. Each module that prompts the oracle keeps
// its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt whose context comes from the job description.
pub const JD_GROUNDING_INSTRUCTION: &str = "\
    Use ONLY the job description context below. Do NOT invent requirements, \
    tools or responsibilities that the context does not mention.";

/// Fills `{name}` placeholders in one pass.
///
/// Substituted values are never rescanned, so untrusted text that happens to
/// contain `{answer}` or `{context}` lands verbatim. Braces that do not name a
/// known placeholder (JSON examples in the template) are left as they are.
pub fn fill_prompt(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
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
