// Prompt constants for skill extraction.

/// Probe sent to the retriever to pull requirement-heavy JD passages.
pub const SKILL_PROBE_QUERY: &str = "key skills, requirements, and tech stack";

/// Skill extraction prompt. Replace `{grounding}` and `{context}` before sending.
pub const SKILL_EXTRACTION_PROMPT: &str = r#"You are given job description context. Extract the most important skills, technologies and tools it asks for.

{grounding}

Rules:
- Normalize common technology name variants (e.g. "Node" -> "Node.js", "Postgres" -> "PostgreSQL", "React.js" -> "React").
- importance is an integer from 1 (nice to have) to 5 (central to the role).
- must_have is true only when the context states the skill is required.
- List each skill once. Limit to 15-20 items.

Return ONLY a JSON array like:
[{"skill": "Python", "importance": 4, "must_have": true}]

JD CONTEXT:
{context}"#;
