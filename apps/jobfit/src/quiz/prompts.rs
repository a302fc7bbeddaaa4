// Prompt constants for quiz generation and grading.

/// Probe sent to the retriever when the stored JD text is unavailable.
pub const QUIZ_PROBE_QUERY: &str = "core responsibilities and required skills";

/// Question prompt. Replace `{n}`, `{grounding}` and `{context}` before sending.
pub const QUESTION_PROMPT: &str = r#"You are an interviewer screening candidates for the role described below.

{grounding}

Write exactly {n} direct self-assessment questions about the skills and responsibilities in the context.
Rules:
- Ask about the candidate's own experience with a named tool or responsibility from the context, e.g. "Have you used Kafka? How many years, and at what scale?"
- No hypothetical scenarios, no puzzles, no generic questions like "Tell me about yourself".
- One sentence or two short sentences per question. No numbering.

Return ONLY a JSON array like:
[{"q": "Have you used PostgreSQL in production? For how many years?"}]

JD CONTEXT:
{context}"#;

/// Grading prompt. Replace `{context}`, `{question}` and `{answer}` before sending.
pub const GRADE_PROMPT: &str = r#"JD CONTEXT:
{context}

QUESTION: {question}
CANDIDATE ANSWER: {answer}

Grade the answer strictly against the JD context.
Give integer scores from 0 to 5:
- accuracy: is the claimed experience relevant and technically correct for this role?
- completeness: does the answer state years, scale, and the candidate's own role?
- communication: is the answer clear and concise?
Give ONE actionable tip of at most 20 words.

Return ONLY JSON like:
{"accuracy": 3, "completeness": 2, "communication": 4, "tip": "State how many years you used it and at what scale."}"#;
