// All LLM prompt templates for the coaching tasks.
// `{placeholder}` tokens are substituted by the owning service before dispatch.
// The cross-cutting system message lives in llm_client::prompts.

/// Skill-gap analysis prompt. Replace `{company}`, `{skills_json}`,
/// `{resume_text}` (resume text last, since it may contain anything).
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are a career coach. Analyze this candidate for {company}.

Resume: {resume_text}
Skills: {skills_json}
Target: {company}

Return ONLY valid JSON (no markdown, no backticks):
{
  "readinessScore": <0-100>,
  "targetCompany": "{company}",
  "strongSkills": ["skill1", "skill2"],
  "weakSkills": ["skill1", "skill2"],
  "missingSkills": ["skill1"],
  "roadmap": [
    {"month": 1, "title": "...", "description": "..."},
    {"month": 2, "title": "...", "description": "..."},
    {"month": 3, "title": "...", "description": "..."},
    {"month": 4, "title": "...", "description": "..."},
    {"month": 5, "title": "...", "description": "..."},
    {"month": 6, "title": "...", "description": "..."}
  ]
}"#;

/// Interview question generation prompt. Replace `{company}`, `{role}`,
/// `{skills_json}`, `{seed}`.
///
/// The seed makes otherwise-identical prompts distinct so the provider does
/// not hand back the same question set every run.
pub const QUESTIONS_PROMPT_TEMPLATE: &str = r#"You are a senior technical interviewer at {company}.

TASK: Generate 6 realistic interview questions that {company} would actually ask for a {role} role.

Candidate's skills: {skills_json}
Random Seed: {seed} (Ensure this set is COMPLETELY NEW and UNIQUE, different from standard or previous questions)

Include a mix of:
- 1 behavioral question
- 2 technical/coding questions
- 1 system design question
- 1 problem-solving question
- 1 company-specific/culture-fit question

Make them highly specific to {company}'s known interview style, edge cases, and the candidate's skill set. AVOID generic questions like "Tell me about yourself" or "What are your weaknesses?".

RESPONSE FORMAT: Return ONLY a valid JSON array (no markdown, no backticks):
[
  {"question": "...", "type": "behavioral", "difficulty": "medium"},
  {"question": "...", "type": "technical", "difficulty": "hard"},
  {"question": "...", "type": "technical", "difficulty": "medium"},
  {"question": "...", "type": "system_design", "difficulty": "hard"},
  {"question": "...", "type": "problem_solving", "difficulty": "medium"},
  {"question": "...", "type": "culture_fit", "difficulty": "easy"}
]"#;

/// Interview answer feedback prompt. Replace `{company}`,
/// `{question_number}`, `{total_questions}`, `{question}`, `{answer}`.
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"You are a senior technical interviewer at {company}.

Question {question_number}/{total_questions}: "{question}"
Candidate's answer: "{answer}"

Return ONLY valid JSON (no markdown, no backticks):
{
  "score": <1-10>,
  "feedback": "<2-3 sentences>",
  "strengths": ["<strength 1>", "<strength 2>"],
  "improvements": ["<improvement 1>", "<improvement 2>"],
  "tip": "<One pro tip>"
}"#;

/// Resume rewrite prompt. Replace `{resume_text}`.
pub const REWRITE_PROMPT_TEMPLATE: &str = r#"You are a world-class resume writer.

Rewrite this resume to be more professional, impactful, and ATS-optimized:

{resume_text}

Rules: Use action verbs, quantify achievements, add ATS keywords, use STAR method, add a professional summary.

Return ONLY the rewritten resume text. No commentary."#;

/// Cover letter prompt. Replace `{job_title}`, `{company}`, `{key_points}`,
/// `{resume_text}`.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"You are an expert cover letter writer.

Write a compelling, professional cover letter for the {job_title} position at {company}.

Candidate's resume:
{resume_text}

Key points to emphasize: {key_points}

Rules: 3-4 short paragraphs, specific to {company} and the {job_title} role, confident but not arrogant, no placeholders like [Your Name] or [Date].

Return ONLY the cover letter text. No commentary."#;

/// Career chat prompt. Replace `{history}`, `{message}`.
pub const CHAT_PROMPT_TEMPLATE: &str = r#"You are a friendly, expert career coach. Continue this conversation helpfully and concisely.

Conversation so far:
{history}

User: {message}

Respond with plain text only (no JSON, no markdown headings). Keep the reply under 200 words."#;
