// LLM prompt constants for interview preparation.

/// Replace: {industry}, {skills_clause}, {json_only}
pub const QUIZ_PROMPT_TEMPLATE: &str = r#"Generate 10 multiple-choice technical interview questions for a {industry} professional{skills_clause}.

Each question must have this JSON format:
{
  "question": "string",
  "options": ["A", "B", "C", "D"],
  "correctAnswer": "string",
  "explanation": "string"
}

correctAnswer must be exactly one of the four options.

Return the questions in this structure:
{
  "questions": [ ... ]
}

{json_only}"#;

/// Replace: {industry}, {wrong_summary}
pub const IMPROVEMENT_TIP_PROMPT_TEMPLATE: &str = r#"The user made mistakes in the following {industry} technical interview questions:
{wrong_summary}

Based on these, suggest a short improvement tip (2 sentences max),
focusing on what the user should learn next. Keep it positive and specific.
Do not repeat the questions or mention the mistakes explicitly."#;
