// LLM prompt constants for cover letters.

/// Replace: {job_title}, {company_name}, {industry}, {experience}, {skills},
///          {bio}, {job_description}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a professional cover letter for a {job_title} position at {company_name}.

About the candidate:
- Industry: {industry}
- Experience: {experience} years
- Skills: {skills}
- Bio: {bio}

Job Description:
{job_description}

Requirements:
1. Keep tone professional yet engaging.
2. Highlight relevant experience and achievements.
3. Keep it concise (under 400 words).
4. Format as a proper business cover letter in Markdown."#;
