// LLM prompt constants for industry insights.

/// Replace: {industry}, {json_only}
pub const INSIGHT_PROMPT_TEMPLATE: &str = r#"Analyze the current state of the {industry} industry and provide insights in ONLY the following JSON format:
{
  "salaryRanges": [
    {"role": "string", "min": number, "max": number, "median": number, "location": "string"}
  ],
  "growthRate": number,
  "demandLevel": "High" | "Medium" | "Low",
  "topSkills": ["skill1", "skill2"],
  "marketOutlook": "Positive" | "Neutral" | "Negative",
  "keyTrends": ["trend1", "trend2"],
  "recommendedSkills": ["skill1", "skill2"]
}

Include at least 5 common roles for salary ranges, with amounts in thousands.
growthRate is a percentage. Include at least 5 skills and 5 trends.

{json_only}"#;
