//! Quiz schema and the static fallback question set.

use serde::{Deserialize, Serialize};

use crate::extraction::fields::list_of;
use crate::extraction::payload::parse_json_object;
use crate::extraction::{ExtractionError, StructuredReply};

pub const OPTIONS_PER_QUESTION: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

impl QuizQuestion {
    /// Four options, a non-blank prompt, and an answer that is one of the options.
    pub fn is_well_formed(&self) -> bool {
        !self.question.trim().is_empty()
            && self.options.len() == OPTIONS_PER_QUESTION
            && self.options.iter().any(|o| o == &self.correct_answer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
}

impl StructuredReply for Quiz {
    fn from_reply(raw: &str) -> Result<Self, ExtractionError> {
        let obj = parse_json_object(raw)?;
        let questions: Vec<QuizQuestion> = list_of::<QuizQuestion>(&obj, "questions")
            .into_iter()
            .filter(QuizQuestion::is_well_formed)
            .collect();

        if questions.is_empty() {
            return Err(ExtractionError::Schema(
                "quiz contained no usable questions".to_string(),
            ));
        }
        Ok(Quiz { questions })
    }
}

/// (question, options, correct answer, explanation)
type StaticQuestion = (&'static str, [&'static str; 4], &'static str, &'static str);

const FALLBACK_QUESTIONS: [StaticQuestion; 10] = [
    (
        "What does HTML stand for?",
        [
            "HyperText Markup Language",
            "HighText Machine Language",
            "HyperTransfer Markup Language",
            "HyperText Markdown Language",
        ],
        "HyperText Markup Language",
        "HTML defines the structure of web pages.",
    ),
    (
        "Which CSS property is used to change text color?",
        ["color", "text-color", "font-color", "background-color"],
        "color",
        "The 'color' property defines text color in CSS.",
    ),
    (
        "Which JavaScript keyword declares a constant variable?",
        ["const", "var", "let", "static"],
        "const",
        "'const' creates a block-scoped, unchangeable variable.",
    ),
    (
        "Which React hook is used for state management?",
        ["useState", "useEffect", "useContext", "useMemo"],
        "useState",
        "useState manages component-level state in React.",
    ),
    (
        "What does SQL stand for?",
        [
            "Structured Query Language",
            "Simple Query Language",
            "Sequential Query Logic",
            "Structured Question Language",
        ],
        "Structured Query Language",
        "SQL stands for Structured Query Language.",
    ),
    (
        "Which tag is used to link an external CSS file in HTML?",
        ["<link>", "<style>", "<css>", "<stylesheet>"],
        "<link>",
        "The <link> tag links external CSS files.",
    ),
    (
        "Which method converts JSON text into a JavaScript object?",
        [
            "JSON.parse()",
            "JSON.stringify()",
            "JSON.convert()",
            "JSON.toObject()",
        ],
        "JSON.parse()",
        "JSON.parse() converts JSON strings to JS objects.",
    ),
    (
        "What is Node.js?",
        [
            "JavaScript runtime environment",
            "Programming language",
            "Database",
            "Web framework",
        ],
        "JavaScript runtime environment",
        "Node.js runs JavaScript outside the browser.",
    ),
    (
        "Which HTTP method is used to create data on a server?",
        ["POST", "GET", "PUT", "DELETE"],
        "POST",
        "POST is used to create or submit data to a server.",
    ),
    (
        "Which AI model is commonly used for text generation?",
        ["Transformer", "CNN", "RNN", "GAN"],
        "Transformer",
        "Transformer models power modern LLMs like Gemini and GPT.",
    ),
];

impl Quiz {
    /// The fixed general-knowledge set served when generation fails.
    pub fn fallback() -> Self {
        Quiz {
            questions: FALLBACK_QUESTIONS
                .iter()
                .map(|(question, options, answer, explanation)| QuizQuestion {
                    question: question.to_string(),
                    options: options.iter().map(|o| o.to_string()).collect(),
                    correct_answer: answer.to_string(),
                    explanation: explanation.to_string(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{generate, GenerationRequest, GenerationStatus};
    use crate::llm_client::fake::ScriptedGenerator;

    const ONE_GOOD_ONE_BAD: &str = r#"```json
{
  "questions": [
    {
      "question": "What does `?` do in Rust?",
      "options": ["Propagates errors", "Panics", "Clones", "Nothing"],
      "correctAnswer": "Propagates errors",
      "explanation": "It returns early with the error."
    },
    {
      "question": "Pick one",
      "options": ["A", "B"],
      "correctAnswer": "A",
      "explanation": "Only two options."
    }
  ]
}
```"#;

    async fn run(reply: &'static str) -> (Quiz, GenerationStatus) {
        let llm = ScriptedGenerator::replying([reply]);
        let result = generate(&llm, "quiz", &GenerationRequest::new("quiz"), Quiz::fallback).await;
        (result.value, result.status)
    }

    #[test]
    fn test_fallback_is_ten_well_formed_questions() {
        let quiz = Quiz::fallback();
        assert_eq!(quiz.questions.len(), 10);
        assert!(quiz.questions.iter().all(QuizQuestion::is_well_formed));
        assert_eq!(quiz.questions[0].question, "What does HTML stand for?");
        assert_eq!(quiz.questions[9].correct_answer, "Transformer");
    }

    #[tokio::test]
    async fn test_malformed_questions_are_dropped() {
        let (quiz, status) = run(ONE_GOOD_ONE_BAD).await;
        assert_eq!(status, GenerationStatus::Completed);
        assert_eq!(quiz.questions.len(), 1);
        assert_eq!(quiz.questions[0].correct_answer, "Propagates errors");
    }

    #[tokio::test]
    async fn test_zero_questions_returns_fallback_verbatim() {
        let (quiz, status) = run(r#"{"questions": []}"#).await;
        assert_eq!(status, GenerationStatus::Fallback);
        assert_eq!(quiz, Quiz::fallback());
    }

    #[tokio::test]
    async fn test_missing_questions_key_returns_fallback() {
        let (quiz, status) = run(r#"{"items": [1, 2, 3]}"#).await;
        assert_eq!(status, GenerationStatus::Fallback);
        assert_eq!(quiz, Quiz::fallback());
    }

    #[tokio::test]
    async fn test_answer_outside_options_is_rejected() {
        let (quiz, status) = run(
            r#"{"questions": [{"question": "Q", "options": ["a", "b", "c", "d"], "correctAnswer": "e"}]}"#,
        )
        .await;
        assert_eq!(status, GenerationStatus::Fallback);
        assert_eq!(quiz.questions.len(), 10);
    }

    #[tokio::test]
    async fn test_missing_explanation_defaults_to_empty() {
        let (quiz, status) = run(
            r#"{"questions": [{"question": "Q", "options": ["a", "b", "c", "d"], "correctAnswer": "c"}]}"#,
        )
        .await;
        assert_eq!(status, GenerationStatus::Completed);
        assert_eq!(quiz.questions[0].explanation, "");
    }
}
