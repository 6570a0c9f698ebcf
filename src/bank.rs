use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::engine::diagram::{DiagramAnswer, DiagramSpec, Interaction};

const BUNDLED_QUESTIONS: &str = include_str!("../assets/questions.json");

#[derive(Error, Debug)]
pub enum BankError {
    #[error("question bank is empty")]
    Empty,
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("question {id}: {reason}")]
    Question { id: u32, reason: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

#[derive(Clone, Debug)]
pub enum QuestionBody {
    Text {
        options: Vec<String>,
        correct: usize,
    },
    Diagram {
        spec: DiagramSpec,
        answer: DiagramAnswer,
    },
}

#[derive(Clone, Debug)]
pub struct Question {
    pub id: u32,
    pub category: String,
    pub difficulty: Difficulty,
    pub question: String,
    pub body: QuestionBody,
    pub explanation: String,
    pub docs_link: Option<String>,
}

impl Question {
    pub fn is_diagram(&self) -> bool {
        matches!(self.body, QuestionBody::Diagram { .. })
    }

    /// Title-cased display name for the category slug.
    pub fn category_display(&self) -> String {
        self.category
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawKind {
    #[default]
    Text,
    Diagram,
}

/// Serde shape of one bank entry. Validated into `Question` so the rest of
/// the crate never sees a half-formed record.
#[derive(Debug, Deserialize)]
struct RawQuestion {
    id: u32,
    category: String,
    difficulty: Difficulty,
    question: String,
    #[serde(default, rename = "type")]
    kind: RawKind,
    #[serde(default)]
    options: Vec<String>,
    correct: serde_json::Value,
    #[serde(default)]
    diagram: Option<DiagramSpec>,
    explanation: String,
    #[serde(default)]
    docs_link: Option<String>,
}

/// The ordered, immutable question bank, loaded once at startup.
#[derive(Clone, Debug)]
pub struct Bank {
    questions: Vec<Question>,
}

impl Bank {
    pub fn bundled() -> Result<Self, BankError> {
        Self::from_json(BUNDLED_QUESTIONS)
    }

    pub fn from_file(path: &Path) -> Result<Self, BankError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn from_json(json: &str) -> Result<Self, BankError> {
        let raw: Vec<RawQuestion> = serde_json::from_str(json)?;
        let questions = raw
            .into_iter()
            .map(validate)
            .collect::<Result<Vec<_>, _>>()?;
        if questions.is_empty() {
            return Err(BankError::Empty);
        }
        Ok(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

fn fail(id: u32, reason: impl Into<String>) -> BankError {
    BankError::Question {
        id,
        reason: reason.into(),
    }
}

fn validate(raw: RawQuestion) -> Result<Question, BankError> {
    let body = match raw.kind {
        RawKind::Text => {
            if raw.options.is_empty() {
                return Err(fail(raw.id, "text question has no options"));
            }
            let correct = raw
                .correct
                .as_u64()
                .ok_or_else(|| fail(raw.id, "text question needs an integer correct index"))?
                as usize;
            if correct >= raw.options.len() {
                return Err(fail(raw.id, "correct index out of range"));
            }
            QuestionBody::Text {
                options: raw.options,
                correct,
            }
        }
        RawKind::Diagram => {
            let spec = raw
                .diagram
                .ok_or_else(|| fail(raw.id, "diagram question missing descriptor"))?;
            let answer: DiagramAnswer = serde_json::from_value(raw.correct)
                .map_err(|e| fail(raw.id, format!("unparseable correct answer: {e}")))?;
            check_answer_shape(raw.id, &spec, &answer)?;
            QuestionBody::Diagram { spec, answer }
        }
    };

    Ok(Question {
        id: raw.id,
        category: raw.category,
        difficulty: raw.difficulty,
        question: raw.question,
        body,
        explanation: raw.explanation,
        docs_link: raw.docs_link,
    })
}

/// The answer shape must agree with the diagram's interaction, and every id
/// it references must exist in the geometry.
fn check_answer_shape(id: u32, spec: &DiagramSpec, answer: &DiagramAnswer) -> Result<(), BankError> {
    let entity_ids = spec.entity_ids();
    let known = |e: &str| entity_ids.iter().any(|known| *known == e);

    match (spec.interaction(), answer) {
        (Interaction::Click { multi_select: false }, DiagramAnswer::Single(entity)) => {
            if !known(entity) {
                return Err(fail(id, format!("correct answer references unknown entity {entity:?}")));
            }
        }
        (Interaction::Click { multi_select: true }, DiagramAnswer::Set(entities)) => {
            if entities.is_empty() {
                return Err(fail(id, "multi-select answer set is empty"));
            }
            for entity in entities {
                if !known(entity) {
                    return Err(fail(id, format!("correct answer references unknown entity {entity:?}")));
                }
            }
        }
        (Interaction::Drag, DiagramAnswer::Placements(pairs)) => {
            if pairs.is_empty() {
                return Err(fail(id, "drag answer has no placements"));
            }
            for (zone, item) in pairs {
                if !spec.zones().iter().any(|z| z.id == *zone) {
                    return Err(fail(id, format!("correct answer references unknown zone {zone:?}")));
                }
                if !known(item) {
                    return Err(fail(id, format!("correct answer references unknown item {item:?}")));
                }
            }
        }
        _ => {
            return Err(fail(id, "correct answer shape does not match the interaction"));
        }
    }
    Ok(())
}
