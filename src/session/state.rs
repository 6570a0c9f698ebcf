use std::collections::BTreeMap;

use crate::engine::gesture::DragSession;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerMode {
    Quiz,
    Flashcard,
}

impl AnswerMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AnswerMode::Quiz => "quiz",
            AnswerMode::Flashcard => "flashcard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "quiz" => Some(AnswerMode::Quiz),
            "flashcard" => Some(AnswerMode::Flashcard),
            _ => None,
        }
    }
}

/// Accumulated interaction state for one diagram question.
/// Exactly one of `selected`/`placements` is meaningfully populated,
/// depending on the diagram's interaction.
#[derive(Clone, Debug, Default)]
pub struct DiagramState {
    /// Click selections, insertion-ordered.
    pub selected: Vec<String>,
    /// zone id -> item id. An item occupies at most one zone.
    pub placements: BTreeMap<String, String>,
    /// In-flight drag, if any.
    pub drag: Option<DragSession>,
    /// Set on submit; `Some` means the question reached Submitted(bool).
    pub verdict: Option<bool>,
}

impl DiagramState {
    pub fn placed_zone(&self, item: &str) -> Option<&str> {
        self.placements
            .iter()
            .find(|(_, v)| v.as_str() == item)
            .map(|(k, _)| k.as_str())
    }

    pub fn item_in_zone(&self, zone: &str) -> Option<&str> {
        self.placements.get(zone).map(String::as_str)
    }
}

/// Ephemeral state for one answer surface. Rebuilt whenever the active
/// question changes; never persisted.
#[derive(Clone, Debug)]
pub struct SessionState {
    /// Index into the question bank.
    pub question_idx: usize,
    pub mode: AnswerMode,
    pub has_answered: bool,
    pub selected_option: Option<usize>,
    pub diagram: DiagramState,
}

impl SessionState {
    pub fn for_question(question_idx: usize, mode: AnswerMode) -> Self {
        Self {
            question_idx,
            mode,
            has_answered: false,
            selected_option: None,
            diagram: DiagramState::default(),
        }
    }

    /// Clear everything answer-local while keeping the question and mode.
    pub fn reset_answer_state(&mut self) {
        self.has_answered = false;
        self.selected_option = None;
        self.diagram = DiagramState::default();
    }

    /// Quiz <-> flashcard. Does not touch `has_answered`.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AnswerMode::Quiz => AnswerMode::Flashcard,
            AnswerMode::Flashcard => AnswerMode::Quiz,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_mode_preserves_answer_state() {
        let mut session = SessionState::for_question(3, AnswerMode::Quiz);
        session.has_answered = true;
        session.selected_option = Some(1);
        session.toggle_mode();
        assert_eq!(session.mode, AnswerMode::Flashcard);
        assert!(session.has_answered);
        assert_eq!(session.selected_option, Some(1));
        session.toggle_mode();
        assert_eq!(session.mode, AnswerMode::Quiz);
    }

    #[test]
    fn reset_clears_selection_and_placements() {
        let mut session = SessionState::for_question(0, AnswerMode::Quiz);
        session.has_answered = true;
        session.diagram.selected.push("n1".to_string());
        session
            .diagram
            .placements
            .insert("z1".to_string(), "i1".to_string());
        session.diagram.verdict = Some(false);
        session.reset_answer_state();
        assert!(!session.has_answered);
        assert!(session.diagram.selected.is_empty());
        assert!(session.diagram.placements.is_empty());
        assert!(session.diagram.verdict.is_none());
    }

    #[test]
    fn placed_zone_finds_item_owner() {
        let mut state = DiagramState::default();
        state
            .placements
            .insert("stores".to_string(), "broker".to_string());
        assert_eq!(state.placed_zone("broker"), Some("stores"));
        assert_eq!(state.placed_zone("producer"), None);
        assert_eq!(state.item_in_zone("stores"), Some("broker"));
    }
}
