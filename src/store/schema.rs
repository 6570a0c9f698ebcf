use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The single persisted record. Field names are camelCase on disk, and every
/// field defaults so a partial or legacy blob still loads. No schema version:
/// a malformed record is replaced wholesale by the zeroed default at read
/// time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Progress {
    pub answered_questions: Vec<u32>,
    pub last_answered_date: Option<NaiveDate>,
    pub streak: u32,
    pub correct_count: u32,
    pub total_answered: u32,
    pub last_answer_correct: Option<bool>,
}

impl Progress {
    /// The one shared answer-recording routine. Every answer path — quiz,
    /// flashcard reveal, diagram submit, browse — funnels through here so the
    /// streak and accuracy invariants hold regardless of entry point.
    ///
    /// Streak rule: answered yesterday means extend; any older date (or never)
    /// means the act of answering starts a new streak at 1; already answered
    /// today means the streak is untouched.
    pub fn record_answer(&mut self, question_id: u32, is_correct: bool, today: NaiveDate) {
        let yesterday = today.pred_opt();
        if yesterday.is_some() && self.last_answered_date == yesterday {
            self.streak += 1;
        } else if self.last_answered_date != Some(today) {
            self.streak = 1;
        }

        self.last_answered_date = Some(today);
        self.total_answered += 1;
        self.last_answer_correct = Some(is_correct);
        if is_correct {
            self.correct_count += 1;
        }

        if !self.answered_questions.contains(&question_id) {
            self.answered_questions.push(question_id);
        }
    }

    /// Whether the given question counts as answered for today's daily slot:
    /// the last answer landed today AND this exact question has been answered.
    pub fn answered_today(&self, question_id: u32, today: NaiveDate) -> bool {
        self.last_answered_date == Some(today) && self.answered_questions.contains(&question_id)
    }

    pub fn accuracy_percent(&self) -> u32 {
        if self.total_answered == 0 {
            return 0;
        }
        ((self.correct_count as f64 / self.total_answered as f64) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn first_answer_starts_a_streak_of_one() {
        let mut progress = Progress::default();
        progress.record_answer(5, true, day(2026, 8, 7));
        assert_eq!(progress.streak, 1);
        assert_eq!(progress.total_answered, 1);
        assert_eq!(progress.correct_count, 1);
        assert_eq!(progress.last_answer_correct, Some(true));
        assert_eq!(progress.last_answered_date, Some(day(2026, 8, 7)));
        assert_eq!(progress.answered_questions, vec![5]);
    }

    #[test]
    fn answering_on_consecutive_days_extends_streak() {
        let mut progress = Progress {
            streak: 4,
            last_answered_date: Some(day(2026, 8, 6)),
            ..Default::default()
        };
        progress.record_answer(1, false, day(2026, 8, 7));
        assert_eq!(progress.streak, 5);
        assert_eq!(progress.correct_count, 0);
        assert_eq!(progress.last_answer_correct, Some(false));
    }

    #[test]
    fn gap_of_two_days_resets_streak_to_one() {
        let mut progress = Progress {
            streak: 30,
            last_answered_date: Some(day(2026, 8, 4)),
            ..Default::default()
        };
        progress.record_answer(1, true, day(2026, 8, 7));
        assert_eq!(progress.streak, 1);
    }

    #[test]
    fn same_day_reanswer_leaves_streak_unchanged() {
        let mut progress = Progress {
            streak: 3,
            last_answered_date: Some(day(2026, 8, 7)),
            total_answered: 10,
            ..Default::default()
        };
        progress.record_answer(2, true, day(2026, 8, 7));
        // Neither branch fires: streak holds, but the answer still counts.
        assert_eq!(progress.streak, 3);
        assert_eq!(progress.total_answered, 11);
    }

    #[test]
    fn answered_id_insertion_is_idempotent() {
        let mut progress = Progress::default();
        progress.record_answer(9, true, day(2026, 8, 6));
        progress.record_answer(9, false, day(2026, 8, 7));
        assert_eq!(progress.answered_questions, vec![9]);
        assert_eq!(progress.total_answered, 2);
    }

    #[test]
    fn answered_today_needs_both_date_and_id_match() {
        let mut progress = Progress::default();
        progress.record_answer(3, true, day(2026, 8, 6));
        // Right id, wrong day.
        assert!(!progress.answered_today(3, day(2026, 8, 7)));
        assert!(progress.answered_today(3, day(2026, 8, 6)));
        // Right day, different question.
        progress.record_answer(4, true, day(2026, 8, 7));
        assert!(progress.answered_today(4, day(2026, 8, 7)));
        assert!(!progress.answered_today(5, day(2026, 8, 7)));
    }

    #[test]
    fn accuracy_rounds_to_whole_percent() {
        let progress = Progress {
            correct_count: 2,
            total_answered: 3,
            ..Default::default()
        };
        assert_eq!(progress.accuracy_percent(), 67);
        assert_eq!(Progress::default().accuracy_percent(), 0);
    }

    #[test]
    fn record_serde_round_trips_field_for_field() {
        let mut progress = Progress::default();
        progress.record_answer(1, true, day(2026, 8, 7));
        progress.record_answer(2, false, day(2026, 8, 7));

        let json = serde_json::to_string(&progress).unwrap();
        // On-disk names are camelCase.
        assert!(json.contains("answeredQuestions"));
        assert!(json.contains("lastAnsweredDate"));
        let back: Progress = serde_json::from_str(&json).unwrap();
        assert_eq!(progress, back);
    }

    #[test]
    fn partial_blob_fills_missing_fields_with_defaults() {
        let back: Progress = serde_json::from_str(r#"{"streak": 7}"#).unwrap();
        assert_eq!(back.streak, 7);
        assert!(back.answered_questions.is_empty());
        assert_eq!(back.last_answer_correct, None);
    }
}
