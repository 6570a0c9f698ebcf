use ratatui::layout::Rect;

use crate::bank::{Bank, Question, QuestionBody};
use crate::config::Config;
use crate::engine::check;
use crate::engine::diagram::{DiagramAnswer, DiagramSpec, Interaction};
use crate::engine::gesture::{self, GestureOutcome, Pointer};
use crate::engine::layout::{self, DiagramLayout};
use crate::selector::{self, Clock};
use crate::session::state::{AnswerMode, SessionState};
use crate::store::json_store::JsonStore;
use crate::store::schema::Progress;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    /// Today's question; answers are recorded.
    Daily,
    /// Page through the bank; answers are recorded.
    Browse,
    /// The bank as a list; opening a row starts a practice run.
    PracticeList,
    /// Isolated no-stakes surface: feedback only, stats untouched.
    Practice,
    Settings,
}

pub struct App {
    pub screen: AppScreen,
    pub bank: Bank,
    pub config: Config,
    pub theme: &'static Theme,
    pub store: Option<JsonStore>,
    pub progress: Progress,
    pub clock: Clock,
    pub session: SessionState,
    /// Verdict carried over from a previous load of today's daily answer,
    /// used to redisplay feedback without re-answering.
    pub restored_verdict: Option<bool>,
    pub browse_index: usize,
    pub practice_selected: usize,
    pub settings_selected: usize,
    pub should_quit: bool,
    /// Item picked up via keyboard on a drag diagram, awaiting a zone.
    pub kb_held: Option<String>,
    // Hit-test state written by the render pass each frame; the same
    // rectangles that were drawn are the ones pointer events resolve against.
    pub diagram_hit: Option<DiagramLayout>,
    pub option_hits: Vec<Rect>,
    pub reveal_hit: Option<Rect>,
}

impl App {
    pub fn new(
        bank: Bank,
        config: Config,
        store: Option<JsonStore>,
        clock: Clock,
        theme: &'static Theme,
    ) -> Self {
        let progress = store
            .as_ref()
            .map(|s| s.load_progress())
            .unwrap_or_default();
        let daily_idx = selector::daily_index(clock.now_utc(), bank.len());
        let mode =
            AnswerMode::from_str(&config.default_mode).unwrap_or(AnswerMode::Quiz);

        let mut app = Self {
            screen: AppScreen::Daily,
            bank,
            config,
            theme,
            store,
            progress,
            clock,
            session: SessionState::for_question(daily_idx, mode),
            restored_verdict: None,
            browse_index: daily_idx,
            practice_selected: 0,
            settings_selected: 0,
            should_quit: false,
            kb_held: None,
            diagram_hit: None,
            option_hits: Vec::new(),
            reveal_hit: None,
        };
        app.go_daily();
        app
    }

    pub fn daily_index(&self) -> usize {
        selector::daily_index(self.clock.now_utc(), self.bank.len())
    }

    pub fn active_question(&self) -> Option<&Question> {
        self.bank.get(self.session.question_idx)
    }

    fn default_mode(&self) -> AnswerMode {
        AnswerMode::from_str(&self.config.default_mode).unwrap_or(AnswerMode::Quiz)
    }

    fn active_diagram(&self) -> Option<(u32, DiagramSpec, DiagramAnswer)> {
        let question = self.active_question()?;
        match &question.body {
            QuestionBody::Diagram { spec, answer } => {
                Some((question.id, spec.clone(), answer.clone()))
            }
            QuestionBody::Text { .. } => None,
        }
    }

    pub fn is_diagram_active(&self) -> bool {
        self.active_question().is_some_and(Question::is_diagram)
    }

    /// Unified verdict for the feedback banner, whatever the answer path was.
    pub fn active_verdict(&self) -> Option<bool> {
        let question = self.active_question()?;
        match &question.body {
            QuestionBody::Text { correct, .. } => {
                if !self.session.has_answered {
                    return None;
                }
                self.session
                    .selected_option
                    .map(|chosen| chosen == *correct)
                    .or(self.restored_verdict)
            }
            QuestionBody::Diagram { .. } => self.session.diagram.verdict,
        }
    }

    // ---- answer paths ------------------------------------------------------

    pub fn select_option(&mut self, index: usize) {
        if self.session.has_answered || self.session.mode != AnswerMode::Quiz {
            return;
        }
        let Some(question) = self.active_question() else {
            return;
        };
        let QuestionBody::Text { options, correct } = &question.body else {
            return;
        };
        if index >= options.len() {
            return;
        }
        let id = question.id;
        let is_correct = index == *correct;

        self.session.selected_option = Some(index);
        self.session.has_answered = true;
        self.finish_answer(id, is_correct);
    }

    /// Revealing the flashcard counts as answering; there is no wrong-answer
    /// state in flashcard mode.
    pub fn reveal_flashcard(&mut self) {
        if self.session.has_answered || self.session.mode != AnswerMode::Flashcard {
            return;
        }
        let Some(question) = self.active_question() else {
            return;
        };
        let QuestionBody::Text { correct, .. } = &question.body else {
            return;
        };
        let id = question.id;
        let correct_index = *correct;

        self.session.selected_option = Some(correct_index);
        self.session.has_answered = true;
        self.finish_answer(id, true);
    }

    pub fn toggle_mode(&mut self) {
        if self.active_question().is_some_and(|q| !q.is_diagram()) {
            self.session.toggle_mode();
        }
    }

    pub fn submit_diagram(&mut self) {
        if self.session.has_answered {
            return;
        }
        let Some((id, spec, answer)) = self.active_diagram() else {
            return;
        };
        if !check::submit_ready(&spec, &self.session.diagram) {
            return;
        }
        let verdict = check::correct(&answer, &self.session.diagram);
        self.session.diagram.verdict = Some(verdict);
        self.session.has_answered = true;
        self.kb_held = None;
        self.finish_answer(id, verdict);
    }

    /// Keyboard adapter over the same engine operations the pointer uses:
    /// on click diagrams a number selects that entity; on drag diagrams the
    /// first number picks an item up and the second drops it into a zone.
    pub fn diagram_key_number(&mut self, number: usize) {
        if number == 0 {
            return;
        }
        let index = number - 1;
        let Some((_, spec, _)) = self.active_diagram() else {
            return;
        };
        if self.session.diagram.verdict.is_some() {
            return;
        }
        match spec.interaction() {
            Interaction::Click { .. } => {
                let Some(entity) = spec.entity_ids().get(index).map(|s| s.to_string()) else {
                    return;
                };
                if gesture::click(&spec, &mut self.session.diagram, &entity)
                    == GestureOutcome::SubmitRequested
                {
                    self.submit_diagram();
                }
            }
            Interaction::Drag => match self.kb_held.take() {
                None => {
                    if let Some(entity) = spec.entity_ids().get(index) {
                        self.kb_held = Some(entity.to_string());
                    }
                }
                Some(item) => {
                    if let Some(zone) = spec.zones().get(index) {
                        gesture::place(&mut self.session.diagram, &item, &zone.id);
                    }
                }
            },
        }
    }

    // ---- pointer adapters --------------------------------------------------

    pub fn pointer_down(&mut self, x: u16, y: u16) {
        if self.is_diagram_active() {
            let Some((_, spec, _)) = self.active_diagram() else {
                return;
            };
            let Some(hit) = self.diagram_hit.clone() else {
                return;
            };
            let outcome =
                gesture::pointer_down(&spec, &mut self.session.diagram, &hit, Pointer { x, y });
            if outcome == GestureOutcome::SubmitRequested {
                self.submit_diagram();
            }
            return;
        }

        if self.session.has_answered {
            return;
        }
        match self.session.mode {
            AnswerMode::Quiz => {
                let hit = self
                    .option_hits
                    .iter()
                    .position(|r| layout::contains(*r, x, y));
                if let Some(index) = hit {
                    self.select_option(index);
                }
            }
            AnswerMode::Flashcard => {
                if self.reveal_hit.is_some_and(|r| layout::contains(r, x, y)) {
                    self.reveal_flashcard();
                }
            }
        }
    }

    pub fn pointer_move(&mut self, x: u16, y: u16) {
        gesture::pointer_move(&mut self.session.diagram, Pointer { x, y });
    }

    pub fn pointer_up(&mut self, x: u16, y: u16) {
        if let Some(hit) = self.diagram_hit.clone() {
            gesture::pointer_up(&mut self.session.diagram, &hit, Pointer { x, y });
        }
    }

    // ---- persistence -------------------------------------------------------

    /// Single exit point for every answer path. Practice runs are purely
    /// visual and never reach the progress record.
    fn finish_answer(&mut self, question_id: u32, is_correct: bool) {
        if self.screen == AppScreen::Practice {
            return;
        }
        self.progress
            .record_answer(question_id, is_correct, self.clock.today());
        self.save_data();
    }

    fn save_data(&self) {
        if let Some(ref store) = self.store {
            let _ = store.save_progress(&self.progress);
        }
    }

    // ---- navigation --------------------------------------------------------

    fn fresh_session(&mut self, question_idx: usize, mode: AnswerMode) {
        self.session = SessionState::for_question(question_idx, mode);
        self.restored_verdict = None;
        self.kb_held = None;
        self.diagram_hit = None;
        self.option_hits.clear();
        self.reveal_hit = None;
    }

    pub fn go_daily(&mut self) {
        let daily_idx = self.daily_index();
        let mode = self.default_mode();
        self.fresh_session(daily_idx, mode);

        // Revisiting an already-answered daily question redisplays feedback
        // from the persisted verdict instead of allowing a re-answer.
        if let Some(question) = self.bank.get(daily_idx) {
            if self.progress.answered_today(question.id, self.clock.today()) {
                self.session.has_answered = true;
                self.restored_verdict = self.progress.last_answer_correct;
                if question.is_diagram() {
                    self.session.diagram.verdict = self.progress.last_answer_correct;
                }
            }
        }
        self.screen = AppScreen::Daily;
    }

    pub fn enter_browse(&mut self) {
        let mode = self.session.mode;
        self.fresh_session(self.browse_index, mode);
        self.screen = AppScreen::Browse;
    }

    pub fn browse_next(&mut self) {
        self.browse_index = selector::next_index(self.browse_index, self.bank.len());
        let mode = self.session.mode;
        self.fresh_session(self.browse_index, mode);
    }

    pub fn browse_prev(&mut self) {
        self.browse_index = selector::prev_index(self.browse_index, self.bank.len());
        let mode = self.session.mode;
        self.fresh_session(self.browse_index, mode);
    }

    pub fn browse_jump(&mut self, index: i64) {
        self.browse_index = selector::clamp_index(index, self.bank.len());
        let mode = self.session.mode;
        self.fresh_session(self.browse_index, mode);
    }

    pub fn go_practice_list(&mut self) {
        self.screen = AppScreen::PracticeList;
    }

    pub fn practice_next(&mut self) {
        self.practice_selected = selector::next_index(self.practice_selected, self.bank.len());
    }

    pub fn practice_prev(&mut self) {
        self.practice_selected = selector::prev_index(self.practice_selected, self.bank.len());
    }

    pub fn open_practice(&mut self) {
        let mode = self.default_mode();
        self.fresh_session(self.practice_selected, mode);
        self.screen = AppScreen::Practice;
    }

    pub fn close_practice(&mut self) {
        self.screen = AppScreen::PracticeList;
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    // ---- settings ----------------------------------------------------------

    pub fn settings_cycle_forward(&mut self) {
        match self.settings_selected {
            0 => self.cycle_theme(1),
            1 => self.cycle_default_mode(),
            _ => {}
        }
    }

    pub fn settings_cycle_backward(&mut self) {
        match self.settings_selected {
            0 => self.cycle_theme(-1),
            1 => self.cycle_default_mode(),
            _ => {}
        }
    }

    fn cycle_theme(&mut self, step: i64) {
        let themes = Theme::available_themes();
        if themes.is_empty() {
            return;
        }
        let current = themes
            .iter()
            .position(|t| *t == self.config.theme)
            .unwrap_or(0) as i64;
        let next = (current + step).rem_euclid(themes.len() as i64) as usize;
        self.config.theme = themes[next].clone();
        if let Some(new_theme) = Theme::load(&self.config.theme) {
            let theme: &'static Theme = Box::leak(Box::new(new_theme));
            self.theme = theme;
        }
    }

    fn cycle_default_mode(&mut self) {
        self.config.default_mode = if self.config.default_mode == "quiz" {
            "flashcard".to_string()
        } else {
            "quiz".to_string()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn test_theme() -> &'static Theme {
        Box::leak(Box::new(Theme::default()))
    }

    fn pinned_app(date: NaiveDate) -> App {
        let bank = Bank::bundled().unwrap();
        App::new(
            bank,
            Config::default(),
            None,
            Clock::pinned(date),
            test_theme(),
        )
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Force the active question to a known text question.
    fn jump_to_text(app: &mut App) -> usize {
        let idx = app
            .bank
            .questions()
            .iter()
            .position(|q| !q.is_diagram())
            .unwrap();
        app.enter_browse();
        app.browse_jump(idx as i64);
        idx
    }

    fn jump_to_diagram_single(app: &mut App) {
        let idx = app
            .bank
            .questions()
            .iter()
            .position(|q| match &q.body {
                QuestionBody::Diagram { spec, .. } => {
                    spec.interaction()
                        == Interaction::Click {
                            multi_select: false,
                        }
                }
                _ => false,
            })
            .unwrap();
        app.enter_browse();
        app.browse_jump(idx as i64);
    }

    #[test]
    fn answering_updates_progress_and_guards_resubmission() {
        let mut app = pinned_app(day(2026, 8, 7));
        jump_to_text(&mut app);
        let QuestionBody::Text { correct, .. } = app.active_question().unwrap().body.clone()
        else {
            unreachable!()
        };

        app.select_option(correct);
        assert_eq!(app.progress.total_answered, 1);
        assert_eq!(app.progress.correct_count, 1);
        assert_eq!(app.progress.streak, 1);
        assert_eq!(app.active_verdict(), Some(true));

        // Second submit on the answered surface is a no-op.
        app.select_option(correct);
        assert_eq!(app.progress.total_answered, 1);
        assert_eq!(app.progress.streak, 1);
    }

    #[test]
    fn flashcard_reveal_records_a_correct_answer() {
        let mut app = pinned_app(day(2026, 8, 7));
        jump_to_text(&mut app);
        app.toggle_mode();
        assert_eq!(app.session.mode, AnswerMode::Flashcard);

        app.reveal_flashcard();
        assert!(app.session.has_answered);
        assert_eq!(app.progress.total_answered, 1);
        assert_eq!(app.progress.correct_count, 1);
        assert_eq!(app.active_verdict(), Some(true));
    }

    #[test]
    fn practice_answers_leave_stats_untouched() {
        let mut app = pinned_app(day(2026, 8, 7));
        let idx = app
            .bank
            .questions()
            .iter()
            .position(|q| !q.is_diagram())
            .unwrap();
        app.go_practice_list();
        app.practice_selected = idx;
        app.open_practice();

        let QuestionBody::Text { correct, .. } = app.active_question().unwrap().body.clone()
        else {
            unreachable!()
        };
        app.select_option(correct);

        // Feedback is purely visual.
        assert!(app.session.has_answered);
        assert_eq!(app.active_verdict(), Some(true));
        assert_eq!(app.progress.total_answered, 0);
        assert_eq!(app.progress.streak, 0);
        assert!(app.progress.answered_questions.is_empty());
    }

    #[test]
    fn single_click_diagram_submits_immediately_via_keyboard() {
        let mut app = pinned_app(day(2026, 8, 7));
        jump_to_diagram_single(&mut app);

        app.diagram_key_number(1);
        assert!(app.session.has_answered);
        assert!(app.session.diagram.verdict.is_some());
        assert_eq!(app.progress.total_answered, 1);
    }

    #[test]
    fn revisiting_answered_daily_restores_feedback() {
        let bank = Bank::bundled().unwrap();
        let clock = Clock::pinned(day(2026, 8, 7));
        let daily_idx = selector::daily_index(clock.now_utc(), bank.len());
        let daily_id = bank.get(daily_idx).unwrap().id;

        let mut progress = Progress::default();
        progress.record_answer(daily_id, false, clock.today());

        let mut app = App::new(bank, Config::default(), None, clock, test_theme());
        app.progress = progress;
        app.go_daily();

        assert!(app.session.has_answered);
        assert_eq!(app.restored_verdict, Some(false));
    }

    #[test]
    fn browse_navigation_resets_answer_state_and_clamps() {
        let mut app = pinned_app(day(2026, 8, 7));
        app.enter_browse();
        app.browse_jump(0);
        app.session.has_answered = true;
        app.browse_next();
        assert!(!app.session.has_answered);
        assert_eq!(app.browse_index, 1);
        app.browse_jump(9999);
        assert_eq!(app.browse_index, app.bank.len() - 1);
        app.browse_next();
        assert_eq!(app.browse_index, app.bank.len() - 1);
    }

    #[test]
    fn browse_answer_counts_but_daily_slot_stays_open_for_other_questions() {
        let mut app = pinned_app(day(2026, 8, 7));
        let daily_idx = app.daily_index();
        let other_idx = app
            .bank
            .questions()
            .iter()
            .enumerate()
            .position(|(i, q)| i != daily_idx && !q.is_diagram())
            .unwrap();
        app.enter_browse();
        app.browse_jump(other_idx as i64);
        let QuestionBody::Text { correct, .. } = app.active_question().unwrap().body.clone()
        else {
            unreachable!()
        };
        app.select_option(correct);
        assert_eq!(app.progress.total_answered, 1);

        // The daily question itself was not answered, so going back to the
        // daily screen still offers it.
        app.go_daily();
        assert!(!app.session.has_answered);
    }
}
