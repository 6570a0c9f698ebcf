use chrono::NaiveDate;
use ratatui::layout::Rect;
use tempfile::TempDir;

use quizdr::app::{App, AppScreen};
use quizdr::bank::{Bank, QuestionBody};
use quizdr::engine::diagram::Interaction;
use quizdr::config::Config;
use quizdr::engine::layout::arrange;
use quizdr::selector::{self, Clock};
use quizdr::store::json_store::JsonStore;
use quizdr::ui::theme::Theme;

fn test_theme() -> &'static Theme {
    Box::leak(Box::new(Theme::default()))
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn app_with_store(dir: &TempDir, date: NaiveDate) -> App {
    let bank = Bank::bundled().unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    App::new(
        bank,
        Config::default(),
        Some(store),
        Clock::pinned(date),
        test_theme(),
    )
}

/// Answer whatever question is active, via the path matching its body.
fn answer_active(app: &mut App) {
    match app.active_question().unwrap().body.clone() {
        QuestionBody::Text { correct, .. } => app.select_option(correct),
        QuestionBody::Diagram { spec, .. } => match spec.interaction() {
            Interaction::Click { .. } => {
                app.diagram_key_number(1);
                app.submit_diagram();
            }
            Interaction::Drag => {
                // Fill every zone through the keyboard adapter, then submit;
                // correctness does not matter here, recording does.
                for i in 1..=spec.zones().len() {
                    app.diagram_key_number(i);
                    app.diagram_key_number(i);
                }
                app.submit_diagram();
            }
        },
    }
}

/// Answer the active *text* question correctly; jumps browse mode to a text
/// question first so every fixture date behaves the same.
fn answer_daily_as_browse_text(app: &mut App) {
    let idx = app
        .bank
        .questions()
        .iter()
        .position(|q| !q.is_diagram())
        .unwrap();
    app.enter_browse();
    app.browse_jump(idx as i64);
    let QuestionBody::Text { correct, .. } = app.active_question().unwrap().body.clone() else {
        unreachable!()
    };
    app.select_option(correct);
}

#[test]
fn progress_survives_a_restart() {
    let dir = TempDir::new().unwrap();
    let date = day(2026, 8, 7);

    let mut app = app_with_store(&dir, date);
    answer_active(&mut app);
    let saved = app.progress.clone();
    assert_eq!(saved.total_answered, 1);
    drop(app);

    // Fresh process, same store: record comes back field for field and the
    // daily question shows as already answered.
    let app = app_with_store(&dir, date);
    assert_eq!(app.progress, saved);
    assert!(app.session.has_answered);
    assert_eq!(app.restored_verdict, app.progress.last_answer_correct);
}

#[test]
fn streak_extends_daily_and_resets_after_a_gap() {
    let dir = TempDir::new().unwrap();

    let mut app = app_with_store(&dir, day(2026, 8, 5));
    answer_daily_as_browse_text(&mut app);
    assert_eq!(app.progress.streak, 1);
    drop(app);

    let mut app = app_with_store(&dir, day(2026, 8, 6));
    answer_daily_as_browse_text(&mut app);
    assert_eq!(app.progress.streak, 2);
    drop(app);

    // Two-day gap: the act of answering starts a new streak at 1.
    let mut app = app_with_store(&dir, day(2026, 8, 9));
    answer_daily_as_browse_text(&mut app);
    assert_eq!(app.progress.streak, 1);
    assert_eq!(app.progress.total_answered, 3);
}

#[test]
fn bank_of_three_scenario_on_epoch_day_ten() {
    // Epoch day 10 is 1970-01-11; 10 mod 3 picks question index 1.
    let json = r#"[
        {"id": 100, "category": "c", "difficulty": "easy", "question": "q0",
         "options": ["a", "b"], "correct": 0, "explanation": "e"},
        {"id": 101, "category": "c", "difficulty": "easy", "question": "q1",
         "options": ["a", "b"], "correct": 1, "explanation": "e"},
        {"id": 102, "category": "c", "difficulty": "easy", "question": "q2",
         "options": ["a", "b"], "correct": 0, "explanation": "e"}
    ]"#;
    let bank = Bank::from_json(json).unwrap();
    let clock = Clock::pinned(day(1970, 1, 11));
    assert_eq!(selector::daily_index(clock.now_utc(), bank.len()), 1);

    let dir = TempDir::new().unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let mut app = App::new(bank, Config::default(), Some(store), clock, test_theme());

    assert_eq!(app.active_question().unwrap().id, 101);
    assert!(app.progress.last_answered_date.is_none());

    app.select_option(1);
    assert_eq!(app.progress.streak, 1);
    assert_eq!(app.progress.total_answered, 1);
    assert_eq!(app.progress.correct_count, 1);
    assert_eq!(app.progress.last_answer_correct, Some(true));

    // Idempotence: a second submit on the answered daily question changes
    // nothing.
    app.select_option(1);
    app.select_option(0);
    assert_eq!(app.progress.total_answered, 1);
    assert_eq!(app.progress.streak, 1);
}

#[test]
fn practice_run_never_touches_the_stored_record() {
    let dir = TempDir::new().unwrap();
    let mut app = app_with_store(&dir, day(2026, 8, 7));

    app.go_practice_list();
    app.practice_selected = app
        .bank
        .questions()
        .iter()
        .position(|q| !q.is_diagram())
        .unwrap();
    app.open_practice();
    assert_eq!(app.screen, AppScreen::Practice);

    let QuestionBody::Text { correct, .. } = app.active_question().unwrap().body.clone() else {
        unreachable!()
    };
    app.select_option(correct);
    assert!(app.session.has_answered);
    drop(app);

    let app = app_with_store(&dir, day(2026, 8, 7));
    assert_eq!(app.progress.total_answered, 0);
    assert_eq!(app.progress.streak, 0);
    assert!(app.progress.answered_questions.is_empty());
}

#[test]
fn mouse_drag_flow_places_items_and_submits() {
    // Single drag question so the daily pick is deterministic.
    let json = r#"[{
        "id": 1, "category": "architecture", "difficulty": "medium",
        "type": "diagram", "question": "Place the components.",
        "diagram": {"type": "drag-topology",
            "items": [{"id": "producer", "label": "Producer"},
                      {"id": "broker", "label": "Broker"}],
            "zones": [{"id": "writes", "label": "Writes"},
                      {"id": "stores", "label": "Stores"}]},
        "correct": {"writes": "producer", "stores": "broker"},
        "explanation": "e"
    }]"#;
    let bank = Bank::from_json(json).unwrap();
    let dir = TempDir::new().unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let mut app = App::new(
        bank,
        Config::default(),
        Some(store),
        Clock::pinned(day(2026, 8, 7)),
        test_theme(),
    );

    let area = Rect::new(0, 0, 80, 24);
    let QuestionBody::Diagram { spec, .. } = app.active_question().unwrap().body.clone() else {
        unreachable!()
    };

    // Drag producer into the writes zone. The render pass would refresh the
    // hit layout each frame; the test replays that by re-arranging after
    // every placement.
    for (item, zone) in [("producer", "writes"), ("broker", "stores")] {
        let layout = arrange(&spec, &app.session.diagram, area);
        let from = layout.entity_rect(item).unwrap();
        let to = layout.zone_rect(zone).unwrap();
        app.diagram_hit = Some(layout);
        app.pointer_down(from.x + 1, from.y + 1);
        app.pointer_move(to.x + 2, to.y + 1);
        app.pointer_up(to.x + 2, to.y + 1);
        assert_eq!(app.session.diagram.item_in_zone(zone), Some(item));
    }

    // Submit via the button's bounding box.
    let layout = arrange(&spec, &app.session.diagram, area);
    let submit = layout.submit.unwrap();
    app.diagram_hit = Some(layout);
    app.pointer_down(submit.x + 1, submit.y + 1);

    assert_eq!(app.session.diagram.verdict, Some(true));
    assert!(app.session.has_answered);
    assert_eq!(app.progress.total_answered, 1);
    assert_eq!(app.progress.correct_count, 1);
}

#[test]
fn incomplete_drag_placement_cannot_submit() {
    let json = r#"[{
        "id": 1, "category": "architecture", "difficulty": "medium",
        "type": "diagram", "question": "Place the components.",
        "diagram": {"type": "drag-topology",
            "items": [{"id": "a", "label": "A"}, {"id": "b", "label": "B"}],
            "zones": [{"id": "z1", "label": "Z1"}, {"id": "z2", "label": "Z2"}]},
        "correct": {"z1": "a", "z2": "b"},
        "explanation": "e"
    }]"#;
    let bank = Bank::from_json(json).unwrap();
    let mut app = App::new(
        bank,
        Config::default(),
        None,
        Clock::pinned(day(2026, 8, 7)),
        test_theme(),
    );

    // One of two zones filled: submit is rejected preemptively and the
    // checker never runs.
    app.diagram_key_number(1); // pick item "a"
    app.diagram_key_number(1); // drop into zone "z1"
    app.submit_diagram();
    assert_eq!(app.session.diagram.verdict, None);
    assert!(!app.session.has_answered);
    assert_eq!(app.progress.total_answered, 0);
}
