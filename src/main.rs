mod app;
mod bank;
mod config;
mod engine;
mod event;
mod selector;
mod session;
mod store;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use app::{App, AppScreen};
use bank::{Bank, Question, QuestionBody};
use config::Config;
use engine::diagram::Interaction;
use event::{AppEvent, EventHandler};
use selector::Clock;
use session::state::AnswerMode;
use ui::components::diagram_view::DiagramWidget;
use ui::components::feedback::Feedback;
use ui::components::flashcard::Flashcard;
use ui::components::options_list::OptionsList;
use ui::components::practice_list::PracticeList;
use ui::components::question_header::QuestionHeader;
use ui::components::stats_cards::StatsCards;
use ui::layout::AppLayout;

#[derive(Parser)]
#[command(name = "quizdr", version, about = "Terminal daily quiz trainer with interactive diagrams")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Path to a custom question bank (JSON)")]
    bank: Option<PathBuf>,

    #[arg(long, help = "Start in browse mode")]
    browse: bool,

    #[arg(long, help = "Pin the clock to a date (YYYY-MM-DD)")]
    date: Option<NaiveDate>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    config.normalize_default_mode();
    if let Some(theme_name) = cli.theme {
        config.theme = theme_name;
    }

    // Bank problems are fatal for the session and reported once, before the
    // terminal is touched.
    let bank = match cli
        .bank
        .as_deref()
        .or(config.bank_path.as_deref().map(std::path::Path::new))
    {
        Some(path) => Bank::from_file(path)
            .with_context(|| format!("loading question bank from {}", path.display()))?,
        None => Bank::bundled().context("loading bundled question bank")?,
    };

    let clock = match cli.date {
        Some(date) => Clock::pinned(date),
        None => Clock::system(),
    };

    let theme: &'static ui::theme::Theme =
        Box::leak(Box::new(ui::theme::Theme::load(&config.theme).unwrap_or_default()));

    let store = store::json_store::JsonStore::new().ok();
    let mut app = App::new(bank, config, store, clock, theme);
    if cli.browse {
        app.enter_browse();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
            AppEvent::Tick => {}
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Daily => handle_daily_key(app, key),
        AppScreen::Browse => handle_browse_key(app, key),
        AppScreen::PracticeList => handle_practice_list_key(app, key),
        AppScreen::Practice => handle_practice_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_answer_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(ch @ '1'..='9') => {
            let number = (ch as u8 - b'0') as usize;
            if app.is_diagram_active() {
                app.diagram_key_number(number);
            } else {
                app.select_option(number - 1);
            }
            true
        }
        KeyCode::Char('m') => {
            app.toggle_mode();
            true
        }
        KeyCode::Char('r') => {
            app.reveal_flashcard();
            true
        }
        KeyCode::Char('s') | KeyCode::Enter => {
            app.submit_diagram();
            true
        }
        _ => false,
    }
}

fn handle_daily_key(app: &mut App, key: KeyEvent) {
    if handle_answer_key(app, key) {
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('b') => app.enter_browse(),
        KeyCode::Char('l') => app.go_practice_list(),
        KeyCode::Char('c') => app.go_to_settings(),
        _ => {}
    }
}

fn handle_browse_key(app: &mut App, key: KeyEvent) {
    if handle_answer_key(app, key) {
        return;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('d') => app.go_daily(),
        KeyCode::Left | KeyCode::Char('p') => app.browse_prev(),
        KeyCode::Right | KeyCode::Char('n') => app.browse_next(),
        KeyCode::Home | KeyCode::Char('g') => app.browse_jump(0),
        KeyCode::End | KeyCode::Char('G') => app.browse_jump(i64::MAX),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn handle_practice_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_daily(),
        KeyCode::Down | KeyCode::Char('j') => app.practice_next(),
        KeyCode::Up | KeyCode::Char('k') => app.practice_prev(),
        KeyCode::Enter => app.open_practice(),
        _ => {}
    }
}

fn handle_practice_key(app: &mut App, key: KeyEvent) {
    if handle_answer_key(app, key) {
        return;
    }
    match key.code {
        KeyCode::Esc => app.close_practice(),
        KeyCode::Char('q') => app.go_daily(),
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            let _ = app.config.save();
            app.go_daily();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.settings_selected = app.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.settings_selected = (app.settings_selected + 1).min(1);
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.settings_cycle_forward(),
        KeyCode::Left | KeyCode::Char('h') => app.settings_cycle_backward(),
        _ => {}
    }
}

/// Thin adapter from crossterm mouse events to the engine's pointer model.
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if !matches!(
        app.screen,
        AppScreen::Daily | AppScreen::Browse | AppScreen::Practice
    ) {
        return;
    }
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.pointer_down(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.pointer_move(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.pointer_up(mouse.column, mouse.row),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &mut App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Daily | AppScreen::Browse | AppScreen::Practice => {
            render_question_screen(frame, app)
        }
        AppScreen::PracticeList => render_practice_list(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }
}

fn header_line(app: &App) -> String {
    match app.screen {
        AppScreen::Daily => format!(
            " Daily Question | Day {} of 365 | {} day streak",
            selector::day_of_year(app.clock.today_local()),
            app.progress.streak,
        ),
        AppScreen::Browse => format!(
            " Browse | Question {} of {}",
            app.browse_index + 1,
            app.bank.len(),
        ),
        AppScreen::Practice => " Practice | no-stakes run".to_string(),
        _ => String::new(),
    }
}

fn footer_line(app: &App, question: &Question) -> String {
    let answer_hint = match &question.body {
        QuestionBody::Text { .. } => match app.session.mode {
            AnswerMode::Quiz => "[1-9] Answer  [m] Flashcard",
            AnswerMode::Flashcard => "[r] Reveal  [m] Quiz",
        },
        QuestionBody::Diagram { spec, .. } => match spec.interaction() {
            Interaction::Click {
                multi_select: false,
            } => "[1-9] or click a node",
            Interaction::Click { multi_select: true } => "[1-9] Toggle  [s] Submit",
            Interaction::Drag => "[1-9] Pick item, then zone  [s] Submit",
        },
    };
    match app.screen {
        AppScreen::Daily => format!(" {answer_hint}  [b] Browse  [l] List  [c] Settings  [q] Quit "),
        AppScreen::Browse => format!(" {answer_hint}  [<-/->] Navigate  [d] Daily  [q] Quit "),
        AppScreen::Practice => format!(" {answer_hint}  [ESC] Back to list "),
        _ => String::new(),
    }
}

fn render_question_screen(frame: &mut ratatui::Frame, app: &mut App) {
    app.option_hits.clear();
    app.reveal_hit = None;
    app.diagram_hit = None;

    let Some(question) = app.active_question().cloned() else {
        return;
    };

    let area = frame.area();
    let colors = &app.theme.colors;
    let app_layout = AppLayout::new(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " quizdr ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            header_line(app),
            Style::default()
                .fg(colors.text_muted())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, app_layout.header);

    let mut card_area = app_layout.main;
    if !app_layout.tier.show_sidebar() && app_layout.tier.show_stats_strip(area.height) {
        let strip = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(8)])
            .split(app_layout.main);
        frame.render_widget(StatsCards::new(&app.progress, app.theme), strip[0]);
        card_area = strip[1];
    }

    if let Some(sidebar) = app_layout.sidebar {
        let sidebar_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(12), Constraint::Min(0)])
            .split(sidebar);
        frame.render_widget(StatsCards::new(&app.progress, app.theme), sidebar_layout[0]);
    }

    let card = Block::bordered()
        .border_style(Style::default().fg(colors.border_focused()))
        .style(Style::default().bg(colors.bg()));
    let inner = card.inner(card_area);
    frame.render_widget(card, card_area);

    let header_height = QuestionHeader::height(&question, inner.width).min(inner.height);
    let header_area = Rect::new(inner.x, inner.y, inner.width, header_height);
    let mut question_header = QuestionHeader::new(&question, app.theme);
    match app.screen {
        AppScreen::Daily => {
            question_header =
                question_header.day_of_year(selector::day_of_year(app.clock.today_local()));
        }
        AppScreen::Browse => {
            question_header = question_header.position(app.browse_index, app.bank.len());
        }
        _ => {}
    }
    frame.render_widget(question_header, header_area);

    let body = Rect::new(
        inner.x,
        inner.y + header_height + 1,
        inner.width,
        inner.height.saturating_sub(header_height + 1),
    );
    if body.height == 0 {
        return;
    }

    match &question.body {
        QuestionBody::Text { options, correct } => match app.session.mode {
            AnswerMode::Quiz => {
                let option_rows_height = (options.len() as u16 * 2).min(body.height);
                let options_area = Rect::new(body.x, body.y, body.width, option_rows_height);
                app.option_hits = OptionsList::rows(options_area, options.len());
                frame.render_widget(
                    OptionsList::new(
                        options,
                        *correct,
                        app.session.selected_option,
                        app.session.has_answered,
                        app.theme,
                    ),
                    options_area,
                );

                let feedback_area = Rect::new(
                    body.x,
                    body.y + option_rows_height + 1,
                    body.width,
                    body.height.saturating_sub(option_rows_height + 1),
                );
                frame.render_widget(
                    Feedback::new(
                        app.active_verdict(),
                        &question.explanation,
                        question.docs_link.as_deref(),
                        "Pick the best answer.",
                        app.theme,
                    ),
                    feedback_area,
                );
            }
            AnswerMode::Flashcard => {
                let revealed = app.session.has_answered;
                if !revealed {
                    app.reveal_hit = Some(Flashcard::reveal_rect(body));
                }
                frame.render_widget(
                    Flashcard::new(
                        &options[*correct],
                        &question.explanation,
                        question.docs_link.as_deref(),
                        revealed,
                        app.theme,
                    ),
                    body,
                );
            }
        },
        QuestionBody::Diagram { spec, answer } => {
            let feedback_height = 5.min(body.height / 2);
            let diagram_area = Rect::new(
                body.x,
                body.y,
                body.width,
                body.height.saturating_sub(feedback_height + 1),
            );
            let diagram_layout = engine::layout::arrange(spec, &app.session.diagram, diagram_area);
            let view = engine::render::describe(spec, &app.session.diagram, answer, &diagram_layout);
            app.diagram_hit = Some(diagram_layout);
            frame.render_widget(DiagramWidget::new(&view, app.theme), diagram_area);

            let hint = match spec.interaction() {
                Interaction::Click {
                    multi_select: false,
                } => "Click the right node to answer.",
                Interaction::Click { multi_select: true } => {
                    "Select every node that applies, then submit."
                }
                Interaction::Drag => "Drag each item into a zone, then submit.",
            };
            let feedback_area = Rect::new(
                body.x,
                body.y + body.height.saturating_sub(feedback_height),
                body.width,
                feedback_height,
            );
            frame.render_widget(
                Feedback::new(
                    app.active_verdict(),
                    &question.explanation,
                    question.docs_link.as_deref(),
                    hint,
                    app.theme,
                ),
                feedback_area,
            );
        }
    }

    let footer = Paragraph::new(Line::from(Span::styled(
        footer_line(app, &question),
        Style::default().fg(colors.text_muted()),
    )));
    frame.render_widget(footer, app_layout.footer);
}

fn render_practice_list(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Paragraph::new(Line::from(Span::styled(
        format!(
            " quizdr | {} questions | {} answered ",
            app.bank.len(),
            app.progress.answered_questions.len(),
        ),
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout[0]);

    frame.render_widget(
        PracticeList::new(&app.bank, &app.progress, app.practice_selected, app.theme),
        layout[1],
    );

    let footer = Paragraph::new(Line::from(Span::styled(
        " [j/k] Move  [Enter] Practice  [ESC] Back ",
        Style::default().fg(colors.text_muted()),
    )));
    frame.render_widget(footer, layout[2]);
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = ui::layout::centered_rect(50, 50, area);

    let block = Block::bordered()
        .title(" Settings ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let fields: Vec<(&str, String)> = vec![
        ("Theme", app.config.theme.clone()),
        ("Default Mode", app.config.default_mode.clone()),
    ];

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(fields.len() as u16 * 3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    let header = Paragraph::new(Line::from(Span::styled(
        "  Use arrows to navigate, Enter/Right to change, ESC to save & exit",
        Style::default().fg(colors.text_muted()),
    )));
    header.render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
        .split(layout[1]);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_style = Style::default()
            .fg(if is_selected {
                colors.accent()
            } else {
                colors.fg()
            })
            .add_modifier(if is_selected {
                Modifier::BOLD
            } else {
                Modifier::empty()
            });
        let value_style = Style::default().fg(if is_selected {
            colors.selected()
        } else {
            colors.text_muted()
        });

        let lines = vec![
            Line::from(Span::styled(format!("{indicator}{label}:"), label_style)),
            Line::from(Span::styled(format!("  < {value} >"), value_style)),
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    let footer = Paragraph::new(Line::from(Span::styled(
        "  [ESC] Save & back  [Enter/arrows] Change value",
        Style::default().fg(colors.accent()),
    )));
    footer.render(layout[3], frame.buffer_mut());
}
