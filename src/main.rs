mod app;
mod config;
mod curriculum;
mod engine;
mod event;
mod speech;
mod store;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use app::{App, Screen};
use config::Config;
use curriculum::conversation::LESSON_PATH;
use curriculum::grammar;
use event::{AppEvent, EventHandler};
use ui::components::flashcard::Flashcard;
use ui::components::lesson_path::LessonPath;
use ui::components::phase_list::PhaseList;
use ui::components::progress_bar::ProgressBar;
use ui::components::script_card::ScriptCard;
use ui::layout::AppLayout;

#[derive(Parser)]
#[command(name = "shekho", version, about = "Terminal Bengali tutor with a guided curriculum")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Speech synthesis endpoint URL")]
    endpoint: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    config.normalize_unlock_policy();
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(endpoint) = cli.endpoint {
        config.tts_endpoint = endpoint;
    }

    let events = EventHandler::new(Duration::from_millis(100));
    let mut app = App::new(config, events.sender());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
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
            AppEvent::Speech(message) => app.on_speech(message),
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
        Screen::Landing => handle_landing_key(app, key),
        Screen::GrammarHome => handle_grammar_home_key(app, key),
        Screen::GrammarUnit => handle_grammar_unit_key(app, key),
        Screen::ConversationList => handle_conversation_list_key(app, key),
        Screen::ConversationLesson => handle_conversation_lesson_key(app, key),
    }
}

fn handle_landing_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('g') => app.go_to_grammar_home(),
        KeyCode::Char('c') => app.go_to_conversation_list(),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => match app.menu.selected {
            0 => app.go_to_grammar_home(),
            1 => app.go_to_conversation_list(),
            _ => {}
        },
        _ => {}
    }
}

fn handle_grammar_home_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_landing(),
        KeyCode::Up | KeyCode::Char('k') => app.home_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.home_next(),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Char(' ') => app.home_activate(),
        _ => {}
    }
}

fn handle_grammar_unit_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('h') => app.go_to_grammar_home(),
        KeyCode::Char(' ') | KeyCode::Enter => app.unit_flip(),
        KeyCode::Char('n') | KeyCode::Right => app.unit_next(),
        KeyCode::Char('p') | KeyCode::Left => app.unit_prev(),
        KeyCode::Char('s') => app.speak_exercise(),
        _ => {}
    }
}

fn handle_conversation_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_landing(),
        KeyCode::Up | KeyCode::Char('k') => app.lesson_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.lesson_next(),
        KeyCode::Enter | KeyCode::Char('l') => app.lesson_activate(),
        _ => {}
    }
}

fn handle_conversation_lesson_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('h') => app.go_to_conversation_list(),
        KeyCode::Char('t') => app.flip_script(),
        KeyCode::Char(' ') | KeyCode::Enter => app.flip_vocab(),
        KeyCode::Char('n') | KeyCode::Right => app.vocab_next(),
        KeyCode::Char('p') | KeyCode::Left => app.vocab_prev(),
        KeyCode::Char('s') => app.speak_vocab(),
        KeyCode::Char('a') => app.speak_scenario(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        Screen::Landing => render_landing(frame, app),
        Screen::GrammarHome => render_grammar_home(frame, app),
        Screen::GrammarUnit => render_grammar_unit(frame, app),
        Screen::ConversationList => render_conversation_list(frame, app),
        Screen::ConversationLesson => render_conversation_lesson(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, info: &str) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " shekho ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info.to_string(),
            Style::default().fg(colors.text_dim()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, hints: &str) {
    let colors = &app.theme.colors;
    let line = match &app.notice {
        Some(notice) => Line::from(vec![
            Span::styled(format!(" ⚠ {notice}  "), Style::default().fg(colors.error())),
            Span::styled(hints.to_string(), Style::default().fg(colors.text_dim())),
        ]),
        None => Line::from(Span::styled(
            hints.to_string(),
            Style::default().fg(colors.text_dim()),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_landing(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let done = app.progress.completed().len();
    let total = grammar::units().count();
    render_header(frame, app, layout[0], &format!(" {done}/{total} modules complete"));

    let menu_area = ui::layout::centered_rect(50, 80, layout[1]);
    frame.render_widget(&app.menu, menu_area);

    render_footer(frame, app, layout[2], " [g/c] Choose a track  [j/k] Move  [Enter] Open  [q] Quit ");
}

fn render_grammar_home(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let app_layout = AppLayout::new(area);

    let focus = app.progress.focus();
    let focus_info = match focus.module_title() {
        Some(title) if !app.progress.all_done() => format!(" Grammar Path | next: {title}"),
        _ => " Grammar Path | every module complete".to_string(),
    };
    render_header(frame, app, app_layout.header, &focus_info);

    let list = PhaseList {
        rows: &app.home_rows,
        selected: app.home_selected,
        progress: &app.progress,
        policy: app.policy,
        expanded: &app.expanded_phases,
        theme: app.theme,
    };
    frame.render_widget(&list, app_layout.main);

    render_footer(
        frame,
        app,
        app_layout.footer,
        " [Enter] Open/expand  [j/k] Move  [Esc] Back   ✓ done  → next  · locked ",
    );
}

fn render_grammar_unit(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let app_layout = AppLayout::new(area);
    let tier = app_layout.tier;

    let Some(key) = app.active_unit else { return };
    let breadcrumb = format!(
        " Phase {} > Module {} | {}",
        key.phase + 1,
        key.module + 1,
        key.short_title().unwrap_or("?"),
    );
    render_header(frame, app, app_layout.header, &breadcrumb);

    let content = match app.grammar.module(key) {
        Ok(content) => content,
        Err(_) => {
            // Graceful empty state: the curriculum lists this module but no
            // exercises shipped for it yet.
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Content for this module is on its way.",
                    Style::default().fg(colors.text_dim()),
                )),
            ])
            .alignment(ratatui::layout::Alignment::Center);
            frame.render_widget(empty, app_layout.main);
            render_footer(frame, app, app_layout.footer, " [Esc] Home ");
            return;
        }
    };

    let Some(cursor) = app.drill.as_ref() else { return };
    let Some(item) = cursor.current(content) else {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No exercises in this module yet.",
            Style::default().fg(colors.text_dim()),
        )))
        .alignment(ratatui::layout::Alignment::Center);
        frame.render_widget(empty, app_layout.main);
        render_footer(frame, app, app_layout.footer, " [Esc] Home ");
        return;
    };

    let show_hint = tier.show_hint(area.height);
    let show_progress = tier.show_progress_bar(area.height);

    let mut constraints: Vec<Constraint> = vec![Constraint::Length(1)];
    if show_hint {
        constraints.push(Constraint::Length(4));
    }
    constraints.push(Constraint::Min(9));
    if show_progress {
        constraints.push(Constraint::Length(3));
    }
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(app_layout.main);

    let section = if cursor.extended {
        "Extended Vocabulary"
    } else {
        "Vocabulary & Phonics"
    };
    let sub_header = Paragraph::new(Line::from(Span::styled(
        format!(" {section}"),
        Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(sub_header, main_layout[0]);

    let mut idx = 1;
    if show_hint {
        if let Some(hint) = content.hint_for(cursor.index, cursor.extended) {
            let hint_text = Paragraph::new(Line::from(Span::styled(
                hint.to_string(),
                Style::default().fg(colors.text_dim()),
            )))
            .wrap(Wrap { trim: true });
            frame.render_widget(hint_text, main_layout[idx]);
        }
        idx += 1;
    }

    let card_area = ui::layout::centered_rect(60, 90, main_layout[idx]);
    let card = Flashcard::from_exercise(item, cursor.revealed, app.speech.is_busy(), app.theme);
    frame.render_widget(&card, card_area);
    idx += 1;

    if show_progress {
        let (position, total) = cursor.position(content);
        let bar = ProgressBar::new(section, position, total, app.theme);
        frame.render_widget(bar, main_layout[idx]);
    }

    let forward = if cursor.is_last(content) { "[n] Finish" } else { "[n] Next" };
    render_footer(
        frame,
        app,
        app_layout.footer,
        &format!(" [space] Flip  {forward}  [p] Back  [s] Listen  [Esc] Home "),
    );
}

fn render_conversation_list(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let app_layout = AppLayout::new(area);

    render_header(frame, app, app_layout.header, " Conversation Mode | master conversational Bengali");

    let path = LessonPath {
        selected: app.lesson_selected,
        theme: app.theme,
    };
    let path_area = ui::layout::centered_rect(60, 90, app_layout.main);
    frame.render_widget(&path, path_area);

    render_footer(frame, app, app_layout.footer, " [Enter] Open lesson  [j/k] Move  [Esc] Back ");
}

fn render_conversation_lesson(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let app_layout = AppLayout::new(area);
    let tier = app_layout.tier;

    let Some(id) = app.active_lesson else { return };
    let title = LESSON_PATH
        .iter()
        .find(|l| l.id == id)
        .map_or("Lesson", |l| l.title);
    render_header(frame, app, app_layout.header, &format!(" Lesson {id}: {title}"));

    let lesson = match app.conversations.lesson(id) {
        Ok(lesson) => lesson,
        Err(_) => {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Lesson content not found.",
                    Style::default().fg(colors.text_dim()),
                )),
            ])
            .alignment(ratatui::layout::Alignment::Center);
            frame.render_widget(empty, app_layout.main);
            render_footer(frame, app, app_layout.footer, " [Esc] Lessons ");
            return;
        }
    };

    let Some(cursor) = app.dialogue.as_ref() else { return };
    let Some(scenario) = cursor.current_scenario(lesson) else { return };

    let show_notes = tier.show_notes(area.height) && scenario.note.is_some();
    let script_height = (scenario.dialogue.len() as u16) * 2 + 4;

    let mut constraints: Vec<Constraint> = vec![
        Constraint::Length(script_height),
        Constraint::Length(1),
        Constraint::Min(9),
    ];
    if show_notes {
        constraints.push(Constraint::Length(
            scenario.note.as_ref().map_or(0, |n| n.points.len() as u16) + 2,
        ));
    }
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(app_layout.main);

    let script = ScriptCard {
        scenario,
        revealed: cursor.script_revealed,
        busy: app.speech.is_busy(),
        theme: app.theme,
    };
    frame.render_widget(&script, main_layout[0]);

    let vocab_count = scenario.vocabulary.len();
    let vocab_header = Paragraph::new(Line::from(Span::styled(
        format!(
            " Vocabulary Breakdown {} / {} (scenario {} of {})",
            (cursor.vocab + 1).min(vocab_count),
            vocab_count,
            cursor.scenario + 1,
            lesson.scenarios.len(),
        ),
        Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(vocab_header, main_layout[1]);

    if let Some(item) = cursor.current_vocab(lesson) {
        let card_area = ui::layout::centered_rect(50, 90, main_layout[2]);
        let card = Flashcard::from_vocab(item, cursor.vocab_revealed, app.speech.is_busy(), app.theme);
        frame.render_widget(&card, card_area);
    }

    if show_notes {
        if let Some(note) = &scenario.note {
            let mut lines = Vec::new();
            for point in &note.points {
                lines.push(Line::from(Span::styled(
                    format!("• {point}"),
                    Style::default().fg(colors.text_dim()),
                )));
            }
            let notes = Paragraph::new(lines)
                .block(
                    Block::bordered()
                        .title(format!(" {} ", note.title))
                        .border_style(Style::default().fg(colors.border())),
                )
                .wrap(Wrap { trim: true });
            frame.render_widget(notes, main_layout[3]);
        }
    }

    let forward = if cursor.is_last_vocab(lesson) {
        if cursor.is_last_scenario(lesson) {
            "[n] Finish Lesson"
        } else {
            "[n] Next Conversation"
        }
    } else {
        "[n] Next"
    };
    render_footer(
        frame,
        app,
        app_layout.footer,
        &format!(" [space] Flip  {forward}  [p] Back  [t] Script  [s] Listen  [a] Play  [Esc] Lessons "),
    );
}
