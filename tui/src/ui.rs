//! Rendering for the HealthLens TUI.
//!
//! All text and visibility decisions come from `healthlens_core::view`;
//! this module only lays out blocks and maps tones to colors.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use healthlens_contracts::{chat::Role, prediction::Disease};
use healthlens_core::{
    prediction::FormField,
    view::{chat_view, prediction_view, MoodTone, ResultView, Tone, TranscriptEntry, TurnView, COMPOSING_LABEL},
};

use crate::app::{App, Tab};

const SPINNER: [&str; 4] = ["⠋", "⠙", "⠹", "⠸"];

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Danger => Color::Red,
        Tone::Warning => Color::Yellow,
        Tone::Success => Color::Green,
    }
}

fn mood_color(tone: MoodTone) -> Color {
    match tone {
        MoodTone::Positive => Color::Green,
        MoodTone::Negative => Color::LightRed,
        MoodTone::Neutral => Color::Yellow,
    }
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))
}

pub fn ui(f: &mut Frame, app: &App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(10),   // active tab
            Constraint::Length(3), // footer
        ])
        .split(f.area());

    render_header(f, outer[0], app);
    match app.tab {
        Tab::Predict => render_prediction(f, outer[1], app),
        Tab::Chat => render_chat(f, outer[1], app),
    }
    render_footer(f, outer[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let title_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut spans: Vec<Span> = vec![Span::styled("HealthLens    ", title_style)];

    for (key, tab) in [("[F1]", Tab::Predict), ("[F2]", Tab::Chat)] {
        let style = if app.tab == tab {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("{} {}  ", key, tab.title()), style));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(header, area);
}

// ── Prediction tab ────────────────────────────────────────────────────────────

fn render_prediction(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(5)])
        .split(area);

    render_form(f, chunks[0], app);
    render_result(f, chunks[1], app);
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let form = app.prediction.form();
    let view = prediction_view(&app.prediction);
    let focused = app.focused_field();

    let mut lines: Vec<Line> = Vec::new();
    for field in FormField::ALL {
        let is_focused = field == focused;
        let marker = if is_focused { "▶ " } else { "  " };
        let label_style = if is_focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let value = match field {
            FormField::Disease => {
                let name = Disease::from(form.disease.as_str()).display_name().to_string();
                Span::styled(format!("◀ {} ▶", name), Style::default().fg(Color::White))
            }
            _ => {
                let raw = form.get(field);
                if raw.is_empty() && !is_focused {
                    Span::styled(field.placeholder(), Style::default().fg(Color::DarkGray))
                } else {
                    let cursor = if is_focused { "▏" } else { "" };
                    Span::styled(format!("{}{}", raw, cursor), Style::default().fg(Color::White))
                }
            }
        };

        lines.push(Line::from(vec![
            Span::styled(marker, label_style),
            Span::styled(format!("{:<28}", field.label()), label_style),
            value,
        ]));
    }

    lines.push(Line::from(""));
    let button_style = if view.submit_enabled {
        Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut button = vec![Span::styled(format!(" {} ", view.submit_label), button_style)];
    if app.prediction.is_pending() {
        button.push(Span::raw(format!("  {}", SPINNER[app.tick % SPINNER.len()])));
    }
    lines.push(Line::from(button));

    if let Some(error) = &view.error {
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))));
    }

    f.render_widget(Paragraph::new(lines).block(panel("Health Parameters")), area);
}

fn render_result(f: &mut Frame, area: Rect, app: &App) {
    let view = prediction_view(&app.prediction);
    let Some(result) = view.result else {
        let hint = Paragraph::new(Span::styled(
            "Fill in the form and press Enter to estimate risk.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(panel("Prediction Result"));
        f.render_widget(hint, area);
        return;
    };

    let lines = result_lines(&result);
    let widget = Paragraph::new(lines)
        .block(panel("Prediction Result"))
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn result_lines(result: &ResultView) -> Vec<Line<'static>> {
    let key = Style::default().fg(Color::Gray);
    let tone = Style::default()
        .fg(tone_color(result.tone))
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(vec![Span::styled("Disease:     ", key), Span::raw(result.disease.clone())]),
        Line::from(vec![Span::styled("Risk Score:  ", key), Span::styled(result.risk_score.clone(), tone)]),
        Line::from(vec![Span::styled("Risk Level:  ", key), Span::styled(result.risk_label.clone(), tone)]),
    ];

    if !result.explanation.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Top contributing factors",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for row in &result.explanation {
            lines.push(Line::from(vec![
                Span::raw(format!("  {}: ", row.feature)),
                Span::raw(format!("value {} ", row.value)),
                Span::styled(format!("(SHAP: {})", row.shap), Style::default().fg(Color::Cyan)),
            ]));
        }
    }

    if let Some(advice) = &result.advice {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Preventive Advice (AI-generated)",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for line in advice.lines() {
            lines.push(Line::from(format!("  {}", line)));
        }
    }
    lines
}

// ── Chat tab ──────────────────────────────────────────────────────────────────

fn render_chat(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    let view = chat_view(&app.chat);

    let mut lines: Vec<Line> = Vec::new();
    for entry in &view.entries {
        match entry {
            TranscriptEntry::Turn(turn) => push_turn(&mut lines, turn),
            TranscriptEntry::Composing => lines.push(Line::from(Span::styled(
                format!("{} {}", SPINNER[app.tick % SPINNER.len()], COMPOSING_LABEL),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ))),
        }
    }

    let transcript = Paragraph::new(lines).wrap(Wrap { trim: false });

    // Keep the newest rows in view. Scroll is counted in wrapped rows.
    let inner_width = chunks[0].width.saturating_sub(2);
    let inner_height = chunks[0].height.saturating_sub(2) as usize;
    let rows = transcript.line_count(inner_width);
    let scroll = rows.saturating_sub(inner_height) as u16;
    let transcript = transcript.block(panel("MannMitra")).scroll((scroll, 0));
    f.render_widget(transcript, chunks[0]);

    let input_style = if view.send_enabled {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let input = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Cyan)),
        Span::styled(format!("{}▏", view.draft), input_style),
    ]))
    .block(panel("Share what's on your mind..."));
    f.render_widget(input, chunks[1]);
}

fn push_turn(lines: &mut Vec<Line>, turn: &TurnView) {
    let (speaker, color) = match turn.role {
        Role::User => ("You", Color::Cyan),
        Role::Assistant => ("MannMitra", Color::Magenta),
    };
    lines.push(Line::from(vec![
        Span::styled(format!("[{}] ", turn.time), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{}: ", speaker), Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw(turn.content.clone()),
    ]));

    if let Some(badge) = &turn.badge {
        let mut spans = vec![
            Span::raw("        Detected mood: "),
            Span::styled(badge.label, Style::default().fg(mood_color(badge.tone))),
        ];
        if let Some(confidence) = &badge.confidence {
            spans.push(Span::styled(
                format!(" {}", confidence),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(spans));
    }
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let key = Style::default().fg(Color::Cyan);
    let mut spans: Vec<Span> = vec![
        Span::styled(" [F1/F2] ", key),
        Span::raw("Switch  "),
        Span::styled("[Enter] ", key),
    ];

    match app.tab {
        Tab::Predict => {
            spans.push(Span::raw("Predict  "));
            spans.push(Span::styled("[Tab] ", key));
            spans.push(Span::raw("Next field  "));
            spans.push(Span::styled("[←/→] ", key));
            spans.push(Span::raw("Disease  "));
            spans.push(Span::styled("[Ctrl-R] ", key));
            spans.push(Span::raw("Reset  "));
        }
        Tab::Chat => spans.push(Span::raw("Send  ")),
    }

    spans.push(Span::styled("[Esc] ", key));
    spans.push(Span::raw("Quit"));

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(footer, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    use super::ui;
    use crate::app::App;

    fn draw(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn send_chat(app: &mut App, text: &str) {
        app.handle_key(KeyEvent::new(KeyCode::F(2), KeyModifiers::NONE));
        for c in text.chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    }

    #[test]
    fn composing_indicator_stays_visible_under_wrapped_turns() {
        let mut app = App::new();
        let long = "I have not been sleeping well and work keeps piling up. ".repeat(7);
        send_chat(&mut app, long.trim());
        assert!(app.chat.is_pending());

        let screen = draw(&app, 60, 20);

        assert!(
            screen.contains("MannMitra is thinking"),
            "composing indicator scrolled out of view"
        );
    }

    #[test]
    fn short_transcript_shows_greeting_from_the_top() {
        let mut app = App::new();
        send_chat(&mut app, "hello");

        let screen = draw(&app, 80, 30);

        assert!(screen.contains("Namaste!"));
        assert!(screen.contains("MannMitra is thinking"));
    }
}
