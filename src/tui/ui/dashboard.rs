//! Dashboard view: Main overview screen.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::{Locale, Verdict};
use crate::tui::styles::{MedicalTheme, LOGO_SMALL};

/// Dashboard state for rendering.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub model_loaded: bool,
    pub model_members: usize,
    /// First characters of the artifact digest
    pub model_digest: String,
    pub chat_configured: bool,
    pub assessment_count: usize,
    pub chat_turns: usize,
    /// Verdict of the most recent analysis, without its probability.
    pub last_verdict: Option<Verdict>,
}

/// Render the main dashboard view.
pub fn render_dashboard(f: &mut Frame, area: Rect, state: &DashboardState, locale: Locale) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    render_header(f, chunks[0], locale);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    render_status_panels(f, columns[0], state, locale);
    render_about(f, columns[1], state, locale);
}

fn render_header(f: &mut Frame, area: Rect, locale: Locale) {
    let text = locale.text();
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled(LOGO_SMALL, MedicalTheme::heart()),
        Span::styled(" │ ", MedicalTheme::text_muted()),
        Span::styled(text.app_subtitle, MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_status_panels(f: &mut Frame, area: Rect, state: &DashboardState, locale: Locale) {
    let text = locale.text();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(0)])
        .margin(1)
        .split(area);

    let mut model_line = format_status_item(text.model_loaded, state.model_loaded);
    if state.model_loaded {
        model_line.spans.push(Span::styled(
            format!(" ({}×, {})", state.model_members, state.model_digest),
            MedicalTheme::text_muted(),
        ));
    }

    let status_items = vec![
        model_line,
        format_status_item(text.chat_configured, state.chat_configured),
        Line::from(vec![
            Span::styled(format!("  {}: ", text.assessments), MedicalTheme::text_secondary()),
            Span::styled(state.assessment_count.to_string(), MedicalTheme::text()),
        ]),
        Line::from(vec![
            Span::styled(format!("  {}: ", text.chat_turns), MedicalTheme::text_secondary()),
            Span::styled(state.chat_turns.to_string(), MedicalTheme::text()),
        ]),
    ];

    let status_block = Block::default()
        .title(Span::styled(text.status_title, MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    f.render_widget(Paragraph::new(status_items).block(status_block), chunks[0]);

    let actions = vec![
        action_line("[N] ", text.new_assessment),
        action_line("[C] ", text.open_chat),
        action_line("[Q] ", text.quit),
    ];
    let actions_block = Block::default()
        .title(Span::styled(text.actions_title, MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    f.render_widget(Paragraph::new(actions).block(actions_block), chunks[1]);
}

fn action_line(key: &'static str, label: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(key, MedicalTheme::key_hint()),
        Span::styled(label, MedicalTheme::key_desc()),
    ])
}

fn format_status_item(label: &str, ok: bool) -> Line<'static> {
    let (icon, style) = if ok {
        ("OK", MedicalTheme::success())
    } else {
        ("--", MedicalTheme::warning())
    };

    Line::from(vec![
        Span::styled(format!("  {icon} "), style),
        Span::styled(label.to_string(), MedicalTheme::text()),
    ])
}

fn render_about(f: &mut Frame, area: Rect, state: &DashboardState, locale: Locale) {
    let text = locale.text();
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", text.app_title),
            MedicalTheme::subtitle(),
        ))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let mut lines = vec![
        Line::from(Span::styled(text.about, MedicalTheme::text())),
        Line::from(""),
    ];

    if let Some(verdict) = state.last_verdict {
        lines.push(Line::from(vec![
            Span::styled("♥ ", MedicalTheme::heart()),
            Span::styled(verdict.message(locale), MedicalTheme::verdict(verdict)),
        ]));
    }

    let p = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(p, area);
}
