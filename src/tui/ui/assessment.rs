//! Assessment view: probability and verdict for the last analysis.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{Locale, Prediction, Verdict};
use crate::tui::styles::MedicalTheme;

/// Assessment state
#[derive(Debug, Clone, Default)]
pub enum AssessmentState {
    /// Nothing analyzed yet
    #[default]
    Idle,
    /// Scored successfully
    Complete { prediction: Prediction },
    /// Scoring failed; the form can be resubmitted
    Error { message: String },
}

/// Render the assessment screen
pub fn render_assessment(f: &mut Frame, area: Rect, state: &AssessmentState, locale: Locale) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_assessment_header(f, chunks[0], locale);
    match state {
        AssessmentState::Idle => render_idle(f, chunks[1], locale),
        AssessmentState::Complete { prediction } => {
            render_result(f, chunks[1], prediction, locale);
        }
        AssessmentState::Error { message } => render_error(f, chunks[1], message, locale),
    }
    render_assessment_footer(f, chunks[2], state, locale);
}

fn render_assessment_header(f: &mut Frame, area: Rect, locale: Locale) {
    let text = locale.text();
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled(text.assessment_title, MedicalTheme::title()),
        Span::styled(format!(" │ {}", text.app_title), MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_idle(f: &mut Frame, area: Rect, locale: Locale) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            locale.text().about,
            MedicalTheme::text_secondary(),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_result(f: &mut Frame, area: Rect, prediction: &Prediction, locale: Locale) {
    let text = locale.text();
    let verdict = prediction.verdict();
    let style = MedicalTheme::verdict(verdict);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", text.assessment_title),
            MedicalTheme::subtitle(),
        ))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Probability value
            Constraint::Length(3), // Gauge
            Constraint::Length(3), // Verdict
            Constraint::Min(0),
        ])
        .margin(1)
        .split(inner);

    let value = Paragraph::new(Line::from(vec![
        Span::styled(format!("{} ", text.probability_label), MedicalTheme::text_secondary()),
        Span::styled(prediction.rounded().to_string(), MedicalTheme::title()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(value, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(style)
        .ratio(prediction.probability.clamp(0.0, 1.0))
        .label(format!("{:.1}%", prediction.probability * 100.0));
    f.render_widget(gauge, chunks[1]);

    let icon = match verdict {
        Verdict::Likely => "♥ !",
        Verdict::Unlikely => "♥ OK",
    };
    let message = Paragraph::new(Line::from(vec![
        Span::styled(format!("{icon} "), style.add_modifier(Modifier::BOLD)),
        Span::styled(verdict.message(locale), style),
    ]))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(message, chunks[2]);
}

fn render_error(f: &mut Frame, area: Rect, message: &str, locale: Locale) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("! {}", locale.text().prediction_error),
            MedicalTheme::danger(),
        )),
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::text())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}

fn render_assessment_footer(f: &mut Frame, area: Rect, state: &AssessmentState, locale: Locale) {
    let text = locale.text();
    let content = match state {
        AssessmentState::Error { .. } => Line::from(vec![
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled(format!("{} ", text.edit_values), MedicalTheme::key_desc()),
            Span::styled("[R] ", MedicalTheme::key_hint()),
            Span::styled(format!("{} ", text.retry), MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled(text.back, MedicalTheme::key_desc()),
        ]),
        _ => Line::from(vec![
            Span::styled("[N] ", MedicalTheme::key_hint()),
            Span::styled(format!("{} ", text.new_assessment), MedicalTheme::key_desc()),
            Span::styled("[C] ", MedicalTheme::key_hint()),
            Span::styled(format!("{} ", text.open_chat), MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled(text.back, MedicalTheme::key_desc()),
        ]),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
