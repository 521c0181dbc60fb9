//! Chat view: transcript plus a single-line prompt input.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::{ChatTranscript, Locale, Role};
use crate::tui::styles::MedicalTheme;

/// Chat screen state. The transcript itself lives in `App`.
#[derive(Debug, Default)]
pub struct ChatState {
    pub input: String,
    /// A request is in flight; input is ignored until it resolves.
    pub waiting: bool,
    /// Lines scrolled up from the bottom of the transcript
    pub scroll_back: u16,
}

impl ChatState {
    pub fn input_char(&mut self, c: char) {
        if !self.waiting {
            self.input.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        if !self.waiting {
            self.input.pop();
        }
    }

    /// Take the trimmed prompt out of the input buffer, if there is one to send.
    pub fn take_prompt(&mut self) -> Option<String> {
        if self.waiting || self.input.trim().is_empty() {
            return None;
        }
        let prompt = self.input.trim().to_string();
        self.input.clear();
        self.scroll_back = 0;
        Some(prompt)
    }
}

/// Render the chat screen
pub fn render_chat(
    f: &mut Frame,
    area: Rect,
    state: &ChatState,
    transcript: &ChatTranscript,
    locale: Locale,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Transcript
            Constraint::Length(3), // Input
            Constraint::Length(2), // Footer
        ])
        .split(area);

    render_chat_header(f, chunks[0], locale);
    render_transcript(f, chunks[1], state, transcript, locale);
    render_input(f, chunks[2], state, locale);
    render_chat_footer(f, chunks[3], locale);
}

fn render_chat_header(f: &mut Frame, area: Rect, locale: Locale) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ♥ ", MedicalTheme::heart()),
        Span::styled(locale.text().chat_title, MedicalTheme::title()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_transcript(
    f: &mut Frame,
    area: Rect,
    state: &ChatState,
    transcript: &ChatTranscript,
    locale: Locale,
) {
    let text = locale.text();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let mut lines: Vec<Line> = Vec::new();
    if transcript.is_empty() && !state.waiting {
        lines.push(Line::from(Span::styled(text.chat_empty, MedicalTheme::text_muted())));
    }

    for message in transcript.messages() {
        let speaker = match message.role {
            Role::User => text.you,
            Role::Assistant => text.assistant,
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{speaker} "), MedicalTheme::role(message.role)),
            Span::styled(
                message.created_at.format("%H:%M").to_string(),
                MedicalTheme::text_muted(),
            ),
        ]));
        for content_line in message.content.lines() {
            lines.push(Line::from(Span::styled(content_line, MedicalTheme::text())));
        }
        lines.push(Line::from(""));
    }

    if state.waiting {
        lines.push(Line::from(Span::styled(text.chat_waiting, MedicalTheme::info())));
    }

    // Keep the newest lines in view; wrapped lines may still overflow slightly.
    let visible = block.inner(area).height;
    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let bottom = total.saturating_sub(visible);
    let scroll = bottom.saturating_sub(state.scroll_back);

    let p = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(p, area);
}

fn render_input(f: &mut Frame, area: Rect, state: &ChatState, locale: Locale) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if state.waiting {
            MedicalTheme::border()
        } else {
            MedicalTheme::border_focused()
        });

    let line = if state.input.is_empty() {
        Line::from(vec![
            Span::raw(" "),
            Span::styled(locale.text().chat_placeholder, MedicalTheme::text_muted()),
        ])
    } else {
        Line::from(vec![
            Span::raw(" "),
            Span::styled(state.input.as_str(), MedicalTheme::text()),
            Span::styled("▌", MedicalTheme::cursor()),
        ])
    };

    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_chat_footer(f: &mut Frame, area: Rect, locale: Locale) {
    let text = locale.text();
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("[Enter] ", MedicalTheme::key_hint()),
        Span::styled(format!("{} ", text.send), MedicalTheme::key_desc()),
        Span::styled("[PgUp/PgDn] ", MedicalTheme::key_hint()),
        Span::styled("↕ ", MedicalTheme::key_desc()),
        Span::styled("[Esc] ", MedicalTheme::key_hint()),
        Span::styled(text.back, MedicalTheme::key_desc()),
    ]));

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_prompt_trims_and_clears() {
        let mut state = ChatState::default();
        for c in "  What is LVH?  ".chars() {
            state.input_char(c);
        }
        assert_eq!(state.take_prompt().as_deref(), Some("What is LVH?"));
        assert!(state.input.is_empty());
        assert_eq!(state.take_prompt(), None);
    }

    #[test]
    fn test_input_ignored_while_waiting() {
        let mut state = ChatState {
            input: "hi".into(),
            waiting: true,
            scroll_back: 0,
        };
        state.input_char('!');
        state.delete_char();
        assert_eq!(state.input, "hi");
        assert_eq!(state.take_prompt(), None);
    }
}
