//! Patient data input form.
//!
//! Eleven fields in feature order. Numeric fields are free text; categorical
//! fields cycle through the locale's option strings, so the encoder only
//! ever sees strings it recognizes.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{Locale, PatientRecord, FEATURE_COUNT};
use crate::tui::styles::MedicalTheme;

const AGE: usize = 0;
const SEX: usize = 1;
const CHEST_PAIN: usize = 2;
const RESTING_BP: usize = 3;
const CHOLESTEROL: usize = 4;
const FASTING_BS: usize = 5;
const RESTING_ECG: usize = 6;
const MAX_HR: usize = 7;
const EXERCISE_ANGINA: usize = 8;
const OLDPEAK: usize = 9;
const ST_SLOPE: usize = 10;

/// What a field holds.
#[derive(Debug, Clone)]
pub enum FieldInput {
    /// Typed number; an empty buffer means `default`.
    Numeric {
        value: String,
        integer: bool,
        default: &'static str,
    },
    /// One of a fixed list of localized options.
    Choice {
        options: &'static [&'static str],
        index: usize,
    },
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub input: FieldInput,
}

impl FormField {
    fn numeric(label: &'static str, integer: bool, default: &'static str) -> Self {
        Self {
            label,
            input: FieldInput::Numeric {
                value: String::new(),
                integer,
                default,
            },
        }
    }

    fn choice(label: &'static str, options: &'static [&'static str]) -> Self {
        Self {
            label,
            input: FieldInput::Choice { options, index: 0 },
        }
    }
}

/// Patient form state
pub struct PatientFormState {
    pub locale: Locale,
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl PatientFormState {
    #[must_use]
    pub fn new(locale: Locale) -> Self {
        let labels = &locale.text().field_labels;
        let o = locale.options();
        let fields = vec![
            FormField::numeric(labels[AGE], true, "1"),
            FormField::choice(labels[SEX], &o.sex),
            FormField::choice(labels[CHEST_PAIN], &o.chest_pain),
            FormField::numeric(labels[RESTING_BP], false, "0"),
            FormField::numeric(labels[CHOLESTEROL], false, "0"),
            FormField::choice(labels[FASTING_BS], &o.fasting_bs),
            FormField::choice(labels[RESTING_ECG], &o.resting_ecg),
            FormField::numeric(labels[MAX_HR], false, "0"),
            FormField::choice(labels[EXERCISE_ANGINA], &o.exercise_angina),
            FormField::numeric(labels[OLDPEAK], false, "0"),
            FormField::choice(labels[ST_SLOPE], &o.st_slope),
        ];
        debug_assert_eq!(fields.len(), FEATURE_COUNT);

        Self {
            locale,
            fields,
            selected_field: 0,
            error_message: None,
        }
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Cycle the selected choice field forward.
    pub fn next_option(&mut self) {
        if let FieldInput::Choice { options, index } = &mut self.fields[self.selected_field].input {
            *index = (*index + 1) % options.len();
            self.error_message = None;
        }
    }

    /// Cycle the selected choice field backward.
    pub fn prev_option(&mut self) {
        if let FieldInput::Choice { options, index } = &mut self.fields[self.selected_field].input {
            *index = index.checked_sub(1).unwrap_or(options.len() - 1);
            self.error_message = None;
        }
    }

    /// Add a character to the current numeric field
    pub fn input_char(&mut self, c: char) {
        if let FieldInput::Numeric { value, integer, .. } =
            &mut self.fields[self.selected_field].input
        {
            let accepted = c.is_ascii_digit() || c == '-' || (!*integer && c == '.');
            if accepted {
                value.push(c);
                self.error_message = None;
            }
        }
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        if let FieldInput::Numeric { value, .. } = &mut self.fields[self.selected_field].input {
            value.pop();
        }
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        match &mut self.fields[self.selected_field].input {
            FieldInput::Numeric { value, .. } => value.zeroize(),
            FieldInput::Choice { index, .. } => *index = 0,
        }
    }

    /// Wipe all typed values from memory and reset choices.
    ///
    /// Called as soon as a record has been built from the form.
    pub fn clear_sensitive(&mut self) {
        for field in &mut self.fields {
            match &mut field.input {
                FieldInput::Numeric { value, .. } => value.zeroize(),
                FieldInput::Choice { index, .. } => *index = 0,
            }
        }
        self.error_message = None;
        self.selected_field = 0;
    }

    fn choice(&self, idx: usize) -> String {
        match &self.fields[idx].input {
            FieldInput::Choice { options, index } => options[*index].to_string(),
            FieldInput::Numeric { .. } => String::new(),
        }
    }

    fn raw_number(&self, idx: usize) -> &str {
        match &self.fields[idx].input {
            FieldInput::Numeric { value, default, .. } => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    default
                } else {
                    trimmed
                }
            }
            FieldInput::Choice { .. } => "",
        }
    }

    fn number(&self, idx: usize) -> Result<f64, String> {
        self.raw_number(idx)
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                format!(
                    "{}: {}",
                    self.fields[idx].label,
                    self.locale.text().invalid_number
                )
            })
    }

    fn integer(&self, idx: usize) -> Result<i64, String> {
        self.raw_number(idx).parse::<i64>().map_err(|_| {
            format!(
                "{}: {}",
                self.fields[idx].label,
                self.locale.text().expected_integer
            )
        })
    }

    /// Build a record from the current values.
    ///
    /// # Errors
    /// Returns a localized message naming the first unparsable field.
    pub fn to_record(&self) -> Result<PatientRecord, String> {
        Ok(PatientRecord {
            age: self.integer(AGE)?,
            sex: self.choice(SEX),
            chest_pain_type: self.choice(CHEST_PAIN),
            resting_bp: self.number(RESTING_BP)?,
            cholesterol: self.number(CHOLESTEROL)?,
            fasting_bs: self.choice(FASTING_BS),
            resting_ecg: self.choice(RESTING_ECG),
            max_hr: self.number(MAX_HR)?,
            exercise_angina: self.choice(EXERCISE_ANGINA),
            oldpeak: self.number(OLDPEAK)?,
            st_slope: self.choice(ST_SLOPE),
        })
    }

    /// Fill the form with the built-in sample patient.
    pub fn load_sample_data(&mut self) {
        let sample = PatientRecord::sample(self.locale);
        let numbers = [
            (AGE, sample.age.to_string()),
            (RESTING_BP, sample.resting_bp.to_string()),
            (CHOLESTEROL, sample.cholesterol.to_string()),
            (MAX_HR, sample.max_hr.to_string()),
            (OLDPEAK, format!("{:.1}", sample.oldpeak)),
        ];
        let choices = [
            (SEX, sample.sex),
            (CHEST_PAIN, sample.chest_pain_type),
            (FASTING_BS, sample.fasting_bs),
            (RESTING_ECG, sample.resting_ecg),
            (EXERCISE_ANGINA, sample.exercise_angina),
            (ST_SLOPE, sample.st_slope),
        ];

        for (idx, text) in numbers {
            if let FieldInput::Numeric { value, .. } = &mut self.fields[idx].input {
                value.zeroize();
                value.push_str(&text);
            }
        }
        for (idx, wanted) in choices {
            if let FieldInput::Choice { options, index } = &mut self.fields[idx].input {
                *index = options.iter().position(|o| *o == wanted).unwrap_or(0);
            }
        }
        self.error_message = None;
    }
}

/// Render the patient data input form
pub fn render_patient_form(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0], state.locale);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect, locale: Locale) {
    let text = locale.text();
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled(text.form_title, MedicalTheme::title()),
        Span::styled(text.form_subtitle, MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (state.fields.len() + 1) / 2;

    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let (border_style, title_style) = if is_selected {
            (MedicalTheme::border_focused(), MedicalTheme::focused())
        } else {
            (MedicalTheme::border(), MedicalTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let mut spans = vec![Span::raw(" ")];
        match &field.input {
            FieldInput::Numeric { value, default, .. } => {
                if value.is_empty() {
                    spans.push(Span::styled(*default, MedicalTheme::text_muted()));
                } else {
                    spans.push(Span::styled(value.as_str(), MedicalTheme::text()));
                }
                if is_selected {
                    spans.push(Span::styled("▌", MedicalTheme::cursor()));
                }
            }
            FieldInput::Choice { options, index } => {
                if is_selected {
                    spans.push(Span::styled("◀ ", MedicalTheme::key_hint()));
                    spans.push(Span::styled(options[*index], MedicalTheme::selected()));
                    spans.push(Span::styled(" ▶", MedicalTheme::key_hint()));
                } else {
                    spans.push(Span::styled(options[*index], MedicalTheme::text()));
                }
            }
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let text = state.locale.text();
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.clone(), MedicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled(format!("{} ", text.navigate), MedicalTheme::key_desc()),
            Span::styled("[←→] ", MedicalTheme::key_hint()),
            Span::styled(format!("{} ", text.choose), MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled(format!("{} ", text.analyze), MedicalTheme::key_desc()),
            Span::styled("[S] ", MedicalTheme::key_hint()),
            Span::styled(format!("{} ", text.sample_data), MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled(text.back, MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
