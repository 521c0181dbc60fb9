//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Scoring the form on the UI thread
//! - Chat requests via the background worker

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::gemini::GeminiClient;
use crate::adapters::model::{EnsembleModel, ModelLoader};
use crate::application::{ChatRelay, PredictionService};
use crate::config::AppConfig;
use crate::domain::{ChatTranscript, FeatureEncoder, Locale};
use crate::ports::{ChatClient, Classifier};

use super::ui::{
    assessment::{render_assessment, AssessmentState},
    chat::{render_chat, ChatState},
    dashboard::{render_dashboard, DashboardState},
    patient::{render_patient_form, PatientFormState},
    render_disclaimer,
};
use super::worker::{ChatProgress, ChatWorker, ChatWorkerHandle};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    PatientForm,
    Assessment,
    Chat,
}

/// Main application state
pub struct App<M = EnsembleModel, C = GeminiClient>
where
    M: Classifier,
    C: ChatClient + 'static,
{
    locale: Locale,

    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    encoder: FeatureEncoder,
    prediction_service: PredictionService<M>,
    chat_relay: Arc<ChatRelay<C>>,

    /// Session transcript, dropped on exit
    transcript: ChatTranscript,

    dashboard_state: DashboardState,
    patient_form_state: PatientFormState,
    assessment_state: AssessmentState,
    chat_state: ChatState,

    /// Chat request in flight (at most one)
    pending_worker: Option<ChatWorkerHandle>,
}

impl App {
    /// Create the application from configuration, loading the model artifact.
    ///
    /// # Errors
    /// Returns error if the model cannot be loaded or verified. This is the
    /// only fatal startup condition; a missing chat API key is not.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let loader = ModelLoader::new(config.model_path.clone(), config.model_sha256.clone());
        let model = loader.get().with_context(|| {
            format!(
                "Failed to load model from {:?}. Set HEARTYSIS_MODEL_PATH to a valid ensemble artifact.",
                loader.path()
            )
        })?;

        let client = GeminiClient::new(
            &config.gemini.endpoint,
            config.gemini.model.clone(),
            config.gemini.api_key.clone(),
        );
        if !client.has_api_key() {
            tracing::warn!("GEMINI_API_KEY is not set; chat replies will report the missing key");
        }
        let chat_configured = client.has_api_key();

        let members = model.member_count();
        let digest: String = model.sha256().chars().take(12).collect();

        let mut app = Self::with_dependencies(
            config.locale,
            PredictionService::new(model),
            Arc::new(ChatRelay::new(Arc::new(client), config.locale)),
        );
        app.dashboard_state.model_members = members;
        app.dashboard_state.model_digest = digest;
        app.dashboard_state.chat_configured = chat_configured;
        Ok(app)
    }
}

impl<M, C> App<M, C>
where
    M: Classifier,
    C: ChatClient + 'static,
{
    /// Create application with injected dependencies (Composition Root pattern).
    ///
    /// `App::new` builds the production adapters; tests pass stubs here.
    pub fn with_dependencies(
        locale: Locale,
        prediction_service: PredictionService<M>,
        chat_relay: Arc<ChatRelay<C>>,
    ) -> Self {
        Self {
            locale,
            screen: Screen::Dashboard,
            should_quit: false,
            encoder: FeatureEncoder::new(locale),
            prediction_service,
            chat_relay,
            transcript: ChatTranscript::new(),
            dashboard_state: DashboardState {
                model_loaded: true,
                chat_configured: true,
                ..DashboardState::default()
            },
            patient_form_state: PatientFormState::new(locale),
            assessment_state: AssessmentState::default(),
            chat_state: ChatState::default(),
            pending_worker: None,
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_worker();

            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(2)])
                    .split(f.area());

                let content_area = chunks[0];
                match self.screen {
                    Screen::Dashboard => {
                        render_dashboard(f, content_area, &self.dashboard_state, self.locale);
                    }
                    Screen::PatientForm => {
                        render_patient_form(f, content_area, &self.patient_form_state);
                    }
                    Screen::Assessment => {
                        render_assessment(f, content_area, &self.assessment_state, self.locale);
                    }
                    Screen::Chat => render_chat(
                        f,
                        content_area,
                        &self.chat_state,
                        &self.transcript,
                        self.locale,
                    ),
                }

                render_disclaimer(f, chunks[1], self.locale);
            })?;

            // Short poll so worker replies show up promptly
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Drain progress from the chat worker, if one is running.
    fn poll_worker(&mut self) {
        loop {
            let Some(progress) = self.pending_worker.as_ref().and_then(ChatWorkerHandle::try_recv)
            else {
                break;
            };

            match progress {
                ChatProgress::Sending => {}
                ChatProgress::Complete(reply) | ChatProgress::Failed(reply) => {
                    self.transcript.push_assistant(reply);
                    self.chat_state.waiting = false;
                    self.pending_worker = None;
                    self.dashboard_state.chat_turns = self.transcript.len();
                    break;
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key, KeyCode::Char('q') | KeyCode::Char('c'))
        {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::PatientForm => self.handle_patient_form_key(key),
            Screen::Assessment => self.handle_assessment_key(key),
            Screen::Chat => self.handle_chat_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('n') | KeyCode::Char('N') => self.open_new_form(),
            KeyCode::Char('c') | KeyCode::Char('C') => self.screen = Screen::Chat,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_patient_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.screen = Screen::Dashboard,
            KeyCode::Up | KeyCode::BackTab => self.patient_form_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.patient_form_state.next_field(),
            KeyCode::Left => self.patient_form_state.prev_option(),
            KeyCode::Right => self.patient_form_state.next_option(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.patient_form_state.load_sample_data(),
            KeyCode::Char(c) => self.patient_form_state.input_char(c),
            KeyCode::Backspace => self.patient_form_state.delete_char(),
            KeyCode::Delete => self.patient_form_state.clear_field(),
            KeyCode::Enter => self.submit_patient_form(),
            _ => {}
        }
    }

    fn handle_assessment_key(&mut self, key: KeyCode) {
        match &self.assessment_state {
            AssessmentState::Error { .. } => match key {
                // Values were kept on failure, so the form can be fixed or resubmitted.
                KeyCode::Enter => self.screen = Screen::PatientForm,
                KeyCode::Char('r') | KeyCode::Char('R') => self.submit_patient_form(),
                KeyCode::Esc => self.screen = Screen::Dashboard,
                _ => {}
            },
            _ => match key {
                KeyCode::Char('n') | KeyCode::Char('N') => self.open_new_form(),
                KeyCode::Char('c') | KeyCode::Char('C') => self.screen = Screen::Chat,
                KeyCode::Enter | KeyCode::Esc => self.screen = Screen::Dashboard,
                _ => {}
            },
        }
    }

    fn handle_chat_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.screen = Screen::Dashboard,
            KeyCode::Enter => self.send_chat_prompt(),
            KeyCode::Backspace => self.chat_state.delete_char(),
            KeyCode::PageUp => {
                self.chat_state.scroll_back = self.chat_state.scroll_back.saturating_add(5);
            }
            KeyCode::PageDown => {
                self.chat_state.scroll_back = self.chat_state.scroll_back.saturating_sub(5);
            }
            KeyCode::Char(c) => self.chat_state.input_char(c),
            _ => {}
        }
    }

    fn open_new_form(&mut self) {
        self.patient_form_state.clear_sensitive();
        self.screen = Screen::PatientForm;
    }

    fn submit_patient_form(&mut self) {
        let record = match self.patient_form_state.to_record() {
            Ok(record) => record,
            Err(message) => {
                self.patient_form_state.error_message = Some(message);
                self.screen = Screen::PatientForm;
                return;
            }
        };

        self.assessment_state = match self.prediction_service.assess(&self.encoder, &record) {
            Ok(prediction) => {
                self.dashboard_state.assessment_count += 1;
                self.dashboard_state.last_verdict = Some(prediction.verdict());
                // Clear plaintext buffers from the UI immediately.
                self.patient_form_state.clear_sensitive();
                AssessmentState::Complete { prediction }
            }
            Err(e) => AssessmentState::Error {
                message: e.to_string(),
            },
        };
        self.screen = Screen::Assessment;
    }

    fn send_chat_prompt(&mut self) {
        if self.pending_worker.is_some() {
            return;
        }
        let Some(prompt) = self.chat_state.take_prompt() else {
            return;
        };

        self.transcript.push_user(prompt.clone());
        self.dashboard_state.chat_turns = self.transcript.len();
        self.chat_state.waiting = true;
        self.pending_worker = Some(ChatWorker::spawn(Arc::clone(&self.chat_relay), prompt));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, Verdict, FEATURE_COUNT};
    use crate::ports::{ChatError, ClassifierError};
    use crate::tui::ui::patient::FieldInput;
    use std::time::Instant;

    struct FixedModel(f64);

    impl Classifier for FixedModel {
        fn n_features(&self) -> usize {
            FEATURE_COUNT
        }

        fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], ClassifierError> {
            if features.len() != FEATURE_COUNT {
                return Err(ClassifierError::FeatureCount {
                    got: features.len(),
                    expected: FEATURE_COUNT,
                });
            }
            if self.0.is_nan() {
                return Err(ClassifierError::Model("broken".into()));
            }
            Ok([1.0 - self.0, self.0])
        }
    }

    struct Echo;

    impl ChatClient for Echo {
        fn complete(&self, _system: &str, prompt: &str) -> Result<String, ChatError> {
            Ok(format!("re: {prompt}"))
        }
    }

    fn app(probability: f64) -> App<FixedModel, Echo> {
        App::with_dependencies(
            Locale::En,
            PredictionService::new(Arc::new(FixedModel(probability))),
            Arc::new(ChatRelay::new(Arc::new(Echo), Locale::En)),
        )
    }

    fn press(app: &mut App<FixedModel, Echo>, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App<FixedModel, Echo>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_sample_analysis_flow() {
        let mut app = app(0.72);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.screen(), Screen::PatientForm);

        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen(), Screen::Assessment);
        match &app.assessment_state {
            AssessmentState::Complete { prediction } => {
                assert_eq!(prediction.probability, 0.72);
                assert_eq!(prediction.verdict(), Verdict::Likely);
            }
            other => panic!("unexpected state: {other:?}"),
        }
        assert_eq!(app.dashboard_state.assessment_count, 1);

        // Form buffers are wiped after a successful analysis.
        assert!(app.patient_form_state.fields.iter().all(|f| match &f.input {
            FieldInput::Numeric { value, .. } => value.is_empty(),
            FieldInput::Choice { index, .. } => *index == 0,
        }));
    }

    #[test]
    fn test_prediction_failure_is_shown_and_values_kept() {
        let mut app = app(f64::NAN);
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.assessment_state, AssessmentState::Error { .. }));
        assert!(app.patient_form_state.to_record().is_ok_and(|r| r.age == 54));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::PatientForm);
    }

    #[test]
    fn test_invalid_number_stays_on_form() {
        let mut app = app(0.1);
        press(&mut app, KeyCode::Char('n'));
        // Oldpeak is the tenth field.
        for _ in 0..9 {
            press(&mut app, KeyCode::Down);
        }
        type_text(&mut app, "1.2.3");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen(), Screen::PatientForm);
        assert!(app.patient_form_state.error_message.is_some());
    }

    #[test]
    fn test_chat_round_trip() {
        let mut app = app(0.1);
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.screen(), Screen::Chat);

        type_text(&mut app, "hello");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.transcript().len(), 1);
        assert!(app.chat_state.waiting);

        let deadline = Instant::now() + Duration::from_secs(5);
        while app.pending_worker.is_some() && Instant::now() < deadline {
            app.poll_worker();
            std::thread::sleep(Duration::from_millis(10));
        }

        let messages = app.transcript().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, "re: hello");
        assert!(!app.chat_state.waiting);
        assert_eq!(app.dashboard_state.chat_turns, 2);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app(0.1);
        press(&mut app, KeyCode::Char('c'));
        // Plain 'q' is text on the chat screen.
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);

        app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }
}
