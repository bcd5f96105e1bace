use ratatui::widgets::{Block, Borders};
use tui_textarea::TextArea;

use crate::core::prompt::{ASSISTANT_NAME, WELCOME_TEXT};
use crate::ui::presenter::{Presenter, Sender};
use crate::ui::settings::SettingsOverlay;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub sender: Sender,
    pub text: String,
    /// Local time the line was shown, as `HH:MM`.
    pub timestamp: String,
}

/// Everything the terminal shows. Owned by the presentation loop and
/// updated through [`Presenter`] so the coordinator never touches it.
pub struct ChatView {
    transcript: Vec<TranscriptEntry>,
    input: TextArea<'static>,
    status: Option<String>,
    waiting: bool,
    panel_visible: bool,
    settings: Option<SettingsOverlay>,
    scroll_from_bottom: u16,
    model_label: String,
}

impl ChatView {
    pub fn new(model_label: impl Into<String>) -> Self {
        let mut view = Self {
            transcript: Vec::new(),
            input: TextArea::default(),
            status: None,
            waiting: false,
            panel_visible: true,
            settings: None,
            scroll_from_bottom: 0,
            model_label: model_label.into(),
        };
        view.refresh_input_block();
        view.show_message(Sender::Assistant, WELCOME_TEXT);
        view
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn input(&self) -> &TextArea<'static> {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.input
    }

    /// Remove and return the typed text.
    pub fn take_input(&mut self) -> String {
        let text = self.input.lines().join("\n");
        self.input = TextArea::default();
        self.refresh_input_block();
        text
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    /// Lock input while a reply is outstanding.
    pub fn set_waiting(&mut self, waiting: bool) {
        self.waiting = waiting;
        self.refresh_input_block();
    }

    pub fn is_panel_visible(&self) -> bool {
        self.panel_visible
    }

    pub fn hide_panel(&mut self) {
        self.panel_visible = false;
        self.settings = None;
    }

    pub fn show_panel(&mut self) {
        self.panel_visible = true;
    }

    pub fn settings(&self) -> Option<&SettingsOverlay> {
        self.settings.as_ref()
    }

    pub fn settings_mut(&mut self) -> Option<&mut SettingsOverlay> {
        self.settings.as_mut()
    }

    pub fn close_settings(&mut self) {
        self.settings = None;
    }

    pub fn model_label(&self) -> &str {
        &self.model_label
    }

    pub fn set_model_label(&mut self, model: impl Into<String>) {
        self.model_label = model.into();
    }

    pub fn scroll_from_bottom(&self) -> u16 {
        self.scroll_from_bottom
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }

    fn refresh_input_block(&mut self) {
        let title = if self.waiting {
            format!("{ASSISTANT_NAME} is thinking...")
        } else {
            "Message".to_string()
        };
        self.input
            .set_block(Block::default().borders(Borders::ALL).title(title));
    }
}

impl Presenter for ChatView {
    fn show_message(&mut self, sender: Sender, text: &str) {
        self.transcript.push(TranscriptEntry {
            sender,
            text: text.to_string(),
            timestamp: chrono::Local::now().format("%H:%M").to_string(),
        });
        self.scroll_from_bottom = 0;
    }

    fn request_input(&mut self) {
        self.set_waiting(false);
    }

    fn show_settings(&mut self, current_model: &str, current_name: Option<&str>, models: Vec<String>) {
        self.status = None;
        self.settings = Some(SettingsOverlay::new(current_model, current_name, models));
    }

    fn clear_messages(&mut self) {
        self.transcript.clear();
        self.scroll_from_bottom = 0;
    }

    fn set_status(&mut self, status: &str) {
        self.status = (!status.is_empty()).then(|| status.to_string());
    }
}
