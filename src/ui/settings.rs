use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::{Block, Borders};
use tui_textarea::TextArea;

use crate::ui::picker::PickerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFocus {
    Models,
    Name,
}

/// Values confirmed in the settings overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsChoice {
    pub model: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsOutcome {
    Pending,
    Saved(SettingsChoice),
    Cancelled,
}

/// Model list plus name field, edited in place over the chat.
pub struct SettingsOverlay {
    pub picker: PickerState,
    pub name_input: TextArea<'static>,
    pub focus: SettingsFocus,
}

impl SettingsOverlay {
    pub fn new(current_model: &str, current_name: Option<&str>, models: Vec<String>) -> Self {
        let mut name_input = TextArea::default();
        name_input.insert_str(current_name.unwrap_or_default());
        let mut overlay = Self {
            picker: PickerState::with_current("Ollama Model", models, current_model),
            name_input,
            focus: SettingsFocus::Models,
        };
        overlay.refresh_name_block();
        overlay
    }

    /// Trimmed name field; blank means no name.
    pub fn name(&self) -> Option<String> {
        let name = self.name_input.lines().join(" ");
        let trimmed = name.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> SettingsOutcome {
        match key.code {
            KeyCode::Esc => SettingsOutcome::Cancelled,
            KeyCode::Enter => match self.picker.selected_id() {
                Some(model) => SettingsOutcome::Saved(SettingsChoice {
                    model: model.to_string(),
                    name: self.name(),
                }),
                None => SettingsOutcome::Cancelled,
            },
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    SettingsFocus::Models => SettingsFocus::Name,
                    SettingsFocus::Name => SettingsFocus::Models,
                };
                self.refresh_name_block();
                SettingsOutcome::Pending
            }
            KeyCode::Up => {
                self.picker.move_up();
                SettingsOutcome::Pending
            }
            KeyCode::Down => {
                self.picker.move_down();
                SettingsOutcome::Pending
            }
            _ if self.focus == SettingsFocus::Name => {
                self.name_input.input(tui_textarea::Input::from(key));
                SettingsOutcome::Pending
            }
            _ => SettingsOutcome::Pending,
        }
    }

    fn refresh_name_block(&mut self) {
        let title = match self.focus {
            SettingsFocus::Name => "Your Name (editing)",
            SettingsFocus::Models => "Your Name (Tab to edit)",
        };
        self.name_input
            .set_block(Block::default().borders(Borders::ALL).title(title));
    }
}
