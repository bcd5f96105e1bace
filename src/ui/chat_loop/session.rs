use std::cell::{Ref, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::commands::{process_input, CommandContext, CommandResult};
use crate::core::backend::BackendError;
use crate::core::config::{Config, ConfigKey};
use crate::core::coordinator::ChatCoordinator;
use crate::core::prompt::WELCOME_TEXT;
use crate::ui::presenter::{Presenter, Sender};
use crate::ui::settings::{SettingsChoice, SettingsOutcome};
use crate::ui::view::ChatView;

const SCROLL_STEP: u16 = 5;

/// Work finished on a spawned task, applied by the loop on its next tick.
#[derive(Debug)]
pub enum UiAction {
    ModelsLoaded(Result<Vec<String>, BackendError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// The coordinator and the view it reports to, plus where to persist
/// settings. Everything here lives on the loop's task.
pub struct ChatSession {
    coordinator: ChatCoordinator,
    view: Rc<RefCell<ChatView>>,
    config_path: Option<PathBuf>,
    actions_tx: mpsc::UnboundedSender<UiAction>,
}

impl ChatSession {
    /// Wire the coordinator's callback to `view`. With no `config_path`
    /// settings changes only last for the session.
    pub fn new(
        mut coordinator: ChatCoordinator,
        view: ChatView,
        config_path: Option<PathBuf>,
    ) -> (Self, mpsc::UnboundedReceiver<UiAction>) {
        let view = Rc::new(RefCell::new(view));
        let callback_view = Rc::clone(&view);
        coordinator.set_response_callback(move |response| {
            callback_view
                .borrow_mut()
                .show_message(Sender::Assistant, &response.text);
        });

        let (actions_tx, actions_rx) = mpsc::unbounded_channel();
        let session = Self {
            coordinator,
            view,
            config_path,
            actions_tx,
        };
        (session, actions_rx)
    }

    pub fn view(&self) -> Ref<'_, ChatView> {
        self.view.borrow()
    }

    pub fn coordinator(&self) -> &ChatCoordinator {
        &self.coordinator
    }

    /// Apply finished backend calls; the callback updates the view.
    pub fn process_events(&mut self) -> bool {
        let received = self.coordinator.process_events();
        if received {
            self.sync_input_lock();
        }
        received
    }

    /// Wait for the next finished backend call, then apply it like
    /// [`Self::process_events`].
    pub async fn next_event(&mut self) -> bool {
        let received = self.coordinator.next_event().await;
        if received {
            self.sync_input_lock();
        }
        received
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> LoopControl {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('d'))
        {
            return LoopControl::Exit;
        }

        {
            let mut view = self.view.borrow_mut();
            if !view.is_panel_visible() {
                view.show_panel();
                return LoopControl::Continue;
            }
        }

        let settings_outcome = self
            .view
            .borrow_mut()
            .settings_mut()
            .map(|settings| settings.handle_key(key));
        if let Some(outcome) = settings_outcome {
            self.apply_settings_outcome(outcome);
            return LoopControl::Continue;
        }

        match key.code {
            KeyCode::Esc => self.view.borrow_mut().hide_panel(),
            KeyCode::Enter => self.submit(),
            KeyCode::PageUp => self.view.borrow_mut().scroll_up(SCROLL_STEP),
            KeyCode::PageDown => self.view.borrow_mut().scroll_down(SCROLL_STEP),
            _ => {
                let mut view = self.view.borrow_mut();
                if !view.is_waiting() {
                    view.input_mut().input(tui_textarea::Input::from(key));
                }
            }
        }
        LoopControl::Continue
    }

    pub fn apply_action(&mut self, action: UiAction) {
        match action {
            UiAction::ModelsLoaded(Ok(models)) if models.is_empty() => {
                self.view.borrow_mut().set_status("No models installed");
            }
            UiAction::ModelsLoaded(Ok(models)) => {
                let identity = self.coordinator.identity();
                self.view.borrow_mut().show_settings(
                    &identity.model_id,
                    identity.user_name.as_deref(),
                    models,
                );
            }
            UiAction::ModelsLoaded(Err(err)) => {
                warn!(error = %err, "Failed to load models");
                self.view
                    .borrow_mut()
                    .set_status(&format!("Could not load models: {err}"));
            }
        }
    }

    /// Cancel outstanding work and unload the model.
    pub async fn shutdown(&mut self) {
        self.coordinator.shutdown().await;
    }

    /// Input stays locked until the chat request itself completes; a warm
    /// failure for the current model does not end it.
    fn sync_input_lock(&mut self) {
        if !self.coordinator.is_waiting() {
            self.view.borrow_mut().request_input();
        }
    }

    fn submit(&mut self) {
        let text = {
            let mut view = self.view.borrow_mut();
            if view.is_waiting() {
                return;
            }
            view.take_input()
        };
        if text.trim().is_empty() {
            return;
        }

        let result = {
            let mut view = self.view.borrow_mut();
            let mut context = CommandContext {
                coordinator: &mut self.coordinator,
                presenter: &mut *view,
            };
            process_input(&mut context, &text)
        };
        self.apply_command_result(result);
    }

    fn apply_command_result(&mut self, result: CommandResult) {
        match result {
            CommandResult::Continue => {}
            CommandResult::ProcessAsMessage(text) => self.send_message(&text),
            CommandResult::OpenSettings => self.load_models(),
            CommandResult::SettingsChanged(key) => self.persist_settings(&[key]),
            CommandResult::HidePanel => self.view.borrow_mut().hide_panel(),
        }
    }

    fn send_message(&mut self, text: &str) {
        let mut view = self.view.borrow_mut();
        match self.coordinator.send(text) {
            Ok(()) => {
                view.set_status("");
                view.show_message(Sender::User, text.trim());
                view.set_waiting(true);
            }
            Err(err) => view.set_status(&err.to_string()),
        }
    }

    fn load_models(&self) {
        let models = self.coordinator.list_available_models();
        let tx = self.actions_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(UiAction::ModelsLoaded(models.await));
        });
    }

    fn apply_settings_outcome(&mut self, outcome: SettingsOutcome) {
        match outcome {
            SettingsOutcome::Pending => {}
            SettingsOutcome::Cancelled => self.view.borrow_mut().close_settings(),
            SettingsOutcome::Saved(choice) => {
                self.view.borrow_mut().close_settings();
                self.save_settings(choice);
            }
        }
    }

    /// Saving always starts a new conversation, even for the same model.
    fn save_settings(&mut self, choice: SettingsChoice) {
        debug!(model = %choice.model, "Saving settings");
        self.coordinator.set_model(choice.model);
        self.coordinator.set_user_name(choice.name);
        self.persist_settings(&[ConfigKey::Model, ConfigKey::Name]);

        let mut view = self.view.borrow_mut();
        view.clear_messages();
        view.show_message(Sender::Assistant, WELCOME_TEXT);
        view.request_input();
    }

    /// Write `keys` from the current identity, leaving every other key in
    /// the file as it was.
    fn persist_settings(&mut self, keys: &[ConfigKey]) {
        let identity = self.coordinator.identity();
        self.view
            .borrow_mut()
            .set_model_label(identity.model_id.clone());

        let Some(path) = self.config_path.as_deref() else {
            return;
        };
        let mut config = Config::load_from_path_or_default(path);
        for &key in keys {
            match key {
                ConfigKey::Model => config.set(key, &identity.model_id),
                ConfigKey::Name => {
                    config.set(key, identity.user_name.as_deref().unwrap_or_default())
                }
                ConfigKey::BaseUrl => {}
            }
        }
        if let Err(err) = config.save_to_path(path) {
            warn!(error = %err, "Failed to save settings");
            self.view
                .borrow_mut()
                .set_status(&format!("Could not save settings: {err}"));
        }
    }
}
