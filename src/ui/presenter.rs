use crate::core::prompt::ASSISTANT_NAME;

/// Who a transcript line is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
    /// Local notices such as command output; never sent to the model.
    App,
}

impl Sender {
    pub fn label(self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Assistant => ASSISTANT_NAME,
            Sender::App => "companion",
        }
    }
}

/// What the coordinator's callers need from whatever shows the chat.
pub trait Presenter {
    fn show_message(&mut self, sender: Sender, text: &str);

    /// Re-enable and focus input after a reply or error arrives.
    fn request_input(&mut self);

    fn show_settings(&mut self, current_model: &str, current_name: Option<&str>, models: Vec<String>);

    fn clear_messages(&mut self);

    /// One-line feedback that does not belong in the transcript.
    fn set_status(&mut self, status: &str);
}
