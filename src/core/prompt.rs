//! Session identity and the system prompt derived from it.
//!
//! The prompt text must be byte-identical across restarts for the same
//! identity, so generation is a pure function of [`SessionIdentity`].

/// Display name the assistant uses for itself in the transcript.
pub const ASSISTANT_NAME: &str = "Jay";

/// Assistant turn seeded after every history reset.
pub const WELCOME_TEXT: &str = "Welcome back!";

const BASE_PROMPT: &str = "You are Jay, a helpful personal assistant. \n\
Role: provide accurate, concise answers. \n\
Constraints: \n\
- Keep short replies unless asked to expand.\n\
- If the user explicitly asks for more detail or explanation, provide longer, structured responses.\n\
- If you are not sure about your answer, DO NOT answer. DO NOT take a guess and DO NOT make assumptions.";

/// The selected model and the optional name the user wants to be called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub model_id: String,
    pub user_name: Option<String>,
}

impl SessionIdentity {
    pub fn new(model_id: impl Into<String>, user_name: Option<String>) -> Self {
        Self {
            model_id: model_id.into(),
            user_name: clean_name(user_name),
        }
    }

    pub fn set_model(&mut self, model_id: impl Into<String>) {
        self.model_id = model_id.into();
    }

    /// Blank names are stored as `None` so they never reach the prompt.
    pub fn set_user_name(&mut self, user_name: Option<String>) {
        self.user_name = clean_name(user_name);
    }

    pub fn system_prompt(&self) -> String {
        system_prompt(self.user_name.as_deref())
    }
}

fn clean_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

/// Compose the system prompt for an optional user name.
pub fn system_prompt(user_name: Option<&str>) -> String {
    let mut prompt = BASE_PROMPT.to_string();
    if let Some(name) = user_name {
        prompt.push_str(&format!("\nThe user's name is {name}."));
    }
    normalize_prompt(&prompt)
}

/// Trim the prompt and make sure it ends with terminal punctuation.
pub fn normalize_prompt(text: &str) -> String {
    let mut normalized = text.trim().to_string();
    if !normalized.ends_with(['.', '!', '?']) {
        normalized.push('.');
    }
    normalized
}
