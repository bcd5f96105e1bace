use crate::core::message::{Message, Role};

/// Ordered message log sent as context on every request.
///
/// The store always holds exactly one system message, at index 0. It is
/// created seeded with one, and every mutation keeps it that way.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    messages: Vec<Message>,
}

impl ConversationStore {
    pub fn new(system_text: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_text)],
        }
    }

    /// Add a turn at the end. A system-role append replaces the leading
    /// system prompt instead of adding a second one.
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        if role.is_system() {
            self.replace_system_prompt(content);
            return;
        }
        self.messages.push(Message::new(role, content));
    }

    /// Owned copy of the conversation, safe to hand to a background task.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn reset(&mut self, system_text: impl Into<String>, welcome_text: impl Into<String>) {
        self.messages.clear();
        self.messages.push(Message::system(system_text));
        self.messages.push(Message::assistant(welcome_text));
    }

    pub fn replace_system_prompt(&mut self, system_text: impl Into<String>) {
        self.messages.retain(|message| !message.is_system());
        self.messages.insert(0, Message::system(system_text));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .first()
            .filter(|message| message.is_system())
            .map(|message| message.content.as_str())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system_count(store: &ConversationStore) -> usize {
        store.messages().iter().filter(|m| m.is_system()).count()
    }

    fn assert_single_leading_system(store: &ConversationStore) {
        assert_eq!(system_count(store), 1);
        assert!(store.messages()[0].is_system());
    }

    #[test]
    fn new_store_is_seeded_with_system_prompt() {
        let store = ConversationStore::new("sys");
        assert_eq!(store.snapshot(), vec![Message::system("sys")]);
        assert!(!store.is_empty());
    }

    #[test]
    fn append_keeps_insertion_order() {
        let mut store = ConversationStore::new("sys");
        store.append(Role::User, "one");
        store.append(Role::Assistant, "two");
        store.append(Role::User, "");

        assert_eq!(
            store.snapshot(),
            vec![
                Message::system("sys"),
                Message::user("one"),
                Message::assistant("two"),
                Message::user(""),
            ]
        );
    }

    #[test]
    fn reset_leaves_system_then_welcome() {
        let mut store = ConversationStore::new("old");
        store.append(Role::User, "hello");
        store.append(Role::Assistant, "hi");

        store.reset("new", "Welcome back!");

        assert_eq!(
            store.snapshot(),
            vec![Message::system("new"), Message::assistant("Welcome back!")]
        );
    }

    #[test]
    fn replace_system_prompt_preserves_other_turns() {
        let mut store = ConversationStore::new("old");
        store.append(Role::User, "a");
        store.append(Role::Assistant, "b");

        store.replace_system_prompt("new");

        assert_eq!(store.system_prompt(), Some("new"));
        assert_eq!(
            &store.messages()[1..],
            &[Message::user("a"), Message::assistant("b")]
        );
    }

    #[test]
    fn system_append_replaces_instead_of_duplicating() {
        let mut store = ConversationStore::new("old");
        store.append(Role::User, "a");
        store.append(Role::System, "injected");

        assert_single_leading_system(&store);
        assert_eq!(store.system_prompt(), Some("injected"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn single_system_invariant_holds_across_mixed_operations() {
        let mut store = ConversationStore::new("s0");
        let steps: [fn(&mut ConversationStore); 8] = [
            |s: &mut ConversationStore| s.append(Role::User, "u"),
            |s: &mut ConversationStore| s.append(Role::Assistant, "a"),
            |s: &mut ConversationStore| s.replace_system_prompt("s1"),
            |s: &mut ConversationStore| s.append(Role::System, "s2"),
            |s: &mut ConversationStore| s.reset("s3", "w"),
            |s: &mut ConversationStore| s.append(Role::User, "u2"),
            |s: &mut ConversationStore| s.replace_system_prompt("s4"),
            |s: &mut ConversationStore| s.reset("s5", "w2"),
        ];

        for round in 0..3 {
            for (index, step) in steps.iter().enumerate() {
                if (index + round) % 2 == 0 {
                    step(&mut store);
                }
                step(&mut store);
                assert_single_leading_system(&store);
            }
        }
    }

    #[test]
    fn snapshot_is_detached_from_store() {
        let mut store = ConversationStore::new("sys");
        let snapshot = store.snapshot();
        store.append(Role::User, "later");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len(), 2);
    }
}
