use super::*;
use crate::core::config::ConfigKey;
use crate::core::message::Message;
use crate::core::prompt::{system_prompt, SessionIdentity, WELCOME_TEXT};
use crate::ui::presenter::Sender;
use crate::utils::test_utils::{RecordingPresenter, StubBackend};
use std::sync::Arc;

fn coordinator() -> ChatCoordinator {
    ChatCoordinator::new(
        Arc::new(StubBackend::replying(["hello"])),
        SessionIdentity::new("a", None),
    )
}

fn run(coordinator: &mut ChatCoordinator, presenter: &mut RecordingPresenter, input: &str) -> CommandResult {
    let mut context = CommandContext {
        coordinator,
        presenter,
    };
    process_input(&mut context, input)
}

#[test]
fn plain_text_is_sent_as_message() {
    let mut coordinator = coordinator();
    let mut presenter = RecordingPresenter::default();

    assert_eq!(
        run(&mut coordinator, &mut presenter, "hello"),
        CommandResult::ProcessAsMessage("hello".into())
    );
    assert!(presenter.messages.is_empty());
}

#[test]
fn unknown_commands_fall_through_to_the_model() {
    let mut coordinator = coordinator();
    let mut presenter = RecordingPresenter::default();

    assert_eq!(
        run(&mut coordinator, &mut presenter, "/shrug"),
        CommandResult::ProcessAsMessage("/shrug".into())
    );
    assert_eq!(
        run(&mut coordinator, &mut presenter, "/"),
        CommandResult::ProcessAsMessage("/".into())
    );
}

#[tokio::test]
async fn clear_resets_history_and_transcript() {
    let mut coordinator = coordinator();
    let mut presenter = RecordingPresenter::default();
    coordinator.send("hi").unwrap();
    coordinator.next_event().await;
    assert_eq!(coordinator.conversation().len(), 3);

    assert_eq!(
        run(&mut coordinator, &mut presenter, "  /clear  "),
        CommandResult::Continue
    );

    assert_eq!(
        coordinator.conversation().snapshot(),
        vec![Message::system(system_prompt(None)), Message::assistant(WELCOME_TEXT)]
    );
    assert_eq!(presenter.clears, 1);
    assert_eq!(
        presenter.messages,
        vec![(Sender::Assistant, WELCOME_TEXT.to_string())]
    );
}

#[test]
fn bye_clears_then_hides() {
    let mut coordinator = coordinator();
    let mut presenter = RecordingPresenter::default();

    assert_eq!(
        run(&mut coordinator, &mut presenter, "/bye"),
        CommandResult::HidePanel
    );
    assert_eq!(coordinator.conversation().len(), 2);
    assert_eq!(presenter.clears, 1);
}

#[test]
fn command_names_match_exact_case_only() {
    let mut coordinator = coordinator();
    let mut presenter = RecordingPresenter::default();

    for input in ["/BYE", "/Clear", "/Help"] {
        assert_eq!(
            run(&mut coordinator, &mut presenter, input),
            CommandResult::ProcessAsMessage(input.into())
        );
    }
    assert_eq!(coordinator.conversation().len(), 1);
    assert_eq!(presenter.clears, 0);
}

#[test]
fn argument_free_commands_with_trailing_text_are_messages() {
    let mut coordinator = coordinator();
    let mut presenter = RecordingPresenter::default();

    for input in ["/clear now", "/bye for now", "/settings please"] {
        assert_eq!(
            run(&mut coordinator, &mut presenter, input),
            CommandResult::ProcessAsMessage(input.into())
        );
    }
    assert_eq!(coordinator.conversation().len(), 1);
    assert_eq!(presenter.clears, 0);
    assert!(presenter.messages.is_empty());
}

#[test]
fn settings_and_bare_model_open_the_overlay() {
    let mut coordinator = coordinator();
    let mut presenter = RecordingPresenter::default();

    assert_eq!(
        run(&mut coordinator, &mut presenter, "/settings"),
        CommandResult::OpenSettings
    );
    assert_eq!(
        run(&mut coordinator, &mut presenter, "/model"),
        CommandResult::OpenSettings
    );
    assert_eq!(presenter.statuses, vec!["Loading models...", "Loading models..."]);
}

#[tokio::test]
async fn model_command_switches_and_restarts() {
    let mut coordinator = coordinator();
    let mut presenter = RecordingPresenter::default();

    assert_eq!(
        run(&mut coordinator, &mut presenter, "/model mistral:7b"),
        CommandResult::SettingsChanged(ConfigKey::Model)
    );

    assert_eq!(coordinator.identity().model_id, "mistral:7b");
    assert_eq!(coordinator.conversation().len(), 2);
    assert_eq!(presenter.clears, 1);
    assert!(presenter.statuses[0].contains("mistral:7b"));
}

#[test]
fn model_command_for_current_model_is_a_no_op() {
    let mut coordinator = coordinator();
    let mut presenter = RecordingPresenter::default();

    assert_eq!(
        run(&mut coordinator, &mut presenter, "/model a"),
        CommandResult::Continue
    );
    assert_eq!(presenter.clears, 0);
}

#[test]
fn name_command_sets_and_clears_name() {
    let mut coordinator = coordinator();
    let mut presenter = RecordingPresenter::default();

    assert_eq!(
        run(&mut coordinator, &mut presenter, "/name  Ada Lovelace "),
        CommandResult::SettingsChanged(ConfigKey::Name)
    );
    assert_eq!(
        coordinator.identity().user_name.as_deref(),
        Some("Ada Lovelace")
    );
    assert!(coordinator
        .conversation()
        .system_prompt()
        .is_some_and(|prompt| prompt.ends_with("The user's name is Ada Lovelace.")));

    run(&mut coordinator, &mut presenter, "/name");
    assert_eq!(coordinator.identity().user_name, None);
    assert_eq!(presenter.statuses.last().map(String::as_str), Some("Name cleared"));
}

#[test]
fn help_lists_every_command() {
    let mut coordinator = coordinator();
    let mut presenter = RecordingPresenter::default();

    run(&mut coordinator, &mut presenter, "/help");

    let (sender, text) = &presenter.messages[0];
    assert_eq!(*sender, Sender::App);
    for command in all_commands() {
        assert!(text.contains(&format!("/{}", command.name)));
    }
}
