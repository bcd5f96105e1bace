//! Event polling and redraw loop.
//!
//! Terminal input is read on a spawned task and handed over a channel; the
//! loop itself drains that channel, the coordinator's completions and the
//! UI action queue each tick, then redraws if anything changed.

use std::{
    error::Error,
    io,
    path::PathBuf,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;
use tracing::debug;

use crate::core::coordinator::ChatCoordinator;
use crate::ui::presenter::Presenter;
use crate::ui::renderer::ui;
use crate::ui::view::ChatView;

use super::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use super::session::{ChatSession, LoopControl, UiAction};

#[derive(Debug, Default)]
pub struct ChatOptions {
    /// Where settings changes are saved; `None` keeps them for this session only.
    pub config_path: Option<PathBuf>,
    /// Shown in the status line when the chat opens.
    pub startup_notice: Option<String>,
}

#[derive(Debug)]
enum UiEvent {
    Crossterm(Event),
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

fn try_draw_frame(
    terminal: &mut ChatTerminal,
    session: &ChatSession,
    request_redraw: &mut bool,
    last_draw: &mut Instant,
    frame_duration: Duration,
) -> io::Result<()> {
    if !*request_redraw {
        return Ok(());
    }

    let now = Instant::now();
    if now.duration_since(*last_draw) < frame_duration {
        return Ok(());
    }

    let view = session.view();
    terminal.draw(|f| ui(f, &view))?;
    *last_draw = now;
    *request_redraw = false;
    Ok(())
}

fn drain_action_queue(
    session: &mut ChatSession,
    action_rx: &mut mpsc::UnboundedReceiver<UiAction>,
) -> bool {
    let mut applied = false;
    while let Ok(action) = action_rx.try_recv() {
        session.apply_action(action);
        applied = true;
    }
    applied
}

/// Run the interactive chat until the user quits, then release the model.
pub async fn run_chat(
    coordinator: ChatCoordinator,
    options: ChatOptions,
) -> Result<(), Box<dyn Error>> {
    let mut view = ChatView::new(coordinator.identity().model_id.clone());
    if let Some(notice) = options.startup_notice.as_deref() {
        view.set_status(notice);
    }
    let (mut session, mut action_rx) = ChatSession::new(coordinator, view, options.config_path);

    let mut terminal = setup_terminal()?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);

    const MAX_FPS: u64 = 60;
    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut request_redraw = true;

    let result: Result<(), Box<dyn Error>> = 'main_loop: loop {
        if let Err(err) = try_draw_frame(
            &mut terminal,
            &session,
            &mut request_redraw,
            &mut last_draw,
            frame_duration,
        ) {
            break 'main_loop Err(err.into());
        }

        let mut events_processed = false;
        while let Ok(UiEvent::Crossterm(event)) = event_rx.try_recv() {
            events_processed = true;
            match event {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if session.handle_key(key) == LoopControl::Exit {
                        break 'main_loop Ok(());
                    }
                    request_redraw = true;
                }
                Event::Resize(..) => request_redraw = true,
                _ => {}
            }
        }

        let received_any = session.process_events();
        if received_any {
            request_redraw = true;
        }

        if drain_action_queue(&mut session, &mut action_rx) {
            request_redraw = true;
        }

        let idle = !events_processed && !received_any && !request_redraw;
        if idle {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    };

    event_reader_handle.abort();
    restore_terminal(&mut terminal)?;

    debug!("Chat loop finished; shutting down");
    session.shutdown().await;
    result
}
