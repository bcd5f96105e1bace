use ratatui::{
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::core::prompt::ASSISTANT_NAME;
use crate::ui::presenter::Sender;
use crate::ui::settings::{SettingsFocus, SettingsOverlay};
use crate::ui::text_wrapping::wrap_lines;
use crate::ui::view::{ChatView, TranscriptEntry};

const USER_COLOR: Color = Color::Rgb(0x2c, 0x5a, 0xa0);
const ASSISTANT_COLOR: Color = Color::Rgb(0xe9, 0x1e, 0x63);
const HINT: &str = "Enter send • PgUp/PgDn scroll • /help commands • Ctrl+C quit";

pub fn ui(f: &mut Frame, view: &ChatView) {
    if !view.is_panel_visible() {
        render_idle_avatar(f);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_transcript(f, view, chunks[0]);
    f.render_widget(view.input(), chunks[1]);

    let status = Paragraph::new(view.status().unwrap_or(HINT))
        .style(Style::default().add_modifier(Modifier::DIM));
    f.render_widget(status, chunks[2]);

    if let Some(settings) = view.settings() {
        render_settings(f, settings);
    }
}

fn sender_style(sender: Sender) -> Style {
    let style = Style::default().add_modifier(Modifier::BOLD);
    match sender {
        Sender::User => style.fg(USER_COLOR),
        Sender::Assistant => style.fg(ASSISTANT_COLOR),
        Sender::App => style.fg(Color::DarkGray),
    }
}

/// Transcript lines, each entry rendered as
/// a `[HH:MM] Name:` header, the text, then a blank line.
pub fn build_display_lines(transcript: &[TranscriptEntry]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for entry in transcript {
        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", entry.timestamp),
                Style::default().add_modifier(Modifier::DIM),
            ),
            Span::styled(format!("{}:", entry.sender.label()), sender_style(entry.sender)),
        ]));
        for text_line in entry.text.lines() {
            lines.push(Line::from(text_line.to_string()));
        }
        lines.push(Line::default());
    }
    lines
}

fn render_transcript(f: &mut Frame, view: &ChatView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {ASSISTANT_NAME} • {} ", view.model_label()));
    let inner = block.inner(area);

    let lines = wrap_lines(&build_display_lines(view.transcript()), usize::from(inner.width));
    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let max_offset = total.saturating_sub(inner.height);
    let offset = max_offset.saturating_sub(view.scroll_from_bottom());

    let paragraph = Paragraph::new(lines).block(block).scroll((offset, 0));
    f.render_widget(paragraph, area);
}

fn render_idle_avatar(f: &mut Frame) {
    let area = centered(f.area(), 44, 4);
    let text = vec![
        Line::from(Span::styled("(-‿-) zZ", Style::default().fg(ASSISTANT_COLOR))),
        Line::default(),
        Line::from(format!("{ASSISTANT_NAME} is resting. Press any key to chat.")),
    ];
    f.render_widget(
        Paragraph::new(text).alignment(ratatui::layout::Alignment::Center),
        area,
    );
}

fn render_settings(f: &mut Frame, settings: &SettingsOverlay) {
    let area = centered(f.area(), 48, 18);
    f.render_widget(Clear, area);

    let outer = Block::default()
        .borders(Borders::ALL)
        .title(" Settings ")
        .title_bottom(" ↑/↓ model • Tab name • Enter save • Esc cancel ");
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(inner);

    let highlight = if settings.focus == SettingsFocus::Models {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let items: Vec<ListItem> = settings
        .picker
        .items
        .iter()
        .map(|item| ListItem::new(item.label.clone()))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(settings.picker.title.clone()),
        )
        .highlight_style(highlight)
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(settings.picker.selected));
    f.render_stateful_widget(list, chunks[0], &mut state);

    f.render_widget(&settings.name_input, chunks[1]);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::presenter::Presenter;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(view: &ChatView, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| ui(f, view)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(usize::from(width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn transcript_shows_sender_and_text() {
        let mut view = ChatView::new("llama3.2:3b");
        view.show_message(Sender::User, "hello there");

        let screen = render(&view, 60, 16);

        assert!(screen.contains("Jay:"));
        assert!(screen.contains("Welcome back!"));
        assert!(screen.contains("You:"));
        assert!(screen.contains("hello there"));
        assert!(screen.contains("llama3.2:3b"));
    }

    #[test]
    fn hidden_panel_shows_idle_avatar() {
        let mut view = ChatView::new("m");
        view.hide_panel();

        let screen = render(&view, 60, 10);

        assert!(screen.contains("Press any key to chat."));
        assert!(!screen.contains("Welcome back!"));
    }

    #[test]
    fn settings_overlay_lists_models() {
        let mut view = ChatView::new("b");
        view.show_settings("b", Some("Ada"), vec!["a".into(), "b".into()]);

        let screen = render(&view, 60, 24);

        assert!(screen.contains("Settings"));
        assert!(screen.contains("> b"));
        assert!(screen.contains("Ada"));
    }

    #[test]
    fn display_lines_follow_header_text_blank_shape() {
        let entries = vec![TranscriptEntry {
            sender: Sender::Assistant,
            text: "one\ntwo".into(),
            timestamp: "09:30".into(),
        }];
        let lines = build_display_lines(&entries);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].to_string(), "[09:30] Jay:");
        assert_eq!(lines[2].to_string(), "two");
    }

    #[test]
    fn latest_reply_tail_is_visible_after_word_wrap() {
        let mut view = ChatView::new("m");
        let reply = "aaaa bbbbbbb ".repeat(40) + "TAILMARK";
        view.show_message(Sender::Assistant, &reply);

        let screen = render(&view, 30, 14);

        assert!(screen.contains("TAILMARK"));
    }

    #[test]
    fn scrolling_up_reveals_earlier_rows() {
        let mut view = ChatView::new("m");
        for idx in 0..12 {
            view.show_message(Sender::User, &format!("line number {idx} with some words"));
        }

        let bottom = render(&view, 30, 14);
        assert!(bottom.contains("line number 11"));
        assert!(!bottom.contains("Welcome back!"));

        view.scroll_up(500);
        let top = render(&view, 30, 14);
        assert!(top.contains("Welcome back!"));
    }
}
