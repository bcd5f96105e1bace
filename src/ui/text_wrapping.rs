//! Word wrapping for transcript lines.
//!
//! Lines are broken here and drawn without ratatui's `Wrap`, so the row
//! count used for scrolling is exactly the number of rows drawn.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

struct Cell {
    ch: char,
    style: Style,
    width: usize,
}

/// Break `line` at word boundaries so that no row is wider than `width`.
///
/// Whitespace at a break point is dropped. Words wider than `width` are
/// split across rows. Span styles are kept.
pub fn wrap_line(line: &Line<'_>, width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let cells: Vec<Cell> = line
        .spans
        .iter()
        .flat_map(|span| {
            let style = span.style;
            span.content.chars().map(move |ch| Cell {
                ch,
                style,
                width: UnicodeWidthChar::width(ch).unwrap_or(0),
            })
        })
        .collect();

    let mut rows: Vec<Vec<usize>> = vec![Vec::new()];
    let mut row_width = 0;
    let mut start = 0;

    while start < cells.len() {
        let is_space = cells[start].ch.is_whitespace();
        let mut end = start + 1;
        while end < cells.len() && cells[end].ch.is_whitespace() == is_space {
            end += 1;
        }
        let segment_width: usize = cells[start..end].iter().map(|cell| cell.width).sum();

        if row_width + segment_width <= width {
            push_cells(&mut rows, start..end);
            row_width += segment_width;
        } else if is_space {
            if row_width > 0 {
                rows.push(Vec::new());
                row_width = 0;
            }
        } else {
            if row_width > 0 && segment_width <= width {
                rows.push(Vec::new());
                row_width = 0;
            }
            for idx in start..end {
                let cell_width = cells[idx].width;
                if row_width > 0 && row_width + cell_width > width {
                    rows.push(Vec::new());
                    row_width = 0;
                }
                push_cells(&mut rows, idx..idx + 1);
                row_width += cell_width;
            }
        }
        start = end;
    }

    rows.into_iter()
        .map(|row| build_row(&cells, &row).style(line.style))
        .collect()
}

/// [`wrap_line`] applied to every line.
pub fn wrap_lines(lines: &[Line<'_>], width: usize) -> Vec<Line<'static>> {
    lines.iter().flat_map(|line| wrap_line(line, width)).collect()
}

fn push_cells(rows: &mut [Vec<usize>], range: std::ops::Range<usize>) {
    if let Some(row) = rows.last_mut() {
        row.extend(range);
    }
}

fn build_row(cells: &[Cell], row: &[usize]) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut text = String::new();
    let mut current: Option<Style> = None;

    for &idx in row {
        let cell = &cells[idx];
        if current != Some(cell.style) {
            if let Some(style) = current {
                spans.push(Span::styled(std::mem::take(&mut text), style));
            }
            current = Some(cell.style);
        }
        text.push(cell.ch);
    }
    if let Some(style) = current {
        spans.push(Span::styled(text, style));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::{Color, Modifier};

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn breaks_at_word_boundaries() {
        let wrapped = wrap_line(&Line::from("aaaa bbbbbbb cc"), 10);
        assert_eq!(texts(&wrapped), vec!["aaaa ", "bbbbbbb cc"]);
    }

    #[test]
    fn short_line_is_unchanged() {
        let wrapped = wrap_line(&Line::from("keep  two  spaces"), 40);
        assert_eq!(texts(&wrapped), vec!["keep  two  spaces"]);
    }

    #[test]
    fn long_word_is_split() {
        let wrapped = wrap_line(&Line::from("abcdefghij"), 4);
        assert_eq!(texts(&wrapped), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn empty_line_keeps_one_row() {
        assert_eq!(wrap_line(&Line::default(), 10).len(), 1);
    }

    #[test]
    fn no_row_exceeds_width() {
        let text = "aaaa bbbbbbb ".repeat(40) + "TAILMARK";
        for width in [1, 7, 12, 28, 80] {
            let wrapped = wrap_line(&Line::from(text.clone()), width);
            assert!(wrapped.iter().all(|line| line.width() <= width));
            assert!(texts(&wrapped).concat().ends_with("TAILMARK"));
        }
    }

    #[test]
    fn wide_characters_count_double() {
        let wrapped = wrap_line(&Line::from("日本語テキスト"), 6);
        assert_eq!(texts(&wrapped), vec!["日本語", "テキス", "ト"]);
    }

    #[test]
    fn span_styles_survive_wrapping() {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let red = Style::default().fg(Color::Red);
        let line = Line::from(vec![Span::styled("Jay:", bold), Span::styled(" hello world", red)]);

        let wrapped = wrap_line(&line, 10);

        assert_eq!(texts(&wrapped), vec!["Jay: hello", "world"]);
        assert_eq!(wrapped[0].spans[0].style, bold);
        assert_eq!(wrapped[0].spans[1].style, red);
        assert_eq!(wrapped[1].spans[0].style, red);
    }
}
