//! Page control drawn under every list

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::dashboard::ui::Styles;
use crate::pagination::{PageItem, PageWindow};

/// Text of each control segment in display order
pub fn segments(window: &PageWindow) -> Vec<String> {
    let mut out = vec!["‹ Prev".to_string()];
    for item in window.items() {
        out.push(match item {
            PageItem::Page(p) => p.to_string(),
            PageItem::Ellipsis => "…".to_string(),
        });
    }
    out.push("Next ›".to_string());
    out
}

pub fn render(f: &mut Frame, area: Rect, window: &PageWindow, total_count: u64) {
    let mut spans = Vec::new();
    let arrow_style = |enabled: bool| {
        if enabled {
            Styles::default()
        } else {
            Styles::inactive()
        }
    };

    spans.push(Span::styled("‹ Prev", arrow_style(window.has_previous())));
    for item in window.items() {
        spans.push(Span::raw("  "));
        spans.push(match item {
            PageItem::Page(p) if p == window.current_page => {
                Span::styled(format!(" {} ", p), Styles::selected())
            }
            PageItem::Page(p) => Span::raw(p.to_string()),
            PageItem::Ellipsis => Span::styled("…", Styles::inactive()),
        });
    }
    spans.push(Span::raw("  "));
    spans.push(Span::styled("Next ›", arrow_style(window.has_next())));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::inactive_border())
        .title(format!(
            "Page {} of {} · {} total",
            window.current_page, window.total_pages, total_count
        ));

    f.render_widget(
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_around_middle_page() {
        let window = PageWindow::new(6, 20);
        assert_eq!(
            segments(&window),
            vec!["‹ Prev", "1", "…", "4", "5", "6", "7", "8", "…", "20", "Next ›"]
        );
    }

    #[test]
    fn test_single_page_has_only_one_button() {
        assert_eq!(segments(&PageWindow::new(1, 1)), vec!["‹ Prev", "1", "Next ›"]);
    }
}
