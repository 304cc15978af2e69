//! Notice banner and status bar rendering

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::dashboard::ui::Styles;
use crate::status::Notice;

/// Banner text with the kind prefix, e.g. `✓ Deleted successfully`
pub fn notice_text(notice: &Notice) -> String {
    format!("{} {}", notice.prefix(), notice.message)
}

/// Draw a notice, or `fallback` in the inactive style when there is none
pub fn render(f: &mut Frame, area: Rect, notice: Option<&Notice>, fallback: &str) {
    let line = match notice {
        Some(notice) => Line::from(Span::styled(notice_text(notice), Styles::notice(&notice.kind))),
        None => Line::from(Span::styled(fallback.to_string(), Styles::inactive())),
    };
    f.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_text_has_prefix() {
        assert_eq!(
            notice_text(&Notice::success("Deleted successfully".to_string())),
            "✓ Deleted successfully"
        );
        assert_eq!(
            notice_text(&Notice::error("Network failure".to_string())),
            "✗ Network failure"
        );
    }
}
