//! Row table for any resource, driven by its column descriptors

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::dashboard::ui::Styles;
use crate::models::LoadState;
use crate::resources::common::pad;
use crate::resources::Column;

const NUMBER_WIDTH: usize = 4;

/// Header line: serial column followed by each column label
pub fn header_text<T>(columns: &[Column<T>]) -> String {
    let mut line = pad("#", NUMBER_WIDTH);
    for column in columns {
        line.push(' ');
        line.push_str(&pad(column.label, column.width as usize));
    }
    line
}

pub fn row_text<T>(columns: &[Column<T>], row: &T, number: u64) -> String {
    let mut line = pad(&number.to_string(), NUMBER_WIDTH);
    for column in columns {
        line.push(' ');
        line.push_str(&pad(&column.value(row), column.width as usize));
    }
    line
}

pub struct TableView<'a, T> {
    pub title: String,
    pub columns: &'a [Column<T>],
    pub rows: &'a [&'a T],
    pub first_number: u64,
    pub load_state: &'a LoadState,
}

/// Draw the table; rows stay visible while a refetch is in flight
pub fn render<T>(f: &mut Frame, area: Rect, view: &TableView<'_, T>, state: &mut ListState) {
    let title = match view.load_state {
        LoadState::Loading => format!("{} (loading…)", view.title),
        _ => view.title.clone(),
    };
    let block = Block::default()
        .title(Span::styled(title, Styles::title()))
        .borders(Borders::ALL)
        .border_style(Styles::active_border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(header_text(view.columns), Styles::title()))),
        chunks[0],
    );

    if view.rows.is_empty() {
        let message = match view.load_state {
            LoadState::Idle | LoadState::Loading => "Loading…".to_string(),
            LoadState::Failed(reason) => format!("Failed to load: {}", reason),
            LoadState::Loaded => "No records found".to_string(),
        };
        let style = if view.load_state.failure().is_some() {
            Styles::error()
        } else {
            Styles::inactive()
        };
        f.render_widget(Paragraph::new(message).style(style), chunks[1]);
        return;
    }

    let items: Vec<ListItem> = view
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            ListItem::new(row_text(view.columns, *row, view.first_number + index as u64))
        })
        .collect();

    let list = List::new(items).highlight_style(Styles::selected());
    f.render_stateful_widget(list, chunks[1], state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{Brand, Brands, Resource};
    use serde_json::json;

    #[test]
    fn test_row_text_lines_up_with_header() {
        let brand: Brand =
            serde_json::from_value(json!({"_id": "b1", "name": "Acme", "website": "acme.test"}))
                .unwrap();
        let columns = Brands.columns();
        let header = header_text(&columns);
        let row = row_text(&columns, &brand, 12);

        assert!(row.starts_with("12  "));
        assert!(row.contains("Acme"));
        assert_eq!(header.chars().count(), row.chars().count());
    }
}
