//! Plain text renderer.

use crate::model::{Block, CellAlignment, Document, Table};
use unicode_width::UnicodeWidthStr;

/// Render every slide as plain text: text shapes as lines, tables as grids.
pub fn to_text(doc: &Document) -> String {
    let mut output = String::new();

    for slide in &doc.slides {
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(&format!("Slide {}\n", slide.index + 1));

        for block in &slide.content {
            match block {
                Block::Text { paragraphs, .. } => {
                    for paragraph in paragraphs {
                        output.push_str(paragraph);
                        output.push('\n');
                    }
                }
                Block::Table(table) => {
                    if let Some(ref name) = table.name {
                        output.push_str(&format!("[{}]\n", name));
                    }
                    output.push_str(&table_to_text(table));
                    output.push('\n');
                }
            }
        }
    }

    output.trim_end().to_string()
}

/// Render a table as an ASCII grid.
///
/// Column widths use terminal display width, so wide (CJK) characters line
/// up. The first row is set off as a header when more rows follow.
pub fn table_to_text(table: &Table) -> String {
    let col_count = table.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
    if col_count == 0 {
        return String::new();
    }

    let texts: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.cells.iter().map(|c| c.plain_text().replace('\n', " ")).collect())
        .collect();

    let mut widths = vec![3usize; col_count];
    for row in &texts {
        for (i, text) in row.iter().enumerate().take(col_count) {
            widths[i] = widths[i].max(text.width());
        }
    }

    let rule = |fill: char| {
        let mut line = String::from("+");
        for w in &widths {
            line.extend(std::iter::repeat(fill).take(w + 2));
            line.push('+');
        }
        line.push('\n');
        line
    };

    let mut output = rule('-');
    for (row_idx, row) in table.rows.iter().enumerate() {
        output.push('|');
        for (i, width) in widths.iter().enumerate() {
            let text = texts[row_idx].get(i).map(String::as_str).unwrap_or("");
            let alignment = row.cells.get(i).map(|c| c.alignment).unwrap_or_default();
            output.push(' ');
            output.push_str(&pad(text, *width, alignment));
            output.push_str(" |");
        }
        output.push('\n');

        if row_idx == 0 && table.rows.len() > 1 {
            output.push_str(&rule('='));
        }
    }
    output.push_str(rule('-').trim_end());
    output
}

fn pad(text: &str, width: usize, alignment: CellAlignment) -> String {
    let gap = width.saturating_sub(text.width());
    let (before, after) = match alignment {
        CellAlignment::Right => (gap, 0),
        CellAlignment::Center => (gap / 2, gap - gap / 2),
        CellAlignment::Left | CellAlignment::Justify => (0, gap),
    };
    format!("{}{}{}", " ".repeat(before), text, " ".repeat(after))
}
