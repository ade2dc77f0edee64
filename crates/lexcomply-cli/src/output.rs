//! Plain-table and JSON rendering.

use anyhow::Result;
use lexcomply_core::{record_id, value_text, EntitySchema, Record};
use serde::Serialize;

/// Pretty JSON.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Left-aligned columns separated by two spaces, header first.
pub fn render_columns(header: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(header);
    out.push('\n');
    for row in rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

/// Records as a table: the identifier, then every listed field.
pub fn render_records(schema: &EntitySchema, rows: &[&Record]) -> String {
    let mut header = vec!["ID".to_string()];
    header.extend(schema.listed_fields().map(|f| f.label.to_string()));

    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let mut cells = vec![record_id(row, schema.id_field).unwrap_or_default()];
            cells.extend(schema.listed_fields().map(|f| {
                row.get(f.api_name)
                    .and_then(value_text)
                    .map(|t| one_line(&t))
                    .unwrap_or_default()
            }));
            cells
        })
        .collect();
    render_columns(&header, &body)
}

fn one_line(text: &str) -> String {
    const MAX: usize = 60;
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > MAX {
        let cut: String = flat.chars().take(MAX - 3).collect();
        format!("{cut}...")
    } else {
        flat
    }
}
