//! GFM tables: padded cells, columns aligned to their widest cell, and a
//! delimiter row that encodes each column's alignment.

use super::phrasing;
use crate::tree::{Align, Node};

pub(super) fn table(node: &Node, align: &[Option<Align>]) -> String {
    let rows: Vec<Vec<String>> = node.children.iter().map(cells).collect();
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return String::new();
    }

    let alignment: Vec<Option<Align>> = (0..columns)
        .map(|column| align.get(column).copied().flatten())
        .collect();

    let mut widths = vec![0; columns];
    for row in &rows {
        for (column, cell) in row.iter().enumerate() {
            widths[column] = widths[column].max(width(cell));
        }
    }

    let delimiters: Vec<String> = alignment
        .iter()
        .zip(widths.iter_mut())
        .map(|(align, width)| {
            let (before, after) = match align {
                Some(Align::Left) => (":", ""),
                Some(Align::Right) => ("", ":"),
                Some(Align::Center) => (":", ":"),
                None => ("", ""),
            };
            let dashes = width.saturating_sub(before.len() + after.len()).max(1);
            *width = (*width).max(before.len() + dashes + after.len());
            format!("{before}{}{after}", "-".repeat(dashes))
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (index, row) in rows.iter().enumerate() {
        lines.push(line(row, &widths, &alignment));
        if index == 0 {
            lines.push(line(&delimiters, &widths, &alignment));
        }
    }
    lines.join("\n")
}

/// A row on its own, without column alignment.
pub(super) fn row(node: &Node) -> String {
    let cells = cells(node);
    let widths: Vec<usize> = cells.iter().map(|cell| width(cell)).collect();
    line(&cells, &widths, &[])
}

fn cells(row: &Node) -> Vec<String> {
    row.children
        .iter()
        .map(|cell| phrasing(&cell.children).replace('|', "\\|"))
        .collect()
}

fn line(cells: &[String], widths: &[usize], alignment: &[Option<Align>]) -> String {
    let mut out = String::from("|");
    for (column, size) in widths.iter().enumerate() {
        let cell = cells.get(column).map(String::as_str).unwrap_or_default();
        let pad = size.saturating_sub(width(cell));
        let (before, after) = match alignment.get(column).copied().flatten() {
            Some(Align::Right) => (pad, 0),
            Some(Align::Center) => (pad - pad / 2, pad / 2),
            _ => (0, pad),
        };
        out.push(' ');
        out.push_str(&" ".repeat(before));
        out.push_str(cell);
        out.push_str(&" ".repeat(after));
        out.push_str(" |");
    }
    out
}

fn width(cell: &str) -> usize {
    cell.chars().count()
}
