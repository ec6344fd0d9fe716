//! Geometric grouping of positioned words into lines and tables.

use super::document::{Table, Word};
use crate::models::period::month_in_token;

/// Months a line must label to be treated as a table header.
const MIN_HEADER_MONTHS: usize = 3;

/// Group words into lines by vertical position, left to right within a line.
pub fn group_lines(words: &[Word], y_tolerance: f64) -> Vec<Vec<&Word>> {
    let mut sorted: Vec<&Word> = words.iter().collect();
    sorted.sort_by(|a, b| {
        a.top
            .partial_cmp(&b.top)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut lines: Vec<Vec<&Word>> = Vec::new();
    let mut current_y = f64::NEG_INFINITY;
    for word in sorted {
        match lines.last_mut() {
            Some(line) if (word.top - current_y).abs() <= y_tolerance => line.push(word),
            _ => {
                lines.push(vec![word]);
                current_y = word.top;
            }
        }
    }

    for line in &mut lines {
        line.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap_or(std::cmp::Ordering::Equal));
    }
    lines
}

fn header_anchors(line: &[&Word]) -> Vec<f64> {
    line.iter()
        .filter(|w| month_in_token(&w.text).is_some())
        .map(|w| w.x0)
        .collect()
}

fn join(words: &[&Word]) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(
            words
                .iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}

/// Split one line into a label cell followed by one cell per column anchor.
///
/// A word belongs to column `i` when `anchor[i] - tol <= x0 < anchor[i + 1] - tol`;
/// everything left of the first band is the label.
fn split_row(line: &[&Word], anchors: &[f64], tolerance: f64) -> Vec<Option<String>> {
    let mut cells: Vec<Vec<&Word>> = vec![Vec::new(); anchors.len() + 1];
    for word in line {
        let column = anchors
            .iter()
            .rposition(|anchor| word.x0 >= anchor - tolerance)
            .map(|i| i + 1)
            .unwrap_or(0);
        cells[column].push(word);
    }
    cells.iter().map(|c| join(c)).collect()
}

/// Rebuild tables from positioned words.
///
/// Each line naming at least three months starts a table whose columns are
/// anchored at the month words. Following lines become rows until the next
/// header line.
pub fn detect_tables(words: &[Word], y_tolerance: f64, column_tolerance: f64) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut current: Option<(Vec<f64>, Table)> = None;

    for line in group_lines(words, y_tolerance) {
        let anchors = header_anchors(&line);
        if anchors.len() >= MIN_HEADER_MONTHS {
            if let Some((_, table)) = current.take() {
                tables.push(table);
            }
            let header = split_row(&line, &anchors, column_tolerance);
            current = Some((anchors, vec![header]));
            continue;
        }

        if let Some((anchors, table)) = current.as_mut() {
            table.push(split_row(&line, anchors, column_tolerance));
        }
    }

    if let Some((_, table)) = current {
        tables.push(table);
    }
    tables.retain(|t| t.len() >= 2);
    tables
}
