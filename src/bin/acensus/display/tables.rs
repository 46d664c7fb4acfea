use std::collections::BTreeMap;
use std::io::{self, Write};

use attn_census::{Aggregates, DistanceCurve, Element, ElementMatrix, Histogram};

use crate::util::text::{cell, count, truncate};

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

/// `batches` is only known right after extraction; snapshots do not record it.
pub fn print_run_summary(batches: Option<usize>, aggregates: &Aggregates) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let symbols = |elements: &[Element]| {
        elements
            .iter()
            .map(Element::symbol)
            .collect::<Vec<_>>()
            .join(" ")
    };

    let mut rows = Vec::new();
    if let Some(batches) = batches {
        rows.push(("Batches", count(batches as u64)));
    }
    rows.extend([
        ("Atoms", count(aggregates.total_atoms())),
        ("Attention Edges", count(aggregates.edge_count() as u64)),
        ("Elements", symbols(&aggregates.element_ids)),
        ("Bonded Elements", symbols(&aggregates.reference_element_ids)),
    ]);

    print_kv_table(&mut out, "Census Summary", &rows);
}

pub fn print_atom_counts(counts: &BTreeMap<Element, u64>) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let total: u64 = counts.values().sum();
    let mut sorted: Vec<(String, u64)> = counts
        .iter()
        .map(|(e, c)| (e.name().to_string(), *c))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));

    print_distribution_table(&mut out, "Element Distribution", &sorted, total);
}

/// Prints a square element matrix with `NA` for undefined cells.
pub fn print_matrix(title: &str, matrix: &ElementMatrix) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let label_w = 4usize;
    let cell_w = 7usize;
    let n = matrix.len();

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );

    if matrix.is_empty() {
        let _ = writeln!(out, "{}  (no elements)", INDENT);
        return;
    }

    let rule = |left: &str, mid: &str, right: &str| {
        format!(
            "{}{}{}{}{}",
            INDENT,
            left,
            "─".repeat(label_w + 2),
            format!("{}{}", mid, "─".repeat(cell_w + 2)).repeat(n),
            right
        )
    };

    let _ = writeln!(out, "{}", rule("┌", "┬", "┐"));

    let mut header = format!("{}│ {:<label_w$} ", INDENT, "", label_w = label_w);
    for element in matrix.elements() {
        header.push_str(&format!("│ {:>cell_w$} ", element.symbol(), cell_w = cell_w));
    }
    let _ = writeln!(out, "{}│", header);
    let _ = writeln!(out, "{}", rule("├", "┼", "┤"));

    for (element, row) in matrix.elements().iter().zip(matrix.rows()) {
        let mut line = format!(
            "{}│ {:<label_w$} ",
            INDENT,
            element.symbol(),
            label_w = label_w
        );
        for value in row {
            line.push_str(&format!("│ {:>cell_w$} ", cell(*value, 4), cell_w = cell_w));
        }
        let _ = writeln!(out, "{}│", line);
    }

    let _ = writeln!(out, "{}", rule("└", "┴", "┘"));
}

pub fn print_curve_summary(curve: &DistanceCurve, histogram: &Histogram) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let mut rows = vec![
        ("Pair", curve.pair.to_string()),
        ("Samples", count(curve.len() as u64)),
        ("Window", count(curve.window as u64)),
        ("Smoothed", count(curve.defined_count() as u64)),
    ];

    if !curve.is_empty() {
        rows.push((
            "Distance (Å)",
            format!("{:.3} – {:.3}", histogram.lower, histogram.upper),
        ));
    }
    if let Some((bin, n)) = histogram.mode() {
        let (lo, hi) = histogram.bin_edges(bin);
        rows.push(("Densest Bin (Å)", format!("{:.3} – {:.3} ({})", lo, hi, count(n))));
    }

    let smoothed: Vec<f64> = curve.points.iter().filter_map(|p| p.attention).collect();
    if let (Some(min), Some(max)) = (
        smoothed.iter().copied().reduce(f64::min),
        smoothed.iter().copied().reduce(f64::max),
    ) {
        rows.push(("Attention", format!("{:.4} – {:.4}", min, max)));
    }

    print_kv_table(&mut out, "Distance Curve", &rows);
}

fn print_distribution_table(out: &mut impl Write, title: &str, data: &[(String, u64)], total: u64) {
    let name_w = 10usize;
    let count_w = 12usize;
    let sep_overhead = 6;
    let dist_w = SAFE_TABLE_WIDTH.saturating_sub(name_w + count_w + sep_overhead);
    let max_bar_width = dist_w.saturating_sub(8).min(20);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{name_line}┬{count_line}┬{dist_line}┐",
        INDENT,
        name_line = "─".repeat(name_w + 2),
        count_line = "─".repeat(count_w + 2),
        dist_line = "─".repeat(dist_w + 2)
    );
    let _ = writeln!(
        out,
        "{}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
        INDENT,
        "Element",
        "Atoms",
        "Distribution",
    );
    let _ = writeln!(
        out,
        "{}├{name_line}┼{count_line}┼{dist_line}┤",
        INDENT,
        name_line = "─".repeat(name_w + 2),
        count_line = "─".repeat(count_w + 2),
        dist_line = "─".repeat(dist_w + 2)
    );

    for (name, n) in data {
        let pct = if total > 0 {
            (*n as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        let bar = make_bar(pct, max_bar_width);
        let dist_cell = format!("{}  {:>5.1}%", bar, pct);
        let _ = writeln!(
            out,
            "{}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
            INDENT,
            truncate(name, name_w),
            count(*n),
            dist_cell,
        );
    }

    let _ = writeln!(
        out,
        "{}└{name_line}┴{count_line}┴{dist_line}┘",
        INDENT,
        name_line = "─".repeat(name_w + 2),
        count_line = "─".repeat(count_w + 2),
        dist_line = "─".repeat(dist_w + 2)
    );
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{k_line}┬{v_line}┐",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
    let _ = writeln!(
        out,
        "{}│ {:<key_w$} │ {:>val_w$} │",
        INDENT, "Metric", "Value",
    );
    let _ = writeln!(
        out,
        "{}├{k_line}┼{v_line}┤",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );

    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:>val_w$} │",
            INDENT,
            truncate(key, key_w),
            truncate(val, val_w),
        );
    }

    let _ = writeln!(
        out,
        "{}└{k_line}┴{v_line}┘",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
}

fn make_bar(pct: f64, max_width: usize) -> String {
    let filled = ((pct / 100.0) * max_width as f64).round() as usize;
    let empty = max_width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(make_bar(50.0, 4), "██░░");
        assert_eq!(make_bar(0.0, 3), "░░░");
        assert_eq!(make_bar(100.0, 2), "██");
    }
}
