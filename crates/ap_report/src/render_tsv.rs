//! Tab-separated renderers. Output ends with a newline; cells never contain tabs
//! other than the separators.

use core::fmt::Write as _;

use ap_core::{Apportionment, Completion};

use crate::ComparisonTable;

/// `name  votes  [reference]  <method…>`, one line per row, then a `Total` line.
pub fn render_tsv(table: &ComparisonTable) -> String {
    let with_ref = table.has_reference();
    let mut out = String::new();

    out.push_str("name\tvotes");
    if with_ref {
        out.push_str("\treference");
    }
    for m in &table.methods {
        out.push('\t');
        out.push_str(&m.label);
    }
    out.push('\n');

    for r in &table.rows {
        let _ = write!(out, "{}\t{}", r.name, r.votes);
        if with_ref {
            let _ = write!(out, "\t{}", r.reference.unwrap_or(0));
        }
        for s in &r.seats {
            let _ = write!(out, "\t{s}");
        }
        out.push('\n');
    }

    let votes: f64 = table.rows.iter().map(|r| r.votes).sum();
    let _ = write!(out, "Total\t{votes}");
    if with_ref {
        let reference: u64 = table.rows.iter().map(|r| u64::from(r.reference.unwrap_or(0))).sum();
        let _ = write!(out, "\t{reference}");
    }
    for t in table.column_totals() {
        let _ = write!(out, "\t{t}");
    }
    out.push('\n');
    out
}

/// Single result: `name  votes  seats  bound`, with `<` / `>` for pinned rows.
/// Inexact outcomes add a trailing `#` comment line.
pub fn render_apportionment_tsv(result: &Apportionment) -> String {
    let mut out = String::from("name\tvotes\tseats\tbound\n");
    for r in &result.rows {
        let _ = writeln!(out, "{}\t{}\t{}\t{}", r.name, r.votes, r.seats, r.direction.marker());
    }
    match result.completion {
        Completion::Exact => {}
        Completion::Infeasible => {
            let _ = writeln!(out, "# infeasible: awarded {} of {}", result.awarded(), result.target);
        }
        Completion::Approximate => {
            let _ = writeln!(out, "# approximate: awarded {} of {}", result.awarded(), result.target);
        }
    }
    out
}
