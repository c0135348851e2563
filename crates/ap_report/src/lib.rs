//! ap_report: side-by-side comparison of methods over one vote table, plus
//! TSV / JSON renderers.
//!
//! Determinism rules:
//! - No file I/O here. Callers supply tables already in memory.
//! - Rows keep the table's input order; method columns keep the caller's order.
//! - JSON output is canonical (sorted keys, compact).

#![forbid(unsafe_code)]

use ap_algo::Method;
use ap_core::{AllocError, Apportionment, Completion, Limits, SeatBounds};
use ap_io::{IoError, VoteTable};
use serde::Serialize;
use thiserror::Error;

pub mod render_json;
pub mod render_tsv;

pub use render_json::render_json;
pub use render_tsv::{render_apportionment_tsv, render_tsv};

// ===== Errors =====

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("method {method}: {source}")]
    Alloc {
        method: String,
        #[source]
        source: AllocError,
    },

    #[error(transparent)]
    Io(#[from] IoError),

    #[error("inconsistent report: {0}")]
    Inconsistent(String),
}

// ===== Model =====

/// One method column.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MethodColumn {
    pub label: String,
    pub token: String,
    pub completion: Completion,
    pub awarded: u64,
    pub result_id: String,
}

/// One entity row; `seats[i]` belongs to `methods[i]`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub name: String,
    pub votes: f64,
    pub reference: Option<u32>,
    pub seats: Vec<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComparisonTable {
    pub target: u32,
    pub methods: Vec<MethodColumn>,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    /// Every row carries reference seats.
    pub fn has_reference(&self) -> bool {
        !self.rows.is_empty() && self.rows.iter().all(|r| r.reference.is_some())
    }

    /// `computed − reference` per row and method, when every row has a reference.
    pub fn deltas(&self) -> Option<Vec<Vec<i64>>> {
        if !self.has_reference() {
            return None;
        }
        Some(
            self.rows
                .iter()
                .map(|r| {
                    let reference = i64::from(r.reference.unwrap_or(0));
                    r.seats.iter().map(|&s| i64::from(s) - reference).collect()
                })
                .collect(),
        )
    }

    /// Σ |delta| per method column.
    pub fn total_deviation(&self) -> Option<Vec<u64>> {
        let deltas = self.deltas()?;
        let mut out = vec![0u64; self.methods.len()];
        for row in &deltas {
            for (acc, d) in out.iter_mut().zip(row) {
                *acc += d.unsigned_abs();
            }
        }
        Some(out)
    }

    /// Seats per method column (Σ over rows).
    pub fn column_totals(&self) -> Vec<u64> {
        (0..self.methods.len())
            .map(|i| self.rows.iter().map(|r| u64::from(r.seats[i])).sum())
            .collect()
    }
}

// ===== API =====

/// Run every method on the same table.
pub fn compare(
    table: &VoteTable,
    methods: &[Method],
    num_seats: u32,
    bounds: SeatBounds,
    limits: &Limits,
) -> Result<ComparisonTable, ReportError> {
    let contenders = table.contenders();

    let mut columns = Vec::with_capacity(methods.len());
    let mut results: Vec<Apportionment> = Vec::with_capacity(methods.len());
    for m in methods {
        let a = m
            .apportion(&contenders, num_seats, bounds, limits)
            .map_err(|source| ReportError::Alloc { method: m.label(), source })?;
        columns.push(MethodColumn {
            label: m.label(),
            token: m.token(),
            completion: a.completion,
            awarded: a.awarded(),
            result_id: ap_io::result_id(&a)?,
        });
        results.push(a);
    }

    let rows = table
        .rows
        .iter()
        .map(|tr| {
            let seats = results
                .iter()
                .zip(&columns)
                .map(|(a, col)| {
                    a.seats_of(&tr.name).ok_or_else(|| {
                        ReportError::Inconsistent(format!("{} has no row for {}", col.label, tr.name))
                    })
                })
                .collect::<Result<Vec<u32>, ReportError>>()?;
            Ok(ComparisonRow { name: tr.name.clone(), votes: tr.votes, reference: tr.reference, seats })
        })
        .collect::<Result<Vec<_>, ReportError>>()?;

    Ok(ComparisonTable { target: num_seats, methods: columns, rows })
}

/// Entities grouped by seat count: seats ↓, names ↑ within a group.
pub fn group_by_seats(result: &Apportionment) -> Vec<(u32, Vec<String>)> {
    let mut groups: Vec<(u32, Vec<String>)> = Vec::new();
    for row in &result.rows {
        match groups.last_mut() {
            Some((seats, names)) if *seats == row.seats => names.push(row.name.clone()),
            _ => groups.push((row.seats, vec![row.name.clone()])),
        }
    }
    for (_, names) in groups.iter_mut() {
        names.sort();
    }
    groups
}
