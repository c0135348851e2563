//! Tab-separated vote tables: `name<TAB>votes[<TAB>reference_seats]`.
//!
//! - Cells are trimmed; lines with fewer than two cells are skipped.
//! - Lines starting with `#` are comments.
//! - Votes accept integers and decimals, with `_` or `,` as digit separators.
//! - An optional third cell carries reference seats (e.g. an official result).
//! - Row order is kept; it is the table's presentation order.

use std::fs;
use std::path::Path;

use ap_core::Contender;

use crate::{IoError, IoResult};

#[derive(Clone, Debug, PartialEq)]
pub struct TableRow {
    pub name: String,
    pub votes: f64,
    pub reference: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VoteTable {
    pub rows: Vec<TableRow>,
}

impl VoteTable {
    pub fn contenders(&self) -> Vec<Contender> {
        self.rows.iter().map(|r| Contender::new(r.name.clone(), r.votes)).collect()
    }

    /// True when every row carries reference seats.
    pub fn has_reference(&self) -> bool {
        !self.rows.is_empty() && self.rows.iter().all(|r| r.reference.is_some())
    }

    pub fn reference_of(&self, name: &str) -> Option<u32> {
        self.rows.iter().find(|r| r.name == name).and_then(|r| r.reference)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn load_table(path: &Path) -> IoResult<VoteTable> {
    let text = fs::read_to_string(path)
        .map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    parse_table(&text)
}

pub fn parse_table(text: &str) -> IoResult<VoteTable> {
    let mut rows = Vec::new();
    for (ix, raw) in text.lines().enumerate() {
        let line = ix + 1;
        if raw.trim_start().starts_with('#') {
            continue;
        }
        let cells: Vec<&str> = raw.split('\t').map(str::trim).collect();
        if cells.len() < 2 || cells[0].is_empty() {
            continue;
        }

        let votes = parse_number(cells[1])
            .ok_or_else(|| IoError::Parse { line, msg: format!("votes {:?} is not a number", cells[1]) })?;

        let reference = match cells.get(2).copied() {
            None | Some("") => None,
            Some(cell) => Some(cell.parse::<u32>().map_err(|_| IoError::Parse {
                line,
                msg: format!("reference seats {cell:?} is not a non-negative integer"),
            })?),
        };

        rows.push(TableRow { name: cells[0].to_string(), votes, reference });
    }
    Ok(VoteTable { rows })
}

fn parse_number(cell: &str) -> Option<f64> {
    let cleaned: String = cell.chars().filter(|c| !matches!(c, '_' | ',')).collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}
