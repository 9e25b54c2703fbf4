use std::collections::HashMap;
use std::fmt;
use serde_json::Value;
use crate::types::{AlignMethod, DirectoryRecord, Row};

///
/// Counts reported after every alignment pass
///
#[derive(Debug, PartialEq, Clone)]
pub struct AlignReport {
    pub method: AlignMethod,

    /// Aligned records passed in from earlier passes
    pub previous: usize,

    /// Records aligned by this pass
    pub newly: usize,

    /// Records left unaligned after this pass
    pub not_aligned: usize
}

impl AlignReport {
    pub fn total(&self) -> usize {
        self.previous + self.newly
    }
}

impl fmt::Display for AlignReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "method: {}, total aligned: {}, newly aligned: {}, not aligned: {}",
            self.method,
            self.total(),
            self.newly,
            self.not_aligned
        )
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Alignment {
    /// Previously aligned records followed by the records aligned in this pass
    pub aligned: Vec<DirectoryRecord>,

    /// Records still without a canonical name, carrying only their own columns
    pub not_aligned: Vec<DirectoryRecord>,

    pub report: AlignReport
}

///
/// Join key of a cell. Missing and null cells never match
///
/// Numbers and booleans compare by their text, so a number `1` joins the string
/// `"1"`. CSV cells are always strings, so this only matters for rows built
/// from other JSON input.
///
pub fn join_key(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.to_owned()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None
    }
}

///
/// Exact left join of `not_aligned[left]` against `canonical[right]`
///
/// Every unaligned record whose key equals the key of at least one canonical row
/// is aligned with `method`, its row extended with the canonical columns, and
/// appended after `aligned`. Records without a match are returned unchanged.
///
/// The join is one-to-many: a key matching several canonical rows yields one
/// aligned record per canonical row, with no deduplication.
///
/// Inputs are never mutated. A canonical column that would overwrite a column
/// of the unaligned row is an error, except for a shared join column.
///
pub fn align_on_column(
    not_aligned: &[DirectoryRecord],
    canonical: &[Row],
    aligned: &[DirectoryRecord],
    left: &str,
    right: &str,
    method: AlignMethod
) -> Result<Alignment, String> {
    align_with(not_aligned, canonical, aligned, left, right, method, |record| join_key(record.props.get(left)))
}

///
/// Left join of every unaligned record against `canonical[right]`, keyed by `key`
///
/// Records for which `key` returns None or an unknown key stay unaligned. Joined
/// columns, collisions and one-to-many expansion follow `align_on_column`.
///
pub fn align_with<F>(
    not_aligned: &[DirectoryRecord],
    canonical: &[Row],
    aligned: &[DirectoryRecord],
    left: &str,
    right: &str,
    method: AlignMethod,
    key: F
) -> Result<Alignment, String>
    where F: Fn(&DirectoryRecord) -> Option<String>
{
    let mut index: HashMap<String, Vec<&Row>> = HashMap::new();
    for row in canonical {
        if let Some(key) = join_key(row.get(right)) {
            index.entry(key).or_insert_with(Vec::new).push(row);
        }
    }

    let mut newly: Vec<DirectoryRecord> = Vec::new();
    let mut still: Vec<DirectoryRecord> = Vec::new();

    for record in not_aligned {
        let matches = match key(record) {
            Some(key) => index.get(&key),
            None => None
        };

        let matches = match matches {
            Some(matches) => matches,
            None => {
                still.push(record.clone());
                continue;
            }
        };

        for row in matches {
            let mut joined = record.clone();

            for (column, value) in row.iter() {
                if column == right && left == right {
                    continue;
                }

                if joined.props.contains_key(column) {
                    return Err(format!("Joining on {} and {}: column {} exists on both sides", left, right, column));
                }

                joined.props.insert(column.clone(), value.clone());
            }

            let name = match row.get(right) {
                Some(Value::String(name)) => name.clone(),
                other => join_key(other).unwrap_or_default()
            };

            joined.align(name, method)?;
            newly.push(joined);
        }
    }

    let report = AlignReport {
        method,
        previous: aligned.len(),
        newly: newly.len(),
        not_aligned: still.len()
    };

    let mut all: Vec<DirectoryRecord> = Vec::with_capacity(aligned.len() + newly.len());
    all.extend(aligned.iter().cloned());
    all.append(&mut newly);

    Ok(Alignment {
        aligned: all,
        not_aligned: still,
        report
    })
}
