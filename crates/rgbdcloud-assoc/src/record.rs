use std::{collections::HashMap, path::Path};

use crate::error::AssocError;

/// Marker of a comment line in stamped text files.
const COMMENT_MARKER: char = '#';

/// One line of a stamped text file: a timestamp followed by opaque fields.
#[derive(Debug, Clone, PartialEq)]
pub struct StampedRecord {
    /// The timestamp in seconds.
    pub stamp: f64,
    /// The remaining tokens of the line, verbatim.
    pub fields: Vec<String>,
}

/// Insertion-ordered mapping from timestamp to record.
///
/// Inserting a stamp that is already present replaces its fields in place
/// (last write wins) while the record keeps the position of its first
/// appearance. The number of such collapses is tracked in [`RecordSet::duplicates`].
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<StampedRecord>,
    index: HashMap<u64, usize>,
    duplicates: usize,
}

// 0.0 and -0.0 compare equal and must map to the same key.
fn stamp_key(stamp: f64) -> u64 {
    if stamp == 0.0 {
        0.0f64.to_bits()
    } else {
        stamp.to_bits()
    }
}

impl RecordSet {
    /// Create an empty record set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the fields it replaced if the stamp was already present.
    pub fn insert(&mut self, stamp: f64, fields: Vec<String>) -> Option<Vec<String>> {
        match self.index.get(&stamp_key(stamp)) {
            Some(&i) => {
                self.duplicates += 1;
                Some(std::mem::replace(&mut self.records[i].fields, fields))
            }
            None => {
                self.index.insert(stamp_key(stamp), self.records.len());
                self.records.push(StampedRecord { stamp, fields });
                None
            }
        }
    }

    /// Get the fields recorded for a stamp.
    pub fn get(&self, stamp: f64) -> Option<&[String]> {
        self.index
            .get(&stamp_key(stamp))
            .map(|&i| self.records[i].fields.as_slice())
    }

    /// Check whether a stamp is present.
    pub fn contains(&self, stamp: f64) -> bool {
        self.index.contains_key(&stamp_key(stamp))
    }

    /// Number of unique stamps.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of inserts that collapsed onto an existing stamp.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// The stamps in insertion order.
    pub fn stamps(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.stamp)
    }

    /// The records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, StampedRecord> {
        self.records.iter()
    }
}

impl FromIterator<(f64, Vec<String>)> for RecordSet {
    fn from_iter<I: IntoIterator<Item = (f64, Vec<String>)>>(iter: I) -> Self {
        let mut set = RecordSet::new();
        for (stamp, fields) in iter {
            set.insert(stamp, fields);
        }
        set
    }
}

/// Parse a timestamp token, rejecting anything that is not a finite number.
pub(crate) fn parse_stamp(token: &str, line: usize) -> Result<f64, AssocError> {
    let stamp = token
        .parse::<f64>()
        .map_err(|e| AssocError::ParseError {
            line,
            token: token.to_string(),
            reason: e.to_string(),
        })?;

    if !stamp.is_finite() {
        return Err(AssocError::ParseError {
            line,
            token: token.to_string(),
            reason: "timestamp is not finite".to_string(),
        });
    }

    Ok(stamp)
}

/// Parse stamped text into a [`RecordSet`].
///
/// Format: `stamp d1 d2 d3 ...` per line, separated by spaces, commas or tabs.
/// Empty lines and lines starting with `#` are ignored, as are lines with no
/// field after the stamp. A stamp that is not a number is an error.
///
/// # Example
///
/// ```
/// use rgbdcloud_assoc::record::parse_stamped_records;
///
/// let text = "# timestamp filename\n1.0 rgb/1.png\n1.5,rgb/2.png\n";
/// let records = parse_stamped_records(text).unwrap();
///
/// assert_eq!(records.len(), 2);
/// assert_eq!(records.get(1.5).unwrap(), &["rgb/2.png".to_string()]);
/// ```
pub fn parse_stamped_records(text: &str) -> Result<RecordSet, AssocError> {
    let mut records = RecordSet::new();

    for (i, line) in text.lines().enumerate() {
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }

        let normalized = line.replace(|c: char| c == ',' || c == '\t', " ");
        let tokens = normalized.split_whitespace().collect::<Vec<_>>();
        if tokens.len() < 2 {
            continue;
        }

        let stamp = parse_stamp(tokens[0], i + 1)?;
        records.insert(stamp, tokens[1..].iter().map(|s| s.to_string()).collect());
    }

    if records.duplicates() > 0 {
        log::warn!(
            "{} records share a timestamp with an earlier record and were collapsed",
            records.duplicates()
        );
    }

    Ok(records)
}

/// Read a stamped text file into a [`RecordSet`].
///
/// # Arguments
///
/// * `path` - The path to the file, e.g. `rgb.txt`, `depth.txt` or `groundtruth.txt`.
pub fn read_stamped_file(path: impl AsRef<Path>) -> Result<RecordSet, AssocError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let records = parse_stamped_records(&text)?;
    log::debug!(
        "read {} stamped records from {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(records)
}
