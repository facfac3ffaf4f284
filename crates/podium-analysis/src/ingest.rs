//! Loading and normalizing the placement table
//!
//! The table is a delimited text file whose *column names* are load-bearing;
//! column order is not. Every cell is coerced to its declared type here, so
//! later stages only ever see typed values. Range checks (year, place) and
//! eligibility-class checks are deliberately left to
//! [`validate`](crate::validate), which sees the whole table at once.
//!
//! # Examples
//!
//! ```
//! use podium_analysis::ingest::{self, Column};
//!
//! let csv = "\
//! Wrestler,School,Year,Weight,Place,Seed,Eligibility Year,Placement-Seed Delta
//! Jane Doe,State,2010,157,3,US,  jr ,0
//! ";
//! let table = ingest::read_table(csv.as_bytes()).unwrap();
//! assert_eq!(table.rows.len(), 1);
//! assert_eq!(table.rows[0].eligibility, "Jr");
//! assert_eq!(table.null_count(Column::Seed), 0);
//! ```

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::debug;

use crate::record::Seed;

/// Cell texts treated as missing values.
const NULL_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL"];

/// A named column of the placement table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Column {
    #[serde(rename = "Eligibility Year")]
    EligibilityYear,
    Year,
    Weight,
    Place,
    Wrestler,
    School,
    #[serde(rename = "Placement-Seed Delta")]
    PlacementSeedDelta,
    Seed,
    #[serde(rename = "Progression Eligible")]
    ProgressionEligible,
    #[serde(rename = "AAs")]
    AaCount,
}

impl Column {
    pub const ALL: [Self; 10] = [
        Self::EligibilityYear,
        Self::Year,
        Self::Weight,
        Self::Place,
        Self::Wrestler,
        Self::School,
        Self::PlacementSeedDelta,
        Self::Seed,
        Self::ProgressionEligible,
        Self::AaCount,
    ];

    /// Header text as it appears in the file.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::EligibilityYear => "Eligibility Year",
            Self::Year => "Year",
            Self::Weight => "Weight",
            Self::Place => "Place",
            Self::Wrestler => "Wrestler",
            Self::School => "School",
            Self::PlacementSeedDelta => "Placement-Seed Delta",
            Self::Seed => "Seed",
            Self::ProgressionEligible => "Progression Eligible",
            Self::AaCount => "AAs",
        }
    }

    #[must_use]
    pub fn is_required(self) -> bool {
        !matches!(
            self,
            Self::Seed | Self::ProgressionEligible | Self::AaCount
        )
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadError {
    #[display("failed to open {}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[display("malformed table: {_0}")]
    Csv(csv::Error),
    #[display("required column '{column}' is missing")]
    MissingColumn { column: &'static str },
    #[display("line {line}: column '{column}' has non-coercible value '{value}'")]
    InvalidValue {
        line: u64,
        column: &'static str,
        value: String,
    },
}

/// One row after type coercion.
///
/// Integer columns are kept wide; narrowing to the record's field types
/// happens during validation, where out-of-range values are reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line number in the source file.
    pub line: u64,
    pub wrestler: String,
    pub school: String,
    pub year: i64,
    pub weight: i64,
    pub place: i64,
    pub seed: Option<Seed>,
    /// Normalized eligibility text, not yet checked against the known classes.
    pub eligibility: String,
    pub placement_seed_delta: i64,
    pub progression_eligible: Option<bool>,
    pub aa_count: Option<i64>,
}

/// The coerced table plus per-column missing-value tallies.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub rows: Vec<RawRow>,
    pub null_counts: BTreeMap<Column, usize>,
    /// Cells of lenient columns (`Seed`, `Progression Eligible`) that could
    /// not be read and were loaded as missing.
    pub unparsed_counts: BTreeMap<Column, usize>,
}

impl RawTable {
    #[must_use]
    pub fn null_count(&self, column: Column) -> usize {
        self.null_counts.get(&column).copied().unwrap_or(0)
    }

    /// Columns with at least one missing value.
    pub fn columns_with_nulls(&self) -> impl Iterator<Item = (Column, usize)> + '_ {
        self.null_counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(column, count)| (*column, *count))
    }

    #[must_use]
    pub fn unparsed_count(&self, column: Column) -> usize {
        self.unparsed_counts.get(&column).copied().unwrap_or(0)
    }
}

/// Canonicalizes an eligibility cell: trim, title-case, then `Ssr` → `SSr`.
///
/// ```
/// # use podium_analysis::ingest::normalize_eligibility;
/// assert_eq!(normalize_eligibility(" ssr "), "SSr");
/// assert_eq!(normalize_eligibility("SO"), "So");
/// assert_eq!(normalize_eligibility("red-shirt"), "Red-Shirt");
/// ```
#[must_use]
pub fn normalize_eligibility(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_is_alpha = false;
    for ch in raw.trim().chars() {
        if ch.is_alphabetic() {
            if prev_is_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            out.push(ch);
            prev_is_alpha = false;
        }
    }
    if out == "Ssr" { "SSr".to_owned() } else { out }
}

/// Loads a table from disk.
///
/// Files with a `.tsv` extension are read tab-delimited; everything else is
/// read as CSV.
pub fn load_table(path: &Path) -> Result<RawTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    let delimiter = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    };
    let table = read_delimited(BufReader::new(file), delimiter)?;
    debug!(path = %path.display(), rows = table.rows.len(), "loaded placement table");
    Ok(table)
}

/// Reads a comma-separated table from any reader.
pub fn read_table<R: Read>(rdr: R) -> Result<RawTable, LoadError> {
    read_delimited(rdr, b',')
}

fn read_delimited<R: Read>(rdr: R, delimiter: u8) -> Result<RawTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(rdr);
    let header = ColumnIndex::new(reader.headers().map_err(LoadError::Csv)?)?;

    let mut table = RawTable {
        rows: Vec::new(),
        null_counts: Column::ALL
            .into_iter()
            .filter(|c| header.contains(*c))
            .map(|c| (c, 0))
            .collect(),
        unparsed_counts: BTreeMap::new(),
    };

    for result in reader.records() {
        let record = result.map_err(LoadError::Csv)?;
        let line = record.position().map_or(0, csv::Position::line);
        let mut cells = RowCells {
            record: &record,
            header: &header,
            line,
            null_counts: &mut table.null_counts,
            unparsed_counts: &mut table.unparsed_counts,
        };
        let row = RawRow {
            line,
            wrestler: cells.text(Column::Wrestler),
            school: cells.text(Column::School),
            year: cells.integer(Column::Year)?,
            weight: cells.integer(Column::Weight)?,
            place: cells.integer(Column::Place)?,
            seed: cells.lenient(Column::Seed, |s| s.parse::<Seed>().ok()),
            eligibility: normalize_eligibility(&cells.text(Column::EligibilityYear)),
            placement_seed_delta: cells.integer(Column::PlacementSeedDelta)?,
            progression_eligible: cells.lenient(Column::ProgressionEligible, parse_bool),
            aa_count: cells.optional(Column::AaCount, |s| s.parse::<i64>().ok())?,
        };
        table.rows.push(row);
    }

    Ok(table)
}

/// Maps each known column to its position in the header row.
struct ColumnIndex {
    positions: BTreeMap<Column, usize>,
}

impl ColumnIndex {
    fn new(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let mut positions = BTreeMap::new();
        for column in Column::ALL {
            match headers.iter().position(|h| h.trim() == column.name()) {
                Some(pos) => {
                    positions.insert(column, pos);
                }
                None if column.is_required() => {
                    return Err(LoadError::MissingColumn {
                        column: column.name(),
                    });
                }
                None => {}
            }
        }
        Ok(Self { positions })
    }

    fn contains(&self, column: Column) -> bool {
        self.positions.contains_key(&column)
    }

    fn position(&self, column: Column) -> Option<usize> {
        self.positions.get(&column).copied()
    }
}

struct RowCells<'a> {
    record: &'a csv::StringRecord,
    header: &'a ColumnIndex,
    line: u64,
    null_counts: &'a mut BTreeMap<Column, usize>,
    unparsed_counts: &'a mut BTreeMap<Column, usize>,
}

impl RowCells<'_> {
    /// Cell text, or `None` when the column is absent or the cell is a null
    /// marker. Nulls are tallied.
    fn cell(&mut self, column: Column) -> Option<&str> {
        let pos = self.header.position(column)?;
        let value = self.record.get(pos).unwrap_or("").trim();
        if NULL_MARKERS.contains(&value) {
            *self.null_counts.entry(column).or_default() += 1;
            None
        } else {
            Some(value)
        }
    }

    fn text(&mut self, column: Column) -> String {
        self.cell(column).unwrap_or_default().to_owned()
    }

    fn integer(&mut self, column: Column) -> Result<i64, LoadError> {
        let line = self.line;
        let value = self.cell(column);
        value
            .and_then(|v| v.parse::<i64>().ok())
            .ok_or_else(|| LoadError::InvalidValue {
                line,
                column: column.name(),
                value: value.unwrap_or_default().to_owned(),
            })
    }

    fn optional<T>(
        &mut self,
        column: Column,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<Option<T>, LoadError> {
        let line = self.line;
        let Some(value) = self.cell(column) else {
            return Ok(None);
        };
        match parse(value) {
            Some(parsed) => Ok(Some(parsed)),
            None => Err(LoadError::InvalidValue {
                line,
                column: column.name(),
                value: value.to_owned(),
            }),
        }
    }

    /// Like [`Self::optional`], but a value that does not parse is loaded as
    /// missing and tallied instead of failing the row.
    fn lenient<T>(&mut self, column: Column, parse: impl FnOnce(&str) -> Option<T>) -> Option<T> {
        let line = self.line;
        let value = self.cell(column)?;
        let parsed = parse(value);
        if parsed.is_none() {
            debug!(line, column = column.name(), value, "unreadable value loaded as missing");
            *self.unparsed_counts.entry(column).or_default() += 1;
        }
        parsed
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "t" | "1" => Some(true),
        "false" | "no" | "n" | "f" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const HEADER: &str =
        "Eligibility Year,Year,Weight,Place,Wrestler,School,Placement-Seed Delta";

    fn table(body: &str) -> Result<RawTable, LoadError> {
        read_table(format!("{HEADER}\n{body}").as_bytes())
    }

    #[test]
    fn test_normalize_eligibility_variants() {
        assert_eq!(normalize_eligibility("fr"), "Fr");
        assert_eq!(normalize_eligibility("  JR\t"), "Jr");
        assert_eq!(normalize_eligibility("SSR"), "SSr");
        assert_eq!(normalize_eligibility("sSr"), "SSr");
        assert_eq!(normalize_eligibility("gr"), "Gr");
    }

    #[test]
    fn test_column_order_is_irrelevant() {
        let csv = "\
Place,Wrestler,Year,Eligibility Year,School,Weight,Placement-Seed Delta
2,Jane Doe,2011,so,State,149,-1
";
        let table = read_table(csv.as_bytes()).unwrap();
        let row = &table.rows[0];
        assert_eq!(row.place, 2);
        assert_eq!(row.weight, 149);
        assert_eq!(row.eligibility, "So");
        assert_eq!(row.placement_seed_delta, -1);
        assert_eq!(row.seed, None);
        assert_eq!(row.line, 2);
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "Wrestler,Year,Weight,Place,School,Placement-Seed Delta\nA,2010,157,1,S,0\n";
        let err = read_table(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingColumn {
                column: "Eligibility Year"
            }
        ));
    }

    #[test]
    fn test_non_coercible_integer() {
        let err = table("Jr,twenty,157,1,A,S,0").unwrap_err();
        match err {
            LoadError::InvalidValue {
                line,
                column,
                value,
            } => {
                assert_eq!(line, 2);
                assert_eq!(column, "Year");
                assert_eq!(value, "twenty");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_integer_cell_is_fatal() {
        let err = table("Jr,2010,,1,A,S,0").unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidValue {
                column: "Weight",
                ..
            }
        ));
    }

    #[test]
    fn test_null_counts_and_empty_text() {
        let table = table("Jr,2010,157,1,,S,0\nSr,2011,157,2,NA,S,0").unwrap();
        assert_eq!(table.rows[0].wrestler, "");
        assert_eq!(table.rows[1].wrestler, "");
        assert_eq!(table.null_count(Column::Wrestler), 2);
        assert_eq!(table.null_count(Column::School), 0);
        let with_nulls: Vec<_> = table.columns_with_nulls().collect();
        assert_eq!(with_nulls, vec![(Column::Wrestler, 2)]);
    }

    #[test]
    fn test_optional_columns() {
        let csv = "\
Eligibility Year,Year,Weight,Place,Wrestler,School,Placement-Seed Delta,Seed,Progression Eligible,AAs
Jr,2010,157,1,A,S,0,1,Yes,3
Sr,2011,157,4,A,S,0,us,,
";
        let table = read_table(csv.as_bytes()).unwrap();
        assert_eq!(table.rows[0].seed, Some(Seed::Seeded(1)));
        assert_eq!(table.rows[0].progression_eligible, Some(true));
        assert_eq!(table.rows[0].aa_count, Some(3));
        assert_eq!(table.rows[1].seed, Some(Seed::Unseeded));
        assert_eq!(table.rows[1].progression_eligible, None);
        assert_eq!(table.null_count(Column::AaCount), 1);
    }

    #[test]
    fn test_unreadable_seed_and_flag_load_as_missing() {
        let csv = "\
Eligibility Year,Year,Weight,Place,Wrestler,School,Placement-Seed Delta,Seed,Progression Eligible
Jr,2010,157,1,A,S,0,1,yes
So,2010,157,2,B,S,0,NR,maybe
Fr,2010,157,3,C,S,0,US,no
";
        let table = read_table(csv.as_bytes()).unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[1].seed, None);
        assert_eq!(table.rows[1].progression_eligible, None);
        assert_eq!(table.rows[2].seed, Some(Seed::Unseeded));
        assert_eq!(table.unparsed_count(Column::Seed), 1);
        assert_eq!(table.unparsed_count(Column::ProgressionEligible), 1);
        assert_eq!(table.null_count(Column::Seed), 0);
    }

    #[test]
    fn test_unreadable_aa_count_is_fatal() {
        let csv = "\
Eligibility Year,Year,Weight,Place,Wrestler,School,Placement-Seed Delta,AAs
Jr,2010,157,1,A,S,0,three
";
        let err = read_table(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { column: "AAs", .. }));
    }

    #[test]
    fn test_load_csv_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("placements.csv");
        fs::write(
            &path,
            "Wrestler,Seed,Place,Year,Weight,School,Eligibility Year,Placement-Seed Delta\n\
             Jane Doe,4,2,2012,165,State,sr,2\n",
        )
        .unwrap();
        let table = load_table(&path).unwrap();
        assert_eq!(table.rows.len(), 1);
        let row = &table.rows[0];
        assert_eq!(row.wrestler, "Jane Doe");
        assert_eq!(row.seed, Some(Seed::Seeded(4)));
        assert_eq!(row.place, 2);
        assert_eq!(row.year, 2012);
        assert_eq!(row.eligibility, "Sr");
    }

    #[test]
    fn test_load_tsv_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("placements.TSV");
        fs::write(
            &path,
            "Place\tWrestler\tSchool\tYear\tWeight\tEligibility Year\tPlacement-Seed Delta\n\
             1\tSmith, John\tState\t2015\t141\tJr\t0\n",
        )
        .unwrap();
        let table = load_table(&path).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].wrestler, "Smith, John");
        assert_eq!(table.rows[0].weight, 141);
        assert_eq!(table.rows[0].eligibility, "Jr");
    }

    #[test]
    fn test_tab_separated_file_with_csv_extension_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("placements.csv");
        fs::write(
            &path,
            "Place\tWrestler\tSchool\tYear\tWeight\tEligibility Year\tPlacement-Seed Delta\n",
        )
        .unwrap();
        let err = load_table(&path).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.csv");
        let err = load_table(&path).unwrap_err();
        match err {
            LoadError::Io { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
