//! Range assertions and eligibility filtering
//!
//! Turns a [`RawTable`] into a typed [`Dataset`]. Out-of-range years and
//! places abort the run; values are never clamped. Rows whose eligibility is
//! not one of the five known classes are dropped with a warning. Missing
//! values and unreadable seeds or progression flags are reported but
//! otherwise tolerated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    ingest::{Column, RawRow, RawTable},
    record::{Dataset, Eligibility, PlacementRecord},
};

/// Lowest and highest possible final place.
pub const PLACE_RANGE: std::ops::RangeInclusive<i64> = 1..=8;

/// Accepted season bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    pub year_floor: i32,
    pub year_ceiling: i32,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            year_floor: 1999,
            year_ceiling: 2025,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ValidationError {
    #[display(
        "line {line} ({wrestler}): year {year} outside [{floor}, {ceiling}]"
    )]
    YearOutOfRange {
        line: u64,
        wrestler: String,
        year: i64,
        floor: i32,
        ceiling: i32,
    },
    #[display("line {line} ({wrestler}): place {place} outside [1, 8]")]
    PlaceOutOfRange {
        line: u64,
        wrestler: String,
        place: i64,
    },
    #[display("line {line} ({wrestler}): column '{column}' value {value} out of range")]
    ValueOutOfRange {
        line: u64,
        wrestler: String,
        column: &'static str,
        value: i64,
    },
    #[display("no rows with a known eligibility class remain")]
    Empty,
}

/// What validation saw and kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub rows_in: usize,
    pub rows_retained: usize,
    /// Unknown eligibility text and the number of rows dropped for it.
    pub unknown_eligibility: BTreeMap<String, usize>,
    pub null_counts: BTreeMap<Column, usize>,
    /// Unreadable `Seed` and `Progression Eligible` cells, loaded as missing.
    pub unparsed_counts: BTreeMap<Column, usize>,
}

impl ValidationReport {
    #[must_use]
    pub fn rows_dropped(&self) -> usize {
        self.rows_in - self.rows_retained
    }
}

/// Validates every row and builds the dataset.
///
/// Fatal range checks run over the whole table before any row is dropped,
/// so an out-of-range value is reported even on a row whose eligibility is
/// unknown.
pub fn validate(
    table: RawTable,
    policy: &ValidationPolicy,
) -> Result<(Dataset, ValidationReport), ValidationError> {
    for row in &table.rows {
        check_ranges(row, policy)?;
    }

    let mut report = ValidationReport {
        rows_in: table.rows.len(),
        null_counts: table.null_counts.clone(),
        unparsed_counts: table.unparsed_counts.clone(),
        ..ValidationReport::default()
    };
    for (column, count) in table.columns_with_nulls() {
        warn!(column = column.name(), count, "column contains missing values");
    }
    for (column, count) in &report.unparsed_counts {
        warn!(column = column.name(), count, "unreadable values treated as missing");
    }

    let mut records = Vec::with_capacity(table.rows.len());
    for row in table.rows {
        match row.eligibility.parse::<Eligibility>() {
            Ok(eligibility) => records.push(into_record(row, eligibility)?),
            Err(_) => *report.unknown_eligibility.entry(row.eligibility).or_default() += 1,
        }
    }
    report.rows_retained = records.len();

    if !report.unknown_eligibility.is_empty() {
        let values = report
            .unknown_eligibility
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        warn!(
            values,
            retained = report.rows_retained,
            dropped = report.rows_dropped(),
            "dropped rows with unknown eligibility"
        );
    }

    let dataset = Dataset::new(records).ok_or(ValidationError::Empty)?;
    info!(
        rows = dataset.len(),
        year_min = dataset.year_min(),
        year_max = dataset.year_max(),
        "validated placement table"
    );
    Ok((dataset, report))
}

fn check_ranges(row: &RawRow, policy: &ValidationPolicy) -> Result<(), ValidationError> {
    let years = i64::from(policy.year_floor)..=i64::from(policy.year_ceiling);
    if !years.contains(&row.year) {
        return Err(ValidationError::YearOutOfRange {
            line: row.line,
            wrestler: row.wrestler.clone(),
            year: row.year,
            floor: policy.year_floor,
            ceiling: policy.year_ceiling,
        });
    }
    if !PLACE_RANGE.contains(&row.place) {
        return Err(ValidationError::PlaceOutOfRange {
            line: row.line,
            wrestler: row.wrestler.clone(),
            place: row.place,
        });
    }
    Ok(())
}

fn into_record(row: RawRow, eligibility: Eligibility) -> Result<PlacementRecord, ValidationError> {
    let narrow = |column: Column, value: i64| ValidationError::ValueOutOfRange {
        line: row.line,
        wrestler: row.wrestler.clone(),
        column: column.name(),
        value,
    };
    let year = i32::try_from(row.year).map_err(|_| narrow(Column::Year, row.year))?;
    let place = u8::try_from(row.place).map_err(|_| narrow(Column::Place, row.place))?;
    let weight = u32::try_from(row.weight).map_err(|_| narrow(Column::Weight, row.weight))?;
    let placement_seed_delta = i32::try_from(row.placement_seed_delta)
        .map_err(|_| narrow(Column::PlacementSeedDelta, row.placement_seed_delta))?;
    let aa_count = row
        .aa_count
        .map(|n| u32::try_from(n).map_err(|_| narrow(Column::AaCount, n)))
        .transpose()?;

    Ok(PlacementRecord {
        wrestler: row.wrestler,
        school: row.school,
        year,
        weight,
        place,
        seed: row.seed,
        eligibility,
        placement_seed_delta,
        progression_eligible: row.progression_eligible,
        aa_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::read_table;

    fn run(body: &str) -> Result<(Dataset, ValidationReport), ValidationError> {
        let csv = format!(
            "Eligibility Year,Year,Weight,Place,Wrestler,School,Placement-Seed Delta\n{body}"
        );
        let table = read_table(csv.as_bytes()).unwrap();
        validate(table, &ValidationPolicy::default())
    }

    #[test]
    fn test_valid_table() {
        let (dataset, report) = run("Fr,2000,125,8,A,S,0\nSr,2025,285,1,B,S,3").unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.year_min(), 2000);
        assert_eq!(dataset.year_max(), 2025);
        assert_eq!(report.rows_in, 2);
        assert_eq!(report.rows_retained, 2);
        assert_eq!(dataset.records()[1].eligibility, Eligibility::Sr);
    }

    #[test]
    fn test_year_out_of_range_is_fatal() {
        let err = run("Fr,2000,125,8,A,S,0\nSr,2026,285,1,B,S,3").unwrap_err();
        assert!(matches!(
            err,
            ValidationError::YearOutOfRange {
                line: 3,
                year: 2026,
                ..
            }
        ));
        assert!(err.to_string().contains("B"));
    }

    #[test]
    fn test_place_out_of_range_is_fatal() {
        for place in ["0", "9"] {
            let err = run(&format!("Jr,2010,125,{place},A,S,0")).unwrap_err();
            assert!(matches!(err, ValidationError::PlaceOutOfRange { .. }));
        }
    }

    #[test]
    fn test_range_checked_before_eligibility_drop() {
        let err = run("Gr,1990,125,1,A,S,0").unwrap_err();
        assert!(matches!(err, ValidationError::YearOutOfRange { .. }));
    }

    #[test]
    fn test_unknown_eligibility_dropped() {
        let (dataset, report) =
            run("Jr,2010,125,1,A,S,0\nRs,2010,133,2,B,S,0\nrs,2011,133,2,B,S,0").unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(report.rows_retained, 1);
        assert_eq!(report.rows_dropped(), 2);
        assert_eq!(report.unknown_eligibility.get("Rs"), Some(&2));
    }

    #[test]
    fn test_unreadable_seed_is_reported_not_fatal() {
        let csv = "\
Eligibility Year,Year,Weight,Place,Wrestler,School,Placement-Seed Delta,Seed
Jr,2010,157,1,A,S,0,1
So,2010,157,2,B,S,0,NR
Fr,2010,157,3,C,S,0,US
";
        let table = read_table(csv.as_bytes()).unwrap();
        let (dataset, report) = validate(table, &ValidationPolicy::default()).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.records()[1].seed, None);
        assert_eq!(report.unparsed_counts.get(&Column::Seed), Some(&1));
        assert_eq!(report.rows_dropped(), 0);
    }

    #[test]
    fn test_all_rows_dropped_is_error() {
        let err = run("Gr,2010,125,1,A,S,0").unwrap_err();
        assert_eq!(err, ValidationError::Empty);
    }

    #[test]
    fn test_custom_year_bounds() {
        let csv = "Eligibility Year,Year,Weight,Place,Wrestler,School,Placement-Seed Delta\nJr,2030,125,1,A,S,0\n";
        let table = read_table(csv.as_bytes()).unwrap();
        let policy = ValidationPolicy {
            year_floor: 2000,
            year_ceiling: 2030,
        };
        assert!(validate(table, &policy).is_ok());
    }
}
