use serde::{Deserialize, Serialize};
use std::io::Read;
use tracing::warn;

/// A closed interval of employee numbers stored in one locker group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockerRange {
    pub group: String,
    pub start: u32,
    pub end: u32,
    #[serde(rename = "locker")]
    pub locker_number: u32,
}

impl LockerRange {
    pub fn new(group: impl Into<String>, start: u32, end: u32, locker_number: u32) -> Self {
        Self {
            group: group.into(),
            start,
            end,
            locker_number,
        }
    }

    pub fn contains(&self, number: u32) -> bool {
        self.start <= number && number <= self.end
    }

    fn overlaps(&self, other: &LockerRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Physical location of a personnel file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockerAssignment {
    pub group: String,
    pub locker_number: u32,
}

impl From<&LockerRange> for LockerAssignment {
    fn from(range: &LockerRange) -> Self {
        Self {
            group: range.group.clone(),
            locker_number: range.locker_number,
        }
    }
}

/// Boundary shape of a locker lookup: `{"match": false}` or
/// `{"match": true, "group": "A1", "locker": 1}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockerLookupView {
    #[serde(rename = "match")]
    pub matched: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locker: Option<u32>,
}

impl From<Option<LockerAssignment>> for LockerLookupView {
    fn from(value: Option<LockerAssignment>) -> Self {
        match value {
            Some(assignment) => Self {
                matched: true,
                group: Some(assignment.group),
                locker: Some(assignment.locker_number),
            },
            None => Self {
                matched: false,
                group: None,
                locker: None,
            },
        }
    }
}

/// A numeric employee code that cannot name a locker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmployeeCodeError {
    #[error("employee code '{0}' is negative")]
    Negative(String),
    #[error("employee code '{0}' exceeds the supported numeric range")]
    Overflow(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LockerConfigError {
    #[error("locker range {group} starts at {start} after its end {end}")]
    InvertedRange { group: String, start: u32, end: u32 },
    #[error("locker range {first} overlaps {second}")]
    Overlap { first: String, second: String },
    #[error("invalid locker table: {0}")]
    Csv(#[from] csv::Error),
    #[error("unable to read locker table: {0}")]
    Io(#[from] std::io::Error),
}

/// Parses an employee code as a locker key.
///
/// Non-numeric input is `Ok(None)`: it simply has no locker. A numeric code that is
/// negative or too large for `u32` is an error so callers can tell it apart.
pub fn parse_employee_number(code: &str) -> Result<Option<u32>, EmployeeCodeError> {
    let trimmed = code.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }

    if negative && digits.bytes().any(|b| b != b'0') {
        return Err(EmployeeCodeError::Negative(trimmed.to_string()));
    }

    digits
        .parse::<u32>()
        .map(Some)
        .map_err(|_| EmployeeCodeError::Overflow(trimmed.to_string()))
}

/// Ordered locker ranges. Lookups return the first range, in configuration order,
/// that contains the employee number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockerTable {
    ranges: Vec<LockerRange>,
}

impl LockerTable {
    /// Builds a table whose ranges are well formed and pairwise disjoint.
    pub fn new(ranges: Vec<LockerRange>) -> Result<Self, LockerConfigError> {
        check_bounds(&ranges)?;
        if let Some((first, second)) = overlapping_pairs(&ranges).into_iter().next() {
            return Err(LockerConfigError::Overlap {
                first: first.group.clone(),
                second: second.group.clone(),
            });
        }
        Ok(Self { ranges })
    }

    /// Builds a table that tolerates overlapping ranges, logging each overlap.
    pub fn permissive(ranges: Vec<LockerRange>) -> Result<Self, LockerConfigError> {
        check_bounds(&ranges)?;
        for (first, second) in overlapping_pairs(&ranges) {
            warn!(
                first = %first.group,
                second = %second.group,
                "overlapping locker ranges; earlier range wins"
            );
        }
        Ok(Self { ranges })
    }

    /// The locker layout of the records room.
    pub fn standard() -> Self {
        let ranges = STANDARD_RANGES
            .iter()
            .map(|&(group, start, end, locker)| LockerRange::new(group, start, end, locker))
            .collect();
        Self { ranges }
    }

    /// Reads `group,start,end,locker` rows.
    pub fn from_csv_reader<R: Read>(reader: R, strict: bool) -> Result<Self, LockerConfigError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let ranges = csv_reader
            .deserialize::<LockerRange>()
            .collect::<Result<Vec<_>, _>>()?;

        if strict {
            Self::new(ranges)
        } else {
            Self::permissive(ranges)
        }
    }

    pub fn ranges(&self) -> &[LockerRange] {
        &self.ranges
    }

    pub fn lookup(&self, number: u32) -> Option<&LockerRange> {
        self.ranges.iter().find(|range| range.contains(number))
    }

    pub fn resolve(&self, code: &str) -> Result<Option<LockerAssignment>, EmployeeCodeError> {
        let number = parse_employee_number(code)?;
        Ok(number
            .and_then(|number| self.lookup(number))
            .map(LockerAssignment::from))
    }
}

fn check_bounds(ranges: &[LockerRange]) -> Result<(), LockerConfigError> {
    match ranges.iter().find(|range| range.start > range.end) {
        Some(range) => Err(LockerConfigError::InvertedRange {
            group: range.group.clone(),
            start: range.start,
            end: range.end,
        }),
        None => Ok(()),
    }
}

fn overlapping_pairs(ranges: &[LockerRange]) -> Vec<(&LockerRange, &LockerRange)> {
    let mut sorted: Vec<&LockerRange> = ranges.iter().collect();
    sorted.sort_by_key(|range| (range.start, range.end));

    let mut pairs = Vec::new();
    for (index, range) in sorted.iter().enumerate() {
        for other in &sorted[index + 1..] {
            if other.start > range.end {
                break;
            }
            if range.overlaps(other) {
                pairs.push((*range, *other));
            }
        }
    }
    pairs
}

const STANDARD_RANGES: [(&str, u32, u32, u32); 65] = [
    ("A1", 40273, 40996, 1),
    ("A2", 41001, 41488, 1),
    ("A3", 41491, 41961, 1),
    ("A4", 41973, 42338, 1),
    ("A5", 42347, 42808, 1),
    ("B1", 42809, 43099, 2),
    ("B2", 43112, 43590, 2),
    ("B3", 43592, 43954, 2),
    ("B4", 43961, 44349, 2),
    ("B5", 44351, 44897, 2),
    ("C1", 44898, 45247, 3),
    ("C2", 45254, 45528, 3),
    ("C3", 45533, 45716, 3),
    ("C4", 45720, 45885, 3),
    ("D2", 45994, 46089, 4),
    ("D3", 46091, 46192, 4),
    ("D4", 46194, 46274, 4),
    ("D5", 61330, 61362, 4),
    ("E1", 30005, 30242, 6),
    ("E2", 30250, 30548, 6),
    ("E3", 30559, 30781, 6),
    ("E4", 30804, 30912, 6),
    ("F1", 26001, 26157, 7),
    ("F2", 26159, 26270, 7),
    ("F4", 86089, 86217, 7),
    ("F5", 84019, 84021, 7),
    ("G1", 10109, 10366, 8),
    ("G2", 28022, 28295, 8),
    ("G3", 28303, 28440, 8),
    ("H1", 20002, 20206, 9),
    ("H2", 20210, 20453, 9),
    ("H3", 20457, 20662, 9),
    ("H4", 20663, 20848, 9),
    ("H5", 15528, 15643, 9),
    ("I1", 55004, 55161, 10),
    ("I2", 55165, 55287, 10),
    ("I3", 55288, 55419, 10),
    ("I4", 55421, 55513, 10),
    ("I5", 55515, 55595, 10),
    ("J1", 55599, 55681, 11),
    ("J2", 55682, 55769, 11),
    ("J3", 55770, 55850, 11),
    ("J4", 55851, 55937, 11),
    ("K1", 55938, 56021, 12),
    ("K2", 56022, 56082, 12),
    ("K3", 56083, 56138, 12),
    ("K4", 56139, 56186, 12),
    ("K5", 56190, 56247, 12),
    ("L1", 56248, 56305, 13),
    ("L2", 56306, 56360, 13),
    ("L3", 56361, 56415, 13),
    ("L4", 56416, 56500, 13),
    ("M1", 56501, 56590, 14),
    ("M2", 56591, 56675, 14),
    ("M3", 56676, 56780, 14),
    ("M4", 56781, 56865, 14),
    ("M5", 56866, 56948, 14),
    ("N1", 56949, 57031, 15),
    ("N2", 57032, 57114, 15),
    ("N3", 57115, 57197, 15),
    ("N4", 57198, 57281, 15),
    ("N5", 58197, 58237, 15),
    ("O1", 24001, 24037, 17),
    ("O2", 85017, 85074, 17),
    ("O3", 87039, 87049, 17),
];
