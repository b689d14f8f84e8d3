use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

// ---------------------------------------------------------------------------
// RecordError – data-validation failures for a single row
// ---------------------------------------------------------------------------

/// A cell that does not fit the fixed HR schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("expected \"Yes\" or \"No\", got {0:?}")]
    NotYesNo(String),
    #[error("education level {0} is outside 1..=5")]
    EducationOutOfRange(i64),
    #[error("missing column '{0}'")]
    MissingColumn(&'static str),
    #[error("column '{column}' has a null value")]
    NullValue { column: &'static str },
    #[error("column '{column}' value {value} is negative")]
    Negative { column: &'static str, value: i64 },
}

// ---------------------------------------------------------------------------
// YesNo – the two-valued category behind Attrition and OverTime
// ---------------------------------------------------------------------------

/// `Attrition` and `OverTime` both hold one of these. Every input format
/// parses it through `FromStr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "String")]
pub enum YesNo {
    No,
    Yes,
}

impl YesNo {
    /// Every value, in display order. Aggregations backfill from this.
    pub const ALL: [YesNo; 2] = [YesNo::No, YesNo::Yes];

    pub fn as_str(self) -> &'static str {
        match self {
            YesNo::No => "No",
            YesNo::Yes => "Yes",
        }
    }

    /// 1.0 for `Yes`, 0.0 for `No`.
    pub fn indicator(self) -> f64 {
        match self {
            YesNo::No => 0.0,
            YesNo::Yes => 1.0,
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for YesNo {
    type Error = RecordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for YesNo {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Yes" => Ok(YesNo::Yes),
            "No" => Ok(YesNo::No),
            other => Err(RecordError::NotYesNo(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Education – ordinal 1..=5 with display labels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "i64")]
pub enum Education {
    BelowCollege = 1,
    College = 2,
    Bachelor = 3,
    Master = 4,
    Doctor = 5,
}

impl Education {
    /// All levels in ordinal order.
    pub const ALL: [Education; 5] = [
        Education::BelowCollege,
        Education::College,
        Education::Bachelor,
        Education::Master,
        Education::Doctor,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Education::BelowCollege => "Below College",
            Education::College => "College",
            Education::Bachelor => "Bachelor",
            Education::Master => "Master",
            Education::Doctor => "Doctor",
        }
    }
}

impl TryFrom<i64> for Education {
    type Error = RecordError;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Education::BelowCollege),
            2 => Ok(Education::College),
            3 => Ok(Education::Bachelor),
            4 => Ok(Education::Master),
            5 => Ok(Education::Doctor),
            other => Err(RecordError::EducationOutOfRange(other)),
        }
    }
}

impl fmt::Display for Education {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Exported summaries use the label, not the ordinal.
impl Serialize for Education {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// EmployeeRecord – one row of the HR table
// ---------------------------------------------------------------------------

/// The columns of the HR dataset the dashboard reads. Any other columns in
/// the source file are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmployeeRecord {
    pub age: u32,
    pub attrition: YesNo,
    pub department: String,
    pub education: Education,
    pub education_field: String,
    pub gender: String,
    pub job_role: String,
    pub over_time: YesNo,
    pub total_working_years: u32,
}

// ---------------------------------------------------------------------------
// EmployeeTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Immutable table of employees. Filtering builds a new table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeTable {
    records: Vec<EmployeeRecord>,
    /// Department names in order of first appearance.
    departments: Vec<String>,
}

impl EmployeeTable {
    pub fn from_records(records: Vec<EmployeeRecord>) -> Self {
        let departments = {
            let mut seen = BTreeSet::new();
            records
                .iter()
                .filter(|r| seen.insert(r.department.as_str()))
                .map(|r| r.department.clone())
                .collect()
        };

        EmployeeTable {
            records,
            departments,
        }
    }

    pub fn records(&self) -> &[EmployeeRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EmployeeRecord> {
        self.records().iter()
    }

    pub fn departments(&self) -> &[String] {
        &self.departments
    }

    /// Number of employees.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a EmployeeTable {
    type Item = &'a EmployeeRecord;
    type IntoIter = std::slice::Iter<'a, EmployeeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builder for terse test rows: everything not named gets a neutral value.
    pub(crate) fn employee(department: &str, attrition: YesNo) -> EmployeeRecord {
        EmployeeRecord {
            age: 35,
            attrition,
            department: department.to_string(),
            education: Education::Bachelor,
            education_field: "Life Sciences".to_string(),
            gender: "Female".to_string(),
            job_role: "Sales Executive".to_string(),
            over_time: YesNo::No,
            total_working_years: 10,
        }
    }

    #[test]
    fn yes_no_parses_exact_values_only() {
        assert_eq!("Yes".parse::<YesNo>(), Ok(YesNo::Yes));
        assert_eq!(" No ".parse::<YesNo>(), Ok(YesNo::No));
        assert_eq!(
            "maybe".parse::<YesNo>(),
            Err(RecordError::NotYesNo("maybe".to_string()))
        );
    }

    #[test]
    fn yes_no_deserializes_like_it_parses() {
        let padded: YesNo = serde_json::from_str(r#"" Yes""#).unwrap();
        assert_eq!(padded, YesNo::Yes);

        let err = serde_json::from_str::<YesNo>(r#""maybe""#).unwrap_err();
        assert!(err.to_string().contains(r#"expected "Yes" or "No""#), "{err}");
        assert_eq!(serde_json::to_string(&YesNo::No).unwrap(), r#""No""#);
    }

    #[test]
    fn education_levels_map_to_labels() {
        let labels: Vec<&str> = (1..=5)
            .map(|l| Education::try_from(l).unwrap().label())
            .collect();
        assert_eq!(
            labels,
            ["Below College", "College", "Bachelor", "Master", "Doctor"]
        );
        assert_eq!(
            Education::try_from(6),
            Err(RecordError::EducationOutOfRange(6))
        );
    }

    #[test]
    fn departments_keep_first_appearance_order() {
        let table = EmployeeTable::from_records(vec![
            employee("Sales", YesNo::No),
            employee("Research & Development", YesNo::Yes),
            employee("Sales", YesNo::Yes),
            employee("Human Resources", YesNo::No),
        ]);
        assert_eq!(
            table.departments(),
            ["Sales", "Research & Development", "Human Resources"]
        );
        assert_eq!(table.len(), 4);
    }
}
