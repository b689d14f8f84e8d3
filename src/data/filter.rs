use std::fmt;

use serde::{Serialize, Serializer};

use super::model::EmployeeTable;

// ---------------------------------------------------------------------------
// Department filter: the one user-selectable predicate
// ---------------------------------------------------------------------------

/// Either every department (`ALL`) or exactly one by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum DepartmentFilter {
    #[default]
    All,
    Department(String),
}

impl DepartmentFilter {
    pub const ALL_LABEL: &'static str = "ALL";

    /// Whether a row from `department` passes this filter.
    pub fn matches(&self, department: &str) -> bool {
        match self {
            DepartmentFilter::All => true,
            DepartmentFilter::Department(name) => name == department,
        }
    }
}

impl fmt::Display for DepartmentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepartmentFilter::All => f.write_str(Self::ALL_LABEL),
            DepartmentFilter::Department(name) => f.write_str(name),
        }
    }
}

// `All` exports as `null` so it cannot be confused with a department that
// happens to be called "ALL".
impl Serialize for DepartmentFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DepartmentFilter::All => serializer.serialize_none(),
            DepartmentFilter::Department(name) => serializer.serialize_str(name),
        }
    }
}

/// Options for the department selector: `ALL` first, then each department
/// in the order it first appears in the table.
pub fn department_options(table: &EmployeeTable) -> Vec<DepartmentFilter> {
    std::iter::once(DepartmentFilter::All)
        .chain(
            table
                .departments()
                .iter()
                .map(|d| DepartmentFilter::Department(d.clone())),
        )
        .collect()
}

/// Build a new table holding only the rows that pass `filter`.
///
/// A department name with no matching rows yields an empty table.
pub fn filter_table(table: &EmployeeTable, filter: &DepartmentFilter) -> EmployeeTable {
    if *filter == DepartmentFilter::All {
        return table.clone();
    }
    let rows = table
        .iter()
        .filter(|r| filter.matches(&r.department))
        .cloned()
        .collect();
    EmployeeTable::from_records(rows)
}
