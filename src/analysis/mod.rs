/// Aggregation engine: pure transforms from an `EmployeeTable` to the series
/// each chart draws. No I/O and no UI types in here.

pub mod aggregate;
pub mod series;

use serde::Serialize;

use crate::data::filter::DepartmentFilter;
use crate::data::model::{Education, EmployeeTable, YesNo};

use aggregate::*;
use series::{AttritionSplit, DerivedSeries};

// ---------------------------------------------------------------------------
// Dashboard – every series for one filtered table
// ---------------------------------------------------------------------------

/// All chart inputs for the current department selection. Rebuilt on every
/// filter change; also the document written by "Export summary".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub department: DepartmentFilter,
    pub employees: usize,
    pub attrition_counts: DerivedSeries<YesNo, usize>,
    pub attrition_rate_by_tenure: DerivedSeries<u32, f64>,
    pub gender_counts: DerivedSeries<String, usize>,
    pub attrition_rate_by_education: DerivedSeries<Education, f64>,
    pub age_distribution: DerivedSeries<YesNo, Vec<u32>>,
    pub overtime_effect: DerivedSeries<YesNo, AttritionSplit>,
    /// `None` when nobody in the selection left.
    pub education_field_share: Option<DerivedSeries<String, usize>>,
    pub attrition_by_job_role: DerivedSeries<String, AttritionSplit>,
}

impl Dashboard {
    /// Run every aggregation over `table`, which is already filtered to
    /// `department`.
    pub fn build(table: &EmployeeTable, department: &DepartmentFilter) -> Self {
        Dashboard {
            department: department.clone(),
            employees: table.len(),
            attrition_counts: attrition_counts(table),
            attrition_rate_by_tenure: attrition_rate_by_tenure(table),
            gender_counts: gender_counts(table),
            attrition_rate_by_education: attrition_rate_by_education(table),
            age_distribution: age_distribution_by_attrition(table),
            overtime_effect: overtime_effect_counts(table),
            education_field_share: attrition_share_by_education_field(table),
            attrition_by_job_role: attrition_by_job_role(table),
        }
    }

    pub fn title(&self) -> String {
        format!("{} Department HR Attrition Dashboard", self.department)
    }

    pub fn is_empty(&self) -> bool {
        self.employees == 0
    }
}
