use std::collections::BTreeMap;

use crate::data::model::{Education, EmployeeTable, YesNo};

use super::series::{AttritionSplit, DerivedSeries};

// ---------------------------------------------------------------------------
// Aggregations: EmployeeTable → DerivedSeries
//
// Every function here is a single pass over the rows. Groups are collected in
// `BTreeMap`s so output order never depends on hashing, and fixed category
// sets (`Education::ALL`, `YesNo::ALL`) are always present with zero fill.
// ---------------------------------------------------------------------------

/// Percentage of employees who left, per education level (all five levels,
/// ordinal order). A level with no employees reports 0.
pub fn attrition_rate_by_education(table: &EmployeeTable) -> DerivedSeries<Education, f64> {
    let mut groups: BTreeMap<Education, AttritionSplit> = BTreeMap::new();
    for r in table {
        tally(groups.entry(r.education).or_default(), r.attrition);
    }

    Education::ALL
        .iter()
        .map(|level| {
            let split = groups.get(level).copied().unwrap_or_default();
            (*level, split.yes_percent())
        })
        .collect()
}

/// Ages split by attrition. Both `No` and `Yes` are always present; the
/// renderer does the binning.
pub fn age_distribution_by_attrition(table: &EmployeeTable) -> DerivedSeries<YesNo, Vec<u32>> {
    YesNo::ALL
        .iter()
        .map(|&value| {
            let ages = table
                .iter()
                .filter(|r| r.attrition == value)
                .map(|r| r.age)
                .collect();
            (value, ages)
        })
        .collect()
}

/// OverTime × Attrition count matrix, keyed by OverTime.
pub fn overtime_effect_counts(table: &EmployeeTable) -> DerivedSeries<YesNo, AttritionSplit> {
    let mut matrix = [AttritionSplit::default(); 2];
    for r in table {
        tally(&mut matrix[r.over_time as usize], r.attrition);
    }
    YesNo::ALL.into_iter().zip(matrix).collect()
}

/// Number of leavers per education field, sorted by field name.
///
/// Returns `None` when nobody in the table left, so the pie chart can say
/// "no data" instead of drawing an empty circle.
pub fn attrition_share_by_education_field(
    table: &EmployeeTable,
) -> Option<DerivedSeries<String, usize>> {
    let mut leavers: BTreeMap<&str, usize> = BTreeMap::new();
    for r in table {
        let count = leavers.entry(r.education_field.as_str()).or_default();
        if r.attrition == YesNo::Yes {
            *count += 1;
        }
    }

    if leavers.values().all(|&n| n == 0) {
        return None;
    }
    Some(
        leavers
            .into_iter()
            .map(|(field, n)| (field.to_string(), n))
            .collect(),
    )
}

/// Stayed / left counts per job role, sorted by role name.
pub fn attrition_by_job_role(table: &EmployeeTable) -> DerivedSeries<String, AttritionSplit> {
    let mut roles: BTreeMap<&str, AttritionSplit> = BTreeMap::new();
    for r in table {
        tally(roles.entry(r.job_role.as_str()).or_default(), r.attrition);
    }
    roles
        .into_iter()
        .map(|(role, split)| (role.to_string(), split))
        .collect()
}

/// Head count for `No` and `Yes`; both always present.
pub fn attrition_counts(table: &EmployeeTable) -> DerivedSeries<YesNo, usize> {
    let mut split = AttritionSplit::default();
    for r in table {
        tally(&mut split, r.attrition);
    }
    [(YesNo::No, split.no), (YesNo::Yes, split.yes)]
        .into_iter()
        .collect()
}

/// Mean of the 1/0 attrition indicator per distinct `TotalWorkingYears`,
/// ascending by tenure.
pub fn attrition_rate_by_tenure(table: &EmployeeTable) -> DerivedSeries<u32, f64> {
    let mut groups: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for r in table {
        let (sum, n) = groups.entry(r.total_working_years).or_default();
        *sum += r.attrition.indicator();
        *n += 1;
    }
    // Every group holds at least one row, so `n` is never zero.
    groups
        .into_iter()
        .map(|(years, (sum, n))| (years, sum / n as f64))
        .collect()
}

/// Head count per gender, largest first; ties by name.
pub fn gender_counts(table: &EmployeeTable) -> DerivedSeries<String, usize> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in table {
        *counts.entry(r.gender.as_str()).or_default() += 1;
    }

    let mut ordered: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(gender, n)| (gender.to_string(), n))
        .collect();
    // Stable sort keeps the name order from the BTreeMap among equal counts.
    ordered.sort_by(|a, b| b.1.cmp(&a.1));
    ordered.into_iter().collect()
}

fn tally(split: &mut AttritionSplit, attrition: YesNo) {
    match attrition {
        YesNo::No => split.no += 1,
        YesNo::Yes => split.yes += 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{DepartmentFilter, filter_table};
    use crate::data::model::tests::employee;
    use crate::data::model::EmployeeRecord;

    fn table(rows: Vec<EmployeeRecord>) -> EmployeeTable {
        EmployeeTable::from_records(rows)
    }

    fn mixed() -> EmployeeTable {
        let mut rows = Vec::new();
        for (i, (dept, attr)) in [
            ("Sales", YesNo::Yes),
            ("Sales", YesNo::No),
            ("Research & Development", YesNo::No),
            ("Research & Development", YesNo::Yes),
            ("Research & Development", YesNo::No),
            ("Human Resources", YesNo::No),
        ]
        .into_iter()
        .enumerate()
        {
            let mut r = employee(dept, attr);
            r.age = 20 + i as u32 * 7;
            r.total_working_years = (i % 3) as u32;
            r.education = Education::ALL[i % 5];
            r.gender = if i % 2 == 0 { "Male" } else { "Female" }.to_string();
            r.job_role = ["Manager", "Laboratory Technician"][i % 2].to_string();
            r.education_field = ["Medical", "Marketing", "Life Sciences"][i % 3].to_string();
            r.over_time = YesNo::ALL[i % 2];
            rows.push(r);
        }
        table(rows)
    }

    #[test]
    fn attrition_counts_scenario() {
        let t = table(vec![
            employee("Sales", YesNo::Yes),
            employee("Sales", YesNo::No),
            employee("Sales", YesNo::Yes),
        ]);
        let counts = attrition_counts(&t);
        assert_eq!(counts.get(&YesNo::Yes), Some(&2));
        assert_eq!(counts.get(&YesNo::No), Some(&1));
    }

    #[test]
    fn attrition_counts_sum_to_rows_for_every_department() {
        let t = mixed();
        let mut filters = vec![DepartmentFilter::All];
        filters.extend(
            t.departments()
                .iter()
                .map(|d| DepartmentFilter::Department(d.clone())),
        );
        filters.push(DepartmentFilter::Department("R&D".to_string()));

        for filter in filters {
            let subset = filter_table(&t, &filter);
            let total: usize = attrition_counts(&subset).values().sum();
            assert_eq!(total, subset.len(), "department {filter}");
        }
    }

    #[test]
    fn education_rates_backfill_missing_levels() {
        let mut a = employee("Sales", YesNo::Yes);
        let mut b = employee("Sales", YesNo::No);
        a.education = Education::Bachelor;
        b.education = Education::Bachelor;

        let rates = attrition_rate_by_education(&table(vec![a, b]));
        assert_eq!(
            rates.into_inner(),
            vec![
                (Education::BelowCollege, 0.0),
                (Education::College, 0.0),
                (Education::Bachelor, 50.0),
                (Education::Master, 0.0),
                (Education::Doctor, 0.0),
            ]
        );
    }

    #[test]
    fn education_rates_stay_within_percent_range() {
        let rates = attrition_rate_by_education(&mixed());
        assert_eq!(rates.len(), Education::ALL.len());
        assert!(rates.values().all(|v| (0.0..=100.0).contains(v)));
    }

    #[test]
    fn tenure_rates_are_ordered_means() {
        let mut rows = vec![
            employee("Sales", YesNo::Yes),
            employee("Sales", YesNo::No),
            employee("Sales", YesNo::No),
        ];
        rows[0].total_working_years = 1;
        rows[1].total_working_years = 1;
        rows[2].total_working_years = 5;

        let rates = attrition_rate_by_tenure(&table(rows));
        assert_eq!(rates.into_inner(), vec![(1, 0.5), (5, 0.0)]);
    }

    #[test]
    fn age_distribution_partitions_every_row() {
        let t = mixed();
        let ages = age_distribution_by_attrition(&t);
        assert_eq!(ages.keys().copied().collect::<Vec<_>>(), YesNo::ALL);
        assert_eq!(ages.values().map(Vec::len).sum::<usize>(), t.len());
        assert_eq!(ages.get(&YesNo::Yes), Some(&vec![20, 41]));
    }

    #[test]
    fn overtime_matrix_counts_each_cell() {
        let matrix = overtime_effect_counts(&mixed());
        // Rows alternate OverTime No/Yes; Yes attrition at indices 0 and 3.
        assert_eq!(
            matrix.get(&YesNo::No),
            Some(&AttritionSplit { no: 2, yes: 1 })
        );
        assert_eq!(
            matrix.get(&YesNo::Yes),
            Some(&AttritionSplit { no: 2, yes: 1 })
        );
    }

    #[test]
    fn education_field_share_lists_every_field() {
        let share = attrition_share_by_education_field(&mixed()).unwrap();
        assert_eq!(
            share.into_inner(),
            vec![
                ("Life Sciences".to_string(), 0),
                ("Marketing".to_string(), 0),
                ("Medical".to_string(), 2),
            ]
        );
    }

    #[test]
    fn education_field_share_without_leavers_is_no_data() {
        let t = table(vec![employee("Sales", YesNo::No)]);
        assert_eq!(attrition_share_by_education_field(&t), None);
    }

    #[test]
    fn job_roles_fill_missing_attrition_with_zero() {
        let mut manager = employee("Sales", YesNo::No);
        manager.job_role = "Manager".to_string();
        let t = table(vec![manager, employee("Sales", YesNo::Yes)]);

        let roles = attrition_by_job_role(&t);
        assert_eq!(roles.get(&"Manager".to_string()), Some(&AttritionSplit { no: 1, yes: 0 }));
        assert_eq!(
            roles.get(&"Sales Executive".to_string()),
            Some(&AttritionSplit { no: 0, yes: 1 })
        );
    }

    #[test]
    fn gender_counts_largest_first() {
        let mut rows = vec![
            employee("Sales", YesNo::No),
            employee("Sales", YesNo::No),
            employee("Sales", YesNo::No),
        ];
        rows[0].gender = "Male".to_string();
        let counts = gender_counts(&table(rows));
        assert_eq!(
            counts.into_inner(),
            vec![("Female".to_string(), 2), ("Male".to_string(), 1)]
        );
    }

    #[test]
    fn gender_count_ties_break_by_name() {
        let rows = ["Male", "Other", "Female", "Male", "Female"]
            .into_iter()
            .map(|gender| {
                let mut r = employee("Sales", YesNo::No);
                r.gender = gender.to_string();
                r
            })
            .collect();
        let counts = gender_counts(&table(rows));
        assert_eq!(
            counts.into_inner(),
            vec![
                ("Female".to_string(), 2),
                ("Male".to_string(), 2),
                ("Other".to_string(), 1),
            ]
        );
    }

    #[test]
    fn empty_department_degrades_to_zero_output() {
        let empty = filter_table(&mixed(), &DepartmentFilter::Department("R&D".to_string()));
        assert!(empty.is_empty());

        assert!(attrition_rate_by_education(&empty).values().all(|v| *v == 0.0));
        assert!(age_distribution_by_attrition(&empty).values().all(Vec::is_empty));
        assert!(overtime_effect_counts(&empty).values().all(|s| s.total() == 0));
        assert_eq!(attrition_share_by_education_field(&empty), None);
        assert!(attrition_by_job_role(&empty).is_empty());
        assert!(attrition_counts(&empty).values().all(|n| *n == 0));
        assert_eq!(attrition_counts(&empty).len(), 2);
        assert!(attrition_rate_by_tenure(&empty).is_empty());
        assert!(gender_counts(&empty).is_empty());
    }

    #[test]
    fn repeated_calls_are_identical() {
        let t = mixed();
        assert_eq!(attrition_rate_by_education(&t), attrition_rate_by_education(&t));
        assert_eq!(attrition_rate_by_tenure(&t), attrition_rate_by_tenure(&t));
        assert_eq!(gender_counts(&t), gender_counts(&t));
        assert_eq!(attrition_by_job_role(&t), attrition_by_job_role(&t));
        assert_eq!(age_distribution_by_attrition(&t), age_distribution_by_attrition(&t));
        assert_eq!(overtime_effect_counts(&t), overtime_effect_counts(&t));
        assert_eq!(attrition_counts(&t), attrition_counts(&t));
        assert_eq!(
            attrition_share_by_education_field(&t),
            attrition_share_by_education_field(&t)
        );
    }
}
