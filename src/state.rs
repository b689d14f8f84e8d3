use std::path::Path;

use anyhow::{Context, Result};

use crate::analysis::Dashboard;
use crate::data::filter::{DepartmentFilter, department_options, filter_table};
use crate::data::model::EmployeeTable;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<EmployeeTable>,

    /// Current department selection.
    pub department: DepartmentFilter,

    /// `ALL` followed by every department in the dataset.
    pub department_options: Vec<DepartmentFilter>,

    /// Series for the current selection, rebuilt whenever it changes.
    pub dashboard: Option<Dashboard>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dataset and reset the filter to `ALL`.
    pub fn set_dataset(&mut self, dataset: EmployeeTable) {
        self.department_options = department_options(&dataset);
        self.department = DepartmentFilter::All;
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refresh();
    }

    /// Select a department and rebuild the dashboard.
    pub fn set_department(&mut self, department: DepartmentFilter) {
        if department == self.department {
            return;
        }
        log::debug!("Department filter changed to {department}");
        self.department = department;
        self.refresh();
    }

    /// Recompute every series for the current selection.
    pub fn refresh(&mut self) {
        self.dashboard = self.dataset.as_ref().map(|ds| {
            let filtered = filter_table(ds, &self.department);
            Dashboard::build(&filtered, &self.department)
        });
    }

    /// Load a file and make it the current dataset. On failure the previous
    /// dataset stays and the error lands in the status line.
    pub fn open_path(&mut self, path: &Path) {
        match crate::data::loader::load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} employees from {} across departments {:?}",
                    dataset.len(),
                    path.display(),
                    dataset.departments()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Write the current dashboard as pretty JSON.
    pub fn export_summary(&self, path: &Path) -> Result<()> {
        let dashboard = self
            .dashboard
            .as_ref()
            .context("no dataset loaded")?;
        let json = serde_json::to_string_pretty(dashboard).context("serialising summary")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing summary to {}", path.display()))?;
        log::info!("Exported {} summary to {}", dashboard.department, path.display());
        Ok(())
    }

    /// Number of rows in the loaded dataset and in the current selection.
    pub fn row_counts(&self) -> Option<(usize, usize)> {
        let total = self.dataset.as_ref()?.len();
        let shown = self.dashboard.as_ref().map_or(0, |d| d.employees);
        Some((total, shown))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::data::model::tests::employee;
    use crate::data::model::YesNo;

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(EmployeeTable::from_records(vec![
            employee("Sales", YesNo::Yes),
            employee("Sales", YesNo::No),
            employee("Human Resources", YesNo::No),
        ]));
        state
    }

    #[test]
    fn new_dataset_shows_everything() {
        let state = loaded();
        assert_eq!(state.department, DepartmentFilter::All);
        assert_eq!(state.department_options.len(), 3);
        assert_eq!(state.row_counts(), Some((3, 3)));
    }

    #[test]
    fn changing_department_rebuilds_dashboard() {
        let mut state = loaded();
        state.set_department(DepartmentFilter::Department("Human Resources".to_string()));

        let dashboard = state.dashboard.as_ref().unwrap();
        assert_eq!(dashboard.employees, 1);
        assert_eq!(dashboard.attrition_counts.get(&YesNo::Yes), Some(&0));
        assert_eq!(state.row_counts(), Some((3, 1)));
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let mut state = loaded();
        state.open_path(Path::new("/nonexistent/employees.csv"));

        assert!(state.status_message.as_deref().unwrap().starts_with("Error:"));
        assert_eq!(state.row_counts(), Some((3, 3)));
    }

    #[test]
    fn export_writes_json_summary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.json");
        loaded().export_summary(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["employees"], 3);
    }

    #[test]
    fn export_without_dataset_fails() {
        let dir = TempDir::new().unwrap();
        assert!(AppState::default()
            .export_summary(&dir.path().join("summary.json"))
            .is_err());
    }
}
