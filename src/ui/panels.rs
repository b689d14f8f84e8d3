use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::model::YesNo;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – department filter
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter by Department");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ui.strong("Select Department");
    let mut picked = None;
    egui::ComboBox::from_id_salt("department")
        .selected_text(state.department.to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in &state.department_options {
                if ui
                    .selectable_label(*option == state.department, option.to_string())
                    .clicked()
                {
                    picked = Some(option.clone());
                }
            }
        });
    if let Some(department) = picked {
        state.set_department(department);
    }

    ui.separator();

    // ---- Quick figures for the current selection ----
    let Some(dashboard) = &state.dashboard else {
        return;
    };
    let left = dashboard
        .attrition_counts
        .get(&YesNo::Yes)
        .copied()
        .unwrap_or_default();
    ui.label(format!("Employees: {}", dashboard.employees));
    ui.label(format!("Left: {left}"));
    if dashboard.employees > 0 {
        let rate = left as f64 / dashboard.employees as f64 * 100.0;
        ui.label(format!("Attrition rate: {rate:.1}%"));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.dashboard.is_some(), egui::Button::new("Export summary…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some((total, shown)) = state.row_counts() {
            ui.label(format!("{total} employees loaded, {shown} shown"));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open HR dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}

fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export attrition summary")
        .set_file_name("attrition_summary.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_summary(&path) {
            log::error!("Failed to export summary: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
