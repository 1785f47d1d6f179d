use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use agri_dash::data::model::{DashboardViews, DatasetKind};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – upload slots
// ---------------------------------------------------------------------------

/// Render the left upload panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Upload CSV Files");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for kind in DatasetKind::ALL {
                upload_slot(ui, state, kind);
                ui.add_space(6.0);
            }

            ui.separator();
            egui::CollapsingHeader::new(RichText::new("Filter").strong())
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    let cfg = &state.config;
                    ui.label(format!("Years {}–{}", cfg.year_min, cfg.year_max));
                    ui.label(format!("Comparison year {}", cfg.comparison_year));
                    for country in &cfg.countries {
                        ui.label(format!("• {country}"));
                    }
                });
        });
}

fn upload_slot(ui: &mut Ui, state: &mut AppState, kind: DatasetKind) {
    ui.strong(kind.label());
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Browse…").clicked() {
            open_upload_dialog(state, kind);
        }
        match state.uploads.get(kind).and_then(Path::file_name) {
            Some(name) => ui.label(name.to_string_lossy().into_owned()),
            None => ui.weak("no file"),
        };
    });

    if let Some(counts) = state.session.as_ref().and_then(|s| s.counts.get(&kind)) {
        ui.small(format!("{} rows, {} after filter", counts.raw, counts.filtered));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Load filter config…").clicked() {
                open_config_dialog(state);
                ui.close_menu();
            }
            let has_views = state.session.is_some();
            if ui
                .add_enabled(has_views, egui::Button::new("Export views…"))
                .clicked()
            {
                export_views_dialog(state);
                ui.close_menu();
            }
            if ui.button("Clear uploads").clicked() {
                state.clear();
                ui.close_menu();
            }
        });

        ui.separator();

        if ui
            .selectable_label(state.show_table, "Show table")
            .clicked()
        {
            state.show_table = !state.show_table;
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

pub fn open_upload_dialog(state: &mut AppState, kind: DatasetKind) {
    let file = rfd::FileDialog::new()
        .set_title(kind.label())
        .add_filter("Supported files", &["csv", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.set_upload(kind, path);
    }
}

pub fn open_config_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Load filter config")
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.load_config(&path);
    }
}

pub fn export_views_dialog(state: &mut AppState) {
    let Some(session) = &state.session else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export views")
        .set_file_name("views.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match write_views(&path, &session.views) {
            Ok(()) => log::info!("Exported views to {}", path.display()),
            Err(e) => {
                log::error!("Failed to export views: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn write_views(path: &Path, views: &DashboardViews) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), views)
        .context("writing views JSON")?;
    Ok(())
}
