use eframe::egui::{self, Ui};

use agri_dash::data::gate::WAITING_MESSAGE;

use crate::state::{AppState, ViewTab};
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AgriDashApp {
    pub state: AppState,
}

impl eframe::App for AgriDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: uploads ----
        egui::SidePanel::left("upload_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tabs + chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Global Agricultural Sustainability Dashboard");
            central_panel(ui, &mut self.state);
        });
    }
}

fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(session) = &state.session else {
        let (text, color) = match &state.status_message {
            Some(msg) if state.missing.is_empty() => (msg.as_str(), egui::Color32::RED),
            _ => (WAITING_MESSAGE, egui::Color32::YELLOW),
        };
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(egui::RichText::new(text).color(color));
        });
        return;
    };

    ui.horizontal(|ui: &mut Ui| {
        for tab in ViewTab::ALL {
            ui.selectable_value(&mut state.active_tab, tab, tab.label());
        }
    });
    ui.separator();

    let tab = state.active_tab;
    ui.strong(tab.title());

    if state.show_table {
        let chart_height = ui.available_height() * 0.6;
        ui.allocate_ui(egui::vec2(ui.available_width(), chart_height), |ui: &mut Ui| {
            charts::view_chart(ui, tab, &session.views);
        });
        ui.separator();
        table::view_table(ui, tab, &session.views);
    } else {
        charts::view_chart(ui, tab, &session.views);
    }
}
