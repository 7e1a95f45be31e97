//! Control Panel Widget
//! Left side panel: data source, security query, and display settings.

use crate::charts::{AxisKind, CandleType, DisplayToggles};
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// User settings driving the query and the chart styling.
#[derive(Default, Clone)]
pub struct UserSettings {
    pub csv_path: Option<PathBuf>,
    pub code: String,
    pub toggles: DisplayToggles,
    pub show_volume_pane: bool,
    pub show_macd_pane: bool,
}

/// Left side control panel with file selection, query input and the
/// chart display switches.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub codes: Vec<String>,
    pub progress: f32,
    pub status: String,
    pub query_enabled: bool,
    pub query_clicks: u32,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            codes: Vec::new(),
            progress: 0.0,
            status: "Ready".to_string(),
            query_enabled: false,
            query_clicks: 0,
        }
    }
}

const CANDLE_TYPE_OPTIONS: [(CandleType, &str); 4] = [
    (CandleType::CandleSolid, "Solid"),
    (CandleType::CandleStroke, "Hollow"),
    (CandleType::CandleUpStroke, "Rising hollow"),
    (CandleType::CandleDownStroke, "Falling hollow"),
];

const AXIS_OPTIONS: [(AxisKind, &str); 3] = [
    (AxisKind::Normal, "Price"),
    (AxisKind::Percentage, "Percentage"),
    (AxisKind::Log, "Logarithmic"),
];

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the known security codes after a CSV load.
    pub fn update_codes(&mut self, codes: Vec<String>) {
        self.query_enabled = !codes.is_empty();
        if self.settings.code.is_empty() {
            if let Some(first) = codes.first() {
                self.settings.code = first.clone();
            }
        }
        self.codes = codes;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📈 KlineView")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Stock K-line Viewer")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.settings.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Security Section =====
        ui.label(RichText::new("🔍 Security").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([80.0, 20.0], egui::Label::new("Code:"));
            ComboBox::from_id_salt("security_code")
                .width(150.0)
                .selected_text(if self.settings.code.is_empty() {
                    "e.g. 000001.SZ"
                } else {
                    self.settings.code.as_str()
                })
                .show_ui(ui, |ui| {
                    for code in &self.codes {
                        if ui
                            .selectable_label(self.settings.code == *code, code)
                            .clicked()
                        {
                            self.settings.code = code.clone();
                        }
                    }
                });
        });

        ui.add_space(8.0);
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.query_enabled, |ui| {
                let button = egui::Button::new(RichText::new("▶ Query").size(15.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(button).clicked() {
                    self.query_clicks += 1;
                    action = ControlPanelAction::Query;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Display Settings Section =====
        ui.label(RichText::new("⚙️ Display Settings").size(14.0).strong());
        ui.add_space(8.0);

        let toggles = &mut self.settings.toggles;
        let mut changed = false;

        ui.horizontal(|ui| {
            ui.add_sized([80.0, 20.0], egui::Label::new("Candles:"));
            ComboBox::from_id_salt("candle_type")
                .width(150.0)
                .selected_text(candle_type_label(toggles.candle_type))
                .show_ui(ui, |ui| {
                    for (value, label) in CANDLE_TYPE_OPTIONS {
                        changed |= ui
                            .selectable_value(&mut toggles.candle_type, value, label)
                            .changed();
                    }
                });
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([80.0, 20.0], egui::Label::new("Y axis:"));
            ComboBox::from_id_salt("axis_type")
                .width(150.0)
                .selected_text(axis_kind_label(toggles.axis_type))
                .show_ui(ui, |ui| {
                    for (value, label) in AXIS_OPTIONS {
                        changed |= ui
                            .selectable_value(&mut toggles.axis_type, value, label)
                            .changed();
                    }
                });
        });

        ui.add_space(8.0);

        changed |= ui
            .checkbox(&mut toggles.show_last_price, "Last price mark")
            .changed();
        changed |= ui
            .checkbox(&mut toggles.show_high_price, "High price mark")
            .changed();
        changed |= ui
            .checkbox(&mut toggles.show_low_price, "Low price mark")
            .changed();
        changed |= ui
            .checkbox(&mut toggles.show_last_value, "Indicator last value")
            .changed();
        changed |= ui
            .checkbox(&mut toggles.reverse_axis, "Reverse axis")
            .changed();
        changed |= ui.checkbox(&mut toggles.show_grid, "Grid lines").changed();

        if changed {
            action = ControlPanelAction::SettingsChanged;
        }

        ui.add_space(8.0);
        ui.label(RichText::new("Indicator panes").size(12.0).strong());
        let mut panes_changed = false;
        panes_changed |= ui
            .checkbox(&mut self.settings.show_volume_pane, "Volume")
            .changed();
        panes_changed |= ui
            .checkbox(&mut self.settings.show_macd_pane, "MACD")
            .changed();
        if panes_changed {
            action = ControlPanelAction::IndicatorPanesChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Rendered") || self.status.contains("Loaded") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

fn candle_type_label(value: CandleType) -> &'static str {
    CANDLE_TYPE_OPTIONS
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, label)| *label)
        .unwrap_or("Solid")
}

fn axis_kind_label(value: AxisKind) -> &'static str {
    AXIS_OPTIONS
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, label)| *label)
        .unwrap_or("Price")
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    Query,
    SettingsChanged,
    IndicatorPanesChanged,
}
