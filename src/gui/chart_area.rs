//! Chart Area Widget
//! Central panel: the page's message mount rendered as a banner, then the
//! chart panes (or a placeholder before the first render).

use crate::charts::{EguiChartFactory, MessageKind, RenderDispatcher, MESSAGE_MOUNT_ID};
use crate::gui::KLINE_CONTAINER_ID;
use egui::{Color32, RichText};

#[derive(Default)]
pub struct ChartArea;

impl ChartArea {
    pub fn new() -> Self {
        Self
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        dispatcher: &mut RenderDispatcher<EguiChartFactory>,
    ) {
        // the container counts as mounted from the first laid-out frame on
        dispatcher
            .holder_mut()
            .factory_mut()
            .mark_mounted(KLINE_CONTAINER_ID);

        if let Some(descriptor) = dispatcher.messages().get(MESSAGE_MOUNT_ID).cloned() {
            let (bg, fg) = match descriptor.props.kind {
                MessageKind::Warning => (
                    Color32::from_rgb(80, 60, 10),
                    Color32::from_rgb(255, 193, 7),
                ),
                MessageKind::Error => (
                    Color32::from_rgb(70, 20, 25),
                    Color32::from_rgb(220, 53, 69),
                ),
                MessageKind::Info => (
                    Color32::from_rgb(20, 40, 70),
                    Color32::from_rgb(100, 149, 237),
                ),
            };
            egui::Frame::none()
                .fill(bg)
                .rounding(5.0)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.label(
                        RichText::new(&descriptor.props.content)
                            .size(13.0)
                            .color(fg),
                    );
                });
            ui.add_space(8.0);
        }

        match dispatcher.holder_mut().current() {
            Some(chart) if !chart.is_empty() => chart.show(ui),
            _ => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("No Data").size(20.0));
                });
            }
        }
    }
}
