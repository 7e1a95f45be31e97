//! GUI module - User interface components

mod app;
mod chart_area;
mod control_panel;

pub use app::KlineViewApp;
pub use chart_area::ChartArea;
pub use control_panel::{ControlPanel, ControlPanelAction};

/// Container id the chart widget binds to.
pub const KLINE_CONTAINER_ID: &str = "stock-line_kline_container";
