//! Chart Widget Contract
//! The seam between the render dispatcher and whatever actually draws.
//! Production binds the egui implementation; tests bind recording fakes.

use crate::charts::styles::ChartStyles;
use crate::data::KlineRecord;

/// Indicator registration request: a named indicator, optionally with
/// explicit calculation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorSpec {
    pub name: String,
    pub calc_params: Vec<usize>,
}

impl IndicatorSpec {
    /// Indicator with its default parameters.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            calc_params: Vec::new(),
        }
    }

    /// Indicator with explicit periods.
    pub fn with_params(name: &str, calc_params: Vec<usize>) -> Self {
        Self {
            name: name.to_string(),
            calc_params,
        }
    }
}

/// Where an indicator is attached. Without pane options an indicator gets
/// its own sub-pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneOptions {
    pub id: String,
}

impl PaneOptions {
    /// The main price pane.
    pub fn candle_pane() -> Self {
        Self {
            id: "candle_pane".to_string(),
        }
    }
}

/// The five-operation surface this crate drives on a chart widget.
/// Construction is the factory's job; everything after goes through here.
pub trait ChartWidget {
    fn create_indicator(&mut self, spec: IndicatorSpec, visible: bool, pane: Option<PaneOptions>);

    /// Replace the widget's series wholesale.
    fn apply_series(&mut self, records: &[KlineRecord]);

    /// Merge a style configuration. Fields present always win; a `None`
    /// tooltip keeps the stored template.
    fn set_styles(&mut self, styles: &ChartStyles);

    /// Re-measure against the current container dimensions.
    fn resize(&mut self);
}

/// Constructs widgets bound to a container. Returns `None` while the
/// container is not mounted, which callers treat as "not ready".
pub trait WidgetFactory {
    type Widget: ChartWidget;

    /// Whether `container_id` currently resolves to a mounted container.
    fn is_mounted(&self, container_id: &str) -> bool;

    fn init(&mut self, container_id: &str) -> Option<Self::Widget>;
}
