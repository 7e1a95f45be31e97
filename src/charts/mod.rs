//! Charts module - widget contract, render dispatch, and the kline chart

mod dispatch;
mod holder;
mod indicators;
mod kline_chart;
mod messages;
mod styles;
mod widget;

#[cfg(test)]
mod testkit;

pub use dispatch::{RenderDispatcher, RenderOutcome, RenderTrigger};
pub use holder::{ChartInstanceHolder, MA_CALC_PARAMS};
pub use kline_chart::{EguiChartFactory, KlineChart};
pub use messages::{MessageDescriptor, MessageHub, MessageKind, MESSAGE_MOUNT_ID};
pub use styles::{AxisKind, CandleType, ChartStyles, DisplayToggles, TooltipField};
pub use widget::{ChartWidget, IndicatorSpec, PaneOptions, WidgetFactory};
