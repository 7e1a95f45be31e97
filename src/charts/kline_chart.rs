//! Kline Chart Widget
//! egui_plot implementation of the chart widget contract: a candle pane
//! with MA overlay and price marks, plus volume and MACD sub-panes.

use crate::charts::indicators::{self, MacdSeries};
use crate::charts::styles::{
    AxisKind, CandleType, ChartStyles, GridStyle, IndicatorStyle, PriceMarkStyle, TooltipField,
    YAxisStyle,
};
use crate::charts::widget::{ChartWidget, IndicatorSpec, PaneOptions, WidgetFactory};
use crate::data::KlineRecord;
use chrono::{DateTime, Duration};
use egui::Color32;
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, HLine, Legend, Line, LineStyle, Plot, PlotPoints,
    Points,
};
use std::collections::HashSet;

/// Rising / falling candle colors.
const BULL_COLOR: Color32 = Color32::from_rgb(38, 166, 154);
const BEAR_COLOR: Color32 = Color32::from_rgb(239, 83, 80);

/// Line colors for the multi-period MA overlay, cycled.
const MA_PALETTE: [Color32; 6] = [
    Color32::from_rgb(255, 150, 0),  // Orange
    Color32::from_rgb(147, 94, 189), // Purple
    Color32::from_rgb(42, 130, 228), // Blue
    Color32::from_rgb(230, 70, 160), // Pink
    Color32::from_rgb(120, 180, 60), // Green
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

const MACD_FAST: usize = 12;
const MACD_SLOW: usize = 26;
const MACD_SIGNAL: usize = 9;

/// A registered indicator and where it lives.
#[derive(Debug, Clone)]
struct IndicatorInstance {
    spec: IndicatorSpec,
    visible: bool,
    pane: Option<PaneOptions>,
}

/// Interactive candlestick widget. All mutation goes through the
/// `ChartWidget` operations; `show` only reads the stored state.
pub struct KlineChart {
    container_id: String,
    records: Vec<KlineRecord>,
    indicators: Vec<IndicatorInstance>,

    grid: GridStyle,
    candle_kind: CandleType,
    price_mark: PriceMarkStyle,
    y_axis: YAxisStyle,
    indicator_style: IndicatorStyle,
    tooltip: Vec<TooltipField>,

    ma_overlay: Vec<(usize, Vec<f64>)>,
    macd: Option<MacdSeries>,
    needs_fit: bool,
}

impl KlineChart {
    pub fn new(container_id: &str) -> Self {
        Self {
            container_id: container_id.to_string(),
            records: Vec::new(),
            indicators: Vec::new(),
            grid: GridStyle { show: true },
            candle_kind: CandleType::default(),
            price_mark: PriceMarkStyle {
                high: true,
                low: true,
                last: true,
            },
            y_axis: YAxisStyle::default(),
            indicator_style: IndicatorStyle::default(),
            tooltip: Vec::new(),
            ma_overlay: Vec::new(),
            macd: None,
            needs_fit: false,
        }
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn indicator(&self, name: &str) -> Option<&IndicatorInstance> {
        self.indicators.iter().find(|i| i.spec.name == name)
    }

    fn indicator_visible(&self, name: &str) -> bool {
        self.indicator(name).is_some_and(|i| i.visible)
    }

    /// Toggle a registered indicator pane. Widget-level affordance for the
    /// shell; unknown names are ignored.
    pub fn set_indicator_visible(&mut self, name: &str, visible: bool) {
        if let Some(instance) = self.indicators.iter_mut().find(|i| i.spec.name == name) {
            instance.visible = visible;
        }
    }

    fn recompute_indicators(&mut self) {
        let closes: Vec<f64> = self.records.iter().map(|r| r.close).collect();

        // only an MA registered on the price pane becomes the overlay
        self.ma_overlay = match self.indicator("MA") {
            Some(instance)
                if !closes.is_empty()
                    && instance.pane.as_ref().is_some_and(|p| p.id == "candle_pane") =>
            {
                indicators::ma_lines(&closes, &instance.spec.calc_params)
            }
            _ => Vec::new(),
        };
        self.macd = (self.indicator("MACD").is_some() && !closes.is_empty())
            .then(|| indicators::macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL));
    }

    /// Price → plotted y under the current axis kind and direction.
    fn transform(&self, value: f64) -> f64 {
        let base = self.records.first().map(|r| r.close).unwrap_or(1.0);
        let mapped = match self.y_axis.kind {
            AxisKind::Normal => value,
            AxisKind::Percentage if base != 0.0 => (value / base - 1.0) * 100.0,
            AxisKind::Percentage => value,
            AxisKind::Log => value.ln(),
        };
        if self.y_axis.reverse {
            -mapped
        } else {
            mapped
        }
    }

    fn candle_fill(&self, rising: bool) -> Color32 {
        let hollow = match self.candle_kind {
            CandleType::CandleSolid => false,
            CandleType::CandleStroke => true,
            CandleType::CandleUpStroke => rising,
            CandleType::CandleDownStroke => !rising,
        };
        if hollow {
            Color32::TRANSPARENT
        } else if rising {
            BULL_COLOR
        } else {
            BEAR_COLOR
        }
    }

    /// Draw all visible panes. Returns nothing; hover tooltips attach to
    /// the candle pane response.
    pub fn show(&mut self, ui: &mut egui::Ui) {
        if self.records.is_empty() {
            return;
        }

        let reset = std::mem::take(&mut self.needs_fit);
        let avail_height = ui.available_height();
        let vol_visible = self.indicator_visible("VOL");
        let macd_visible = self.indicator_visible("MACD");
        let sub_panes = usize::from(vol_visible) + usize::from(macd_visible);
        let sub_height = (avail_height * 0.18).min(140.0);
        let candle_height = (avail_height - sub_panes as f32 * sub_height).max(120.0);

        self.show_candle_pane(ui, candle_height, reset);
        if vol_visible {
            self.show_volume_pane(ui, sub_height, reset);
        }
        if macd_visible {
            self.show_macd_pane(ui, sub_height, reset);
        }
    }

    fn show_candle_pane(&self, ui: &mut egui::Ui, height: f32, reset: bool) {
        let timestamps: Vec<i64> = self.records.iter().map(|r| r.timestamp).collect();
        let for_y_axis = YAxisFormat {
            kind: self.y_axis.kind,
            reverse: self.y_axis.reverse,
        };

        let mut plot = Plot::new(("kline", &self.container_id))
            .height(height)
            .show_grid(self.grid.show)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (idx as usize) < timestamps.len() && mark.value.fract().abs() < 1e-6
                {
                    format_day(timestamps[idx as usize])
                } else {
                    String::new()
                }
            })
            .y_axis_formatter(move |mark, _range| for_y_axis.format(mark.value));
        if reset {
            plot = plot.reset();
        }

        let response = plot.show(ui, |plot_ui| {
            let mut elems = Vec::with_capacity(self.records.len());
            for (i, record) in self.records.iter().enumerate() {
                let rising = record.close >= record.open;
                let stroke_color = if rising { BULL_COLOR } else { BEAR_COLOR };
                let (body_low, body_high) = if rising {
                    (record.open, record.close)
                } else {
                    (record.close, record.open)
                };
                let mid = (body_low + body_high) / 2.0;

                let mut spread = [
                    self.transform(record.low),
                    self.transform(body_low),
                    self.transform(mid),
                    self.transform(body_high),
                    self.transform(record.high),
                ];
                // a reversed axis flips the spread ordering
                spread.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

                elems.push(
                    BoxElem::new(
                        i as f64,
                        BoxSpread::new(spread[0], spread[1], spread[2], spread[3], spread[4]),
                    )
                    .box_width(0.6)
                    .whisker_width(0.0)
                    .fill(self.candle_fill(rising))
                    .stroke(egui::Stroke::new(1.0, stroke_color)),
                );
            }
            plot_ui.box_plot(BoxPlot::new(elems));

            // MA overlay on the price pane
            for (idx, (period, line)) in self.ma_overlay.iter().enumerate() {
                let color = MA_PALETTE[idx % MA_PALETTE.len()];
                let points: PlotPoints = line
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| !v.is_nan())
                    .map(|(i, &v)| [i as f64, self.transform(v)])
                    .collect();
                plot_ui.line(
                    Line::new(points)
                        .color(color)
                        .width(1.0)
                        .name(format!("MA{period}")),
                );

                if self.indicator_style.last_value_mark {
                    if let Some((i, &v)) = line
                        .iter()
                        .enumerate()
                        .rev()
                        .find(|(_, v)| !v.is_nan())
                    {
                        plot_ui.points(
                            Points::new(vec![[i as f64, self.transform(v)]])
                                .radius(3.0)
                                .color(color),
                        );
                    }
                }
            }

            // price marks
            if self.price_mark.high {
                if let Some(high) = self
                    .records
                    .iter()
                    .map(|r| r.high)
                    .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
                {
                    plot_ui.hline(
                        HLine::new(self.transform(high))
                            .color(BEAR_COLOR)
                            .style(LineStyle::Dashed { length: 6.0 }),
                    );
                }
            }
            if self.price_mark.low {
                if let Some(low) = self
                    .records
                    .iter()
                    .map(|r| r.low)
                    .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
                {
                    plot_ui.hline(
                        HLine::new(self.transform(low))
                            .color(BULL_COLOR)
                            .style(LineStyle::Dashed { length: 6.0 }),
                    );
                }
            }
            if self.price_mark.last {
                if let Some(last) = self.records.last() {
                    plot_ui.hline(
                        HLine::new(self.transform(last.close))
                            .color(Color32::GRAY)
                            .style(LineStyle::Dotted { spacing: 4.0 }),
                    );
                }
            }

            // hovered candle index for the tooltip
            plot_ui
                .pointer_coordinate()
                .map(|p| p.x.round() as isize)
                .filter(|&i| i >= 0 && (i as usize) < self.records.len())
                .map(|i| i as usize)
        });

        if let Some(idx) = response.inner {
            if !self.tooltip.is_empty() {
                let record = self.records[idx];
                let rows: Vec<String> = self
                    .tooltip
                    .iter()
                    .map(|field| render_tooltip_row(field, &record))
                    .collect();
                response.response.on_hover_ui(|ui| {
                    for row in rows {
                        ui.label(row);
                    }
                });
            }
        }
    }

    fn show_volume_pane(&self, ui: &mut egui::Ui, height: f32, reset: bool) {
        let mut plot = Plot::new(("volume", &self.container_id))
            .height(height)
            .show_grid(self.grid.show)
            .allow_scroll(false)
            .y_axis_formatter(|mark, _range| format!("{:.0}", mark.value));
        if reset {
            plot = plot.reset();
        }

        plot.show(ui, |plot_ui| {
            let bars: Vec<Bar> = self
                .records
                .iter()
                .enumerate()
                .map(|(i, record)| {
                    let rising = record.close >= record.open;
                    Bar::new(i as f64, record.volume)
                        .width(0.6)
                        .fill(if rising { BULL_COLOR } else { BEAR_COLOR })
                })
                .collect();
            plot_ui.bar_chart(BarChart::new(bars));
        });
    }

    fn show_macd_pane(&self, ui: &mut egui::Ui, height: f32, reset: bool) {
        let Some(macd) = &self.macd else {
            return;
        };

        let mut plot = Plot::new(("macd", &self.container_id))
            .height(height)
            .show_grid(self.grid.show)
            .allow_scroll(false)
            .legend(Legend::default());
        if reset {
            plot = plot.reset();
        }

        plot.show(ui, |plot_ui| {
            let bars: Vec<Bar> = macd
                .hist
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    Bar::new(i as f64, v)
                        .width(0.4)
                        .fill(if v >= 0.0 { BULL_COLOR } else { BEAR_COLOR })
                })
                .collect();
            plot_ui.bar_chart(BarChart::new(bars));

            let dif: PlotPoints = macd
                .dif
                .iter()
                .enumerate()
                .map(|(i, &v)| [i as f64, v])
                .collect();
            plot_ui.line(Line::new(dif).color(MA_PALETTE[0]).name("DIF"));

            let dea: PlotPoints = macd
                .dea
                .iter()
                .enumerate()
                .map(|(i, &v)| [i as f64, v])
                .collect();
            plot_ui.line(Line::new(dea).color(MA_PALETTE[1]).name("DEA"));
        });
    }
}

impl ChartWidget for KlineChart {
    fn create_indicator(&mut self, spec: IndicatorSpec, visible: bool, pane: Option<PaneOptions>) {
        self.indicators.push(IndicatorInstance {
            spec,
            visible,
            pane,
        });
        self.recompute_indicators();
    }

    fn apply_series(&mut self, records: &[KlineRecord]) {
        self.records = records.to_vec();
        self.recompute_indicators();
        self.needs_fit = true;
    }

    fn set_styles(&mut self, styles: &ChartStyles) {
        self.grid = styles.grid;
        self.candle_kind = styles.candle.kind;
        self.price_mark = styles.candle.price_mark;
        self.y_axis = styles.y_axis;
        self.indicator_style = styles.indicator;
        if let Some(template) = &styles.candle.tooltip {
            self.tooltip = template.clone();
        }
    }

    fn resize(&mut self) {
        self.needs_fit = true;
    }
}

/// Axis formatting state captured by the y-axis closure.
#[derive(Clone, Copy)]
struct YAxisFormat {
    kind: AxisKind,
    reverse: bool,
}

impl YAxisFormat {
    fn format(&self, plotted: f64) -> String {
        let value = if self.reverse { -plotted } else { plotted };
        match self.kind {
            AxisKind::Normal => format!("{value:.2}"),
            AxisKind::Percentage => format!("{value:.2}%"),
            AxisKind::Log => format!("{:.2}", value.exp()),
        }
    }
}

/// Epoch-ms timestamp back to the exchange-local (UTC+8) calendar day.
fn format_day(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| (dt + Duration::hours(8)).format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Substitute a tooltip template row's `{field}` placeholder.
fn render_tooltip_row(field: &TooltipField, record: &KlineRecord) -> String {
    let value = match field.value.as_str() {
        "{timestamp}" => format_day(record.timestamp),
        "{open}" => format!("{:.2}", record.open),
        "{high}" => format!("{:.2}", record.high),
        "{low}" => format!("{:.2}", record.low),
        "{close}" => format!("{:.2}", record.close),
        "{volume}" => format!("{:.0}", record.volume),
        "{turnover}" => format!("{:.2}", record.turnover),
        other => other.to_string(),
    };
    format!("{} {}", field.title, value)
}

/// Production factory: resolves container ids the shell has marked as
/// mounted this session.
#[derive(Debug, Default)]
pub struct EguiChartFactory {
    mounted: HashSet<String>,
}

impl EguiChartFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shell calls this once a container has been laid out.
    pub fn mark_mounted(&mut self, container_id: &str) {
        self.mounted.insert(container_id.to_string());
    }
}

impl WidgetFactory for EguiChartFactory {
    type Widget = KlineChart;

    fn is_mounted(&self, container_id: &str) -> bool {
        self.mounted.contains(container_id)
    }

    fn init(&mut self, container_id: &str) -> Option<KlineChart> {
        self.mounted
            .contains(container_id)
            .then(|| KlineChart::new(container_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::holder::MA_CALC_PARAMS;
    use crate::charts::styles::DisplayToggles;

    fn record(timestamp: i64, open: f64, close: f64) -> KlineRecord {
        KlineRecord {
            timestamp,
            open,
            high: open.max(close) + 1.0,
            low: open.min(close) - 1.0,
            close,
            volume: 100.0,
            turnover: 1000.0,
        }
    }

    fn widget_with_indicators() -> KlineChart {
        let mut chart = KlineChart::new("kline");
        chart.create_indicator(IndicatorSpec::named("VOL"), false, None);
        chart.create_indicator(IndicatorSpec::named("MACD"), false, None);
        chart.create_indicator(
            IndicatorSpec::with_params("MA", MA_CALC_PARAMS.to_vec()),
            true,
            Some(PaneOptions::candle_pane()),
        );
        chart
    }

    #[test]
    fn apply_series_recomputes_indicator_series() {
        let mut chart = widget_with_indicators();
        let records: Vec<KlineRecord> = (0..10)
            .map(|i| record(i as i64, 10.0 + i as f64, 10.5 + i as f64))
            .collect();
        chart.apply_series(&records);

        assert_eq!(chart.ma_overlay.len(), MA_CALC_PARAMS.len());
        assert_eq!(chart.ma_overlay[0].0, 5);
        assert_eq!(chart.ma_overlay[0].1.len(), records.len());
        assert!(chart.macd.is_some());
        assert!(chart.needs_fit);
    }

    #[test]
    fn set_styles_merges_and_keeps_tooltip() {
        let mut chart = widget_with_indicators();
        chart.set_styles(&DisplayToggles::default().to_render_styles());
        assert_eq!(chart.tooltip.len(), 7);

        let restyle = DisplayToggles {
            show_grid: false,
            reverse_axis: true,
            ..DisplayToggles::default()
        };
        chart.set_styles(&restyle.to_styles());

        // restyle updated the mapped fields, template survived
        assert!(!chart.grid.show);
        assert!(chart.y_axis.reverse);
        assert_eq!(chart.tooltip.len(), 7);
    }

    #[test]
    fn indicator_visibility_defaults_and_toggles() {
        let mut chart = widget_with_indicators();
        assert!(!chart.indicator_visible("VOL"));
        assert!(!chart.indicator_visible("MACD"));
        assert!(chart.indicator_visible("MA"));

        chart.set_indicator_visible("VOL", true);
        assert!(chart.indicator_visible("VOL"));
        // unknown names ignored
        chart.set_indicator_visible("BOLL", true);
        assert!(!chart.indicator_visible("BOLL"));
    }

    #[test]
    fn axis_transform_variants() {
        let mut chart = widget_with_indicators();
        chart.apply_series(&[record(0, 10.0, 10.0), record(1, 10.0, 20.0)]);

        chart.y_axis.kind = AxisKind::Percentage;
        assert!((chart.transform(20.0) - 100.0).abs() < 1e-9);

        chart.y_axis.kind = AxisKind::Log;
        assert!((chart.transform(20.0) - 20.0_f64.ln()).abs() < 1e-9);

        chart.y_axis.kind = AxisKind::Normal;
        chart.y_axis.reverse = true;
        assert_eq!(chart.transform(20.0), -20.0);
    }

    #[test]
    fn tooltip_rows_substitute_record_fields() {
        let template = crate::charts::styles::tooltip_template();
        let sample = KlineRecord {
            timestamp: 1_640_966_400_000, // 2022-01-01 in UTC+8
            open: 10.0,
            high: 11.0,
            low: 9.0,
            close: 10.5,
            volume: 100.0,
            turnover: 1050.0,
        };
        assert_eq!(render_tooltip_row(&template[0], &sample), "Time 2022-01-01");
        assert_eq!(render_tooltip_row(&template[4], &sample), "Close 10.50");
        assert_eq!(render_tooltip_row(&template[5], &sample), "Volume 100");
    }

    #[test]
    fn factory_resolves_only_mounted_containers() {
        let mut factory = EguiChartFactory::new();
        assert!(!factory.is_mounted("kline"));
        assert!(factory.init("kline").is_none());

        factory.mark_mounted("kline");
        assert!(factory.is_mounted("kline"));
        let chart = factory.init("kline").unwrap();
        assert_eq!(chart.container_id(), "kline");
    }
}
