//! Chart Styles Module
//! Display toggles and the structured style tree they map onto. The style
//! tree mirrors the widget's configuration surface and merges partially:
//! a `None` tooltip leaves the widget's stored template untouched.

use serde::{Deserialize, Serialize};

/// Candle body rendering style, wire names as the settings dialog emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandleType {
    /// Every body filled.
    CandleSolid,
    /// Every body hollow.
    CandleStroke,
    /// Rising bodies hollow, falling filled.
    CandleUpStroke,
    /// Falling bodies hollow, rising filled.
    CandleDownStroke,
}

impl Default for CandleType {
    fn default() -> Self {
        CandleType::CandleSolid
    }
}

/// Y-axis scale kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisKind {
    /// Raw price.
    Normal,
    /// Percent change from the first visible close.
    Percentage,
    /// Natural-log price.
    Log,
}

impl Default for AxisKind {
    fn default() -> Self {
        AxisKind::Normal
    }
}

/// The flat set of user-facing display flags. Supplied fresh on every
/// dispatch; never persisted here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayToggles {
    pub candle_type: CandleType,
    pub show_last_price: bool,
    pub show_high_price: bool,
    pub show_low_price: bool,
    pub show_last_value: bool,
    pub axis_type: AxisKind,
    pub reverse_axis: bool,
    pub show_grid: bool,
}

impl Default for DisplayToggles {
    fn default() -> Self {
        Self {
            candle_type: CandleType::default(),
            show_last_price: true,
            show_high_price: true,
            show_low_price: true,
            show_last_value: true,
            axis_type: AxisKind::default(),
            reverse_axis: false,
            show_grid: true,
        }
    }
}

impl DisplayToggles {
    /// Style tree for the restyle path: the eight mapped fields, tooltip
    /// template left alone.
    pub fn to_styles(&self) -> ChartStyles {
        ChartStyles {
            grid: GridStyle {
                show: self.show_grid,
            },
            candle: CandleStyle {
                kind: self.candle_type,
                tooltip: None,
                price_mark: PriceMarkStyle {
                    high: self.show_high_price,
                    low: self.show_low_price,
                    last: self.show_last_price,
                },
            },
            y_axis: YAxisStyle {
                kind: self.axis_type,
                reverse: self.reverse_axis,
            },
            indicator: IndicatorStyle {
                last_value_mark: self.show_last_value,
            },
        }
    }

    /// Style tree for the render path: the same eight fields plus the fixed
    /// tooltip template.
    pub fn to_render_styles(&self) -> ChartStyles {
        let mut styles = self.to_styles();
        styles.candle.tooltip = Some(tooltip_template());
        styles
    }
}

/// One labeled tooltip row; `value` holds a `{field}` placeholder the
/// widget substitutes per candle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipField {
    pub title: String,
    pub value: String,
}

impl TooltipField {
    fn new(title: &str, value: &str) -> Self {
        Self {
            title: title.to_string(),
            value: value.to_string(),
        }
    }
}

/// The seven-row candle tooltip: time, OHLC, volume, turnover.
pub fn tooltip_template() -> Vec<TooltipField> {
    vec![
        TooltipField::new("Time", "{timestamp}"),
        TooltipField::new("Open", "{open}"),
        TooltipField::new("High", "{high}"),
        TooltipField::new("Low", "{low}"),
        TooltipField::new("Close", "{close}"),
        TooltipField::new("Volume", "{volume}"),
        TooltipField::new("Turnover", "{turnover}"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridStyle {
    pub show: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceMarkStyle {
    pub high: bool,
    pub low: bool,
    pub last: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CandleStyle {
    #[serde(rename = "type")]
    pub kind: CandleType,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub tooltip: Option<Vec<TooltipField>>,
    pub price_mark: PriceMarkStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct YAxisStyle {
    #[serde(rename = "type")]
    pub kind: AxisKind,
    pub reverse: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndicatorStyle {
    pub last_value_mark: bool,
}

/// Full style configuration pushed through `ChartWidget::set_styles`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartStyles {
    pub grid: GridStyle,
    pub candle: CandleStyle,
    pub y_axis: YAxisStyle,
    pub indicator: IndicatorStyle,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_off_toggles() -> DisplayToggles {
        DisplayToggles {
            candle_type: CandleType::CandleDownStroke,
            show_last_price: false,
            show_high_price: false,
            show_low_price: false,
            show_last_value: false,
            axis_type: AxisKind::Log,
            reverse_axis: true,
            show_grid: false,
        }
    }

    #[test]
    fn restyle_mapping_covers_all_eight_fields() {
        let styles = all_off_toggles().to_styles();
        assert_eq!(styles.candle.kind, CandleType::CandleDownStroke);
        assert!(!styles.candle.price_mark.high);
        assert!(!styles.candle.price_mark.low);
        assert!(!styles.candle.price_mark.last);
        assert!(!styles.indicator.last_value_mark);
        assert_eq!(styles.y_axis.kind, AxisKind::Log);
        assert!(styles.y_axis.reverse);
        assert!(!styles.grid.show);
        // restyle never touches the template
        assert!(styles.candle.tooltip.is_none());
    }

    #[test]
    fn render_mapping_adds_the_tooltip_template() {
        let styles = DisplayToggles::default().to_render_styles();
        let tooltip = styles.candle.tooltip.expect("render path sets tooltip");
        let titles: Vec<&str> = tooltip.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(
            titles,
            ["Time", "Open", "High", "Low", "Close", "Volume", "Turnover"]
        );
        assert_eq!(tooltip[0].value, "{timestamp}");
        assert_eq!(tooltip[6].value, "{turnover}");
    }

    #[test]
    fn wire_names_match_the_settings_dialog() {
        assert_eq!(
            serde_json::to_value(CandleType::CandleUpStroke).unwrap(),
            "candle_up_stroke"
        );
        assert_eq!(serde_json::to_value(AxisKind::Normal).unwrap(), "normal");
        assert_eq!(
            serde_json::to_value(AxisKind::Percentage).unwrap(),
            "percentage"
        );
    }
}
