//! KlineView Main Application
//! Main window with control panel and chart area. CSV loading and kline
//! queries run on background threads and report over channels.

use crate::charts::{EguiChartFactory, RenderDispatcher, RenderOutcome, RenderTrigger};
use crate::data::{KlineLoader, KlinePayload, KlineQuery, PayloadStatus};
use crate::gui::{ChartArea, ControlPanel, ControlPanelAction, KLINE_CONTAINER_ID};
use anyhow::Context;
use egui::SidePanel;
use polars::prelude::*;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// CSV loading result from background thread
enum LoadResult {
    Complete {
        df: DataFrame,
        codes: Vec<String>,
        row_count: usize,
    },
    Error(String),
}

/// Main application window.
pub struct KlineViewApp {
    loader: KlineLoader,
    control_panel: ControlPanel,
    chart_area: ChartArea,
    dispatcher: RenderDispatcher<EguiChartFactory>,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,

    // Async query; the query service never fails, it answers with a
    // status-coded payload either way
    query_rx: Option<Receiver<KlinePayload>>,
    is_querying: bool,
}

impl KlineViewApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            loader: KlineLoader::new(),
            control_panel: ControlPanel::new(),
            chart_area: ChartArea::new(),
            dispatcher: RenderDispatcher::new(EguiChartFactory::new()),
            load_rx: None,
            is_loading: false,
            query_rx: None,
            is_querying: false,
        }
    }

    /// Handle CSV file selection - load in the background.
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return; // Already loading
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.control_panel.settings.csv_path = Some(path.clone());
            self.control_panel.set_progress(0.0, "Loading CSV file...");
            self.is_loading = true;

            let (tx, rx) = channel();
            self.load_rx = Some(rx);

            let path_str = path.to_string_lossy().to_string();

            thread::spawn(move || match load_kline_csv(&path_str) {
                Ok(df) => {
                    let codes = KlineLoader::codes_in(&df);
                    let row_count = df.height();
                    let _ = tx.send(LoadResult::Complete {
                        df,
                        codes,
                        row_count,
                    });
                }
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(format!("{e:#}")));
                }
            });
        }
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Complete {
                        df,
                        codes,
                        row_count,
                    } => {
                        self.loader.set_dataframe(df);
                        self.control_panel.set_progress(
                            0.0,
                            &format!("Loaded {} rows, {} securities", row_count, codes.len()),
                        );
                        self.control_panel.update_codes(codes);
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", error));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Run the kline query in a background thread.
    fn start_query(&mut self) {
        if self.is_querying {
            return;
        }

        let code = self.control_panel.settings.code.trim().to_string();
        if code.is_empty() {
            self.control_panel.set_progress(0.0, "Enter a security code");
            return;
        }
        let Some(df) = self.loader.dataframe().cloned() else {
            self.control_panel.set_progress(0.0, "No data loaded");
            return;
        };

        let (tx, rx) = channel();
        self.query_rx = Some(rx);
        self.is_querying = true;
        self.control_panel
            .set_progress(30.0, &format!("Querying {code}..."));

        thread::spawn(move || {
            let _ = tx.send(KlineQuery::fetch(&df, &code));
        });
    }

    /// Check for query results and dispatch the render.
    fn check_query_results(&mut self) {
        let rx = self.query_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(payload) = rx.try_recv() {
                self.is_querying = false;
                should_keep_receiver = false;
                self.handle_payload(payload);
            }

            if should_keep_receiver {
                self.query_rx = Some(rx);
            }
        }
    }

    fn handle_payload(&mut self, payload: KlinePayload) {
        let toggles = self.control_panel.settings.toggles;
        let trigger = RenderTrigger(self.control_panel.query_clicks);

        let outcome = self
            .dispatcher
            .render(Some(&payload), KLINE_CONTAINER_ID, trigger, &toggles);
        // the chart mutates in place; Unchanged means no shell-side state
        // to reconcile
        debug_assert_eq!(outcome, RenderOutcome::Unchanged);

        // a fresh widget starts with the registered pane visibility; align
        // it with the panel switches
        self.apply_pane_visibility();

        let code = self.control_panel.settings.code.clone();
        match payload.status() {
            PayloadStatus::Success => {
                let bars = payload.records().map(<[_]>::len).unwrap_or(0);
                self.control_panel
                    .set_progress(100.0, &format!("Rendered {bars} bars for {code}"));
            }
            PayloadStatus::NoData => {
                self.control_panel
                    .set_progress(0.0, &format!("No data for {code}"));
            }
            PayloadStatus::Other => {
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", payload.msg));
            }
        }
    }

    fn apply_restyle(&mut self) {
        let toggles = self.control_panel.settings.toggles;
        self.dispatcher.restyle(&toggles);
    }

    fn apply_pane_visibility(&mut self) {
        let show_volume = self.control_panel.settings.show_volume_pane;
        let show_macd = self.control_panel.settings.show_macd_pane;
        if let Some(chart) = self.dispatcher.holder_mut().current() {
            chart.set_indicator_visible("VOL", show_volume);
            chart.set_indicator_visible("MACD", show_macd);
        }
    }
}

impl eframe::App for KlineViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();
        self.check_query_results();

        // Request repaint while loading or querying
        if self.is_loading || self.is_querying {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(330.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::Query => self.start_query(),
                        ControlPanelAction::SettingsChanged => self.apply_restyle(),
                        ControlPanelAction::IndicatorPanesChanged => self.apply_pane_visibility(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Area
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_area.show(ui, &mut self.dispatcher);
        });
    }
}

/// Background CSV load, mirroring the loader's synchronous path.
fn load_kline_csv(path: &str) -> anyhow::Result<DataFrame> {
    LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()
        .and_then(|lazy| lazy.collect())
        .with_context(|| format!("failed to load kline CSV {path}"))
}
