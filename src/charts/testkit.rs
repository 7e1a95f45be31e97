//! Recording fakes for dispatcher and holder tests. Call logs are shared
//! through `Rc` so they stay inspectable after the widget moves into the
//! holder slot.

use crate::charts::styles::ChartStyles;
use crate::charts::widget::{ChartWidget, IndicatorSpec, PaneOptions, WidgetFactory};
use crate::data::KlineRecord;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

pub type CallLog = Rc<RefCell<Vec<WidgetCall>>>;

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetCall {
    CreateIndicator {
        spec: IndicatorSpec,
        visible: bool,
        pane: Option<PaneOptions>,
    },
    ApplySeries(Vec<KlineRecord>),
    SetStyles(ChartStyles),
    Resize,
}

pub struct FakeWidget {
    calls: CallLog,
}

impl ChartWidget for FakeWidget {
    fn create_indicator(&mut self, spec: IndicatorSpec, visible: bool, pane: Option<PaneOptions>) {
        self.calls.borrow_mut().push(WidgetCall::CreateIndicator {
            spec,
            visible,
            pane,
        });
    }

    fn apply_series(&mut self, records: &[KlineRecord]) {
        self.calls
            .borrow_mut()
            .push(WidgetCall::ApplySeries(records.to_vec()));
    }

    fn set_styles(&mut self, styles: &ChartStyles) {
        self.calls
            .borrow_mut()
            .push(WidgetCall::SetStyles(styles.clone()));
    }

    fn resize(&mut self) {
        self.calls.borrow_mut().push(WidgetCall::Resize);
    }
}

pub struct FakeFactory {
    mounted: HashSet<String>,
    calls: CallLog,
    pub init_calls: usize,
}

impl FakeFactory {
    pub fn with_mounted(container_ids: &[&str]) -> Self {
        Self {
            mounted: container_ids.iter().map(|id| id.to_string()).collect(),
            calls: Rc::new(RefCell::new(Vec::new())),
            init_calls: 0,
        }
    }

    /// Handle to the shared call log; clone before moving the factory.
    pub fn calls(&self) -> CallLog {
        Rc::clone(&self.calls)
    }
}

impl WidgetFactory for FakeFactory {
    type Widget = FakeWidget;

    fn is_mounted(&self, container_id: &str) -> bool {
        self.mounted.contains(container_id)
    }

    fn init(&mut self, container_id: &str) -> Option<FakeWidget> {
        self.init_calls += 1;
        if !self.mounted.contains(container_id) {
            return None;
        }
        Some(FakeWidget {
            calls: Rc::clone(&self.calls),
        })
    }
}

/// The widget calls recorded after the fixed indicator registrations.
pub fn calls_after_setup(log: &CallLog) -> Vec<WidgetCall> {
    log.borrow()
        .iter()
        .filter(|c| !matches!(c, WidgetCall::CreateIndicator { .. }))
        .cloned()
        .collect()
}
