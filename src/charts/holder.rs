//! Chart Instance Holder
//! One lazily-created widget per page. The slot is filled through the
//! injected factory on first use and reused for the rest of the session.

use crate::charts::widget::{ChartWidget, IndicatorSpec, PaneOptions, WidgetFactory};

/// Moving-average periods registered on the price pane at creation.
pub const MA_CALC_PARAMS: [usize; 6] = [5, 10, 30, 60, 120, 250];

/// Owns the single widget slot and the factory that can fill it.
///
/// Known limitation: once created, the same widget is returned no matter
/// which container id later calls ask for. This page manages one chart.
pub struct ChartInstanceHolder<F: WidgetFactory> {
    factory: F,
    widget: Option<F::Widget>,
}

impl<F: WidgetFactory> ChartInstanceHolder<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            widget: None,
        }
    }

    /// Existing widget, or a new one bound to `container_id`. Returns
    /// `None` without side effects while the container is not mounted.
    ///
    /// A fresh widget gets the page's fixed indicator set before it is
    /// handed out: volume and MACD hidden in their own panes, the
    /// moving-average overlay visible on the price pane.
    pub fn get_or_create(&mut self, container_id: &str) -> Option<&mut F::Widget> {
        if self.widget.is_none() {
            let mut widget = self.factory.init(container_id)?;
            widget.create_indicator(IndicatorSpec::named("VOL"), false, None);
            widget.create_indicator(IndicatorSpec::named("MACD"), false, None);
            widget.create_indicator(
                IndicatorSpec::with_params("MA", MA_CALC_PARAMS.to_vec()),
                true,
                Some(PaneOptions::candle_pane()),
            );
            self.widget = Some(widget);
        }
        self.widget.as_mut()
    }

    /// Whatever widget currently exists, without creating one.
    pub fn current(&mut self) -> Option<&mut F::Widget> {
        self.widget.as_mut()
    }

    pub fn is_initialized(&self) -> bool {
        self.widget.is_some()
    }

    /// Whether the factory can currently resolve `container_id`.
    pub fn container_ready(&self, container_id: &str) -> bool {
        self.factory.is_mounted(container_id)
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::testkit::{FakeFactory, WidgetCall};

    #[test]
    fn creation_is_lazy_and_idempotent() {
        let factory = FakeFactory::with_mounted(&["kline"]);
        let calls = factory.calls();
        let mut holder = ChartInstanceHolder::new(factory);
        assert!(!holder.is_initialized());

        assert!(holder.get_or_create("kline").is_some());
        assert!(holder.get_or_create("kline").is_some());
        // a different id still resolves to the one existing widget
        assert!(holder.get_or_create("other").is_some());

        assert!(holder.is_initialized());
        assert_eq!(holder.factory_mut().init_calls, 1);
        let indicator_calls = calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, WidgetCall::CreateIndicator { .. }))
            .count();
        assert_eq!(indicator_calls, 3);
    }

    #[test]
    fn unmounted_container_yields_nothing() {
        let factory = FakeFactory::with_mounted(&[]);
        let mut holder = ChartInstanceHolder::new(factory);
        assert!(holder.get_or_create("kline").is_none());
        assert!(!holder.is_initialized());
        assert!(holder.current().is_none());
    }

    #[test]
    fn fixed_indicator_set_registered_in_order() {
        let factory = FakeFactory::with_mounted(&["kline"]);
        let calls = factory.calls();
        let mut holder = ChartInstanceHolder::new(factory);
        holder.get_or_create("kline");

        let recorded = calls.borrow();
        match &recorded[0] {
            WidgetCall::CreateIndicator {
                spec,
                visible,
                pane,
            } => {
                assert_eq!(spec.name, "VOL");
                assert!(!visible);
                assert!(pane.is_none());
            }
            other => panic!("unexpected call: {other:?}"),
        }
        match &recorded[1] {
            WidgetCall::CreateIndicator { spec, visible, .. } => {
                assert_eq!(spec.name, "MACD");
                assert!(!visible);
            }
            other => panic!("unexpected call: {other:?}"),
        }
        match &recorded[2] {
            WidgetCall::CreateIndicator {
                spec,
                visible,
                pane,
            } => {
                assert_eq!(spec.name, "MA");
                assert_eq!(spec.calc_params, MA_CALC_PARAMS);
                assert!(visible);
                assert_eq!(pane.as_ref().map(|p| p.id.as_str()), Some("candle_pane"));
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }
}
