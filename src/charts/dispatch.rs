//! Render Dispatcher
//! The two host-facing entry points of the kline page: `render` pushes new
//! payload data plus display styling into the chart, `restyle` pushes
//! styling alone. Every path returns the no-update sentinel; nothing here
//! panics or raises.

use crate::charts::holder::ChartInstanceHolder;
use crate::charts::messages::{MessageDescriptor, MessageHub, MESSAGE_MOUNT_ID};
use crate::charts::styles::DisplayToggles;
use crate::charts::widget::{ChartWidget, WidgetFactory};
use crate::data::{KlinePayload, PayloadStatus};

/// Fire counter of the host event that triggered the dispatch. Only
/// zero vs non-zero matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderTrigger(pub u32);

impl RenderTrigger {
    pub fn fired(&self) -> bool {
        self.0 > 0
    }
}

/// Host-contract result. `Unchanged` tells the shell its bound output
/// needs no reconciliation; chart mutation happens as a side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Unchanged,
    Changed,
}

/// Binds payloads and display toggles to the single chart instance.
pub struct RenderDispatcher<F: WidgetFactory> {
    holder: ChartInstanceHolder<F>,
    messages: MessageHub,
}

impl<F: WidgetFactory> RenderDispatcher<F> {
    pub fn new(factory: F) -> Self {
        Self {
            holder: ChartInstanceHolder::new(factory),
            messages: MessageHub::new(),
        }
    }

    /// (Re)render chart content and styling from a fresh payload.
    ///
    /// Proceeds only when the trigger fired or a payload is present, and
    /// only when the target container is mounted. A 200 payload replaces
    /// the series, applies the full style set including the tooltip
    /// template, and re-measures; a 204 payload posts the fixed no-data
    /// warning instead; anything else is absorbed.
    pub fn render(
        &mut self,
        payload: Option<&KlinePayload>,
        container_id: &str,
        trigger: RenderTrigger,
        toggles: &DisplayToggles,
    ) -> RenderOutcome {
        if !trigger.fired() && payload.is_none() {
            return RenderOutcome::Unchanged;
        }
        if !self.holder.container_ready(container_id) {
            // container not mounted yet, try again on the next dispatch
            return RenderOutcome::Unchanged;
        }
        let Some(payload) = payload else {
            return RenderOutcome::Unchanged;
        };

        match payload.status() {
            PayloadStatus::Success => {
                let Some(records) = payload.records() else {
                    log::warn!("success payload without a record series, ignoring");
                    return RenderOutcome::Unchanged;
                };
                self.messages.clear(MESSAGE_MOUNT_ID);
                let Some(widget) = self.holder.get_or_create(container_id) else {
                    return RenderOutcome::Unchanged;
                };
                widget.apply_series(records);
                widget.set_styles(&toggles.to_render_styles());
                widget.resize();
            }
            PayloadStatus::NoData => {
                self.messages
                    .set_children(MESSAGE_MOUNT_ID, MessageDescriptor::no_data_warning());
            }
            PayloadStatus::Other => {
                log::warn!("unhandled payload code {}: {}", payload.code, payload.msg);
            }
        }
        RenderOutcome::Unchanged
    }

    /// Apply styling-only changes to whatever instance exists. Silent
    /// no-op before the first render; never touches the tooltip template.
    pub fn restyle(&mut self, toggles: &DisplayToggles) -> RenderOutcome {
        if let Some(widget) = self.holder.current() {
            widget.set_styles(&toggles.to_styles());
        }
        RenderOutcome::Unchanged
    }

    pub fn messages(&self) -> &MessageHub {
        &self.messages
    }

    pub fn holder(&self) -> &ChartInstanceHolder<F> {
        &self.holder
    }

    pub fn holder_mut(&mut self) -> &mut ChartInstanceHolder<F> {
        &mut self.holder
    }
}
