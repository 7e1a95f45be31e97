//! Message Hub Module
//! Notification mount points. A mount's children are replaced wholesale
//! with one structured descriptor the shell's banner renderer understands.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fixed mount the kline page posts its warnings to.
pub const MESSAGE_MOUNT_ID: &str = "stock-line_message_container";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageProps {
    pub kind: MessageKind,
    pub content: String,
}

/// Structured notification descriptor: which component renders it, from
/// which component namespace, and its props.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDescriptor {
    pub component: String,
    pub namespace: String,
    pub props: MessageProps,
}

impl MessageDescriptor {
    pub fn warning(content: &str) -> Self {
        Self {
            component: "Message".to_string(),
            namespace: "klineview".to_string(),
            props: MessageProps {
                kind: MessageKind::Warning,
                content: content.to_string(),
            },
        }
    }

    /// The fixed no-data warning shown when a query returns code 204.
    pub fn no_data_warning() -> Self {
        Self::warning(
            "No data found for this security. Check that the code is correct \
             and that the data sync job has run.",
        )
    }
}

/// Holds at most one descriptor per mount id.
#[derive(Debug, Default)]
pub struct MessageHub {
    mounts: HashMap<String, MessageDescriptor>,
}

impl MessageHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the mount's children with `descriptor`.
    pub fn set_children(&mut self, mount_id: &str, descriptor: MessageDescriptor) {
        self.mounts.insert(mount_id.to_string(), descriptor);
    }

    /// Empty the mount.
    pub fn clear(&mut self, mount_id: &str) {
        self.mounts.remove(mount_id);
    }

    pub fn get(&self, mount_id: &str) -> Option<&MessageDescriptor> {
        self.mounts.get(mount_id)
    }
}
