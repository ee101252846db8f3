//! Network association surface.
//!
//! Association itself (joining the wireless network) is owned by the
//! platform; the transport only needs to know whether the link is up before
//! it spends its connection-retry budget.

pub trait NetworkStatus: Send + Sync {
    fn is_associated(&self) -> bool;
}

/// Hosted targets: the operating system manages the link, so the interface
/// is treated as associated once the process is running.
#[derive(Debug, Default)]
pub struct SystemNetwork;

impl NetworkStatus for SystemNetwork {
    fn is_associated(&self) -> bool {
        true
    }
}
