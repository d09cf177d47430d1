//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod app;
pub mod bridge_rx;
pub mod bridge_tx;
pub mod panel;

pub use app::app_task;
pub use bridge_rx::bridge_rx_task;
pub use bridge_tx::bridge_tx_task;
pub use panel::panel_task;
