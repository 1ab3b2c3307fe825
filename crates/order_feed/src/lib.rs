pub mod api;
pub mod backend_order_api;
pub mod errors;
pub mod feed_state;
pub mod monitor;
pub mod pending_queue;
pub mod printers;
pub mod runtime;
pub mod session;
pub mod settings;
pub mod stores;
pub mod tickets;

pub use crate::api::OrderSource;
pub use crate::backend_order_api::{BackendApiData, BackendOrderSource};
pub use crate::errors::{FetchError, PrintError};
pub use crate::feed_state::{FeedEvent, FeedPhase, FeedState, SideEffect};
pub use crate::monitor::{FeedCollaborators, OrderFeedMonitor, ShutdownSignal};
pub use crate::printers::{PrintSink, SpoolDirectoryPrinter};
pub use crate::runtime::{FeedSnapshot, MonitorHandle, OperatorCommand};
