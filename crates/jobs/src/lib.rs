pub mod autoreload;
pub mod fastlist_expiry;
pub mod fastlist_listener;
pub mod fastlist_persist;
pub mod runner;

pub use autoreload::AutoreloadJob;
pub use fastlist_expiry::FastlistExpiryJob;
pub use fastlist_listener::{bind_fastlist_socket, FastlistListenerJob};
pub use fastlist_persist::FastlistPersistJob;
pub use runner::JobRunner;
