pub mod client;
pub mod events;
pub mod progress;
pub mod source;
pub mod transport;
pub mod watcher;
