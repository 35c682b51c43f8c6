pub mod feed;
pub mod gesture;
mod http;
pub mod store;
pub mod transport;

pub use feed::{FeedItem, RawFeedRecord};
pub use gesture::{GestureInterpreter, GestureSession, GestureThresholds};
pub use store::{FeedSnapshot, FeedStore, Notification, Phase};
pub use transport::{Endpoint, FeedTransport, HttpFeedTransport, TransportError};
