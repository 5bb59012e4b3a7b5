//! Domain layer: entities, value objects and the interfaces the use case
//! layer depends on.

pub mod entity;
pub mod error;
pub mod naming;
pub mod pusher;
pub mod repository;
pub mod value_object;

pub use entity::{Identity, MessageRecord, SYSTEM_SENDER};
pub use error::RegistryError;
pub use naming::{dedupe_display_name, sanitize_display_name};
pub use pusher::{MessagePusher, PusherChannel};
pub use repository::{HistoryStore, IdentityRegistry};
pub use value_object::{ChannelKey, ConnectionId, IdentityId, IdentityIdFactory, PUBLIC_CHANNEL};
