pub mod handler;
pub mod registry;
pub mod types;

pub use handler::ws_handler;
pub use registry::{RoomRegistry, WsSender};
pub use types::WsEvent;
