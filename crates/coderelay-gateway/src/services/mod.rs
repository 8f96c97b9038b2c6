//! Built-in relay services, one per `svc` namespace.

pub mod chat;
pub mod code;
pub mod cursor;
pub mod session;

pub use chat::ChatService;
pub use code::CodeService;
pub use cursor::CursorService;
pub use session::RoomService;
