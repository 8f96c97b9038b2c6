//! Protocol modules.
//!
//! Every frame on the wire is a JSON text envelope addressed by `svc`/`type`:
//! - `text`: inbound `Envelope` (lazy `RawValue` data) and outbound `Frame`.
//! - `event`: the closed catalog of svc/type pairs the relay understands.
//! - `payload`: typed `data` bodies for each event.
//!
//! All parsers are panic-free: malformed input is reported as `RelayError`.

pub mod event;
pub mod payload;
pub mod text;

pub use event::EventKind;
pub use payload::DisplayName;
pub use text::{Envelope, Frame, PROTOCOL_VERSION};
