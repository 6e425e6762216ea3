//! Wire format shared by every connection.
//!
//! Both directions use the same JSON envelope, `{ "type": ..., "data": {...} }`,
//! serialized as a single text frame.
mod error;
mod message;
mod request;

pub use error::*;
pub use message::*;
pub use request::*;
