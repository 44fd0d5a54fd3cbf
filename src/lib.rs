//! SMPP v3.4 PDU codec.
//!
//! This crate encodes and decodes Short Message Peer-to-Peer protocol (SMPP)
//! v3.4 PDUs, plus the 3GPP TS 23.040 User Data Header carried inside
//! `short_message`/`message_payload` when a message is segmented or carries
//! a port-addressed binary payload. It is a codec, not a client: opening a
//! socket, framing a byte stream into PDUs, and managing a bind session are
//! left to the caller.
//!
//! ```
//! use smpp::codec::Encodable;
//! use smpp::datatypes::CommandId;
//! use smpp::pdu::Pdu;
//!
//! let pdu = Pdu::new(CommandId::EnquireLink, 1);
//! let bytes = pdu.to_bytes();
//! let (decoded, consumed) = Pdu::decode(&bytes).unwrap();
//! assert_eq!(consumed, bytes.len());
//! assert_eq!(decoded.command_id, CommandId::EnquireLink);
//! ```

pub mod codec;
pub mod datatypes;
pub mod pdu;
pub mod primitives;
pub mod udh;

pub use codec::{CodecError, Encodable, PduHeader, MAX_PDU_SIZE};
pub use pdu::{ParamName, Pdu, Value};

/// Error returned by most functions.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// A specialized `Result` type for SMPP codec operations.
pub type Result<T> = std::result::Result<T, Error>;
