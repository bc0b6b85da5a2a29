//! Structured JSON exchange: strict decoding, encoding, the error envelope
//! and relaying to remote services.

pub mod decode;
pub mod encode;
pub mod error;
pub mod extract;
pub mod relay;

pub use decode::{decode_json, read_body, read_json};
pub use encode::{JsonResponse, error_json, write_json};
pub use error::JsonError;
pub use extract::StrictJson;
pub use relay::{HttpTransport, JsonTransport, RelayError, RemoteResponse, push_json_to_remote};
