//! md_proto — share-token wire format for mdlink
//!
//! A document travels inside a URL as a compact token:
//! gzip → base64 → optional password envelope → transport channel.
//! Decode runs the mirror image. All operations are value-in/value-out;
//! no shared mutable state, so independent documents encode and decode
//! concurrently without locking.
//!
//! # Modules
//! - `compress`  — gzip deflate/inflate
//! - `codec`     — base64 + URL percent-escaping
//! - `envelope`  — plain vs password-protected token container
//! - `transport` — query/fragment channel selection, URL build/extract
//! - `limits`    — size ceilings shared across the pipeline
//! - `api`       — encode/decode facade for the UI collaborators
//! - `error`     — unified error type

pub mod api;
pub mod codec;
pub mod compress;
pub mod envelope;
pub mod error;
pub mod limits;
pub mod transport;

pub use api::{decode, decode_async, encode, encode_async, DecodeOutcome, EncodeOutcome};
pub use envelope::{classify, ProtectedEnvelope, TokenKind, PROTECTED_MARKER};
pub use error::PipelineError;
pub use limits::{MAX_DOCUMENT_SIZE, URL_FRAGMENT_LIMIT, URL_PARAM_LIMIT};
pub use transport::{build_url, extract_token, select_channel, shareable_url, TransportChannel};
