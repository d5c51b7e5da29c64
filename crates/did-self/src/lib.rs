//! Self-contained [DIDs][spec]: decentralized identifiers that embed
//! everything needed to verify them directly in the identifier string.
//!
//! A classic DID is a pointer: resolving it to public keys and service
//! endpoints requires a registry, a blockchain, or an https lookup. A
//! *self-contained* DID skips resolution entirely: the public key, the
//! service endpoint, some open-ended metadata, and a signature binding all
//! of them travel inside the string itself. Whoever receives one can check,
//! offline, that it was issued by the holder of the matching private key.
//!
//! The format is a fixed-order, colon-delimited string:
//!
//! ```text
//! did:self:<alg>:<pubkey>:<endpoint>:<metadata>:<signature>
//! ```
//!
//! where every data segment is padding-free url-safe base64 and the
//! signature covers the `<alg>:<pubkey>:<endpoint>:<metadata>` text exactly
//! as transmitted. Anyone can mint one, since there is no registry to
//! collide with. What the signature proves is that the endpoint and metadata were
//! bound to that public key by someone holding its private half, and that
//! none of the segments were altered in transit.
//!
//! [spec]: https://www.w3.org/TR/did-core/

#![forbid(unsafe_code)]

pub mod base64url;
pub mod crypto;
pub mod did;

pub use crate::did::DidSelf;
