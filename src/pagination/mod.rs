//! Pagination module
//!
//! Continuation-reference pagination for REST collections.
//!
//! # Overview
//!
//! A collection endpoint answers with an envelope holding an item array and,
//! while more results exist, a continuation reference (a fully qualified
//! URL). `PagedCollectionFetcher` follows those references until one is
//! missing and exposes the result as a lazy stream. The envelope key names
//! are supplied by the caller, so the same fetcher serves devices, group
//! members, recovery keys or any other record family.

mod fetcher;
mod types;

pub use fetcher::PagedCollectionFetcher;
pub use types::{DispatchMode, EnvelopeKeys, Page};
