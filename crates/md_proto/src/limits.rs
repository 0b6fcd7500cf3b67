//! Size ceilings for the share-link pipeline.
//!
//! The URL limits mirror what transports actually accept: ~2000 chars of
//! query string travel everywhere (servers, proxies, unfurlers); hash
//! fragments never leave the browser and are safe into the tens of
//! thousands; beyond that links stop being portable at all.

/// Longest token that still travels as a `?doc=` query parameter.
pub const URL_PARAM_LIMIT: usize = 2000;

/// Longest token a `#doc=` fragment will carry.
pub const URL_FRAGMENT_LIMIT: usize = 50_000;

/// Document size ceiling in characters, checked before compression.
pub const MAX_DOCUMENT_SIZE: usize = 100_000;

/// Hard cap on inflate output: 4-byte worst case per character, so a
/// crafted stream cannot balloon past the document ceiling.
pub(crate) const MAX_INFLATED_BYTES: usize = MAX_DOCUMENT_SIZE * 4;
