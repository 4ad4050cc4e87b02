//! Claim link encoding.
//!
//! A claim link carries everything needed to locate and unlock one vault
//! deposit: `{base}?c=<chain>&v=<version>&i=<index>[&t=<track>]#p=<password>`.
//! Multilinks pack many deposits sharing a version and password into one URL,
//! optionally with `(start,count)` run-length compression of the indices.

pub mod error;
pub mod link;
pub mod multilink;
pub mod params;
mod query;
pub mod range;

pub use error::LinkError;
pub use link::{decode, decode_raw, encode};
pub use multilink::{
    combine_multilinks, create_multilink_from_links, create_multilink_from_links_strict,
    expand_multilink, is_shortened_link, shorten_multilink, MultiLink,
};
pub use params::{LinkParams, RawLinkParams, DEFAULT_BASE_URL};
