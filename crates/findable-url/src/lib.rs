//! # Findable URL
//!
//! C1 of the audit pipeline: URL canonicalization, robots.txt parsing and
//! sitemap/sitemap-index parsing, extracted into its own crate so the
//! normalizer's idempotence invariant can be unit-tested in isolation from
//! the network layer.

pub mod normalize;
pub mod robots;
pub mod sitemap;

pub use normalize::{extract_domain, get_url_depth, is_internal_url, is_same_domain, normalize};
pub use robots::{RobotsParser, RobotsRule};
pub use sitemap::{SitemapEntry, SitemapFetchResult, SitemapParser};
