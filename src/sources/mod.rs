//! Upstream feed sources.
//!
//! A source is a short id (`rust`, `all`, `rust+golang`) that maps to exactly
//! one listing URL. Fetching a source is a single GET followed by a JSON
//! decode; there is no pagination and no retry.
//!
//! | Source | Module | URL |
//! |--------|--------|-----|
//! | Reddit-style listing | [`reddit`] | `<base>/r/<id>.json` |

pub mod reddit;

use once_cell::sync::Lazy;
use regex::Regex;

static SOURCE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_+\-]*$").expect("source id regex is valid"));

/// Whether `id` can be used as a single URL path segment for a listing.
///
/// Subreddit names are alphanumeric plus `_`; `+` joins several into one
/// multi-feed and `-` is tolerated for mirrors that use it.
pub fn is_valid_source_id(id: &str) -> bool {
    SOURCE_ID.is_match(id)
}
