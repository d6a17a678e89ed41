//! Data models for feed listings and the items extracted from them.
//!
//! The upstream body has the shape
//! `{ "data": { "children": [ { "data": { "title": .., "url": .. } }, .. ] } }`.
//! [`Listing`] mirrors that envelope so `serde_json` can decode it directly,
//! and [`Listing::into_items`] flattens it into the [`Item`]s the rest of the
//! application works with.

use serde::{Deserialize, Serialize};

/// One user-facing entry of a listing: a title and the link it points at.
///
/// Items are immutable once decoded and are dropped as soon as the sink has
/// rendered them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Item {
    /// The headline of the post.
    pub title: String,
    /// The URL the post links to.
    pub url: String,
}

/// Decoded response body for a single source fetch.
#[derive(Debug, Deserialize)]
pub struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Item,
}

impl Listing {
    /// Number of items in the listing.
    pub fn len(&self) -> usize {
        self.data.children.len()
    }

    /// Consume the listing, yielding its items in listing order.
    pub fn into_items(self) -> impl ExactSizeIterator<Item = Item> {
        self.data.children.into_iter().map(|child| child.data)
    }
}
