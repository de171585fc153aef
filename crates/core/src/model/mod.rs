//! Value shapes stored in the cache domains.
//!
//! These mirror the fractalthorns API objects after the fetch flows have
//! resolved relative URLs and attached titles from sibling endpoints.

mod episodic;
mod image;
mod news;
mod search;

pub use episodic::{Chapter, Record, RecordLine, RecordText};
pub use image::{Image, ImageContents, ImageDescription};
pub use news::NewsEntry;
pub use search::{SearchResult, SearchType};
