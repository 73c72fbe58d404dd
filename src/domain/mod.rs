pub mod entry;
pub mod feed;
pub mod outcome;

pub use entry::Entry;
pub use feed::{FeedDescriptor, Schema};
pub use outcome::{EntryOutcome, FeedOutcome, FeedStatus};
