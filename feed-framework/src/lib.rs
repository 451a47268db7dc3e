//! Feed Framework
//!
//! 提供增量输入 (chunked input) 的读取、检查点与回溯。
//!
//! A [`Feed`] is what a lexer or parser reads from: one element at a time,
//! with checkpoints it can roll back to. [`Stream`] is a feed whose data
//! arrives in chunks over time, [`RangeFeed`] adapts data that is already
//! complete, and [`Tracked`] adds line/column tracking to either.

pub mod checkpoint;
pub mod contract;
pub mod error;
mod node;
pub mod position;
pub mod range;
pub mod status;
pub mod stream;
pub mod tracked;
pub mod traits;

pub use checkpoint::Checkpoint;
pub use error::FeedError;
pub use position::Position;
pub use range::{adapt_range, RangeCheckpoint, RangeFeed};
pub use status::FeedStatus;
pub use stream::Stream;
pub use tracked::{Tracked, TrackedCheckpoint};
pub use traits::{Feed, LineBreak};
