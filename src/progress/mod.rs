//! Progress notifications for pipeline runs
//!
//! The pipeline reports a status line before and after each stage. Sinks only
//! observe; which sink is attached never changes what the pipeline does.

mod sink;

pub use sink::{ChannelSink, LogSink, NullSink, ProgressSink};

#[cfg(test)]
pub use sink::CollectingSink;
