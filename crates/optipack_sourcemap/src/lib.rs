mod source;
mod source_joiner;

pub use crate::source::Source;
pub use crate::source_joiner::SourceJoiner;
