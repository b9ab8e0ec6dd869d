use thiserror::Error;

/// Errors from configuring a filter or feeding it mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The engine name is neither `ac` nor `dfa`.
    #[error("unknown filter engine {0:?}, expected \"ac\" or \"dfa\"")]
    UnknownEngine(String),
    /// The receiving side of a mutation feed was dropped.
    #[error("mutation feed is closed")]
    FeedClosed,
}
