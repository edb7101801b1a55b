use thiserror::Error;

/// Failure reported by the kernel routing interface
#[derive(Debug, Error)]
pub enum KernelError {
    /// The kernel already holds a route for this destination. An ADD failing this way still
    /// leaves the destination programmed.
    #[error("route already exists")]
    AlreadyExists,
    /// The route to remove is not in the kernel, which is as good as flushed.
    #[error("no such route")]
    NotFound,
    #[error("os error {0}")]
    Os(i32),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why an advertisement did not produce a route.
/// None of these are fatal, they are reported so that the caller may log or count them.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UpdateRejected {
    #[error("martian destination")]
    Martian,
    #[error("advertisement from an unknown neighbour")]
    UnknownNeighbour,
    #[error("rejected by input filter")]
    Filtered,
    #[error("no source record for origin")]
    NoSource,
    /// The update could create a routing loop, a seqno request may have been sent instead
    #[error("unfeasible update")]
    Unfeasible,
    #[error("retraction for an unknown route")]
    UnknownRetraction,
    #[error("route table full")]
    TableFull,
}
