//! Graph configuration options.

#[derive(Debug, Clone, Copy, Default)]
pub struct GraphOptions {
    /// Track parent/child relations and group nodes.
    pub compound: bool,
}
