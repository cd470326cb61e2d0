/// Errors that can occur while building the render tree.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// Element nesting exceeded the configured maximum depth.
    #[error("element nesting depth {depth} exceeds the configured limit of {limit}")]
    TooDeep { depth: usize, limit: usize },
}
