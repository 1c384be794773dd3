/// Faults raised when a block parser breaks the stacking discipline
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error(
        "block at stack index {index} opened new blocks but is not the innermost open block (stack depth {depth})"
    )]
    NewBlocksFromOuterBlock { index: usize, depth: usize },

    #[error("leaf block is pending at position {position} of {count}; a leaf must be the innermost new block")]
    LeafNotInnermost { position: usize, count: usize },

    #[error("{count} new block(s) still pending while processing line {line}")]
    PendingNotEmpty { line: usize, count: usize },
}
