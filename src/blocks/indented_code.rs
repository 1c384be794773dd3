use crate::ast::{BlockId, BlockKind};
use crate::processor::BlockProcessor;
use crate::registry::{BlockParser, BlockState};

/// Code blocks indented by four or more columns
pub struct IndentedCodeParser;

impl BlockParser for IndentedCodeParser {
    fn can_interrupt(&self, processor: &BlockProcessor<'_>, block: BlockId) -> bool {
        *processor.tree().kind(block) != BlockKind::Paragraph
    }

    fn try_open(&self, processor: &mut BlockProcessor<'_>) -> BlockState {
        let line = processor.line_mut();
        if !line.is_code_indent() || line.is_blank_line() {
            return BlockState::None;
        }
        line.reset_to_code_indent(0);
        processor.push_leaf(BlockKind::IndentedCode);
        BlockState::Continue
    }

    fn try_continue(&self, processor: &mut BlockProcessor<'_>, _block: BlockId) -> BlockState {
        let line = processor.line_mut();
        if line.is_blank_line() {
            if line.is_code_indent() {
                line.reset_to_code_indent(0);
            }
            return BlockState::Continue;
        }
        if !line.is_code_indent() {
            return BlockState::None;
        }
        line.reset_to_code_indent(0);
        BlockState::Continue
    }

    fn close(&self, processor: &mut BlockProcessor<'_>, block: BlockId) -> bool {
        // trailing blank lines are not part of the block
        if let Some(lines) = processor.tree_mut().lines_mut(block) {
            while lines.last().is_some_and(|l| l.text.trim().is_empty()) {
                lines.pop();
            }
        }
        true
    }
}
