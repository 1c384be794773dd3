use crate::ast::{BlockId, BlockKind};
use crate::processor::BlockProcessor;
use crate::registry::{BlockParser, BlockState};

/// Block quotes introduced by `>`
pub struct QuoteBlockParser;

impl QuoteBlockParser {
    /// Consume `>` and one optional column of whitespace after it
    fn consume_marker(processor: &mut BlockProcessor<'_>) {
        let line = processor.line_mut();
        line.advance();
        if matches!(line.current_char(), ' ' | '\t') {
            line.next_column();
        }
    }
}

impl BlockParser for QuoteBlockParser {
    fn opening_characters(&self) -> &[char] {
        &['>']
    }

    fn try_open(&self, processor: &mut BlockProcessor<'_>) -> BlockState {
        if processor.line().is_code_indent() || processor.line().current_char() != '>' {
            return BlockState::None;
        }

        Self::consume_marker(processor);
        processor.push_container(BlockKind::BlockQuote);
        BlockState::Continue
    }

    fn try_continue(&self, processor: &mut BlockProcessor<'_>, _block: BlockId) -> BlockState {
        let line = processor.line();
        if line.is_code_indent() {
            return BlockState::None;
        }
        if line.current_char() != '>' {
            // A blank line always ends the quote
            return if line.is_blank_line() {
                BlockState::BreakDiscard
            } else {
                BlockState::None
            };
        }

        Self::consume_marker(processor);
        BlockState::Continue
    }
}
