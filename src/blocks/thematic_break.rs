use super::paragraph::setext_underline;
use crate::ast::{BlockId, BlockKind};
use crate::processor::BlockProcessor;
use crate::registry::{BlockParser, BlockState};

/// `***`, `---` and `___` lines
pub struct ThematicBreakParser;

impl BlockParser for ThematicBreakParser {
    fn opening_characters(&self) -> &[char] {
        &['-', '*', '_']
    }

    fn try_open(&self, processor: &mut BlockProcessor<'_>) -> BlockState {
        let line = processor.line();
        if line.is_code_indent() {
            return BlockState::None;
        }

        let marker = line.current_char();
        let mut count = 0;
        for c in line.remaining().chars() {
            if c == marker {
                count += 1;
            } else if !super::is_space_or_tab(c) {
                return BlockState::None;
            }
        }
        if count < 3 {
            return BlockState::None;
        }

        // `---` right below a paragraph is a setext underline
        let last = processor.current_block();
        if marker == '-'
            && *processor.tree().kind(last) == BlockKind::Paragraph
            && setext_underline(processor).is_some()
        {
            return BlockState::None;
        }

        processor.push_leaf(BlockKind::ThematicBreak);
        BlockState::BreakDiscard
    }

    fn try_continue(&self, _processor: &mut BlockProcessor<'_>, _block: BlockId) -> BlockState {
        BlockState::Break
    }
}
