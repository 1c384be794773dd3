use crate::ast::{BlockId, BlockKind};
use crate::processor::BlockProcessor;
use crate::registry::{BlockParser, BlockState};

/// Paragraphs, including lazy continuation lines and setext headings
pub struct ParagraphParser;

impl BlockParser for ParagraphParser {
    fn is_paragraph(&self) -> bool {
        true
    }

    fn try_open(&self, processor: &mut BlockProcessor<'_>) -> BlockState {
        if processor.line().is_blank_line() {
            return BlockState::None;
        }
        processor.push_leaf(BlockKind::Paragraph);
        BlockState::Continue
    }

    fn try_continue(&self, processor: &mut BlockProcessor<'_>, block: BlockId) -> BlockState {
        if processor.line().is_blank_line() {
            return BlockState::None;
        }

        // An underline turns the paragraph into a heading and ends it
        if let Some(level) = setext_underline(processor) {
            processor
                .tree_mut()
                .set_kind(block, BlockKind::Heading { level });
            processor.close_block(block);
            return BlockState::BreakDiscard;
        }

        BlockState::Continue
    }

    fn close(&self, processor: &mut BlockProcessor<'_>, block: BlockId) -> bool {
        !processor.tree().lines(block).is_empty()
    }
}

/// Level of the setext underline at the cursor, if the line is one and the
/// paragraph was reached without laziness
pub(crate) fn setext_underline(processor: &BlockProcessor<'_>) -> Option<u8> {
    let line = processor.line();
    if line.is_code_indent() || processor.is_lazy_continuation() {
        return None;
    }

    let text = line.remaining().trim_end_matches(super::is_space_or_tab);
    let marker = text.chars().next()?;
    if marker != '=' && marker != '-' {
        return None;
    }
    if !text.chars().all(|c| c == marker) {
        return None;
    }

    Some(if marker == '=' { 1 } else { 2 })
}
