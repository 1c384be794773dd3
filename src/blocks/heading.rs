use crate::ast::{BlockId, BlockKind};
use crate::processor::BlockProcessor;
use crate::registry::{BlockParser, BlockState};

use super::is_space_or_tab;

/// ATX headings (`# title`)
pub struct HeadingParser;

impl BlockParser for HeadingParser {
    fn opening_characters(&self) -> &[char] {
        &['#']
    }

    fn try_open(&self, processor: &mut BlockProcessor<'_>) -> BlockState {
        let line = processor.line();
        if line.is_code_indent() {
            return BlockState::None;
        }

        let rest = line.remaining();
        let level = rest.chars().take_while(|&c| c == '#').count();
        if level == 0 || level > 6 {
            return BlockState::None;
        }
        if !rest[level..].chars().next().is_none_or(is_space_or_tab) {
            return BlockState::None;
        }

        let line = processor.line_mut();
        for _ in 0..level {
            line.advance();
        }
        line.parse_indent();
        let end = line.start() + content_len(line.remaining());
        line.set_end(end);

        processor.push_leaf(BlockKind::Heading { level: level as u8 });
        BlockState::Break
    }

    fn try_continue(&self, _processor: &mut BlockProcessor<'_>, _block: BlockId) -> BlockState {
        BlockState::Break
    }
}

/// Length of the heading text once the closing `#` sequence is dropped
fn content_len(content: &str) -> usize {
    let trimmed = content.trim_end_matches(is_space_or_tab);
    let before_hashes = trimmed.trim_end_matches('#');
    if before_hashes.is_empty() {
        0
    } else if before_hashes.len() < trimmed.len() && before_hashes.ends_with(is_space_or_tab) {
        before_hashes.trim_end_matches(is_space_or_tab).len()
    } else {
        trimmed.len()
    }
}
