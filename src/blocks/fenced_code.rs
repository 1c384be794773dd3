use crate::ast::{BlockId, BlockKind};
use crate::processor::BlockProcessor;
use crate::registry::{BlockParser, BlockState};

use super::is_space_or_tab;

/// Code blocks between ``` or ~~~ fences
pub struct FencedCodeParser;

impl BlockParser for FencedCodeParser {
    fn opening_characters(&self) -> &[char] {
        &['`', '~']
    }

    fn try_open(&self, processor: &mut BlockProcessor<'_>) -> BlockState {
        let line = processor.line();
        if line.is_code_indent() {
            return BlockState::None;
        }

        let fence = line.current_char();
        let rest = line.remaining();
        let fence_len = rest.chars().take_while(|&c| c == fence).count();
        if fence_len < 3 {
            return BlockState::None;
        }
        let info = rest[fence_len..].trim_matches(is_space_or_tab);
        if fence == '`' && info.contains('`') {
            return BlockState::None;
        }

        let kind = BlockKind::FencedCode {
            fence,
            fence_len,
            indent: line.indent(),
            info: info.to_string(),
        };
        processor.push_leaf(kind);
        // the fence line itself is not content
        BlockState::ContinueDiscard
    }

    fn try_continue(&self, processor: &mut BlockProcessor<'_>, block: BlockId) -> BlockState {
        let (fence, fence_len, indent) = match processor.tree().kind(block) {
            BlockKind::FencedCode {
                fence,
                fence_len,
                indent,
                ..
            } => (*fence, *fence_len, *indent),
            _ => return BlockState::None,
        };

        let line = processor.line_mut();
        if !line.is_code_indent() && is_closing_fence(line.remaining(), fence, fence_len) {
            return BlockState::BreakDiscard;
        }

        // drop at most the indentation of the opening fence
        let target = line.column_before_indent() + indent;
        if line.column() > target {
            line.reset_to_column(target);
        }
        BlockState::Continue
    }
}

fn is_closing_fence(text: &str, fence: char, min_len: usize) -> bool {
    let len = text.chars().take_while(|&c| c == fence).count();
    len >= min_len && text[len..].chars().all(is_space_or_tab)
}
