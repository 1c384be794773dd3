use crate::ast::{BlockId, BlockKind};
use crate::cursor::LineCursor;
use crate::processor::BlockProcessor;
use crate::registry::{BlockParser, BlockState};

use super::is_space_or_tab;

/// Bullet and ordered lists. Each item opens a `ListItem` container inside
/// a `List` container that groups consecutive compatible items.
pub struct ListParser;

const LIST_CHARS: [char; 13] = [
    '-', '+', '*', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];

#[derive(Debug, Clone, Copy)]
struct Marker {
    ordered: bool,
    /// Bullet character, or the delimiter of an ordered marker
    marker: char,
    start: u32,
    len: usize,
}

fn scan_marker(line: &LineCursor) -> Option<Marker> {
    let rest = line.remaining();
    let marker = match line.current_char() {
        c @ ('-' | '+' | '*') => Marker {
            ordered: false,
            marker: c,
            start: 0,
            len: 1,
        },
        '0'..='9' => {
            let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
            if digits > 9 {
                return None;
            }
            let delimiter = rest[digits..].chars().next()?;
            if delimiter != '.' && delimiter != ')' {
                return None;
            }
            Marker {
                ordered: true,
                marker: delimiter,
                start: rest[..digits].parse().ok()?,
                len: digits + 1,
            }
        }
        _ => return None,
    };

    // the marker must be followed by whitespace or the end of the line
    match rest[marker.len..].chars().next() {
        None => Some(marker),
        Some(c) if is_space_or_tab(c) => Some(marker),
        Some(_) => None,
    }
}

/// The list a new item with `marker` belongs to: the first block above the
/// deepest reaffirmed one, when it is a compatible list
fn reusable_list(processor: &BlockProcessor<'_>, marker: &Marker) -> Option<BlockId> {
    let tree = processor.tree();
    let stack = processor.open_blocks();
    let deepest_open = stack.iter().rposition(|&b| tree.is_open(b)).unwrap_or(0);
    let candidate = *stack.get(deepest_open + 1)?;
    match tree.kind(candidate) {
        BlockKind::List {
            ordered,
            marker: existing,
            ..
        } if *ordered == marker.ordered && *existing == marker.marker => Some(candidate),
        _ => None,
    }
}

impl ListParser {
    fn try_continue_item(
        processor: &mut BlockProcessor<'_>,
        block: BlockId,
        content_width: usize,
        started_blank: bool,
    ) -> BlockState {
        let line = processor.line();
        if line.is_blank_line() {
            // an item can begin with at most one blank line
            if started_blank && processor.tree().children(block).is_empty() {
                return BlockState::None;
            }
            return BlockState::Continue;
        }

        if line.indent() < content_width {
            return BlockState::None;
        }

        // give back indentation beyond the item's content column
        let target = line.column_before_indent() + content_width;
        processor.line_mut().go_to_column(target);
        BlockState::Continue
    }
}

impl BlockParser for ListParser {
    fn opening_characters(&self) -> &[char] {
        &LIST_CHARS
    }

    fn try_open(&self, processor: &mut BlockProcessor<'_>) -> BlockState {
        if processor.line().is_code_indent() {
            return BlockState::None;
        }
        let Some(marker) = scan_marker(processor.line()) else {
            return BlockState::None;
        };
        let empty = processor.line().remaining()[marker.len..]
            .chars()
            .all(is_space_or_tab);

        // Interrupting a paragraph outside of a list needs a real first item
        let tree = processor.tree();
        let last = processor.current_block();
        let in_item = matches!(
            tree.kind(processor.current_container()),
            BlockKind::ListItem { .. }
        );
        if *tree.kind(last) == BlockKind::Paragraph
            && !in_item
            && (empty || (marker.ordered && marker.start != 1))
        {
            return BlockState::None;
        }

        let origin = processor.line().column_before_indent();
        let line = processor.line_mut();
        for _ in 0..marker.len {
            line.advance();
        }
        let after_marker = line.column();
        line.parse_indent();
        let content_column = if empty {
            after_marker + 1
        } else if line.column() - after_marker > 4 {
            // content that would be code starts one column after the marker
            line.reset_to_column(after_marker + 1);
            after_marker + 1
        } else {
            line.column()
        };

        match reusable_list(processor, &marker) {
            Some(list) => processor.open_block(list),
            None => {
                processor.push_container(BlockKind::List {
                    ordered: marker.ordered,
                    marker: marker.marker,
                    start: marker.start,
                });
            }
        }
        processor.push_container(BlockKind::ListItem {
            content_width: content_column - origin,
            started_blank: empty,
        });
        BlockState::Continue
    }

    fn try_continue(&self, processor: &mut BlockProcessor<'_>, block: BlockId) -> BlockState {
        let kind = processor.tree().kind(block).clone();
        match kind {
            BlockKind::List { .. } => {
                // items decide for the list
                let tree = processor.tree();
                let has_item = processor
                    .next_continue()
                    .is_some_and(|next| matches!(tree.kind(next), BlockKind::ListItem { .. }));
                if has_item {
                    BlockState::Skip
                } else {
                    BlockState::None
                }
            }
            BlockKind::ListItem {
                content_width,
                started_blank,
            } => Self::try_continue_item(processor, block, content_width, started_blank),
            _ => BlockState::None,
        }
    }
}
