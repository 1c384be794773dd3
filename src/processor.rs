/// Line-by-line block processor driving the stack of open blocks
use crate::ast::{BlockId, BlockKind, BlockTree, StringLine};
use crate::cursor::LineCursor;
use crate::error::BlockError;
use crate::registry::{BlockState, ParserId, ParserRegistry};
use std::collections::VecDeque;

pub struct BlockProcessor<'r> {
    registry: &'r ParserRegistry,
    tree: BlockTree,
    /// Path from the document to the block receiving the current line
    stack: Vec<BlockId>,
    /// Blocks created by the running callback, outermost first
    new_blocks: VecDeque<BlockId>,
    line: LineCursor,
    lines_seen: usize,
    continue_processing_line: bool,
    /// Set when the continuation walk got down to an open paragraph
    reached_paragraph: bool,
    /// Parser whose callback is running; new blocks are attributed to it
    current_parser: Option<ParserId>,
    current_block: BlockId,
    current_container: BlockId,
    next_continue: Option<BlockId>,
}

impl<'r> BlockProcessor<'r> {
    pub fn new(registry: &'r ParserRegistry) -> Self {
        let tree = BlockTree::new();
        let document = tree.document();
        BlockProcessor {
            registry,
            tree,
            stack: vec![document],
            new_blocks: VecDeque::new(),
            line: LineCursor::new(),
            lines_seen: 0,
            continue_processing_line: false,
            reached_paragraph: false,
            current_parser: None,
            current_block: document,
            current_container: document,
            next_continue: None,
        }
    }

    pub fn registry(&self) -> &'r ParserRegistry {
        self.registry
    }

    pub fn line(&self) -> &LineCursor {
        &self.line
    }

    pub fn line_mut(&mut self) -> &mut LineCursor {
        &mut self.line
    }

    /// Zero-based index of the line being processed
    pub fn line_index(&self) -> usize {
        self.lines_seen.saturating_sub(1)
    }

    pub fn tree(&self) -> &BlockTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut BlockTree {
        &mut self.tree
    }

    pub fn document(&self) -> BlockId {
        self.tree.document()
    }

    /// The open-block stack, document first
    pub fn open_blocks(&self) -> &[BlockId] {
        &self.stack
    }

    /// Block whose callback is running during the continuation walk,
    /// otherwise the deepest open block
    pub fn current_block(&self) -> BlockId {
        self.current_block
    }

    /// Deepest container at or below the current block; new blocks get
    /// attached here
    pub fn current_container(&self) -> BlockId {
        self.current_container
    }

    /// Stack entry right below the block being continued
    pub fn next_continue(&self) -> Option<BlockId> {
        self.next_continue
    }

    /// True unless the continuation walk reached the open paragraph, i.e.
    /// the line could only extend it lazily
    pub fn is_lazy_continuation(&self) -> bool {
        !self.reached_paragraph
    }

    pub fn new_blocks(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.new_blocks.iter().copied()
    }

    /// Create a container and queue it for attachment
    pub fn push_container(&mut self, kind: BlockKind) -> BlockId {
        self.push_new_block(kind, false)
    }

    /// Create a leaf and queue it for attachment. It must be the last block
    /// queued during the callback.
    pub fn push_leaf(&mut self, kind: BlockKind) -> BlockId {
        self.push_new_block(kind, true)
    }

    fn push_new_block(&mut self, kind: BlockKind, leaf: bool) -> BlockId {
        let block = self.tree.create(kind, leaf, self.current_parser);
        self.new_blocks.push_back(block);
        block
    }

    /// Keep a block open for this line even though it did not continue
    pub fn open_block(&mut self, block: BlockId) {
        self.tree.set_open(block, true);
    }

    /// Close `block` and everything above it on the stack, top-down
    pub fn close_block(&mut self, block: BlockId) {
        if block == self.document() {
            return;
        }
        while self.stack.len() > 1 && self.stack.contains(&block) {
            let Some(&top) = self.stack.last() else {
                break;
            };
            self.close(top);
            if top == block {
                break;
            }
        }
        self.update_last_block_and_container(None);
    }

    /// Remove a block without running its close callback. Stack entries
    /// above it go with it.
    pub fn discard(&mut self, block: BlockId) {
        if block == self.document() {
            return;
        }
        if let Some(position) = self.new_blocks.iter().position(|&b| b == block) {
            self.new_blocks.remove(position);
            log::debug!("line {}: discarded pending {:?}", self.line_index(), self.tree.kind(block));
            return;
        }
        self.tree.detach(block);
        if let Some(position) = self.stack.iter().position(|&b| b == block) {
            self.stack.truncate(position);
        }
        log::debug!("line {}: discarded {:?}", self.line_index(), self.tree.kind(block));
        self.update_last_block_and_container(None);
    }

    /// Feed one line of the document
    pub fn process_line(&mut self, text: &str) -> Result<(), BlockError> {
        self.ensure_no_new_blocks()?;

        let text = text.strip_suffix('\n').unwrap_or(text);
        let text = text.strip_suffix('\r').unwrap_or(text);
        self.lines_seen += 1;
        self.line.reset(text);
        self.continue_processing_line = true;
        self.reached_paragraph = false;
        log::trace!("line {}: {:?}", self.line_index(), text);

        self.try_continue_blocks()?;
        self.next_continue = None;
        self.try_open_blocks()?;
        self.close_all(false);

        self.ensure_no_new_blocks()
    }

    /// Close every remaining block and hand over the tree
    pub fn finish(mut self) -> Result<BlockTree, BlockError> {
        self.ensure_no_new_blocks()?;
        self.close_all(true);
        Ok(self.tree)
    }

    /// Close blocks from the top of the stack. Without `force` this stops
    /// at the first block still open for the current line.
    pub fn close_all(&mut self, force: bool) {
        while self.stack.len() > 1 {
            let Some(&block) = self.stack.last() else {
                break;
            };
            if !force && self.tree.is_open(block) {
                break;
            }
            self.close(block);
        }
        self.update_last_block_and_container(None);
    }

    fn close(&mut self, block: BlockId) {
        if let Some(parser) = self.tree.get(block).parser {
            let registry = self.registry;
            let keep = self.with_parser(parser, |this| registry.parser(parser).close(this, block));
            if !keep {
                self.tree.detach(block);
                log::debug!("line {}: dropped {:?}", self.line_index(), self.tree.kind(block));
            }
        }
        // the callback may have reshaped the stack
        if let Some(position) = self.stack.iter().rposition(|&b| b == block) {
            self.stack.remove(position);
        }
        self.tree.set_open(block, false);
        log::debug!("line {}: closed {:?}", self.line_index(), self.tree.kind(block));
    }

    fn open_all(&mut self) {
        for &block in &self.stack[1..] {
            self.tree.set_open(block, true);
        }
    }

    fn try_continue_blocks(&mut self) -> Result<(), BlockError> {
        // blocks get reaffirmed below
        for &block in &self.stack[1..] {
            self.tree.set_open(block, false);
        }

        let registry = self.registry;
        let mut i = 1;
        while i < self.stack.len() {
            let block = self.stack[i];
            self.line.parse_indent();

            // paragraphs continue through the opening phase
            if *self.tree.kind(block) == BlockKind::Paragraph {
                self.reached_paragraph = true;
                break;
            }
            let Some(parser) = self.tree.get(block).parser else {
                break;
            };

            self.update_last_block_and_container(Some(i));
            self.next_continue = self.stack.get(i + 1).copied();
            let state = self.with_parser(parser, |this| {
                registry.parser(parser).try_continue(this, block)
            });
            match state {
                BlockState::Skip => {
                    self.ensure_no_new_blocks()?;
                    i += 1;
                    continue;
                }
                BlockState::None => {
                    self.ensure_no_new_blocks()?;
                    break;
                }
                _ => {}
            }

            self.line.restart_indent();

            // re-validate the position, the callback may have closed or
            // discarded stack entries
            let on_stack = self.stack.iter().position(|&b| b == block);
            let index = on_stack.unwrap_or(self.stack.len() - 1);

            if index + 1 < self.stack.len() && !self.new_blocks.is_empty() {
                return Err(BlockError::NewBlocksFromOuterBlock {
                    index,
                    depth: self.stack.len(),
                });
            }

            if on_stack.is_some() {
                if self.tree.is_leaf(block) && self.new_blocks.is_empty() {
                    self.continue_processing_line = false;
                    if !state.is_discard() {
                        self.append_line(block);
                    }
                }
                self.tree.set_open(block, state.is_continue());
            }

            if state == BlockState::BreakDiscard {
                self.continue_processing_line = false;
                break;
            }

            let is_last = index + 1 >= self.stack.len();
            if self.continue_processing_line {
                self.process_new_blocks(state, false)?;
            }
            if is_last || !self.continue_processing_line {
                break;
            }
            i = index + 1;
        }
        Ok(())
    }

    fn try_open_blocks(&mut self) -> Result<(), BlockError> {
        let registry = self.registry;
        let mut previous_start = None;
        let mut retried = false;
        while self.continue_processing_line {
            self.line.parse_indent();

            let start = self.line.start();
            let stalled = previous_start == Some(start);
            previous_start = Some(start);

            if !stalled {
                let c = self.line.current_char();
                if self.try_open_with(registry.parsers_for(c))? {
                    self.line.restart_indent();
                    continue;
                }
            } else if retried {
                break;
            } else {
                // an opener consumed nothing: only global parsers get another pass
                retried = true;
            }
            if self.continue_processing_line && self.try_open_with(registry.global_parsers())? {
                self.line.restart_indent();
                continue;
            }
            break;
        }

        if self.continue_processing_line && !self.line.is_end_of_line() {
            log::debug!(
                "line {}: no block accepted {:?}",
                self.line_index(),
                self.line.remaining()
            );
        }
        Ok(())
    }

    /// Try each candidate in order. Returns true when a container was
    /// opened and the rest of the line should be matched again.
    fn try_open_with(&mut self, candidates: &[ParserId]) -> Result<bool, BlockError> {
        let registry = self.registry;
        for &parser_id in candidates {
            if self.line.is_end_of_line() {
                self.continue_processing_line = false;
                break;
            }

            self.update_last_block_and_container(None);
            let last = self.current_block;
            let parser = registry.parser(parser_id);
            if !parser.can_interrupt(self, last) {
                continue;
            }

            let lazy = parser.is_paragraph() && *self.tree.kind(last) == BlockKind::Paragraph;
            let state = self.with_parser(parser_id, |this| {
                if lazy {
                    parser.try_continue(this, last)
                } else {
                    parser.try_open(this)
                }
            });

            if matches!(state, BlockState::None | BlockState::Skip) {
                self.ensure_no_new_blocks()?;
                // blank lines never continue a paragraph lazily
                if lazy && self.line.is_blank_line() {
                    self.continue_processing_line = false;
                    break;
                }
                continue;
            }

            self.update_last_block_and_container(None);
            if lazy && self.current_block == last && *self.tree.kind(last) == BlockKind::Paragraph
            {
                self.ensure_no_new_blocks()?;
                if !state.is_discard() {
                    self.append_line(last);
                }
                log::trace!("line {}: paragraph continued", self.line_index());
                self.open_all();
                self.continue_processing_line = false;
                break;
            }

            if self.new_blocks.is_empty() && state == BlockState::BreakDiscard {
                self.continue_processing_line = false;
                break;
            }

            self.process_new_blocks(state, true)?;
            return Ok(self.continue_processing_line);
        }
        Ok(false)
    }

    /// Attach queued blocks outermost first, each one below the previous
    fn process_new_blocks(&mut self, state: BlockState, allow_closing: bool) -> Result<(), BlockError> {
        let count = self.new_blocks.len();
        if let Some(position) = self.new_blocks.iter().position(|&b| self.tree.is_leaf(b)) {
            if position + 1 != count {
                return Err(BlockError::LeafNotInnermost { position, count });
            }
        }

        while let Some(block) = self.new_blocks.pop_front() {
            let leaf = self.tree.is_leaf(block);
            self.tree.get_mut(block).line = self.line_index();
            if leaf && !state.is_discard() {
                self.append_line(block);
            }

            if allow_closing {
                self.close_all(false);
            }

            if self.tree.parent(block).is_none() {
                self.update_last_block_and_container(None);
                self.tree.append_child(self.current_container, block);
            }
            self.tree.set_open(block, state.is_continue());
            self.stack.push(block);
            log::debug!("line {}: opened {:?}", self.line_index(), self.tree.kind(block));

            if leaf {
                self.continue_processing_line = false;
                break;
            }
        }
        self.update_last_block_and_container(None);
        Ok(())
    }

    fn append_line(&mut self, block: BlockId) {
        let line = StringLine {
            text: self.line.remaining_text(),
            line: self.line_index(),
        };
        self.tree.push_line(block, line);
    }

    fn update_last_block_and_container(&mut self, stack_index: Option<usize>) {
        let top = self.stack.len() - 1;
        let index = stack_index.map_or(top, |i| i.min(top));
        self.current_block = self.stack[index];
        self.current_container = self.stack[..=index]
            .iter()
            .rev()
            .copied()
            .find(|&b| self.tree.get(b).is_container())
            .unwrap_or_else(|| self.tree.document());
    }

    fn with_parser<R>(&mut self, parser: ParserId, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = self.current_parser.replace(parser);
        let result = f(self);
        self.current_parser = previous;
        result
    }

    fn ensure_no_new_blocks(&self) -> Result<(), BlockError> {
        if self.new_blocks.is_empty() {
            Ok(())
        } else {
            Err(BlockError::PendingNotEmpty {
                line: self.line_index(),
                count: self.new_blocks.len(),
            })
        }
    }
}
