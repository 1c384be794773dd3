/// Block parser trait and the lookup table the processor dispatches through
use crate::ast::BlockId;
use crate::blocks::{
    FencedCodeParser, HeadingParser, IndentedCodeParser, ListParser, ParagraphParser,
    QuoteBlockParser, ThematicBreakParser,
};
use crate::processor::BlockProcessor;
use std::collections::HashMap;

/// Outcome of a parser callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    /// No match, try the next candidate
    None,
    /// Block is inert for this line but stays open
    Skip,
    Continue,
    /// Like `Continue`, but the line is not added to the block
    ContinueDiscard,
    /// Line not accepted, the block gets closed
    Break,
    /// Block gets closed and the rest of the line is dropped
    BreakDiscard,
}

impl BlockState {
    pub fn is_continue(self) -> bool {
        matches!(self, BlockState::Continue | BlockState::ContinueDiscard)
    }

    pub fn is_break(self) -> bool {
        matches!(self, BlockState::Break | BlockState::BreakDiscard)
    }

    pub fn is_discard(self) -> bool {
        matches!(self, BlockState::ContinueDiscard | BlockState::BreakDiscard)
    }
}

/// A block type plugged into the processor.
///
/// Callbacks only see the processor's accessors: the line cursor, the open
/// block stack, the tree and the pending new blocks created through
/// [`BlockProcessor::push_container`] / [`BlockProcessor::push_leaf`].
pub trait BlockParser {
    /// Characters that trigger this parser. Parsers without any are tried on
    /// every line, after the triggered ones.
    fn opening_characters(&self) -> &[char] {
        &[]
    }

    /// Marks the parser responsible for lazy paragraph continuation
    fn is_paragraph(&self) -> bool {
        false
    }

    /// Whether the parser may start a block while `block` is the deepest open block
    fn can_interrupt(&self, _processor: &BlockProcessor<'_>, _block: BlockId) -> bool {
        true
    }

    fn try_open(&self, processor: &mut BlockProcessor<'_>) -> BlockState;

    fn try_continue(&self, processor: &mut BlockProcessor<'_>, block: BlockId) -> BlockState;

    /// Called when `block` leaves the open stack. Returning false removes it
    /// from the tree.
    fn close(&self, _processor: &mut BlockProcessor<'_>, _block: BlockId) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParserId(usize);

impl ParserId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Parsers in priority order, indexed by trigger character
#[derive(Default)]
pub struct ParserRegistry {
    parsers: Vec<Box<dyn BlockParser>>,
    by_char: HashMap<char, Vec<ParserId>>,
    global: Vec<ParserId>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        ParserRegistry::default()
    }

    /// The CommonMark block catalog
    pub fn commonmark() -> Self {
        ParserRegistry::new()
            .with_parser(ThematicBreakParser)
            .with_parser(HeadingParser)
            .with_parser(FencedCodeParser)
            .with_parser(QuoteBlockParser)
            .with_parser(ListParser)
            .with_parser(IndentedCodeParser)
            .with_parser(ParagraphParser)
    }

    pub fn with_parser(mut self, parser: impl BlockParser + 'static) -> Self {
        self.register(Box::new(parser));
        self
    }

    /// Append a parser after every parser registered so far
    pub fn register(&mut self, parser: Box<dyn BlockParser>) -> ParserId {
        let id = ParserId(self.parsers.len());
        let chars = parser.opening_characters();
        if chars.is_empty() {
            self.global.push(id);
        } else {
            for &c in chars {
                let bucket = self.by_char.entry(c).or_default();
                if !bucket.contains(&id) {
                    bucket.push(id);
                }
            }
        }
        self.parsers.push(parser);
        id
    }

    pub fn parser(&self, id: ParserId) -> &dyn BlockParser {
        self.parsers[id.0].as_ref()
    }

    pub fn parsers_for(&self, c: char) -> &[ParserId] {
        self.by_char.get(&c).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn global_parsers(&self) -> &[ParserId] {
        &self.global
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}
