/// Block tree built by the processor, and its owned serializable form
use crate::registry::ParserId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Document,
    Paragraph,
    BlockQuote,
    // List nodes
    List {
        ordered: bool,
        marker: char, // bullet char, or '.' / ')' for ordered lists
        start: u32,
    },
    ListItem {
        content_width: usize, // columns from the item's indent origin to its content
        started_blank: bool,
    },
    Heading {
        level: u8,
    },
    ThematicBreak,
    FencedCode {
        fence: char,
        fence_len: usize,
        indent: usize,
        info: String,
    },
    IndentedCode,
    /// Blocks produced by parsers outside the built-in catalog
    Custom(String),
}

/// One line of raw leaf content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringLine {
    pub text: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockContent {
    Container(Vec<BlockId>),
    Leaf(Vec<StringLine>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(usize);

impl BlockId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Block {
    pub kind: BlockKind,
    pub content: BlockContent,
    pub parent: Option<BlockId>,
    /// Parser that created the block; `None` for the document
    pub parser: Option<ParserId>,
    pub line: usize,
    pub is_open: bool,
}

impl Block {
    pub fn is_leaf(&self) -> bool {
        matches!(self.content, BlockContent::Leaf(_))
    }

    pub fn is_container(&self) -> bool {
        matches!(self.content, BlockContent::Container(_))
    }

    pub fn children(&self) -> &[BlockId] {
        match &self.content {
            BlockContent::Container(children) => children,
            BlockContent::Leaf(_) => &[],
        }
    }

    pub fn lines(&self) -> &[StringLine] {
        match &self.content {
            BlockContent::Leaf(lines) => lines,
            BlockContent::Container(_) => &[],
        }
    }
}

/// Arena holding every block created during a parse. Detached blocks stay in
/// the arena but are no longer reachable from the document.
#[derive(Debug, Clone)]
pub struct BlockTree {
    blocks: Vec<Block>,
}

impl BlockTree {
    pub fn new() -> Self {
        BlockTree {
            blocks: vec![Block {
                kind: BlockKind::Document,
                content: BlockContent::Container(Vec::new()),
                parent: None,
                parser: None,
                line: 0,
                is_open: true,
            }],
        }
    }

    pub fn document(&self) -> BlockId {
        BlockId(0)
    }

    /// Create an unattached block
    pub fn create(&mut self, kind: BlockKind, leaf: bool, parser: Option<ParserId>) -> BlockId {
        let id = BlockId(self.blocks.len());
        let content = if leaf {
            BlockContent::Leaf(Vec::new())
        } else {
            BlockContent::Container(Vec::new())
        };
        self.blocks.push(Block {
            kind,
            content,
            parent: None,
            parser,
            line: 0,
            is_open: false,
        });
        id
    }

    pub fn get(&self, id: BlockId) -> &Block {
        &self.blocks[id.0]
    }

    pub fn get_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id.0]
    }

    pub fn kind(&self, id: BlockId) -> &BlockKind {
        &self.blocks[id.0].kind
    }

    pub fn set_kind(&mut self, id: BlockId, kind: BlockKind) {
        self.blocks[id.0].kind = kind;
    }

    pub fn parent(&self, id: BlockId) -> Option<BlockId> {
        self.blocks[id.0].parent
    }

    pub fn children(&self, id: BlockId) -> &[BlockId] {
        self.blocks[id.0].children()
    }

    pub fn lines(&self, id: BlockId) -> &[StringLine] {
        self.blocks[id.0].lines()
    }

    /// Mutable access to a leaf's lines; `None` for containers
    pub fn lines_mut(&mut self, id: BlockId) -> Option<&mut Vec<StringLine>> {
        match &mut self.blocks[id.0].content {
            BlockContent::Leaf(lines) => Some(lines),
            BlockContent::Container(_) => None,
        }
    }

    pub fn is_leaf(&self, id: BlockId) -> bool {
        self.blocks[id.0].is_leaf()
    }

    pub fn is_open(&self, id: BlockId) -> bool {
        self.blocks[id.0].is_open
    }

    pub fn set_open(&mut self, id: BlockId, open: bool) {
        self.blocks[id.0].is_open = open;
    }

    /// Append a line to a leaf. Containers ignore it.
    pub fn push_line(&mut self, id: BlockId, line: StringLine) {
        if let Some(lines) = self.lines_mut(id) {
            lines.push(line);
        }
    }

    /// Link `child` as the last child of `parent`. Returns false when
    /// `parent` is a leaf.
    pub fn append_child(&mut self, parent: BlockId, child: BlockId) -> bool {
        match &mut self.blocks[parent.0].content {
            BlockContent::Container(children) => children.push(child),
            BlockContent::Leaf(_) => return false,
        }
        self.blocks[child.0].parent = Some(parent);
        true
    }

    /// Unlink a block from its parent
    pub fn detach(&mut self, id: BlockId) {
        let Some(parent) = self.blocks[id.0].parent.take() else {
            return;
        };
        if let BlockContent::Container(children) = &mut self.blocks[parent.0].content {
            children.retain(|&child| child != id);
        }
    }

    /// Whether `id` hangs below the document through parent links
    pub fn is_attached(&self, id: BlockId) -> bool {
        let mut current = id;
        loop {
            if current == self.document() {
                return true;
            }
            match self.blocks[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn to_node(&self) -> Node {
        self.node_at(self.document())
    }

    pub fn node_at(&self, id: BlockId) -> Node {
        let block = self.get(id);
        Node {
            kind: block.kind.clone(),
            line: block.line,
            children: block.children().iter().map(|&c| self.node_at(c)).collect(),
            lines: block.lines().iter().map(|l| l.text.clone()).collect(),
        }
    }
}

impl Default for BlockTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Owned snapshot of a finished block tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub kind: BlockKind,
    pub line: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<String>,
}
