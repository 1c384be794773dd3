/// Block structure recognition for CommonMark documents
pub mod ast;
pub mod blocks;
pub mod cursor;
pub mod error;
pub mod processor;
pub mod registry;
pub mod renderer;

use ast::Node;
use error::BlockError;
use processor::BlockProcessor;
use registry::ParserRegistry;
use renderer::OutlineRenderer;

/// Build the block tree of `markdown` with the given parsers
pub fn parse_blocks_with(markdown: &str, registry: &ParserRegistry) -> Result<Node, BlockError> {
    let mut processor = BlockProcessor::new(registry);
    for line in markdown.lines() {
        processor.process_line(line)?;
    }
    Ok(processor.finish()?.to_node())
}

/// Build the block tree of `markdown` with the CommonMark block parsers
pub fn parse_blocks(markdown: &str) -> Result<Node, BlockError> {
    parse_blocks_with(markdown, &ParserRegistry::commonmark())
}

/// Parse markdown text and render its block outline
pub fn markdown_to_outline(markdown: &str) -> Result<String, BlockError> {
    let node = parse_blocks(markdown)?;
    Ok(OutlineRenderer::new().render(&node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BlockKind;

    #[test]
    fn test_empty_input() {
        let node = parse_blocks("").unwrap();
        assert_eq!(node.kind, BlockKind::Document);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_quote_then_paragraph() {
        let outline = markdown_to_outline("> quoted\n> still quoted\n\nplain\n").unwrap();
        assert_eq!(
            outline,
            "document\n  block_quote\n    paragraph\n      \"quoted\"\n      \"still quoted\"\n  paragraph\n    \"plain\"\n"
        );
    }

    #[test]
    fn test_crlf_lines() {
        let node = parse_blocks("one\r\ntwo\r\n").unwrap();
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].lines, vec!["one", "two"]);
    }

    #[test]
    fn test_node_json_roundtrip() {
        let node = parse_blocks("# Title\n\n- item\n").unwrap();
        let json = serde_json::to_string(&node).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
