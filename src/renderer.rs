/// Outline renderer for block trees
use crate::ast::{BlockKind, Node};

/// Renders one block per line, children indented by two spaces and leaf
/// lines as quoted strings
pub struct OutlineRenderer;

impl OutlineRenderer {
    pub fn new() -> Self {
        OutlineRenderer
    }

    pub fn render(&self, node: &Node) -> String {
        render_node(node, 0)
    }
}

impl Default for OutlineRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn render_node(node: &Node, depth: usize) -> String {
    let indent = "  ".repeat(depth);
    let lines: String = node
        .lines
        .iter()
        .map(|line| format!("{}  {:?}\n", indent, line))
        .collect();
    let children: String = node
        .children
        .iter()
        .map(|child| render_node(child, depth + 1))
        .collect();
    format!("{}{}\n{}{}", indent, label(&node.kind), lines, children)
}

fn label(kind: &BlockKind) -> String {
    match kind {
        BlockKind::Document => "document".to_string(),
        BlockKind::Paragraph => "paragraph".to_string(),
        BlockKind::BlockQuote => "block_quote".to_string(),
        BlockKind::List {
            ordered: false,
            marker,
            ..
        } => format!("bullet_list({})", marker),
        BlockKind::List {
            ordered: true,
            marker,
            start,
        } => format!("ordered_list({}{})", start, marker),
        BlockKind::ListItem { .. } => "list_item".to_string(),
        BlockKind::Heading { level } => format!("heading({})", level),
        BlockKind::ThematicBreak => "thematic_break".to_string(),
        BlockKind::FencedCode { info, .. } if info.is_empty() => "fenced_code".to_string(),
        BlockKind::FencedCode { info, .. } => format!("fenced_code({})", info),
        BlockKind::IndentedCode => "indented_code".to_string(),
        BlockKind::Custom(name) => name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_outline() {
        let node = Node {
            kind: BlockKind::Document,
            line: 0,
            children: vec![Node {
                kind: BlockKind::BlockQuote,
                line: 0,
                children: vec![Node {
                    kind: BlockKind::Paragraph,
                    line: 0,
                    children: vec![],
                    lines: vec!["a \"b\"".to_string()],
                }],
                lines: vec![],
            }],
            lines: vec![],
        };

        assert_eq!(
            OutlineRenderer::new().render(&node),
            "document\n  block_quote\n    paragraph\n      \"a \\\"b\\\"\"\n"
        );
    }
}
