/// CommonMark block parsers plugged into the processor
mod fenced_code;
mod heading;
mod indented_code;
mod list;
mod paragraph;
mod quote;
mod thematic_break;

pub use fenced_code::FencedCodeParser;
pub use heading::HeadingParser;
pub use indented_code::IndentedCodeParser;
pub use list::ListParser;
pub use paragraph::ParagraphParser;
pub use quote::QuoteBlockParser;
pub use thematic_break::ThematicBreakParser;

fn is_space_or_tab(c: char) -> bool {
    c == ' ' || c == '\t'
}
