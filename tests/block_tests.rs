use blockmark::markdown_to_outline;
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
struct BlockCase {
    name: String,
    markdown: String,
    outline: String,
}

#[test]
fn block_outline_fixtures() {
    let test_data = fs::read_to_string("tests/data/blocks.json").expect("Failed to read blocks.json");
    let cases: Vec<BlockCase> = serde_json::from_str(&test_data).expect("Failed to parse blocks.json");
    assert!(!cases.is_empty());

    let mut failures = Vec::new();
    for case in &cases {
        let result = markdown_to_outline(&case.markdown).expect("processing failed");
        if result != case.outline {
            eprintln!("\n❌ {} failed", case.name);
            eprintln!("  Input: {:?}", case.markdown);
            eprintln!("  Expected:\n{}", case.outline);
            eprintln!("  Got:\n{}", result);
            failures.push(case.name.as_str());
        }
    }

    eprintln!("\n📊 Block fixtures: {} passed, {} failed", cases.len() - failures.len(), failures.len());
    assert!(failures.is_empty(), "failed fixtures: {:?}", failures);
}
