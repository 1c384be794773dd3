use blockmark::parse_blocks;
use blockmark::renderer::OutlineRenderer;
use std::io::{self, Read};
use std::process;

fn main() {
    env_logger::init();

    let json = std::env::args().skip(1).any(|arg| arg == "--json");

    let mut input = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut input) {
        eprintln!("failed to read stdin: {}", err);
        process::exit(1);
    }

    let node = match parse_blocks(&input) {
        Ok(node) => node,
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(1);
        }
    };

    if json {
        match serde_json::to_string_pretty(&node) {
            Ok(output) => println!("{}", output),
            Err(err) => {
                eprintln!("failed to serialize tree: {}", err);
                process::exit(1);
            }
        }
    } else {
        print!("{}", OutlineRenderer::new().render(&node));
    }
}
