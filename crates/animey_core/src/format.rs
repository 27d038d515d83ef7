//! Raw chat text → display blocks.
//!
//! Line based: `- ` / `* ` items group into lists, `# ` lines become headings,
//! anything else non-blank is a paragraph. Never returns an empty sequence.

use crate::block::Block;

const LIST_MARKERS: [&str; 2] = ["- ", "* "];
const HEADING_MARKER: &str = "# ";

/// Parse a message into blocks.
pub fn format_message(text: &str) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut list_open = false;

    for line in text.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(item) = strip_list_marker(line) {
            let item = item.trim().to_string();
            match blocks.last_mut() {
                Some(Block::List { items }) if list_open => items.push(item),
                _ => {
                    blocks.push(Block::List { items: vec![item] });
                    list_open = true;
                }
            }
            continue;
        }

        list_open = false;
        if let Some(heading) = line.strip_prefix(HEADING_MARKER) {
            blocks.push(Block::heading(heading.trim()));
        } else {
            blocks.push(Block::paragraph(line));
        }
    }

    if blocks.is_empty() {
        blocks.push(Block::paragraph(text.trim()));
    }
    blocks
}

fn strip_list_marker(line: &str) -> Option<&str> {
    LIST_MARKERS.iter().find_map(|m| line.strip_prefix(m))
}
