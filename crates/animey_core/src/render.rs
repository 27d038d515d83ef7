//! Pure renders of a block sequence.

use crate::block::Block;

/// Render blocks back into marker text (`# heading`, `- item`, paragraph lines).
///
/// Adjacent lists collapse into one when the text is formatted again, since a
/// list only closes on a non-list line.
pub fn to_markdown(blocks: &[Block]) -> String {
    let mut lines: Vec<String> = Vec::new();
    for block in blocks {
        match block {
            Block::Paragraph { content } => lines.push(content.clone()),
            Block::Heading { content } => lines.push(format!("# {content}")),
            Block::List { items } => lines.extend(items.iter().map(|i| format!("- {i}"))),
        }
    }
    lines.join("\n")
}

/// Every word of the sequence in reading order, joined by single spaces.
pub fn plain_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .flat_map(Block::text_content)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_message;

    #[test]
    fn markdown_round_trips_through_formatter() {
        let blocks = vec![
            Block::heading("Top 3"),
            Block::list(["Naruto", "Bleach", "One Piece"]),
            Block::paragraph("Animey.uz da ko'ring"),
        ];
        assert_eq!(format_message(&to_markdown(&blocks)), blocks);
    }

    #[test]
    fn plain_text_flattens_lists() {
        let blocks = vec![Block::heading("H  x"), Block::list(["a b", "c"])];
        assert_eq!(plain_text(&blocks), "H x a b c");
    }
}
