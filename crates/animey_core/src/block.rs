use serde::{Deserialize, Serialize};

/// One structural unit of formatted chat text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph { content: String },
    Heading { content: String },
    List { items: Vec<String> },
}

impl Block {
    pub fn paragraph(content: impl Into<String>) -> Self {
        Block::Paragraph {
            content: content.into(),
        }
    }

    pub fn heading(content: impl Into<String>) -> Self {
        Block::Heading {
            content: content.into(),
        }
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Block::List {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Block::List { .. })
    }

    /// Words of a paragraph or heading. Lists have no words of their own; use [`words_of`] per item.
    pub fn words(&self) -> Vec<&str> {
        match self {
            Block::Paragraph { content } | Block::Heading { content } => words_of(content),
            Block::List { .. } => Vec::new(),
        }
    }

    /// All words of the block in reading order, list items included.
    pub fn text_content(&self) -> Vec<&str> {
        match self {
            Block::Paragraph { content } | Block::Heading { content } => words_of(content),
            Block::List { items } => items.iter().flat_map(|i| words_of(i)).collect(),
        }
    }
}

/// Whitespace-separated words of a line; empty segments are dropped.
pub fn words_of(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}
