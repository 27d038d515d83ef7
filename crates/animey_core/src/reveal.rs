//! Typing revealer: shows a block sequence one word per tick.
//!
//! [`Revealer`] is the state machine; [`reveal`] drives it on a timer and
//! reports to a [`RevealObserver`]. Only whole blocks and whole list items are
//! ever committed; the unit being typed lives in the cursor until its last word
//! is shown.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::block::{words_of, Block};

/// Position of the next word to reveal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct RevealCursor {
    pub block_index: usize,
    /// Only meaningful while the current block is a list.
    pub item_index: usize,
    pub word_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Advancing,
    Cancelled,
    Done,
}

impl RevealState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RevealState::Advancing)
    }
}

/// A word shown by one tick, with where it sits in the source blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealedWord {
    pub word: String,
    pub block_index: usize,
    pub item_index: Option<usize>,
    pub word_index: usize,
}

/// Result of one [`Revealer::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    pub word: Option<RevealedWord>,
    /// Blocks or list items committed during this tick.
    pub committed: usize,
    pub state: RevealState,
}

#[derive(Debug, Clone)]
pub struct Revealer {
    blocks: Vec<Block>,
    cursor: RevealCursor,
    committed: Vec<Block>,
    state: RevealState,
}

impl Revealer {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            cursor: RevealCursor::default(),
            committed: Vec::new(),
            state: RevealState::Advancing,
        }
    }

    /// Start a new run over `blocks`. Nothing from the previous run survives.
    pub fn reset(&mut self, blocks: Vec<Block>) {
        *self = Self::new(blocks);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn cursor(&self) -> RevealCursor {
        self.cursor
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    /// Fully revealed blocks. Equals the source blocks once the run is done.
    pub fn committed(&self) -> &[Block] {
        &self.committed
    }

    /// Reveal one word and commit whatever it completes.
    pub fn tick(&mut self) -> Tick {
        if self.state.is_terminal() {
            return Tick {
                word: None,
                committed: 0,
                state: self.state,
            };
        }

        let mut committed = self.settle();
        let word = self.reveal_word();
        committed += self.settle();

        if self.cursor.block_index >= self.blocks.len() {
            self.state = RevealState::Done;
            self.committed = self.blocks.clone();
        }

        Tick {
            word,
            committed,
            state: self.state,
        }
    }

    /// Stop the run. Returns only what was fully committed before the call.
    pub fn cancel(&mut self) -> Vec<Block> {
        if self.state == RevealState::Advancing {
            self.state = RevealState::Cancelled;
        }
        self.committed.clone()
    }

    /// Committed blocks plus the words typed so far in the current unit.
    pub fn revealed_text(&self) -> Vec<Block> {
        let mut out = self.committed.clone();
        if self.state != RevealState::Advancing || self.cursor.word_index == 0 {
            return out;
        }
        let Some((text, item)) = self.current_unit() else {
            return out;
        };
        let partial = words_of(text)[..self.cursor.word_index].join(" ");
        match (&self.blocks[self.cursor.block_index], item) {
            (Block::Paragraph { .. }, _) => out.push(Block::paragraph(partial)),
            (Block::Heading { .. }, _) => out.push(Block::heading(partial)),
            (Block::List { .. }, Some(0)) => out.push(Block::list([partial])),
            (Block::List { .. }, _) => {
                if let Some(Block::List { items }) = out.last_mut() {
                    items.push(partial);
                }
            }
        }
        out
    }

    /// Drive the run on a timer until it finishes or `cancel` fires.
    ///
    /// One word per `cadence`. The cancel flag is checked before every tick and
    /// a pending sleep is dropped as soon as it fires.
    pub async fn run<O>(
        &mut self,
        cadence: Duration,
        cancel: &CancellationToken,
        observer: &mut O,
    ) -> RevealOutcome
    where
        O: RevealObserver + ?Sized,
    {
        match self.state {
            RevealState::Done => return RevealOutcome::Done(self.committed.clone()),
            RevealState::Cancelled => return RevealOutcome::Cancelled(self.committed.clone()),
            RevealState::Advancing => {}
        }

        loop {
            if cancel.is_cancelled() {
                let partial = self.cancel();
                debug!(committed = partial.len(), cursor = ?self.cursor, "reveal cancelled");
                observer.on_partial(&partial);
                return RevealOutcome::Cancelled(partial);
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => continue,
                _ = tokio::time::sleep(cadence) => {}
            }

            let tick = self.tick();
            observer.on_tick(self, &tick);

            if tick.state == RevealState::Done {
                debug!(blocks = self.committed.len(), "reveal done");
                observer.on_partial(&self.committed);
                observer.on_complete();
                return RevealOutcome::Done(self.committed.clone());
            }
        }
    }

    fn current_unit(&self) -> Option<(&str, Option<usize>)> {
        match self.blocks.get(self.cursor.block_index)? {
            Block::Paragraph { content } | Block::Heading { content } => Some((content, None)),
            Block::List { items } => items
                .get(self.cursor.item_index)
                .map(|item| (item.as_str(), Some(self.cursor.item_index))),
        }
    }

    fn reveal_word(&mut self) -> Option<RevealedWord> {
        let cursor = self.cursor;
        let (text, item_index) = self.current_unit()?;
        let word = words_of(text).get(cursor.word_index)?.to_string();
        self.cursor.word_index += 1;
        Some(RevealedWord {
            word,
            block_index: cursor.block_index,
            item_index,
            word_index: cursor.word_index,
        })
    }

    /// Commit every unit at the cursor whose words are all shown. Zero-word
    /// units commit here without costing a tick.
    fn settle(&mut self) -> usize {
        let mut count = 0;
        while let Some(block) = self.blocks.get(self.cursor.block_index) {
            match block {
                Block::Paragraph { content } | Block::Heading { content } => {
                    if self.cursor.word_index < words_of(content).len() {
                        break;
                    }
                    let block = block.clone();
                    self.committed.push(block);
                    self.next_block();
                    count += 1;
                }
                Block::List { items } if items.is_empty() => {
                    self.committed.push(Block::list(Vec::<String>::new()));
                    self.next_block();
                    count += 1;
                }
                Block::List { items } => {
                    let Some(item) = items.get(self.cursor.item_index) else {
                        self.next_block();
                        continue;
                    };
                    if self.cursor.word_index < words_of(item).len() {
                        break;
                    }
                    let item = item.clone();
                    self.commit_item(item);
                    self.cursor.item_index += 1;
                    self.cursor.word_index = 0;
                    count += 1;
                }
            }
        }
        count
    }

    fn commit_item(&mut self, item: String) {
        if self.cursor.item_index == 0 {
            self.committed.push(Block::list([item]));
        } else if let Some(Block::List { items }) = self.committed.last_mut() {
            items.push(item);
        }
    }

    fn next_block(&mut self) {
        self.cursor = RevealCursor {
            block_index: self.cursor.block_index + 1,
            item_index: 0,
            word_index: 0,
        };
    }
}

/// Callbacks of one reveal run.
pub trait RevealObserver {
    /// Called after every tick; the place to repaint.
    fn on_tick(&mut self, _revealer: &Revealer, _tick: &Tick) {}

    /// Called once when the run ends: committed blocks on cancel, every block when done.
    fn on_partial(&mut self, blocks: &[Block]);

    /// Called at most once, only when the run is done.
    fn on_complete(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealOutcome {
    Done(Vec<Block>),
    Cancelled(Vec<Block>),
}

impl RevealOutcome {
    pub fn blocks(&self) -> &[Block] {
        match self {
            RevealOutcome::Done(b) | RevealOutcome::Cancelled(b) => b,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, RevealOutcome::Done(_))
    }
}

/// Run a fresh reveal over `blocks`.
pub async fn reveal<O>(
    blocks: Vec<Block>,
    cadence: Duration,
    cancel: &CancellationToken,
    observer: &mut O,
) -> RevealOutcome
where
    O: RevealObserver + ?Sized,
{
    Revealer::new(blocks).run(cadence, cancel, observer).await
}
