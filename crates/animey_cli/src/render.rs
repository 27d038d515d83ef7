//! Terminal rendering of formatted messages, all at once or word by word.

use std::io::{self, Write};
use std::time::Duration;

use console::style;
use tokio_util::sync::CancellationToken;

use animey_constant::app::DISPLAY_NAME;
use animey_core::{reveal, Block, Message, RevealObserver, RevealOutcome, Revealer, Role, Tick};

const BULLET: &str = "  • ";

/// Types a reply out one word per tick.
pub struct Typewriter<W: Write> {
    out: W,
    // (block, list item) of the last word written
    unit: Option<(usize, Option<usize>)>,
}

impl<W: Write> Typewriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, unit: None }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_word(
        &mut self,
        block: &Block,
        unit: (usize, Option<usize>),
        word: &str,
    ) -> io::Result<()> {
        if self.unit != Some(unit) {
            if self.unit.is_some() {
                writeln!(self.out)?;
            }
            if block.is_list() {
                write!(self.out, "{BULLET}")?;
            }
            self.unit = Some(unit);
        } else {
            write!(self.out, " ")?;
        }
        match block {
            Block::Heading { .. } => write!(self.out, "{}", style(word).bold().cyan())?,
            _ => write!(self.out, "{word}")?,
        }
        self.out.flush()
    }
}

impl<W: Write> RevealObserver for Typewriter<W> {
    fn on_tick(&mut self, revealer: &Revealer, tick: &Tick) {
        let Some(word) = &tick.word else { return };
        let Some(block) = revealer.blocks().get(word.block_index) else {
            return;
        };
        let unit = (word.block_index, word.item_index);
        if let Err(e) = self.write_word(block, unit, &word.word) {
            tracing::debug!(error = %e, "terminal write failed");
        }
    }

    fn on_partial(&mut self, _blocks: &[Block]) {
        if self.unit.is_some() {
            let _ = writeln!(self.out);
            let _ = self.out.flush();
        }
    }

    fn on_complete(&mut self) {}
}

/// Print blocks in one go.
pub fn write_blocks<W: Write>(out: &mut W, blocks: &[Block]) -> io::Result<()> {
    for block in blocks {
        match block {
            Block::Heading { content } => writeln!(out, "{}", style(content).bold().cyan())?,
            Block::Paragraph { content } => writeln!(out, "{content}")?,
            Block::List { items } => {
                for item in items {
                    writeln!(out, "{BULLET}{item}")?;
                }
            }
        }
    }
    Ok(())
}

/// Speaker label shown above a message.
pub fn speaker(role: Role) -> String {
    match role {
        Role::User => style("Siz").green().bold().to_string(),
        Role::Assistant => style(DISPLAY_NAME).magenta().bold().to_string(),
    }
}

pub fn write_message<W: Write>(out: &mut W, message: &Message) -> io::Result<()> {
    writeln!(out, "{}", speaker(message.role))?;
    write_blocks(out, &message.blocks)
}

/// Reveal on stdout until done or Ctrl-C.
pub async fn reveal_until_interrupt(blocks: Vec<Block>, cadence: Duration) -> RevealOutcome {
    let cancel = CancellationToken::new();
    let mut typewriter = Typewriter::new(io::stdout());
    let run = reveal(blocks, cadence, &cancel, &mut typewriter);
    tokio::pin!(run);
    loop {
        tokio::select! {
            outcome = &mut run => return outcome,
            Ok(()) = tokio::signal::ctrl_c(), if !cancel.is_cancelled() => cancel.cancel(),
        }
    }
}
