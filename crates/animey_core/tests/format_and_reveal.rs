//! Formatter output fed through the revealer, the way the chat client uses them.
//!
//! Run with: cargo test -p animey-core --test format_and_reveal

use std::time::Duration;

use animey_core::render::plain_text;
use animey_core::{
    format_message, reveal, Block, Conversation, MemoryStore, RevealObserver, RevealOutcome,
    RevealState, Revealer, Tick, TopicBook,
};
use tokio_util::sync::CancellationToken;

const REPLY: &str = "# Senga mos Top 3 anime ro'yxati 🎯
- Naruto — Shinobi dunyosidagi epik janglar.
- Titanlar Hujumi — Titanlarga qarshi kurash.

* Jujutsu Qotillari — Sehr va la'natlar olami.
🎬 Bu animelarni Animey.uz da ko'rishing mumkin! 😎";

#[derive(Default)]
struct Screen {
    frames: Vec<Vec<Block>>,
    partial: Vec<Block>,
    completed: usize,
}

impl RevealObserver for Screen {
    fn on_tick(&mut self, revealer: &Revealer, _tick: &Tick) {
        self.frames.push(revealer.revealed_text());
    }

    fn on_partial(&mut self, blocks: &[Block]) {
        self.partial = blocks.to_vec();
    }

    fn on_complete(&mut self) {
        self.completed += 1;
    }
}

#[test]
fn reply_formats_into_heading_list_paragraph() {
    let blocks = format_message(REPLY);
    assert_eq!(blocks.len(), 3);
    assert!(matches!(blocks[0], Block::Heading { .. }));
    assert_eq!(
        blocks[1],
        Block::list([
            "Naruto — Shinobi dunyosidagi epik janglar.",
            "Titanlar Hujumi — Titanlarga qarshi kurash.",
            "Jujutsu Qotillari — Sehr va la'natlar olami.",
        ])
    );
    assert!(matches!(blocks[2], Block::Paragraph { .. }));
}

#[test]
fn done_run_reproduces_every_word() {
    for text in ["Salom dunyo", "- Naruto\n- Bleach", "# Ro'yxat\n- A\n- B\nXulosa", "", REPLY] {
        let blocks = format_message(text);
        let mut revealer = Revealer::new(blocks.clone());
        let mut words = Vec::new();
        while revealer.state() == RevealState::Advancing {
            if let Some(w) = revealer.tick().word {
                words.push(w.word);
            }
        }
        assert_eq!(revealer.committed(), blocks.as_slice());
        assert_eq!(words.join(" "), plain_text(&blocks), "input {text:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn frames_grow_monotonically_and_end_complete() {
    let blocks = format_message(REPLY);
    let cancel = CancellationToken::new();
    let mut screen = Screen::default();

    let outcome = reveal(blocks.clone(), Duration::from_millis(100), &cancel, &mut screen).await;

    assert_eq!(outcome, RevealOutcome::Done(blocks.clone()));
    assert_eq!(screen.completed, 1);
    assert_eq!(screen.partial, blocks);

    let lengths: Vec<usize> = screen
        .frames
        .iter()
        .map(|f| plain_text(f).split_whitespace().count())
        .collect();
    assert!(lengths.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(screen.frames.last(), Some(&blocks));
}

#[tokio::test(start_paused = true)]
async fn stopping_a_reply_settles_the_conversation() {
    let mut conversation = Conversation::new();
    conversation.submit("Aksion anime tavsiya qil").unwrap();
    let blocks = conversation.receive_reply(REPLY).blocks.clone();

    let cancel = CancellationToken::new();
    let stopper = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1_250)).await;
        stopper.cancel();
    });

    let mut screen = Screen::default();
    let outcome = reveal(blocks.clone(), Duration::from_millis(100), &cancel, &mut screen).await;

    let RevealOutcome::Cancelled(partial) = outcome else {
        panic!("expected cancellation");
    };
    conversation.stop_with(partial.clone());

    assert_eq!(screen.completed, 0);
    assert_eq!(partial.first(), blocks.first());
    assert!(partial.len() < blocks.len());
    assert!(conversation.revealing().is_none());
    assert_eq!(conversation.messages()[1].blocks, partial);
}

#[tokio::test(start_paused = true)]
async fn cancelled_reply_is_saved_as_the_shown_prefix() {
    let mut conversation = Conversation::new();
    conversation.submit("q").unwrap();
    let blocks = conversation
        .receive_reply("bir ikki uch\nto'rt besh")
        .blocks
        .clone();

    let cancel = CancellationToken::new();
    let stopper = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(450)).await;
        stopper.cancel();
    });

    let mut screen = Screen::default();
    let outcome = reveal(blocks, Duration::from_millis(100), &cancel, &mut screen).await;
    assert!(!outcome.is_done());
    conversation.stop_with(outcome.blocks().to_vec());

    let book = TopicBook::new(MemoryStore::new());
    let topic = book.record("q", &conversation).await.unwrap().unwrap();
    assert_eq!(topic.messages.len(), 2);
    assert_eq!(topic.messages[1].text, "bir ikki uch");
}
