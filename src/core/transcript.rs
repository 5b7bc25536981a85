//! Ordered in-memory record of the visible conversation.
//!
//! The render layer projects [`Transcript::entries`] to the screen; nothing
//! else about the display is stateful.

use crate::core::message::Turn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptEntry<'a> {
    Turn(&'a Turn),
    /// Transient placeholder shown while waiting for the stream to start.
    Loading,
}

#[derive(Debug, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
    loading: bool,
    live_index: Option<usize>,
    current_response: String,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn entries(&self) -> impl Iterator<Item = TranscriptEntry<'_>> {
        self.turns
            .iter()
            .map(TranscriptEntry::Turn)
            .chain(self.loading.then_some(TranscriptEntry::Loading))
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn show_loading(&mut self) {
        self.loading = true;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn remove_loading(&mut self) {
        self.loading = false;
    }

    pub fn has_live_response(&self) -> bool {
        self.live_index.is_some()
    }

    /// Swaps the loading placeholder for an empty assistant turn that
    /// subsequent fragments grow.
    pub fn begin_response(&mut self) {
        self.remove_loading();
        if self.live_index.is_some() {
            return;
        }
        self.current_response.clear();
        self.turns.push(Turn::assistant(String::new()));
        self.live_index = Some(self.turns.len() - 1);
    }

    /// Appends a fragment and returns the cumulative text now displayed.
    pub fn append_fragment(&mut self, fragment: &str) -> &str {
        if self.live_index.is_none() {
            self.begin_response();
        }
        self.current_response.push_str(fragment);
        if let Some(turn) = self.live_index.and_then(|index| self.turns.get_mut(index)) {
            turn.text = Some(self.current_response.clone());
        }
        &self.current_response
    }

    /// Whether the live turn has received any text yet.
    pub fn has_response_text(&self) -> bool {
        !self.current_response.is_empty()
    }

    /// Freezes the live assistant turn and returns its final text.
    pub fn finish_response(&mut self) -> Option<String> {
        self.remove_loading();
        self.live_index
            .take()
            .map(|_| std::mem::take(&mut self.current_response))
    }

    /// Replaces whatever the failed stream produced with `message`.
    pub fn fail_response(&mut self, message: &str) {
        self.remove_loading();
        if let Some(index) = self.live_index.take() {
            if index < self.turns.len() {
                self.turns.remove(index);
            }
        }
        self.current_response.clear();
        self.turns.push(Turn::assistant(message));
    }

    /// Stops tracking the live turn after a cancellation, keeping partial text.
    pub fn abandon_response(&mut self) {
        self.remove_loading();
        if let Some(index) = self.live_index.take() {
            let is_empty = self
                .turns
                .get(index)
                .map(|turn| turn.text().is_empty())
                .unwrap_or(false);
            if is_empty {
                self.turns.remove(index);
            }
        }
        self.current_response.clear();
    }

    pub fn clear(&mut self) {
        self.turns.clear();
        self.loading = false;
        self.live_index = None;
        self.current_response.clear();
    }
}
