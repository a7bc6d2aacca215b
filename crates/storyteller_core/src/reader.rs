//! crates/storyteller_core/src/reader.rs
//!
//! Page-by-page navigation through one loaded story.

use crate::domain::{Page, Story};
use crate::media::{self, AudioRef, ImageRef};
use tracing::debug;

/// The observable state of a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderPhase {
    /// Nothing loaded yet.
    Empty,
    /// A story with pages is loaded; `cursor` is always a valid page index.
    Ready { cursor: usize },
    /// A story with zero pages is loaded. Only a fresh `load` leaves this state.
    ReadyNoPages,
}

#[derive(Debug, Clone)]
enum Phase {
    Empty,
    Ready { story: Story, cursor: usize },
    ReadyNoPages { story: Story },
}

/// Holds a story and the index of the page being presented.
///
/// Navigation clamps at both ends and never wraps.
#[derive(Debug, Clone)]
pub struct ReaderState {
    phase: Phase,
}

impl Default for ReaderState {
    fn default() -> Self {
        Self::new()
    }
}

impl ReaderState {
    pub fn new() -> Self {
        Self { phase: Phase::Empty }
    }

    /// Installs a story and moves the cursor to its first page.
    ///
    /// A story without pages is valid; it simply has no current page.
    pub fn load(&mut self, story: Story) {
        debug!(story_id = %story.id, pages = story.pages.len(), "Loading story into reader");
        self.phase = if story.pages.is_empty() {
            Phase::ReadyNoPages { story }
        } else {
            Phase::Ready { story, cursor: 0 }
        };
    }

    pub fn phase(&self) -> ReaderPhase {
        match &self.phase {
            Phase::Empty => ReaderPhase::Empty,
            Phase::Ready { cursor, .. } => ReaderPhase::Ready { cursor: *cursor },
            Phase::ReadyNoPages { .. } => ReaderPhase::ReadyNoPages,
        }
    }

    pub fn story(&self) -> Option<&Story> {
        match &self.phase {
            Phase::Empty => None,
            Phase::Ready { story, .. } | Phase::ReadyNoPages { story } => Some(story),
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        match &self.phase {
            Phase::Ready { cursor, .. } => Some(*cursor),
            _ => None,
        }
    }

    pub fn page_count(&self) -> usize {
        self.story().map_or(0, |story| story.pages.len())
    }

    pub fn current_page(&self) -> Option<&Page> {
        match &self.phase {
            Phase::Ready { story, cursor } => story.pages.get(*cursor),
            _ => None,
        }
    }

    pub fn has_next(&self) -> bool {
        match &self.phase {
            Phase::Ready { story, cursor } => *cursor + 1 < story.pages.len(),
            _ => false,
        }
    }

    pub fn has_previous(&self) -> bool {
        matches!(&self.phase, Phase::Ready { cursor, .. } if *cursor > 0)
    }

    /// Advances one page; a no-op on the last page.
    pub fn next(&mut self) {
        if let Phase::Ready { story, cursor } = &mut self.phase {
            if *cursor + 1 < story.pages.len() {
                *cursor += 1;
            }
        }
    }

    /// Goes back one page; a no-op on the first page.
    pub fn previous(&mut self) {
        if let Phase::Ready { cursor, .. } = &mut self.phase {
            if *cursor > 0 {
                *cursor -= 1;
            }
        }
    }

    pub fn current_image_source(&self) -> Option<ImageRef> {
        self.current_page().and_then(media::resolve_image_source)
    }

    pub fn current_audio_source(&self) -> Option<AudioRef> {
        self.current_page().and_then(media::resolve_audio_source)
    }

    pub fn cover_image_source(&self) -> Option<ImageRef> {
        self.story().and_then(media::resolve_cover_image_source)
    }
}
