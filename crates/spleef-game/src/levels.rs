//! The floor's droppable levels.

use std::collections::VecDeque;

use spleef_protocol::BlockBounds;

use crate::{ArenaWorld, SpleefConfig, SpleefMap};

/// The floor levels still standing, lowest first.
///
/// Only [`try_drop_level`](Self::try_drop_level) mutates this. The actual
/// blocks belong to the world; this just decides which level goes next.
#[derive(Debug, Clone)]
pub struct SpleefLevels {
    pending: VecDeque<BlockBounds>,
    dropped: usize,
}

impl SpleefLevels {
    pub fn new(map: &SpleefMap) -> Self {
        let mut levels = map.levels.clone();
        levels.sort_by_key(BlockBounds::bottom);
        Self {
            pending: levels.into(),
            dropped: 0,
        }
    }

    /// Drops the lowest pending level, removing it outright or handing it
    /// to the world to decay depending on `config.decay`.
    ///
    /// Returns the level dropped, or `None` once the floor is used up.
    pub fn try_drop_level<W>(&mut self, world: &mut W, config: &SpleefConfig) -> Option<BlockBounds>
    where
        W: ArenaWorld + ?Sized,
    {
        let level = self.pending.pop_front()?;
        match config.decay_ticks() {
            Some(ticks) => world.decay_blocks(level, ticks),
            None => world.remove_blocks(level),
        }
        self.dropped += 1;
        tracing::info!(
            bottom = level.bottom(),
            remaining = self.pending.len(),
            "level dropped"
        );
        Some(level)
    }

    /// Levels not dropped yet.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// The level the next drop will take.
    pub fn next_level(&self) -> Option<&BlockBounds> {
        self.pending.front()
    }
}
