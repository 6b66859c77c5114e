//! Rising lava.

use crate::{ArenaWorld, LavaRiseConfig};

/// Raises the lava one block every `ticks_per_level` ticks until it
/// reaches `maximum_height`.
#[derive(Debug, Clone)]
pub struct LavaRise {
    config: LavaRiseConfig,
    height: i32,
    next_rise_time: Option<u64>,
}

impl LavaRise {
    pub fn new(config: LavaRiseConfig, start_height: i32) -> Self {
        Self {
            config,
            height: start_height,
            next_rise_time: None,
        }
    }

    /// Advances the lava timer. Returns the new height on ticks where the
    /// lava rose.
    pub fn tick<W>(&mut self, world: &mut W, time: u64) -> Option<i32>
    where
        W: ArenaWorld + ?Sized,
    {
        let Some(next) = self.next_rise_time else {
            self.next_rise_time = Some(time.saturating_add(self.config.ticks_per_level));
            return None;
        };
        if time < next || self.height >= self.config.maximum_height {
            return None;
        }

        self.height += 1;
        self.next_rise_time = Some(time.saturating_add(self.config.ticks_per_level));
        world.set_lava_height(self.height);
        tracing::debug!(height = self.height, "lava rose");
        Some(self.height)
    }

    pub fn height(&self) -> i32 {
        self.height
    }
}
