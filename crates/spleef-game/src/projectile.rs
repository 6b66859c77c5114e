//! Periodic projectile handouts.

use std::collections::HashSet;

use spleef_protocol::{ItemStack, PlayerId};

use crate::{PlayerControl, ProjectileConfig, SessionHost};

/// Tops every connected participant up by one projectile each
/// `restock_interval` ticks, never past `maximum`.
#[derive(Debug, Clone)]
pub struct ProjectileRestock {
    config: ProjectileConfig,
    next_restock_time: Option<u64>,
}

impl ProjectileRestock {
    pub fn new(config: ProjectileConfig) -> Self {
        Self {
            config,
            next_restock_time: None,
        }
    }

    /// Advances the restock timer. Returns how many players received a
    /// projectile this tick.
    pub fn tick<C>(&mut self, ctx: &mut C, participants: &HashSet<PlayerId>, time: u64) -> usize
    where
        C: SessionHost + PlayerControl + ?Sized,
    {
        match self.next_restock_time {
            Some(next) if time >= next => {}
            Some(_) => return 0,
            None => {
                self.next_restock_time = Some(time.saturating_add(self.config.restock_interval));
                return 0;
            }
        }
        self.next_restock_time = Some(time.saturating_add(self.config.restock_interval));

        let mut restocked = 0;
        for &id in participants {
            if ctx.player(id).is_none() {
                continue;
            }
            if ctx.item_count(id, &self.config.item) < self.config.maximum {
                ctx.give_item(id, ItemStack::of(self.config.item.clone(), 1));
                restocked += 1;
            }
        }
        restocked
    }
}
