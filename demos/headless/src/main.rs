use std::collections::HashMap;
use std::time::Duration;

use spleef::prelude::*;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// In-memory world
// ---------------------------------------------------------------------------

/// A world with no blocks, only bookkeeping. Prints what a real world
/// engine would do.
#[derive(Default)]
struct DemoWorld {
    inventories: HashMap<PlayerId, HashMap<String, u32>>,
}

impl PlayerControl for DemoWorld {
    fn reset_player(&mut self, player: PlayerId, mode: GameMode) {
        self.inventories.remove(&player);
        println!("  world: {player} reset to {mode:?}");
    }

    fn teleport(&mut self, player: PlayerId, pos: BlockPos) {
        println!("  world: {player} teleported to ({}, {}, {})", pos.x, pos.y, pos.z);
    }

    fn give_item(&mut self, player: PlayerId, stack: ItemStack) {
        *self
            .inventories
            .entry(player)
            .or_default()
            .entry(stack.item.clone())
            .or_default() += stack.count;
        println!("  world: {player} given {}x {}", stack.count, stack.item);
    }

    fn item_count(&self, player: PlayerId, item: &str) -> u32 {
        self.inventories
            .get(&player)
            .and_then(|items| items.get(item))
            .copied()
            .unwrap_or(0)
    }
}

impl ArenaWorld for DemoWorld {
    fn remove_blocks(&mut self, bounds: BlockBounds) {
        println!("  world: floor at y={} removed", bounds.bottom());
    }

    fn decay_blocks(&mut self, bounds: BlockBounds, ticks: u32) {
        println!("  world: floor at y={} decaying over {ticks} ticks", bounds.bottom());
    }

    fn set_lava_height(&mut self, y: i32) {
        println!("  world: lava at y={y}");
    }

    fn set_time_of_day(&mut self, time: i64) {
        println!("  world: time of day {time}");
    }

    fn apply_rules(&mut self, rules: &GameRules) {
        println!("  world: rules {rules:?}");
    }
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

fn map() -> SpleefMap {
    let level = |y| BlockBounds::new(BlockPos::new(-12, y, -12), BlockPos::new(12, y, 12));
    SpleefMap {
        levels: vec![level(30), level(20), level(10)],
        participant_spawns: vec![
            BlockPos::new(-6, 31, -6),
            BlockPos::new(6, 31, -6),
            BlockPos::new(-6, 31, 6),
            BlockPos::new(6, 31, 6),
        ],
        spectator_spawn: BlockPos::new(0, 45, 0),
        lava_height: 2,
    }
}

/// Prints everything the arena sends to one player.
fn bot(name: &str) -> PlayerSender {
    let (tx, mut rx) = mpsc::unbounded_channel::<Outbound>();
    let name = name.to_string();
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => println!("  -> {name}: {json}"),
                Err(e) => eprintln!("  -> {name}: unprintable message: {e}"),
            }
        }
    });
    tx
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => SpleefConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => SpleefConfig::from_json(include_str!("../spleef.json"))?,
    };

    let players = [
        PlayerHandle::new(PlayerId(1), "alice"),
        PlayerHandle::new(PlayerId(2), "bob"),
        PlayerHandle::new(PlayerId(3), "carol"),
        PlayerHandle::new(PlayerId(4), "dave"),
    ];

    let mut builder = ArenaBuilder::new(config, map());
    for player in &players {
        builder = builder.participant(player.clone(), bot(&player.name));
    }
    let (arena, task) = builder.spawn(DemoWorld::default())?;

    tokio::time::sleep(Duration::from_secs(2)).await;
    let eve = PlayerHandle::new(PlayerId(5), "eve");
    println!("eve connects: {:?}", arena.connect(eve, bot("eve")).await?);

    tokio::time::sleep(Duration::from_secs(2)).await;
    println!("carol touches lava: {:?}", arena.damage(PlayerId(3), DamageSource::Lava, 4.0).await?);

    tokio::time::sleep(Duration::from_secs(2)).await;
    println!("dave disconnects");
    arena.disconnect(PlayerId(4)).await?;

    tokio::time::sleep(Duration::from_secs(2)).await;
    println!("bob falls: {:?}", arena.death(PlayerId(2), DamageSource::Fall).await?);

    let outcome = task.await?;
    match outcome.winner() {
        Some(winner) => println!("round over at t={}: {} won", outcome.final_time, winner.name),
        None => println!("round over at t={}: no winner", outcome.final_time),
    }
    Ok(())
}
