//! Fixed-timestep game loop.
//!
//! One tick = one entity sweep plus a display reassembly. The loop sleeps
//! away whatever is left of the tick budget and warns when a tick runs
//! over it.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use glyph_tilemap::Tilemap;

/// Configuration for the game loop.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
        }
    }
}

/// The game loop state: a tilemap and a tick counter.
#[derive(Debug)]
pub struct GameLoop {
    /// Current tick counter.
    tick_id: u64,
    /// Loop configuration.
    config: LoopConfig,
    /// The world being stepped.
    tilemap: Tilemap,
}

impl GameLoop {
    /// Create a game loop over the given world.
    #[must_use]
    pub fn new(config: LoopConfig, tilemap: Tilemap) -> Self {
        Self {
            tick_id: 0,
            config,
            tilemap,
        }
    }

    /// Returns the current tick counter.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Returns a reference to the world.
    #[must_use]
    pub fn tilemap(&self) -> &Tilemap {
        &self.tilemap
    }

    /// Returns a mutable reference to the world.
    pub fn tilemap_mut(&mut self) -> &mut Tilemap {
        &mut self.tilemap
    }

    /// Run one tick: sweep the entities, reassemble the display.
    pub fn tick(&mut self) {
        self.tick_id += 1;
        self.tilemap.update_entities();
        self.tilemap.assemble();
        debug!(
            tick_id = self.tick_id,
            entities = self.tilemap.entity_count(),
            "tick complete"
        );
    }

    /// Run the loop for the configured number of ticks, or indefinitely.
    ///
    /// This is a blocking loop; each iteration sleeps out the remainder of
    /// the tick budget.
    pub fn run(&mut self) {
        let tick_duration = Duration::from_secs_f64(1.0 / self.config.tick_rate);

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            "starting game loop"
        );

        loop {
            let start = Instant::now();

            self.tick();

            if self.config.max_ticks > 0 && self.tick_id >= self.config.max_ticks {
                info!(ticks = self.tick_id, "game loop complete");
                break;
            }

            let elapsed = start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            } else {
                warn!(
                    tick_id = self.tick_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
        }
    }
}
