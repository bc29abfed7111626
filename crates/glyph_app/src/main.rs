//! # glyph_app — demo world
//!
//! A small bordered room with a patrolling player, a drifting drone, and a
//! short-lived ember. Demonstrates the full construction path: shared
//! component registry, tilemap setup, component attachment, the fixed
//! timestep loop, and a final rendered frame.

mod components;
mod game_loop;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use glyph_component::{ComponentRegistry, Entity, GridPos};
use glyph_tilemap::{Tile, Tilemap};

use components::{Health, Lifetime, Patrol};
use game_loop::{GameLoop, LoopConfig};

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("glyph_app=info".parse()?))
        .init();

    info!("glyph demo starting");

    let registry = Arc::new(ComponentRegistry::default());

    // A bordered 16x6 room.
    let mut map = Tilemap::new(16, 6);
    map.fill(&Tile::new("floor", '.'));
    let wall = Tile::new("wall", '#').solid();
    let (width, height) = (map.width(), map.height());
    for x in 0..width {
        map.add_tile(wall.clone(), GridPos::new(x, 0))?;
        map.add_tile(wall.clone(), GridPos::new(x, height - 1))?;
    }
    for y in 1..height - 1 {
        map.add_tile(wall.clone(), GridPos::new(0, y))?;
        map.add_tile(wall.clone(), GridPos::new(width - 1, y))?;
    }

    let mut player = Entity::new("Player", '@', registry.clone());
    player.add_tag("player");
    player.add_component(Health::new(10))?;
    player.add_component(Patrol::horizontal())?;
    let player_id = map.add_entity(player, GridPos::new(1, 2))?;

    let mut drone = Entity::new("drone", 'd', registry.clone());
    drone.add_component(Patrol::vertical())?;
    map.add_entity(drone, GridPos::new(8, 2))?;

    let mut ember = Entity::new("ember", '*', registry.clone());
    ember.add_component(Lifetime::new(12))?;
    map.add_entity(ember, GridPos::new(12, 3))?;

    info!(
        component_types = registry.len(),
        entities = map.entity_count(),
        tiles = map.tile_count(),
        "world ready"
    );

    let config = LoopConfig {
        tick_rate: 30.0,
        max_ticks: 60,
    };
    let mut game = GameLoop::new(config, map);
    game.run();

    let map = game.tilemap();
    let layout = map.entity_snapshot();
    info!(
        entities = layout.len(),
        occupied_cells = layout.cell_count(),
        "final layout"
    );
    if let Some(health) = map
        .entity(player_id)
        .and_then(|e| e.get_component::<Health>())
    {
        info!(hp = health.current(), max = health.max(), "player status");
    }

    for line in map.render_lines() {
        println!("{line}");
    }

    Ok(())
}
