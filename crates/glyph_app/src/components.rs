//! Example components for the demo world.
//!
//! These demonstrate the three shapes a component takes: pure data
//! (`Health`), self-contained behaviour (`Patrol`), and behaviour that
//! mutates the index through the command queue (`Lifetime`).

use glyph_component::{Component, GridPos, TickContext};

/// Walks one cell per tick, turning around when the map refuses a step.
///
/// Refusal is observed indirectly: if the entity is still on the same cell
/// as last tick, the previous move was rejected and the direction flips.
#[derive(Debug)]
pub struct Patrol {
    dx: i32,
    dy: i32,
    last_pos: Option<GridPos>,
}

impl Patrol {
    /// Patrol left-right.
    #[must_use]
    pub fn horizontal() -> Self {
        Self {
            dx: 1,
            dy: 0,
            last_pos: None,
        }
    }

    /// Patrol up-down.
    #[must_use]
    pub fn vertical() -> Self {
        Self {
            dx: 0,
            dy: 1,
            last_pos: None,
        }
    }
}

impl Component for Patrol {
    fn update(&mut self, ctx: &mut TickContext<'_>) {
        let pos = ctx.pos();
        if self.last_pos == Some(pos) {
            self.dx = -self.dx;
            self.dy = -self.dy;
        }
        self.last_pos = Some(pos);
        ctx.request_move(pos.offset(self.dx, self.dy));
    }
}

/// Hit points with a maximum. Pure data; keeps the default no-op update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    current: u32,
    max: u32,
}

impl Health {
    /// Full health at the given maximum.
    #[must_use]
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Current hit points.
    #[must_use]
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Maximum hit points.
    #[must_use]
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Subtract `amount`, saturating at zero.
    pub fn damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    /// Add `amount`, capped at the maximum.
    pub fn heal(&mut self, amount: u32) {
        self.current = (self.current + amount).min(self.max);
    }

    /// Returns `true` at zero hit points.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.current == 0
    }
}

impl Component for Health {}

/// Despawns the owning entity after a fixed number of ticks.
#[derive(Debug)]
pub struct Lifetime {
    remaining: u32,
}

impl Lifetime {
    /// Live for `ticks` frames.
    #[must_use]
    pub fn new(ticks: u32) -> Self {
        Self { remaining: ticks }
    }
}

impl Component for Lifetime {
    fn update(&mut self, ctx: &mut TickContext<'_>) {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            ctx.request_despawn();
        }
    }
}
