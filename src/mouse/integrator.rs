//! Velocity integrator - fixed-point accumulation of continuous velocity
//! into discrete per-tick pixel deltas.
//!
//! Velocity is expressed in 1/256 pixel per tick per axis (Q8.8 against
//! the tick period in `config::POINTER_TICK_MS`). Each tick adds the
//! velocity magnitude to an accumulator, extracts the whole pixels, and
//! keeps the sub-pixel remainder for the next tick, so slow motion drips
//! out at a steady rate instead of bursting.

/// Fractional bits of the velocity fixed-point format.
const FRAC_BITS: u32 = 8;

/// One axis worth of accumulation state.
///
/// Only the tick context touches this, so it needs no locking.
#[derive(Debug, Default)]
pub struct AxisAccumulator {
    /// Sub-pixel remainder, in velocity units, always non-negative.
    frac: u32,
    /// Direction the remainder was accumulated in (+1 or -1).
    dir: i8,
}

impl AxisAccumulator {
    pub const fn new() -> Self {
        Self { frac: 0, dir: 1 }
    }

    /// Advance one tick at `velocity`; returns the whole pixels produced.
    ///
    /// A zero velocity means stop: the remainder is discarded so a later
    /// velocity write starts from rest. Likewise a direction reversal -
    /// leftover fraction from the old direction has no meaning for the new
    /// one. A tick worth more than 127 pixels is clamped and the excess
    /// stays in the accumulator rather than wrapping the sign.
    pub fn step(&mut self, velocity: i16) -> i8 {
        if velocity == 0 {
            self.frac = 0;
            return 0;
        }

        let dir: i8 = if velocity < 0 { -1 } else { 1 };
        if dir != self.dir {
            self.frac = 0;
            self.dir = dir;
        }

        self.frac += u32::from(velocity.unsigned_abs());
        let whole = (self.frac >> FRAC_BITS).min(i8::MAX as u32);
        self.frac -= whole << FRAC_BITS;

        // Cap the banked backlog at one full-scale tick; a velocity the
        // report format cannot keep up with must not owe motion forever.
        const MAX_BACKLOG: u32 = (i8::MAX as u32) << FRAC_BITS;
        if self.frac > MAX_BACKLOG {
            self.frac = MAX_BACKLOG;
        }

        let whole = whole as i8;
        if dir < 0 {
            -whole
        } else {
            whole
        }
    }
}

/// Both axes of velocity integration for one connection session.
#[derive(Debug, Default)]
pub struct VelocityIntegrator {
    x: AxisAccumulator,
    y: AxisAccumulator,
}

impl VelocityIntegrator {
    pub const fn new() -> Self {
        Self {
            x: AxisAccumulator::new(),
            y: AxisAccumulator::new(),
        }
    }

    /// Advance one tick at the given velocity; returns the pixel deltas to
    /// feed into the aggregator, exactly like a discrete-move producer.
    pub fn tick(&mut self, vx: i16, vy: i16) -> (i8, i8) {
        (self.x.step(vx), self.y.step(vy))
    }
}
