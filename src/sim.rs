// Growth stepping and the tick driver. Each tick every live head tries to
// expand into its neighborhood: cells that are occupied or on the border are
// struck first, and if nothing is left the branch dies for good. Survivors
// of that pass then each face an independent mass check; losing all of those
// only stalls the head, it retries with fresh randomness next tick. The
// driver repeats ticks until the frontier is empty or a tick budget runs
// out, then emits one completion event.

use std::thread;
use std::time::Duration;

use log::{debug, info};

use crate::rng::RandomSource;
use crate::surface::{LineCap, PaintSurface};
use crate::tree::{Head, Tree};

pub const UNBOUNDED : i64 = -1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    GrowthComplete,
}

// Minimal listener registry for run lifecycle notifications
pub struct Events {
    listeners : Vec<Box<dyn FnMut(&Event)>>,
}

impl Events {
    pub fn init() -> Events {
        Events {
            listeners : Vec::new(),
        }
    }

    pub fn subscribe(self : &mut Self, listener : Box<dyn FnMut(&Event)>) {
        self.listeners.push(listener);
    }

    pub fn emit(self : &mut Self, event : Event) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

// Source of tick cadence. The driver is agnostic to whether ticks arrive on
// a wall clock or as fast as the loop can spin.
pub trait Ticker {
    fn wait(&mut self);
}

pub struct WallClock {
    period : Duration,
}

impl WallClock {
    pub fn init(fps : u32) -> WallClock {
        WallClock {
            period : Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
        }
    }
}

impl Ticker for WallClock {
    fn wait(&mut self) {
        thread::sleep(self.period);
    }
}

pub struct Immediate;

impl Ticker for Immediate {
    fn wait(&mut self) {}
}

// Stylistic variant knobs; the neon variant doubles glow intensity
pub struct Style {
    pub glow_scale : f64,
}

impl Style {
    pub fn init() -> Style {
        Style { glow_scale : 1.0 }
    }

    pub fn neon() -> Style {
        Style { glow_scale : 2.0 }
    }
}

// Advance a single head by one tick. Returns the heads that live on from
// here: empty when the branch hit a structural dead end, the unchanged head
// when every candidate merely failed its mass check, otherwise one head per
// settled candidate. Settled candidates are painted as gradient segments on
// the way.
pub fn grow_iter(
    surface : &mut dyn PaintSurface,
    rng : &mut dyn RandomSource,
    tree : &mut Tree,
    head : &Head,
    style : &Style,
) -> Vec<Head> {
    let root = tree.roots[head.root];
    let offsets : [(i32, i32); 4] = match root.line_cap {
        LineCap::Round => [(-1, -1), (-1, 1), (1, 1), (1, -1)],
        LineCap::Square => [(-1, 0), (0, 1), (1, 0), (0, -1)],
    };

    let mut candidates : Vec<(i32, i32)> = offsets
        .iter()
        .map(|(dx, dy)| (head.x + dx, head.y + dy))
        .collect();

    candidates.retain(|&(x, y)| !tree.contains(x, y) && !tree.on_border(x, y));
    if candidates.is_empty() {
        // structural dead end, the branch dies here
        return Vec::new();
    }

    candidates.retain(|_| rng.next() <= root.mass);
    if candidates.is_empty() {
        // stalled, retry the same expansion next tick
        return vec![*head];
    }

    let field_width = f64::from(tree.width());
    let roots = floored_root_count(tree.roots.len());
    let ck = (1.0 - root.mass * 0.5) * roots.powf(1.0 / (roots.log10() + 1.0));
    let min_width = ((field_width - 7.0) / (24.0 - 7.0)) * 0.03 + 0.02;

    let mut out = Vec::with_capacity(candidates.len());
    for &(x, y) in &candidates {
        let distance = head.distance + 1;
        tree.occupy(x, y);

        let near = root
            .start_color
            .lerp(&root.end_color, ck * f64::from(head.distance) / field_width);
        let far = root
            .start_color
            .lerp(&root.end_color, ck * f64::from(distance) / field_width);

        surface.set_line_cap(root.line_cap);
        surface.set_glow(near, 20.0 * root.mass * root.mass * style.glow_scale);
        surface.set_line_width((1.0 - root.mass) * (1.0 - min_width) + min_width);
        surface.stroke_line(
            f64::from(head.x),
            f64::from(head.y),
            f64::from(x),
            f64::from(y),
            near,
            far,
        );

        out.push(Head {
            x,
            y,
            root : head.root,
            distance,
        });
    }
    out
}

// Root count as used by the logarithmic formulas; a single root would send
// log10 to zero, so anything below two is treated as two
pub fn floored_root_count(count : usize) -> f64 {
    count.max(2) as f64
}

// Advance every live head once and swap in the new frontier. Returns the
// size of that frontier.
pub fn step(
    surface : &mut dyn PaintSurface,
    rng : &mut dyn RandomSource,
    tree : &mut Tree,
    style : &Style,
) -> usize {
    let heads = std::mem::take(&mut tree.heads);
    let mut next = Vec::new();
    for head in &heads {
        next.extend(grow_iter(surface, rng, tree, head, style));
    }
    tree.heads = next;
    tree.heads.len()
}

pub struct Driver {
    length : i64,
    ticker : Box<dyn Ticker>,
    pub events : Events,
}

impl Driver {
    pub fn init(length : i64, ticker : Box<dyn Ticker>) -> Driver {
        Driver {
            length,
            ticker,
            events : Events::init(),
        }
    }

    // Run ticks until the frontier is exhausted, or in bounded mode until
    // the budget is spent, whichever comes first. Emits GrowthComplete once
    // on termination and returns the number of ticks executed.
    pub fn run(
        self : &mut Self,
        surface : &mut dyn PaintSurface,
        rng : &mut dyn RandomSource,
        tree : &mut Tree,
        style : &Style,
    ) -> u64 {
        let mut ticks : u64 = 0;
        let mut elapsed : i64 = 0;
        loop {
            self.ticker.wait();
            let live = step(surface, rng, tree, style);
            ticks += 1;
            debug!("tick {}: {} heads live", ticks, live);
            if self.length == UNBOUNDED {
                if live == 0 {
                    break;
                }
            } else if elapsed >= self.length || live == 0 {
                break;
            }
            elapsed += 1;
        }
        info!(
            "growth finished after {} ticks, {} joints",
            ticks,
            tree.joint_count()
        );
        self.events.emit(Event::GrowthComplete);
        ticks
    }
}
