// Grows stochastic branching root structures on a discrete grid and renders
// them to a PNG. Each root carries a color gradient and a mass that governs
// how readily its branches advance; the driver ticks the frontier until
// every branch has died or a tick budget runs out.

mod color;
mod rng;
mod scene;
mod sim;
mod surface;
mod tree;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde::Serialize;

use color::{choose_palette, PALETTES};
use rng::{Random, RandomSource};
use sim::{Driver, Event, Immediate, Style, Ticker, WallClock};
use surface::ImageSurface;
use tree::Tree;

#[derive(Debug, Parser)]
#[command(version, about = "Procedural root growth renderer")]
struct Args {
    /// Field width in cells
    #[arg(long, default_value_t = 64, value_parser = clap::value_parser!(i32).range(3..))]
    width : i32,

    /// Field height in cells, defaults to the width
    #[arg(long, value_parser = clap::value_parser!(i32).range(3..))]
    height : Option<i32>,

    /// Number of roots to generate
    #[arg(long, default_value_t = 12)]
    roots : usize,

    /// Palette index; chosen at random when omitted
    #[arg(long)]
    palette : Option<usize>,

    /// Neon variant: neon palette and doubled glow
    #[arg(long)]
    neon : bool,

    /// Tick budget; -1 grows until every branch has died
    #[arg(long, default_value_t = sim::UNBOUNDED)]
    length : i64,

    /// Ticks per second when animating
    #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u32).range(1..))]
    fps : u32,

    /// Advance ticks on a wall clock instead of as fast as possible
    #[arg(long)]
    animate : bool,

    /// Seed for a reproducible run
    #[arg(long)]
    seed : Option<u64>,

    /// Pixels per field cell
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u32).range(1..))]
    scale : u32,

    /// Roll a random field size and root count instead of the values above
    #[arg(long)]
    roll : bool,

    /// Output image path
    #[arg(long, default_value = "roots.png")]
    out : PathBuf,

    /// Write run metadata as JSON to this path
    #[arg(long)]
    metadata : Option<PathBuf>,
}

// Informational sidecar for external cataloguing, not consumed by the
// simulation itself
#[derive(Debug, Serialize)]
struct RunMetadata {
    size_category : &'static str,
    neon : bool,
    palette : usize,
    palette_name : &'static str,
    seed : Option<u64>,
    field_width : i32,
    field_height : i32,
    roots : usize,
    ticks : u64,
}

fn size_category(width : i32) -> &'static str {
    if width < 12 {
        "small"
    } else if width < 18 {
        "medium"
    } else {
        "large"
    }
}

// Random field size in [7, 24) and a root count scaled to it, the way the
// one-shot picture generator rolls its parameters
fn rolled_parameters(rng : &mut dyn RandomSource) -> (i32, i32, usize) {
    let min_size : usize = 7;
    let max_size : usize = 24;
    let size = (rng.pick(max_size - min_size) + min_size) as i32;
    let min_roots = f64::from(size).sqrt().floor() as usize + 1;
    let max_roots = (f64::from(size * size) * 0.2) as usize;
    let amount = rng.pick(max_roots - min_roots) + min_roots;
    (size, size, amount)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => Random::seeded(seed),
        None => Random::init(),
    };

    let (field_width, field_height, amount) = if args.roll {
        rolled_parameters(&mut rng)
    } else {
        (args.width, args.height.unwrap_or(args.width), args.roots)
    };

    let palette_index = choose_palette(args.palette, args.neon, &mut rng);
    let palette = PALETTES[palette_index].colors()?;
    let style = if args.neon { Style::neon() } else { Style::init() };

    let mut tree = Tree::init(field_width, field_height);
    tree.generate_roots(amount, Some(&palette), &mut rng);

    let background = scene::background_color(&tree.roots);
    info!(
        "{} roots on a {}x{} field, palette {}, background {}",
        amount,
        field_width,
        field_height,
        PALETTES[palette_index].name,
        background
    );

    let mut canvas = ImageSurface::init(field_width, field_height, args.scale);
    scene::draw(&mut canvas, &tree, background, &mut rng, &style);

    let ticker : Box<dyn Ticker> = if args.animate {
        Box::new(WallClock::init(args.fps))
    } else {
        Box::new(Immediate)
    };
    let mut driver = Driver::init(args.length, ticker);
    driver
        .events
        .subscribe(Box::new(|_event : &Event| info!("growth complete")));
    let ticks = driver.run(&mut canvas, &mut rng, &mut tree, &style);

    canvas
        .image()
        .save(&args.out)
        .with_context(|| format!("saving image to {}", args.out.display()))?;
    info!("wrote {}", args.out.display());

    if let Some(path) = &args.metadata {
        let metadata = RunMetadata {
            size_category : size_category(field_width),
            neon : args.neon,
            palette : palette_index,
            palette_name : PALETTES[palette_index].name,
            seed : args.seed,
            field_width,
            field_height,
            roots : amount,
            ticks,
        };
        let encoded = serde_json::to_string_pretty(&metadata)?;
        std::fs::write(path, encoded)
            .with_context(|| format!("writing metadata to {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_categories_follow_the_thresholds() {
        assert_eq!(size_category(7), "small");
        assert_eq!(size_category(11), "small");
        assert_eq!(size_category(12), "medium");
        assert_eq!(size_category(17), "medium");
        assert_eq!(size_category(18), "large");
        assert_eq!(size_category(64), "large");
    }

    #[test]
    fn rolled_parameters_stay_in_the_documented_ranges() {
        let mut rng = Random::seeded(21);
        for _ in 0..100 {
            let (width, height, amount) = rolled_parameters(&mut rng);
            assert_eq!(width, height);
            assert!(width >= 7 && width < 24);
            let min_roots = f64::from(width).sqrt().floor() as usize + 1;
            let max_roots = (f64::from(width * width) * 0.2) as usize;
            assert!(amount >= min_roots && amount < max_roots);
        }
    }
}
