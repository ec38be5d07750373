//! Headless driver: load posts from JSON, settle the bubble layout, write an
//! SVG snapshot.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use bubbleviz_layout::{write_svg, Item, LayoutConfig, SimulationState};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: bubbleviz <posts.json> [--out FILE] [--width W] [--height H] [--ticks N] [--seed S]";

/// One post as delivered by the feed backend. `engagement_score` may be
/// missing in older dumps; it is then derived from the raw counters.
#[derive(Debug, Deserialize)]
struct Post {
    post_uri: String,
    #[serde(default)]
    hashtags: Vec<String>,
    #[serde(default)]
    likes: f64,
    #[serde(default)]
    reposts: f64,
    #[serde(default)]
    replies: f64,
    #[serde(default)]
    engagement_score: Option<f64>,
}

impl Post {
    fn weight(&self) -> f64 {
        match self.engagement_score {
            Some(score) => score,
            None => (self.likes + self.reposts * 2.0 + self.replies * 1.5).floor(),
        }
    }

    fn into_item(self) -> Item {
        let weight = self.weight();
        Item::new(self.post_uri, self.hashtags, weight)
    }
}

#[derive(Debug)]
struct Options {
    input: PathBuf,
    out: PathBuf,
    width: f64,
    height: f64,
    ticks: usize,
    seed: u64,
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut input = None;
    let mut out = PathBuf::from("bubbles.svg");
    let mut width = 1920.0;
    let mut height = 1080.0;
    let mut ticks = 500;
    let mut seed = 0;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .with_context(|| format!("{name} expects a value\n{USAGE}"))
        };
        match arg.as_str() {
            "--out" => out = PathBuf::from(value("--out")?),
            "--width" => width = value("--width")?.parse()?,
            "--height" => height = value("--height")?.parse()?,
            "--ticks" => ticks = value("--ticks")?.parse()?,
            "--seed" => seed = value("--seed")?.parse()?,
            other if other.starts_with("--") => bail!("unknown option {other}\n{USAGE}"),
            other => {
                if input.replace(PathBuf::from(other)).is_some() {
                    bail!("multiple input files given\n{USAGE}");
                }
            }
        }
    }

    let Some(input) = input else {
        bail!("{USAGE}");
    };
    Ok(Options {
        input,
        out,
        width,
        height,
        ticks,
        seed,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = parse_args(&args)?;

    let raw = fs::read_to_string(&opts.input)
        .with_context(|| format!("reading {}", opts.input.display()))?;
    let posts: Vec<Post> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", opts.input.display()))?;
    let items: Vec<Item> = posts.into_iter().map(Post::into_item).collect();

    let config = LayoutConfig {
        seed: opts.seed,
        ..Default::default()
    };
    let mut state = SimulationState::new(items, opts.width, opts.height, config)?;

    let mut snapshot = state.tick();
    for _ in 1..opts.ticks {
        if state.settled() {
            break;
        }
        snapshot = state.tick();
    }

    tracing::info!(
        clusters = snapshot.stats.cluster_count,
        items = snapshot.stats.item_count,
        scale_percent = snapshot.stats.scale_percent,
        settled = state.settled(),
        "layout finished"
    );

    write_svg(&snapshot, &opts.out)
        .with_context(|| format!("writing {}", opts.out.display()))?;
    println!("wrote {}", opts.out.display());
    Ok(())
}
