mod clock;
mod logging;
mod render;
mod schedule;
mod settings;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing::{debug, info};

use crate::clock::select_clock;
use crate::render::{JsonRenderer, Renderer, TextRenderer};
use crate::schedule::anchor::resolve_anchor;
use crate::schedule::calculator::{Mode, SchedulePlan, TimeDisplayMode};
use crate::settings::store::{JsonSettingsStore, load_with_overrides};
use crate::settings::{ActivityLevel, SettingsOverrides};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliMode {
    Wake,
    Sleep,
}

impl From<CliMode> for Mode {
    fn from(value: CliMode) -> Self {
        match value {
            CliMode::Wake => Mode::Wake,
            CliMode::Sleep => Mode::Sleep,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliActivity {
    Low,
    Moderate,
    High,
}

impl From<CliActivity> for ActivityLevel {
    fn from(value: CliActivity) -> Self {
        match value {
            CliActivity::Low => ActivityLevel::Low,
            CliActivity::Moderate => ActivityLevel::Moderate,
            CliActivity::High => ActivityLevel::High,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "rimrod",
    version,
    about = "Sleep-cycle calculator for bedtimes and wake-up times"
)]
struct Cli {
    /// Anchor time as HH:MM; defaults to the current minute
    time: Option<String>,

    /// `wake`: TIME is when you want to get up. `sleep`: TIME is when you go to bed.
    #[arg(long, value_enum, default_value_t = CliMode::Wake)]
    mode: CliMode,

    #[arg(long, default_value = "rimrod.json")]
    settings: PathBuf,

    #[arg(long, allow_negative_numbers = true)]
    cycle_length: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    sleep_latency: Option<i64>,

    #[arg(long = "options")]
    num_options: Option<u32>,

    #[arg(long)]
    age: Option<u32>,

    #[arg(long, value_enum)]
    activity: Option<CliActivity>,

    /// Write the merged settings back to the settings file
    #[arg(long)]
    save: bool,

    #[arg(long, value_enum, default_value_t = CliFormat::Text)]
    format: CliFormat,

    #[arg(long)]
    twelve_hour: bool,

    /// IANA zone used to pick today's date, e.g. Europe/Paris
    #[arg(long)]
    tz: Option<String>,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            cycle_length_min: self.cycle_length,
            sleep_latency_min: self.sleep_latency,
            num_options: self.num_options,
            age: self.age,
            activity_level: self.activity.map(Into::into),
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let store = JsonSettingsStore::new(&cli.settings);
    let settings = load_with_overrides(&store, &cli.overrides(), cli.save)
        .with_context(|| format!("failed to load {}", store.path().display()))?;
    debug!(?settings, "settings resolved");

    let clock = select_clock(cli.tz.as_deref())?;
    let anchor = resolve_anchor(cli.time.as_deref(), clock.as_ref())?;
    let mode = Mode::from(cli.mode);
    info!(mode = mode.as_str(), %anchor, clock = %clock.label(), "computing schedule");

    let plan = SchedulePlan::build(mode, anchor, &settings)?;
    debug!(
        min = plan.range.min,
        max = plan.range.max,
        recommended = plan.recommended_count(),
        "recommended window"
    );

    let renderer: Box<dyn Renderer> = match cli.format {
        CliFormat::Text => Box::new(TextRenderer {
            display: if cli.twelve_hour {
                TimeDisplayMode::Hour12
            } else {
                TimeDisplayMode::Hour24
            },
        }),
        CliFormat::Json => Box::new(JsonRenderer),
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    renderer.render(&mut out, &plan, &settings)
}
