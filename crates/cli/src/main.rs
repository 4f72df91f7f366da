#![deny(unsafe_code)]
//! CLI binary for the spacetime grid.
//!
//! Subcommands:
//! - `render`: simulate N frames headlessly, write the last one as PNG
//! - `trace`: simulate N frames, print navigator state per frame as JSON
//! - `config`: print the derived config for a theme
//! - `list`: print available themes and config keys

mod error;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use serde_json::Value;
use spacetime_core::{derive_config, Seed, Theme};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "spacetime", about = "Warped spacetime grid renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Simulate frames and write the last one as a PNG snapshot.
    Render {
        #[command(flatten)]
        scene: SceneArgs,

        /// Output file path.
        #[arg(short, long, default_value = "spacetime.png")]
        output: PathBuf,
    },
    /// Simulate frames and print per-frame navigator state as JSON.
    Trace {
        #[command(flatten)]
        scene: SceneArgs,
    },
    /// Print the derived config for a theme.
    Config {
        /// Theme name (light, dark).
        #[arg(short, long, default_value = "dark")]
        theme: String,

        /// Config overrides as a JSON object.
        #[arg(long, default_value = "{}")]
        config: String,
    },
    /// List themes and config keys.
    List,
}

#[derive(Args)]
struct SceneArgs {
    /// Viewport width in logical pixels.
    #[arg(short = 'W', long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height in logical pixels.
    #[arg(short = 'H', long, default_value_t = 800.0)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Number of frames to simulate.
    #[arg(short, long, default_value_t = 120)]
    frames: usize,

    /// Simulated frames per second.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// PRNG seed for deterministic output.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Theme name (light, dark).
    #[arg(short, long, default_value = "dark")]
    theme: String,

    /// Pointer held at logical position "x,y" for the whole run.
    #[arg(long, value_parser = parse_pointer)]
    pointer: Option<[f64; 2]>,

    /// Config overrides as a JSON object.
    #[arg(long, default_value = "{}")]
    config: String,

    /// Scene file (JSON seed); replaces every other scene option.
    #[arg(long)]
    scene: Option<PathBuf>,
}

fn parse_pointer(s: &str) -> Result<[f64; 2], String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got \"{s}\""))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f64>()
            .ok()
            .filter(|c| c.is_finite())
            .ok_or_else(|| format!("invalid pointer coordinate \"{v}\""))
    };
    Ok([coord(x)?, coord(y)?])
}

fn parse_theme(name: &str) -> Result<Theme, CliError> {
    name.parse::<Theme>()
        .map_err(|e| CliError::Input(e.to_string()))
}

fn parse_overrides(json: &str) -> Result<Value, CliError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| CliError::Input(format!("invalid --config JSON: {e}")))?;
    if !value.is_object() {
        return Err(CliError::Input("--config must be a JSON object".into()));
    }
    Ok(value)
}

impl SceneArgs {
    fn into_seed(self) -> Result<Seed, CliError> {
        if let Some(path) = self.scene {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| CliError::Io(format!("reading {}: {e}", path.display())))?;
            let seed: Seed = serde_json::from_str(&text)
                .map_err(|e| CliError::Input(format!("invalid scene {}: {e}", path.display())))?;
            log::debug!("loaded scene from {}", path.display());
            return Ok(seed);
        }
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(CliError::Input(format!("--fps must be > 0, got {}", self.fps)));
        }
        let mut seed = Seed::new(parse_theme(&self.theme)?, self.width, self.height, self.seed);
        seed.device_pixel_ratio = self.dpr;
        seed.params = parse_overrides(&self.config)?;
        seed.frames = self.frames;
        seed.frame_interval_ms = 1000.0 / self.fps;
        seed.pointer = self.pointer;
        Ok(seed)
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let themes: Vec<&str> = Theme::ALL.iter().map(|t| t.name()).collect();
            let keys: Vec<String> = match serde_json::to_value(derive_config(Theme::Dark))? {
                Value::Object(map) => map.keys().cloned().collect(),
                _ => Vec::new(),
            };
            if cli.json {
                let info = serde_json::json!({
                    "themes": themes,
                    "config_keys": keys,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Themes:");
                println!("  {}", themes.join(", "));
                println!("Config keys:");
                for key in keys {
                    println!("  {key}");
                }
            }
        }
        Command::Config { theme, config } => {
            let theme = parse_theme(&theme)?;
            let derived = derive_config(theme).with_overrides(&parse_overrides(&config)?)?;
            let value = serde_json::to_value(&derived)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else if let Value::Object(map) = value {
                println!("{theme} theme:");
                for (key, v) in map {
                    println!("  {key} = {v}");
                }
            }
        }
        Command::Trace { scene } => {
            let seed = scene.into_seed()?;
            let frames = spacetime_snapshot::trace_seed(&seed)?;
            println!("{}", serde_json::to_string_pretty(&frames)?);
        }
        Command::Render { scene, output } => {
            let seed = scene.into_seed()?;
            let (surface, stats) = spacetime_snapshot::render_seed(&seed)?;
            spacetime_snapshot::snapshot::write_png(&surface, &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "theme": seed.theme,
                    "width": surface.width(),
                    "height": surface.height(),
                    "frames": stats.len(),
                    "seed": seed.seed,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} theme ({}x{} px, {} frames, seed {}) -> {}",
                    seed.theme,
                    surface.width(),
                    surface.height(),
                    stats.len(),
                    seed.seed,
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
