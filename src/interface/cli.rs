use std::ffi::OsString;
use std::str::FromStr;

use clap::{App, ArgMatches};
use gasket_core::geometry::chaos::{DEFAULT_SEED, MAX_POINTS};
use gasket_core::geometry::subdivide::DEPTH_CEILING;
use gasket_core::FlushPolicy;
use thiserror::Error;

/// Most chaos game points `--points` may ask for per level. Key 9 asks for nine levels' worth.
pub const MAX_POINTS_PER_LEVEL: usize = MAX_POINTS / 9;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for --{name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error(transparent)]
    Clap(#[from] clap::Error),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    Subdivide,
    Chaos,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subdivide" => Ok(Mode::Subdivide),
            "chaos" => Ok(Mode::Chaos),
            other => Err(format!("unknown mode \"{}\"", other)),
        }
    }
}

/// Everything the command line can change.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub initial_depth: Option<i32>,
    pub max_depth: u32,
    pub flush: FlushPolicy,
    pub mode: Mode,
    pub points: usize,
    pub seed: u64,
}

impl Settings {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, ConfigError> {
        let max_depth: u32 = parse(matches, "max-depth")?;
        if max_depth > DEPTH_CEILING {
            return Err(ConfigError::Invalid {
                name: "max-depth",
                reason: format!("{} is deeper than the ceiling of {}", max_depth, DEPTH_CEILING),
            });
        }

        let fps: u32 = parse(matches, "fps")?;
        if fps == 0 {
            return Err(ConfigError::Invalid { name: "fps", reason: "must be at least 1".to_string() });
        }

        let points: usize = parse(matches, "points")?;
        if points > MAX_POINTS_PER_LEVEL {
            return Err(ConfigError::Invalid {
                name: "points",
                reason: format!("{} is more than the {} points a level may plot", points, MAX_POINTS_PER_LEVEL),
            });
        }

        let flush = matches.value_of("flush")
            .unwrap_or("every-node")
            .parse::<FlushPolicy>()
            .map_err(|e| ConfigError::Invalid { name: "flush", reason: e.to_string() })?;

        Ok(Settings {
            title: matches.value_of("title").unwrap_or_default().to_string(),
            width: parse(matches, "width")?,
            height: parse(matches, "height")?,
            fps,
            initial_depth: parse_optional(matches, "depth")?,
            max_depth,
            flush,
            mode: parse(matches, "mode")?,
            points,
            seed: parse_optional(matches, "seed")?.unwrap_or(DEFAULT_SEED),
        })
    }
}

/// Parses `args` (including the program name) into settings.
pub fn parse_settings<I, T>(args: I) -> Result<Settings, ConfigError>
    where I: IntoIterator<Item = T>, T: Into<OsString> + Clone
{
    let yaml = load_yaml!("cli.yaml");
    let cli = App::from_yaml(yaml).version(crate_version!());
    let matches = cli.get_matches_from_safe(args)?;

    Settings::from_matches(&matches)
}

fn parse<T>(matches: &ArgMatches, name: &'static str) -> Result<T, ConfigError>
    where T: FromStr, T::Err: ToString
{
    parse_optional(matches, name)?
        .ok_or_else(|| ConfigError::Invalid { name, reason: "missing".to_string() })
}

fn parse_optional<T>(matches: &ArgMatches, name: &'static str) -> Result<Option<T>, ConfigError>
    where T: FromStr, T::Err: ToString
{
    match matches.value_of(name) {
        Some(raw) => raw.parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::Invalid { name, reason: format!("\"{}\": {}", raw, e.to_string()) }),
        None => Ok(None),
    }
}
