use std::fmt;
use std::sync::Arc;

use alingo_core::model::{CourseId, Exercise, ExerciseId};
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use remote::{ApiConfig, InMemoryCourse, Remote};
use services::DrillConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const DEFAULT_COURSE_ID: u64 = 1;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidCourseId { raw: String },
    InvalidApiUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidCourseId { raw } => write!(f, "invalid --course value: {raw}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    course_id: CourseId,
    remote: Remote,
    drill_config: DrillConfig,
}

impl UiApp for DesktopApp {
    fn course_id(&self) -> CourseId {
        self.course_id
    }

    fn remote(&self) -> Remote {
        self.remote.clone()
    }

    fn drill_config(&self) -> DrillConfig {
        self.drill_config.clone()
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- play [--course <id>] [--api <url>]");
    eprintln!("  cargo run -p app -- demo");
    eprintln!();
    eprintln!("Defaults for play:");
    eprintln!("  --course 1");
    eprintln!("  --api http://localhost:8000");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  ALINGO_COURSE_ID, ALINGO_API_URL, ALINGO_TOKEN");
    eprintln!("  ALINGO_GUESS_WINDOW_MS, ALINGO_FEEDBACK_DELAY_MS, ALINGO_TIME_UP_DELAY_MS,");
    eprintln!("  ALINGO_PAGE_SIZE");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Demo,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "demo" => Some(Self::Demo),
            _ => None,
        }
    }
}

struct PlayArgs {
    course_id: CourseId,
    api: Option<String>,
}

impl PlayArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut course_id = std::env::var("ALINGO_COURSE_ID")
            .ok()
            .and_then(|value| value.parse::<CourseId>().ok())
            .unwrap_or_else(|| CourseId::new(DEFAULT_COURSE_ID));
        let mut api = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--course" => {
                    let value = require_value(args, "--course")?;
                    course_id = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidCourseId { raw: value.clone() })?;
                }
                "--api" => {
                    let value = require_value(args, "--api")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidApiUrl { raw: value });
                    }
                    api = Some(value);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { course_id, api })
    }

    fn api_config(&self) -> Result<ApiConfig, Box<dyn std::error::Error>> {
        match &self.api {
            Some(raw) => ApiConfig::new(raw, std::env::var("ALINGO_TOKEN").ok()).map_err(|_| {
                ArgsError::InvalidApiUrl {
                    raw: raw.clone(),
                }
                .into()
            }),
            None => Ok(ApiConfig::from_env()?),
        }
    }
}

/// A small offline course of Hebrew vowel pairs.
fn demo_course(course: CourseId) -> InMemoryCourse {
    const PAIRS: [(&str, &str, &str); 6] = [
        ("בָּ", "בּוֹ", "בָּ"),
        ("לִי", "לֵי", "לֵי"),
        ("מוּ", "מָה", "מוּ"),
        ("שָׁ", "סָ", "סָ"),
        ("רֶ", "רוֹ", "רוֹ"),
        ("כִּי", "קִי", "כִּי"),
    ];

    PAIRS
        .iter()
        .zip(1_u64..)
        .fold(InMemoryCourse::new(), |memory, (&(left, right, answer), id)| {
            memory.with_exercise(
                course,
                Exercise::new(ExerciseId::new(id), left, right, None),
                answer,
            )
        })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand means play.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Play,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    init_tracing();
    let drill_config = DrillConfig::from_env();

    let app = match cmd {
        Command::Play => {
            let parsed = PlayArgs::parse(&mut argv.into_iter()).map_err(|e| {
                eprintln!("{e}");
                print_usage();
                e
            })?;
            let config = parsed.api_config()?;
            info!(course = %parsed.course_id, api = %config.base_url, "starting drill");
            DesktopApp {
                course_id: parsed.course_id,
                remote: Remote::http(config)?,
                drill_config,
            }
        }
        Command::Demo => {
            if let Some(arg) = argv.into_iter().next() {
                return Err(ArgsError::UnknownArg(arg).into());
            }
            let course_id = CourseId::new(DEFAULT_COURSE_ID);
            info!(course = %course_id, "starting offline demo");
            DesktopApp {
                course_id,
                remote: Remote::in_memory(demo_course(course_id)),
                drill_config,
            }
        }
    };

    let app: Arc<dyn UiApp> = Arc::new(app);
    let context = build_app_context(&app);

    // Keep the window from defaulting to always-on-top in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Alingo")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
