use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

mod logger;
mod search;

use bgrep_engine::Engine;

const USAGE: &str = "\
usage: bgrep [--engine tree|nfa] -E <pattern> [file...]
       bgrep [--engine tree|nfa] -r <pattern> <dir>";

struct Args {
    engine: Engine,
    pattern: String,
    mode: Mode,
}

enum Mode {
    Stdin,
    Files(Vec<String>),
    Recursive(PathBuf),
}

impl Args {
    fn parse(mut parser: lexopt::Parser) -> anyhow::Result<Self> {
        use lexopt::prelude::*;

        let mut engine = Engine::Automaton;
        let mut extended = false;
        let mut recursive = false;
        let mut positional = Vec::new();

        while let Some(arg) = parser.next()? {
            match arg {
                Short('E') => extended = true,
                Short('r') => recursive = true,
                Long("engine") => {
                    engine = match parser.value()?.string()?.as_str() {
                        "tree" => Engine::Tree,
                        "nfa" | "automaton" => Engine::Automaton,
                        unknown => anyhow::bail!("unrecognized engine '{}'\n{}", unknown, USAGE),
                    };
                }
                Short('h') | Long("help") => {
                    println!("{}", USAGE);
                    std::process::exit(0);
                }
                Value(value) => positional.push(value.string()?),
                _ => return Err(arg.unexpected().into()),
            }
        }

        if !extended && !recursive {
            anyhow::bail!("{}", USAGE);
        }

        if positional.is_empty() {
            anyhow::bail!("missing pattern\n{}", USAGE);
        }
        let pattern = positional.remove(0);

        let mode = if recursive {
            if positional.len() != 1 {
                anyhow::bail!("-r expects exactly one directory\n{}", USAGE);
            }
            Mode::Recursive(PathBuf::from(positional.remove(0)))
        } else if positional.is_empty() {
            Mode::Stdin
        } else {
            Mode::Files(positional)
        };

        Ok(Self {
            engine,
            pattern,
            mode,
        })
    }
}

fn init_logging() -> anyhow::Result<()> {
    let rustlog = env::var("RUST_LOG").unwrap_or_default();
    let level = match rustlog.as_str() {
        "" | "off" => log::LevelFilter::Off,
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        unknown => anyhow::bail!("unrecognized log level '{}'", unknown),
    };

    logger::Logger::init(level)?;
    Ok(())
}

fn run() -> anyhow::Result<bool> {
    init_logging()?;

    let args = Args::parse(lexopt::Parser::from_env())?;

    // Surface pattern errors before touching any input.
    let parsed = bgrep_engine::parse(&args.pattern)?;
    log::debug!(
        "pattern {:?} parses as {} against {} engine",
        args.pattern,
        parsed.root,
        match args.engine {
            Engine::Tree => "tree",
            Engine::Automaton => "automaton",
        }
    );

    match &args.mode {
        Mode::Stdin => search::match_stdin(&args.pattern, args.engine),
        Mode::Files(paths) => search::match_files(&args.pattern, args.engine, paths),
        Mode::Recursive(dir) => search::match_dir(&args.pattern, args.engine, dir),
    }
}

fn main() -> ExitCode {
    // 0 when lines were selected, 1 when none were, 2 on usage or pattern
    // errors.
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("bgrep: {:#}", err);
            ExitCode::from(2)
        }
    }
}
