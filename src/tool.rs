//! CLI tool that lists the homophones of words from a pronouncing dictionary

use clap::builder::TypedValueParser;
use clap::{ArgAction, CommandFactory, Parser};
use rhyme_map::homophones::DEFAULT_SUFFIX_LEN;
use rhyme_map::HomophoneIndex;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    prelude::*,
    registry::Registry,
};

macro_rules! die {
    ($fmt:literal, $($arg:tt)*) => {{
        eprintln!($fmt, $($arg)*);
        std::process::exit(1);
    }};

    ($msg:literal) => {{
        eprintln!($msg);
        std::process::exit(1);
    }};
}

#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};

fn init_tracing(quiet: bool, verbose: u8) -> LevelFilter {
    let level_filter = if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    // Library code logs through the `log` facade
    if tracing_log::LogTracer::init().is_err() {
        die!("INTERNAL ERROR: setting log tracer failed");
    }

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("HOMOPHONES_LOG")
        .from_env_lossy();

    let subscriber = Registry::default().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .compact(),
    );

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        die!("INTERNAL ERROR: setting default tracing::subscriber failed");
    }

    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing_panic::panic_hook(info);
        prev_hook(info);
    }));

    level_filter
}

/// Find words that share their final phonemes with the given words
#[derive(Parser, Debug)]
#[command(name = "homophones")]
#[command(about = "Find words that share their final phonemes with the given words")]
struct ToolArgs {
    /// Suppress all output except for errors. This overrides the -v flag.
    #[arg(short, long)]
    quiet: bool,

    /// Turn on verbose output. Supply -v multiple times to increase verbosity.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Number of trailing phonemes two words must share
    #[arg(
        short = 'n',
        default_value_t = DEFAULT_SUFFIX_LEN,
        value_parser = clap::value_parser!(u64).range(1..).map(|n| n as usize),
        value_name = "COUNT",
    )]
    suffix_len: usize,

    /// Pronouncing dictionary with one `WORD#PH1 PH2 ...` record per line
    #[arg(short, long, default_value = "cmudict.txt", value_name = "PATH")]
    dict: PathBuf,

    /// Words to look up (case-sensitive, as spelled in the dictionary)
    #[arg(required = true)]
    words: Vec<String>,
}

fn main() {
    let started = Instant::now();
    let args = ToolArgs::parse();
    let level_filter = init_tracing(args.quiet, args.verbose);

    info!(
        "starting {} ({} {}), log level: {level_filter}",
        ToolArgs::command().get_name(),
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let load = Instant::now();
    let index = match HomophoneIndex::open(&args.dict, args.suffix_len) {
        Ok(index) => index,
        Err(e) => die!("Error loading {}: {}", args.dict.display(), e),
    };
    info!("Loaded dictionary in {:?}", load.elapsed());

    let search = Instant::now();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for word in &args.words {
        let written = match index.lookup(word) {
            Some(homophones) => writeln!(out, "{homophones}"),
            None => writeln!(
                out,
                "Word being searched has less phonemes than {}",
                args.suffix_len
            ),
        };
        if let Err(e) = written {
            die!("Error writing output: {}", e);
        }
    }
    info!("Search time to find all homophones: {:?}", search.elapsed());
    info!("Total time: {:?}", started.elapsed());
}
