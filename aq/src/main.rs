use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use log::{error, warn, LevelFilter};
use quarantine_attr::{interrupt, pipeline, pool, Mode, ResolveOptions, Root};

// aq <path>... # remove the quarantine attribute
// aq -c <path>... # only report whether it is set
// aq -f <dir> # the directory and everything below it
// aq -rf <dir> # same as '-f', removal is the default
#[derive(Parser)]
#[clap(
    name = "aq",
    version,
    mut_arg("version", |a| a.short('v')),
    about = "Remove the com.apple.quarantine extended attribute from files"
)]
struct Arguments {
    #[clap(
        help = "Path(s) to file, directory or bundle",
        required_unless_present = "folder"
    )]
    paths: Vec<String>,

    #[clap(short, long, help = "Remove the attribute (default)", conflicts_with = "check")]
    remove: bool,

    #[clap(short, long, help = "Only report whether the attribute is set")]
    check: bool,

    #[clap(
        short,
        long,
        value_name = "DIR",
        number_of_values = 1,
        help = "Apply to a directory and every entry below it"
    )]
    folder: Vec<String>,

    #[clap(
        long,
        value_name = "N",
        help = "Descend at most N levels below a folder",
        long_help = r#"Descend at most N levels below a folder.
'1' only covers the immediate children. Bundles such as 'MyApp.app' are
always cleaned in full. Unlimited by default."#
    )]
    max_depth: Option<usize>,

    #[clap(short = 'L', long, help = "Follow symbolic links")]
    follow_symlinks: bool,

    #[clap(short, long, value_name = "N", help = "Number of worker threads [default: CPU count]")]
    jobs: Option<usize>,

    #[clap(long, help = "Log debug details to stderr")]
    verbose: bool,
}

/// Parsed arguments plus the roots in the order they were given.
struct Invocation {
    args: Arguments,
    roots: Vec<Root>,
}

fn parse<I, T>(argv: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = Arguments::command().try_get_matches_from(argv)?;
    let args = Arguments::from_arg_matches(&matches)?;
    let roots = ordered_roots(&args, &matches);
    Ok(Invocation { args, roots })
}

// positional paths and '--folder' values interleave on the command line
fn ordered_roots(args: &Arguments, matches: &ArgMatches) -> Vec<Root> {
    let mut indexed = Vec::with_capacity(args.paths.len() + args.folder.len());
    if let Some(indices) = matches.indices_of("paths") {
        indexed.extend(
            indices
                .zip(&args.paths)
                .map(|(i, p)| (i, Root::Path(PathBuf::from(p)))),
        );
    }
    if let Some(indices) = matches.indices_of("folder") {
        indexed.extend(
            indices
                .zip(&args.folder)
                .map(|(i, p)| (i, Root::Folder(PathBuf::from(p)))),
        );
    }
    indexed.sort_by_key(|(i, _)| *i);
    indexed.into_iter().map(|(_, root)| root).collect()
}

impl Arguments {
    fn options(&self) -> pipeline::Options {
        pipeline::Options {
            mode: if self.check { Mode::Check } else { Mode::Remove },
            resolve: ResolveOptions {
                max_depth: self.max_depth,
                follow_symlinks: self.follow_symlinks,
            },
            jobs: self.jobs.unwrap_or_else(pool::default_jobs),
        }
    }
}

fn main() -> ExitCode {
    let invocation = match parse(std::env::args_os()) {
        Ok(invocation) => invocation,
        Err(e) => {
            let _ = e.print();
            // '--help' and '--version' also end up here
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    main0(invocation).unwrap_or(ExitCode::FAILURE)
}

fn main0(invocation: Invocation) -> Result<ExitCode, ()> {
    let Invocation { args, roots } = invocation;
    init_logger(args.verbose)?;
    if let Err(e) = interrupt::install() {
        warn!("failed to install interrupt handler: {}", e);
    }

    let report = pipeline::run(&roots, &args.options(), interrupt::flag());

    let stdout = std::io::stdout();
    report.write_to(&mut stdout.lock()).map_err(|e| {
        error!("failed to write report: {}", e);
    })?;

    if interrupt::is_set() {
        warn!("interrupted, remaining targets were skipped");
    }
    let failures = report.failures();
    if failures > 0 {
        warn!(
            "{} of {} target(s) failed",
            failures,
            report.results().len()
        );
    }
    Ok(ExitCode::from(report.code()))
}

fn init_logger(verbose: bool) -> Result<(), ()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .without_timestamps()
        .init()
        .map_err(|e| {
            eprintln!("failed to initialize logger: {}", e);
        })
}
