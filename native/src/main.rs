use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::process::ExitCode;

use cascada_core::observer::TracingObserver;
use cascada_core::style::{self, CascadeOptions, MatchPolicy};
use cascada_core::{css, html};
use tracing_subscriber::EnvFilter;

mod dump;

fn main() -> ExitCode {
    let mut opts = getopts::Options::new();
    opts.optopt("h", "html", "HTML document", "FILENAME");
    opts.optopt("c", "css", "CSS stylesheet", "FILENAME");
    opts.optopt("o", "output", "Output file (stdout when omitted)", "FILENAME");
    opts.optflag("", "compound", "Require every part of a compound selector to match");
    opts.optflag("t", "typed", "Show how each value was typed next to its declared text");
    opts.optflagmulti("v", "verbose", "Log parser events; repeat for more detail");
    opts.optflag("", "help", "Print this help");

    let matches = match opts.parse(std::env::args().skip(1)) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{}", e);
            eprint!("{}", opts.usage("Usage: cascada [options]"));
            return ExitCode::FAILURE;
        }
    };
    if matches.opt_present("help") {
        print!("{}", opts.usage("Usage: cascada [options]"));
        return ExitCode::SUCCESS;
    }

    init_logging(matches.opt_count("v"));

    let str_arg = |flag: &str, default: &str| -> String { matches.opt_str(flag).unwrap_or(default.to_string()) };
    let options = CascadeOptions {
        matching: if matches.opt_present("compound") {
            MatchPolicy::AllAxes
        } else {
            MatchPolicy::AnyAxis
        },
        ..CascadeOptions::default()
    };

    let html_path = str_arg("h", "demos/test.html");
    let css_path = str_arg("c", "demos/test.css");
    match run(&html_path, &css_path, matches.opt_str("o"), &options, matches.opt_present("t")) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbosity: usize) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(
    html_path: &str,
    css_path: &str,
    output: Option<String>,
    options: &CascadeOptions,
    typed: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let markup = read_source(html_path)?;
    let stylesheet = read_source(css_path)?;

    let document = html::parse_bytes_with(&markup, &mut TracingObserver)?;
    let rules = css::parse_bytes_with(&stylesheet, &mut TracingObserver)?;
    tracing::info!(rules = rules.len(), roots = document.roots().len(), "parsed sources");

    let styled = style::resolve_with(&document, &rules, options);

    let mut out: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(&path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    for root in styled.roots() {
        dump::write_styled_node(&mut out, root, 0, typed)?;
    }
    out.flush()?;
    Ok(())
}

fn read_source(filename: &str) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    File::open(filename)?.read_to_end(&mut buf)?;
    Ok(buf)
}
