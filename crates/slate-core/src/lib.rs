pub mod cli;
pub mod commands;
pub mod config;
pub mod item;
pub mod render;
pub mod store;
pub mod view;

use std::ffi::OsString;
use std::io::{self, BufRead, Write};

use clap::Parser;
use tracing::{debug, info};

use crate::commands::Flow;

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let pre = cli::preprocess_args(&raw_args)?;
    let cli_args = cli::GlobalCli::parse_from(pre.cleaned_args);

    cli::init_tracing(cli_args.verbose, cli_args.quiet)?;

    info!(
        verbose = cli_args.verbose,
        quiet = cli_args.quiet,
        "starting slate session"
    );
    debug!(?pre.rc_overrides, "preprocessed rc overrides");

    let mut cfg = config::Config::load(cli_args.slaterc.as_deref())?;
    cfg.apply_overrides(
        pre.rc_overrides.into_iter().chain(
            cli_args
                .rc_overrides
                .into_iter()
                .map(|kv| (kv.key, kv.value)),
        ),
    );

    let mut store = store::ItemStore::new();
    let mut view = view::ViewState::new(config::default_category(&cfg)?);
    let mut renderer = render::Renderer::new(&cfg)?;
    let prompt = cfg.get("prompt").unwrap_or_else(|| "slate> ".to_string());

    println!(
        "slate {} (everything lives in memory and is gone on exit)",
        env!("CARGO_PKG_VERSION")
    );
    println!("Type 'help' for commands, 'quit' to leave.");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("{prompt}");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            info!("stdin closed, ending session");
            break;
        }

        let inv = match cli::Invocation::parse(&line) {
            Ok(Some(inv)) => inv,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("error: {err:#}");
                continue;
            }
        };

        match commands::dispatch(&mut store, &mut view, &cfg, &mut renderer, inv) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(err) => eprintln!("error: {err:#}"),
        }
    }

    info!("session ended");
    Ok(())
}
