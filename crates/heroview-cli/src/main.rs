// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use heroview_app::{Column, LoadStatus, PageSize, ViewController};
use heroview_tui::{TableBody, TuiState};
use logging::LogTarget;
use runtime::InitialView;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `heroview --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let log_target = if options.check_only || options.dump {
        LogTarget::Stderr
    } else {
        LogTarget::File(config.log_file()?)
    };
    logging::init_tracing(config.log_level(), log_target)?;

    let source = runtime::dataset_source(&config, options.demo)?;
    if options.check_only {
        let records = runtime::check(source.as_ref())?;
        println!("ok: {records} records");
        return Ok(());
    }

    let page_size = match options.initial.page_size {
        Some(size) => size,
        None => config.page_size()?,
    };
    let mut controller = ViewController::load(source.as_ref(), page_size, TableBody::default());
    options.initial.apply(&mut controller);

    if options.dump {
        println!("{}", controller.presenter().to_plain_text());
        if let LoadStatus::Failed(error) = controller.load_status() {
            bail!("dataset load failed: {error}");
        }
        return Ok(());
    }

    let mut ui = TuiState::new(config.page_size_options()?);
    if let Some((column, query)) = &options.initial.filter {
        ui = ui.with_filter(*column, query);
    }
    heroview_tui::run_app(&mut controller, &mut ui)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    demo: bool,
    check_only: bool,
    dump: bool,
    show_help: bool,
    initial: InitialView,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        demo: false,
        check_only: false,
        dump: false,
        show_help: false,
        initial: InitialView::default(),
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--filter" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--filter requires <column>=<query>"))?;
                let (column, query) = value
                    .as_ref()
                    .split_once('=')
                    .ok_or_else(|| anyhow!("--filter expects <column>=<query>"))?;
                let column = parse_column(column)?;
                if column == Column::Icon {
                    bail!("--filter cannot target the icon column");
                }
                options.initial.filter = Some((column, query.to_owned()));
            }
            "--sort" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--sort requires a column"))?;
                options.initial.sorts.push(parse_column(value.as_ref())?);
            }
            "--page-size" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--page-size requires a number or \"all\""))?;
                options.initial.page_size = Some(PageSize::parse(value.as_ref())?);
            }
            "--page" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--page requires a page number"))?;
                let page = value
                    .as_ref()
                    .parse::<usize>()
                    .ok()
                    .filter(|page| *page > 0)
                    .ok_or_else(|| anyhow!("--page must be a positive number"))?;
                options.initial.page = Some(page);
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--dump" => {
                options.dump = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn parse_column(label: &str) -> Result<Column> {
    Column::parse(label.trim()).ok_or_else(|| {
        let labels = Column::ALL.map(Column::label).join(", ");
        anyhow!("unknown column {label:?}; expected one of: {labels}")
    })
}

fn print_help() {
    println!("heroview: browse the superhero dataset in a terminal table");
    println!("  --config <path>            Use a specific config path");
    println!("  --print-config-path        Print resolved config path");
    println!("  --print-example-config     Print a config template");
    println!("  --demo                     Use a generated dataset instead of the network");
    println!("  --check                    Validate config and fetch the dataset, then exit");
    println!("  --dump                     Print the current page as text instead of the TUI");
    println!("  --filter <column>=<query>  Start with a filter applied");
    println!("  --sort <column>            Click a column header at start (repeatable)");
    println!("  --page-size <n|all>        Start with this page size");
    println!("  --page <n>                 Start on page n (clamped to the last page)");
    println!("  --help                     Show this help");
}
