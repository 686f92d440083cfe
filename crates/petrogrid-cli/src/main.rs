// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use petrogrid_app::{AppState, RowStore, SeedRng, generate_rows};
use runtime::MemoryRuntime;
use std::env;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use time::OffsetDateTime;

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
            "load config {}; run `petrogrid --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    if options.check_only {
        return Ok(());
    }

    let rows = options.rows.unwrap_or_else(|| config.row_count());
    let seed = options
        .seed
        .or_else(|| config.seed())
        .unwrap_or_else(clock_seed);

    let mut rng = SeedRng::new(seed);
    let dataset = generate_rows(rows, &mut rng);
    let today = OffsetDateTime::now_utc().date();
    let store = RowStore::new(dataset, today);

    let mut state = AppState {
        region: config.start_region(),
        product: config.start_product(),
        ..AppState::default()
    };

    let mut runtime = MemoryRuntime::new(store);
    petrogrid_tui::run_app(&mut state, &mut runtime)
}

/// Seed for unpinned runs; varies per launch, reproducible only via --seed.
fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(1, |elapsed| elapsed.as_nanos() as u64)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    rows: Option<usize>,
    seed: Option<u64>,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        rows: None,
        seed: None,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--rows" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--rows requires a positive count"))?;
                let rows: usize = value
                    .as_ref()
                    .parse()
                    .with_context(|| format!("--rows got {:?}, expected a count", value.as_ref()))?;
                if rows == 0 {
                    return Err(anyhow::anyhow!("--rows must be at least 1"));
                }
                options.rows = Some(rows);
            }
            "--seed" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed requires a number"))?;
                let seed: u64 = value.as_ref().parse().with_context(|| {
                    format!("--seed got {:?}, expected a non-negative number", value.as_ref())
                })?;
                options.seed = Some(seed);
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("petrogrid");
    println!("  --config <path>          Use a specific config path");
    println!("  --rows <n>               Synthetic dataset size (default from config)");
    println!("  --seed <n>               Pin the data generator for reproducible runs");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config without entering the TUI");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args};
    use anyhow::Result;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/petrogrid-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                rows: None,
                seed: None,
                print_config_path: false,
                print_example: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_reads_rows_and_seed() -> Result<()> {
        let options = parse_cli_args(
            vec!["--rows", "2500", "--seed", "42"],
            default_options_path(),
        )?;
        assert_eq!(options.rows, Some(2_500));
        assert_eq!(options.seed, Some(42));
        Ok(())
    }

    #[test]
    fn parse_cli_args_rejects_zero_rows() {
        let error = parse_cli_args(vec!["--rows", "0"], default_options_path())
            .expect_err("zero rows should fail");
        assert!(error.to_string().contains("--rows must be at least 1"));
    }

    #[test]
    fn parse_cli_args_rejects_non_numeric_rows() {
        let error = parse_cli_args(vec!["--rows", "many"], default_options_path())
            .expect_err("non-numeric rows should fail");
        assert!(error.to_string().contains("--rows"));
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));

        let error = parse_cli_args(vec!["--seed"], default_options_path())
            .expect_err("missing seed value should fail");
        assert!(error.to_string().contains("--seed requires a number"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--check"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }
}
