use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use marklint_config::Config;
use marklint_engine::{FileReport, Linter, SourceBuffer, dump, io, render, tokenize_buffer};
use std::{
    io::Write,
    path::{Path, PathBuf},
    process::ExitCode,
};

const EXIT_VIOLATIONS: u8 = 1;
const EXIT_ERROR: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Lint Markdown files.
#[derive(Debug, Parser)]
#[command(name = "marklint", version, about)]
struct Cli {
    /// Files or directories to lint
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Config file (defaults to ~/.config/marklint/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tab stop used for column arithmetic
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    tab_width: Option<u16>,

    /// Rule id or alias to disable (repeatable)
    #[arg(long = "disable", value_name = "RULE")]
    disabled: Vec<String>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print the token stream instead of linting
    #[arg(long, conflicts_with = "html")]
    tokens: bool,

    /// Print the rendered HTML instead of linting
    #[arg(long)]
    html: bool,

    /// Raise log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    let level = match verbose {
        0 => None,
        1 => Some(log::LevelFilter::Info),
        2 => Some(log::LevelFilter::Debug),
        _ => Some(log::LevelFilter::Trace),
    };
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    log::info!("Config path: {}", config_path.display());
    let loaded = Config::load_from_path(&config_path)?;
    if loaded.is_none() && cli.config.is_some() {
        anyhow::bail!("Config file not found: {}", config_path.display());
    }
    let mut config = loaded.unwrap_or_default();
    if let Some(tab_width) = cli.tab_width {
        config.tab_width = usize::from(tab_width);
    }
    config.disabled_rules.extend(cli.disabled.iter().cloned());
    Ok(config)
}

fn files_to_lint(cli: &Cli, config: &Config) -> Result<Vec<PathBuf>> {
    let ignore = config.ignore_set()?;
    let files = io::collect_markdown_files(&cli.paths)?;
    Ok(files
        .into_iter()
        .filter(|path| {
            let ignored = ignore.is_ignored(path);
            if ignored {
                log::debug!("ignoring {}", path.display());
            }
            !ignored
        })
        .collect())
}

fn write_report(out: &mut impl Write, report: &FileReport) -> Result<()> {
    for violation in &report.violations {
        writeln!(out, "{}:{violation}", report.path.display())?;
    }
    Ok(())
}

/// Prints tokens or HTML for each file. Returns whether any file failed.
fn inspect(out: &mut impl Write, cli: &Cli, config: &Config, files: &[PathBuf]) -> Result<bool> {
    let mut failed = false;
    for path in files {
        let content = match io::read_file(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("{}: {e}", path.display());
                failed = true;
                continue;
            }
        };
        let source = SourceBuffer::from_str(&content, config.tab_width);
        let tokens = tokenize_buffer(&source);
        if cli.html {
            writeln!(out, "{}", render(&tokens))?;
        } else if cli.format == Format::Json {
            writeln!(out, "{}", serde_json::to_string_pretty(&tokens)?)?;
        } else {
            if files.len() > 1 {
                writeln!(out, "==> {} <==", path.display())?;
            }
            write!(out, "{}", dump(&tokens))?;
        }
    }
    Ok(failed)
}

fn lint(out: &mut impl Write, cli: &Cli, config: &Config, files: &[PathBuf]) -> Result<ExitCode> {
    let mut linter = Linter::new(config.tab_width);
    for rule in &config.disabled_rules {
        linter
            .disable(rule)
            .with_context(|| format!("Cannot disable rule {rule:?}"))?;
    }

    let mut reports = vec![];
    let mut failed = false;
    for result in linter.lint_files(files) {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                log::warn!("{e}");
                eprintln!("{e}");
                failed = true;
            }
        }
    }

    match cli.format {
        Format::Text => {
            for report in &reports {
                write_report(out, report)?;
            }
        }
        Format::Json => writeln!(out, "{}", serde_json::to_string_pretty(&reports)?)?,
    }

    Ok(exit_code(failed, reports.iter().any(|r| !r.is_clean())))
}

fn exit_code(failed: bool, found_violations: bool) -> ExitCode {
    if failed {
        ExitCode::from(EXIT_ERROR)
    } else if found_violations {
        ExitCode::from(EXIT_VIOLATIONS)
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: &Cli, out: &mut impl Write) -> Result<ExitCode> {
    let config = load_config(cli)?;
    let files = files_to_lint(cli, &config)?;
    log::info!("{} file(s) to process", files.len());

    if cli.tokens || cli.html {
        let failed = inspect(out, cli, &config, &files)?;
        return Ok(exit_code(failed, false));
    }
    lint(out, cli, &config, &files)
}

fn display_cwd_relative(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| io::relative_to(&cwd, path))
        .map_or_else(|| path.display().to_string(), |relative| relative.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    log::debug!(
        "linting {}",
        cli.paths
            .iter()
            .map(|p| display_cwd_relative(p))
            .collect::<Vec<_>>()
            .join(", ")
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run(&cli, &mut out) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
