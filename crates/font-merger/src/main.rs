use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use fontmeld::{FinalMetadata, MergeOptions, Merger, ScaleConfig};

#[derive(Parser)]
#[command(name = "fontmeld")]
#[command(about = "Merge several fonts into one; the first font's glyphs win", long_about = None)]
struct Cli {
    /// Font files to merge, base font first
    #[arg(required = true)]
    input_files: Vec<PathBuf>,

    /// Output font file
    #[arg(short, long, default_value = "merged.ttf")]
    output: PathBuf,

    /// Rescale a source before merging: FILE scales to the base font's
    /// units per em, FILE=UPEM to an explicit value
    #[arg(long = "scale", value_name = "FILE[=UPEM]", value_parser = parse_scale)]
    scale: Vec<(String, ScaleConfig)>,

    /// Full font name (name ID 4); enables the other naming options
    #[arg(long)]
    full_name: Option<String>,

    /// Family name (name ID 1), defaults to the full name
    #[arg(long)]
    family_name: Option<String>,

    /// Style name (name ID 2)
    #[arg(long)]
    style_name: Option<String>,

    /// Version string (name ID 5)
    #[arg(long = "font-version")]
    version: Option<String>,

    /// Fail when the merged font does not survive a save/load round trip
    #[arg(long)]
    strict_validation: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_scale(s: &str) -> Result<(String, ScaleConfig), String> {
    match s.split_once('=') {
        None => Ok((s.to_string(), ScaleConfig::to_base())),
        Some((file, upem)) => {
            let target: u16 = upem
                .parse()
                .map_err(|_| format!("Invalid units per em '{upem}' for '{file}'"))?;
            if target == 0 {
                return Err(format!("Units per em for '{file}' must be positive"));
            }
            Ok((file.to_string(), ScaleConfig::to_units_per_em(target)))
        }
    }
}

impl Cli {
    fn options(&self) -> MergeOptions {
        let mut metadata = FinalMetadata::new();
        metadata.full_name = self.full_name.clone();
        metadata.family_name = self.family_name.clone();
        metadata.style_name = self.style_name.clone();
        metadata.version = self.version.clone();

        MergeOptions::new()
            .scale_all(self.scale.iter().cloned())
            .metadata(metadata)
            .strict_validation(self.strict_validation)
    }
}

fn run(cli: &Cli) -> Result<()> {
    let merger = Merger::new(cli.options());
    let mut stderr = io::stderr();

    merger
        .run(&cli.input_files, &cli.output, |percent| {
            let _ = write!(stderr, "\r{percent:>3}%");
            let _ = stderr.flush();
        })
        .with_context(|| format!("Could not create {}", cli.output.display()))?;

    eprintln!();
    println!("{}", cli.output.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!();
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scale() {
        assert_eq!(parse_scale("cjk.ttf").unwrap(), ("cjk.ttf".into(), ScaleConfig::to_base()));
        assert_eq!(
            parse_scale("cjk.ttf=2048").unwrap(),
            ("cjk.ttf".into(), ScaleConfig::to_units_per_em(2048))
        );
        assert!(parse_scale("cjk.ttf=0").is_err());
        assert!(parse_scale("cjk.ttf=big").is_err());
    }

    #[test]
    fn test_cli_builds_options() {
        let cli = Cli::parse_from([
            "fontmeld",
            "a.ttf",
            "fonts/b.ttf",
            "--scale",
            "fonts/b.ttf=1000",
            "--full-name",
            "Meld Sans",
            "--strict-validation",
        ]);
        let options = cli.options();

        assert_eq!(cli.output, PathBuf::from("merged.ttf"));
        assert_eq!(
            options.scale_for("b.ttf".as_ref()),
            Some(ScaleConfig::to_units_per_em(1000))
        );
        assert_eq!(options.metadata.full_name.as_deref(), Some("Meld Sans"));
        assert!(options.strict_validation);
    }
}
