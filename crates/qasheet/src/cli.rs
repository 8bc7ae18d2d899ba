use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use qasheet_catalog::{ensure_valid, verify, Catalog, Locale};
use qasheet_model::Workbook;
use serde::Serialize;

use crate::{create_testing_spreadsheet, Notifier};

#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "qasheet",
    version,
    about = "Generate the manual QA tracking workbook (summary, scenario sheets, bug list)."
)]
pub struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create or refresh the tracking workbook.
    ///
    /// An existing workbook is loaded first: the generated sheets are cleared
    /// and rewritten, any other sheet is kept.
    Generate {
        /// Workbook to create or update.
        #[arg(long, short, value_name = "PATH", default_value = "qa-testing.xlsx")]
        output: PathBuf,

        /// Language of the catalog and every fixed label.
        #[arg(long, default_value_t = Locale::En)]
        locale: Locale,

        /// Scenario catalog JSON to use instead of the built-in one.
        #[arg(long, value_name = "JSON")]
        catalog: Option<PathBuf>,

        /// Ignore an existing workbook at `--output` and start empty.
        #[arg(long)]
        fresh: bool,
    },
    /// Verify catalog numbering and declared totals.
    Check {
        #[arg(long, default_value_t = Locale::En)]
        locale: Locale,

        #[arg(long, value_name = "JSON")]
        catalog: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the sheets of a workbook.
    Inspect {
        path: PathBuf,

        /// `text` lists sheets and row counts; `json` dumps the workbook model.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Prints the completion message on a line of its own.
///
/// Write failures are logged; they never fail the run.
struct LineNotifier<W> {
    out: W,
}

impl<W: Write> LineNotifier<W> {
    fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Notifier for LineNotifier<W> {
    fn alert(&mut self, message: &str) {
        if let Err(err) = write_line(&mut self.out, message) {
            log::warn!("could not print completion message `{message}`: {err}");
        }
    }
}

#[derive(Serialize)]
struct CheckReport<'a> {
    locale: Locale,
    sections: usize,
    scenarios: usize,
    issues: &'a [qasheet_catalog::CatalogIssue],
}

pub fn run() -> Result<()> {
    run_with_args(Args::parse())
}

pub fn run_with_args(args: Args) -> Result<()> {
    match args.command {
        Command::Generate {
            output,
            locale,
            catalog,
            fresh,
        } => generate(&output, locale, catalog.as_deref(), fresh),
        Command::Check {
            locale,
            catalog,
            format,
        } => check(locale, catalog.as_deref(), format),
        Command::Inspect { path, format } => inspect(&path, format),
    }
}

fn load_catalog(locale: Locale, path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => {
            let catalog = Catalog::from_path(path)?;
            if catalog.locale != locale {
                log::warn!(
                    "catalog {} is tagged `{}` but labels are `{locale}`",
                    path.display(),
                    catalog.locale
                );
            }
            Ok(catalog)
        }
        None => Catalog::builtin(locale).context("built-in catalog failed to load"),
    }
}

fn generate(output: &Path, locale: Locale, catalog: Option<&Path>, fresh: bool) -> Result<()> {
    let catalog = load_catalog(locale, catalog)?;
    ensure_valid(&catalog).context("refusing to generate from an inconsistent catalog")?;

    let mut workbook = if !fresh && output.exists() {
        qasheet_xlsx::load_workbook(output)
            .with_context(|| format!("failed to load existing workbook {}", output.display()))?
    } else {
        Workbook::new()
    };

    let mut notifier = LineNotifier::new(io::stdout());
    let report =
        create_testing_spreadsheet(&mut workbook, &catalog, locale.labels(), &mut notifier)?;
    for sheet in report.sheets() {
        log::info!("{}: {} row(s)", sheet.name, sheet.rows);
    }

    qasheet_xlsx::save_workbook(output, &workbook)
        .with_context(|| format!("failed to save {}", output.display()))?;
    Ok(())
}

fn check(locale: Locale, path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let catalog = load_catalog(locale, path)?;
    let issues = verify(&catalog);

    match format {
        OutputFormat::Text => {
            if issues.is_empty() {
                print_line(&format!(
                    "OK: {} section(s), {} scenario(s), declared total {}",
                    catalog.sections.len(),
                    catalog.scenario_count(),
                    catalog.total
                ))?;
            }
            for issue in &issues {
                print_line(&format!("issue: {issue}"))?;
            }
        }
        OutputFormat::Json => {
            let report = CheckReport {
                locale: catalog.locale,
                sections: catalog.sections.len(),
                scenarios: catalog.scenario_count(),
                issues: &issues,
            };
            print_line(&serde_json::to_string(&report)?)?;
        }
    }

    if !issues.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

fn inspect(path: &Path, format: OutputFormat) -> Result<()> {
    let workbook = qasheet_xlsx::load_workbook(path)
        .with_context(|| format!("failed to load {}", path.display()))?;

    match format {
        OutputFormat::Text => {
            for sheet in &workbook.sheets {
                let rows = sheet.used_range().map_or(0, |r| r.end.row + 1);
                print_line(&format!("{}\t{rows}", sheet.name))?;
            }
        }
        OutputFormat::Json => {
            print_line(&serde_json::to_string(&workbook)?)?;
        }
    }
    Ok(())
}

/// Write one line to stdout; a closed pipe (`qasheet inspect | head`) is not
/// an error.
fn print_line(line: &str) -> Result<()> {
    Ok(write_line(&mut io::stdout().lock(), line)?)
}

/// `writeln!`, treating a closed pipe (`qasheet ... | head`) as success.
fn write_line(out: &mut impl Write, line: &str) -> io::Result<()> {
    match writeln!(out, "{line}") {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingWriter(io::ErrorKind);

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(self.0, "write refused"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn notifier_prints_the_message_on_its_own_line() {
        let mut notifier = LineNotifier::new(Vec::new());
        notifier.alert("✅ Spreadsheet created!");
        assert_eq!(notifier.out, "✅ Spreadsheet created!\n".as_bytes());
    }

    #[test]
    fn closed_pipe_is_not_a_write_failure() {
        let err = write_line(&mut FailingWriter(io::ErrorKind::PermissionDenied), "done")
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        write_line(&mut FailingWriter(io::ErrorKind::BrokenPipe), "done").unwrap();
    }

    #[test]
    fn notifier_survives_an_unwritable_output() {
        let mut notifier = LineNotifier::new(FailingWriter(io::ErrorKind::PermissionDenied));
        notifier.alert("done");
        notifier.alert("done again");
    }
}
