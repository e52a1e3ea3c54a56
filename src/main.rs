// reset; cargo run -- --file ./data/Cursos.xlsx --direccion FINANZAS
// reset; cargo run -- --file ./data/Reporte_Plataforma.xlsx --auto-header --direccion "Finanzas" --keywords seguridad,pci --export ./out/

use anyhow::{anyhow, Context};
use clap::Parser;
use compliance_lib::report::suggested_file_name;
use compliance_lib::utils::write_error_to_log;
use compliance_lib::workbook::DEFAULT_SKIP_ROWS;
use compliance_lib::{
    export_detail_csv, CanonicalField, ColumnResolution, CourseFilter, HeaderDetection,
};
use compliance_report::{
    model::{IngestionMode, ReportRun},
    utils::render_report,
    ERRORS_LOG_FILE,
};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "compliance-report")]
#[command(about = "Pending training courses per direction from a learning-platform Excel export")]
#[command(version)]
struct Args {
    /// Path to the Excel export (xlsx, xls or ods)
    #[arg(long)]
    file: PathBuf,

    /// Sheet to read (defaults to the first sheet)
    #[arg(long)]
    sheet: Option<String>,

    /// Rows above the header in the fixed-layout export
    #[arg(long, default_value_t = DEFAULT_SKIP_ROWS)]
    skiprows: usize,

    /// Detect the header row and map columns by name instead of using the fixed layout
    #[arg(long)]
    auto_header: bool,

    /// Direction to report on (case and accents are ignored)
    #[arg(long)]
    direccion: String,

    /// Exact course names to keep
    #[arg(long, num_args = 1.., conflicts_with = "keywords")]
    courses: Vec<String>,

    /// Comma separated keywords; courses containing any of them are kept
    #[arg(long)]
    keywords: Option<String>,

    /// Column for a field the automatic mapping missed, as FIELD=LABEL (empty LABEL: the file has no such column)
    #[arg(long = "column", value_name = "FIELD=LABEL")]
    columns: Vec<String>,

    /// Write the dashboard workbook here (a directory gets the suggested file name)
    #[arg(long)]
    export: Option<PathBuf>,

    /// Write the pending detail listing as CSV
    #[arg(long)]
    detail_csv: Option<PathBuf>,

    /// Print the summary as JSON instead of text tables
    #[arg(long)]
    json: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let arguments = Args::parse();
    init_logging(arguments.verbose);

    if let Err(e) = run(&arguments) {
        write_error_to_log("Report Error", &format!("{e:#}"));
        eprintln!("❌ Report failed with error: {e:#}");
        eprintln!("❌ Check {} for details.", ERRORS_LOG_FILE);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(arguments: &Args) -> anyhow::Result<()> {
    let report_run = build_report_run(arguments)?;
    let outcome = report_run
        .execute()
        .with_context(|| format!("Failed to build the report from {}", arguments.file.display()))?;

    if arguments.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", render_report(&outcome));
        if outcome.records.is_empty() {
            eprintln!(
                "❌ No records for direction \"{}\". Directions in the file: {}",
                outcome.direction,
                outcome.available_directions.join(", ")
            );
        }
    }

    if let Some(export) = &arguments.export {
        let path = if export.is_dir() {
            export.join(suggested_file_name(&outcome.direction))
        } else {
            export.clone()
        };
        outcome
            .dashboard()
            .save(&path)
            .with_context(|| format!("Failed to write dashboard {}", path.display()))?;
        eprintln!("✅ Dashboard written: {}", path.display());
    }

    if let Some(csv_path) = &arguments.detail_csv {
        export_detail_csv(&outcome.pending_detail(), csv_path)
            .with_context(|| format!("Failed to write detail CSV {}", csv_path.display()))?;
        eprintln!("✅ Pending detail CSV written: {}", csv_path.display());
    }

    Ok(())
}

fn build_report_run(arguments: &Args) -> anyhow::Result<ReportRun> {
    let mode = if arguments.auto_header {
        IngestionMode::AutoHeader(HeaderDetection::default())
    } else {
        IngestionMode::FixedOffset(arguments.skiprows)
    };

    let course_filter = match &arguments.keywords {
        Some(keywords) => CourseFilter::keywords_from_csv(keywords),
        None if !arguments.courses.is_empty() => CourseFilter::Exact(arguments.courses.clone()),
        None => CourseFilter::All,
    };

    let resolutions = arguments
        .columns
        .iter()
        .map(|column| parse_resolution(column))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(ReportRun::new(&arguments.file, &arguments.direccion)
        .sheet(arguments.sheet.clone())
        .mode(mode)
        .course_filter(course_filter)
        .resolutions(resolutions))
}

fn parse_resolution(value: &str) -> anyhow::Result<(CanonicalField, ColumnResolution)> {
    let (field, label) = value
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected FIELD=LABEL, got '{value}'"))?;
    let field = CanonicalField::from_label(field)
        .ok_or_else(|| anyhow!("Unknown field '{field}' in '{value}'"))?;

    let label = label.trim();
    if label.is_empty() {
        return Ok((field, ColumnResolution::DoesNotExist));
    }
    return Ok((field, ColumnResolution::Column(label.to_string())));
}
