mod report_run;

pub use report_run::{IngestionMode, ReportOutcome, ReportRun};
