//! Upload files from the command line.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use inquire::Confirm;
use pagecraft_uploader::{
    BeforeUpload, FileRecord, ListType, PickerAdapter, PickerEvent, RawFile, Transport,
    UploadQueue, UploadStatus, UploaderConfig,
};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::instrument;

use crate::cli::UploadArgs;
use crate::output::Output;

/// One row of the summary table.
#[derive(Debug, Clone, Tabled)]
pub struct ReportRow {
    #[tabled(rename = "File")]
    pub name: String,
    #[tabled(rename = "Size")]
    pub size: String,
    /// Time of day (UTC) the file joined the queue.
    #[tabled(rename = "Added")]
    pub added: String,
    #[tabled(rename = "Status")]
    pub status: UploadStatus,
    #[tabled(rename = "URL / Error")]
    pub detail: String,
}

impl From<&FileRecord> for ReportRow {
    fn from(record: &FileRecord) -> Self {
        let detail = match record.status() {
            UploadStatus::Success => record.uploaded_url().unwrap_or("-").to_owned(),
            UploadStatus::Error => record.error().unwrap_or("upload failed").to_owned(),
            UploadStatus::Ready | UploadStatus::Loading => "-".to_owned(),
        };

        Self {
            name: record.name().to_owned(),
            size: format_size(record.size() as u64),
            added: record.added_at().format("%H:%M:%S").to_string(),
            status: record.status(),
            detail,
        }
    }
}

/// What happened to the files of one `upload` run.
#[derive(Debug, Default)]
pub struct UploadReport {
    pub rows: Vec<ReportRow>,
    /// Files dropped by `--max-size` / `--accept`.
    pub skipped: usize,
    /// The wait ended before every transfer finished.
    pub timed_out: bool,
    /// The manual-mode confirmation was declined.
    pub cancelled: bool,
}

impl UploadReport {
    pub fn count(&self, status: UploadStatus) -> usize {
        self.rows.iter().filter(|r| r.status == status).count()
    }

    /// No record failed and nothing was left hanging.
    pub fn is_success(&self) -> bool {
        !self.timed_out && self.count(UploadStatus::Error) == 0
    }
}

/// Run the upload command over HTTP.
pub async fn run_upload(args: UploadArgs) -> Result<UploadReport> {
    run_upload_with(args, Arc::new(pagecraft_uploader::HttpTransport::new())).await
}

/// Run the upload command with a custom transport.
///
/// Per-file failures end up in the report. Unreadable inputs, queue setup and a
/// broken confirmation prompt fail the whole command.
#[instrument(skip_all, name = "upload", fields(file_count = args.files.len(), manual = args.manual))]
pub async fn run_upload_with(
    args: UploadArgs,
    transport: Arc<dyn Transport>,
) -> Result<UploadReport> {
    let out = Output::new();

    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let file = RawFile::from_path(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        files.push(file);
    }

    let config = build_config(&args);
    let mut queue = UploadQueue::new(config, transport).context("Failed to start upload queue")?;
    let limit = Duration::from_secs(args.timeout);

    let summary = queue.ingest(&mut PickerAdapter, PickerEvent::Change(files));
    let mut report = UploadReport {
        skipped: summary.rejected,
        ..UploadReport::default()
    };

    if args.manual {
        queue.settle_for(limit).await;

        let ready = queue
            .records()
            .iter()
            .filter(|r| r.status() == UploadStatus::Ready)
            .count();
        if ready == 0 {
            out.warning("No files left to upload");
            return Ok(finish(&out, &queue, report));
        }

        out.header(format!("Ready to upload to {}", args.action));
        for record in queue.records() {
            out.file_item(record.name(), format_size(record.size() as u64));
        }
        out.count("Queued", ready);

        if !args.yes && !confirm(ready)? {
            out.warning("Upload cancelled");
            report.cancelled = true;
            return Ok(finish(&out, &queue, report));
        }

        queue.trigger_all();
    } else {
        out.info(format!(
            "Uploading {} file(s) to {}",
            queue.len() + summary.deferred,
            args.action
        ));
    }

    if !queue.settle_for(limit).await {
        out.error(format!(
            "Timed out after {}s with {} upload(s) still pending",
            args.timeout,
            queue.pending()
        ));
        report.timed_out = true;
    }

    Ok(finish(&out, &queue, report))
}

/// Translates the flags into a queue configuration.
pub fn build_config(args: &UploadArgs) -> UploaderConfig {
    let list_type = if args.picture {
        ListType::Picture
    } else {
        ListType::Text
    };
    let config = UploaderConfig::new(args.action.clone())
        .auto_upload(!args.manual)
        .list_type(list_type)
        .field_name(args.field_name.clone());

    match file_filter(args.max_size, &args.accept) {
        Some(hook) => config.before_upload(hook),
        None => config,
    }
}

/// `--max-size` and `--accept` as one synchronous before-upload hook.
pub fn file_filter(max_size: Option<u64>, accept: &[String]) -> Option<BeforeUpload> {
    let accept: Vec<String> = accept
        .iter()
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect();

    if max_size.is_none() && accept.is_empty() {
        return None;
    }

    Some(BeforeUpload::check(move |file| {
        match rejection(file, max_size, &accept) {
            Some(reason) => {
                Output::new().warning(format!("Skipping {}: {reason}", file.name()));
                false
            }
            None => true,
        }
    }))
}

/// Why a file does not pass the filter, if it doesn't.
fn rejection(file: &RawFile, max_size: Option<u64>, accept: &[String]) -> Option<String> {
    if let Some(max) = max_size
        && file.size() as u64 > max
    {
        return Some(format!(
            "{} exceeds the {} limit",
            format_size(file.size() as u64),
            format_size(max)
        ));
    }

    if !accept.is_empty() {
        let allowed = file
            .extension()
            .is_some_and(|ext| accept.iter().any(|a| *a == ext));
        if !allowed {
            return Some(format!("type not accepted (allowed: {})", accept.join(", ")));
        }
    }

    None
}

fn confirm(count: usize) -> Result<bool> {
    Confirm::new(&format!("Upload {count} file(s)?"))
        .with_default(true)
        .prompt()
        .context("Failed to read confirmation")
}

fn finish(out: &Output, queue: &UploadQueue, mut report: UploadReport) -> UploadReport {
    report.rows = queue.records().iter().map(ReportRow::from).collect();
    print_report(out, &report);
    report
}

fn print_report(out: &Output, report: &UploadReport) {
    if !report.rows.is_empty() {
        let mut table = Table::new(&report.rows);
        table.with(Style::rounded());
        out.newline();
        out.print(table.to_string());
    }

    let uploaded = report.count(UploadStatus::Success);
    let failed = report.count(UploadStatus::Error);
    if uploaded > 0 {
        out.success(format!("Uploaded {uploaded} file(s)"));
    }
    if failed > 0 {
        out.error(format!("{failed} upload(s) failed"));
    }
    if report.skipped > 0 {
        out.warning(format!("Skipped {} file(s)", report.skipped));
    }
}

fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;

    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}
