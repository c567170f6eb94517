//! Interactive application: folder selection, background processing, table,
//! log and CSV export driven from a prompt.

use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use invex_core::{
    BatchReport, ExtractionSession, InvexError, InvoiceExtractor, ProcessingWorker, WorkerEvent,
};

use crate::view::{self, Level};

/// A line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Select a folder; without a path the next line is read as the folder.
    Folder(Option<PathBuf>),
    Process,
    Table,
    Log,
    Export(Option<PathBuf>),
    Clear,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let argument = unquote(rest).map(PathBuf::from);

        match verb.to_lowercase().as_str() {
            "folder" | "open" => Ok(Command::Folder(argument)),
            "process" | "run" => Ok(Command::Process),
            "table" | "show" => Ok(Command::Table),
            "log" | "logs" => Ok(Command::Log),
            "export" | "save" => Ok(Command::Export(argument)),
            "clear" => Ok(Command::Clear),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(format!("Unknown command '{}'. Type 'help' for a list of commands.", other)),
        }
    }
}

/// Argument with surrounding quotes removed; `None` when empty.
fn unquote(arg: &str) -> Option<&str> {
    let arg = arg
        .strip_prefix('"')
        .and_then(|a| a.strip_suffix('"'))
        .or_else(|| arg.strip_prefix('\'').and_then(|a| a.strip_suffix('\'')))
        .unwrap_or(arg)
        .trim();
    (!arg.is_empty()).then_some(arg)
}

/// Whether the loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Everything the window shows, plus the running worker if any.
struct App {
    session: ExtractionSession,
    default_export: PathBuf,
    log: Vec<String>,
    worker: Option<ProcessingWorker>,
    progress: Option<ProgressBar>,
    awaiting_folder: bool,
}

impl App {
    fn new(extractor: Arc<dyn InvoiceExtractor>, file_name_column: &str, default_export: PathBuf) -> Self {
        Self {
            session: ExtractionSession::new(extractor, file_name_column),
            default_export,
            log: Vec::new(),
            worker: None,
            progress: None,
            awaiting_folder: false,
        }
    }

    fn is_processing(&self) -> bool {
        self.worker.is_some()
    }

    /// Print above the progress bar while one is shown.
    fn print(&self, text: impl AsRef<str>) {
        match &self.progress {
            Some(pb) => pb.suspend(|| println!("{}", text.as_ref())),
            None => println!("{}", text.as_ref()),
        }
    }

    fn add_log(&mut self, line: impl Into<String>) {
        let line = line.into();
        self.print(&line);
        self.log.push(line);
    }

    fn clear_log(&mut self) {
        self.log.clear();
    }

    fn prompt(&self) {
        // The progress bar stands in for the prompt while processing
        if self.progress.is_some() {
            return;
        }
        let marker = if self.awaiting_folder {
            style("folder path>").cyan()
        } else {
            style("invex>").cyan()
        };
        print!("{} ", marker);
        let _ = std::io::stdout().flush();
    }

    fn render(&self) {
        let folder = self.session.folder().map(|p| p.display().to_string());
        println!("{}", view::header(folder.as_deref()));
        println!();
        println!("{}", view::table(self.session.table()));
        println!();
        println!("{}", view::log(&self.log));
        println!();
        println!("Type 'help' for commands.");
    }

    fn handle_line(&mut self, line: &str) -> Flow {
        if self.awaiting_folder {
            self.awaiting_folder = false;
            // An empty answer cancels the selection
            if let Some(path) = unquote(line.trim()) {
                self.select_folder(PathBuf::from(path));
            }
            return Flow::Continue;
        }

        if line.trim().is_empty() {
            return Flow::Continue;
        }

        match line.parse::<Command>() {
            Ok(command) => self.execute(command),
            Err(message) => {
                self.print(style(message).red().to_string());
                Flow::Continue
            }
        }
    }

    fn execute(&mut self, command: Command) -> Flow {
        debug!("Command: {:?}", command);

        let refused = matches!(
            command,
            Command::Folder(_) | Command::Process | Command::Export(_)
        );
        if refused && self.is_processing() {
            self.print(view::message(
                Level::Warning,
                "Processing",
                "Invoices are still being processed. Wait for processing to finish.",
            ));
            return Flow::Continue;
        }

        match command {
            Command::Folder(Some(path)) => self.select_folder(path),
            Command::Folder(None) => {
                self.awaiting_folder = true;
                self.print("Enter the folder with invoice PDFs (empty to cancel):");
            }
            Command::Process => self.start_processing(),
            Command::Table => self.print(view::table(self.session.table())),
            Command::Log => self.print(view::log(&self.log)),
            Command::Export(path) => {
                let path = path.unwrap_or_else(|| self.default_export.clone());
                self.export(path);
            }
            Command::Clear => {
                self.clear_log();
                self.print("Log cleared.");
            }
            Command::Help => self.print(self.help_text()),
            Command::Quit => return Flow::Quit,
        }

        Flow::Continue
    }

    fn help_text(&self) -> String {
        view::help(&self.default_export.display().to_string())
    }

    fn select_folder(&mut self, path: PathBuf) {
        if !path.is_dir() {
            let error = InvexError::FolderNotFound(path);
            self.print(view::message(Level::Error, "Invalid Folder", &error.to_string()));
            return;
        }

        self.clear_log();
        self.add_log(format!("Folder selected: {}", path.display()));
        self.session.set_folder(path);
    }

    fn start_processing(&mut self) {
        let Some(folder) = self.session.folder().map(PathBuf::from) else {
            self.print(view::message(
                Level::Warning,
                "No Folder Selected",
                "Select a folder first with 'folder <path>'.",
            ));
            return;
        };

        self.clear_log();
        self.add_log("Starting invoice processing...");

        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        self.progress = Some(pb);
        self.worker = Some(ProcessingWorker::spawn(folder, self.session.extractor()));
    }

    fn on_worker_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Log(line) => self.add_log(line),
            WorkerEvent::Row(row) => debug!("Row ready: {}", row.file_name),
            WorkerEvent::Progress { done, total } => {
                if let Some(pb) = &self.progress {
                    pb.set_length(total as u64);
                    pb.set_position(done as u64);
                }
            }
            WorkerEvent::Finished(report) => {
                self.stop_processing();
                self.on_complete(report);
            }
            WorkerEvent::Failed(message) => {
                self.stop_processing();
                self.print(view::message(Level::Error, "Processing Failed", &message));
            }
        }
    }

    fn stop_processing(&mut self) {
        if let Some(pb) = self.progress.take() {
            pb.finish_and_clear();
        }
        self.worker = None;
    }

    fn on_complete(&mut self, report: BatchReport) {
        let count = report.rows.len();
        self.session.set_rows(report.rows);

        if count > 0 {
            self.print(view::table(self.session.table()));
            self.add_log(format!("✓ Successfully extracted data from {} invoice(s)", count));
        } else {
            self.add_log("⚠ No data extracted");
            self.print(view::message(
                Level::Warning,
                "No Data",
                "No invoices were successfully processed. Check the logs for details.",
            ));
        }
    }

    fn export(&mut self, path: PathBuf) {
        let mut lines = Vec::new();
        let result = self.session.export_csv(&path, &mut |line| lines.push(line));
        for line in lines {
            self.add_log(line);
        }

        match result {
            Ok(()) => self.print(view::message(
                Level::Info,
                "Export Successful",
                &format!("Data exported successfully to:\n{}", path.display()),
            )),
            Err(_) => self.print(view::message(
                Level::Warning,
                "Export Failed",
                "Failed to export CSV file. Check the logs for details.",
            )),
        }
    }
}

/// Next event of the running worker; pending forever when idle.
///
/// A worker that goes away without a final event counts as failed, so the
/// window always returns to idle.
async fn next_event(worker: &mut Option<ProcessingWorker>) -> WorkerEvent {
    match worker {
        Some(worker) => worker
            .next_event()
            .await
            .unwrap_or_else(|| WorkerEvent::Failed("Processing stopped unexpectedly.".to_string())),
        None => std::future::pending().await,
    }
}

pub async fn run(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let file_name_column = config.export.file_name_column.clone();
    let default_export = PathBuf::from(&config.export.default_file_name);
    let extractor = super::build_extractor(config)?;

    let mut app = App::new(extractor, &file_name_column, default_export);
    app.render();
    app.prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if app.handle_line(&line) == Flow::Quit {
                    break;
                }
                app.prompt();
            }
            event = next_event(&mut app.worker) => {
                let done = matches!(event, WorkerEvent::Finished(_) | WorkerEvent::Failed(_));
                app.on_worker_event(event);
                if done {
                    app.prompt();
                }
            }
        }
    }

    if let Some(worker) = app.worker.take() {
        // Let the current run finish so no file is left half-read
        if let Some(pb) = app.progress.take() {
            pb.finish_and_clear();
        }
        println!("Waiting for processing to finish...");
        if let Err(message) = worker.join().await {
            println!("{}", style(message).red());
        }
    }

    Ok(())
}
