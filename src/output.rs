//! Output handling: format selection, leveled stderr logs, confirmation
//! prompts, and a plain width-aligned table.
//!
//! stdout carries results only; logs and prompts go to stderr so output
//! stays pipeable.

use std::fmt::Debug;
use std::io::{self, BufRead, Write};
#[cfg(test)]
use std::sync::Mutex;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::{CliError, RenderError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Fixed columns, one row per item
    Table,
    /// Pretty-printed, mirrors the API schema
    Json,
    Yaml,
}

enum Sink {
    Stdout,
    #[cfg(test)]
    Buffer(Mutex<Vec<u8>>),
}

/// Output handler passed to every command.
pub struct Printer {
    verbose: bool,
    sink: Sink,
}

impl Printer {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            sink: Sink::Stdout,
        }
    }

    /// Printer writing to an in-memory buffer instead of stdout.
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            verbose: false,
            sink: Sink::Buffer(Mutex::new(Vec::new())),
        }
    }

    #[cfg(test)]
    pub fn captured(&self) -> String {
        match &self.sink {
            Sink::Buffer(buf) => String::from_utf8_lossy(&buf.lock().unwrap()).into_owned(),
            Sink::Stdout => String::new(),
        }
    }

    /// Result output, stdout.
    pub fn outputln(&self, line: &str) {
        match &self.sink {
            Sink::Stdout => println!("{line}"),
            #[cfg(test)]
            Sink::Buffer(buf) => {
                let _ = writeln!(buf.lock().unwrap(), "{line}");
            }
        }
    }

    /// Human log, stderr.
    pub fn warn(&self, message: &str) {
        eprintln!("[WARN] {message}");
    }

    /// Debug log, stderr, only with --verbose.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            eprintln!("[DEBUG] {message}");
        }
    }

    /// Dump of the parsed input model. Observability only, never affects
    /// the outcome of the command.
    pub fn debug_model<M: Debug>(&self, model: &M) {
        if self.verbose {
            eprintln!("[DEBUG] parsed input values: {model:?}");
        }
    }

    /// Blocks on stdin for a yes/no answer. Anything but an explicit yes
    /// aborts the invocation.
    pub fn prompt_for_confirmation(&self, prompt: &str) -> Result<(), CliError> {
        eprint!("{prompt} [y/N] ");
        let _ = io::stderr().flush();
        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .map_err(|_| CliError::Aborted)?;
        match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Ok(()),
            _ => Err(CliError::Aborted),
        }
    }
}

pub fn render_json<T: Serialize>(value: &T) -> Result<String, RenderError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn render_yaml<T: Serialize>(value: &T) -> Result<String, RenderError> {
    Ok(serde_yaml::to_string(value)?.trim_end().to_string())
}

/// Client-side truncation for --limit. The server does not take a limit
/// parameter; we keep the first entries in server order.
pub fn truncate<T>(items: &mut Vec<T>, limit: Option<i64>) {
    if let Some(limit) = limit {
        if items.len() > limit as usize {
            items.truncate(limit as usize);
        }
    }
}

/// Plain text table, columns padded to the widest cell, two spaces between
/// columns. With a header the rows get a dashed separator underneath it;
/// without one (key/value listings) rows print bare.
#[derive(Default)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_header(&mut self, columns: &[&str]) {
        self.header = columns.iter().map(|c| c.to_string()).collect();
    }

    pub fn add_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn render(&self) -> String {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain([self.header.len()])
            .max()
            .unwrap_or(0);
        let mut widths = vec![0usize; columns];
        for (i, h) in self.header.iter().enumerate() {
            widths[i] = h.len();
        }
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.len());
            }
        }

        let mut lines = Vec::new();
        if !self.header.is_empty() {
            lines.push(format_row(&self.header, &widths));
            let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            lines.push(dashes.join("  "));
        }
        for row in &self.rows {
            lines.push(format_row(row, &widths));
        }
        lines.join("\n")
    }

    pub fn display(&self, p: &Printer) {
        p.outputln(&self.render());
    }
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, &width) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        if i + 1 == widths.len() {
            line.push_str(cell);
        } else {
            line.push_str(&format!("{cell:<width$}"));
            line.push_str("  ");
        }
    }
    line.trim_end().to_string()
}
