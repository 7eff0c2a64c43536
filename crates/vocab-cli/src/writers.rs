//! Output writers, selected by name at argument-parsing time.

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use std::io::Write;

use vocab_resolver::{ResolutionOutput, Severity};

pub trait RecordWriter {
    fn write(&self, output: &ResolutionOutput, out: &mut dyn Write) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Whole run (records + diagnostics) as one pretty JSON document.
    Json,
    /// One record per line.
    Jsonl,
    /// Human-readable overview.
    Summary,
}

impl OutputFormat {
    pub fn writer(self) -> Box<dyn RecordWriter> {
        match self {
            OutputFormat::Json => Box::new(JsonWriter),
            OutputFormat::Jsonl => Box::new(JsonLinesWriter),
            OutputFormat::Summary => Box::new(SummaryWriter),
        }
    }
}

struct JsonWriter;

impl RecordWriter for JsonWriter {
    fn write(&self, output: &ResolutionOutput, out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, output)?;
        writeln!(out)?;
        Ok(())
    }
}

struct JsonLinesWriter;

impl RecordWriter for JsonLinesWriter {
    fn write(&self, output: &ResolutionOutput, out: &mut dyn Write) -> Result<()> {
        for record in &output.records {
            serde_json::to_writer(&mut *out, record)?;
            writeln!(out)?;
        }
        Ok(())
    }
}

struct SummaryWriter;

impl RecordWriter for SummaryWriter {
    fn write(&self, output: &ResolutionOutput, out: &mut dyn Write) -> Result<()> {
        writeln!(
            out,
            "{} {} ({})",
            "Document".bold(),
            output.document_url,
            output.language
        )?;
        for record in &output.records {
            let label = record
                .docs()
                .label
                .as_ref()
                .map(|l| l.value.as_str())
                .unwrap_or("-");
            writeln!(out, "  {:?} {} {}", record.kind(), record.id(), label.dimmed())?;
            for parent in record.parents() {
                writeln!(out, "    <: {} ({:?})", parent.id, parent.via)?;
            }
        }
        for d in &output.diagnostics {
            let tag = match d.severity {
                Severity::Error => "error".red().bold(),
                Severity::Warning => "warning".yellow().bold(),
            };
            writeln!(out, "{tag}: {}", d.message)?;
        }
        writeln!(
            out,
            "{} records, {} errors, {} warnings",
            output.records.len(),
            output.error_count(),
            output.warning_count()
        )?;
        Ok(())
    }
}
