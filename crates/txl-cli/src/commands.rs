use std::io::Read;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use txl_extract::{Extraction, UnionExtractor};
use txl_ledger::{BoundedLedger, LedgerReader, LedgerWriter};
use txl_server::{ServerConfig, TxlServer};
use txl_types::{ExtractedField, ExtractionMode, LedgerSnapshot};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Extract(args) => cmd_extract(args, &cli.format),
        Command::Replay(args) => cmd_replay(args, &cli.format),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    let server = TxlServer::new(config)?;
    tracing::debug!(
        expected_fields = ?server.config().expected_fields,
        max_payload_bytes = server.config().max_payload_bytes,
        "server configured"
    );
    println!(
        "{} TXL server on {} (history: {})",
        "✓".green().bold(),
        server.config().bind_addr.to_string().bold(),
        server.config().history_capacity
    );
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_extract(args: ExtractArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let payload = read_payload(args.file.as_deref())?;
    let extraction = UnionExtractor::with_expected_fields(args.expect).extract(&payload);
    tracing::debug!(
        bytes = payload.len(),
        pass = ?extraction.summary.pass,
        mode = %extraction.summary.mode(),
        "payload extracted"
    );

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&extraction)?),
        OutputFormat::Text => print_extraction(&extraction),
    }
    Ok(())
}

fn cmd_replay(args: ReplayArgs, format: &OutputFormat) -> anyhow::Result<()> {
    anyhow::ensure!(args.capacity > 0, "capacity must be at least 1");
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let snapshot = replay(&text, args.capacity, args.expect)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        OutputFormat::Text => print_snapshot(&snapshot),
    }
    Ok(())
}

/// Read a payload from a file, or from stdin when no file is given.
pub fn read_payload(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            Ok(buf)
        }
    }
}

/// Run every non-empty line through a fresh extractor and ledger.
pub fn replay(text: &str, capacity: usize, expect: Vec<String>) -> anyhow::Result<LedgerSnapshot> {
    let extractor = UnionExtractor::with_expected_fields(expect);
    let ledger = BoundedLedger::with_capacity(capacity);

    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let extraction = extractor.extract(line);
        let record = ledger.append(line.to_string(), extraction.into_fields())?;
        tracing::debug!(
            line = lineno + 1,
            sequence = record.sequence(),
            mode = %record.mode(),
            "replayed payload"
        );
    }

    let snapshot = ledger.snapshot()?;
    tracing::info!(
        total = snapshot.stats.total_received,
        structural = snapshot.stats.structural_count,
        fallback = snapshot.stats.fallback_count,
        failed_fields = snapshot.stats.failed_field_count,
        "replay finished"
    );
    Ok(snapshot)
}

fn mode_label(mode: ExtractionMode) -> colored::ColoredString {
    match mode {
        ExtractionMode::Structural => "structural".green(),
        ExtractionMode::Fallback => "fallback".yellow(),
        ExtractionMode::Failed => "failed".red(),
    }
}

fn print_field(field: &ExtractedField) {
    let value = match field.value() {
        Some(v) => v.to_string(),
        None => "<none>".dimmed().to_string(),
    };
    println!("  {:<24} {} ({})", field.name().bold(), value, mode_label(field.mode()));
}

fn print_extraction(extraction: &Extraction) {
    let s = &extraction.summary;
    println!(
        "{} {} fields via {:?} pass: {} structural, {} fallback, {} failed",
        "→".cyan(),
        s.total(),
        s.pass,
        s.structural,
        s.fallback,
        s.failed
    );
    for field in &extraction.fields {
        print_field(field);
    }
}

fn print_snapshot(snapshot: &LedgerSnapshot) {
    let stats = &snapshot.stats;
    println!(
        "Received: {}  structural: {}  fallback: {}  failed fields: {}",
        stats.total_received.to_string().bold(),
        stats.structural_count.to_string().green(),
        stats.fallback_count.to_string().yellow(),
        stats.failed_field_count.to_string().red()
    );
    println!(
        "History: {}/{} (last sequence {})",
        snapshot.history.len(),
        snapshot.capacity,
        snapshot.last_sequence
    );
    for record in &snapshot.history {
        println!(
            "{} {} ({})",
            format!("tx#{}", record.sequence()).yellow().bold(),
            record.received_at().to_rfc3339().dimmed(),
            mode_label(record.mode())
        );
        for field in record.fields() {
            print_field(field);
        }
    }
}
