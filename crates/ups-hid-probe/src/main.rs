//! ups-hid-probe - UPS HID report probe
//!
//! Dumps the report mapping of a UPS-class HID collection, polls its input
//! reports across the transport fallback ladder, fetches feature reports
//! by ID, and decodes everything through the power-device usage catalog.

#![deny(static_mut_refs)]

use std::fs;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hidapi::HidApi;
use openups_errors::{OpenUpsError, TransportError};
use openups_hid_common::{
    CapsDocument, DeviceSelector, PollOptions, PowerDeviceSession, enumerate_devices,
    load_capability_table,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ups_monitor_power_device_report::{
    CapabilityTable, DecodeResult, ReportType, format_usage, usage_name, usage_page_name,
};

/// Probe UPS-class HID collections: report mappings, input polling with
/// transport fallback, and feature report decoding.
#[derive(Parser)]
#[command(
    name = "ups-hid-probe",
    about = "UPS HID report mapping and decoding probe"
)]
#[command(version)]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List connected HID devices
    List {
        /// Only show Power Device / Battery System collections
        #[arg(long)]
        power_only: bool,
    },
    /// Dump the report mapping of one device, then read and decode reports
    Probe(ProbeOpts),
    /// Validate a capability document and emit its normalized form
    ExportCaps(ExportOpts),
}

#[derive(Args)]
struct ProbeOpts {
    /// Capability document for the device (JSON, exported by a platform
    /// report parser)
    #[arg(long)]
    caps: String,
    /// Vendor ID filter (hex, e.g. 0x051D)
    #[arg(long, value_parser = parse_hex_u16)]
    vid: Option<u16>,
    /// Product ID filter (hex, e.g. 0x0002)
    #[arg(long, value_parser = parse_hex_u16)]
    pid: Option<u16>,
    /// Substring that must appear in the device path (e.g. vid_051d)
    #[arg(long)]
    path_contains: Option<String>,
    /// Pick a matching interface by index; -1 auto-picks the first
    /// openable one
    #[arg(long, default_value = "-1")]
    index: i32,
    /// How many input report read cycles to attempt
    #[arg(long, default_value = "25")]
    read_count: usize,
    /// Per-read timeout in milliseconds once timed reads are in use
    #[arg(long, default_value = "2000")]
    timeout_ms: u64,
    /// Skip input report reading
    #[arg(long)]
    no_input: bool,
    /// Skip feature report fetching
    #[arg(long)]
    no_feature: bool,
}

#[derive(Args)]
struct ExportOpts {
    /// Capability document to validate (JSON)
    #[arg(long)]
    caps: String,
    /// Write the normalized document here instead of stdout
    #[arg(long)]
    output: Option<String>,
}

fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let s = s.trim_start_matches("0x").trim_start_matches("0X");
    u16::from_str_radix(s, 16).map_err(|e| format!("invalid hex value '{s}': {e}"))
}

fn build_selector(opts: &ProbeOpts) -> DeviceSelector {
    let mut selector = DeviceSelector::default();
    if let Some(vid) = opts.vid {
        selector = selector.with_vendor_id(vid);
    }
    if let Some(pid) = opts.pid {
        selector = selector.with_product_id(pid);
    }
    if let Some(path_contains) = &opts.path_contains {
        selector = selector.with_path_contains(path_contains);
    }
    if let Ok(index) = usize::try_from(opts.index) {
        selector = selector.with_index(index);
    }
    selector
}

fn hex_string(report: &[u8]) -> String {
    report
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn report_line(n: usize, count: usize, report: &[u8]) -> String {
    let report_id = report.first().copied().unwrap_or(0);
    format!(
        "[{}/{}] {} bytes | ReportID={} | {}",
        n,
        count,
        report.len(),
        report_id,
        hex_string(report)
    )
}

/// Renders one decoded report the way the mapping dump names usages:
/// a header line, one line per value, one line per button page.
fn decoded_lines(decoded: &DecodeResult) -> Vec<String> {
    let mut lines = vec![format!(
        "Decoded {} ReportID={}:",
        decoded.report_type.label(),
        decoded.report_id
    )];
    for value in &decoded.values {
        lines.push(format!(
            "  Value {} -> {}",
            format_usage(value.usage_page, value.usage),
            value.raw_value
        ));
    }
    for group in &decoded.buttons {
        let pressed = group
            .pressed_usages
            .iter()
            .map(|&usage| match usage_name(group.usage_page, usage) {
                Some(name) => format!("0x{usage:04X} ({name})"),
                None => format!("0x{usage:04X}"),
            })
            .collect::<Vec<_>>()
            .join(", ");
        let page_desc = match usage_page_name(group.usage_page) {
            Some(name) => format!("0x{:04X} ({})", group.usage_page, name),
            None => format!("0x{:04X}", group.usage_page),
        };
        lines.push(format!("  Buttons UsagePage={page_desc} pressed: {pressed}"));
    }
    lines
}

fn print_decoded(table: &CapabilityTable, report_type: ReportType, report: &[u8]) {
    if let Some(decoded) = table.decode(report_type, report) {
        for line in decoded_lines(&decoded) {
            println!("{line}");
        }
    }
}

fn list_devices(api: &HidApi, power_only: bool) -> Result<()> {
    let mut devices = enumerate_devices(api, &DeviceSelector::default());
    if power_only {
        devices.retain(|d| d.is_power_device());
    }
    if devices.is_empty() {
        println!("No HID devices found.");
        return Ok(());
    }
    println!(
        "{:<8} {:<8} {:<12} {:<8} {:<20} Product",
        "VID", "PID", "Usage Page", "Usage", "Manufacturer"
    );
    println!("{}", "-".repeat(80));
    for dev in devices {
        println!(
            "{:<8} {:<8} {:<12} {:<8} {:<20} {}",
            format!("0x{:04X}", dev.vendor_id),
            format!("0x{:04X}", dev.product_id),
            format!("0x{:04X}", dev.usage_page),
            format!("0x{:04X}", dev.usage),
            dev.manufacturer.as_deref().unwrap_or("(unknown)"),
            dev.product_name.as_deref().unwrap_or("(unknown)"),
        );
    }
    Ok(())
}

fn probe_device(api: &HidApi, opts: &ProbeOpts) -> Result<()> {
    let caps_json = fs::read_to_string(&opts.caps)
        .with_context(|| format!("Failed to read capability document '{}'", opts.caps))?;
    let mut document = CapsDocument::from_json(&caps_json)
        .with_context(|| format!("Failed to parse capability document '{}'", opts.caps))?;
    let table = load_capability_table(&mut document)
        .context("Failed to assemble the capability table")?;

    let selector = build_selector(opts);
    let candidates = enumerate_devices(api, &selector);
    if candidates.is_empty() {
        println!("No matching device interfaces found.");
        println!("Tip: relax --vid/--pid/--path-contains filtering, or check permissions.");
        anyhow::bail!("no matching HID interfaces");
    }
    println!("Found {} matching interface(s):", candidates.len());
    for (i, dev) in candidates.iter().enumerate() {
        println!("  [{}] {}", i, dev.path);
    }

    let mut session = PowerDeviceSession::open(api, &selector, table)
        .context("Failed to open a matching HID interface")?;
    let info = session.device_info();
    println!(
        "\nOpened {} (VID=0x{:04X} PID=0x{:04X})",
        info.display_name(),
        info.vendor_id,
        info.product_id
    );

    println!();
    print!("{}", session.mapping());

    // Decode callbacks need the table while the session is borrowed for
    // polling, so they work from a copy.
    let table = session.table().clone();

    if !opts.no_input {
        println!("\nReading input reports...");
        let options = PollOptions {
            read_count: opts.read_count,
            timeout: Duration::from_millis(opts.timeout_ms),
        };
        let read_count = opts.read_count;
        let mut delivered_index = 0usize;
        let result = session.poll_input(&options, |report| {
            delivered_index += 1;
            println!("{}", report_line(delivered_index, read_count, report));
            print_decoded(&table, ReportType::Input, report);
            Ok(())
        });
        match result {
            Ok(summary) => println!(
                "Delivered {} report(s) ({} timeout(s)).",
                summary.delivered, summary.timeouts
            ),
            Err(OpenUpsError::Transport(TransportError::NotSupported(reason))) => {
                println!("Input reads not supported by this collection ({reason}).");
            }
            Err(err) => return Err(err).context("Input report polling failed"),
        }
    }

    if !opts.no_feature {
        if session.table().report_len(ReportType::Feature) == 0 {
            println!("\nNo feature report length reported by device.");
        } else if session.mapping().feature_report_ids().is_empty() {
            println!("\nNo feature ReportID(s) found in parsed mapping.");
        } else {
            println!("\nFetching feature reports...");
            let delivered = session
                .fetch_features(|report| {
                    let report_id = report.first().copied().unwrap_or(0);
                    println!("  Feature ReportID={}: {}", report_id, hex_string(report));
                    print_decoded(&table, ReportType::Feature, report);
                    Ok(())
                })
                .context("Feature report fetching failed")?;
            println!("Fetched {delivered} feature report(s).");
        }
    }

    Ok(())
}

fn export_caps(opts: &ExportOpts) -> Result<()> {
    let caps_json = fs::read_to_string(&opts.caps)
        .with_context(|| format!("Failed to read capability document '{}'", opts.caps))?;
    let document = CapsDocument::from_json(&caps_json)
        .with_context(|| format!("Failed to parse capability document '{}'", opts.caps))?;
    let table =
        CapabilityTable::try_from(&document).context("Capability document is incomplete")?;
    let normalized = CapsDocument::from(&table);
    let json = normalized
        .to_json_pretty()
        .context("Failed to serialize the capability document")?;
    match &opts.output {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("Failed to write '{path}'"))?;
            println!("Wrote normalized capability document to '{path}'.");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match &cli.command {
        Commands::List { power_only } => {
            let api = HidApi::new().context("Failed to initialize HidApi")?;
            list_devices(&api, *power_only)
        }
        Commands::Probe(opts) => {
            let api = HidApi::new().context("Failed to initialize HidApi")?;
            probe_device(&api, opts)
        }
        Commands::ExportCaps(opts) => export_caps(opts),
    }
}

// ── BDD-style scenario tests ────────────────────────────────────────────────
