//! Command-line arguments and the two workflows behind them.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{info, warn};

use pcap_recon::naming::{self, OutputNamer};
use pcap_recon::ntp::estimate_offset;
use pcap_recon::pcap::{PcapReader, PcapWriter};
use pcap_recon::progress::{RunStatus, Ticker};
use pcap_recon::rewrite::TimestampRewriter;
use pcap_recon::subnet::{group_cidrs, scan_subnets, SubnetInventory};

/// Prefix of the output name derived by the ntp command.
const DEFAULT_OUTPUT_PREFIX: &str = "dump";

/// Correct capture clocks from NTP exchanges and enumerate the subnets seen in a capture.
#[derive(Parser, Debug)]
#[command(name = "pcap-recon")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Log debug messages
    #[arg(short = 'D', long = "debug-log", global = true, conflicts_with = "quiet")]
    pub debug: bool,

    /// Only log errors and hide the progress spinner
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look for an NTP request/response in a capture and shift every timestamp accordingly
    Ntp(NtpArgs),
    /// Locate things in a capture
    Locate {
        #[command(subcommand)]
        target: LocateCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum LocateCommand {
    /// Enumerate the subnets found in a capture and their supernets
    Subnets(SubnetsArgs),
}

#[derive(ClapArgs, Debug)]
pub struct NtpArgs {
    /// PCAP source file
    #[arg(short = 'i', long = "pcap", value_name = "FILE")]
    pub pcap: PathBuf,

    /// The file to write adjusted PCAP data to
    #[arg(short = 'o', long = "output-file", value_name = "FILE")]
    pub output_file: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct SubnetsArgs {
    /// PCAP source file
    #[arg(short = 'i', long = "pcap", value_name = "FILE")]
    pub pcap: PathBuf,

    /// Copy the capture to this file while reading it
    #[arg(short = 'o', long = "output-file", value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Only list private subnets (10.0.0.0/8, 172.16.0.0/12 and 192.168.0.0/16)
    #[arg(short = 'P', long = "private-only")]
    pub private_only: bool,
}

impl Args {
    /// Level used when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }
}

pub fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Ntp(ntp) => run_ntp(ntp, args.quiet),
        Command::Locate { target: LocateCommand::Subnets(subnets) } => run_locate_subnets(subnets, args.quiet),
    }
}

fn run_ntp(args: NtpArgs, quiet: bool) -> Result<()> {
    let start = Instant::now();

    let source = naming::check_source(&args.pcap)?;
    let destination = args
        .output_file
        .map(|path| naming::check_destination(&source, path))
        .transpose()?;

    let status = Arc::new(RunStatus::new());

    info!("Looking for NTP data in {}, this can take a while", source.display());
    let offset = {
        let mut reader = PcapReader::open(&source).context("Cannot open the capture")?;
        let ticker = Ticker::start(Arc::clone(&status), "Looking for NTP data...", false, quiet);
        let offset = estimate_offset(&mut reader, &status);
        ticker.stop();
        offset.context("Cannot compute the capture clock offset")?
    };

    let destination = match destination {
        Some(destination) => destination,
        None => {
            let first = naming::read_first_timestamp(&source).context("Cannot read the first record")?;
            let name = OutputNamer::new(&source, Some(DEFAULT_OUTPUT_PREFIX))
                .with_first_timestamp(first)
                .with_offset(offset)
                .name();
            naming::check_destination(&source, name).context("Cannot derive the output file name")?
        },
    };
    info!("Converting to {}", destination.display());

    let mut reader = PcapReader::open(&source).context("Cannot open the capture")?;
    let mut writer = PcapWriter::create(&destination, reader.header())
        .with_context(|| format!("Cannot create {}", destination.display()))?;

    info!("Adjusting packet timestamps by {offset}");
    status.reset();
    let ticker = Ticker::start(Arc::clone(&status), "Adjusting pcap time ->", true, quiet);
    let written = TimestampRewriter::new(offset).rewrite(&mut reader, &mut writer, &status);
    ticker.stop();

    let written = written.context("Cannot rewrite the capture")?;
    writer.close().context("Cannot close the output capture")?;

    log_summary("Conversion status", start.elapsed(), "Packets converted..", written);
    Ok(())
}

fn run_locate_subnets(args: SubnetsArgs, quiet: bool) -> Result<()> {
    let start = Instant::now();

    let source = naming::check_source(&args.pcap)?;
    let destination = args
        .output_file
        .map(|path| naming::check_destination(&source, path))
        .transpose()?;

    let mut reader = PcapReader::open(&source).context("Cannot open the capture")?;
    let mut writer = destination
        .as_ref()
        .map(|path| PcapWriter::create(path, reader.header()))
        .transpose()
        .context("Cannot create the output capture")?;

    if args.private_only {
        warn!("Checking only private subnets");
    }
    info!("Reading PCAP file...");

    let status = Arc::new(RunStatus::new());
    let mut inventory = SubnetInventory::new(args.private_only);

    let ticker = Ticker::start(Arc::clone(&status), "Getting subnets ->", true, quiet);
    let read = scan_subnets(&mut reader, writer.as_mut(), &mut inventory, &status);
    ticker.stop();

    let read = read.context("Cannot read the capture")?;
    if let Some(writer) = writer {
        writer.close().context("Cannot close the output capture")?;
    }

    info!("Calculating supernets...");
    for (i, group) in group_cidrs(inventory.cidrs()).iter().enumerate() {
        if let Some(supernet) = group.supernet() {
            info!("Supernet {:04}: {} (from {} subnets)", i + 1, supernet, group.len());
        }
    }

    if inventory.saw_public() {
        warn!("Public network found. Use the --private-only flag to list and calculate only private networks.");
    }

    log_summary("Locate status", start.elapsed(), "Packets analysed...", read);
    Ok(())
}

fn log_summary(title: &str, elapsed: Duration, counter: &str, packets: u64) {
    let elapsed = Duration::from_secs(elapsed.as_secs());
    info!(
        "{title}\n     -> Elapsed time.......: {}\n     -> {counter}: {packets}",
        humantime::format_duration(elapsed)
    );
}
