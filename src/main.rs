//! `trajframe` command-line decoder.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use trajframe::{
    payload_from_bytes, DecodeOptions, FrameMode, Topology, TrajectoryDecoder,
};

/// Decode a binary trajectory payload into topology-aligned frames (JSON).
#[derive(Parser, Debug)]
#[command(name = "trajframe", version)]
struct Args {
    /// Structure file (PDB or mmCIF) describing the full system.
    #[arg(long, required_unless_present = "print_schema")]
    topology: Option<PathBuf>,

    /// Raw little-endian f32 coordinate payload.
    #[arg(long, required_unless_present = "print_schema")]
    payload: Option<PathBuf>,

    /// Atoms per frame in the payload [default: topology atom count].
    #[arg(long)]
    atoms: Option<usize>,

    /// Number of frames [default: as many as the payload holds].
    #[arg(long, conflicts_with_all = ["single", "projection"])]
    frames: Option<usize>,

    /// Read only the first frame.
    #[arg(long)]
    single: bool,

    /// Treat the payload as a PCA projection over an atom subset.
    #[arg(long, conflicts_with = "single")]
    projection: bool,

    /// TOML decode options.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Write JSON here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the options JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let args = Args::parse();

    if args.print_schema {
        let mut out = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut out, &DecodeOptions::json_schema())?;
        writeln!(out)?;
        return Ok(());
    }

    let (Some(topology_path), Some(payload_path)) =
        (&args.topology, &args.payload)
    else {
        bail!("--topology and --payload are required");
    };

    let options = match &args.options {
        Some(path) => DecodeOptions::load(path).with_context(|| {
            format!("loading options from {}", path.display())
        })?,
        None => DecodeOptions::default(),
    };

    let topology = Topology::load(topology_path).with_context(|| {
        format!("reading topology {}", topology_path.display())
    })?;
    let bytes = std::fs::read(payload_path).with_context(|| {
        format!("reading payload {}", payload_path.display())
    })?;
    let payload = payload_from_bytes(&bytes)?;

    let atoms = args.atoms.unwrap_or_else(|| topology.atom_count());
    let n_frames = args
        .frames
        .unwrap_or_else(|| payload.len() / atoms.saturating_mul(3).max(1));
    let mode = FrameMode::from_flags(n_frames, args.projection, args.single);
    log::info!(
        "decoding {} values: {atoms} atoms per frame, {mode:?}, topology of \
         {} atoms",
        payload.len(),
        topology.atom_count()
    );

    let traj = TrajectoryDecoder::new(options)
        .decode(Some(&topology), Some(payload.as_slice()), atoms, mode)?
        .context("nothing to decode")?;
    log::info!("decoded {} frames", traj.len());

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, &traj)?;
            writer.flush()?;
        }
        None => {
            let mut out = std::io::stdout().lock();
            serde_json::to_writer(&mut out, &traj)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
