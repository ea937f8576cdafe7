use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use android_unsparse as sparse;

/// Decode a sparse file to a raw file
#[derive(Parser)]
#[command(version, about)]
struct Args {
    sparse_file: PathBuf,
    raw_file: PathBuf,
    /// Don't print progress or image information
    #[arg(short, long)]
    quiet: bool,
}

fn progress_bar(total_chunks: u32, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(u64::from(total_chunks));
    let template = "Progress: {percent:>3}% [{bar:40}] {pos}/{len} chunks";
    if let Ok(style) = ProgressStyle::with_template(template) {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

fn simg2img(args: &Args) -> Result<()> {
    let src = &args.sparse_file;
    let dst = &args.raw_file;

    if !src.exists() {
        bail!("Input file not found: {}", src.display());
    }
    if !sparse::is_sparse_image(src) {
        bail!("{} is not a sparse image", src.display());
    }

    let fi = File::open(src).with_context(|| format!("Failed to open {}", src.display()))?;
    let decoder = sparse::Decoder::new(BufReader::new(fi))
        .with_context(|| format!("Failed to read header of {}", src.display()))?;

    let header = decoder.header().clone();
    if !args.quiet {
        println!("Converting {} to {}", src.display(), dst.display());
        println!(
            "Sparse version: {}.{}",
            header.major_version, header.minor_version
        );
        println!("Block size: {}", header.block_size);
        println!("Total blocks: {}", header.total_blocks);
        println!("Total chunks: {}", header.total_chunks);
        println!(
            "Output size: {:.1} MB",
            header.image_size() as f64 / (1024.0 * 1024.0)
        );
    }

    let fo = File::create(dst).with_context(|| format!("Failed to create {}", dst.display()))?;
    let mut fo = BufWriter::new(fo);

    let bar = progress_bar(header.total_chunks, args.quiet);
    let summary = match decoder
        .decode_with_progress(&mut fo, |processed, _| bar.set_position(u64::from(processed)))
    {
        Ok(summary) => {
            bar.finish();
            summary
        }
        Err(err) => {
            bar.abandon();
            return Err(err).with_context(|| format!("Failed to convert {}", src.display()));
        }
    };

    fo.into_inner()
        .map_err(|e| e.into_error())
        .with_context(|| format!("Failed to write {}", dst.display()))?;

    if !args.quiet {
        if summary.stopped_early() {
            println!(
                "Input ended after {} of {} chunks",
                summary.chunks, summary.total_chunks
            );
        }
        println!("Conversion complete: {}", dst.display());
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let args = Args::parse();
    simg2img(&args).unwrap_or_else(|err| {
        eprintln!("error: {:#}", err);
        process::exit(1);
    });
}
