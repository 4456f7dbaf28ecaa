use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use sprite_recolor::cli::Args;
use sprite_recolor::{
    clone_read_optimized, load_surface, preview, surface_to_data_url, CanvasSurface, DecodeError,
    PixelSource, Recolor,
};

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(args.verbose, args.quiet);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // The loader already logged decode failures.
            if args.quiet || err.downcast_ref::<DecodeError>().is_none() {
                eprintln!("Error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let palettes = args.palette_set()?;
    let recolor =
        Recolor::new(&palettes.source, &palettes.target).with_policy(args.transparent.into());

    if args.preview {
        let stderr = std::io::stderr();
        preview::write_mapping(&mut stderr.lock(), &recolor)
            .context("failed to write palette preview")?;
    }

    let mut input = load_surface(&args.input)?;
    if args.read_optimized {
        input = clone_read_optimized(&input);
    }

    let output: CanvasSurface = recolor.apply_to_surface(PixelSource::Surface(&input), None)?;

    match &args.output {
        Some(path) => {
            output
                .as_image()
                .save(path)
                .with_context(|| format!("failed to write image to {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None => {
            let url = surface_to_data_url(&output)?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{url}").context("failed to write data URL")?;
        }
    }
    Ok(())
}

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}
