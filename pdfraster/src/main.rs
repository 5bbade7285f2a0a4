use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, warn};

use pdfraster::{Library, RasterResult, close_document, free_bitmap, load_config, render_pages};

/// Render PDF pages to PNG files.
#[derive(Debug, Parser)]
#[command(name = "pdfraster", version, about)]
struct Args {
    /// PDF document to render
    document: PathBuf,

    /// Zero-based page index to render; repeatable
    #[arg(short, long = "page")]
    pages: Vec<i32>,

    /// Render every page
    #[arg(long, conflicts_with = "pages")]
    all: bool,

    /// Output width in pixels (defaults to render.target_width)
    #[arg(short, long)]
    width: Option<i32>,

    /// Directory for page-<index>.png files (defaults to render.output_dir)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let args = Args::parse();
    let config = load_config()?;

    let width = args.width.unwrap_or(config.render.target_width);
    let output_dir = args.output.unwrap_or(config.render.output_dir);
    std::fs::create_dir_all(&output_dir)?;

    let library = Library::initialize(&config.engine)?;
    let result = run(&library, &args.document, &args.pages, args.all, width, &output_dir);
    library.shutdown();

    let written = result?;
    info!(pages = written, output = %output_dir.display(), "Done");
    Ok(())
}

fn run(
    library: &Library,
    path: &Path,
    pages: &[i32],
    all: bool,
    width: i32,
    output_dir: &Path,
) -> RasterResult<usize> {
    let document = library.load_document(path)?;

    let indices: Vec<i32> = if all {
        (0..document.page_count()).collect()
    } else if pages.is_empty() {
        vec![0]
    } else {
        pages.to_vec()
    };

    let rendered = render_pages(&document, indices, width).inspect_err(|e| {
        warn!(error = %e, code = e.error_code(), "Failed to render pages")
    })?;
    close_document(Some(document));

    let mut written = 0;
    for (index, bitmap) in rendered {
        let target = output_dir.join(format!("page-{}.png", index));
        let saved = bitmap.save_png(&target);
        free_bitmap(Some(bitmap));
        saved?;

        info!(page = index, path = %target.display(), "Rendered page");
        written += 1;
    }
    Ok(written)
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let format = fmt::format()
        .with_target(true)
        .with_thread_ids(true)
        .compact();

    // Use RUST_LOG if set, otherwise default to info level for our crate
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pdfraster=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().event_format(format))
        .with(filter)
        .init();
}
