use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use scribe_pdf::filters::decode_rows;
use scribe_pdf::{pdf_version, Document, Image, Page, WriterConfig};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "scribepdf",
    about = "Write PDF files and undo PNG predictor filters",
    version,
    author
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a PDF with framed pages
    Create {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Document title
        #[arg(short, long)]
        title: Option<String>,

        /// Number of pages
        #[arg(short, long, default_value = "1")]
        pages: usize,

        /// Version written in the file header
        #[arg(long, default_value = "1.7")]
        pdf_version: String,

        /// Write content streams and images uncompressed
        #[arg(long)]
        no_compress: bool,

        /// Paint a grayscale gradient image on every page
        #[arg(long)]
        gradient: bool,
    },

    /// Reverse PNG predictor filtering on raw scanline data
    Unfilter {
        /// Input file holding tagged rows
        input: PathBuf,

        /// Output file for the reconstructed bytes
        #[arg(short, long)]
        output: PathBuf,

        /// Bytes per row, excluding the tag byte
        #[arg(short, long)]
        bytes_per_row: usize,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "scribe_pdf=debug,scribepdf=debug"
    } else {
        "scribe_pdf=info,scribepdf=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn gradient_image(size: u32) -> Result<Image> {
    let samples = (0..size)
        .flat_map(|y| (0..size).map(move |x| ((x + y) * 255 / (2 * (size - 1))) as u8))
        .collect();
    Ok(Image::gray(size, size, samples)?)
}

fn create(
    output: PathBuf,
    title: Option<String>,
    pages: usize,
    version: String,
    compress: bool,
    gradient: bool,
) -> Result<()> {
    if !pdf_version::is_supported(&version) {
        bail!(
            "unsupported PDF version {version} (expected one of {})",
            pdf_version::SUPPORTED_VERSIONS.join(", ")
        );
    }
    if pages == 0 {
        bail!("a document needs at least one page");
    }

    let mut doc = Document::new();
    if let Some(title) = title {
        doc.set_title(title);
    }
    doc.set_writer_config(WriterConfig {
        pdf_version: version,
        compress_streams: compress,
    });

    for number in 1..=pages {
        let mut page = Page::a4();
        page.append_content(b"0.5 w 36 36 523 770 re S\n");
        if gradient {
            page.add_image("Im1", gradient_image(64)?);
            page.draw_image("Im1", 72.0, 600.0, 128.0, 128.0);
        }
        tracing::debug!(page = number, "built page");
        doc.add_page(page);
    }

    doc.save(&output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("PDF created successfully: {}", output.display());
    Ok(())
}

fn unfilter(input: PathBuf, output: PathBuf, bytes_per_row: usize) -> Result<()> {
    let data = fs::read(&input).with_context(|| format!("failed to read {}", input.display()))?;
    let decoded = decode_rows(&data, bytes_per_row)
        .with_context(|| format!("failed to unfilter {}", input.display()))?;

    fs::write(&output, &decoded)
        .with_context(|| format!("failed to write {}", output.display()))?;

    let rows = if bytes_per_row == 0 {
        data.len()
    } else {
        decoded.len() / bytes_per_row
    };
    println!("Decoded {rows} rows ({} bytes)", decoded.len());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Create {
            output,
            title,
            pages,
            pdf_version,
            no_compress,
            gradient,
        } => create(output, title, pages, pdf_version, !no_compress, gradient),

        Commands::Unfilter {
            input,
            output,
            bytes_per_row,
        } => unfilter(input, output, bytes_per_row),
    }
}
