use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pdf_overlay::{ExportReport, OverlayOutcome, OverlayPlan, OverlaySession, SkipReason};
use std::path::PathBuf;

mod logger;
#[cfg(feature = "pdf-viewer")]
mod render;

#[derive(Parser)]
#[command(name = "pdft", about = "Place images on PDF pages", version)]
struct Cli {
    /// Log per-overlay detail
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place a single image on a page
    AddImage {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// PNG or JPEG image
        #[arg(long)]
        image: PathBuf,

        /// Zero-based target page
        #[arg(long, default_value = "0")]
        page: usize,

        /// Left edge, percent of page width
        #[arg(long)]
        x: Option<f32>,

        /// Top edge, percent of page height
        #[arg(long)]
        y: Option<f32>,

        /// Width, percent of page width (height follows the image aspect)
        #[arg(long)]
        width: Option<f32>,

        /// Clockwise rotation in degrees
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        rotation: f32,
    },

    /// Apply a JSON overlay plan
    Plan {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long, required_unless_present = "dry_run")]
        output: Option<PathBuf>,

        /// Plan file (JSON)
        #[arg(short, long)]
        plan: PathBuf,

        /// Print draw instructions without writing a PDF
        #[arg(long)]
        dry_run: bool,
    },

    /// Render a page to PNG
    #[cfg(feature = "pdf-viewer")]
    Render {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Output image file
        #[arg(short, long)]
        output: PathBuf,

        /// Zero-based page to render
        #[arg(long, default_value = "0")]
        page: usize,

        /// Pixels per point
        #[arg(long, default_value = "1.0")]
        scale: f32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::CliLogger::new(cli.verbose).init()?;

    match cli.command {
        Commands::AddImage {
            input,
            output,
            image,
            page,
            x,
            y,
            width,
            rotation,
        } => {
            let document = pdf_overlay::load_pdf(&input).await?;
            let pages = pdf_overlay::document_page_geometries(&document)?;
            let Some(geometry) = pages.get(page) else {
                bail!("{} has {} pages, no page {}", input.display(), pages.len(), page);
            };
            let page_ratio = geometry.aspect();

            let (bytes, declared) = pdf_overlay::load_image(&image).await?;
            let mut session = OverlaySession::new();
            let id = session
                .add_image(page, bytes, declared, page_ratio)
                .with_context(|| format!("Cannot use {}", image.display()))?;

            if let Some(overlay) = session.overlay_mut(id) {
                if x.is_some() || y.is_some() || width.is_some() {
                    let (cur_x, cur_y, cur_width) = (overlay.x, overlay.y, overlay.width);
                    overlay.place(
                        x.unwrap_or(cur_x),
                        y.unwrap_or(cur_y),
                        width.unwrap_or(cur_width),
                        page_ratio,
                    );
                }
                overlay.rotation = rotation;
            }

            let (document, report) =
                pdf_overlay::export(document, session.export_items()).await?;
            print_report(&report);
            pdf_overlay::save_pdf(document, &output).await?;
            println!("Placed {} → {}", image.display(), output.display());
        }

        Commands::Plan {
            input,
            output,
            plan,
            dry_run,
        } => {
            let plan = OverlayPlan::load(&plan)
                .await
                .with_context(|| format!("Cannot read plan {}", plan.display()))?;
            let document = pdf_overlay::load_pdf(&input).await?;
            let pages = pdf_overlay::document_page_geometries(&document)?;

            let (session, skipped) = plan.build_session(&pages).await?;
            for skip in &skipped {
                println!("  entry {}: skipped ({})", skip.entry, skip.error);
            }

            if dry_run {
                let planned = pdf_overlay::transform_all(session.overlays(), &pages);
                println!("Draw instructions ({} of {}):", planned.len(), session.len());
                for draw in &planned {
                    let i = draw.instruction;
                    println!(
                        "  {:?} page {}: at ({:.2}, {:.2}) size {:.2}x{:.2} rotate {:.2}°",
                        draw.overlay, draw.page, i.draw_x, i.draw_y, i.width, i.height,
                        i.rotation_degrees
                    );
                }
                return Ok(());
            }

            let Some(output) = output else {
                bail!("--output is required unless --dry-run is given");
            };
            let (document, report) =
                pdf_overlay::export(document, session.export_items()).await?;
            print_report(&report);
            pdf_overlay::save_pdf(document, &output).await?;
            println!("Applied plan → {}", output.display());
        }

        #[cfg(feature = "pdf-viewer")]
        Commands::Render {
            input,
            output,
            page,
            scale,
        } => {
            let bytes = tokio::fs::read(&input).await?;
            let image =
                tokio::task::spawn_blocking(move || render::render_page(&bytes, page, scale))
                    .await??;
            image.save(&output)?;
            println!(
                "Rendered page {} ({}x{}) → {}",
                page,
                image.width(),
                image.height(),
                output.display()
            );
        }
    }

    Ok(())
}

fn print_report(report: &ExportReport) {
    println!("Overlay export:");
    println!("  Placed: {}", report.placed_count());
    for (id, outcome) in &report.outcomes {
        match outcome {
            OverlayOutcome::Placed(_) => {}
            OverlayOutcome::Skipped(SkipReason::PageOutOfRange { page, page_count }) => {
                println!(
                    "  {:?}: skipped, page {} is past the end ({} pages)",
                    id, page, page_count
                );
            }
            OverlayOutcome::Skipped(SkipReason::UnsupportedImage(reason)) => {
                println!("  {:?}: skipped, unsupported image ({})", id, reason);
            }
        }
    }
}
