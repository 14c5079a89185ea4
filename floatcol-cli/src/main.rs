//! floatcol CLI
//!
//! Lays out a JSON column document and prints where every box, paragraph,
//! and line ended up.

mod document;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use floatcol_layout::layout::{
    ApproximateFontMetrics, ColumnLayout, FragmentContent, LineBreaker, ShapedLine,
};
use floatcol_layout::style::{CrossAxisAlignment, TextDirection};
use floatcol_layout::{FloatColumn, Item};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use document::Document;

/// How to print the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary.
    Text,
    /// The full layout result as JSON.
    Json,
}

/// floatcol: float-aware column layout
#[derive(Parser, Debug)]
#[command(name = "floatcol")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Lay out a document
    floatcol demos/float_wrap.json

    # Override the column width and direction
    floatcol --width 240 --direction rtl demos/float_wrap.json

    # Dump the full result as JSON, with layout decisions on stderr
    floatcol -vv --format json demos/float_wrap.json
"#)]
struct Cli {
    /// Path to a column document
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Column document given inline instead of a file
    #[arg(long, value_name = "JSON")]
    json: Option<String>,

    /// Maximum column width (overrides the document)
    #[arg(long)]
    width: Option<f32>,

    /// Maximum column height (overrides the document)
    #[arg(long)]
    height: Option<f32>,

    /// Text direction: ltr or rtl (overrides the document)
    #[arg(long)]
    direction: Option<TextDirection>,

    /// Cross-axis alignment: start, end, center, stretch, or baseline
    #[arg(long)]
    align: Option<CrossAxisAlignment>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log layout decisions to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let source = read_source(&cli)?;
    let mut document = Document::from_json(&source).context("failed to parse column document")?;
    apply_overrides(&cli, &mut document);
    tracing::debug!(
        items = document.items.len(),
        boxes = document.boxes.len(),
        width = ?document.column.width,
        height = ?document.column.height,
        "loaded column document"
    );

    let mut column = FloatColumn::new(document.column.config);
    let layout = column
        .layout(
            &document.items,
            document.constraints(),
            &document.measurer(),
            &LineBreaker::new(ApproximateFontMetrics),
        )
        .context("layout failed")?;

    match cli.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&layout).context("failed to encode layout")?;
            println!("{json}");
        }
        OutputFormat::Text => print_layout(&document, &layout),
    }
    Ok(())
}

/// `RUST_LOG` wins; otherwise `-v` flags pick the level.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_source(cli: &Cli) -> Result<String> {
    if let Some(ref json) = cli.json {
        Ok(json.clone())
    } else if let Some(ref path) = cli.path {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    } else {
        anyhow::bail!("a document path or --json is required")
    }
}

fn apply_overrides(cli: &Cli, document: &mut Document) {
    if let Some(width) = cli.width {
        document.column.width = Some(width);
    }
    if let Some(height) = cli.height {
        document.column.height = Some(height);
    }
    if let Some(direction) = cli.direction {
        document.column.config.direction = Some(direction);
    }
    if let Some(align) = cli.align {
        document.column.config.cross_axis_alignment = align;
    }
}

fn print_layout(document: &Document, layout: &ColumnLayout) {
    println!(
        "{}",
        format!(
            "=== Column {:.1}x{:.1} (content height {:.1}) ===",
            layout.size.width, layout.size.height, layout.content_height
        )
        .bold()
    );
    if let Some(overflow) = layout.overflow {
        println!("{}", format!("overflow: {overflow:.1}px").red());
    }

    for (index, item) in document.items.iter().enumerate() {
        match item {
            Item::Box(block) => {
                let Some(placement) = layout.box_at(index, 0) else {
                    continue;
                };
                let rect = placement.rect;
                println!(
                    "{} box {} float={} x={:.1} y={:.1} w={:.1} h={:.1}",
                    format!("[{index}]").cyan(),
                    block.id,
                    placement.tag.float,
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height
                );
            }
            Item::Text(_) => {
                let Some(paragraph) = layout.paragraph(index) else {
                    continue;
                };
                let rect = paragraph.rect;
                println!(
                    "{} text key={} x={:.1} y={:.1} w={:.1} h={:.1}",
                    format!("[{index}]").cyan(),
                    paragraph.key,
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height
                );
                for line in &paragraph.lines {
                    print_line(line);
                }
                for placement in layout
                    .boxes
                    .iter()
                    .filter(|placement| placement.tag.item_index == index)
                {
                    let rect = placement.rect;
                    println!(
                        "    inline box {} x={:.1} y={:.1} w={:.1} h={:.1} scale={:.2}",
                        placement.id, rect.x, rect.y, rect.width, rect.height, placement.scale
                    );
                }
            }
        }
    }
}

fn print_line(line: &ShapedLine) {
    let text: String = line
        .fragments
        .iter()
        .map(|fragment| match &fragment.content {
            FragmentContent::Text { text, .. } => text.clone(),
            FragmentContent::Placeholder { index } => format!("[#{index}]"),
        })
        .collect::<Vec<_>>()
        .join(" ");
    println!(
        "    {} {}",
        format!(
            "y={:.1} left={:.1} avail={:.1}",
            line.top, line.space.left_edge, line.space.width
        )
        .dimmed(),
        text
    );
}
