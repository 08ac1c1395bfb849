use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "textoverlay", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw text onto one or more images (all inputs form one batch).
    Render(RenderArgs),
    /// List font files offered by the font directory.
    Fonts(FontsArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input images.
    #[arg(long = "in", required = true, num_args = 1..)]
    in_paths: Vec<PathBuf>,

    /// Output image path (single input only).
    #[arg(long, conflicts_with = "out_dir", required_unless_present = "out_dir")]
    out: Option<PathBuf>,

    /// Output directory; each input keeps its file name.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Overlay parameters JSON; flags below override its fields.
    #[arg(long)]
    params: Option<PathBuf>,

    #[command(flatten)]
    style: StyleArgs,

    /// Font resource directory (defaults to $TEXTOVERLAY_FONTS_DIR, then ./fonts).
    #[arg(long)]
    fonts_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
struct StyleArgs {
    /// Text to draw.
    #[arg(long)]
    text: Option<String>,
    /// Font identity (file name in the font directory, path, or family name).
    #[arg(long)]
    font: Option<String>,
    #[arg(long)]
    font_size: Option<u32>,
    /// Fill color, `#RGB[A]` or `#RRGGBB[AA]`.
    #[arg(long)]
    fill: Option<String>,
    /// Stroke color, `#RGB[A]` or `#RRGGBB[AA]`.
    #[arg(long)]
    stroke: Option<String>,
    #[arg(long)]
    stroke_thickness: Option<f64>,
    #[arg(long)]
    stroke_opacity: Option<f64>,
    #[arg(long)]
    padding: Option<u32>,
    /// left, center or right.
    #[arg(long)]
    h_align: Option<textoverlay::HAlign>,
    /// top, middle or bottom.
    #[arg(long)]
    v_align: Option<textoverlay::VAlign>,
    #[arg(long, allow_hyphen_values = true)]
    x_shift: Option<i32>,
    #[arg(long, allow_hyphen_values = true)]
    y_shift: Option<i32>,
    #[arg(long)]
    line_spacing: Option<f64>,
}

impl StyleArgs {
    fn apply_to(self, params: &mut textoverlay::OverlayParams) {
        let style = &mut params.style;
        if let Some(v) = self.text {
            params.text = v;
        }
        if let Some(v) = self.font {
            style.font = v;
        }
        if let Some(v) = self.font_size {
            style.font_size = v;
        }
        if let Some(v) = self.fill {
            style.fill_color_hex = v;
        }
        if let Some(v) = self.stroke {
            style.stroke_color_hex = v;
        }
        if let Some(v) = self.stroke_thickness {
            style.stroke_thickness = v;
        }
        if let Some(v) = self.stroke_opacity {
            style.stroke_opacity = v;
        }
        if let Some(v) = self.padding {
            style.padding = v;
        }
        if let Some(v) = self.h_align {
            style.horizontal_alignment = v;
        }
        if let Some(v) = self.v_align {
            style.vertical_alignment = v;
        }
        if let Some(v) = self.x_shift {
            style.x_shift = v;
        }
        if let Some(v) = self.y_shift {
            style.y_shift = v;
        }
        if let Some(v) = self.line_spacing {
            style.line_spacing = v;
        }
    }
}

#[derive(Parser, Debug)]
struct FontsArgs {
    /// Font resource directory (defaults to $TEXTOVERLAY_FONTS_DIR, then ./fonts).
    #[arg(long)]
    fonts_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Fonts(args) => cmd_fonts(args),
    }
}

fn font_resolver(fonts_dir: Option<PathBuf>) -> textoverlay::FontResolver {
    match fonts_dir {
        Some(dir) => textoverlay::FontResolver::new(Some(dir)),
        None => textoverlay::FontResolver::from_env(),
    }
}

fn read_params_json(path: &Path) -> anyhow::Result<textoverlay::OverlayParams> {
    let f = File::open(path).with_context(|| format!("open params '{}'", path.display()))?;
    let r = BufReader::new(f);
    let params: textoverlay::OverlayParams =
        serde_json::from_reader(r).with_context(|| "parse params JSON")?;
    Ok(params)
}

fn output_paths(args: &RenderArgs) -> anyhow::Result<Vec<PathBuf>> {
    if let Some(out) = &args.out {
        if args.in_paths.len() != 1 {
            anyhow::bail!(
                "--out takes a single input ({} given); use --out-dir",
                args.in_paths.len()
            );
        }
        return Ok(vec![out.clone()]);
    }

    let dir = args
        .out_dir
        .as_deref()
        .context("either --out or --out-dir is required")?;
    args.in_paths
        .iter()
        .map(|p| {
            let name = p
                .file_name()
                .with_context(|| format!("input '{}' has no file name", p.display()))?;
            Ok(dir.join(name))
        })
        .collect()
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let outs = output_paths(&args)?;

    let mut params = match &args.params {
        Some(path) => read_params_json(path)?,
        None => textoverlay::OverlayParams::default(),
    };
    let RenderArgs {
        in_paths,
        style,
        fonts_dir,
        ..
    } = args;
    style.apply_to(&mut params);
    params.validate()?;

    let mut canvases = in_paths
        .iter()
        .map(|p| textoverlay::load_canvas(p))
        .collect::<Result<Vec<_>, _>>()?;

    let mut overlay = textoverlay::TextOverlay::new(font_resolver(fonts_dir));
    overlay.render_batch(&mut canvases, &params.text, &params.style)?;

    for (canvas, out) in canvases.iter().zip(&outs) {
        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        textoverlay::save_canvas(canvas, out)?;
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

fn cmd_fonts(args: FontsArgs) -> anyhow::Result<()> {
    let resolver = font_resolver(args.fonts_dir);
    let Some(dir) = resolver.fonts_dir() else {
        eprintln!("no font directory configured");
        return Ok(());
    };
    for name in textoverlay::list_fonts(dir) {
        println!("{name}");
    }
    Ok(())
}
