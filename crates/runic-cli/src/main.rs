//! Command-line renderer for the rune script.
//!
//! Reads one record per stdin line, optionally transcribes it to IPA,
//! renders each line to its own surface, stacks the lines into one
//! document image, and writes a PNG to a file or stdout.
//!
//! Usage:
//!   runic [OPTIONS] < input.txt > out.png
//!   echo "tɛst" | runic -o out.png

use std::env;
use std::io::{self, BufRead, Cursor, Write};
use std::process::ExitCode;

use embedded_graphics::pixelcolor::Rgb888;
use runic_embedded_graphics::{EgRenderer, Framebuffer, LineStack, SpriteGlyphs};
use runic_render::{Document, GlyphSource, RenderConfig, VectorGlyphs};
use runic_transcribe::{GeminiTranscriber, Passthrough, Transcriber};

/// Outward padding per side, as a multiple of the stroke thickness, added
/// around the content bounds so round caps never clip at the surface edge.
const PAD_THICKNESS_RATIO: f32 = 4.0;

#[derive(Clone, Debug)]
struct Args {
    output: String,
    transcriber: String,
    sprite_sheet: Option<String>,
    color: Rgb888,
    text_height: f32,
    thickness: f32,
    kerning: f32,
    scale: f32,
}

impl Default for Args {
    fn default() -> Self {
        let render = RenderConfig::default();
        Self {
            output: String::new(),
            transcriber: String::new(),
            sprite_sheet: None,
            color: Rgb888::new(0, 0, 0),
            text_height: render.text_height,
            thickness: render.thickness,
            kerning: render.kerning,
            scale: render.scale,
        }
    }
}

fn main() -> ExitCode {
    match run(env::args().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {}", msg);
            eprintln!("{}", help_text());
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    let args = parse_args(args)?;

    let transcriber: Box<dyn Transcriber> = match args.transcriber.as_str() {
        "" => Box::new(Passthrough),
        "gemini" => Box::new(GeminiTranscriber::from_env().map_err(|e| e.to_string())?),
        other => return Err(format!("unknown transcriber: {:?}", other)),
    };

    let sprites = match &args.sprite_sheet {
        Some(path) => Some(SpriteGlyphs::load(path).map_err(|e| e.to_string())?),
        None => None,
    };

    let mut renderer = EgRenderer::new(args.color);
    if let Some(sprites) = &sprites {
        renderer = renderer.with_sprites(sprites.clone());
    }

    let config = RenderConfig {
        text_height: args.text_height,
        thickness: args.thickness,
        kerning: args.kerning,
        scale: args.scale,
    };
    // Content bounds exclude stroke thickness; pad before rasterizing.
    let pad = PAD_THICKNESS_RATIO * config.thickness;
    let pad_px = (pad * config.scale).ceil() as u32;

    let mut stack = LineStack::new();
    for line in io::stdin().lock().lines() {
        let line = line.map_err(|e| format!("read line from input: {}", e))?;
        let ipa = transcriber.transcribe(&line).map_err(|e| e.to_string())?;

        let mut doc = Document::with_config(config);
        doc.append(&ipa);

        let (width, height) = doc.size();
        let mut frame = Framebuffer::new(width + 2 * pad_px, height + 2 * pad_px);

        let source: &dyn GlyphSource = match &sprites {
            Some(sprites) => sprites,
            None => VectorGlyphs::shared(),
        };
        let commands = doc
            .draw_commands(pad, pad, source)
            .map_err(|e| e.to_string())?;
        renderer
            .render(&commands, &mut frame)
            .map_err(|_| "render backend failed".to_string())?;

        stack.push(frame);
    }

    if stack.is_empty() {
        return Ok(());
    }

    write_image(&args.output, &stack.to_image())
}

fn write_image(output: &str, img: &image::RgbImage) -> Result<(), String> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .map_err(|e| format!("encode image: {}", e))?;

    if output.is_empty() {
        io::stdout()
            .write_all(&bytes)
            .map_err(|e| format!("write image to stdout: {}", e))
    } else {
        std::fs::write(output, &bytes).map_err(|e| format!("write image to {}: {}", output, e))
    }
}

fn parse_args(argv: Vec<String>) -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = argv.into_iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" | "--output" => args.output = required_value(&mut iter, &arg)?,
            "--transcribe" => args.transcriber = required_value(&mut iter, &arg)?,
            "--sprite-sheet" => args.sprite_sheet = Some(required_value(&mut iter, &arg)?),
            "--color" => args.color = parse_color(&required_value(&mut iter, &arg)?)?,
            "--text-height" => args.text_height = parse_float(&required_value(&mut iter, &arg)?)?,
            "--thickness" => args.thickness = parse_float(&required_value(&mut iter, &arg)?)?,
            "--kerning" => args.kerning = parse_float(&required_value(&mut iter, &arg)?)?,
            "--scale" => args.scale = parse_float(&required_value(&mut iter, &arg)?)?,
            "-h" | "--help" => return Err("help requested".to_string()),
            other => return Err(format!("unknown argument: {:?}", other)),
        }
    }

    if args.text_height <= 0.0 {
        return Err("--text-height must be positive".to_string());
    }
    if args.thickness <= 0.0 {
        return Err("--thickness must be positive".to_string());
    }
    if args.scale <= 0.0 {
        return Err("--scale must be positive".to_string());
    }

    Ok(args)
}

fn required_value(iter: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    iter.next().ok_or_else(|| format!("{} needs a value", flag))
}

fn parse_float(value: &str) -> Result<f32, String> {
    value
        .parse::<f32>()
        .map_err(|_| format!("invalid number: {:?}", value))
}

fn parse_color(value: &str) -> Result<Rgb888, String> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("invalid color {:?}; expected RRGGBB", value));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| format!("invalid color {:?}", value))
    };
    Ok(Rgb888::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn help_text() -> String {
    [
        "usage: runic [OPTIONS]",
        "",
        "Reads text lines from stdin and writes one stacked PNG.",
        "",
        "options:",
        "  -o, --output PATH     output filename (empty for stdout)",
        "  --transcribe NAME     transcriber for non-IPA input (gemini)",
        "  --sprite-sheet PATH   render with the legacy bitmap glyph sheet",
        "  --color RRGGBB        stroke color (default 000000)",
        "  --text-height N       cell text height in pixels (default 72)",
        "  --thickness N         stroke thickness in pixels (default 5)",
        "  --kerning N           extra cell spacing, may be negative (default 0)",
        "  --scale N             output scale multiplier (default 1)",
        "  -h, --help            show this help",
    ]
    .join("\n")
}
