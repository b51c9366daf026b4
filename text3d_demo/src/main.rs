//! Headless 3D text demo
//!
//! Renders the classic "text in 3D" scene with the software rasterizer: a
//! wire cube for reference, waving layered text floating above it and a flat
//! caption on the ground, seen from a camera orbiting the origin. Every frame
//! is written to a PNG.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use rand::{rngs::StdRng, SeedableRng};

use text3d::config::{Config, SceneConfig};
use text3d::foundation::color::Color;
use text3d::foundation::logging;
use text3d::foundation::math::Vec3;
use text3d::render::text::{
    BitmapFontAtlas, LayerCompositor, TextDebugFlags, TextRenderer, TextStyle,
};
use text3d::render::{
    AlphaDiscardShader, Camera, Rasterizer, ShaderConfig, ShaderLoader, SoftwareRasterizer,
};

const CUBE_SIZE: f32 = 2.0;

fn cli() -> Command {
    Command::new("text3d_demo")
        .about("Renders waving, layered text in 3D space to PNG frames")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Scene configuration (.toml or .ron)"),
        )
        .arg(
            Arg::new("write-config")
                .long("write-config")
                .value_name("FILE")
                .help("Write the effective configuration to FILE and exit"),
        )
        .arg(
            Arg::new("text")
                .short('t')
                .long("text")
                .value_name("TEXT")
                .help("Text to draw; wrap parts in ~ to make them wave"),
        )
        .arg(
            Arg::new("font")
                .short('f')
                .long("font")
                .value_name("FILE")
                .help("TTF, OTF or BMFont .fnt file"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Directory for rendered frames"),
        )
        .arg(
            Arg::new("frames")
                .short('n')
                .long("frames")
                .value_name("COUNT")
                .value_parser(clap::value_parser!(u32))
                .help("Number of frames to render"),
        )
        .arg(
            Arg::new("layers")
                .short('l')
                .long("layers")
                .value_name("COUNT")
                .value_parser(clap::value_parser!(usize))
                .help("Number of extruded layers"),
        )
        .arg(
            Arg::new("multicolor")
                .short('m')
                .long("multicolor")
                .help("Give every layer its own random color")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-wave")
                .long("no-wave")
                .help("Draw ~ markers as plain glyphs")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-discard")
                .long("no-discard")
                .help("Draw without the alpha discard shader")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("letter-boundary")
                .long("letter-boundary")
                .help("Draw a box around every glyph")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("text-boundary")
                .long("text-boundary")
                .help("Draw a box around the measured text")
                .action(ArgAction::SetTrue),
        )
}

fn scene_from_args(matches: &clap::ArgMatches) -> Result<SceneConfig> {
    let mut scene = match matches.get_one::<String>("config") {
        Some(path) => SceneConfig::load_from_file(path)
            .with_context(|| format!("Failed to load scene configuration from {path}"))?,
        None => SceneConfig::default(),
    };

    if let Some(text) = matches.get_one::<String>("text") {
        scene.text.clone_from(text);
    }
    if let Some(font) = matches.get_one::<String>("font") {
        scene.font_path = Some(font.clone());
    }
    if let Some(output) = matches.get_one::<String>("output") {
        scene.output_dir.clone_from(output);
    }
    if let Some(&frames) = matches.get_one::<u32>("frames") {
        scene.frames = frames;
    }
    if let Some(&layers) = matches.get_one::<usize>("layers") {
        scene.layers = layers;
    }
    if matches.get_flag("multicolor") {
        scene.multicolor = true;
    }
    if matches.get_flag("no-wave") {
        scene.wave_enabled = false;
    }
    if matches.get_flag("no-discard") {
        scene.alpha_discard = false;
    }
    if matches.get_flag("letter-boundary") {
        scene.style.debug |= TextDebugFlags::LETTER_BOUNDARY;
    }
    if matches.get_flag("text-boundary") {
        scene.style.debug |= TextDebugFlags::TEXT_BOUNDARY;
    }

    scene.validate().context("Invalid scene configuration")?;
    Ok(scene)
}

fn load_font(scene: &SceneConfig) -> Result<BitmapFontAtlas> {
    match &scene.font_path {
        Some(path) => BitmapFontAtlas::load(path, scene.font_pixel_size)
            .with_context(|| format!("Failed to load font {path}")),
        None => {
            log::info!("No font given, using the built-in 5x7 font");
            Ok(BitmapFontAtlas::default_font()?)
        }
    }
}

fn load_shader(scene: &SceneConfig) -> Result<AlphaDiscardShader> {
    match &scene.shader_path {
        Some(path) => AlphaDiscardShader::load(&ShaderConfig::new(path.as_str()))
            .with_context(|| format!("Failed to load shader {path}")),
        None => Ok(AlphaDiscardShader::default()),
    }
}

fn main() -> Result<()> {
    logging::init();
    let matches = cli().get_matches();
    let scene = scene_from_args(&matches)?;

    if let Some(path) = matches.get_one::<String>("write-config") {
        scene.save_to_file(path)?;
        return Ok(());
    }

    render(&scene)
}

fn render(scene: &SceneConfig) -> Result<()> {
    let output_dir = Path::new(&scene.output_dir);
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let mut raster = SoftwareRasterizer::new(scene.width, scene.height);

    let mut font = load_font(scene)?;
    font.upload(&mut raster)?;
    let shader = raster.load_shader(&load_shader(scene)?)?;

    let mut rng = match scene.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut compositor = LayerCompositor::new(scene.layers, scene.layer_distance);
    compositor.set_multicolor(scene.multicolor, &mut rng);

    let mut renderer = TextRenderer::new(&font, scene.style).with_compositor(compositor);
    if scene.wave_enabled {
        renderer = renderer.with_wave(scene.wave);
    }
    if scene.alpha_discard {
        renderer = renderer.with_shader(shader);
    }

    let caption_style = TextStyle {
        debug: TextDebugFlags::empty(),
        ..scene.style.scaled(0.5).tinted(Color::GRAY)
    };
    let mut caption = TextRenderer::new(&font, caption_style);
    if scene.alpha_discard {
        caption = caption.with_shader(shader);
    }

    let mut camera = Camera::perspective(
        scene.camera_position,
        scene.fovy,
        scene.aspect_ratio(),
        0.01,
        1000.0,
    );

    log::info!(
        "Rendering {} frame(s) of {:?} at {}x{} into {}",
        scene.frames,
        scene.text,
        scene.width,
        scene.height,
        output_dir.display()
    );

    let mut time = 0.0;
    for frame in 0..scene.frames {
        raster.clear(scene.background);
        raster.begin_3d(&camera);

        raster.draw_cube_wires(
            Vec3::new(0.0, CUBE_SIZE / 2.0, 0.0),
            Vec3::repeat(CUBE_SIZE),
            Color::DARKGRAY,
        )?;

        let summary = renderer.draw_centered(&mut raster, &scene.text, scene.elevation, time)?;
        log::debug!("Frame {frame}: {} glyphs, {} quads", summary.glyphs, summary.quads);

        caption.draw(&mut raster, &scene.background_text, Vec3::new(-5.0, 0.1, 5.0), time)?;

        raster.end_3d();

        let path = frame_path(output_dir, frame);
        raster.save_png(&path)?;
        log::trace!("{:?}", raster.stats());

        camera.orbit(scene.orbit_speed * scene.frame_delta);
        time += scene.frame_delta;
    }

    log::info!("Done");
    Ok(())
}

fn frame_path(dir: &Path, frame: u32) -> PathBuf {
    dir.join(format!("frame_{frame:04}.png"))
}
