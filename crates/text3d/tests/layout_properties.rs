//! Layout, markup and layering properties checked through recorded draw calls

mod common;

use approx::assert_relative_eq;
use common::{flush_atlas, offset_atlas, unit_style};
use text3d::foundation::color::Color;
use text3d::foundation::math::Vec3;
use text3d::render::text::{
    draw_layered, draw_text, draw_text_wave, LayerCompositor, TextStyle, WaveConfig,
};
use text3d::render::{RecordingRasterizer, TexturedQuad};

fn record(f: impl FnOnce(&mut RecordingRasterizer)) -> Vec<TexturedQuad> {
    let mut raster = RecordingRasterizer::new();
    f(&mut raster);
    raster.quads().copied().collect()
}

#[test]
fn cursor_x_counts_glyphs_on_the_last_line() {
    let atlas = flush_atlas();
    let style = TextStyle {
        font_spacing: 0.15,
        ..unit_style()
    };
    let position = Vec3::new(-3.0, 1.0, 2.0);

    for (text, glyphs_on_last_line) in [("", 0), ("abc", 3), ("ab\ncdef", 4), ("a~b\n", 0), ("x\n\nyz", 2)] {
        let mut raster = RecordingRasterizer::new();
        let summary = draw_text_wave(&mut raster, &atlas, text, position, &style, &WaveConfig::default(), 0.3).unwrap();

        assert_relative_eq!(
            summary.cursor.x,
            position.x + glyphs_on_last_line as f32 * style.advance(),
            epsilon = 1e-5
        );
    }
}

#[test]
fn sentinels_leave_the_emitted_glyphs_unchanged() {
    let atlas = flush_atlas();
    let style = TextStyle::default();
    let still = WaveConfig::still();

    for marked in ["~A~B", "He~llo~\nwor~~ld", "~~~", "no markup"] {
        let plain: String = marked.chars().filter(|&c| c != '~').collect();

        let with_markup = record(|r| {
            draw_text_wave(r, &atlas, marked, Vec3::zeros(), &style, &still, 1.0).unwrap();
        });
        let without = record(|r| {
            draw_text(r, &atlas, &plain, Vec3::zeros(), &style).unwrap();
        });

        assert_eq!(with_markup, without, "{marked:?}");
    }
}

#[test]
fn glyphs_outside_wave_spans_stay_on_the_grid() {
    let atlas = flush_atlas();
    let style = unit_style();
    let text = "ab~cd~ef";

    let quads = record(|r| {
        draw_text_wave(r, &atlas, text, Vec3::zeros(), &style, &WaveConfig::default(), 2.0).unwrap();
    });

    for (i, quad) in quads.iter().enumerate() {
        let waving = (2..4).contains(&i);
        let on_grid = quad.dest.x == i as f32 && quad.elevation == 0.0 && quad.dest.y == 0.0;
        assert_eq!(on_grid, !waving, "glyph {i}");
    }
}

#[test]
fn equal_arguments_give_equal_output() {
    let atlas = offset_atlas();
    let style = TextStyle::default();
    let wave = WaveConfig::default();

    let draw = || {
        record(|r| {
            draw_text_wave(r, &atlas, "~Wavy~ text\n~again", Vec3::new(0.5, 1.0, -2.0), &style, &wave, 4.25)
                .unwrap();
        })
    };

    assert_eq!(draw(), draw());
}

#[test]
fn layers_step_down_by_layer_distance() {
    let atlas = flush_atlas();
    let position = Vec3::new(0.0, 3.0, 0.0);
    let compositor = LayerCompositor::new(5, 0.37);

    let quads = record(|r| {
        draw_layered(r, &atlas, "X", position, &unit_style(), &compositor, None).unwrap();
    });

    assert_eq!(quads.len(), 5);
    for (k, quad) in quads.iter().enumerate() {
        assert_eq!(quad.elevation, position.y - k as f32 * 0.37);
    }
}

#[test]
fn backface_doubles_quads_with_mirrored_source() {
    let atlas = offset_atlas();
    let style = TextStyle {
        backface: true,
        ..unit_style()
    };

    let quads = record(|r| {
        draw_text(r, &atlas, "abc", Vec3::zeros(), &style).unwrap();
    });

    assert_eq!(quads.len(), 6);
    for pair in quads.chunks(2) {
        let (front, back) = (pair[0], pair[1]);
        assert!(!front.backface && back.backface);
        assert_eq!(back.source.width, -front.source.width);
        assert_eq!(back.source.x, front.source.x + front.source.width);
        assert_eq!(back.dest, front.dest);
    }
}

#[test]
fn doubling_font_size_doubles_quads_and_offsets() {
    let atlas = offset_atlas();
    let small = TextStyle {
        font_size: 0.6,
        font_spacing: 0.1,
        ..unit_style()
    };
    let large = small.scaled(2.0);

    let a = record(|r| {
        draw_text(r, &atlas, "ab\ncd", Vec3::zeros(), &small).unwrap();
    });
    let b = record(|r| {
        draw_text(r, &atlas, "ab\ncd", Vec3::zeros(), &large).unwrap();
    });

    for (small_quad, large_quad) in a.iter().zip(&b) {
        assert_relative_eq!(large_quad.dest.width, 2.0 * small_quad.dest.width, epsilon = 1e-5);
        assert_relative_eq!(large_quad.dest.height, 2.0 * small_quad.dest.height, epsilon = 1e-5);
        assert_relative_eq!(large_quad.dest.x, 2.0 * small_quad.dest.x, epsilon = 1e-5);
        assert_relative_eq!(large_quad.dest.y, 2.0 * small_quad.dest.y, epsilon = 1e-5);
    }
}

#[test]
fn unknown_codepoints_render_the_fallback_glyph() {
    let atlas = flush_atlas();

    let quads = record(|r| {
        draw_text(r, &atlas, "\u{00e9}?", Vec3::zeros(), &unit_style()).unwrap();
    });

    assert_eq!(quads.len(), 2);
    assert_eq!(quads[0].source, quads[1].source);
}

#[test]
fn tint_reaches_every_quad() {
    let atlas = flush_atlas();
    let style = unit_style().tinted(Color::MAROON);

    let quads = record(|r| {
        draw_text(r, &atlas, "tint me", Vec3::zeros(), &style).unwrap();
    });

    assert!(quads.iter().all(|q| q.tint == Color::MAROON));
}
