//! CPU rasterizer
//!
//! Renders quads into an RGBA color buffer with a depth buffer, using
//! perspective-correct texture coordinates and nearest sampling. Output can be
//! written as PNG, which makes it the backend for headless rendering and for
//! checking depth and discard behavior in tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::foundation::color::Color;
use crate::foundation::math::{Mat4, Vec2, Vec3, Vec4};

use super::camera::Camera;
use super::rasterizer::{
    Rasterizer, ShaderHandle, ShaderLoader, TextureHandle, TextureUploader, TexturedQuad,
};
use super::shader::{self, AlphaDiscardShader};
use super::texture::AtlasImage;
use super::{RenderError, RenderResult};

/// Clip-space `w` below which a vertex counts as behind the camera
const MIN_CLIP_W: f32 = 1e-5;

/// Counters for the current frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RasterStats {
    /// Quads submitted
    pub quads: usize,
    /// Quads skipped by face culling
    pub culled: usize,
    /// Quads skipped for reaching behind the camera
    pub clipped: usize,
    /// Fragments written to the color buffer
    pub fragments: usize,
    /// Fragments dropped by the bound shader
    pub discarded: usize,
}

/// A projected vertex
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f32,
    y: f32,
    z: f32,
    inv_w: f32,
    uv_over_w: Vec2,
}

/// Software implementation of [`Rasterizer`]
pub struct SoftwareRasterizer {
    width: u32,
    height: u32,
    color: Vec<Color>,
    depth: Vec<f32>,
    textures: HashMap<TextureHandle, Arc<AtlasImage>>,
    shaders: Vec<f32>,
    camera: Option<Camera>,
    view_projection: Mat4,
    active_threshold: Option<f32>,
    active_shader: Option<ShaderHandle>,
    cull_faces: bool,
    stats: RasterStats,
}

impl SoftwareRasterizer {
    /// Create a frame of the given size, cleared to transparent black
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            color: vec![Color::BLANK; len],
            depth: vec![f32::INFINITY; len],
            textures: HashMap::new(),
            shaders: Vec::new(),
            camera: None,
            view_projection: Mat4::identity(),
            active_threshold: None,
            active_shader: None,
            cull_faces: true,
            stats: RasterStats::default(),
        }
    }

    /// Skip quads facing away from the camera
    ///
    /// When disabled, both the front quad and its mirrored backface are
    /// rasterized and the depth test decides which one shows.
    pub fn set_face_culling(&mut self, enabled: bool) {
        self.cull_faces = enabled;
    }

    /// Frame width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Counters since the last [`SoftwareRasterizer::clear`]
    pub fn stats(&self) -> RasterStats {
        self.stats
    }

    /// Fill the color buffer and reset depth and counters
    pub fn clear(&mut self, color: Color) {
        self.color.fill(color);
        self.depth.fill(f32::INFINITY);
        self.stats = RasterStats::default();
    }

    /// Color at `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        (x < self.width && y < self.height).then(|| self.color[self.index(x, y)])
    }

    /// Depth at `(x, y)`, infinite where nothing was drawn
    pub fn depth(&self, x: u32, y: u32) -> Option<f32> {
        (x < self.width && y < self.height).then(|| self.depth[self.index(x, y)])
    }

    /// Where a world-space point lands on screen, if in front of the camera
    pub fn project(&self, point: Vec3) -> Option<(f32, f32)> {
        self.to_screen(point, Vec2::zeros()).map(|v| (v.x, v.y))
    }

    /// Copy the color buffer into an image
    pub fn to_image(&self) -> RenderResult<image::RgbaImage> {
        let bytes: Vec<u8> = self
            .color
            .iter()
            .flat_map(|c| [c.r, c.g, c.b, c.a])
            .collect();

        image::RgbaImage::from_raw(self.width, self.height, bytes)
            .ok_or_else(|| RenderError::Image("color buffer size mismatch".to_string()))
    }

    /// Write the color buffer as a PNG file
    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        self.to_image()?
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| RenderError::Image(e.to_string()))?;
        log::debug!("Saved frame to {}", path.display());
        Ok(())
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + x as usize
    }

    fn to_screen(&self, point: Vec3, uv: Vec2) -> Option<ScreenVertex> {
        let clip = self.view_projection * Vec4::new(point.x, point.y, point.z, 1.0);
        if clip.w < MIN_CLIP_W {
            return None;
        }

        let inv_w = 1.0 / clip.w;
        let ndc = clip.xyz() * inv_w;
        Some(ScreenVertex {
            x: (ndc.x * 0.5 + 0.5) * self.width as f32,
            y: (0.5 - ndc.y * 0.5) * self.height as f32,
            z: ndc.z,
            inv_w,
            uv_over_w: uv * inv_w,
        })
    }

    fn blend(&mut self, index: usize, src: Color) {
        let dst = self.color[index].to_vec4();
        let s = src.to_vec4();
        let a = s.w;
        let rgb = s.xyz() * a + dst.xyz() * (1.0 - a);
        let alpha = a + dst.w * (1.0 - a);
        self.color[index] = Color::from_vec4(Vec4::new(rgb.x, rgb.y, rgb.z, alpha));
    }

    fn fill_triangle(&mut self, tri: [ScreenVertex; 3], texture: &AtlasImage, tint: Color) {
        let [a, b, c] = tri;
        let area = edge(&a, &b, c.x, c.y);
        if area.abs() < f32::EPSILON {
            return;
        }

        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as u32;
        let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as u32;
        let max_x = (a.x.max(b.x).max(c.x).ceil().max(0.0) as u32).min(self.width);
        let max_y = (a.y.max(b.y).max(c.y).ceil().max(0.0) as u32).min(self.height);

        let tex_size = Vec2::new(texture.width() as f32, texture.height() as f32);

        for py in min_y..max_y {
            for px in min_x..max_x {
                let (sx, sy) = (px as f32 + 0.5, py as f32 + 0.5);
                let w0 = edge(&b, &c, sx, sy) / area;
                let w1 = edge(&c, &a, sx, sy) / area;
                let w2 = edge(&a, &b, sx, sy) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let z = w0 * a.z + w1 * b.z + w2 * c.z;
                let index = self.index(px, py);
                if !(-1.0..=1.0).contains(&z) || z >= self.depth[index] {
                    continue;
                }

                let inv_w = w0 * a.inv_w + w1 * b.inv_w + w2 * c.inv_w;
                let uv = (a.uv_over_w * w0 + b.uv_over_w * w1 + c.uv_over_w * w2) / inv_w;
                let texel = texture.sample_nearest(uv.x * tex_size.x, uv.y * tex_size.y);

                let fragment = match self.active_threshold {
                    Some(threshold) => match shader::shade(texel, tint, threshold) {
                        Some(color) => color,
                        None => {
                            self.stats.discarded += 1;
                            continue;
                        }
                    },
                    None => texel.modulate(tint),
                };

                self.blend(index, fragment);
                self.depth[index] = z;
                self.stats.fragments += 1;
            }
        }
    }

    fn draw_line(&mut self, from: Vec3, to: Vec3, color: Color) {
        let (Some(a), Some(b)) = (
            self.to_screen(from, Vec2::zeros()),
            self.to_screen(to, Vec2::zeros()),
        ) else {
            return;
        };

        let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().max(1.0) as u32;
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let x = a.x + (b.x - a.x) * t;
            let y = a.y + (b.y - a.y) * t;
            if x < 0.0 || y < 0.0 || x >= self.width as f32 || y >= self.height as f32 {
                continue;
            }
            let index = self.index(x as u32, y as u32);
            self.blend(index, color);
        }
    }
}

/// Signed area of the parallelogram spanned by `a -> b` and `a -> (x, y)`
fn edge(a: &ScreenVertex, b: &ScreenVertex, x: f32, y: f32) -> f32 {
    (b.x - a.x) * (y - a.y) - (b.y - a.y) * (x - a.x)
}

impl Rasterizer for SoftwareRasterizer {
    fn begin_3d(&mut self, camera: &Camera) {
        self.view_projection = camera.view_projection_matrix();
        self.camera = Some(camera.clone());
    }

    fn end_3d(&mut self) {
        self.camera = None;
    }

    fn begin_shader(&mut self, shader: ShaderHandle) -> RenderResult<()> {
        let threshold = *self
            .shaders
            .get(shader.0 as usize)
            .ok_or(RenderError::UnknownShader(shader))?;
        if let Some(bound) = self.active_shader {
            return Err(RenderError::ShaderAlreadyBound(bound));
        }

        self.active_shader = Some(shader);
        self.active_threshold = Some(threshold);
        Ok(())
    }

    fn end_shader(&mut self) {
        self.active_shader = None;
        self.active_threshold = None;
    }

    fn draw_textured_quad(&mut self, quad: &TexturedQuad) -> RenderResult<()> {
        let camera_above = self
            .camera
            .as_ref()
            .ok_or(RenderError::NotIn3dMode)?
            .is_above(quad.elevation);
        let texture = Arc::clone(
            self.textures
                .get(&quad.texture)
                .ok_or(RenderError::UnknownTexture(quad.texture))?,
        );
        self.stats.quads += 1;

        if quad.dest.is_degenerate() {
            return Ok(());
        }

        if self.cull_faces && quad.backface == camera_above {
            self.stats.culled += 1;
            return Ok(());
        }

        let corners = quad.corners();
        let uvs = quad.uv_corners(texture.width(), texture.height());
        let mut screen = [None; 4];
        for (slot, (corner, uv)) in screen.iter_mut().zip(corners.iter().zip(uvs.iter())) {
            *slot = self.to_screen(*corner, *uv);
        }

        let [Some(tl), Some(bl), Some(br), Some(tr)] = screen else {
            log::trace!("Quad at {:?} reaches behind the camera, skipped", quad.dest);
            self.stats.clipped += 1;
            return Ok(());
        };

        self.fill_triangle([tl, bl, br], &texture, quad.tint);
        self.fill_triangle([tl, br, tr], &texture, quad.tint);
        Ok(())
    }

    fn draw_cube_wires(&mut self, center: Vec3, size: Vec3, color: Color) -> RenderResult<()> {
        if self.camera.is_none() {
            return Err(RenderError::NotIn3dMode);
        }

        let h = size * 0.5;
        let corner = |sx: f32, sy: f32, sz: f32| center + Vec3::new(sx * h.x, sy * h.y, sz * h.z);
        let edges = [
            ((-1.0, -1.0, -1.0), (1.0, -1.0, -1.0)),
            ((-1.0, -1.0, 1.0), (1.0, -1.0, 1.0)),
            ((-1.0, 1.0, -1.0), (1.0, 1.0, -1.0)),
            ((-1.0, 1.0, 1.0), (1.0, 1.0, 1.0)),
            ((-1.0, -1.0, -1.0), (-1.0, 1.0, -1.0)),
            ((1.0, -1.0, -1.0), (1.0, 1.0, -1.0)),
            ((-1.0, -1.0, 1.0), (-1.0, 1.0, 1.0)),
            ((1.0, -1.0, 1.0), (1.0, 1.0, 1.0)),
            ((-1.0, -1.0, -1.0), (-1.0, -1.0, 1.0)),
            ((1.0, -1.0, -1.0), (1.0, -1.0, 1.0)),
            ((-1.0, 1.0, -1.0), (-1.0, 1.0, 1.0)),
            ((1.0, 1.0, -1.0), (1.0, 1.0, 1.0)),
        ];

        for ((ax, ay, az), (bx, by, bz)) in edges {
            self.draw_line(corner(ax, ay, az), corner(bx, by, bz), color);
        }
        Ok(())
    }
}

impl TextureUploader for SoftwareRasterizer {
    fn upload_texture(&mut self, image: &AtlasImage) -> RenderResult<TextureHandle> {
        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.insert(handle, Arc::new(image.clone()));
        Ok(handle)
    }
}

impl ShaderLoader for SoftwareRasterizer {
    fn load_shader(&mut self, shader: &AlphaDiscardShader) -> RenderResult<ShaderHandle> {
        self.shaders.push(shader.threshold());
        Ok(ShaderHandle(self.shaders.len() as u32 - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Rect;

    fn top_down_camera() -> Camera {
        let mut camera = Camera::perspective(Vec3::new(0.0, 10.0, 0.0), 45.0, 1.0, 0.1, 100.0);
        camera.look_at(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        camera
    }

    fn opaque_quad(texture: TextureHandle, elevation: f32, tint: Color) -> TexturedQuad {
        TexturedQuad {
            texture,
            source: Rect::new(0.0, 0.0, 2.0, 2.0),
            dest: Rect::new(-1.0, -1.0, 2.0, 2.0),
            elevation,
            origin: Vec2::zeros(),
            rotation: 0.0,
            tint,
            backface: false,
        }
    }

    #[test]
    fn test_draw_requires_3d_mode() {
        let mut raster = SoftwareRasterizer::new(8, 8);
        let texture = raster.upload_texture(&AtlasImage::new(2, 2)).unwrap();

        assert!(matches!(
            raster.draw_textured_quad(&opaque_quad(texture, 0.0, Color::WHITE)),
            Err(RenderError::NotIn3dMode)
        ));
    }

    #[test]
    fn test_nearer_quad_wins_depth_test() {
        let mut raster = SoftwareRasterizer::new(16, 16);
        let texture = raster
            .upload_texture(&AtlasImage::from_coverage(2, 2, &[255; 4]).unwrap())
            .unwrap();

        raster.begin_3d(&top_down_camera());
        raster
            .draw_textured_quad(&opaque_quad(texture, 1.0, Color::RED))
            .unwrap();
        raster
            .draw_textured_quad(&opaque_quad(texture, 0.0, Color::GREEN))
            .unwrap();
        raster.end_3d();

        assert_eq!(raster.pixel(8, 8), Some(Color::RED));
    }

    #[test]
    fn test_backface_culled_from_above() {
        let mut raster = SoftwareRasterizer::new(16, 16);
        let texture = raster
            .upload_texture(&AtlasImage::from_coverage(2, 2, &[255; 4]).unwrap())
            .unwrap();
        let mut back = opaque_quad(texture, 0.0, Color::RED);
        back.backface = true;
        back.source = back.source.mirrored();

        raster.begin_3d(&top_down_camera());
        raster.draw_textured_quad(&back).unwrap();
        raster.end_3d();

        assert_eq!(raster.stats().culled, 1);
        assert_eq!(raster.pixel(8, 8), Some(Color::BLANK));
    }

    #[test]
    fn test_png_round_trip_dimensions() {
        let raster = SoftwareRasterizer::new(5, 3);
        let image = raster.to_image().unwrap();
        assert_eq!(image.dimensions(), (5, 3));
    }
}
