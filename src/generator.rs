use std::{
    error::Error,
    path::{Path, PathBuf},
    result,
};

use ico::IconDir;
use image::{Rgba, RgbaImage};
use log::{debug, info, warn};

use crate::canvas::{Canvas, INDIGO, WHITE};
use crate::debug::TIME;
use crate::icon::{self, ICON_SIZES};
use crate::shape::{Circle, RoundedRect};
use crate::text::{self, FontSource, TextStyle};

type Result<T> = result::Result<T, Box<dyn Error>>;

pub const OUTPUT_FILE: &str = "app_icon.ico";

pub struct GeneratorBuilder {
    canvas_size: u32,
    padding: f32,
    corner_radius: f32,
    background: Rgba<u8>,
    foreground: Rgba<u8>,
    glyph: String,
    font: FontSource,
    font_size: f32,
    glyph_offset_y: f32,
    fallback_radius: f32,
    sizes: Vec<u32>,
    output: PathBuf,
}

impl GeneratorBuilder {
    pub fn new() -> Self {
        Self {
            canvas_size: 256,
            padding: 10.0,
            corner_radius: 40.0,
            background: INDIGO,
            foreground: WHITE,
            glyph: "文".to_owned(),
            font: FontSource::System("Arial".to_owned()),
            font_size: 140.0,
            glyph_offset_y: -20.0,
            fallback_radius: 68.0,
            sizes: ICON_SIZES.to_vec(),
            output: PathBuf::from(OUTPUT_FILE),
        }
    }

    pub fn with_canvas_size(mut self, s: u32) -> Self {
        self.canvas_size = s;
        self
    }

    pub fn with_padding(mut self, p: f32) -> Self {
        self.padding = p;
        self
    }

    pub fn with_corner_radius(mut self, r: f32) -> Self {
        self.corner_radius = r;
        self
    }

    pub fn with_background(mut self, c: Rgba<u8>) -> Self {
        self.background = c;
        self
    }

    pub fn with_foreground(mut self, c: Rgba<u8>) -> Self {
        self.foreground = c;
        self
    }

    pub fn with_glyph(mut self, s: String) -> Self {
        self.glyph = s;
        self
    }

    pub fn with_font(mut self, f: FontSource) -> Self {
        self.font = f;
        self
    }

    pub fn with_font_size(mut self, s: f32) -> Self {
        self.font_size = s;
        self
    }

    pub fn with_glyph_offset_y(mut self, o: f32) -> Self {
        self.glyph_offset_y = o;
        self
    }

    pub fn with_fallback_radius(mut self, r: f32) -> Self {
        self.fallback_radius = r;
        self
    }

    pub fn with_sizes(mut self, s: Vec<u32>) -> Self {
        self.sizes = s;
        self
    }

    pub fn with_output(mut self, p: PathBuf) -> Self {
        self.output = p;
        self
    }

    pub fn build(self) -> IconGenerator {
        IconGenerator { config: self }
    }
}

impl Default for GeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// What ended up in front of the background.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Foreground {
    Glyph,
    Fallback,
}

pub struct Rendering {
    pub image: RgbaImage,
    pub foreground: Foreground,
}

pub struct IconGenerator {
    config: GeneratorBuilder,
}

impl IconGenerator {
    pub fn output(&self) -> &Path {
        &self.config.output
    }

    pub fn sizes(&self) -> &[u32] {
        &self.config.sizes
    }

    /// Paints the canvas: background first, then the glyph or, when the font
    /// cannot be used, the fallback circle.
    pub fn render(&self) -> Rendering {
        TIME!("render canvas");
        let c = &self.config;

        let mut canvas = Canvas::new(c.canvas_size, c.canvas_size);
        canvas.fill(
            &RoundedRect::inset(c.canvas_size, c.padding, c.corner_radius),
            c.background,
        );

        let foreground = match self.draw_glyph(&mut canvas) {
            Ok(()) => Foreground::Glyph,
            Err(e) => {
                warn!("font load failed: {}, drawing fallback shape", e);
                canvas.fill(
                    &Circle::centered(c.canvas_size, c.fallback_radius),
                    c.foreground,
                );
                Foreground::Fallback
            }
        };
        debug!("foreground: {:?}", foreground);

        Rendering {
            image: canvas.into_image(),
            foreground,
        }
    }

    fn draw_glyph(&self, canvas: &mut Canvas) -> Result<()> {
        let c = &self.config;
        let font = c.font.load()?;
        let style = TextStyle {
            size: c.font_size,
            offset_y: c.glyph_offset_y,
            color: c.foreground,
        };
        text::draw_centered(canvas, &font, &c.glyph, &style)
    }

    pub fn encode(&self, image: &RgbaImage) -> Result<IconDir> {
        TIME!("encode icon");
        icon::encode(image, &self.config.sizes)
    }

    /// Renders, encodes and writes the icon, returning the path written.
    pub fn generate(&self) -> Result<PathBuf> {
        let rendering = self.render();
        let icon_dir = self.encode(&rendering.image)?;
        icon::save(&icon_dir, &self.config.output)?;

        info!(
            "wrote {} with sizes {:?}",
            self.config.output.display(),
            self.config.sizes
        );
        Ok(self.config.output.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::TRANSPARENT;

    fn without_font() -> GeneratorBuilder {
        GeneratorBuilder::new().with_font(FontSource::System("No Such Font Family".to_owned()))
    }

    #[test]
    fn defaults() {
        let generator = GeneratorBuilder::default().build();
        assert_eq!(generator.output(), Path::new("app_icon.ico"));
        assert_eq!(generator.sizes(), &[256, 128, 64, 48, 32, 16]);
    }

    #[test]
    fn fallback_draws_circle() {
        let rendering = without_font().build().render();
        assert_eq!(rendering.foreground, Foreground::Fallback);

        let image = &rendering.image;
        assert_eq!(image.dimensions(), (256, 256));
        assert_eq!(*image.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*image.get_pixel(128, 128), WHITE);
        assert_eq!(*image.get_pixel(128 + 60, 128), WHITE);
        assert_eq!(*image.get_pixel(128, 128 - 60), WHITE);
        assert_eq!(*image.get_pixel(128 + 75, 128), INDIGO);
        assert_eq!(*image.get_pixel(30, 128), INDIGO);
    }

    #[test]
    fn missing_font_file_falls_back() {
        let rendering = GeneratorBuilder::new()
            .with_font(FontSource::File(PathBuf::from("/nonexistent/font.ttf")))
            .build()
            .render();
        assert_eq!(rendering.foreground, Foreground::Fallback);
    }

    #[test]
    fn custom_colors() {
        let red = Rgba([200, 10, 10, 255]);
        let rendering = without_font()
            .with_background(red)
            .with_foreground(INDIGO)
            .with_fallback_radius(20.0)
            .build()
            .render();
        assert_eq!(*rendering.image.get_pixel(128, 128), INDIGO);
        assert_eq!(*rendering.image.get_pixel(128 + 40, 128), red);
    }

    #[test]
    fn encode_rejects_oversized_list() {
        let generator = without_font().with_canvas_size(64).build();
        let rendering = generator.render();
        assert!(generator.encode(&rendering.image).is_err());
    }
}
