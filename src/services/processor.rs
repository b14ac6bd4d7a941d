use anyhow::{Result, anyhow};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Encodings the transform stage can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    Webp,
    Gif,
}

impl OutputFormat {
    /// Parses a client-supplied format string. `jpg` is accepted as an
    /// alias for `jpeg`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Gif => "gif",
        }
    }

    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Gif => "image/gif",
        }
    }

    const fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Webp => ImageFormat::WebP,
            Self::Gif => ImageFormat::Gif,
        }
    }
}

/// A fully validated transform request. All values are neutral by default,
/// so applying the default options is a pure re-encode.
#[derive(Debug, Clone, Copy)]
pub struct TransformOptions {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub rotation_quarters: u8,
    pub format: OutputFormat,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
            rotation_quarters: 0,
            format: OutputFormat::Jpeg,
        }
    }
}

impl TransformOptions {
    fn is_neutral_color(&self) -> bool {
        (self.brightness - 1.0).abs() <= f32::EPSILON
            && (self.contrast - 1.0).abs() <= f32::EPSILON
            && (self.saturation - 1.0).abs() <= f32::EPSILON
    }
}

/// Converts a rotation in degrees to quarter turns, or `None` if the angle
/// is not a multiple of 90. Negative angles rotate counter-clockwise.
pub fn quarter_turns(rotation_degrees: i32) -> Option<u8> {
    if rotation_degrees % 90 != 0 {
        return None;
    }
    Some((rotation_degrees.rem_euclid(360) / 90) as u8)
}

/// Decodes `input`, applies rotation then the color adjustment, and encodes
/// to the requested output format.
///
/// The order is fixed: rotate first, color second, encode last. CPU-bound;
/// callers run this on the blocking pool.
pub fn transform_image(input: &[u8], opts: &TransformOptions) -> Result<Vec<u8>> {
    let decoded =
        image::load_from_memory(input).map_err(|e| anyhow!("failed to decode image: {}", e))?;

    let rotated = match opts.rotation_quarters % 4 {
        0 => decoded,
        1 => decoded.rotate90(),
        2 => decoded.rotate180(),
        _ => decoded.rotate270(),
    };

    let adjusted = if opts.is_neutral_color() {
        rotated
    } else {
        adjust_colors(&rotated, opts.brightness, opts.contrast, opts.saturation)
    };

    encode(adjusted, opts.format)
}

/// Per-pixel multiplicative color adjustment.
///
/// Saturation scales each channel's distance from the Rec.709 luma,
/// brightness scales the channel value, contrast scales the distance from
/// mid-gray. Channels clamp to [0, 1]; alpha passes through.
fn adjust_colors(img: &DynamicImage, brightness: f32, contrast: f32, saturation: f32) -> DynamicImage {
    let mut rgba = img.to_rgba8();

    for pixel in rgba.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let mut rf = f32::from(r) / 255.0;
        let mut gf = f32::from(g) / 255.0;
        let mut bf = f32::from(b) / 255.0;

        let luma = 0.2126 * rf + 0.7152 * gf + 0.0722 * bf;
        rf = luma + (rf - luma) * saturation;
        gf = luma + (gf - luma) * saturation;
        bf = luma + (bf - luma) * saturation;

        rf *= brightness;
        gf *= brightness;
        bf *= brightness;

        rf = (rf - 0.5).mul_add(contrast, 0.5);
        gf = (gf - 0.5).mul_add(contrast, 0.5);
        bf = (bf - 0.5).mul_add(contrast, 0.5);

        *pixel = image::Rgba([
            float_to_u8(rf),
            float_to_u8(gf),
            float_to_u8(bf),
            a,
        ]);
    }

    DynamicImage::ImageRgba8(rgba)
}

fn float_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn encode(img: DynamicImage, format: OutputFormat) -> Result<Vec<u8>> {
    // JPEG has no alpha channel
    let img = match format {
        OutputFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        _ => img,
    };

    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), format.image_format())
        .map_err(|e| anyhow!("failed to encode {}: {}", format.extension(), e))?;
    Ok(out)
}
