use std::fmt;
use std::str::FromStr;

use crate::assets::source::{SourceFormat, SourceImage};
use crate::foundation::config::MaskwrightConfig;
use crate::foundation::core::Size;
use crate::foundation::error::{MaskError, MaskResult};
use crate::foundation::math::Fnv1a64;
use crate::mask::synth::{WorkingMask, warn_if_degenerate};
use crate::submit::multipart::{self, FormPart};

pub const DEFAULT_MODEL: &str = "gpt-image-1";
pub const MAX_IMAGES_PER_REQUEST: u8 = 10;

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident, $what:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = MaskError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(MaskError::validation(format!(
                        "unknown {} '{other}'; expected one of {}",
                        $what,
                        [$($text),+].join(", ")
                    ))),
                }
            }
        }
    };
}

string_enum!(
    /// Rendering quality requested from the backend.
    Quality, "quality" {
        Low => "low",
        Medium => "medium",
        High => "high",
        Auto => "auto",
    }
);

string_enum!(
    /// Encoding of the generated images.
    OutputFormat, "output format" {
        Png => "png",
        Webp => "webp",
        Jpeg => "jpeg",
    }
);

string_enum!(
    /// Output canvas size.
    ImageSize, "size" {
        Auto => "auto",
        Square => "1024x1024",
        Landscape => "1536x1024",
        Portrait => "1024x1536",
    }
);

impl Default for Quality {
    fn default() -> Self {
        Self::Auto
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Png
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self::Auto
    }
}

impl OutputFormat {
    /// Formats whose encoder takes a compression level.
    pub fn supports_compression(self) -> bool {
        matches!(self, Self::Webp | Self::Jpeg)
    }
}

/// Backend parameters sent alongside the image and mask.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditParams {
    pub model: String,
    pub quality: Quality,
    pub size: ImageSize,
    pub output_format: OutputFormat,
    /// Number of images to generate, `1..=10`.
    pub n: u8,
    /// `0..=100`; only sent for webp/jpeg output below 100.
    pub output_compression: u8,
}

impl Default for EditParams {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_owned(),
            quality: Quality::default(),
            size: ImageSize::default(),
            output_format: OutputFormat::default(),
            n: 1,
            output_compression: 100,
        }
    }
}

impl EditParams {
    pub fn validate(&self) -> MaskResult<()> {
        if self.model.trim().is_empty() {
            return Err(MaskError::validation("model must not be empty"));
        }
        if !(1..=MAX_IMAGES_PER_REQUEST).contains(&self.n) {
            return Err(MaskError::validation(format!(
                "n must be in 1..={MAX_IMAGES_PER_REQUEST}, got {}",
                self.n
            )));
        }
        if self.output_compression > 100 {
            return Err(MaskError::validation(format!(
                "output_compression must be in 0..=100, got {}",
                self.output_compression
            )));
        }
        Ok(())
    }

    fn sends_compression(&self) -> bool {
        self.output_format.supports_compression() && self.output_compression != 100
    }
}

/// An encoded image ready for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub format: SourceFormat,
    pub size: Size,
}

impl EncodedImage {
    pub fn filename(&self, stem: &str) -> String {
        format!("{stem}.{}", self.format.extension())
    }
}

/// Everything the edit backend needs for one request. Built once, never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditRequest {
    image: EncodedImage,
    mask: EncodedImage,
    prompt: String,
    params: EditParams,
    downscaled: bool,
}

impl EditRequest {
    pub fn image(&self) -> &EncodedImage {
        &self.image
    }

    pub fn mask(&self) -> &EncodedImage {
        &self.mask
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn params(&self) -> &EditParams {
        &self.params
    }

    /// True when the source was re-encoded to fit the upload budget.
    pub fn was_downscaled(&self) -> bool {
        self.downscaled
    }

    fn form_parts(&self) -> Vec<FormPart<'_>> {
        let p = &self.params;
        let mut parts = vec![
            FormPart::text("prompt", self.prompt.as_str()),
            FormPart::text("model", p.model.as_str()),
            FormPart::text("n", p.n.to_string()),
            FormPart::text("size", p.size.as_str()),
            FormPart::text("quality", p.quality.as_str()),
            FormPart::text("output_format", p.output_format.as_str()),
        ];
        if p.sends_compression() {
            parts.push(FormPart::text(
                "output_compression",
                p.output_compression.to_string(),
            ));
        }
        parts.push(FormPart::file(
            "image",
            self.image.filename("image"),
            self.image.format.mime(),
            &self.image.bytes,
        ));
        parts.push(FormPart::file(
            "mask",
            self.mask.filename("mask"),
            self.mask.format.mime(),
            &self.mask.bytes,
        ));
        parts
    }

    /// Deterministic boundary that occurs in no part of this request.
    pub fn multipart_boundary(&self) -> String {
        let parts = self.form_parts();
        let mut seed = 0u64;
        loop {
            let mut h = Fnv1a64::new_default();
            h.write_u64(seed);
            for part in &parts {
                h.write_bytes(part.name.as_bytes());
                h.write_u64(part.body.len() as u64);
                h.write_bytes(&part.body[..part.body.len().min(4096)]);
            }
            let boundary = format!("maskwright-{:016x}", h.finish());
            if multipart::boundary_is_safe(&parts, &boundary) {
                return boundary;
            }
            seed += 1;
        }
    }

    /// Encode as a `multipart/form-data` body.
    pub fn to_multipart(&self, boundary: &str) -> MaskResult<Vec<u8>> {
        let parts = self.form_parts();
        if boundary.is_empty() || !multipart::boundary_is_safe(&parts, boundary) {
            return Err(MaskError::encode(format!(
                "multipart boundary '{boundary}' is empty or occurs in the payload"
            )));
        }
        Ok(multipart::encode(&parts, boundary))
    }
}

/// Package mask, source and parameters into an [`EditRequest`].
///
/// Checks run cheapest first: the prompt, then the parameters, then the mask. Sources above
/// `config.downscale_threshold_bytes` are resized to fit `downscale_max_dimension`, flattened
/// onto white and re-encoded as JPEG; the mask follows the image to the same dimensions.
#[tracing::instrument(
    skip(source, mask, prompt, params, config),
    fields(source_size = %source.size(), source_bytes = source.byte_len())
)]
pub fn build_edit_request(
    source: &SourceImage,
    mask: &WorkingMask,
    prompt: &str,
    params: EditParams,
    config: &MaskwrightConfig,
) -> MaskResult<EditRequest> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(MaskError::validation("prompt must not be empty"));
    }
    params.validate()?;
    if mask.size() != source.size() {
        return Err(MaskError::validation(format!(
            "mask is {} but the source image is {}",
            mask.size(),
            source.size()
        )));
    }

    let stats = mask.stats();
    if warn_if_degenerate(&stats) && !config.allow_degenerate_mask {
        return Err(MaskError::DegenerateMask);
    }

    let (image, downscaled) = if source.byte_len() > config.downscale_threshold_bytes {
        (downscale_source(source, config)?, true)
    } else {
        let image = EncodedImage {
            bytes: source.bytes().to_vec(),
            format: source.format(),
            size: source.size(),
        };
        (image, false)
    };

    let mask = mask.resized(image.size)?;
    let stats = if image.size == source.size() {
        stats
    } else {
        // Nearest-neighbour downscaling can drop thin edit regions entirely.
        let resized = mask.stats();
        if warn_if_degenerate(&resized) && !config.allow_degenerate_mask {
            return Err(MaskError::DegenerateMask);
        }
        resized
    };
    let mask = EncodedImage {
        bytes: mask.encode_png()?,
        format: SourceFormat::Png,
        size: mask.size(),
    };

    tracing::debug!(
        image = %image.size,
        image_bytes = image.bytes.len(),
        mask_bytes = mask.bytes.len(),
        edit_fraction = stats.edit_fraction(),
        "edit request built"
    );
    Ok(EditRequest {
        image,
        mask,
        prompt: prompt.to_owned(),
        params,
        downscaled,
    })
}

fn downscale_source(source: &SourceImage, config: &MaskwrightConfig) -> MaskResult<EncodedImage> {
    let decoded = source.decode()?;
    let target = source.size().fit_within(config.downscale_max_dimension);
    tracing::debug!(
        from = %source.size(),
        to = %target,
        bytes = source.byte_len(),
        threshold = config.downscale_threshold_bytes,
        "downscaling source for upload"
    );

    let resized = if target == source.size() {
        decoded
    } else {
        decoded.resize_exact(
            target.width,
            target.height,
            image::imageops::FilterType::Triangle,
        )
    };
    let flat = flatten_onto_white(&resized.to_rgba8());

    let mut bytes = Vec::new();
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, config.downscale_jpeg_quality);
    image::DynamicImage::ImageRgb8(flat)
        .write_with_encoder(encoder)
        .map_err(|e| MaskError::encode(format!("encode downscaled jpeg: {e}")))?;

    Ok(EncodedImage {
        bytes,
        format: SourceFormat::Jpeg,
        size: target,
    })
}

/// Composite straight-alpha RGBA over opaque white.
fn flatten_onto_white(rgba: &image::RgbaImage) -> image::RgbImage {
    image::RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let a = u16::from(a);
        let mix = |c: u8| -> u8 { ((u16::from(c) * a + 255 * (255 - a) + 127) / 255) as u8 };
        image::Rgb([mix(r), mix(g), mix(b)])
    })
}

#[cfg(test)]
#[path = "../../tests/unit/submit/request.rs"]
mod tests;
