use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::export::ExportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Jpeg,
    Png,
    Webp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageUnit {
    Pt,
    Mm,
    Cm,
    #[default]
    In,
    Px,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    A3,
    A4,
    A5,
    #[default]
    Letter,
    Legal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl ImageFormat {
    pub fn name(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }
}

impl PageUnit {
    pub fn name(self) -> &'static str {
        match self {
            Self::Pt => "pt",
            Self::Mm => "mm",
            Self::Cm => "cm",
            Self::In => "in",
            Self::Px => "px",
        }
    }
}

impl PageFormat {
    pub fn name(self) -> &'static str {
        match self {
            Self::A3 => "a3",
            Self::A4 => "a4",
            Self::A5 => "a5",
            Self::Letter => "letter",
            Self::Legal => "legal",
        }
    }
}

impl Orientation {
    pub fn name(self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }
}

/// Configuration handed to the paginating back end with the markup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Page margin, in `page_unit`
    pub margin: f64,
    /// Name of the produced artifact
    pub filename: String,
    /// Encoding of rasterised page images
    pub image_format: ImageFormat,
    /// Raster quality, `0 < q <= 1`
    pub image_quality: f64,
    /// Rasterisation scale factor
    pub raster_scale: f64,
    pub page_unit: PageUnit,
    pub page_format: PageFormat,
    pub orientation: Orientation,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            margin: 1.0,
            filename: "mydocument.pdf".to_string(),
            image_format: ImageFormat::Jpeg,
            image_quality: 0.98,
            raster_scale: 2.0,
            page_unit: PageUnit::In,
            page_format: PageFormat::Letter,
            orientation: Orientation::Portrait,
        }
    }
}

impl ExportOptions {
    pub fn validate(&self) -> Result<(), ExportError> {
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(ExportError::InvalidOptions(format!(
                "margin must be a non-negative number, got {}",
                self.margin
            )));
        }
        if self.filename.trim().is_empty() {
            return Err(ExportError::InvalidOptions("filename is empty".to_string()));
        }
        if self.filename.contains(['/', '\\']) {
            return Err(ExportError::InvalidOptions(format!(
                "filename must not contain a path: {}",
                self.filename
            )));
        }
        if !(self.image_quality > 0.0 && self.image_quality <= 1.0) {
            return Err(ExportError::InvalidOptions(format!(
                "image quality must be in (0, 1], got {}",
                self.image_quality
            )));
        }
        if !self.raster_scale.is_finite() || self.raster_scale <= 0.0 {
            return Err(ExportError::InvalidOptions(format!(
                "raster scale must be positive, got {}",
                self.raster_scale
            )));
        }
        Ok(())
    }

    /// Options in the layout browser-based paginators read
    pub fn to_renderer_json(&self) -> serde_json::Value {
        json!({
            "margin": self.margin,
            "filename": self.filename,
            "image": {
                "type": self.image_format,
                "quality": self.image_quality,
            },
            "html2canvas": { "scale": self.raster_scale },
            "jsPDF": {
                "unit": self.page_unit,
                "format": self.page_format,
                "orientation": self.orientation,
            },
        })
    }
}
