use super::contour::find_external_contours;
use super::error::VisionError;
use super::frame::Mask;
use super::geometry::{approx_poly_dp, arc_length, bounding_rect, pixel_area, solidity, Point};
use image::DynamicImage;
use log::trace;

/// Shape criteria for rectangular contours.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCriteria {
    pub min_area: f64,
    pub max_area: f64,
    /// 长边/短边，总是 >= 1
    pub aspect_ratio_range: (f64, f64),
    pub epsilon_factor: f64,
    pub min_solidity: f64,
}

impl Default for RectCriteria {
    fn default() -> Self {
        Self {
            min_area: 100.0,
            max_area: f64::INFINITY,
            aspect_ratio_range: (1.0, 4.0),
            epsilon_factor: 0.02,
            min_solidity: 0.8,
        }
    }
}

pub struct ContourExtractor {
    criteria: RectCriteria,
}

impl ContourExtractor {
    pub fn new(criteria: RectCriteria) -> Self {
        Self { criteria }
    }

    pub fn criteria(&self) -> &RectCriteria {
        &self.criteria
    }

    /// 从二值掩码中提取符合矩形特征的外轮廓
    pub fn extract(&self, mask: &Mask) -> Vec<Vec<Point>> {
        find_external_contours(mask)
            .into_iter()
            .filter(|contour| self.accepts(contour))
            .collect()
    }

    /// Same as [`extract`](Self::extract) for an arbitrary image; anything other
    /// than single-channel 8-bit is rejected.
    pub fn extract_from_image(&self, image: &DynamicImage) -> Result<Vec<Vec<Point>>, VisionError> {
        let mask = Mask::try_from(image)?;
        Ok(self.extract(&mask))
    }

    fn accepts(&self, contour: &[Point]) -> bool {
        let c = &self.criteria;

        let area = pixel_area(contour);
        if area < c.min_area || area > c.max_area {
            return false;
        }

        let epsilon = c.epsilon_factor * arc_length(contour);
        let vertices = approx_poly_dp(contour, epsilon).len();
        if vertices != 4 {
            trace!("contour rejected: {} vertices", vertices);
            return false;
        }

        let Some(bbox) = bounding_rect(contour) else {
            return false;
        };
        let long = bbox.width.max(bbox.height) as f64;
        let short = bbox.width.min(bbox.height) as f64;
        let ratio = long / short;
        if ratio < c.aspect_ratio_range.0 || ratio > c.aspect_ratio_range.1 {
            trace!("contour rejected: aspect ratio {:.2}", ratio);
            return false;
        }

        let solidity = solidity(contour);
        if solidity < c.min_solidity {
            trace!("contour rejected: solidity {:.2}", solidity);
            return false;
        }

        true
    }
}

impl Default for ContourExtractor {
    fn default() -> Self {
        Self::new(RectCriteria::default())
    }
}
