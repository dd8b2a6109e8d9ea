// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page compositor — shrink a raster image to fit a fixed-size page, centre it
// on a white canvas, and hand the canvas to the PDF writer. Operates on
// in-memory images using the `image` crate.

use docmill_core::PaperSize;
use docmill_core::error::{DocmillError, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use tracing::{debug, instrument};

/// Where the scaled source image sits on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Left edge of the scaled image.
    pub x: u32,
    /// Top edge of the scaled image.
    pub y: u32,
    /// Scaled image width.
    pub width: u32,
    /// Scaled image height.
    pub height: u32,
}

impl Placement {
    /// Shrink-to-fit placement of a `image_width` x `image_height` image on a
    /// `page_width` x `page_height` page. Never enlarges.
    pub fn fit(image_width: u32, image_height: u32, page_width: u32, page_height: u32) -> Self {
        let image_width = image_width.max(1);
        let image_height = image_height.max(1);

        let scale = (page_width as f64 / image_width as f64)
            .min(page_height as f64 / image_height as f64)
            .min(1.0);

        let width = ((image_width as f64 * scale).round() as u32).clamp(1, page_width.max(1));
        let height = ((image_height as f64 * scale).round() as u32).clamp(1, page_height.max(1));

        Self {
            x: page_width.saturating_sub(width) / 2,
            y: page_height.saturating_sub(height) / 2,
            width,
            height,
        }
    }

    /// Margins around the image as (left, right, top, bottom).
    pub fn margins(&self, page_width: u32, page_height: u32) -> (u32, u32, u32, u32) {
        (
            self.x,
            page_width.saturating_sub(self.x + self.width),
            self.y,
            page_height.saturating_sub(self.y + self.height),
        )
    }
}

/// A finished page: a page-sized RGB raster with the source image pasted in.
#[derive(Debug, Clone)]
pub struct PageCanvas {
    image: RgbImage,
    placement: Placement,
}

impl PageCanvas {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Borrow the composited pixels.
    pub fn as_rgb(&self) -> &RgbImage {
        &self.image
    }
}

/// Places source images onto fixed-size, white page canvases.
///
/// The compositor holds no mutable state; one instance can serve every
/// request.
///
/// ```ignore
/// let compositor = PageCompositor::new(PaperSize::A4);
/// let canvas = compositor.compose_bytes(&jpeg_bytes)?;
/// assert_eq!((canvas.width(), canvas.height()), (595, 842));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PageCompositor {
    page_width: u32,
    page_height: u32,
    background: Rgb<u8>,
}

impl PageCompositor {
    /// Compositor producing canvases of the given paper size, one pixel per
    /// point.
    pub fn new(paper_size: PaperSize) -> Self {
        let (page_width, page_height) = paper_size.dimensions_pt();
        Self::with_dimensions(page_width, page_height)
    }

    /// Compositor for an explicit page size in pixels.
    pub fn with_dimensions(page_width: u32, page_height: u32) -> Self {
        Self {
            page_width,
            page_height,
            background: Rgb([255, 255, 255]),
        }
    }

    /// Decode an encoded image (JPEG, PNG, ...) and compose it onto a page.
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    pub fn compose_bytes(&self, data: &[u8]) -> Result<PageCanvas> {
        let image = ::image::load_from_memory(data)
            .map_err(|err| DocmillError::Decode(format!("failed to decode image: {}", err)))?;
        Ok(self.compose_on_page(&image))
    }

    /// Shrink `image` to fit the page (aspect ratio preserved, never
    /// enlarged) and paste it centred on a white canvas.
    pub fn compose_on_page(&self, image: &DynamicImage) -> PageCanvas {
        let placement = Placement::fit(
            image.width(),
            image.height(),
            self.page_width,
            self.page_height,
        );

        let scaled: RgbImage =
            if placement.width == image.width() && placement.height == image.height() {
                image.to_rgb8()
            } else {
                image
                    .resize_exact(placement.width, placement.height, FilterType::Lanczos3)
                    .to_rgb8()
            };

        let mut canvas = RgbImage::from_pixel(self.page_width, self.page_height, self.background);
        imageops::replace(
            &mut canvas,
            &scaled,
            i64::from(placement.x),
            i64::from(placement.y),
        );

        debug!(
            from_w = image.width(),
            from_h = image.height(),
            to_w = placement.width,
            to_h = placement.height,
            x = placement.x,
            y = placement.y,
            "Image composed on page"
        );

        PageCanvas {
            image: canvas,
            placement,
        }
    }

    /// Compose each image onto its own page, preserving input order.
    pub fn compose_multi_page(&self, images: &[DynamicImage]) -> Vec<PageCanvas> {
        images
            .iter()
            .map(|image| self.compose_on_page(image))
            .collect()
    }
}
