//! Terminal image preview.
//!
//! Images are drawn with upper-half-block cells: each cell shows two pixels,
//! the top one as foreground and the bottom one as background.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use media::center_half_region;
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

const HALF_BLOCK: &str = "\u{2580}";
const GUIDE_COLOR: Rgb<u8> = Rgb([255, 210, 0]);

/// Scale `image` to fit `cols` x `rows` cells, keeping its aspect ratio.
pub fn fit(image: &RgbImage, cols: u16, rows: u16) -> Option<RgbImage> {
    let (max_w, max_h) = (u32::from(cols), u32::from(rows) * 2);
    if max_w == 0 || max_h == 0 || image.width() == 0 || image.height() == 0 {
        return None;
    }
    let scale = f64::min(
        f64::from(max_w) / f64::from(image.width()),
        f64::from(max_h) / f64::from(image.height()),
    );
    let width = ((f64::from(image.width()) * scale) as u32).clamp(1, max_w);
    let height = ((f64::from(image.height()) * scale) as u32).clamp(1, max_h);
    Some(imageops::resize(image, width, height, FilterType::Triangle))
}

/// Outline the capture region (centered, half of each dimension).
pub fn draw_guide(image: &mut RgbImage) {
    let region = center_half_region(image.width(), image.height());
    if region.width == 0 || region.height == 0 {
        return;
    }
    let (x0, y0) = (region.x, region.y);
    let (x1, y1) = (region.x + region.width - 1, region.y + region.height - 1);
    for x in x0..=x1 {
        image.put_pixel(x, y0, GUIDE_COLOR);
        image.put_pixel(x, y1, GUIDE_COLOR);
    }
    for y in y0..=y1 {
        image.put_pixel(x0, y, GUIDE_COLOR);
        image.put_pixel(x1, y, GUIDE_COLOR);
    }
}

fn color(pixel: &Rgb<u8>) -> Color {
    Color::Rgb(pixel[0], pixel[1], pixel[2])
}

/// Convert an already-fitted image into half-block lines.
pub fn to_lines(image: &RgbImage) -> Vec<Line<'static>> {
    (0..image.height())
        .step_by(2)
        .map(|y| {
            let spans = (0..image.width())
                .map(|x| {
                    let top = image.get_pixel(x, y);
                    let style = if y + 1 < image.height() {
                        Style::default().fg(color(top)).bg(color(image.get_pixel(x, y + 1)))
                    } else {
                        Style::default().fg(color(top))
                    };
                    Span::styled(HALF_BLOCK, style)
                })
                .collect::<Vec<_>>();
            Line::from(spans)
        })
        .collect()
}

/// Fit, optionally outline, and convert `image` for a `cols` x `rows` area.
pub fn image_lines(image: &RgbImage, cols: u16, rows: u16, guide: bool) -> Vec<Line<'static>> {
    let Some(mut fitted) = fit(image, cols, rows) else {
        return Vec::new();
    };
    if guide {
        draw_guide(&mut fitted);
    }
    to_lines(&fitted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_keeps_aspect_ratio() {
        let img = RgbImage::new(640, 480);
        let fitted = fit(&img, 40, 40).unwrap();
        assert_eq!(fitted.width(), 40);
        assert_eq!(fitted.height(), 30);
    }

    #[test]
    fn fit_rejects_empty_area() {
        assert!(fit(&RgbImage::new(10, 10), 0, 5).is_none());
    }

    #[test]
    fn two_pixel_rows_per_line() {
        let mut img = RgbImage::from_pixel(3, 4, Rgb([0, 0, 0]));
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(0, 1, Rgb([0, 0, 255]));

        let lines = to_lines(&img);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans.len(), 3);
        let style = lines[0].spans[0].style;
        assert_eq!(style.fg, Some(Color::Rgb(255, 0, 0)));
        assert_eq!(style.bg, Some(Color::Rgb(0, 0, 255)));
    }

    #[test]
    fn guide_outlines_center_half() {
        let mut img = RgbImage::from_pixel(8, 8, Rgb([0, 0, 0]));
        draw_guide(&mut img);
        assert_eq!(*img.get_pixel(2, 2), GUIDE_COLOR);
        assert_eq!(*img.get_pixel(5, 5), GUIDE_COLOR);
        assert_eq!(*img.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*img.get_pixel(3, 3), Rgb([0, 0, 0]));
    }
}
