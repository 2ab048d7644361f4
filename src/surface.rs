// Paint surface the simulation draws through. Callers work in field
// coordinates; ImageSurface scales them up to pixels and renders with the
// image/imageproc primitives. Strokes are stamped along the segment so a
// two stop gradient and a soft glow can ride on top of plain line drawing.

use geo::algorithm::euclidean_distance::EuclideanDistance;
use geo::Coordinate;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;
use imageproc::pixelops;

use crate::color::Color;

type Point2D = Coordinate<f64>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineCap {
    Round,
    Square,
}

pub trait PaintSurface {
    fn set_line_width(&mut self, width : f64);
    fn set_line_cap(&mut self, cap : LineCap);
    fn set_glow(&mut self, color : Color, blur : f64);
    fn fill_rect(&mut self, x : f64, y : f64, width : f64, height : f64, color : Color);
    // Stroke a segment with a linear gradient from start to end
    fn stroke_line(&mut self, x0 : f64, y0 : f64, x1 : f64, y1 : f64, start : Color, end : Color);
    // Fill a circle with a radial gradient from center to edge
    fn fill_circle(&mut self, x : f64, y : f64, radius : f64, center : Color, edge : Color);
}

pub struct ImageSurface {
    img : RgbImage,
    scale : f64,
    line_width : f64,
    line_cap : LineCap,
    glow_color : Color,
    glow_blur : f64,
}

// Peak alpha of a glow stamp at its center
const GLOW_ALPHA : f64 = 0.25;

impl ImageSurface {
    pub fn init(field_width : i32, field_height : i32, scale : u32) -> ImageSurface {
        ImageSurface {
            img : RgbImage::new(field_width as u32 * scale, field_height as u32 * scale),
            scale : f64::from(scale),
            line_width : 1.0,
            line_cap : LineCap::Round,
            glow_color : Color::init(0.0, 0.0, 0.0),
            glow_blur : 0.0,
        }
    }

    pub fn image(self : &Self) -> &RgbImage {
        &self.img
    }

    fn blend(self : &mut Self, x : i64, y : i64, color : Color, alpha : f64) {
        if x < 0 || y < 0 || x >= i64::from(self.img.width()) || y >= i64::from(self.img.height()) {
            return;
        }
        let weight = (alpha * color.a).max(0.0).min(1.0) as f32;
        if weight <= 0.0 {
            return;
        }
        let existing = *self.img.get_pixel(x as u32, y as u32);
        let mixed = pixelops::interpolate(to_rgb(color), existing, weight);
        self.img.put_pixel(x as u32, y as u32, mixed);
    }

    // Opaque disc with an antialiased rim. Large discs get their interior
    // from the bulk circle fill and only the rim is blended per pixel.
    fn stamp_round(self : &mut Self, cx : f64, cy : f64, radius : f64, color : Color) {
        let solid = color.a >= 1.0 && radius >= 2.0;
        let solid_radius = (radius - 1.0).floor();
        if solid {
            draw_filled_circle_mut(
                &mut self.img,
                (cx.round() as i32, cy.round() as i32),
                solid_radius as i32,
                to_rgb(color),
            );
        }
        let center = Point2D { x : cx, y : cy };
        for (px, py) in bounding_box(cx, cy, radius) {
            let pixel = Point2D {
                x : px as f64 + 0.5,
                y : py as f64 + 0.5,
            };
            let d = center.euclidean_distance(&pixel);
            if solid && d <= solid_radius - 0.5 {
                continue;
            }
            let coverage = (radius + 0.5 - d).max(0.0).min(1.0);
            if coverage > 0.0 {
                self.blend(px, py, color, coverage);
            }
        }
    }

    fn stamp_square(self : &mut Self, cx : f64, cy : f64, radius : f64, color : Color) {
        for (px, py) in bounding_box(cx, cy, radius) {
            let dx = (px as f64 + 0.5 - cx).abs();
            let dy = (py as f64 + 0.5 - cy).abs();
            let coverage = (radius + 0.5 - dx).max(0.0).min(1.0)
                * (radius + 0.5 - dy).max(0.0).min(1.0);
            if coverage > 0.0 {
                self.blend(px, py, color, coverage);
            }
        }
    }

    // Soft disc with quadratic falloff, the raster stand-in for a canvas
    // shadow blur
    fn stamp_soft(self : &mut Self, cx : f64, cy : f64, radius : f64, color : Color) {
        let center = Point2D { x : cx, y : cy };
        for (px, py) in bounding_box(cx, cy, radius) {
            let pixel = Point2D {
                x : px as f64 + 0.5,
                y : py as f64 + 0.5,
            };
            let d = center.euclidean_distance(&pixel);
            if d >= radius {
                continue;
            }
            let falloff = 1.0 - d / radius;
            self.blend(px, py, color, GLOW_ALPHA * falloff * falloff);
        }
    }

    fn stamp(self : &mut Self, cx : f64, cy : f64, radius : f64, color : Color) {
        match self.line_cap {
            LineCap::Round => self.stamp_round(cx, cy, radius, color),
            LineCap::Square => self.stamp_square(cx, cy, radius, color),
        }
    }
}

fn to_rgb(color : Color) -> Rgb<u8> {
    Rgb([color.r as u8, color.g as u8, color.b as u8])
}

fn bounding_box(cx : f64, cy : f64, radius : f64) -> Vec<(i64, i64)> {
    let x_min = (cx - radius - 1.0).floor() as i64;
    let x_max = (cx + radius + 1.0).ceil() as i64;
    let y_min = (cy - radius - 1.0).floor() as i64;
    let y_max = (cy + radius + 1.0).ceil() as i64;
    let mut out = Vec::new();
    for px in x_min..=x_max {
        for py in y_min..=y_max {
            out.push((px, py));
        }
    }
    out
}

impl PaintSurface for ImageSurface {
    fn set_line_width(&mut self, width : f64) {
        self.line_width = width;
    }

    fn set_line_cap(&mut self, cap : LineCap) {
        self.line_cap = cap;
    }

    fn set_glow(&mut self, color : Color, blur : f64) {
        self.glow_color = color;
        self.glow_blur = blur;
    }

    fn fill_rect(&mut self, x : f64, y : f64, width : f64, height : f64, color : Color) {
        let x_min = (x * self.scale).floor() as i64;
        let y_min = (y * self.scale).floor() as i64;
        let x_max = ((x + width) * self.scale).ceil() as i64;
        let y_max = ((y + height) * self.scale).ceil() as i64;
        for px in x_min..x_max {
            for py in y_min..y_max {
                self.blend(px, py, color, 1.0);
            }
        }
    }

    fn stroke_line(&mut self, x0 : f64, y0 : f64, x1 : f64, y1 : f64, start : Color, end : Color) {
        let ax = x0 * self.scale;
        let ay = y0 * self.scale;
        let bx = x1 * self.scale;
        let by = y1 * self.scale;
        let start_point = Point2D { x : ax, y : ay };
        let length = start_point.euclidean_distance(&Point2D { x : bx, y : by });

        if self.glow_blur > 0.5 {
            let spacing = (self.glow_blur / 2.0).max(1.0);
            let steps = ((length / spacing).ceil() as usize).max(1);
            let glow_color = self.glow_color;
            let blur = self.glow_blur;
            for i in 0..=steps {
                let t = i as f64 / steps as f64;
                self.stamp_soft(ax + (bx - ax) * t, ay + (by - ay) * t, blur, glow_color);
            }
        }

        let radius = (self.line_width * self.scale / 2.0).max(0.5);
        let steps = ((length * 2.0).ceil() as usize).max(1);
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let color = start.lerp(&end, t);
            self.stamp(ax + (bx - ax) * t, ay + (by - ay) * t, radius, color);
        }
    }

    fn fill_circle(&mut self, x : f64, y : f64, radius : f64, center : Color, edge : Color) {
        let cx = x * self.scale;
        let cy = y * self.scale;
        let r = radius * self.scale;
        let middle = Point2D { x : cx, y : cy };
        for (px, py) in bounding_box(cx, cy, r) {
            let pixel = Point2D {
                x : px as f64 + 0.5,
                y : py as f64 + 0.5,
            };
            let d = middle.euclidean_distance(&pixel);
            if d >= r {
                continue;
            }
            let color = center.lerp(&edge, d / r);
            self.blend(px, py, color, 1.0);
        }
    }
}

// Surface that swallows every call, for exercising the simulation without
// rendering
#[cfg(test)]
pub struct NullSurface;

#[cfg(test)]
impl PaintSurface for NullSurface {
    fn set_line_width(&mut self, _width : f64) {}
    fn set_line_cap(&mut self, _cap : LineCap) {}
    fn set_glow(&mut self, _color : Color, _blur : f64) {}
    fn fill_rect(&mut self, _x : f64, _y : f64, _width : f64, _height : f64, _color : Color) {}
    fn stroke_line(&mut self, _x0 : f64, _y0 : f64, _x1 : f64, _y1 : f64, _start : Color, _end : Color) {}
    fn fill_circle(&mut self, _x : f64, _y : f64, _radius : f64, _center : Color, _edge : Color) {}
}
