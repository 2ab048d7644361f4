// Scene composition before growth starts: background fill, a soft halo
// behind each distinct root origin, then the seed marks themselves. Halos
// use the perceptual inverse of the root's average color so they read
// against the inverted-average background.

use crate::color::Color;
use crate::rng::RandomSource;
use crate::sim::{floored_root_count, Style};
use crate::surface::PaintSurface;
use crate::tree::{Root, Tree};

// Mass weighted average of the root gradient colors, inverted. The canvas
// background is pushed away from the dominant root tone.
pub fn background_color(roots : &[Root]) -> Color {
    if roots.is_empty() {
        return Color::init(0.0, 0.0, 0.0);
    }
    let mut sum = (0.0, 0.0, 0.0);
    for root in roots {
        sum.0 += (root.start_color.r + root.end_color.r) * root.mass * 2.0;
        sum.1 += (root.start_color.g + root.end_color.g) * root.mass * 2.0;
        sum.2 += (root.start_color.b + root.end_color.b) * root.mass * 2.0;
    }
    let count = roots.len() as f64;
    let average = Color::init(
        sum.0 / (2.0 * count),
        sum.1 / (2.0 * count),
        sum.2 / (2.0 * count),
    );
    average.inverted()
}

pub fn draw(
    surface : &mut dyn PaintSurface,
    tree : &Tree,
    background : Color,
    rng : &mut dyn RandomSource,
    style : &Style,
) {
    surface.fill_rect(
        0.0,
        0.0,
        f64::from(tree.width()),
        f64::from(tree.height()),
        background,
    );
    draw_roots(surface, tree, rng, style);
}

pub fn draw_roots(
    surface : &mut dyn PaintSurface,
    tree : &Tree,
    rng : &mut dyn RandomSource,
    style : &Style,
) {
    let roots = floored_root_count(tree.roots.len());
    let radius = 2.5 * f64::from(tree.width()) / (7.0 * roots.log10());

    // halo pass; a cell shared by several roots gets one halo only
    for (i, root) in tree.roots.iter().enumerate() {
        let duplicate = tree.roots[..i]
            .iter()
            .any(|other| other.x == root.x && other.y == root.y);
        if duplicate {
            continue;
        }
        let opposite = Color::init(
            255.0 - (root.start_color.r + root.end_color.r) / 2.0,
            255.0 - (root.start_color.g + root.end_color.g) / 2.0,
            255.0 - (root.start_color.b + root.end_color.b) / 2.0,
        );
        let center = Color::with_alpha(opposite.r, opposite.g, opposite.b, 0.17);
        let edge = Color::with_alpha(opposite.r, opposite.g, opposite.b, 0.0);
        surface.set_glow(center, 0.0);
        surface.fill_circle(f64::from(root.x), f64::from(root.y), radius, center, edge);
    }

    // seed marks
    for root in &tree.roots {
        surface.set_line_cap(root.line_cap);
        surface.set_glow(root.start_color, 25.0 * root.mass * style.glow_scale);
        surface.set_line_width(rng.next() * 0.7 + 0.3);
        surface.stroke_line(
            f64::from(root.x),
            f64::from(root.y),
            f64::from(root.x),
            f64::from(root.y),
            root.start_color,
            root.start_color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::LineCap;

    struct Constant(f64);

    impl RandomSource for Constant {
        fn next(&mut self) -> f64 {
            self.0
        }
    }

    // Records the geometry it is asked to paint
    struct Recording {
        circle_radii : Vec<f64>,
        lines : usize,
        rects : usize,
    }

    impl Recording {
        fn init() -> Recording {
            Recording {
                circle_radii : Vec::new(),
                lines : 0,
                rects : 0,
            }
        }
    }

    impl PaintSurface for Recording {
        fn set_line_width(&mut self, _width : f64) {}
        fn set_line_cap(&mut self, _cap : LineCap) {}
        fn set_glow(&mut self, _color : Color, _blur : f64) {}
        fn fill_rect(&mut self, _x : f64, _y : f64, _w : f64, _h : f64, _color : Color) {
            self.rects += 1;
        }
        fn stroke_line(&mut self, _x0 : f64, _y0 : f64, _x1 : f64, _y1 : f64, _s : Color, _e : Color) {
            self.lines += 1;
        }
        fn fill_circle(&mut self, _x : f64, _y : f64, radius : f64, _center : Color, _edge : Color) {
            self.circle_radii.push(radius);
        }
    }

    fn root_at(x : i32, y : i32) -> Root {
        Root {
            x,
            y,
            start_color : Color::init(40.0, 80.0, 120.0),
            end_color : Color::init(200.0, 100.0, 0.0),
            mass : 0.5,
            line_cap : LineCap::Round,
        }
    }

    #[test]
    fn background_is_the_inverted_weighted_average() {
        let root = root_at(3, 3);
        let background = background_color(&[root]);
        // average channel = (start + end) / 2 * mass * 2 = start + end halved
        assert_eq!(background.r, 255.0 - (40.0 + 200.0) / 2.0);
        assert_eq!(background.g, 255.0 - (80.0 + 100.0) / 2.0);
        assert_eq!(background.b, 255.0 - (120.0 + 0.0) / 2.0);
    }

    #[test]
    fn background_for_no_roots_is_black() {
        assert_eq!(background_color(&[]), Color::init(0.0, 0.0, 0.0));
    }

    #[test]
    fn shared_origin_cells_get_one_halo() {
        let tree = Tree::with_roots(16, 16, vec![root_at(4, 4), root_at(4, 4), root_at(8, 8)]);
        let mut surface = Recording::init();
        draw_roots(&mut surface, &tree, &mut Constant(0.5), &Style::init());
        assert_eq!(surface.circle_radii.len(), 2);
        // every root still strokes its own seed mark
        assert_eq!(surface.lines, 3);
    }

    #[test]
    fn halo_radius_is_finite_for_a_single_root() {
        let tree = Tree::with_roots(16, 16, vec![root_at(4, 4)]);
        let mut surface = Recording::init();
        draw_roots(&mut surface, &tree, &mut Constant(0.5), &Style::init());
        assert_eq!(surface.circle_radii.len(), 1);
        assert!(surface.circle_radii[0].is_finite());
        assert!(surface.circle_radii[0] > 0.0);
    }

    #[test]
    fn draw_clears_the_canvas_first() {
        let tree = Tree::with_roots(16, 16, vec![root_at(4, 4)]);
        let mut surface = Recording::init();
        draw(
            &mut surface,
            &tree,
            Color::init(0.0, 0.0, 0.0),
            &mut Constant(0.5),
            &Style::init(),
        );
        assert_eq!(surface.rects, 1);
        assert_eq!(surface.lines, 1);
    }
}
