// Growth grid state. A tree owns its roots by value, the frontier of live
// heads, and the occupancy grid of every cell growth has ever settled on.
// Heads refer to their root by index, never by alias. The occupancy grid is
// append only while a run is going; reset and clear rebuild it.

use ndarray::Array2;

use crate::color::Color;
use crate::rng::RandomSource;
use crate::surface::LineCap;

// Guard that would re-roll a generated root landing on an already taken
// cell. Disabled: stacked origins layer their halos and are part of the look.
const FORBID_ROOT_OVERLAP : bool = false;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Root {
    pub x : i32,
    pub y : i32,
    pub start_color : Color,
    pub end_color : Color,
    // Probability that a growth candidate survives the stochastic pass
    pub mass : f64,
    // Selects the expansion neighborhood: diagonal for Round, axis for Square
    pub line_cap : LineCap,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Head {
    pub x : i32,
    pub y : i32,
    pub root : usize,
    // Hop count from the origin, not a spatial distance
    pub distance : u32,
}

pub struct Tree {
    field_width : i32,
    field_height : i32,
    pub roots : Vec<Root>,
    pub heads : Vec<Head>,
    joints : Array2<bool>,
}

impl Tree {
    pub fn init(field_width : i32, field_height : i32) -> Tree {
        Tree {
            field_width,
            field_height,
            roots : Vec::new(),
            heads : Vec::new(),
            joints : Array2::from_elem(
                (field_width as usize + 1, field_height as usize + 1),
                false,
            ),
        }
    }

    pub fn with_roots(field_width : i32, field_height : i32, roots : Vec<Root>) -> Tree {
        let mut tree = Tree::init(field_width, field_height);
        for root in roots {
            tree.add_root(root);
        }
        tree
    }

    pub fn width(self : &Self) -> i32 {
        self.field_width
    }

    pub fn height(self : &Self) -> i32 {
        self.field_height
    }

    // Is the cell already occupied by growth
    pub fn contains(self : &Self, x : i32, y : i32) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        *self.joints.get((x as usize, y as usize)).unwrap_or(&false)
    }

    // On or outside the border; interior cells satisfy 0 < x < width and
    // 0 < y < height strictly
    pub fn on_border(self : &Self, x : i32, y : i32) -> bool {
        x <= 0 || x >= self.field_width || y <= 0 || y >= self.field_height
    }

    pub fn occupy(self : &mut Self, x : i32, y : i32) {
        if x < 0 || y < 0 {
            return;
        }
        if let Some(cell) = self.joints.get_mut((x as usize, y as usize)) {
            *cell = true;
        }
    }

    pub fn joints(self : &Self) -> &Array2<bool> {
        &self.joints
    }

    pub fn joint_count(self : &Self) -> usize {
        self.joints.iter().filter(|&&cell| cell).count()
    }

    pub fn add_root(self : &mut Self, root : Root) {
        self.roots.push(root);
        self.heads.push(Head {
            x : root.x,
            y : root.y,
            root : self.roots.len() - 1,
            distance : 0,
        });
        self.occupy(root.x, root.y);
    }

    // Generate roots with palette derived or fully random color pairs and
    // append them, seeding a head and a joint for each. Returns the whole
    // root list, pre-existing roots included.
    pub fn generate_roots(
        self : &mut Self,
        amount : usize,
        palette : Option<&[Color]>,
        rng : &mut dyn RandomSource,
    ) -> &[Root] {
        for i in 0..amount {
            let (start_color, end_color) = match palette {
                Some(colors) if !colors.is_empty() => (
                    colors[i % colors.len()],
                    colors[(i + 3) % colors.len()],
                ),
                _ => (Color::random(rng), Color::random(rng)),
            };

            let mut x = self.random_interior(self.field_width, rng);
            let mut y = self.random_interior(self.field_height, rng);
            if FORBID_ROOT_OVERLAP {
                while self.roots.iter().any(|root| root.x == x && root.y == y) {
                    x = self.random_interior(self.field_width, rng);
                    y = self.random_interior(self.field_height, rng);
                }
            }

            let mass = rng.next() * 0.85 + 0.15;
            let line_cap = if rng.pick(2) == 0 {
                LineCap::Round
            } else {
                LineCap::Square
            };

            self.add_root(Root {
                x,
                y,
                start_color,
                end_color,
                mass,
                line_cap,
            });
        }
        &self.roots
    }

    fn random_interior(self : &Self, extent : i32, rng : &mut dyn RandomSource) -> i32 {
        rng.pick(extent as usize - 1) as i32 + 1
    }

    // Re-seed the frontier from the existing roots without regenerating them
    pub fn reset(self : &mut Self) {
        self.heads.clear();
        self.joints.fill(false);
        for (i, root) in self.roots.iter().enumerate() {
            self.heads.push(Head {
                x : root.x,
                y : root.y,
                root : i,
                distance : 0,
            });
        }
        let positions : Vec<(i32, i32)> = self.roots.iter().map(|root| (root.x, root.y)).collect();
        for (x, y) in positions {
            self.occupy(x, y);
        }
    }

    pub fn clear(self : &mut Self, leave_roots : bool) {
        if !leave_roots {
            self.roots.clear();
        }
        self.heads.clear();
        self.joints.fill(false);
    }
}
