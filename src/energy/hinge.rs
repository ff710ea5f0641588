//! Dihedral bending across an edge shared by two triangles.
//!
//! A hinge `[A, B, C, D]` spans triangles `(A, B, C)` and `(B, A, D)` glued along
//! the edge `A-B`. With consistently oriented faces the unit normals
//!
//! ```text
//! n₁ = normalize((B - A) × (C - A))
//! n₂ = normalize((A - B) × (D - B))
//! ```
//!
//! agree when the hinge is flat, and the energy `k (1 - n₁·n₂)` grows as it folds.
//!
//! Gradients go through the derivative of a unit normal: for `n = N / |N|`,
//! `∂(n·u)/∂N = (u - (n·u) n) / |N|`, and `N = e₁ × e₂` pushes that back onto the
//! edge vectors with two cross products.

use nalgebra::Vector3;

use super::{accumulate, TermEnergy, TermSet};
use crate::embedding::Embedding;

/// Triangles with a cross-product norm below this have no normal; their hinges
/// contribute nothing.
pub const DEGENERATE_NORMAL: f64 = 1e-10;

/// A bending term on the edge `vertices[0]-vertices[1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hinge {
    /// `[A, B, C, D]`: shared edge `A-B`, wing tips `C` and `D`.
    pub vertices: [usize; 4],
    /// Stiffness `k`.
    pub stiffness: f64,
}

impl Hinge {
    /// Create a hinge on edge `a-b` with wing tips `c` and `d`.
    pub fn new(a: usize, b: usize, c: usize, d: usize, stiffness: f64) -> Self {
        Self {
            vertices: [a, b, c, d],
            stiffness,
        }
    }
}

/// A list of hinges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hinges {
    hinges: Vec<Hinge>,
}

impl Hinges {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hinge.
    pub fn push(&mut self, hinge: Hinge) {
        self.hinges.push(hinge);
    }

    /// Number of hinges.
    #[inline]
    pub fn len(&self) -> usize {
        self.hinges.len()
    }

    /// True if there are no hinges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hinges.is_empty()
    }

    /// The hinges as a slice.
    pub fn as_slice(&self) -> &[Hinge] {
        &self.hinges
    }

    /// Iterate over the hinges.
    pub fn iter(&self) -> std::slice::Iter<'_, Hinge> {
        self.hinges.iter()
    }
}

impl From<Vec<Hinge>> for Hinges {
    fn from(hinges: Vec<Hinge>) -> Self {
        Self { hinges }
    }
}

impl FromIterator<Hinge> for Hinges {
    fn from_iter<It: IntoIterator<Item = Hinge>>(iter: It) -> Self {
        Self {
            hinges: iter.into_iter().collect(),
        }
    }
}

/// Corner positions and raw normals of one hinge.
struct Wings {
    a: Vector3<f64>,
    b: Vector3<f64>,
    c: Vector3<f64>,
    d: Vector3<f64>,
    n1: Vector3<f64>,
    n2: Vector3<f64>,
}

impl Wings {
    fn read(hinge: &Hinge, emb: &Embedding<3>) -> Option<Self> {
        let [ia, ib, ic, id] = hinge.vertices;
        let (a, b, c, d) = (emb.position(ia), emb.position(ib), emb.position(ic), emb.position(id));

        let n1 = (b - a).cross(&(c - a));
        let n2 = (a - b).cross(&(d - b));
        if n1.norm() < DEGENERATE_NORMAL || n2.norm() < DEGENERATE_NORMAL {
            return None;
        }

        Some(Self { a, b, c, d, n1, n2 })
    }
}

impl TermSet for Hinges {
    #[inline]
    fn term_count(&self) -> usize {
        self.hinges.len()
    }

    #[inline]
    fn term_vertices(&self, k: usize) -> &[usize] {
        &self.hinges[k].vertices
    }
}

impl TermEnergy<3> for Hinges {
    fn term_value(&self, k: usize, emb: &Embedding<3>) -> f64 {
        let hinge = &self.hinges[k];
        match Wings::read(hinge, emb) {
            Some(w) => hinge.stiffness * (1.0 - w.n1.normalize().dot(&w.n2.normalize())),
            None => 0.0,
        }
    }

    fn term_grad_accumulate(&self, k: usize, emb: &Embedding<3>, grad: &mut [f64]) {
        let hinge = &self.hinges[k];
        let Some(w) = Wings::read(hinge, emb) else {
            return;
        };

        let (len1, len2) = (w.n1.norm(), w.n2.norm());
        let (u1, u2) = (w.n1 / len1, w.n2 / len2);
        let cos = u1.dot(&u2);

        // Components of each unit normal orthogonal to the other
        let proj2 = u2 - u1 * cos;
        let proj1 = u1 - u2 * cos;

        // Triangle (A, B, C)
        let e1 = w.b - w.a;
        let e2 = w.c - w.a;
        let s1 = -hinge.stiffness / len1;
        let g_b1 = e2.cross(&proj2) * s1;
        let g_c = proj2.cross(&e1) * s1;
        let g_a1 = -(g_b1 + g_c);

        // Triangle (B, A, D)
        let f1 = w.a - w.b;
        let f2 = w.d - w.b;
        let s2 = -hinge.stiffness / len2;
        let g_a2 = f2.cross(&proj1) * s2;
        let g_d = proj1.cross(&f1) * s2;
        let g_b2 = -(g_a2 + g_d);

        let [ia, ib, ic, id] = hinge.vertices;
        accumulate(grad, ia, &(g_a1 + g_a2));
        accumulate(grad, ib, &(g_b1 + g_b2));
        accumulate(grad, ic, &g_c);
        accumulate(grad, id, &g_d);
    }
}
