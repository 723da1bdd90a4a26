use serde::{Serialize, Deserialize};

#[derive(Serialize, Deserialize)]
#[derive(Copy,Clone,PartialEq,Debug,Default)]
pub struct Pt {
    pub x :f64,
    pub y :f64,
}

/// Vectors share the point representation.
pub type Vc = Pt;

pub const EPS :f64 = 1e-9;

impl Pt {
    pub fn new(x :f64, y :f64) -> Pt { Pt { x, y } }
}

pub fn pt_sub(a :Pt, b :Pt) -> Vc { Pt { x: a.x - b.x, y: a.y - b.y } }
pub fn scale(a :Vc, s :f64) -> Vc { Pt { x: a.x * s, y: a.y * s } }
pub fn dot(a :Vc, b :Vc) -> f64 { a.x * b.x + a.y * b.y }
pub fn cross(a :Vc, b :Vc) -> f64 { a.x * b.y - a.y * b.x }
pub fn length(a :Vc) -> f64 { dot(a,a).sqrt() }
pub fn dist(a :Pt, b :Pt) -> f64 { length(pt_sub(b,a)) }

/// Unit vector, or None for (nearly) zero vectors.
pub fn normalize(a :Vc) -> Option<Vc> {
    let l = length(a);
    if l > EPS { Some(scale(a, 1.0 / l)) } else { None }
}

/// Counter-clockwise angle from `from` to `to`, in (-pi, pi].
pub fn signed_angle(from :Vc, to :Vc) -> f64 {
    cross(from, to).atan2(dot(from, to))
}

pub fn polyline_length(pts :&[Pt]) -> f64 {
    pts.windows(2).map(|w| dist(w[0], w[1])).sum()
}
