//! Polygon clipping against the per-frame FOV window.
//!
//! Vertices outside the window are replaced by the points where the polygon's
//! great-circle edges cross the window's boundary arcs.

use foundation::math::{Spherical, Vec3, angle_between};

use crate::frustum::FovBounds;

/// Tolerance (radians) of the point-on-arc test.
pub const ARC_EPSILON: f64 = 1e-6;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClippedVertex {
    pub position: Vec3,
    /// Index of the input vertex this point stands for.
    pub source: usize,
    /// The point lies on the window boundary rather than on an input vertex.
    pub synthesized: bool,
}

/// Whether `p` lies on the shorter great-circle arc from `a` to `b`.
fn on_arc(p: Vec3, a: Vec3, b: Vec3) -> bool {
    let detour = angle_between(a, p) + angle_between(p, b) - angle_between(a, b);
    detour.abs() < ARC_EPSILON
}

/// Crossing point of arcs `a→b` and `c→d`, if they cross.
///
/// Degenerate arcs (coincident or antipodal endpoints) and arcs on the same
/// great circle give `None`.
pub fn arc_intersection(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> Option<Vec3> {
    let n1 = a.cross(b).normalize()?;
    let n2 = c.cross(d).normalize()?;
    let p = n1.cross(n2).normalize()?;
    [p, -p]
        .into_iter()
        .find(|&candidate| on_arc(candidate, a, b) && on_arc(candidate, c, d))
}

/// First boundary arc crossed by the edge between `inside` and `outside`.
fn boundary_crossing(inside: Vec3, outside: Vec3, bounds: &FovBounds) -> Option<Vec3> {
    bounds
        .edges()
        .into_iter()
        .find_map(|(c, d)| arc_intersection(inside, outside, c, d))
}

/// Clip a closed polygon to the window.
///
/// `positions3d[i]` and `polygon_rad[i]` describe the same vertex. Visible
/// vertices are kept in order. An invisible vertex is replaced by its exit
/// crossing (edge from the previous visible vertex) and then its re-entry
/// crossing (edge to the next visible vertex); one without a visible neighbour
/// or without a valid crossing is dropped.
pub fn clip_polygon(
    positions3d: &[Vec3],
    polygon_rad: &[Spherical],
    bounds: &FovBounds,
) -> Vec<ClippedVertex> {
    let n = positions3d.len().min(polygon_rad.len());
    if n == 0 {
        return Vec::new();
    }

    let inside: Vec<bool> = polygon_rad[..n].iter().map(|p| bounds.contains(*p)).collect();
    let mut out = Vec::with_capacity(n + 2);

    for i in 0..n {
        let here = positions3d[i];
        if inside[i] {
            out.push(ClippedVertex {
                position: here,
                source: i,
                synthesized: false,
            });
            continue;
        }

        let prev = (i + n - 1) % n;
        let next = (i + 1) % n;
        let mut neighbours = vec![prev];
        if next != prev {
            neighbours.push(next);
        }
        for j in neighbours {
            if !inside[j] {
                continue;
            }
            if let Some(position) = boundary_crossing(positions3d[j], here, bounds) {
                out.push(ClippedVertex {
                    position,
                    source: i,
                    synthesized: true,
                });
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{arc_intersection, clip_polygon};
    use crate::camera::SphereCamera;
    use crate::frustum::FovBounds;
    use foundation::bounds::Size;
    use foundation::math::{Spherical, Vec3, spherical_to_vector, vector_to_spherical};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn bounds() -> FovBounds {
        FovBounds::from_viewer(&SphereCamera::new(Size::new(800.0, 600.0), 90f64.to_radians()))
    }

    fn polygon(degrees: &[(f64, f64)]) -> (Vec<Vec3>, Vec<Spherical>) {
        let rad: Vec<Spherical> = degrees
            .iter()
            .map(|&(lon, lat)| Spherical::from_degrees(lon, lat))
            .collect();
        let vecs = rad.iter().map(|p| spherical_to_vector(*p)).collect();
        (vecs, rad)
    }

    fn v(lon: f64, lat: f64) -> Vec3 {
        spherical_to_vector(Spherical::from_degrees(lon, lat))
    }

    #[test]
    fn crossing_arcs_meet_at_their_common_point() {
        let p = arc_intersection(v(-10.0, 0.0), v(10.0, 0.0), v(0.0, -10.0), v(0.0, 10.0))
            .expect("arcs cross");
        assert_close(p.x, 0.0, 1e-12);
        assert_close(p.y, 0.0, 1e-12);
        assert_close(p.z, -1.0, 1e-12);
    }

    #[test]
    fn disjoint_segments_do_not_cross() {
        // The great circles meet at lon 0 and lon 180, outside the first arc.
        assert_eq!(
            arc_intersection(v(20.0, 0.0), v(30.0, 0.0), v(0.0, -10.0), v(0.0, 10.0)),
            None
        );
    }

    #[test]
    fn degenerate_arcs_give_no_crossing() {
        let a = v(5.0, 5.0);
        assert_eq!(arc_intersection(a, a, v(0.0, -10.0), v(0.0, 10.0)), None);
        // Same great circle.
        assert_eq!(
            arc_intersection(v(-10.0, 0.0), v(10.0, 0.0), v(-5.0, 0.0), v(5.0, 0.0)),
            None
        );
    }

    #[test]
    fn all_inside_polygon_is_unchanged() {
        let (vecs, rad) = polygon(&[(-10.0, 10.0), (10.0, 10.0), (10.0, -10.0), (-10.0, -10.0)]);
        let clipped = clip_polygon(&vecs, &rad, &bounds());
        let positions: Vec<Vec3> = clipped.iter().map(|c| c.position).collect();
        assert_eq!(positions, vecs);
        assert!(clipped.iter().all(|c| !c.synthesized));
    }

    #[test]
    fn polygon_straddling_right_edge_gets_two_boundary_points() {
        let (vecs, rad) = polygon(&[(30.0, 10.0), (60.0, 10.0), (60.0, -10.0), (30.0, -10.0)]);
        let clipped = clip_polygon(&vecs, &rad, &bounds());
        assert_eq!(clipped.len(), 4);

        let sources: Vec<usize> = clipped.iter().map(|c| c.source).collect();
        assert_eq!(sources, vec![0, 1, 2, 3]);
        let synthesized: Vec<bool> = clipped.iter().map(|c| c.synthesized).collect();
        assert_eq!(synthesized, vec![false, true, true, false]);

        for c in &clipped[1..3] {
            let s = vector_to_spherical(c.position);
            assert_close(s.longitude, 45f64.to_radians(), 1e-9);
        }
        // Great-circle edges bulge away from the equator.
        let exit = vector_to_spherical(clipped[1].position);
        assert!(exit.latitude > 10f64.to_radians());
        let reentry = vector_to_spherical(clipped[2].position);
        assert!(reentry.latitude < -(10f64.to_radians()));
    }

    #[test]
    fn lone_outside_vertex_yields_exit_and_reentry() {
        let (vecs, rad) = polygon(&[(0.0, 10.0), (60.0, 0.0), (0.0, -10.0), (-20.0, 0.0)]);
        let clipped = clip_polygon(&vecs, &rad, &bounds());
        assert_eq!(clipped.len(), 5);
        assert_eq!(clipped.iter().filter(|c| c.synthesized).count(), 2);
        assert_eq!(clipped[1].source, 1);
        assert_eq!(clipped[2].source, 1);
        assert!(clipped[1].position.y > 0.0);
        assert!(clipped[2].position.y < 0.0);
    }

    #[test]
    fn polygon_behind_camera_clips_to_nothing() {
        let (vecs, rad) =
            polygon(&[(170.0, 10.0), (190.0, 10.0), (190.0, -10.0), (170.0, -10.0)]);
        assert!(clip_polygon(&vecs, &rad, &bounds()).is_empty());
    }
}
