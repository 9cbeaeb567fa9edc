//! Geodätische Polygon-Fläche über eine ellipsoid-bewusste Triangulierung.
//!
//! Ablauf:
//! 1. Punkte auf die Ellipsoid-Oberfläche legen und in die Tangentialebene
//!    am Schwerpunkt projizieren.
//! 2. Ear-Clipping-Triangulierung in der Ebene (nur für die Topologie).
//! 3. Jedes Dreieck so lange unterteilen, bis keine Kante den
//!    Granularitätswinkel überschreitet; neue Ecken liegen auf dem Ellipsoid.
//! 4. Fläche = Σ |(b−a)×(c−a)| / 2 über alle ECEF-Dreiecke.

use glam::{DVec2, DVec3};

use super::geo::{scale_to_surface, surface_normal, Cartographic};

/// Standard-Granularität (Radiant) für die Dreiecks-Unterteilung.
pub const DEFAULT_GRANULARITY: f64 = 0.01;

/// Maximale Rekursionstiefe der Unterteilung (4^8 Teildreiecke pro Dreieck).
const MAX_SUBDIVISION_DEPTH: u32 = 8;

/// Berechnet die geodätische Fläche eines geschlossenen Polygons in m².
///
/// Weniger als drei Punkte oder ein entartetes Polygon ergeben `0.0`.
/// Die Höhen der Punkte werden ignoriert (Fläche auf der Ellipsoid-Oberfläche).
pub fn geodesic_polygon_area(points: &[Cartographic], granularity: f64) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let surface: Vec<DVec3> = points
        .iter()
        .map(|p| p.with_altitude(0.0).to_ecef())
        .collect();

    let planar = project_to_tangent_plane(&surface);
    let triangles = triangulate(&planar);
    if triangles.is_empty() {
        return 0.0;
    }

    let granularity = if granularity.is_finite() && granularity > 0.0 {
        granularity
    } else {
        DEFAULT_GRANULARITY
    };

    triangles
        .iter()
        .map(|&[a, b, c]| {
            subdivided_area(surface[a], surface[b], surface[c], granularity, 0)
        })
        .sum()
}

/// Projiziert Oberflächenpunkte in die Tangentialebene am Schwerpunkt.
fn project_to_tangent_plane(surface: &[DVec3]) -> Vec<DVec2> {
    let center = surface.iter().copied().sum::<DVec3>() / surface.len() as f64;
    let normal = surface_normal(center);

    let east = {
        let e = DVec3::Z.cross(normal);
        if e.length_squared() < 1e-12 {
            // Polnähe: beliebige Ost-Richtung
            DVec3::X
        } else {
            e.normalize()
        }
    };
    let north = normal.cross(east);

    surface
        .iter()
        .map(|p| {
            let d = *p - center;
            DVec2::new(d.dot(east), d.dot(north))
        })
        .collect()
}

/// Vorzeichenbehaftete Fläche eines ebenen Polygons (positiv = gegen den Uhrzeigersinn).
fn signed_area(poly: &[DVec2]) -> f64 {
    let n = poly.len();
    (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            poly[i].perp_dot(poly[j])
        })
        .sum::<f64>()
        * 0.5
}

fn point_in_triangle(p: DVec2, a: DVec2, b: DVec2, c: DVec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    d1 >= 0.0 && d2 >= 0.0 && d3 >= 0.0
}

/// Ear-Clipping-Triangulierung eines einfachen ebenen Polygons.
///
/// Liefert Index-Tripel in die Eingabe. Bei sich selbst schneidenden Polygonen
/// wird der Rest als Fächer trianguliert.
pub(crate) fn triangulate(poly: &[DVec2]) -> Vec<[usize; 3]> {
    let n = poly.len();
    if n < 3 {
        return Vec::new();
    }

    let area = signed_area(poly);
    let scale = poly
        .iter()
        .map(|p| p.length_squared())
        .fold(0.0_f64, f64::max)
        .max(1.0);
    if area.abs() <= scale * 1e-12 {
        return Vec::new();
    }

    let mut remaining: Vec<usize> = if area > 0.0 {
        (0..n).collect()
    } else {
        (0..n).rev().collect()
    };

    let mut triangles = Vec::with_capacity(n - 2);
    while remaining.len() > 3 {
        let m = remaining.len();
        let mut clipped = false;

        for i in 0..m {
            let prev = remaining[(i + m - 1) % m];
            let cur = remaining[i];
            let next = remaining[(i + 1) % m];
            let (a, b, c) = (poly[prev], poly[cur], poly[next]);

            if (b - a).perp_dot(c - b) <= 0.0 {
                continue;
            }

            let contains_other = remaining
                .iter()
                .filter(|&&k| k != prev && k != cur && k != next)
                .any(|&k| point_in_triangle(poly[k], a, b, c));
            if contains_other {
                continue;
            }

            triangles.push([prev, cur, next]);
            remaining.remove(i);
            clipped = true;
            break;
        }

        if !clipped {
            log::debug!(
                "Ear-Clipping ohne Ohr ({} Restpunkte), Fächer-Fallback",
                remaining.len()
            );
            for k in 1..remaining.len() - 1 {
                triangles.push([remaining[0], remaining[k], remaining[k + 1]]);
            }
            return triangles;
        }
    }

    triangles.push([remaining[0], remaining[1], remaining[2]]);
    triangles
}

/// Dreiecksfläche mit rekursiver Unterteilung entlang der Ellipsoid-Oberfläche.
fn subdivided_area(a: DVec3, b: DVec3, c: DVec3, granularity: f64, depth: u32) -> f64 {
    let longest = a
        .angle_between(b)
        .max(b.angle_between(c))
        .max(c.angle_between(a));

    if longest <= granularity || depth >= MAX_SUBDIVISION_DEPTH {
        return (b - a).cross(c - a).length() * 0.5;
    }

    let ab = scale_to_surface((a + b) * 0.5);
    let bc = scale_to_surface((b + c) * 0.5);
    let ca = scale_to_surface((c + a) * 0.5);

    subdivided_area(a, ab, ca, granularity, depth + 1)
        + subdivided_area(ab, b, bc, granularity, depth + 1)
        + subdivided_area(ca, bc, c, granularity, depth + 1)
        + subdivided_area(ab, bc, ca, granularity, depth + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(lon0: f64, lat0: f64, d_lon: f64, d_lat: f64) -> Vec<Cartographic> {
        vec![
            Cartographic::new(lon0, lat0, 0.0),
            Cartographic::new(lon0 + d_lon, lat0, 0.0),
            Cartographic::new(lon0 + d_lon, lat0 + d_lat, 0.0),
            Cartographic::new(lon0, lat0 + d_lat, 0.0),
        ]
    }

    #[test]
    fn fewer_than_three_points_have_no_area() {
        let pts = square(0.0, 0.0, 0.01, 0.01);
        assert_eq!(geodesic_polygon_area(&[], DEFAULT_GRANULARITY), 0.0);
        assert_eq!(geodesic_polygon_area(&pts[..2], DEFAULT_GRANULARITY), 0.0);
    }

    #[test]
    fn kilometer_square_at_equator() {
        // 0.009° ≈ 1002 m in Länge, ≈ 995 m in Breite
        let area = geodesic_polygon_area(&square(0.0, 0.0, 0.009, 0.009), DEFAULT_GRANULARITY);
        assert_relative_eq!(area, 997_100.0, max_relative = 0.01);
    }

    #[test]
    fn square_at_45_degrees_shrinks_with_cos_latitude() {
        let area = geodesic_polygon_area(&square(0.0, 45.0, 0.013, 0.009), DEFAULT_GRANULARITY);
        // ≈ 1022 m × 1001 m
        assert_relative_eq!(area, 1_023_000.0, max_relative = 0.02);
    }

    #[test]
    fn winding_order_does_not_change_area() {
        let mut pts = square(5.0, 20.0, 0.02, 0.01);
        let ccw = geodesic_polygon_area(&pts, DEFAULT_GRANULARITY);
        pts.reverse();
        let cw = geodesic_polygon_area(&pts, DEFAULT_GRANULARITY);
        assert_relative_eq!(ccw, cw, max_relative = 1e-9);
        assert!(ccw > 0.0);
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let pts = vec![
            Cartographic::new(0.0, 0.0, 0.0),
            Cartographic::new(0.01, 0.0, 0.0),
            Cartographic::new(0.02, 0.0, 0.0),
        ];
        assert_eq!(geodesic_polygon_area(&pts, DEFAULT_GRANULARITY), 0.0);
    }

    #[test]
    fn concave_polygon_is_triangulated_without_overlap() {
        // L-Form: 3 Einheitsquadrate
        let poly = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 1.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(1.0, 2.0),
            DVec2::new(0.0, 2.0),
        ];
        let tris = triangulate(&poly);
        assert_eq!(tris.len(), 4);
        let total: f64 = tris
            .iter()
            .map(|&[a, b, c]| (poly[b] - poly[a]).perp_dot(poly[c] - poly[a]).abs() * 0.5)
            .sum();
        assert_relative_eq!(total, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn large_polygon_gets_subdivided_onto_the_ellipsoid() {
        // 10°×10° Feld: Unterteilung muss greifen und die Fläche wächst gegenüber
        // der reinen Sehnen-Triangulierung.
        let pts = square(0.0, 0.0, 10.0, 10.0);
        let coarse = geodesic_polygon_area(&pts, 10.0);
        let fine = geodesic_polygon_area(&pts, DEFAULT_GRANULARITY);
        assert!(fine > coarse);
    }
}
