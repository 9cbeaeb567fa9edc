//! WGS84-Geodäsie: Kartographische Koordinaten, ECEF-Umrechnung, Bounding-Sphere.
//!
//! Alle Distanzen im Kern werden im kartesischen Weltsystem (ECEF, Meter)
//! gemessen. Die Umrechnung folgt dem WGS84-Referenzellipsoid.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Große Halbachse des WGS84-Ellipsoids in Metern.
pub const WGS84_SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
/// Abplattung des WGS84-Ellipsoids.
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;
/// Quadrat der ersten Exzentrizität.
pub const WGS84_ECCENTRICITY_SQUARED: f64 =
    2.0 * WGS84_FLATTENING - WGS84_FLATTENING * WGS84_FLATTENING;
/// Kleine Halbachse des WGS84-Ellipsoids in Metern.
pub const WGS84_SEMI_MINOR_AXIS: f64 = WGS84_SEMI_MAJOR_AXIS * (1.0 - WGS84_FLATTENING);

/// Position auf/über dem Ellipsoid (Grad, Grad, Meter über Ellipsoid).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cartographic {
    /// Geographische Länge in Grad
    #[serde(rename = "lon")]
    pub longitude: f64,
    /// Geographische Breite in Grad
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Höhe über dem Ellipsoid in Metern
    #[serde(rename = "alt")]
    pub altitude: f64,
}

impl Cartographic {
    /// Erstellt eine Position aus Länge, Breite (Grad) und Höhe (Meter).
    pub fn new(longitude: f64, latitude: f64, altitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            altitude,
        }
    }

    /// Erstellt eine Position aus einem flachen `[lon, lat, alt]`-Tripel.
    pub fn from_triple(triple: [f64; 3]) -> Self {
        Self::new(triple[0], triple[1], triple[2])
    }

    /// Flaches `[lon, lat, alt]`-Tripel (GeoJSON-Reihenfolge).
    pub fn to_triple(self) -> [f64; 3] {
        [self.longitude, self.latitude, self.altitude]
    }

    /// Gleiche Lage, andere Höhe.
    pub fn with_altitude(self, altitude: f64) -> Self {
        Self { altitude, ..self }
    }

    /// Prüft Endlichkeit aller Felder und die Breitengrad-Grenzen.
    pub fn validate(&self) -> Result<(), ValidationError> {
        super::validate_finite("longitude", self.longitude)?;
        super::validate_finite("latitude", self.latitude)?;
        super::validate_finite("altitude", self.altitude)?;
        super::validate_latitude(self.latitude)
    }

    /// Umrechnung in ECEF-Koordinaten (Meter).
    pub fn to_ecef(&self) -> DVec3 {
        let lat = self.latitude.to_radians();
        let lon = self.longitude.to_radians();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();
        let n = prime_vertical_radius(sin_lat);

        DVec3::new(
            (n + self.altitude) * cos_lat * cos_lon,
            (n + self.altitude) * cos_lat * sin_lon,
            (n * (1.0 - WGS84_ECCENTRICITY_SQUARED) + self.altitude) * sin_lat,
        )
    }

    /// Umrechnung aus ECEF-Koordinaten (Bowring-Näherung, mm-genau für Erdnähe).
    pub fn from_ecef(p: DVec3) -> Self {
        let a = WGS84_SEMI_MAJOR_AXIS;
        let b = WGS84_SEMI_MINOR_AXIS;
        let e2 = WGS84_ECCENTRICITY_SQUARED;
        let ep2 = (a * a - b * b) / (b * b);

        let r = (p.x * p.x + p.y * p.y).sqrt();
        let longitude = p.y.atan2(p.x);

        if r < 1e-9 {
            // Pol: Länge beliebig, Breite ±90°
            let latitude = if p.z >= 0.0 { 90.0 } else { -90.0 };
            return Self::new(0.0, latitude, p.z.abs() - b);
        }

        let theta = (p.z * a).atan2(r * b);
        let (sin_t, cos_t) = theta.sin_cos();
        let lat = (p.z + ep2 * b * sin_t.powi(3)).atan2(r - e2 * a * cos_t.powi(3));
        let (sin_lat, cos_lat) = lat.sin_cos();
        let n = prime_vertical_radius(sin_lat);
        let altitude = if cos_lat.abs() > 1e-12 {
            r / cos_lat - n
        } else {
            p.z.abs() / sin_lat.abs() - n * (1.0 - e2)
        };

        Self::new(longitude.to_degrees(), lat.to_degrees(), altitude)
    }
}

/// Querkrümmungsradius N(φ).
fn prime_vertical_radius(sin_lat: f64) -> f64 {
    WGS84_SEMI_MAJOR_AXIS / (1.0 - WGS84_ECCENTRICITY_SQUARED * sin_lat * sin_lat).sqrt()
}

/// Projiziert einen ECEF-Punkt entlang der geodätischen Normalen auf die Ellipsoid-Oberfläche.
pub fn scale_to_surface(p: DVec3) -> DVec3 {
    Cartographic::from_ecef(p).with_altitude(0.0).to_ecef()
}

/// Geodätische Oberflächennormale am gegebenen ECEF-Punkt.
pub fn surface_normal(p: DVec3) -> DVec3 {
    let a2 = WGS84_SEMI_MAJOR_AXIS * WGS84_SEMI_MAJOR_AXIS;
    let b2 = WGS84_SEMI_MINOR_AXIS * WGS84_SEMI_MINOR_AXIS;
    DVec3::new(p.x / a2, p.y / a2, p.z / b2).normalize_or_zero()
}

/// Euklidische Sehnen-Distanz zweier Positionen im Weltsystem.
pub fn chord_distance(a: &Cartographic, b: &Cartographic) -> f64 {
    a.to_ecef().distance(b.to_ecef())
}

/// Summe der Sehnen-Distanzen aufeinanderfolgender Punkte.
pub fn polyline_length(points: &[Cartographic]) -> f64 {
    points
        .windows(2)
        .map(|w| chord_distance(&w[0], &w[1]))
        .sum()
}

/// Mittelpunkt zweier Positionen (im ECEF-Raum gemittelt).
pub fn midpoint(a: &Cartographic, b: &Cartographic) -> Cartographic {
    Cartographic::from_ecef((a.to_ecef() + b.to_ecef()) * 0.5)
}

/// Schwerpunkt einer Punktmenge (ECEF-Mittel, zurück auf kartographisch).
pub fn centroid(points: &[Cartographic]) -> Option<Cartographic> {
    if points.is_empty() {
        return None;
    }
    let sum: DVec3 = points.iter().map(Cartographic::to_ecef).sum();
    Some(Cartographic::from_ecef(sum / points.len() as f64))
}

/// Nächster Punkt auf der Strecke `a`–`b` zu `p` (alles ECEF).
pub fn closest_point_on_segment(p: DVec3, a: DVec3, b: DVec3) -> DVec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f64::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Umschließende Kugel einer Punktmenge im Weltsystem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Mittelpunkt (ECEF)
    pub center: DVec3,
    /// Radius in Metern
    pub radius: f64,
}

impl BoundingSphere {
    /// Mittelpunkt = Schwerpunkt, Radius = größter Abstand zum Schwerpunkt.
    pub fn from_points(points: &[Cartographic]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let ecef: Vec<DVec3> = points.iter().map(Cartographic::to_ecef).collect();
        let center = ecef.iter().copied().sum::<DVec3>() / ecef.len() as f64;
        let radius = ecef
            .iter()
            .map(|p| p.distance(center))
            .fold(0.0_f64, f64::max);
        Some(Self { center, radius })
    }

    /// Mittelpunkt als kartographische Position.
    pub fn center_cartographic(&self) -> Cartographic {
        Cartographic::from_ecef(self.center)
    }
}
