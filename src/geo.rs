//! Static city table for placing project markers on the Morocco map
//!
//! Coordinates are normalised to a 0–100 plane over the map illustration:
//! `x` grows eastwards, `y` grows southwards.

use serde::Serialize;

/// A city on the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub city: &'static str,
    pub x: f32,
    pub y: f32,
    pub region: &'static str,
}

const fn point(city: &'static str, x: f32, y: f32, region: &'static str) -> GeoPoint {
    GeoPoint { city, x, y, region }
}

/// Lookup order is table order; earlier cities shadow later ones
pub const MOROCCO_CITIES: &[GeoPoint] = &[
    point("Casablanca", 58.8, 16.2, "Casablanca-Settat"),
    point("Rabat", 63.5, 13.2, "Rabat-Salé-Kénitra"),
    point("Marrakech", 56.3, 29.1, "Marrakech-Safi"),
    point("Fès", 75.0, 13.1, "Fès-Meknès"),
    point("Tanger", 69.9, 1.6, "Tanger-Tétouan-Al Hoceïma"),
    point("Agadir", 46.3, 37.2, "Souss-Massa"),
    point("Meknès", 71.6, 14.1, "Fès-Meknès"),
    point("Oujda", 94.3, 8.8, "Oriental"),
    point("Kénitra", 65.1, 11.6, "Rabat-Salé-Kénitra"),
    point("Tétouan", 72.7, 2.9, "Tanger-Tétouan-Al Hoceïma"),
    point("El Jadida", 53.1, 18.3, "Casablanca-Settat"),
    point("Safi", 48.5, 24.7, "Marrakech-Safi"),
    point("Nador", 87.9, 5.5, "Oriental"),
    point("Béni Mellal", 66.6, 24.4, "Béni Mellal-Khénifra"),
    point("Laâyoune", 23.8, 59.0, "Laâyoune-Sakia El Hamra"),
    point("Dakhla", 6.5, 82.1, "Dakhla-Oued Ed-Dahab"),
    point("Essaouira", 45.2, 29.9, "Marrakech-Safi"),
    point("Ouarzazate", 63.2, 33.9, "Drâa-Tafilalet"),
    point("Errachidia", 78.6, 27.1, "Drâa-Tafilalet"),
    point("Settat", 58.6, 20.0, "Casablanca-Settat"),
    point("Khouribga", 63.1, 20.8, "Béni Mellal-Khénifra"),
    point("Mohammedia", 60.1, 15.4, "Casablanca-Settat"),
    point("Taza", 81.2, 11.9, "Fès-Meknès"),
    point("Al Hoceïma", 81.7, 5.0, "Tanger-Tétouan-Al Hoceïma"),
    point("Ifrane", 74.3, 16.5, "Fès-Meknès"),
    point("Larache", 68.0, 5.4, "Tanger-Tétouan-Al Hoceïma"),
    point("Khémisset", 68.3, 14.5, "Rabat-Salé-Kénitra"),
    point("Guelmim", 43.4, 46.7, "Guelmim-Oued Noun"),
    point("Berrechid", 58.8, 18.2, "Casablanca-Settat"),
    point("Azilal", 65.2, 26.9, "Béni Mellal-Khénifra"),
];

/// Ordered city table with substring lookup
#[derive(Debug, Clone, Copy)]
pub struct GeoTable {
    points: &'static [GeoPoint],
}

impl Default for GeoTable {
    fn default() -> Self {
        Self::morocco()
    }
}

impl GeoTable {
    pub const fn new(points: &'static [GeoPoint]) -> Self {
        Self { points }
    }

    pub const fn morocco() -> Self {
        Self::new(MOROCCO_CITIES)
    }

    pub fn points(&self) -> &'static [GeoPoint] {
        self.points
    }

    /// First city whose name appears in `location`, ignoring case.
    ///
    /// There is no ranking: when a location names several cities, the one
    /// listed first in the table wins.
    pub fn lookup(&self, location: &str) -> Option<&'static GeoPoint> {
        let haystack = location.to_lowercase();
        if haystack.trim().is_empty() {
            return None;
        }
        self.points
            .iter()
            .find(|point| haystack.contains(&point.city.to_lowercase()))
    }

    /// Pair each record with its map point; records without one are left out
    pub fn markers<'a, T, I, F>(
        &self,
        records: I,
        location_of: F,
    ) -> Vec<(&'a T, &'static GeoPoint)>
    where
        T: 'a,
        I: IntoIterator<Item = &'a T>,
        F: Fn(&'a T) -> Option<&'a str>,
    {
        records
            .into_iter()
            .filter_map(|record| {
                let location = location_of(record)?;
                self.lookup(location).map(|point| (record, point))
            })
            .collect()
    }
}

/// [`GeoTable::lookup`] against the Morocco table
pub fn lookup(location: &str) -> Option<&'static GeoPoint> {
    GeoTable::morocco().lookup(location)
}
