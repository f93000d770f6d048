//! Arena-backed district registry.

use std::collections::BTreeMap;
use std::path::Path;

use outbreak_map_district_models::{DistrictProfile, DistrictTable};

use crate::{DISTRICTS_PATH_ENV, RegistryError};

/// Embedded reference data for Santa Cruz de la Sierra.
const SANTA_CRUZ_TOML: &str = include_str!("../data/santa_cruz.toml");

/// Dense index of a district inside a [`DistrictRegistry`].
///
/// Only meaningful for the registry that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DistrictId(usize);

impl DistrictId {
    /// Position of the district in the registry's name-sorted arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Read-only district reference data.
///
/// Districts are stored sorted by name, so iteration order is deterministic
/// and [`DistrictId`]s follow name order. Adjacency is kept as a dense
/// row-major `n * n` matrix of directed edges.
#[derive(Debug, Clone)]
pub struct DistrictRegistry {
    city: String,
    districts: Vec<DistrictProfile>,
    index: BTreeMap<String, DistrictId>,
    adjacency: Vec<bool>,
    neighbors: Vec<Vec<DistrictId>>,
}

impl DistrictRegistry {
    /// Builds a registry from a parsed table, validating every entry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if names repeat, an adjacency entry does
    /// not resolve to another district in the table, or a population, area
    /// or density is not a positive finite number.
    pub fn from_table(table: DistrictTable) -> Result<Self, RegistryError> {
        let DistrictTable {
            city,
            mut districts,
        } = table;

        districts.sort_by(|a, b| a.name.cmp(&b.name));

        let mut index = BTreeMap::new();
        for (i, district) in districts.iter().enumerate() {
            validate_measures(district)?;
            if index.insert(district.name.clone(), DistrictId(i)).is_some() {
                return Err(RegistryError::DuplicateDistrict {
                    name: district.name.clone(),
                });
            }
        }

        let n = districts.len();
        let mut adjacency = vec![false; n * n];
        let mut neighbors = Vec::with_capacity(n);

        for (from, district) in districts.iter().enumerate() {
            let mut row = Vec::with_capacity(district.adjacent_districts.len());
            for adjacent in &district.adjacent_districts {
                if *adjacent == district.name {
                    return Err(RegistryError::SelfAdjacent {
                        district: district.name.clone(),
                    });
                }
                let Some(&to) = index.get(adjacent) else {
                    return Err(RegistryError::UnknownAdjacent {
                        district: district.name.clone(),
                        adjacent: adjacent.clone(),
                    });
                };
                adjacency[from * n + to.0] = true;
                row.push(to);
            }
            neighbors.push(row);
        }

        log::debug!("Loaded {n} districts for {city}");

        Ok(Self {
            city,
            districts,
            index,
            adjacency,
            neighbors,
        })
    }

    /// Parses and validates a TOML district table.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Parse`] for malformed TOML, or any
    /// validation error from [`Self::from_table`].
    pub fn from_toml_str(toml_str: &str) -> Result<Self, RegistryError> {
        let table: DistrictTable = toml::de::from_str(toml_str)?;
        Self::from_table(table)
    }

    /// Loads a TOML district table from disk.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Io`] if the file cannot be read, or any
    /// parse/validation error.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let contents = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Returns the embedded Santa Cruz de la Sierra registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] only if the embedded table is invalid,
    /// which the unit tests rule out.
    pub fn santa_cruz() -> Result<Self, RegistryError> {
        Self::from_toml_str(SANTA_CRUZ_TOML)
    }

    /// Loads the file named by `DISTRICTS_PATH`, or the embedded Santa Cruz
    /// table when the variable is unset.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the configured file cannot be loaded.
    pub fn from_env() -> Result<Self, RegistryError> {
        match std::env::var_os(DISTRICTS_PATH_ENV) {
            Some(path) => {
                let path = Path::new(&path);
                log::info!("Loading district reference data from {}", path.display());
                Self::load(path)
            }
            None => Self::santa_cruz(),
        }
    }

    /// City the registry describes.
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Number of districts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.districts.len()
    }

    /// Whether the registry has no districts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }

    /// Resolves a district name (exact match) to its index.
    #[must_use]
    pub fn id(&self, name: &str) -> Option<DistrictId> {
        self.index.get(name).copied()
    }

    /// Looks up a district profile by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DistrictProfile> {
        self.id(name).map(|id| self.profile(id))
    }

    /// Returns the profile for an index produced by this registry.
    ///
    /// # Panics
    ///
    /// Panics if `id` came from a different, larger registry.
    #[must_use]
    pub fn profile(&self, id: DistrictId) -> &DistrictProfile {
        &self.districts[id.0]
    }

    /// Iterates districts in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (DistrictId, &DistrictProfile)> {
        self.districts
            .iter()
            .enumerate()
            .map(|(i, d)| (DistrictId(i), d))
    }

    /// District names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.districts.iter().map(|d| d.name.as_str())
    }

    /// Whether `to` is listed as adjacent to `from`. Directed.
    #[must_use]
    pub fn is_adjacent(&self, from: DistrictId, to: DistrictId) -> bool {
        self.adjacency[from.0 * self.districts.len() + to.0]
    }

    /// Districts listed as adjacent to `id`, in name order.
    #[must_use]
    pub fn neighbors(&self, id: DistrictId) -> &[DistrictId] {
        &self.neighbors[id.0]
    }

    /// Density of a named district, or `0.0` when the name is unknown.
    #[must_use]
    pub fn density_of(&self, name: &str) -> f64 {
        self.get(name).map_or(0.0, |d| d.density_per_km2)
    }

    /// Adjacency lists keyed by district name.
    #[must_use]
    pub fn adjacency_matrix(&self) -> BTreeMap<String, Vec<String>> {
        self.iter()
            .map(|(id, district)| {
                let adjacent = self
                    .neighbors(id)
                    .iter()
                    .map(|&n| self.profile(n).name.clone())
                    .collect();
                (district.name.clone(), adjacent)
            })
            .collect()
    }

    /// Names of the `count` densest districts, densest first.
    #[must_use]
    pub fn densest(&self, count: usize) -> Vec<&str> {
        let mut by_density: Vec<&DistrictProfile> = self.districts.iter().collect();
        by_density.sort_by(|a, b| b.density_per_km2.total_cmp(&a.density_per_km2));
        by_density
            .into_iter()
            .take(count)
            .map(|d| d.name.as_str())
            .collect()
    }
}

fn validate_measures(district: &DistrictProfile) -> Result<(), RegistryError> {
    let invalid = |field| RegistryError::InvalidMeasure {
        district: district.name.clone(),
        field,
    };

    if district.population == 0 {
        return Err(invalid("population"));
    }
    if !(district.area_km2.is_finite() && district.area_km2 > 0.0) {
        return Err(invalid("area_km2"));
    }
    if !(district.density_per_km2.is_finite() && district.density_per_km2 > 0.0) {
        return Err(invalid("density_per_km2"));
    }
    if !(district.centroid.latitude.is_finite() && district.centroid.longitude.is_finite()) {
        return Err(invalid("centroid"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    const EXPECTED_DISTRICT_COUNT: usize = 8;

    fn small_table() -> &'static str {
        r#"
city = "Testville"

[[districts]]
name = "B"
population = 1000
area_km2 = 1.0
density_per_km2 = 1000.0
zone_type = "Residencial"
adjacent_districts = ["A"]
centroid = { latitude = 0.0, longitude = 0.1 }

[[districts]]
name = "A"
population = 2000
area_km2 = 1.0
density_per_km2 = 2000.0
zone_type = "Residencial"
adjacent_districts = []
centroid = { latitude = 0.0, longitude = 0.0 }
"#
    }

    #[test]
    fn loads_embedded_santa_cruz() {
        let registry = DistrictRegistry::santa_cruz().unwrap();
        assert_eq!(
            registry.len(),
            EXPECTED_DISTRICT_COUNT,
            "Expected {EXPECTED_DISTRICT_COUNT} districts, found {}. \
             Update EXPECTED_DISTRICT_COUNT after editing santa_cruz.toml.",
            registry.len()
        );
        assert_eq!(registry.city(), "Santa Cruz de la Sierra");
    }

    #[test]
    fn embedded_districts_have_required_fields() {
        let registry = DistrictRegistry::santa_cruz().unwrap();
        for (_, district) in registry.iter() {
            assert!(!district.name.is_empty(), "District has empty name");
            assert!(
                !district.zone_type.is_empty(),
                "District {} has empty zone_type",
                district.name
            );
            assert!(
                !district.adjacent_districts.is_empty(),
                "District {} has no adjacent districts",
                district.name
            );
        }
    }

    #[test]
    fn iterates_in_name_order() {
        let registry = DistrictRegistry::santa_cruz().unwrap();
        let names: Vec<&str> = registry.names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);

        let unique: BTreeSet<&str> = names.iter().copied().collect();
        assert_eq!(unique.len(), names.len(), "Duplicate district names");
    }

    #[test]
    fn adjacency_is_directed_as_given() {
        let registry = DistrictRegistry::from_toml_str(small_table()).unwrap();
        let a = registry.id("A").unwrap();
        let b = registry.id("B").unwrap();
        assert!(registry.is_adjacent(b, a));
        assert!(!registry.is_adjacent(a, b));
        assert_eq!(registry.neighbors(b), &[a]);
        assert!(registry.neighbors(a).is_empty());
    }

    #[test]
    fn ids_follow_name_order() {
        let registry = DistrictRegistry::from_toml_str(small_table()).unwrap();
        assert_eq!(registry.id("A").unwrap().index(), 0);
        assert_eq!(registry.id("B").unwrap().index(), 1);
        assert!(registry.id("a").is_none(), "lookup must be exact");
    }

    #[test]
    fn unknown_district_density_is_zero() {
        let registry = DistrictRegistry::santa_cruz().unwrap();
        assert!(registry.density_of("Zentro").abs() < f64::EPSILON);
        assert!((registry.density_of("Centro") - 5488.0).abs() < f64::EPSILON);
    }

    #[test]
    fn densest_orders_by_density() {
        let registry = DistrictRegistry::santa_cruz().unwrap();
        assert_eq!(registry.densest(2), vec!["Plan Tres Mil", "Norte"]);
    }

    #[test]
    fn adjacency_matrix_lists_every_district() {
        let registry = DistrictRegistry::santa_cruz().unwrap();
        let matrix = registry.adjacency_matrix();
        assert_eq!(matrix.len(), EXPECTED_DISTRICT_COUNT);
        assert_eq!(
            matrix["Centro"],
            vec!["Equipetrol", "Oeste", "Sur", "Villa 1ro de Mayo"]
        );
    }

    #[test]
    fn rejects_unknown_adjacent() {
        let toml_str = small_table().replace(
            r#"adjacent_districts = ["A"]"#,
            r#"adjacent_districts = ["Z"]"#,
        );
        let err = DistrictRegistry::from_toml_str(&toml_str).unwrap_err();
        assert!(
            matches!(err, RegistryError::UnknownAdjacent { ref adjacent, .. } if adjacent == "Z"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn rejects_self_adjacency() {
        let toml_str = small_table().replace(
            r#"adjacent_districts = ["A"]"#,
            r#"adjacent_districts = ["B"]"#,
        );
        let err = DistrictRegistry::from_toml_str(&toml_str).unwrap_err();
        assert!(
            matches!(err, RegistryError::SelfAdjacent { .. }),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn rejects_duplicate_names() {
        let toml_str = small_table().replace(r#"name = "B""#, r#"name = "A""#);
        let err = DistrictRegistry::from_toml_str(&toml_str).unwrap_err();
        assert!(
            matches!(err, RegistryError::DuplicateDistrict { .. }),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn rejects_non_positive_area() {
        let toml_str = small_table().replacen("area_km2 = 1.0", "area_km2 = 0.0", 1);
        let err = DistrictRegistry::from_toml_str(&toml_str).unwrap_err();
        assert!(
            matches!(err, RegistryError::InvalidMeasure { field: "area_km2", .. }),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = DistrictRegistry::from_toml_str("city = ").unwrap_err();
        assert!(
            matches!(err, RegistryError::Parse(_)),
            "unexpected error: {err}"
        );
    }
}
