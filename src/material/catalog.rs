use super::gas::GasRecipe;
use super::nist::{STANDARD_MATERIALS, build};
use super::{GasState, Material};
use crate::HasName;
use crate::error::{GeometryError, Result};
use crate::units::{ATMOSPHERE, KELVIN};
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves material names to fully specified materials.
///
/// Resolution order is fixed: custom gas recipes first, then the embedded
/// standard database. Standard materials and fixed-density custom gases are
/// built once and shared; state-dependent gases are built per request.
#[derive(Debug, Clone)]
pub struct MaterialCatalog {
    custom: Vec<GasRecipe>,
    /// Prebuilt fixed-density custom materials, keyed by recipe name.
    fixed: HashMap<String, Arc<Material>>,
    standard: HashMap<String, Arc<Material>>,
    default_state: GasState,
}

impl MaterialCatalog {
    /// Catalog with no custom recipes and the full standard database.
    pub fn standard_only() -> Self {
        let standard = STANDARD_MATERIALS
            .iter()
            .filter_map(build)
            .map(|m| (m.name.clone(), Arc::new(m)))
            .collect();
        Self {
            custom: Vec::new(),
            fixed: HashMap::new(),
            standard,
            default_state: GasState::new(15.0 * ATMOSPHERE, 273.15 * KELVIN),
        }
    }

    /// Catalog with the `Xenon`, `Xenon136` and `Air` recipes and the
    /// standard database.
    pub fn new() -> Self {
        let mut catalog = Self::standard_only();
        catalog.add_custom(GasRecipe::xenon());
        catalog.add_custom(GasRecipe::xenon136());
        catalog.add_custom(GasRecipe::air());
        catalog
    }

    /// Adds a custom recipe, replacing any recipe with the same name.
    pub fn add_custom(&mut self, recipe: GasRecipe) {
        self.custom.retain(|r| r.name != recipe.name);
        self.fixed.remove(&recipe.name);
        if !recipe.is_state_dependent() {
            let material = recipe.material_at(self.default_state);
            self.fixed.insert(recipe.name.clone(), Arc::new(material));
        }
        self.custom.push(recipe);
    }

    /// Resolves a name at the catalog's default state.
    pub fn resolve(&self, name: &str) -> Result<Arc<Material>> {
        self.resolve_at(name, self.default_state)
    }

    /// Resolves a name, deriving state-dependent gas densities at `state`.
    pub fn resolve_at(&self, name: &str, state: GasState) -> Result<Arc<Material>> {
        if let Some(recipe) = self.custom.iter().find(|r| r.name == name) {
            if let Some(material) = self.fixed.get(name) {
                return Ok(Arc::clone(material));
            }
            log::debug!("Deriving '{}' at {:?}", name, state);
            return Ok(Arc::new(recipe.material_at(state)));
        }
        if let Some(material) = self.standard.get(name) {
            return Ok(Arc::clone(material));
        }
        Err(GeometryError::UnresolvedMaterial(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.custom.iter().any(|r| r.name == name) || self.standard.contains_key(name)
    }

    /// True if resolving `name` depends on the requested state.
    pub fn is_state_dependent(&self, name: &str) -> bool {
        self.custom
            .iter()
            .any(|r| r.name == name && r.is_state_dependent())
    }

    /// All resolvable names: custom recipes in insertion order, then the
    /// standard database sorted by name.
    pub fn names(&self) -> Vec<&str> {
        let mut standard: Vec<&str> = self.standard.keys().map(|k| k.as_str()).collect();
        standard.sort_unstable();
        self.custom
            .iter()
            .map(|r| r.get_name())
            .chain(standard)
            .collect()
    }
}

impl Default for MaterialCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::gas::DensityRule;
    use crate::material::{Element, State};
    use crate::units::{G_PER_CM3, G_PER_MOLE, KG_PER_M3};

    #[test]
    fn test_resolve_standard() {
        let catalog = MaterialCatalog::new();
        let steel = catalog.resolve("G4_STAINLESS-STEEL").unwrap();
        assert_eq!(steel.state, State::Solid);
        assert!((steel.density - 8.0 * G_PER_CM3).abs() < 1e-9);
    }

    #[test]
    fn test_standard_materials_are_shared() {
        let catalog = MaterialCatalog::new();
        let a = catalog.resolve("G4_lAr").unwrap();
        let b = catalog.resolve("G4_lAr").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_resolve_unknown() {
        let catalog = MaterialCatalog::new();
        let err = catalog.resolve("unobtainium").unwrap_err();
        assert_eq!(err, GeometryError::UnresolvedMaterial("unobtainium".to_string()));
        assert!(!catalog.contains("unobtainium"));
    }

    #[test]
    fn test_custom_before_standard() {
        let mut catalog = MaterialCatalog::new();
        let ar = Element::new("Argon", "Ar", 18, 39.948 * G_PER_MOLE);
        catalog.add_custom(GasRecipe::new(
            "G4_Ar",
            vec![(ar, 1.0)],
            DensityRule::Fixed {
                density: 42.0 * KG_PER_M3,
                conditions: GasState::ntp(),
            },
        ));
        let m = catalog.resolve("G4_Ar").unwrap();
        assert!((m.density - 42.0).abs() < 1e-12);
    }

    #[test]
    fn test_xenon_at_state() {
        let catalog = MaterialCatalog::new();
        let at_1 = catalog
            .resolve_at("Xenon", GasState::new(1.0 * ATMOSPHERE, 273.15))
            .unwrap();
        let at_10 = catalog
            .resolve_at("Xenon", GasState::new(10.0 * ATMOSPHERE, 273.15))
            .unwrap();
        assert!((at_10.density / at_1.density - 10.0).abs() < 1e-9);
        assert!(catalog.is_state_dependent("Xenon"));
        assert!(!catalog.is_state_dependent("Air"));
    }

    #[test]
    fn test_names_order() {
        let catalog = MaterialCatalog::new();
        let names = catalog.names();
        assert_eq!(&names[..3], &["Xenon", "Xenon136", "Air"]);
        assert!(names.contains(&"G4_Galactic"));
    }

    #[test]
    fn test_add_custom_replaces() {
        let mut catalog = MaterialCatalog::new();
        catalog.add_custom(GasRecipe::air());
        let count = catalog.names().iter().filter(|n| **n == "Air").count();
        assert_eq!(count, 1);
    }
}
