use detector3d::io::{read_parameters, write_parameters};
use detector3d::material::element::find_element;
use detector3d::material::gas::{DensityRule, GasRecipe};
use detector3d::units::{ATMOSPHERE, G_PER_CM3, KELVIN};
use detector3d::{
    ConcentricGeometryBuilder, GasState, GeometryError, GeometryParameters, MaterialCatalog,
    State,
};
use tempfile::tempdir;

#[test]
fn test_custom_recipes_take_precedence() {
    let mut catalog = MaterialCatalog::new();
    let standard = catalog.resolve("G4_Ar").unwrap();
    assert_eq!(standard.state, State::Gas);

    let ar = find_element("Ar").unwrap();
    catalog.add_custom(GasRecipe::new("G4_Ar", vec![(ar, 1.0)], DensityRule::IdealGas));
    let state = GasState::new(10.0 * ATMOSPHERE, 300.0 * KELVIN);
    let custom = catalog.resolve_at("G4_Ar", state).unwrap();

    // 10 atm argon at 300 K is roughly 16 kg/m3
    assert!((custom.density - 16.2).abs() < 0.2);
    assert!(custom.density > 5.0 * standard.density);
    assert!(catalog.is_state_dependent("G4_Ar"));
}

#[test]
fn test_names_list_custom_first() {
    let catalog = MaterialCatalog::new();
    let names = catalog.names();
    assert_eq!(&names[..3], &["Xenon", "Xenon136", "Air"]);
    assert!(names.contains(&"G4_STAINLESS-STEEL"));
    assert!(!catalog.contains("unobtainium"));
}

#[test]
fn test_standard_only_catalog_lacks_default_world() {
    let catalog = MaterialCatalog::standard_only();
    let res = ConcentricGeometryBuilder::new().build(&GeometryParameters::default(), &catalog);
    assert_eq!(res.unwrap_err(), GeometryError::UnresolvedMaterial("Air".to_string()));
}

#[test]
fn test_build_from_config_file() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("detector.json");
    let params = GeometryParameters {
        target_material: "Xenon136".to_string(),
        wall_material: "G4_Cu".to_string(),
        ..Default::default()
    };
    write_parameters(&path, &params)?;

    let loaded = read_parameters(&path)?;
    let g = ConcentricGeometryBuilder::new().build(&loaded, &MaterialCatalog::new())?;
    let target = g.target().unwrap();
    assert_eq!(target.material.name, "Xenon136");
    assert!((target.material.density - 80.3).abs() < 1e-9);
    assert!((g.volume("Wall").unwrap().material.density - 8.96 * G_PER_CM3).abs() < 1e-6);
    Ok(())
}
