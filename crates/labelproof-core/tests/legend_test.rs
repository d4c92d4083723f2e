use labelproof_core::{
    Error, LabelType, LegendKey, LegendLibrary, Material, ProofConfig, ShapeType, WhiteInk,
    legend_file_name,
};

#[test]
fn legend_file_names_are_deterministic() {
    assert_eq!(
        legend_file_name(LabelType::Rolls, Some(Material::Metallic), WhiteInk::Horizontal),
        "Rolls_Metallic_WhiteHorizontal.ai"
    );
    assert_eq!(
        legend_file_name(LabelType::Sheets, None, WhiteInk::None),
        "Sheets.ai"
    );
    assert_eq!(
        legend_file_name(LabelType::DieCut, None, WhiteInk::None),
        "Die-cut.ai"
    );
    assert_eq!(
        legend_file_name(LabelType::Custom, Some(Material::Clear), WhiteInk::Vertical),
        "Custom_Clear_WhiteVertical.ai"
    );
}

#[test]
fn legend_key_is_total_over_all_options() {
    let materials = [
        None,
        Some(Material::White),
        Some(Material::Clear),
        Some(Material::Metallic),
        Some(Material::Holographic),
    ];
    let inks = [WhiteInk::None, WhiteInk::Horizontal, WhiteInk::Vertical];
    let mut seen = std::collections::BTreeSet::new();
    for label_type in LabelType::ALL {
        for material in materials {
            for ink in inks {
                let name = LegendKey::new(label_type, material, ink).file_name();
                assert!(name.starts_with(label_type.as_str()));
                assert!(name.ends_with(".ai"));
                seen.insert(name);
            }
        }
    }
    assert_eq!(seen.len(), 4 * 5 * 3);
}

#[test]
fn legend_key_reads_the_config() {
    let cfg = ProofConfig::make(LabelType::Rolls, ShapeType::Round, 2.0, 2.0)
        .with_material(Material::Holographic)
        .with_white_ink(WhiteInk::Vertical);
    assert_eq!(
        LegendKey::from_config(&cfg).file_name(),
        "Rolls_Holographic_WhiteVertical.ai"
    );
}

#[test]
fn legend_library_reports_missing_assets() {
    let tmp = tempfile::tempdir().expect("tempdir");
    std::fs::write(tmp.path().join("Sheets.ai"), b"%!PS").expect("write legend");
    let lib = LegendLibrary::new(tmp.path());

    let found = lib
        .resolve(&LegendKey::new(LabelType::Sheets, None, WhiteInk::None))
        .expect("Sheets legend present");
    assert_eq!(found, tmp.path().join("Sheets.ai"));

    let err = lib
        .resolve(&LegendKey::new(LabelType::Rolls, None, WhiteInk::None))
        .unwrap_err();
    assert!(matches!(err, Error::LegendNotFound { ref file_name, .. } if file_name == "Rolls.ai"));
    assert_eq!(err.to_string(), "Legend file not found: Rolls.ai");
}
