use labelproof::builder::{DIELINE_NAME, WHITE_BACKER_NAME};
use labelproof::layers::{
    ANNOTATIONS_LAYER, ARTWORK_LAYER, GUIDES_LAYER, WHITE_BACKGROUND_LAYER, find_item_by_name,
    find_layer_by_name,
};
use labelproof::legend::LEGEND_OBJECT_NAME;
use labelproof::memory::{DocumentModel, Geometry, ItemModel, LayerModel, MemorySurface};
use labelproof::{
    Bounds, DocumentId, DrawingSurface, Error, LabelType, LayerId, ProofConfig,
    ProofContext, ProofWarning, ShapeType, create_proof, locate_dieline_by_name,
};
use labelproof_core::ShapeSpec;
use labelproof_core::geom::point;
use std::path::Path;

fn context_with_legends(dir: &Path, files: &[&str]) -> ProofContext {
    for file in files {
        std::fs::write(dir.join(file), b"%!PS-Adobe legend").unwrap();
    }
    ProofContext::default().with_legends(dir)
}

fn layer_names(surface: &MemorySurface, doc: DocumentId) -> Vec<String> {
    surface
        .layers(doc)
        .unwrap()
        .into_iter()
        .map(|l| surface.layer_name(l).unwrap())
        .collect()
}

fn item_names(surface: &MemorySurface, layer: LayerId) -> Vec<String> {
    surface
        .layer_items(layer)
        .unwrap()
        .into_iter()
        .filter_map(|id| surface.name_of(id).unwrap())
        .collect()
}

fn layer(surface: &MemorySurface, doc: DocumentId, name: &str) -> LayerId {
    find_layer_by_name(surface, doc, name).unwrap().unwrap()
}

#[test]
fn die_cut_three_by_two_builds_the_full_proof() {
    let legends = tempfile::tempdir().unwrap();
    let ctx = context_with_legends(legends.path(), &["Die-cut.ai"]);
    let config =
        ProofConfig::make(LabelType::DieCut, ShapeType::Squared, 3.0, 2.0).with_guidelines(true);
    let mut surface = MemorySurface::with_standard_actions();

    let outcome = create_proof(&mut surface, &config, &ctx).unwrap();
    let doc = outcome.document;

    assert_eq!(outcome.status(), "OK");
    assert!(outcome.warnings.is_empty());
    assert_eq!(
        layer_names(&surface, doc),
        vec![
            ANNOTATIONS_LAYER,
            ARTWORK_LAYER,
            GUIDES_LAYER,
            WHITE_BACKGROUND_LAYER
        ]
    );

    // Three offset contours plus the die line, all named.
    let artwork = layer(&surface, doc, ARTWORK_LAYER);
    let mut names = item_names(&surface, artwork);
    names.sort();
    assert_eq!(names, vec!["Backer", "Bleed", "Dieline", "Safezone"]);

    let guides = layer(&surface, doc, GUIDES_LAYER);
    let mut copies = item_names(&surface, guides);
    copies.sort();
    assert_eq!(copies, names);
    assert!(surface.is_layer_locked(guides).unwrap());

    // The artboard grows 1.125x around its original center.
    assert_eq!(
        surface.artboard_bounds(doc).unwrap(),
        Bounds::new(-13.5, -9.0, 229.5, 153.0)
    );

    let dieline = find_item_by_name(&surface, guides, DIELINE_NAME)
        .unwrap()
        .unwrap();
    assert_eq!(
        surface.bounds_of(dieline).unwrap(),
        Bounds::new(0.0, 0.0, 216.0, 144.0)
    );
    let bleed = find_item_by_name(&surface, artwork, "Bleed")
        .unwrap()
        .unwrap();
    let bleed_bounds = surface.bounds_of(bleed).unwrap();
    assert_eq!(bleed_bounds, Bounds::new(-4.5, -4.5, 220.5, 148.5));
    let (bleed_color, _) = surface.stroke_of(bleed).unwrap().unwrap();
    assert_eq!(surface.color_name(bleed_color).unwrap(), "BleedLine");

    // White backer: 2.5x on both axes (3 in and 2 in are under 6 in), filled, unstroked.
    let white = layer(&surface, doc, WHITE_BACKGROUND_LAYER);
    assert!(surface.is_layer_locked(white).unwrap());
    let backer = find_item_by_name(&surface, white, WHITE_BACKER_NAME)
        .unwrap()
        .unwrap();
    let backer_bounds = surface.bounds_of(backer).unwrap();
    assert_eq!(backer_bounds, Bounds::new(-162.0, -108.0, 378.0, 252.0));
    assert_eq!(surface.stroke_of(backer).unwrap(), None);
    let fill = surface.fill_of(backer).unwrap().unwrap();
    assert_eq!(surface.color_name(fill).unwrap(), "White Backer");

    // Dimension lines are anchored to the bleed and span the die line.
    let annotations = layer(&surface, doc, ANNOTATIONS_LAYER);
    assert!(surface.is_layer_locked(annotations).unwrap());
    let width_line = find_item_by_name(&surface, annotations, "Dimension Width")
        .unwrap()
        .unwrap();
    match surface.geometry_of(width_line).unwrap() {
        Geometry::Line { from, to } => {
            assert_eq!(from.x, 0.0);
            assert_eq!(to.x, 216.0);
            assert_eq!(from.y, bleed_bounds.max_y + 0.3625 * 72.0);
        }
        other => panic!("expected a line, got {other:?}"),
    }
    let height_line = find_item_by_name(&surface, annotations, "Dimension Height")
        .unwrap()
        .unwrap();
    assert_eq!(surface.bounds_of(height_line).unwrap().height(), 144.0);

    // Legend hangs from the top-left of the backer rectangle.
    let legend = find_item_by_name(&surface, annotations, LEGEND_OBJECT_NAME)
        .unwrap()
        .unwrap();
    match surface.geometry_of(legend).unwrap() {
        Geometry::Placed { asset, anchor, .. } => {
            assert_eq!(asset, &legends.path().join("Die-cut.ai"));
            assert_eq!(*anchor, backer_bounds.top_left());
        }
        other => panic!("expected a placed asset, got {other:?}"),
    }

    let spots: Vec<String> = surface
        .spot_colors(doc)
        .unwrap()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(
        spots,
        vec!["Dieline", "DimensionLine", "BleedLine", "White Backer"]
    );
}

#[test]
fn missing_legend_is_reported_without_failing() {
    let legends = tempfile::tempdir().unwrap();
    let ctx = context_with_legends(legends.path(), &[]);
    let config = ProofConfig::make(LabelType::Rolls, ShapeType::Rounded, 2.0, 1.0)
        .with_material(labelproof::Material::Metallic)
        .with_white_ink(labelproof::WhiteInk::Horizontal)
        .with_guidelines(true);
    let mut surface = MemorySurface::with_standard_actions();

    let outcome = create_proof(&mut surface, &config, &ctx).unwrap();

    assert_eq!(outcome.status(), "OK");
    assert_eq!(
        outcome.warnings,
        vec![ProofWarning::LegendNotFound {
            file_name: "Rolls_Metallic_WhiteHorizontal.ai".to_string()
        }]
    );
    let annotations = layer(&surface, outcome.document, ANNOTATIONS_LAYER);
    assert!(
        find_item_by_name(&surface, annotations, LEGEND_OBJECT_NAME)
            .unwrap()
            .is_none()
    );
    assert!(
        find_item_by_name(&surface, annotations, "Dimension Width")
            .unwrap()
            .is_some()
    );
}

#[test]
fn sheets_keep_their_artboard_and_skip_guidelines() {
    let config = ProofConfig::make(LabelType::Sheets, ShapeType::Round, 4.0, 3.0);
    let mut surface = MemorySurface::with_standard_actions();

    let outcome = create_proof(&mut surface, &config, &ProofContext::default()).unwrap();
    let doc = outcome.document;

    assert_eq!(
        surface.artboard_bounds(doc).unwrap(),
        Bounds::new(0.0, 0.0, 288.0, 216.0)
    );
    assert_eq!(layer_names(&surface, doc), vec![ARTWORK_LAYER, GUIDES_LAYER]);
    let artwork = layer(&surface, doc, ARTWORK_LAYER);
    let mut names = item_names(&surface, artwork);
    names.sort();
    assert_eq!(names, vec!["Bleed", "Dieline", "Safezone"]);
    match surface.geometry_of(outcome.dieline).unwrap() {
        Geometry::Shape(spec) => assert_eq!(spec.kind, labelproof_core::ShapeKind::Ellipse),
        other => panic!("expected a shape, got {other:?}"),
    }
}

#[test]
fn swapped_orientation_swaps_the_document_size() {
    let config = ProofConfig::make(LabelType::Rolls, ShapeType::Squared, 4.0, 1.0)
        .with_swapped_orientation(true);
    let mut surface = MemorySurface::with_standard_actions();

    let outcome = create_proof(&mut surface, &config, &ProofContext::default()).unwrap();

    let dieline = surface.bounds_of(outcome.dieline).unwrap();
    assert_eq!(dieline.width(), 72.0);
    assert_eq!(dieline.height(), 288.0);
    // The caller's config is untouched.
    assert_eq!(config.width_inches, Some(4.0));
}

#[test]
fn a_single_offset_path_leaves_the_drawn_shape_as_the_only_dieline() {
    // The inset collapses on a 0.1 in label, so only the outset contour comes back.
    let mut surface = MemorySurface::with_standard_actions();
    let config =
        ProofConfig::make(LabelType::Sheets, ShapeType::Squared, 0.1, 0.1).with_guidelines(true);

    let outcome = create_proof(&mut surface, &config, &ProofContext::default()).unwrap();
    let doc = outcome.document;
    let dieline_bounds = Bounds::new(0.0, 0.0, 7.2, 7.2);

    assert_eq!(surface.bounds_of(outcome.dieline).unwrap(), dieline_bounds);
    assert_eq!(
        surface.name_of(outcome.dieline).unwrap().as_deref(),
        Some(DIELINE_NAME)
    );

    let artwork = layer(&surface, doc, ARTWORK_LAYER);
    let guides = layer(&surface, doc, GUIDES_LAYER);
    for target in [artwork, guides] {
        let dielines: Vec<Bounds> = surface
            .layer_items(target)
            .unwrap()
            .into_iter()
            .filter(|id| surface.name_of(*id).unwrap().as_deref() == Some(DIELINE_NAME))
            .map(|id| surface.bounds_of(id).unwrap())
            .collect();
        assert_eq!(dielines, vec![dieline_bounds]);
    }
    assert_eq!(item_names(&surface, guides), vec![DIELINE_NAME.to_string()]);

    // The outset path stays in Artwork, unnamed.
    let artwork_items = surface.layer_items(artwork).unwrap();
    assert_eq!(artwork_items.len(), 2);
    let unnamed: Vec<Bounds> = artwork_items
        .into_iter()
        .filter(|id| surface.name_of(*id).unwrap().is_none())
        .map(|id| surface.bounds_of(id).unwrap())
        .collect();
    assert_eq!(unnamed.len(), 1);
    let expected = dieline_bounds.inflate(4.5);
    for (got, want) in [
        (unnamed[0].min_x, expected.min_x),
        (unnamed[0].min_y, expected.min_y),
        (unnamed[0].max_x, expected.max_x),
        (unnamed[0].max_y, expected.max_y),
    ] {
        assert!((got - want).abs() < 1e-9, "{got} != {want}");
    }

    // Dimension lines measure the die line itself.
    let annotations = layer(&surface, doc, ANNOTATIONS_LAYER);
    let width_line = find_item_by_name(&surface, annotations, "Dimension Width")
        .unwrap()
        .unwrap();
    let height_line = find_item_by_name(&surface, annotations, "Dimension Height")
        .unwrap()
        .unwrap();
    let width_span = surface.bounds_of(width_line).unwrap();
    let height_span = surface.bounds_of(height_line).unwrap();
    assert_eq!((width_span.min_x, width_span.max_x), (0.0, 7.2));
    assert_eq!((height_span.min_y, height_span.max_y), (0.0, 7.2));

    // No reclassification means no artboard change.
    assert_eq!(surface.artboard_bounds(doc).unwrap(), dieline_bounds);
}

#[test]
fn missing_offset_action_aborts_the_proof() {
    let mut surface = MemorySurface::new();
    let config = ProofConfig::make(LabelType::Sheets, ShapeType::Squared, 2.0, 2.0);

    let err = create_proof(&mut surface, &config, &ProofContext::default()).unwrap_err();

    assert!(matches!(err, Error::OffsetActionUnavailable { .. }));
    assert_eq!(
        err.to_string(),
        "Action 'Sheet Offset' not found in 'Proofer Actions' action set"
    );
}

#[test]
fn invalid_config_is_rejected_before_drawing() {
    let mut surface = MemorySurface::with_standard_actions();
    let config = ProofConfig::make(LabelType::Sheets, ShapeType::Squared, 0.0, 2.0);

    let err = create_proof(&mut surface, &config, &ProofContext::default()).unwrap_err();

    assert!(matches!(
        err,
        Error::Core(labelproof_core::Error::InvalidConfig { .. })
    ));
    assert!(surface.documents().is_empty());
}

#[test]
fn upload_of_a_missing_file_creates_no_document() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    let config = ProofConfig::upload(LabelType::Rolls, &missing).with_guidelines(true);
    let mut surface = MemorySurface::with_standard_actions();

    let err = create_proof(&mut surface, &config, &ProofContext::default()).unwrap_err();

    assert!(matches!(err, Error::DieLineFileNotFound { .. }));
    assert_eq!(
        err.to_string(),
        format!("File does not exist: {}", missing.display())
    );
    assert!(surface.documents().is_empty());
}

fn upload_fixture(with_dieline: bool) -> DocumentModel {
    let mut outer = LayerModel::new("Cut");
    let mut inner = LayerModel::new("Shapes");
    let shape = ItemModel::new(Geometry::Shape(ShapeSpec::rectangle(
        point(144.0, 108.0),
        144.0,
        72.0,
    )));
    inner.items = vec![if with_dieline {
        shape.named(DIELINE_NAME)
    } else {
        shape
    }];
    outer.sublayers = vec![inner];
    DocumentModel {
        title: "uploaded".to_string(),
        artboard: Bounds::from_origin_size(0.0, 0.0, 288.0, 216.0),
        spot_colors: Vec::new(),
        layers: vec![LayerModel::new("Artwork"), outer],
    }
}

fn write_fixture(dir: &Path, model: &DocumentModel) -> std::path::PathBuf {
    let path = dir.join("dieline.json");
    std::fs::write(&path, serde_json::to_string(model).unwrap()).unwrap();
    path
}

#[test]
fn upload_annotates_a_nested_dieline() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_fixture(dir.path(), &upload_fixture(true));
    let ctx = context_with_legends(dir.path(), &["Rolls.ai"]);
    let config = ProofConfig::upload(LabelType::Rolls, &file).with_guidelines(true);
    let mut surface = MemorySurface::with_standard_actions();

    let outcome = create_proof(&mut surface, &config, &ctx).unwrap();
    let doc = outcome.document;

    assert_eq!(
        locate_dieline_by_name(&surface, doc).unwrap(),
        Some(outcome.dieline)
    );
    assert!(outcome.warnings.is_empty());
    // Upload leaves the existing layers alone and adds annotations on top.
    assert_eq!(
        layer_names(&surface, doc),
        vec![ANNOTATIONS_LAYER, "Artwork", "Cut"]
    );
    let annotations = layer(&surface, doc, ANNOTATIONS_LAYER);
    assert!(surface.is_layer_locked(annotations).unwrap());

    // Rolls 2to4 for the 2 in width, anchored on the die line itself.
    let width_line = find_item_by_name(&surface, annotations, "Dimension Width")
        .unwrap()
        .unwrap();
    let line = surface.bounds_of(width_line).unwrap();
    assert_eq!(line.min_x, 72.0);
    assert_eq!(line.max_x, 216.0);
    assert_eq!(line.min_y, 144.0 + 0.2375 * 72.0);

    let legend = find_item_by_name(&surface, annotations, LEGEND_OBJECT_NAME)
        .unwrap()
        .unwrap();
    match surface.geometry_of(legend).unwrap() {
        Geometry::Placed { anchor, .. } => assert_eq!(*anchor, point(0.0, 216.0)),
        other => panic!("expected a placed asset, got {other:?}"),
    }
    let spots: Vec<String> = surface
        .spot_colors(doc)
        .unwrap()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(spots, vec!["DimensionLine"]);
}

#[test]
fn upload_without_a_dieline_fails() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_fixture(dir.path(), &upload_fixture(false));
    let config = ProofConfig::upload(LabelType::Sheets, &file);
    let mut surface = MemorySurface::with_standard_actions();

    let err = create_proof(&mut surface, &config, &ProofContext::default()).unwrap_err();

    assert!(matches!(err, Error::DielineNotFound));
    assert_eq!(err.to_string(), "Cannot find Dieline in uploaded file");
}
