use labelproof::layers::{ANNOTATIONS_LAYER, find_item_by_name, find_layer_by_name};
use labelproof::memory::{DocumentModel, Geometry, ItemModel, LayerModel, MemorySurface};
use labelproof::svg::render_document;
use labelproof::{
    Bounds, DrawingSurface, LabelType, ProofConfig, ProofContext, ShapeType, create_proof,
};
use labelproof_core::geom::point;

fn render(config: &ProofConfig) -> String {
    let legends = tempfile::tempdir().unwrap();
    std::fs::write(legends.path().join("Die-cut.ai"), b"legend").unwrap();
    let ctx = ProofContext::default().with_legends(legends.path());
    let mut surface = MemorySurface::with_standard_actions();
    let outcome = create_proof(&mut surface, config, &ctx).unwrap();
    render_document(&surface.document_model(outcome.document).unwrap())
}

#[test]
fn svg_uses_the_artboard_as_viewport() {
    let config = ProofConfig::make(LabelType::Sheets, ShapeType::Squared, 4.0, 3.0);
    let svg = render(&config);
    let doc = roxmltree::Document::parse(&svg).unwrap();
    let root = doc.root_element();

    assert_eq!(root.tag_name().name(), "svg");
    assert_eq!(root.attribute("viewBox"), Some("0 0 288 216"));
    assert_eq!(root.attribute("width"), Some("288pt"));

    let dieline = doc
        .descendants()
        .find(|n| n.attribute("data-name") == Some("Dieline") && n.has_tag_name("rect"))
        .unwrap();
    assert_eq!(dieline.attribute("x"), Some("0"));
    assert_eq!(dieline.attribute("y"), Some("0"));
    assert_eq!(dieline.attribute("stroke"), Some("#ff00ff"));
    assert_eq!(dieline.attribute("fill"), Some("none"));
}

#[test]
fn svg_layers_paint_bottom_first_and_flag_locks() {
    let config =
        ProofConfig::make(LabelType::DieCut, ShapeType::Squared, 3.0, 2.0).with_guidelines(true);
    let svg = render(&config);
    let doc = roxmltree::Document::parse(&svg).unwrap();

    let layers: Vec<(&str, bool)> = doc
        .root_element()
        .children()
        .filter(|n| n.has_tag_name("g"))
        .map(|n| {
            (
                n.attribute("data-name").unwrap(),
                n.attribute("data-locked") == Some("true"),
            )
        })
        .collect();
    assert_eq!(
        layers,
        vec![
            ("White Background", true),
            ("Guides", true),
            ("Artwork", false),
            ("Annotations", true),
        ]
    );

    let bleed = doc
        .descendants()
        .find(|n| n.attribute("data-name") == Some("Bleed"))
        .unwrap();
    assert_eq!(bleed.attribute("stroke"), Some("#00ffff"));

    // Dimension lines reference the arrow marker of their band.
    assert!(doc.descendants().any(|n| n.attribute("id") == Some("arrow-50")));
    let width_line = doc
        .descendants()
        .find(|n| n.attribute("data-name") == Some("Dimension Width"))
        .unwrap();
    assert_eq!(width_line.attribute("marker-end"), Some("url(#arrow-50)"));

    let labels: Vec<&str> = doc
        .descendants()
        .filter(|n| n.has_tag_name("text"))
        .filter_map(|n| n.text())
        .collect();
    // Width is drawn first, so it sits lowest in the layer.
    assert_eq!(labels, vec!["3\"", "2\""]);

    let rotated = doc
        .descendants()
        .find(|n| n.has_tag_name("text") && n.text() == Some("2\""))
        .unwrap();
    assert!(rotated.attribute("transform").unwrap().starts_with("rotate(-90 "));
    assert!(doc.descendants().any(|n| n.has_tag_name("image")));
}

#[test]
fn uploaded_freeform_dieline_renders_as_a_polygon() {
    let dir = tempfile::tempdir().unwrap();
    let mut cut = LayerModel::new("Cut");
    cut.items = vec![
        ItemModel::new(Geometry::Path {
            points: vec![point(20.0, 10.0), point(180.0, 10.0), point(100.0, 90.0)],
        })
        .named("Dieline"),
    ];
    let model = DocumentModel {
        title: "triangle".to_string(),
        artboard: Bounds::from_origin_size(0.0, 0.0, 200.0, 100.0),
        spot_colors: Vec::new(),
        layers: vec![cut],
    };
    let json = serde_json::to_string(&model).unwrap();
    assert!(json.contains(r#""type":"path""#));
    let file = dir.path().join("triangle.json");
    std::fs::write(&file, json).unwrap();
    std::fs::write(dir.path().join("Sheets.ai"), b"legend").unwrap();

    let mut surface = MemorySurface::with_standard_actions();
    let config = ProofConfig::upload(LabelType::Sheets, &file).with_guidelines(true);
    let ctx = ProofContext::default().with_legends(dir.path());
    let outcome = create_proof(&mut surface, &config, &ctx).unwrap();

    assert_eq!(
        surface.bounds_of(outcome.dieline).unwrap(),
        Bounds::new(20.0, 10.0, 180.0, 90.0)
    );
    let annotations = find_layer_by_name(&surface, outcome.document, ANNOTATIONS_LAYER)
        .unwrap()
        .unwrap();
    let width_line = find_item_by_name(&surface, annotations, "Dimension Width")
        .unwrap()
        .unwrap();
    let span = surface.bounds_of(width_line).unwrap();
    assert_eq!((span.min_x, span.max_x), (20.0, 180.0));

    let svg = render_document(&surface.document_model(outcome.document).unwrap());
    let doc = roxmltree::Document::parse(&svg).unwrap();
    let polygon = doc
        .descendants()
        .find(|n| n.has_tag_name("polygon"))
        .unwrap();
    assert_eq!(polygon.attribute("data-name"), Some("Dieline"));
    // y is flipped against the artboard top.
    assert_eq!(polygon.attribute("points"), Some("20,90 180,90 100,10"));
}
