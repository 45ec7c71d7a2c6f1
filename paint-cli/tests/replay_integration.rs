//! Replay and export integration tests (paint-cli).

use std::path::Path;

use paint_cli::{export, run, PaintConfig};
use paint_core::{Color, ElementKind, RasterImage, Shape};
use paint_renderer::image::{encode_png, load_image_from_bytes};

fn config_in(dir: &Path) -> PaintConfig {
    let mut config = PaintConfig::new();
    config.width = 400;
    config.height = 300;
    config.output = Some(dir.join("out.png"));
    config.renderer.load_system_fonts = false;
    config
}

fn write_script(dir: &Path, json: &str) -> std::path::PathBuf {
    let path = dir.join("script.json");
    std::fs::write(&path, json).expect("write script");
    path
}

fn write_png(dir: &Path, name: &str, width: u32, height: u32, rgba: [u8; 4]) -> std::path::PathBuf {
    let pixels = rgba.repeat((width * height) as usize);
    let raster = RasterImage::new(width, height, pixels).expect("raster");
    let path = dir.join(name);
    std::fs::write(&path, encode_png(&raster).expect("png")).expect("write png");
    path
}

#[tokio::test]
async fn test_script_replay_and_export() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = config_in(dir.path());
    config.svg_output = Some(dir.path().join("out.svg"));
    config.script = Some(write_script(
        dir.path(),
        r##"[
            {"type": "tool", "data": "rectangle"},
            {"type": "style", "data": {"primary": "#ff0000"}},
            {"type": "pointer", "data": {"phase": "down", "x": 10.0, "y": 10.0}},
            {"type": "pointer", "data": {"phase": "move", "x": 110.0, "y": 60.0}},
            {"type": "pointer", "data": {"phase": "up", "x": 110.0, "y": 60.0}},
            {"type": "tool", "data": "select"},
            {"type": "pointer", "data": {"phase": "down", "x": 50.0, "y": 50.0}},
            {"type": "pointer", "data": {"phase": "move", "x": 70.0, "y": 80.0}},
            {"type": "pointer", "data": {"phase": "up", "x": 70.0, "y": 80.0}}
        ]"##,
    ));

    let state = run(&config).await.expect("run");
    let rect = state.scene().last().expect("rect");
    assert_eq!(rect.kind(), ElementKind::Rectangle);
    assert_eq!(rect.style.primary, Color::rgb(255, 0, 0));
    assert_eq!(state.scene().selected(), Some(rect.id));

    let png_path = export(&state, &config).expect("export");
    let raster = load_image_from_bytes(&std::fs::read(&png_path).expect("read png")).expect("decode");
    assert_eq!((raster.width(), raster.height()), (400, 300));

    // Rectangle moved by (20, 30): now spans (30, 40) to (130, 90).
    let at = |x: u32, y: u32| {
        let i = ((y * raster.width() + x) * 4) as usize;
        raster.pixels()[i..i + 4].to_vec()
    };
    assert_eq!(at(80, 65), vec![255, 0, 0, 255]);
    assert_eq!(at(20, 20), vec![10, 10, 10, 255]);

    let svg = std::fs::read_to_string(dir.path().join("out.svg")).expect("read svg");
    assert!(svg.starts_with("<svg"));
    assert!(!svg.contains("stroke-dasharray"));
}

#[tokio::test]
async fn test_cli_imports_are_placed_before_script() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = config_in(dir.path());
    config.imports = vec![
        write_png(dir.path(), "wide.png", 8, 4, [0, 0, 255, 255]),
        dir.path().join("missing.png"),
    ];
    config.script = Some(write_script(
        dir.path(),
        r#"[{"type": "style", "data": {"stroke_width": 9.0}}]"#,
    ));

    let state = run(&config).await.expect("run");
    assert_eq!(state.scene().len(), 1);
    let image = state.scene().last().expect("image");
    assert!(matches!(image.shape, Shape::Image { size, .. } if (size.dy - 250.0).abs() < f32::EPSILON));
    // The style step restyles the selected image.
    assert!((image.style.stroke_width - 9.0).abs() < f32::EPSILON);
}

#[tokio::test]
async fn test_script_import_and_wait() {
    let dir = tempfile::tempdir().expect("tempdir");
    let image = write_png(dir.path(), "square.png", 4, 4, [0, 255, 0, 255]);
    let mut config = config_in(dir.path());
    config.script = Some(write_script(
        dir.path(),
        &format!(
            r#"[
                {{"type": "import", "data": {path}}},
                {{"type": "wait"}},
                {{"type": "delete_selected"}},
                {{"type": "import", "data": {path}}}
            ]"#,
            path = serde_json::to_string(&image).expect("path json"),
        ),
    ));

    let state = run(&config).await.expect("run");
    assert_eq!(state.scene().len(), 1);
}

#[tokio::test]
async fn test_missing_script_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = config_in(dir.path());
    config.script = Some(dir.path().join("nope.json"));
    assert!(run(&config).await.is_err());
}

#[tokio::test]
async fn test_declined_clear_keeps_scene() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = config_in(dir.path());
    config.script = Some(write_script(
        dir.path(),
        r#"[
            {"type": "pointer", "data": {"phase": "down", "x": 5.0, "y": 5.0}},
            {"type": "pointer", "data": {"phase": "up", "x": 5.0, "y": 5.0}},
            {"type": "clear", "data": {"confirm": false}}
        ]"#,
    ));
    assert_eq!(run(&config).await.expect("run").scene().len(), 1);

    config.script = Some(write_script(
        dir.path(),
        r#"[
            {"type": "pointer", "data": {"phase": "down", "x": 5.0, "y": 5.0}},
            {"type": "pointer", "data": {"phase": "up", "x": 5.0, "y": 5.0}},
            {"type": "clear", "data": {"confirm": true}}
        ]"#,
    ));
    assert!(run(&config).await.expect("run").scene().is_empty());
}
