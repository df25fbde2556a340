use super::*;

fn engine(settings: EngineSettings) -> OgEngine {
    OgEngine::with_fonts(settings, FontBook::default()).unwrap()
}

#[test]
fn interpreter_uses_configured_bound() {
    let e = engine(EngineSettings {
        max_dimension: 512,
        ..EngineSettings::default()
    });
    let spec = e.interpret_query("width=2000&height=100");
    assert_eq!((spec.width, spec.height), (512, 100));
    assert_eq!(e.interpreter().max_dimension(), 512);
    assert!(e.fonts().is_empty());
}

#[tokio::test]
async fn render_produces_requested_size() {
    let e = engine(EngineSettings::default());
    let spec = e.interpret_query("width=300&height=150&pattern=grid");
    let card = e.render(&spec).await.unwrap();
    assert_eq!((card.width, card.height), (300, 150));
}

#[tokio::test]
async fn broken_logo_does_not_fail_render() {
    let e = engine(EngineSettings {
        logo_timeout: Duration::from_millis(200),
        ..EngineSettings::default()
    });
    let spec = e.interpret_query("logo=data%3Atext%2Fplain%2Cnope&width=200&height=100");
    let png = e.render_png(&spec).await.unwrap();
    let img = image::load_from_memory(&png).unwrap();
    assert_eq!((img.width(), img.height()), (200, 100));
}

#[test]
fn missing_font_file_is_an_error() {
    let err = OgEngine::new(EngineSettings {
        font_path: Some(PathBuf::from("/nonexistent/font.ttf")),
        ..EngineSettings::default()
    })
    .unwrap_err();
    assert!(matches!(err, OgError::Other(_)));
}
