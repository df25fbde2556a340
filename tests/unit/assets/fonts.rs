use super::*;

fn fake_face(weight: u16) -> FontFace {
    FontFace::new(Vec::new(), 0, "Fake".to_string(), weight)
}

fn style(size_px: f32, weight: u16) -> TextStyle {
    TextStyle {
        size_px,
        weight,
        line_height: 1.2,
        brush: TextBrushRgba8::default(),
    }
}

#[test]
fn face_for_weight_picks_nearest() {
    let book = FontBook {
        faces: vec![fake_face(400), fake_face(700)],
    };
    assert_eq!(book.face_for_weight(400).map(|(i, _)| i), Some(0));
    assert_eq!(book.face_for_weight(600).map(|(i, _)| i), Some(1));
    assert_eq!(book.face_for_weight(800).map(|(i, _)| i), Some(1));
    assert_eq!(book.family(), Some("Fake"));
}

#[test]
fn empty_book_lays_out_nothing() {
    let book = FontBook::default();
    assert!(book.is_empty());
    let mut engine = TextLayoutEngine::new(&book);
    assert!(engine.layout("Hello", style(32.0, 400), None).unwrap().is_none());
}

#[test]
fn invalid_size_is_rejected() {
    let book = FontBook::default();
    let mut engine = TextLayoutEngine::new(&book);
    assert!(engine.layout("Hello", style(0.0, 400), None).is_err());
    assert!(engine.layout("Hello", style(f32::NAN, 400), None).is_err());
}

#[test]
fn garbage_font_bytes_are_rejected() {
    assert!(FontBook::from_bytes(b"not a font".to_vec()).is_err());
    assert!(FontBook::from_file(Path::new("/definitely/missing/font.ttf")).is_err());
}

#[test]
fn brush_from_color() {
    let brush = TextBrushRgba8::from(ColorDef::rgba(1.0, 0.0, 0.0, 0.5));
    assert_eq!(
        brush,
        TextBrushRgba8 {
            r: 255,
            g: 0,
            b: 0,
            a: 128
        }
    );
}

#[test]
fn system_text_wraps_within_max_width() {
    let book = FontBook::system();
    if book.is_empty() {
        return;
    }
    let mut engine = TextLayoutEngine::new(&book);
    let text = "A fairly long headline that will certainly need more than one line";
    let one_line = engine
        .layout(text, style(48.0, 800), None)
        .unwrap()
        .unwrap();
    let wrapped = engine
        .layout(text, style(48.0, 800), Some(300.0))
        .unwrap()
        .unwrap();
    assert!(wrapped.width() <= 300.0 + 0.5);
    assert!(wrapped.height() > one_line.height());
}
