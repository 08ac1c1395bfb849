use super::*;
use crate::text::font::{FontResolver, FontSource};

fn engine_with_default_font(size_px: f32) -> Option<TextLayoutEngine> {
    let font = match FontResolver::new(None).resolve("") {
        Ok(font) => font,
        Err(err) => {
            eprintln!("skipping: no system fonts ({err})");
            return None;
        }
    };
    let mut engine = TextLayoutEngine::new();
    engine.set_font(&font, size_px).unwrap();
    Some(engine)
}

#[test]
fn unbound_engine_reports_font_error() {
    let mut engine = TextLayoutEngine::new();
    assert!(engine.family().is_none());
    assert!(matches!(engine.layout_line("x"), Err(OverlayError::Font(_))));
    assert!(engine.layout_block("x", HAlign::Left, 0.0, 0).is_err());
    assert_eq!(engine.advance_width("x"), 0.0);
}

#[test]
fn set_font_rejects_bad_sizes() {
    let font = ResolvedFont {
        requested: String::new(),
        bytes: Arc::new(Vec::new()),
        index: 0,
        family: String::new(),
        source: crate::text::font::FontSource::Fallback(String::new()),
    };
    let mut engine = TextLayoutEngine::new();
    assert!(engine.set_font(&font, 0.0).is_err());
    assert!(engine.set_font(&font, f32::NAN).is_err());
}

#[test]
fn advance_width_grows_with_text() {
    let Some(mut engine) = engine_with_default_font(32.0) else {
        return;
    };
    assert!(engine.family().is_some());
    let a = engine.advance_width("a");
    let aaa = engine.advance_width("aaa");
    assert!(a > 0.0);
    assert!(aaa > a);
    assert_eq!(engine.advance_width(""), 0.0);
}

#[test]
fn block_bounds_cover_widest_line_and_stroke() {
    let Some(mut engine) = engine_with_default_font(24.0) else {
        return;
    };
    let wide = engine.advance_width("a much wider line");
    let block = engine
        .layout_block("short\na much wider line", HAlign::Center, 4.0, 3)
        .unwrap();

    assert_eq!(block.lines.len(), 2);
    assert_eq!(block.stroke_px, 3);
    assert_eq!(block.font_size, 24.0);
    assert_eq!(block.bounds.x0, 0.0);
    assert_eq!(block.bounds.y0, 0.0);
    assert!((block.bounds.width() - f64::from(wide + 6.0)).abs() < 1e-3);

    let single = engine.layout_block("short", HAlign::Center, 4.0, 3).unwrap();
    assert!(block.bounds.height() > single.bounds.height());
}

#[test]
fn line_spacing_adds_exactly_once_per_gap() {
    let Some(mut engine) = engine_with_default_font(20.0) else {
        return;
    };
    let tight = engine.layout_block("a\nb\nc", HAlign::Left, 0.0, 0).unwrap();
    let loose = engine.layout_block("a\nb\nc", HAlign::Left, 10.0, 0).unwrap();
    let delta = loose.bounds.height() - tight.bounds.height();
    assert!((delta - 20.0).abs() < 1e-3, "delta={delta}");
}

#[test]
fn alignment_moves_short_lines() {
    let Some(mut engine) = engine_with_default_font(20.0) else {
        return;
    };
    let text = "i\nmmmmmm";
    let first_x = |block: &TextBlock| block.lines[0].glyphs.first().map(|g| g.x).unwrap();

    let left = engine.layout_block(text, HAlign::Left, 0.0, 0).unwrap();
    let center = engine.layout_block(text, HAlign::Center, 0.0, 0).unwrap();
    let right = engine.layout_block(text, HAlign::Right, 0.0, 0).unwrap();
    assert!(first_x(&left) < first_x(&center));
    assert!(first_x(&center) < first_x(&right));
    assert_eq!(left.bounds, right.bounds);
}

#[test]
fn empty_text_yields_one_empty_line() {
    let Some(mut engine) = engine_with_default_font(20.0) else {
        return;
    };
    let block = engine.layout_block("", HAlign::Center, 4.0, 2).unwrap();
    assert_eq!(block.lines.len(), 1);
    assert!(block.lines[0].glyphs.is_empty());
    assert_eq!(block.bounds.width(), 4.0);
    assert!(block.bounds.height() > 4.0);
}

/// Pairs of faces sharing a family name but differing in weight, from the host fonts.
fn same_family_faces() -> Vec<(ResolvedFont, ResolvedFont)> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    let load = |id| {
        db.with_face_data(id, |data, index| (data.to_vec(), index))
            .map(|(bytes, index)| ResolvedFont {
                requested: String::new(),
                bytes: Arc::new(bytes),
                index,
                family: String::new(),
                source: FontSource::Fallback(String::new()),
            })
    };

    let faces: Vec<_> = db.faces().collect();
    let mut pairs = Vec::new();
    for (i, a) in faces.iter().enumerate() {
        let Some((family, _)) = a.families.first() else {
            continue;
        };
        let partner = faces[i + 1..].iter().find(|b| {
            b.families.first().is_some_and(|(f, _)| f == family)
                && b.weight != a.weight
                && b.style == a.style
        });
        if let Some(b) = partner
            && let (Some(fa), Some(fb)) = (load(a.id), load(b.id))
        {
            pairs.push((fa, fb));
        }
        if pairs.len() >= 8 {
            break;
        }
    }
    pairs
}

#[test]
fn switching_between_faces_of_one_family_measures_each_face() {
    let text = "Wide Bold Words";
    let fresh_width = |font: &ResolvedFont| {
        let mut engine = TextLayoutEngine::new();
        engine.set_font(font, 32.0).unwrap();
        engine.advance_width(text)
    };

    let Some((a, b, wa, wb)) = same_family_faces().into_iter().find_map(|(a, b)| {
        let (wa, wb) = (fresh_width(&a), fresh_width(&b));
        (wa != wb).then_some((a, b, wa, wb))
    }) else {
        eprintln!("skipping: no family with two differently sized faces on this host");
        return;
    };

    let mut engine = TextLayoutEngine::new();
    engine.set_font(&a, 32.0).unwrap();
    assert_eq!(engine.advance_width(text), wa);
    engine.set_font(&b, 32.0).unwrap();
    assert_eq!(engine.advance_width(text), wb);
    engine.set_font(&a, 32.0).unwrap();
    assert_eq!(engine.advance_width(text), wa);

    let block = engine.layout_block(text, HAlign::Left, 0.0, 0).unwrap();
    assert_eq!(block.bounds.width(), f64::from(wa));
}

#[test]
fn unknown_collection_index_is_a_font_error() {
    let Some(mut font) = FontResolver::new(None).resolve("").ok() else {
        eprintln!("skipping: no system fonts");
        return;
    };
    font.index = 999;
    let mut engine = TextLayoutEngine::new();
    assert!(matches!(engine.set_font(&font, 16.0), Err(OverlayError::Font(_))));
}
