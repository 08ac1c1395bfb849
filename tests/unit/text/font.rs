use super::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "textoverlay_font_{name}_{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn list_fonts_filters_extensions_and_sorts() {
    let dir = scratch_dir("list");
    for name in ["b.ttf", "A.OTF", "c.ttc", "notes.txt", "noext"] {
        std::fs::write(dir.join(name), b"x").unwrap();
    }
    std::fs::create_dir_all(dir.join("nested.ttf")).unwrap();

    assert_eq!(list_fonts(&dir), vec!["A.OTF", "b.ttf", "c.ttc"]);

    let resolver = FontResolver::new(Some(dir.clone()));
    assert_eq!(resolver.available_fonts().len(), 3);
    assert_eq!(resolver.fonts_dir(), Some(dir.as_path()));
}

#[test]
fn list_fonts_of_missing_dir_is_empty() {
    let missing = std::env::temp_dir().join("textoverlay_definitely_missing_dir");
    assert!(list_fonts(&missing).is_empty());
    assert!(FontResolver::new(None).available_fonts().is_empty());
}

#[test]
fn directory_lookup_outcomes() {
    let dir = scratch_dir("lookup");
    std::fs::write(dir.join("broken.ttf"), b"not a font").unwrap();
    let resolver = FontResolver::new(Some(dir));

    assert!(resolver.from_directory("missing.ttf").unwrap().is_none());
    assert!(resolver.from_directory("../broken.ttf").unwrap().is_none());
    assert!(resolver.from_directory("broken.ttf").is_err());
    assert!(FontResolver::new(None).from_directory("broken.ttf").unwrap().is_none());
}

#[test]
fn unresolvable_identity_falls_back_instead_of_failing() {
    let dir = scratch_dir("fallback");
    std::fs::write(dir.join("broken.ttf"), b"not a font").unwrap();
    let mut resolver = FontResolver::new(Some(dir));

    for identity in ["broken.ttf", "No Such Family 1234.ttf"] {
        match resolver.resolve(identity) {
            Ok(font) => {
                assert!(matches!(font.source, FontSource::Fallback(_)), "{font:?}");
                assert_eq!(font.requested, identity);
                assert!(!font.bytes.is_empty());
            }
            Err(err) => {
                eprintln!("skipping: no system fonts ({err})");
                assert!(matches!(err, OverlayError::Font(_)));
            }
        }
    }
}

#[test]
fn directory_match_wins_over_system() {
    let mut system = FontResolver::new(None);
    let Ok(default) = system.resolve("") else {
        eprintln!("skipping: no system fonts available");
        return;
    };
    assert!(matches!(default.source, FontSource::Fallback(_)));

    let dir = scratch_dir("dirwins");
    std::fs::write(dir.join("Custom.ttf"), default.bytes.as_slice()).unwrap();
    let mut resolver = FontResolver::new(Some(dir.clone()));

    let font = resolver.resolve("Custom.ttf").unwrap();
    assert_eq!(font.source, FontSource::Directory(dir.join("Custom.ttf")));
    assert_eq!(font.bytes.as_slice(), default.bytes.as_slice());
    assert!(!font.family.is_empty());

    // Memoized: the second lookup returns the same bytes without re-reading.
    let again = resolver.resolve("Custom.ttf").unwrap();
    assert!(Arc::ptr_eq(&font.bytes, &again.bytes));
}
