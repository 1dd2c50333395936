use super::*;

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, b"not really a font").unwrap();
}

fn fixture() -> (tempfile::TempDir, FontDiscovery) {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("fonts");
    touch(&root.join("Roboto-Regular.ttf"));
    touch(&root.join("nested").join("Arial.TTF"));
    touch(&root.join("nested").join("ArialNarrow.otf"));
    touch(&root.join("README.txt"));
    let discovery = FontDiscovery::with_directories(
        vec![root, tmp.path().join("missing")],
        vec![tmp.path().join("nope.ttf"), tmp.path().join("fonts").join("Roboto-Regular.ttf")],
    );
    (tmp, discovery)
}

#[test]
fn scan_finds_font_files_recursively() {
    let (_tmp, d) = fixture();
    let fonts = d.discover_fonts();
    assert_eq!(fonts.len(), 3);
    assert!(fonts.iter().all(|p| is_font_file(p)));
}

#[test]
fn exact_stem_match_wins_over_substring() {
    let (_tmp, d) = fixture();
    let found = d.find_font_by_name("arial").unwrap();
    assert_eq!(found.file_name().unwrap(), "Arial.TTF");
}

#[test]
fn substring_match_falls_back() {
    let (_tmp, d) = fixture();
    let found = d.find_font_by_name("roboto").unwrap();
    assert_eq!(found.file_name().unwrap(), "Roboto-Regular.ttf");
    assert!(d.find_font_by_name("Garamond").is_none());
    assert!(d.find_font_by_name("  ").is_none());
}

#[test]
fn scan_is_cached_until_cleared() {
    let (tmp, d) = fixture();
    let first = d.discover_fonts();
    touch(&tmp.path().join("fonts").join("Late.ttf"));
    let second = d.discover_fonts();
    assert!(Arc::ptr_eq(&first, &second));

    d.clear_cache();
    assert_eq!(d.discover_fonts().len(), 4);
}

#[test]
fn concurrent_first_use_scans_once() {
    let (_tmp, d) = fixture();
    let d = Arc::new(d);
    let lists: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let d = d.clone();
                s.spawn(move || d.discover_fonts())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(lists.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[test]
fn random_font_comes_from_scan() {
    let (_tmp, d) = fixture();
    let fonts = d.discover_fonts();
    let picked = d.random_font().unwrap();
    assert!(fonts.contains(&picked));

    let empty = FontDiscovery::with_directories(Vec::new(), Vec::new());
    assert!(empty.random_font().is_none());
}

#[test]
fn default_font_is_first_existing_candidate() {
    let (_tmp, d) = fixture();
    let picked = d.default_font().unwrap();
    assert_eq!(picked.file_name().unwrap(), "Roboto-Regular.ttf");
}

#[test]
fn home_prefix_is_expanded() {
    let p = expand_home("/usr/share/fonts/");
    assert_eq!(p, PathBuf::from("/usr/share/fonts/"));
}
