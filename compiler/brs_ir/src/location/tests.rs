use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_display_single_column() {
    let loc = Location::on_line("main.brs", 3, 7, 7);
    assert_eq!(loc.to_string(), "main.brs(3,7)");
}

#[test]
fn test_display_column_range() {
    let loc = Location::on_line("main.brs", 3, 7, 12);
    assert_eq!(loc.to_string(), "main.brs(3,7-12)");
}

#[test]
fn test_display_multi_line_repeats_end_line() {
    let loc = Location::new("lib.brs", Position::new(2, 4), Position::new(5, 9));
    assert_eq!(loc.to_string(), "lib.brs(2,4,5,5)");
}

#[test]
fn test_format_pkg() {
    let loc = Location::on_line("source/main.brs", 14, 0, 10);
    assert_eq!(loc.format_pkg(), "pkg:/source/main.brs(14)");
}

#[test]
fn test_format_pkg_keeps_existing_prefix() {
    let loc = Location::on_line("pkg:/source/main.brs", 3, 0, 4);
    assert_eq!(loc.format_pkg(), "pkg:/source/main.brs(3)");
}

#[test]
fn test_format_pkg_unknown_line() {
    let loc = Location::internal();
    assert!(loc.is_unknown());
    assert_eq!(loc.format_pkg(), "pkg:/(internal)(??)");
}

#[test]
fn test_merge_covers_both() {
    let a = Location::on_line("a.brs", 2, 5, 8);
    let b = Location::new("a.brs", Position::new(1, 9), Position::new(4, 1));
    let merged = a.merge(&b);
    assert_eq!(merged.start, Position::new(1, 9));
    assert_eq!(merged.end, Position::new(4, 1));
    assert_eq!(&*merged.file, "a.brs");
}

#[test]
fn test_file_is_shared() {
    let file: Arc<str> = Arc::from("shared.brs");
    let a = Location::new(Arc::clone(&file), Position::new(1, 1), Position::new(1, 2));
    let b = a.clone();
    assert!(Arc::ptr_eq(&a.file, &b.file));
}
