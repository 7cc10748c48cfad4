use super::*;
use crate::foundation::core::Canvas;
use crate::render::surface::Surface;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "tryon_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn shot(name: &str) -> Snapshot {
    let s = Surface::new(Canvas::new(2, 2).unwrap());
    Snapshot::encode(&s, Some(name), None).unwrap()
}

#[test]
fn vec_sink_collects_in_order() {
    let mut sink = Vec::new();
    sink.accept(&shot("a.png")).unwrap();
    sink.accept(&shot("b.png")).unwrap();
    let names: Vec<_> = sink.iter().map(|s| s.file_name.as_str()).collect();
    assert_eq!(names, vec!["a.png", "b.png"]);
}

#[test]
fn directory_sink_writes_unique_files() {
    let dir = temp_dir("sink");
    let mut sink = DirectorySink::create(&dir).unwrap();
    sink.accept(&shot("ruby.jpg")).unwrap();
    sink.accept(&shot("ruby.png")).unwrap();
    sink.accept(&shot("pearl.png")).unwrap();

    let names: Vec<_> = sink
        .written()
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["ruby.png", "ruby_2.png", "pearl.png"]);
    for p in sink.written() {
        let bytes = std::fs::read(p).unwrap();
        assert!(image::load_from_memory(&bytes).is_ok());
    }
    let _ = std::fs::remove_dir_all(&dir);
}
