use super::*;

#[test]
fn json_parses_with_optional_z() {
    let set = LandmarkSet::from_json_str(r#"[{"x":0.1,"y":0.2},{"x":0.3,"y":0.4,"z":-0.05}]"#)
        .unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.get(0), Some(Landmark::new(0.1, 0.2, 0.0)));
    assert_eq!(set.get(1), Some(Landmark::new(0.3, 0.4, -0.05)));
    assert_eq!(set.get(2), None);
}

#[test]
fn malformed_json_is_a_validation_error() {
    let err = LandmarkSet::from_json_str(r#"{"x":1}"#).unwrap_err();
    assert!(matches!(err, TryOnError::Validation(_)));
}

#[test]
fn serializes_as_a_plain_array() {
    let set: LandmarkSet = [Landmark::new(0.5, 0.25, 0.0)].into_iter().collect();
    let json = serde_json::to_string(&set).unwrap();
    assert!(json.starts_with('['));
    assert_eq!(LandmarkSet::from_json_str(&json).unwrap(), set);
}

#[test]
fn anchor_indices_fit_the_mesh() {
    for idx in [face_index::LEFT_EAR, face_index::RIGHT_EAR, face_index::NECK]
        .into_iter()
        .chain(face_index::HEAD_OUTLINE)
    {
        assert!(idx < face_index::MESH_LEN);
    }
    assert!(hand_index::INDEX_TIP < hand_index::HAND_LEN);
}
