use super::*;

use crate::foundation::core::{Canvas, Landmark};

fn outline(forehead: (f64, f64), chin: (f64, f64), left: (f64, f64), right: (f64, f64)) -> LandmarkSet {
    let mut pts = vec![Landmark::new(0.5, 0.5, 0.0); face_index::MESH_LEN];
    pts[face_index::FOREHEAD] = Landmark::new(forehead.0, forehead.1, 0.0);
    pts[face_index::CHIN] = Landmark::new(chin.0, chin.1, 0.0);
    pts[face_index::LEFT_CHEEK] = Landmark::new(left.0, left.1, 0.0);
    pts[face_index::RIGHT_CHEEK] = Landmark::new(right.0, right.1, 0.0);
    LandmarkSet::new(pts)
}

fn centered_face() -> LandmarkSet {
    outline((0.5, 0.4), (0.5, 0.6), (0.4, 0.5), (0.6, 0.5))
}

fn view(mirrored: bool) -> ViewTransform {
    ViewTransform::new(Canvas::new(100, 100).unwrap(), mirrored)
}

fn surfaces() -> (Surface, Surface) {
    let canvas = Canvas::new(100, 100).unwrap();
    let mut base = Surface::new(canvas);
    base.clear([10, 20, 30, 255]);
    let mut composite = Surface::new(canvas);
    composite.clear([200, 150, 0, 255]);
    (composite, base)
}

#[test]
fn head_region_is_padded_asymmetrically() {
    let c = OcclusionCompositor::new(OcclusionConfig::default());
    let r = c.head_region(&centered_face(), &view(false)).unwrap();
    // box 40..60 x 40..60, pad_x 3.6, pad_top 8, pad_bottom 2
    assert_eq!(r, PixelRect { x0: 36, y0: 32, x1: 64, y1: 62 });
}

#[test]
fn head_region_is_clipped_to_canvas() {
    let c = OcclusionCompositor::new(OcclusionConfig::default());
    let face = outline((0.5, 0.05), (0.5, 0.95), (0.0, 0.5), (1.0, 0.5));
    let r = c.head_region(&face, &view(false)).unwrap();
    assert_eq!(r, PixelRect { x0: 0, y0: 0, x1: 100, y1: 100 });
}

#[test]
fn head_region_requires_outline_points() {
    let c = OcclusionCompositor::new(OcclusionConfig::default());
    let short = LandmarkSet::new(vec![Landmark::default(); 20]);
    assert!(c.head_region(&short, &view(false)).is_none());
}

#[test]
fn full_person_mask_restores_only_inside_region() {
    let c = OcclusionCompositor::new(OcclusionConfig::default());
    let (mut composite, base) = surfaces();
    let before = composite.clone();
    let mask = SegmentationMask::new(10, 10, vec![1; 100]).unwrap();

    let n = c.apply(&mut composite, &base, Some(&mask), &centered_face(), &view(false));
    let region = c.head_region(&centered_face(), &view(false)).unwrap();
    assert_eq!(n as u64, region.area());

    for y in 0..100 {
        for x in 0..100 {
            if region.contains(x, y) {
                assert_eq!(composite.pixel(x, y), base.pixel(x, y));
            } else {
                assert_eq!(composite.pixel(x, y), before.pixel(x, y));
            }
        }
    }
}

#[test]
fn background_pixels_keep_the_jewelry() {
    let c = OcclusionCompositor::new(OcclusionConfig::default());
    let (mut composite, base) = surfaces();
    let before = composite.clone();
    let mask = SegmentationMask::new(4, 4, vec![0; 16]).unwrap();
    let n = c.apply(&mut composite, &base, Some(&mask), &centered_face(), &view(false));
    assert_eq!(n, 0);
    assert_eq!(composite, before);
}

#[test]
fn low_resolution_mask_is_scaled_per_axis() {
    let (mut composite, base) = surfaces();
    // left half person, right half background
    let mask = SegmentationMask::new(2, 1, vec![1, 0]).unwrap();
    let region = PixelRect { x0: 0, y0: 0, x1: 100, y1: 100 };
    restore_person_pixels(&mut composite, &base, &mask, region, &view(false)).unwrap();
    assert_eq!(composite.pixel(10, 50), base.pixel(10, 50));
    assert_eq!(composite.pixel(90, 50), [200, 150, 0, 255]);
}

#[test]
fn mask_lookup_follows_the_mirror() {
    let (mut composite, base) = surfaces();
    let mask = SegmentationMask::new(2, 1, vec![1, 0]).unwrap();
    let region = PixelRect { x0: 0, y0: 0, x1: 100, y1: 100 };
    restore_person_pixels(&mut composite, &base, &mask, region, &view(true)).unwrap();
    assert_eq!(composite.pixel(10, 50), [200, 150, 0, 255]);
    assert_eq!(composite.pixel(90, 50), base.pixel(90, 50));
}

#[test]
fn missing_mask_or_disabled_is_a_noop() {
    let (mut composite, base) = surfaces();
    let before = composite.clone();
    let c = OcclusionCompositor::new(OcclusionConfig::default());
    assert_eq!(c.apply(&mut composite, &base, None, &centered_face(), &view(false)), 0);

    let disabled = OcclusionCompositor::new(OcclusionConfig {
        enabled: false,
        ..OcclusionConfig::default()
    });
    let mask = SegmentationMask::new(1, 1, vec![1]).unwrap();
    assert_eq!(
        disabled.apply(&mut composite, &base, Some(&mask), &centered_face(), &view(false)),
        0
    );
    assert_eq!(composite, before);
}

#[test]
fn mismatched_surfaces_degrade_to_noop() {
    let c = OcclusionCompositor::new(OcclusionConfig::default());
    let (mut composite, _) = surfaces();
    let small = Surface::new(Canvas::new(10, 10).unwrap());
    let mask = SegmentationMask::new(1, 1, vec![1]).unwrap();
    assert_eq!(
        c.apply(&mut composite, &small, Some(&mask), &centered_face(), &view(false)),
        0
    );
}
