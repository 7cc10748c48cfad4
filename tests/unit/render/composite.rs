use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_half_opacity_mixes_opaque_layers() {
    let dst = [0, 0, 0, 255];
    let src = [200, 100, 0, 255];
    let out = over(dst, src, 0.5);
    assert_eq!(out[3], 255);
    assert!((i32::from(out[0]) - 100).abs() <= 1);
    assert!((i32::from(out[1]) - 50).abs() <= 1);
}

#[test]
fn premultiply_then_unpremultiply_is_close() {
    let mut px = vec![200u8, 100, 50, 128];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![100, 50, 25, 128]);
    unpremultiply_rgba8_in_place(&mut px);
    assert!((i32::from(px[0]) - 200).abs() <= 2);
    assert!((i32::from(px[1]) - 100).abs() <= 2);
    assert!((i32::from(px[2]) - 50).abs() <= 2);
}

#[test]
fn transparent_pixels_premultiply_to_zero() {
    let mut px = vec![255u8, 255, 255, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![0, 0, 0, 0]);
}
