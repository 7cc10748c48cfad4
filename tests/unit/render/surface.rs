use super::*;

fn opaque(width: u32, height: u32, rgba: [u8; 4]) -> PreparedImage {
    PreparedImage::from_premul(width, height, rgba.repeat((width * height) as usize)).unwrap()
}

fn gradient_frame(width: u32, height: u32) -> VideoFrame {
    let mut data = Vec::new();
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[x as u8, y as u8, 7, 255]);
        }
    }
    VideoFrame::new(width, height, data).unwrap()
}

#[test]
fn video_frame_checks_buffer_length() {
    assert!(VideoFrame::new(2, 2, vec![0; 15]).is_err());
    assert!(VideoFrame::new(0, 2, vec![]).is_err());
}

#[test]
fn video_frame_rejects_short_buffer_before_it_reaches_the_renderer() {
    let err = VideoFrame::new(4, 4, vec![0; 48]).unwrap_err();
    assert!(matches!(err, TryOnError::Validation(_)), "{err}");
    assert!(err.to_string().contains("48 bytes"));

    let frame = VideoFrame::new(4, 4, vec![9; 64]).unwrap();
    assert_eq!((frame.width(), frame.height()), (4, 4));
    assert_eq!(frame.rgba8().len(), 64);
    let mut s = Surface::new(frame.canvas());
    s.draw_video(&frame, &ViewTransform::new(frame.canvas(), true));
    assert_eq!(s.pixel(3, 3), [9, 9, 9, 255]);
}

#[test]
fn draw_video_copies_pixels_unmirrored() {
    let frame = gradient_frame(4, 3);
    let mut s = Surface::new(frame.canvas());
    s.draw_video(&frame, &ViewTransform::new(frame.canvas(), false));
    assert_eq!(s.pixel(0, 0), [0, 0, 7, 255]);
    assert_eq!(s.pixel(3, 2), [3, 2, 7, 255]);
}

#[test]
fn draw_video_mirrors_columns() {
    let frame = gradient_frame(4, 3);
    let mut s = Surface::new(frame.canvas());
    s.draw_video(&frame, &ViewTransform::new(frame.canvas(), true));
    assert_eq!(s.pixel(0, 1), [3, 1, 7, 255]);
    assert_eq!(s.pixel(3, 1), [0, 1, 7, 255]);
}

#[test]
fn draw_video_forces_opaque_alpha() {
    let frame = VideoFrame::solid(2, 2, [10, 20, 30, 0]).unwrap();
    let mut s = Surface::new(frame.canvas());
    s.draw_video(&frame, &ViewTransform::new(frame.canvas(), false));
    assert_eq!(s.pixel(1, 1), [10, 20, 30, 255]);
}

#[test]
fn draw_image_identity_is_exact() {
    let mut s = Surface::new(Canvas::new(6, 6).unwrap());
    s.clear([0, 0, 0, 255]);
    let img = opaque(2, 2, [255, 0, 0, 255]);
    let touched = s.draw_image(&img, Affine::translate((2.0, 3.0)), 1.0);
    assert_eq!(touched, 4);
    assert_eq!(s.pixel(2, 3), [255, 0, 0, 255]);
    assert_eq!(s.pixel(3, 4), [255, 0, 0, 255]);
    assert_eq!(s.pixel(1, 3), [0, 0, 0, 255]);
    assert_eq!(s.pixel(4, 3), [0, 0, 0, 255]);
}

#[test]
fn draw_image_scales_up() {
    let mut s = Surface::new(Canvas::new(8, 8).unwrap());
    let img = opaque(1, 1, [0, 255, 0, 255]);
    s.draw_image(
        &img,
        Affine::translate((2.0, 2.0)) * Affine::scale(4.0),
        1.0,
    );
    assert_eq!(s.pixel(3, 3), [0, 255, 0, 255]);
    assert_eq!(s.pixel(0, 0), [0, 0, 0, 0]);
}

#[test]
fn draw_image_off_canvas_draws_nothing() {
    let mut s = Surface::new(Canvas::new(4, 4).unwrap());
    let img = opaque(2, 2, [255, 255, 255, 255]);
    assert_eq!(s.draw_image(&img, Affine::translate((100.0, 0.0)), 1.0), 0);
    assert_eq!(s.draw_image(&img, Affine::scale(0.0), 1.0), 0);
    assert!(s.data().iter().all(|&b| b == 0));
}

#[test]
fn draw_image_respects_opacity() {
    let mut s = Surface::new(Canvas::new(2, 2).unwrap());
    s.clear([0, 0, 0, 255]);
    let img = opaque(2, 2, [255, 255, 255, 255]);
    s.draw_image(&img, Affine::IDENTITY, 0.5);
    let p = s.pixel(0, 0);
    assert_eq!(p[3], 255);
    assert!((i32::from(p[0]) - 128).abs() <= 1);
}

#[test]
fn straight_copy_unpremultiplies() {
    let mut s = Surface::new(Canvas::new(1, 1).unwrap());
    s.set_pixel(0, 0, [64, 0, 0, 128]);
    let straight = s.to_straight_rgba8();
    assert_eq!(straight[3], 128);
    assert!((i32::from(straight[0]) - 128).abs() <= 1);
}
