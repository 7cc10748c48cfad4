use super::*;

fn frame() -> VideoFrame {
    VideoFrame::solid(4, 4, [0, 0, 0, 255]).unwrap()
}

#[test]
fn immediate_feed_replies_before_returning() {
    let mut feed = ImmediateFeed::new(|f: &VideoFrame| Detection::empty(f.canvas()));
    let rx = DetectionFeed::request(&mut feed, &frame());
    let d = rx.try_recv().unwrap();
    assert_eq!(d.frame_size, Canvas::new(4, 4).unwrap());
    assert!(d.face.is_none());
}

#[test]
fn in_flight_drops_requests_while_busy() {
    let (tx, rx) = mpsc::channel::<u32>();
    let mut guard = InFlight::new();
    assert!(guard.submit(|| rx));
    assert!(guard.is_busy());

    let mut called = false;
    assert!(!guard.submit(|| {
        called = true;
        mpsc::channel().1
    }));
    assert!(!called);

    assert_eq!(guard.poll(), None);
    tx.send(7).unwrap();
    assert_eq!(guard.poll(), Some(7));
    assert!(!guard.is_busy());
}

#[test]
fn in_flight_clears_on_disconnect() {
    let (tx, rx) = mpsc::channel::<u32>();
    let mut guard = InFlight::new();
    guard.submit(|| rx);
    drop(tx);
    assert_eq!(guard.poll(), None);
    assert!(!guard.is_busy());
}

#[test]
fn cancel_discards_a_late_reply() {
    let (tx, rx) = mpsc::channel::<u32>();
    let mut guard = InFlight::new();
    guard.submit(|| rx);
    guard.cancel();
    let _ = tx.send(1);
    assert_eq!(guard.poll(), None);
}

#[test]
fn throttle_enforces_the_interval() {
    let mut t = Throttle::new(Duration::from_millis(250));
    assert!(t.try_acquire(Duration::from_millis(0)));
    assert!(!t.try_acquire(Duration::from_millis(249)));
    assert!(t.try_acquire(Duration::from_millis(250)));
    assert!(!t.is_ready(Duration::from_millis(400)));
    assert!(t.is_ready(Duration::from_millis(500)));
}

#[test]
fn worker_feed_answers_from_its_thread() {
    let mut feed = WorkerFeed::spawn("test-seg", |f: &VideoFrame| {
        let len = (f.width() * f.height()) as usize;
        SegmentationMask::new(f.width(), f.height(), vec![1; len])
    })
    .unwrap();
    let rx = SegmentationFeed::request(&mut feed, &frame());
    let mask = rx
        .recv_timeout(Duration::from_secs(5))
        .unwrap()
        .unwrap();
    assert!(mask.is_person(3, 3));
}
