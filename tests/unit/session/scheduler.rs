use std::cell::RefCell;
use std::rc::Rc;

use super::*;

#[test]
fn callbacks_run_until_finished() {
    let mut s = FrameScheduler::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    s.request(move |ts: f64| {
        log.borrow_mut().push(ts);
        if ts >= 32.0 {
            FrameStatus::Finished
        } else {
            FrameStatus::Continue
        }
    });

    assert_eq!(s.tick(0.0), 1);
    assert_eq!(s.tick(16.0), 1);
    assert_eq!(s.tick(32.0), 1);
    assert!(s.is_idle());
    assert_eq!(s.tick(48.0), 0);
    assert_eq!(*seen.borrow(), vec![0.0, 16.0, 32.0]);
    assert_eq!(s.frames_ticked(), 4);
}

#[test]
fn callbacks_run_in_registration_order() {
    let mut s = FrameScheduler::new();
    let order = Rc::new(RefCell::new(Vec::new()));
    for id in 0..3 {
        let order = order.clone();
        s.request(move |_ts: f64| {
            order.borrow_mut().push(id);
            FrameStatus::Finished
        });
    }
    s.tick(0.0);
    assert_eq!(*order.borrow(), vec![0, 1, 2]);
}

#[test]
fn run_until_idle_advances_clock() {
    let mut s = FrameScheduler::new();
    let mut left = 5;
    s.request(move |_ts: f64| {
        left -= 1;
        if left == 0 {
            FrameStatus::Finished
        } else {
            FrameStatus::Continue
        }
    });
    let last = s.run_until_idle(100.0, 10.0, 1000);
    assert_eq!(last, 140.0);
    assert!(s.is_idle());
}

#[test]
fn run_until_idle_respects_frame_cap_and_clear() {
    let mut s = FrameScheduler::new();
    s.request(|_ts: f64| FrameStatus::Continue);
    s.run_until_idle(0.0, 16.0, 10);
    assert_eq!(s.frames_ticked(), 10);
    assert_eq!(s.pending(), 1);
    s.clear();
    assert!(s.is_idle());
}
