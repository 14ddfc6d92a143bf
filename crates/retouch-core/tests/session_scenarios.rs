//! Integration tests: whole editing sessions driven through the public API.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::{Path, PathBuf};

use retouch_core::{
    BorderType, Command, Edit, ImageSink, NoPreview, Outcome, Overlay, Padding, RgbImage,
    Session, SessionConfig, SessionError, SessionState, Transform, UndoOutcome,
};

#[derive(Debug, thiserror::Error)]
#[error("read-only filesystem")]
struct ReadOnly;

/// Sink that records saves, or refuses them all.
#[derive(Default)]
struct RecordingSink {
    refuse: bool,
    saved: Vec<(PathBuf, RgbImage)>,
}

impl ImageSink for RecordingSink {
    type Error = ReadOnly;

    fn save(&mut self, image: &RgbImage, path: &Path) -> Result<(), ReadOnly> {
        if self.refuse {
            return Err(ReadOnly);
        }
        self.saved.push((path.to_path_buf(), image.clone()));
        Ok(())
    }
}

fn run(session: &mut Session, command: Command) -> Result<Outcome, SessionError> {
    session.execute(command, &mut NoPreview, &mut RecordingSink::default())
}

fn pixel(session: &Session) -> [u8; 3] {
    session.active().unwrap().get_pixel(0, 0).0
}

#[test]
fn brightness_contrast_then_undo_to_start() {
    let i0 = RgbImage::from_pixel(64, 64, image::Rgb([100, 120, 140]));
    let mut session = Session::open(i0.clone(), SessionConfig::default()).unwrap();

    run(&mut session, Command::Brightness { delta: 50 }).unwrap();
    let i1 = session.active().unwrap().clone();
    assert_eq!(pixel(&session), [150, 170, 190]);

    run(&mut session, Command::Contrast { factor: 1.5 }).unwrap();
    assert_eq!(pixel(&session), [225, 255, 255]);

    let outcome = run(&mut session, Command::Undo).unwrap();
    assert!(matches!(
        outcome,
        Outcome::Undo(UndoOutcome::Undone(ref r)) if r.description == "contrast ×1.50"
    ));
    assert_eq!(session.active().unwrap(), &i1);

    run(&mut session, Command::Undo).unwrap();
    assert_eq!(session.active().unwrap(), &i0);

    let outcome = run(&mut session, Command::Undo).unwrap();
    assert_eq!(outcome, Outcome::Undo(UndoOutcome::NothingToUndo));
    assert_eq!(session.active().unwrap(), &i0);
    assert_eq!(session.snapshots(), 1);
}

#[test]
fn blend_resizes_overlay_bilinearly() {
    let i0 = RgbImage::from_fn(64, 64, |x, y| {
        #[allow(clippy::cast_possible_truncation)]
        let v = (x * 4) as u8;
        #[allow(clippy::cast_possible_truncation)]
        let w = (y * 3) as u8;
        image::Rgb([v, w, 200])
    });
    let b = RgbImage::from_fn(32, 32, |x, y| {
        #[allow(clippy::cast_possible_truncation)]
        let v = ((x + y) * 7) as u8;
        image::Rgb([255 - v, v, 10])
    });
    let mut session = Session::open(i0.clone(), SessionConfig::default()).unwrap();

    let outcome = run(
        &mut session,
        Command::Blend {
            overlay: Overlay::new("b.png", b.clone()),
            alpha: 0.5,
        },
    )
    .unwrap();
    assert!(matches!(
        outcome,
        Outcome::Committed(ref r) if r.description == "blend 'b.png' α=0.50"
    ));

    let resized = image::imageops::resize(&b, 64, 64, image::imageops::FilterType::Triangle);
    let active = session.active().unwrap();
    assert_eq!(active.dimensions(), (64, 64));
    for ((out, a), b) in active
        .as_raw()
        .iter()
        .zip(i0.as_raw())
        .zip(resized.as_raw())
    {
        #[allow(clippy::suboptimal_flops)]
        let expected = (0.5 * f64::from(*a) + 0.5 * f64::from(*b))
            .round()
            .clamp(0.0, 255.0);
        assert!((f64::from(*out) - expected).abs() < f64::EPSILON);
    }
}

#[test]
fn overflowing_the_stack_expires_oldest_history() {
    let config = SessionConfig::default();
    let capacity = config.capacity;
    let mut session = Session::open(RgbImage::new(8, 8), config).unwrap();

    for _ in 0..=capacity {
        run(&mut session, Command::Brightness { delta: 1 }).unwrap();
    }
    assert_eq!(session.snapshots(), capacity);

    let Outcome::History(entries) = run(&mut session, Command::ViewHistory).unwrap() else {
        unreachable!("view history always yields history");
    };
    assert_eq!(entries.len(), capacity + 1);
    let expired = entries.iter().filter(|e| !e.undoable).count();
    assert_eq!(expired, 2);
    assert_eq!(entries[0].to_string(), "1. brightness +1 (expired)");

    for _ in 0..capacity - 1 {
        let outcome = run(&mut session, Command::Undo).unwrap();
        assert!(matches!(outcome, Outcome::Undo(UndoOutcome::Undone(_))));
    }
    // The initial snapshot and the one after the first commit are gone.
    assert_eq!(pixel(&session), [2, 2, 2]);

    let outcome = run(&mut session, Command::Undo).unwrap();
    assert_eq!(
        outcome,
        Outcome::Undo(UndoOutcome::HistoryExpired { expired: 2 })
    );
    assert_eq!(pixel(&session), [2, 2, 2]);
}

#[test]
fn discarded_candidate_leaves_no_trace() {
    let mut session = Session::open(
        RgbImage::from_pixel(10, 10, image::Rgb([9, 99, 199])),
        SessionConfig::default(),
    )
    .unwrap();
    let before = session.active().unwrap().clone();

    let padding = Padding {
        top: 2,
        bottom: 2,
        left: 3,
        right: 3,
        border: BorderType::Reflect101,
    };
    let candidate = session.stage(Edit::Transform(Transform::Pad(padding))).unwrap();
    assert_eq!(candidate.image().dimensions(), (16, 14));
    assert_eq!(session.state(), SessionState::Staging);

    session.discard().unwrap();
    assert_eq!(session.active().unwrap(), &before);
    assert!(session.history().is_empty());
    assert_eq!(
        run(&mut session, Command::Undo).unwrap(),
        Outcome::Undo(UndoOutcome::NothingToUndo)
    );
}

#[test]
fn rejected_parameters_change_nothing() {
    let mut session = Session::open(RgbImage::new(4, 4), SessionConfig::default()).unwrap();
    run(&mut session, Command::Grayscale).unwrap();

    let rejected = [
        Command::Brightness { delta: 256 },
        Command::Contrast { factor: -0.5 },
        Command::Contrast { factor: f64::NAN },
        Command::Threshold {
            level: 256,
            inverse: false,
        },
        Command::Blend {
            overlay: Overlay::new("b.png", RgbImage::new(4, 4)),
            alpha: 1.5,
        },
    ];
    for command in rejected {
        let err = run(&mut session, command).unwrap_err();
        assert!(matches!(err, SessionError::InvalidParameter(_)), "{err}");
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.snapshots(), 2);
        assert_eq!(session.state(), SessionState::Idle);
    }
}

#[test]
fn threshold_output_is_binary_rgb() {
    let image = RgbImage::from_fn(16, 1, |x, _| {
        #[allow(clippy::cast_possible_truncation)]
        let v = (x * 16) as u8;
        image::Rgb([v, v, v])
    });
    let mut session = Session::open(image, SessionConfig::default()).unwrap();
    run(
        &mut session,
        Command::Threshold {
            level: 127,
            inverse: true,
        },
    )
    .unwrap();
    let active = session.active().unwrap();
    for (x, _, p) in active.enumerate_pixels() {
        let expected = if x * 16 > 127 { 0 } else { 255 };
        assert_eq!(p.0, [expected; 3], "column {x}");
    }
}

#[test]
fn failed_save_keeps_session_open_then_succeeds() {
    let mut session = Session::open(RgbImage::new(2, 2), SessionConfig::default()).unwrap();
    run(&mut session, Command::Brightness { delta: 10 }).unwrap();

    let mut refusing = RecordingSink {
        refuse: true,
        ..RecordingSink::default()
    };
    let err = session
        .execute(
            Command::SaveExit {
                path: PathBuf::from("/out.png"),
            },
            &mut NoPreview,
            &mut refusing,
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "failed to save image: read-only filesystem");
    assert_eq!(session.state(), SessionState::Idle);

    let mut sink = RecordingSink::default();
    session
        .execute(
            Command::SaveExit {
                path: PathBuf::from("out.png"),
            },
            &mut NoPreview,
            &mut sink,
        )
        .unwrap();
    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(sink.saved[0].0, PathBuf::from("out.png"));
    assert_eq!(sink.saved[0].1.get_pixel(1, 1).0, [10, 10, 10]);

    assert!(matches!(
        run(&mut session, Command::Brightness { delta: 1 }),
        Err(SessionError::SessionClosed)
    ));
    assert_eq!(session.close().unwrap().get_pixel(0, 0).0, [10, 10, 10]);
}
