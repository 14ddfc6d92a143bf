//! Integration tests: images and previews through a scratch directory.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;

use retouch_core::{Command, ImageSink, ImageSource, Outcome, RgbImage, Session, SessionConfig};
use retouch_io::{CodecError, FsCodec, PreviewWriter};

/// A fresh directory under the system temp dir, unique per test.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("retouch-io-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn gradient() -> RgbImage {
    RgbImage::from_fn(16, 9, |x, y| {
        #[allow(clippy::cast_possible_truncation)]
        image::Rgb([(x * 15) as u8, (y * 28) as u8, 99])
    })
}

#[test]
fn png_round_trip_is_lossless() {
    let dir = scratch_dir("png");
    let path = dir.join("gradient.png");
    let mut codec = FsCodec;

    codec.save(&gradient(), &path).unwrap();
    let loaded = codec.load(&path).unwrap();
    assert_eq!(loaded, gradient());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn bmp_round_trip_is_lossless() {
    let dir = scratch_dir("bmp");
    let path = dir.join("gradient.bmp");
    let mut codec = FsCodec;

    codec.save(&gradient(), &path).unwrap();
    assert_eq!(codec.load(&path).unwrap(), gradient());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn unknown_extension_fails_to_save() {
    let dir = scratch_dir("ext");
    let err = FsCodec
        .save(&gradient(), &dir.join("gradient.unknown"))
        .unwrap_err();
    assert!(matches!(err, CodecError::Save { .. }));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn empty_file_is_empty_input() {
    let dir = scratch_dir("empty");
    let path = dir.join("empty.png");
    std::fs::write(&path, b"").unwrap();
    assert!(matches!(FsCodec.load(&path), Err(CodecError::EmptyInput)));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn session_with_previews_and_save() {
    let dir = scratch_dir("session");
    let previews = dir.join("previews");
    let output = dir.join("out.png");

    let mut codec = FsCodec;
    let mut writer = PreviewWriter::new(&previews);
    let mut session = Session::open(gradient(), SessionConfig::default()).unwrap();

    session
        .execute(Command::Brightness { delta: 20 }, &mut writer, &mut codec)
        .unwrap();
    session
        .execute(Command::Grayscale, &mut writer, &mut codec)
        .unwrap();
    let outcome = session
        .execute(
            Command::SaveExit {
                path: output.clone(),
            },
            &mut writer,
            &mut codec,
        )
        .unwrap();
    assert_eq!(outcome, Outcome::Saved(output.clone()));

    let mut names: Vec<String> = std::fs::read_dir(&previews)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["001-brightness-20.png", "002-grayscale.png"]);

    let preview = codec.load(&previews.join("002-grayscale.png")).unwrap();
    assert_eq!(preview.dimensions(), (16 * 2 + 4, 9));

    let saved = codec.load(&output).unwrap();
    assert_eq!(&saved, session.active().unwrap());
    assert!(saved.pixels().all(|p| p.0[0] == p.0[1] && p.0[1] == p.0[2]));

    std::fs::remove_dir_all(&dir).unwrap();
}
