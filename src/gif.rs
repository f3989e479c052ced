//! Animated GIF export.
//!
//! Every input is decoded with the `image` crate and resized to the first
//! frame's dimensions using a linear (triangle) filter. Each frame is shown
//! for one second and the animation loops forever.
//!
//! Export is all-or-nothing: any frame that fails to decode aborts the whole
//! export before the output path is touched. Frames are encoded into a temp
//! file next to the destination and only persisted once encoding succeeds,
//! so a failed export never leaves a truncated GIF behind.

use image::codecs::gif::{GifEncoder, Repeat};
use image::imageops::FilterType;
use image::{Delay, DynamicImage, Frame, ImageError};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use thiserror::Error;

/// How long each frame stays on screen.
pub const FRAME_DURATION: Duration = Duration::from_secs(1);

#[derive(Error, Debug)]
pub enum GifError {
    #[error("No input images given")]
    NoFrames,
    #[error("Could not load frame {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
    #[error("GIF encoding failed: {0}")]
    Encode(#[from] ImageError),
    #[error("Could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GifReport {
    pub output: PathBuf,
    pub frames: usize,
    pub width: u32,
    pub height: u32,
}

/// Encode `paths` in order as an animated GIF at `output`.
pub fn export_gif<S: AsRef<str>>(output: &Path, paths: &[S]) -> Result<GifReport, GifError> {
    let Some((first, rest)) = paths.split_first() else {
        return Err(GifError::NoFrames);
    };

    let first = open_frame(first.as_ref())?;
    let (width, height) = (first.width(), first.height());
    tracing::debug!(width, height, "first frame sets GIF dimensions");

    let mut frames = Vec::with_capacity(paths.len());
    frames.push(first.to_rgba8());
    for path in rest {
        let img = open_frame(path.as_ref())?;
        let img = if (img.width(), img.height()) == (width, height) {
            img
        } else {
            img.resize_exact(width, height, FilterType::Triangle)
        };
        frames.push(img.to_rgba8());
    }

    let write_err = |source: io::Error| GifError::Write {
        path: output.to_path_buf(),
        source,
    };
    let dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(dir).map_err(write_err)?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;

    let count = frames.len();
    {
        let mut encoder = GifEncoder::new(tmp.as_file_mut());
        encoder.set_repeat(Repeat::Infinite)?;
        let delay = Delay::from_saturating_duration(FRAME_DURATION);
        for buffer in frames {
            encoder.encode_frame(Frame::from_parts(buffer, 0, 0, delay))?;
        }
    }
    tmp.flush().map_err(write_err)?;
    tmp.persist(output).map_err(|e| write_err(e.error))?;

    tracing::info!(output = %output.display(), frames = count, "GIF written");
    Ok(GifReport {
        output: output.to_path_buf(),
        frames: count,
        width,
        height,
    })
}

/// [`export_gif`] reduced to success or failure. Errors are logged.
pub fn create_animation<S: AsRef<str>>(output: &Path, paths: &[S]) -> bool {
    match export_gif(output, paths) {
        Ok(_) => true,
        Err(e) => {
            tracing::error!(output = %output.display(), error = %e, "GIF export failed");
            false
        }
    }
}

fn open_frame(path: &str) -> Result<DynamicImage, GifError> {
    image::open(path).map_err(|source| GifError::Load {
        path: PathBuf::from(path),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{path_string, write_png};
    use image::AnimationDecoder;
    use image::codecs::gif::GifDecoder;
    use std::io::BufReader;
    use tempfile::TempDir;

    fn decode(path: &Path) -> Vec<Frame> {
        let file = fs::File::open(path).unwrap();
        GifDecoder::new(BufReader::new(file))
            .unwrap()
            .into_frames()
            .collect_frames()
            .unwrap()
    }

    #[test]
    fn frames_are_resized_to_first_frame() {
        let tmp = TempDir::new().unwrap();
        let a = write_png(tmp.path(), "a.png", 40, 30, [255, 0, 0]);
        let b = write_png(tmp.path(), "b.png", 80, 80, [0, 0, 255]);
        let out = tmp.path().join("out.gif");

        let report = export_gif(&out, &[path_string(&a), path_string(&b)]).unwrap();
        assert_eq!((report.width, report.height), (40, 30));
        assert_eq!(report.frames, 2);

        let frames = decode(&out);
        assert_eq!(frames.len(), 2);
        for frame in &frames {
            assert_eq!(frame.buffer().dimensions(), (40, 30));
        }
    }

    #[test]
    fn each_frame_lasts_one_second() {
        let tmp = TempDir::new().unwrap();
        let a = write_png(tmp.path(), "a.png", 8, 8, [10, 20, 30]);
        let out = tmp.path().join("out.gif");
        export_gif(&out, &[path_string(&a)]).unwrap();

        let (numer, denom) = decode(&out)[0].delay().numer_denom_ms();
        assert_eq!(numer / denom, 1000);
    }

    #[test]
    fn frame_order_follows_input() {
        let tmp = TempDir::new().unwrap();
        let red = write_png(tmp.path(), "red.png", 4, 4, [255, 0, 0]);
        let blue = write_png(tmp.path(), "blue.png", 4, 4, [0, 0, 255]);
        let out = tmp.path().join("out.gif");
        export_gif(&out, &[path_string(&blue), path_string(&red)]).unwrap();

        let frames = decode(&out);
        let first = frames[0].buffer().get_pixel(1, 1);
        let second = frames[1].buffer().get_pixel(1, 1);
        assert!(first[2] > first[0], "first frame should be blue");
        assert!(second[0] > second[2], "second frame should be red");
    }

    #[test]
    fn unloadable_frame_aborts_without_output() {
        let tmp = TempDir::new().unwrap();
        let a = write_png(tmp.path(), "a.png", 4, 4, [0, 0, 0]);
        let out = tmp.path().join("out.gif");
        let missing = tmp.path().join("missing.png");

        let result = export_gif(&out, &[path_string(&a), path_string(&missing)]);
        assert!(matches!(result, Err(GifError::Load { path, .. }) if path == missing));
        assert!(!out.exists());
    }

    #[test]
    fn empty_input_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let none: [&str; 0] = [];
        assert!(matches!(
            export_gif(&tmp.path().join("out.gif"), &none),
            Err(GifError::NoFrames)
        ));
    }

    #[test]
    fn create_animation_reports_boolean() {
        let tmp = TempDir::new().unwrap();
        let a = write_png(tmp.path(), "a.png", 4, 4, [0, 0, 0]);
        assert!(create_animation(&tmp.path().join("ok.gif"), &[path_string(&a)]));
        assert!(!create_animation(&tmp.path().join("bad.gif"), &["nope.png"]));
        assert!(!tmp.path().join("bad.gif").exists());
    }
}
