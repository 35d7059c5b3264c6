//! PNG frame output.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use orrery_render::{DisplayTarget, Frame, OutputError};
use tracing::debug;

/// Writes every `every`-th frame to `directory/frame_NNNNN.png`.
pub struct PngSequence {
    directory: PathBuf,
    every: u64,
    written: u64,
}

impl PngSequence {
    /// Create the output directory if needed.
    pub fn create(directory: &Path, every: u64) -> Result<Self, OutputError> {
        std::fs::create_dir_all(directory)?;
        Ok(Self {
            directory: directory.to_path_buf(),
            every: every.max(1),
            written: 0,
        })
    }

    /// Path a frame index is written to.
    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.directory.join(format!("frame_{index:05}.png"))
    }

    /// Number of files written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Encode RGBA8 pixels as a PNG into `writer`.
pub fn encode_png<W: std::io::Write>(
    writer: W,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(pixels)?;
    writer.finish()
}

impl DisplayTarget for PngSequence {
    fn present(&mut self, frame: &Frame) -> Result<(), OutputError> {
        if frame.index % self.every != 0 {
            return Ok(());
        }
        let path = self.frame_path(frame.index);
        let file = BufWriter::new(File::create(&path)?);
        encode_png(file, frame.width, frame.height, &frame.pixels).map_err(|e| {
            OutputError::Encode {
                index: frame.index,
                source: Box::new(e),
            }
        })?;
        self.written += 1;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: u64) -> Frame {
        Frame {
            width: 2,
            height: 2,
            index,
            time: index as f64,
            pixels: vec![200; 16],
        }
    }

    #[test]
    fn test_writes_every_nth_frame() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("frames");
        let mut output = PngSequence::create(&out_dir, 2).unwrap();
        for i in 0..5 {
            output.present(&frame(i)).unwrap();
        }
        assert_eq!(output.written(), 3);
        assert!(out_dir.join("frame_00000.png").exists());
        assert!(!out_dir.join("frame_00001.png").exists());
        assert!(out_dir.join("frame_00004.png").exists());
    }

    #[test]
    fn test_written_png_decodes() {
        let dir = tempfile::tempdir().unwrap();
        let mut output = PngSequence::create(dir.path(), 1).unwrap();
        output.present(&frame(7)).unwrap();

        let decoded = image::open(output.frame_path(7)).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 2));
        assert_eq!(decoded.get_pixel(1, 1).0, [200, 200, 200, 200]);
    }

    #[test]
    fn test_wrong_pixel_count_is_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut output = PngSequence::create(dir.path(), 1).unwrap();
        let mut bad = frame(0);
        bad.pixels.truncate(3);
        let err = output.present(&bad).unwrap_err();
        assert!(matches!(err, OutputError::Encode { index: 0, .. }));
    }
}
