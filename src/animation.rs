use crate::error::PersistError;
use crate::export::axial_to_cartesian;
use crate::lattice::Lattice;
use crate::plot::{render_plot, PlotFrame, AXIS_COLOR, BACKGROUND, POINT_COLOR};
use image::{Rgb, RgbImage};
use log::debug;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Global palette, index order matches `palette_index`
const PALETTE: [Rgb<u8>; 3] = [BACKGROUND, POINT_COLOR, AXIS_COLOR];

/// Delay between frames in hundredths of a second
const FRAME_DELAY: u16 = 8;
/// The finished crystal lingers on screen before the loop restarts
const FINAL_FRAME_DELAY: u16 = 200;

fn palette_index(color: &Rgb<u8>) -> u8 {
    PALETTE.iter().position(|c| c == color).unwrap_or(0) as u8
}

/// Streams snapshots of the growing nucleus into a looping GIF.
///
/// Frames go to the encoder as they are captured; only the most recent one is
/// held back so it can be written with the longer final delay.
pub struct GrowthRecorder {
    mesh_length: u32,
    width: u32,
    every: usize,
    encoder: gif::Encoder<BufWriter<File>>,
    frame_size: (u16, u16),
    pending: Option<Vec<u8>>,
    written: usize,
    last_captured: Option<usize>,
    error: Option<PersistError>,
}

impl GrowthRecorder {
    /// Open `path` and record one frame every `every` attachments, rendered `width` pixels wide
    pub fn create(
        path: &Path,
        mesh_length: u32,
        every: usize,
        width: u32,
    ) -> Result<Self, PersistError> {
        let plot_frame = PlotFrame::new(mesh_length, width.clamp(2, u16::MAX as u32));
        let frame_size = (plot_frame.width as u16, plot_frame.height as u16);

        let file = File::create(path).map_err(|e| PersistError::io(path, e))?;
        let palette: Vec<u8> = PALETTE.iter().flat_map(|c| c.0).collect();
        let mut encoder =
            gif::Encoder::new(BufWriter::new(file), frame_size.0, frame_size.1, &palette)?;
        encoder.set_repeat(gif::Repeat::Infinite)?;

        Ok(Self {
            mesh_length,
            width: plot_frame.width,
            every: every.max(1),
            encoder,
            frame_size,
            pending: None,
            written: 0,
            last_captured: None,
            error: None,
        })
    }

    /// Frames captured so far, the held-back one included
    pub fn frame_count(&self) -> usize {
        self.written + usize::from(self.pending.is_some())
    }

    /// Capture a frame if the cluster size falls on the recording interval
    pub fn observe(&mut self, lattice: &Lattice) {
        if lattice.frozen_count() % self.every == 0 {
            self.capture(lattice);
        }
    }

    /// Capture the current cluster unless a frame of this size already exists.
    ///
    /// A write failure stops further captures and is reported by `finish`.
    pub fn capture(&mut self, lattice: &Lattice) {
        let count = lattice.frozen_count();
        if self.error.is_some() || self.last_captured == Some(count) {
            return;
        }
        self.last_captured = Some(count);

        let points: Vec<(f64, f64)> = lattice.frozen().map(axial_to_cartesian).collect();
        let img = render_plot(&points, self.mesh_length, self.width);
        if let Some(previous) = self.pending.replace(indexed_pixels(&img)) {
            if let Err(e) = self.write_frame(&previous, FRAME_DELAY) {
                self.error = Some(e);
            }
        }
    }

    fn write_frame(&mut self, pixels: &[u8], delay: u16) -> Result<(), PersistError> {
        let (width, height) = self.frame_size;
        let frame = gif::Frame {
            width,
            height,
            delay,
            buffer: Cow::Borrowed(pixels),
            ..gif::Frame::default()
        };
        self.encoder.write_frame(&frame)?;
        self.written += 1;
        Ok(())
    }

    /// Write the held-back frame with the final delay and close the file.
    ///
    /// Returns the number of frames written.
    pub fn finish(mut self) -> Result<usize, PersistError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        if let Some(last) = self.pending.take() {
            self.write_frame(&last, FINAL_FRAME_DELAY)?;
        }
        let frames = self.written;
        let mut out = self
            .encoder
            .into_inner()
            .map_err(|e| PersistError::Gif(e.into()))?;
        out.flush().map_err(|e| PersistError::Gif(e.into()))?;

        debug!("Wrote {} GIF frames", frames);
        Ok(frames)
    }
}

fn indexed_pixels(img: &RgbImage) -> Vec<u8> {
    img.pixels().map(palette_index).collect()
}
