//! Test utilities and fixtures for coverpick tests.
//!
//! This module provides candidate factories, in-memory images and a minimal
//! MP3 writer so tag tests can run against real files.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{mock_candidates, write_silent_mp3};
//!
//! #[test]
//! fn test_something() {
//!     let candidates = mock_candidates(3);
//!     write_silent_mp3(&dir.join("track.mp3"));
//!     // ... test logic
//! }
//! ```

use std::io::Cursor;
use std::path::Path;

use crate::catalog::Candidate;

/// Creates `n` candidates with distinct thumbnail URLs.
pub fn mock_candidates(n: usize) -> Vec<Candidate> {
    (0..n)
        .map(|i| {
            Candidate::new(
                format!("Artist {}", i),
                format!("Album {}", i),
                format!("https://is1-ssl.mzstatic.com/image/thumb/{}/250x250bb.jpg", i),
            )
        })
        .collect()
}

/// Encodes a solid-colour RGBA image as PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 90, 255]));
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("Failed to encode PNG");
    bytes.into_inner()
}

/// MPEG-1 Layer III, 128 kbps, 44.1 kHz, no padding, joint stereo
const FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x64];

/// 144 * 128000 / 44100
const FRAME_LEN: usize = 417;

/// Writes a short, untagged MP3 of silent frames that lofty can open.
pub fn write_silent_mp3(path: &Path) {
    let mut data = Vec::with_capacity(FRAME_LEN * 40);
    for _ in 0..40 {
        data.extend_from_slice(&FRAME_HEADER);
        data.resize(data.len() + FRAME_LEN - FRAME_HEADER.len(), 0);
    }
    std::fs::write(path, data).expect("Failed to write test MP3");
}
