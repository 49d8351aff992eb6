//! Geometry save/restore.
//!
//! The saved form is a fixed 19-byte big-endian blob:
//!
//! | offset | field | type |
//! |---|---|---|
//! | 0 | x | i32 |
//! | 4 | y | i32 |
//! | 8 | width | i32 |
//! | 12 | height | i32 |
//! | 16 | minimized | u8 (0/1) |
//! | 17 | maximized | u8 (0/1) |
//! | 18 | full screen | u8 (0/1) |
//!
//! The rectangle is the window's normal (restored) frame in physical
//! desktop coordinates.

use crate::error::GeometryBlobError;
use crate::geometry::{Rect, Size};
use crate::screen::{Screen, ScreenSet};
use crate::state::WindowState;

/// Encoded length of a geometry blob.
pub const GEOMETRY_BLOB_LEN: usize = 19;

/// Decoded geometry blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedGeometry {
    /// Normal frame in physical desktop coordinates.
    pub rect: Rect,
    /// Saved while minimized.
    pub minimized: bool,
    /// Saved while maximized.
    pub maximized: bool,
    /// Saved while full screen.
    pub full_screen: bool,
}

impl SavedGeometry {
    /// Capture a normal frame and a window state.
    pub fn new(rect: Rect, state: WindowState) -> Self {
        Self {
            rect,
            minimized: state == WindowState::Minimized,
            maximized: state == WindowState::Maximized,
            full_screen: state == WindowState::FullScreen,
        }
    }

    /// The state to re-apply; full screen wins over maximized over minimized.
    pub fn state(&self) -> WindowState {
        if self.full_screen {
            WindowState::FullScreen
        } else if self.maximized {
            WindowState::Maximized
        } else if self.minimized {
            WindowState::Minimized
        } else {
            WindowState::NoState
        }
    }

    /// Encode into the fixed blob layout.
    pub fn to_bytes(&self) -> [u8; GEOMETRY_BLOB_LEN] {
        let mut out = [0u8; GEOMETRY_BLOB_LEN];
        out[0..4].copy_from_slice(&self.rect.x.to_be_bytes());
        out[4..8].copy_from_slice(&self.rect.y.to_be_bytes());
        out[8..12].copy_from_slice(&self.rect.width.to_be_bytes());
        out[12..16].copy_from_slice(&self.rect.height.to_be_bytes());
        out[16] = self.minimized as u8;
        out[17] = self.maximized as u8;
        out[18] = self.full_screen as u8;
        out
    }

    /// Decode a blob, rejecting wrong lengths, bad flags and empty sizes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GeometryBlobError> {
        let bytes: &[u8; GEOMETRY_BLOB_LEN] =
            bytes
                .try_into()
                .map_err(|_| GeometryBlobError::WrongLength {
                    expected: GEOMETRY_BLOB_LEN,
                    actual: bytes.len(),
                })?;

        let int_at = |offset: usize| {
            i32::from_be_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ])
        };
        let flag_at = |offset: usize| match bytes[offset] {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(GeometryBlobError::InvalidFlag { offset, value }),
        };

        let rect = Rect::new(int_at(0), int_at(4), int_at(8), int_at(12));
        if rect.is_empty() {
            return Err(GeometryBlobError::InvalidSize {
                width: rect.width,
                height: rect.height,
            });
        }

        Ok(Self {
            rect,
            minimized: flag_at(16)?,
            maximized: flag_at(17)?,
            full_screen: flag_at(18)?,
        })
    }

    /// Where the restored frame should go on the current desktop.
    ///
    /// A frame that still touches a work area is kept. A frame that would
    /// land entirely off-screen is clipped to the primary work area and
    /// centered on it.
    pub fn fit_to_screens(&self, screens: &[Screen]) -> Rect {
        if screens.is_empty() || screens.any_work_area_intersects(&self.rect) {
            return self.rect;
        }
        let Some(primary) = screens.primary() else {
            return self.rect;
        };
        let work = primary.work_area();
        let size = Size::new(
            self.rect.width.min(work.width),
            self.rect.height.min(work.height),
        );
        Rect::from_origin_size(work.origin(), size).centered_on(work.center())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::test_screens;

    #[test]
    fn test_layout_is_big_endian() {
        let saved = SavedGeometry::new(Rect::new(1, -2, 800, 600), WindowState::Maximized);
        let bytes = saved.to_bytes();
        assert_eq!(&bytes[0..4], &[0, 0, 0, 1]);
        assert_eq!(&bytes[4..8], &[0xff, 0xff, 0xff, 0xfe]);
        assert_eq!(&bytes[8..12], &[0, 0, 0x03, 0x20]);
        assert_eq!(&bytes[16..], &[0, 1, 0]);
        assert_eq!(SavedGeometry::from_bytes(&bytes).unwrap(), saved);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let bytes = SavedGeometry::new(Rect::new(0, 0, 10, 10), WindowState::NoState).to_bytes();
        assert_eq!(
            SavedGeometry::from_bytes(&bytes[..18]),
            Err(GeometryBlobError::WrongLength {
                expected: 19,
                actual: 18
            })
        );
        let mut long = bytes.to_vec();
        long.push(0);
        assert!(SavedGeometry::from_bytes(&long).is_err());
        assert!(SavedGeometry::from_bytes(&[]).is_err());
    }

    #[test]
    fn test_corrupt_flag_rejected() {
        let mut bytes = SavedGeometry::new(Rect::new(0, 0, 10, 10), WindowState::NoState).to_bytes();
        bytes[17] = 7;
        assert_eq!(
            SavedGeometry::from_bytes(&bytes),
            Err(GeometryBlobError::InvalidFlag {
                offset: 17,
                value: 7
            })
        );
    }

    #[test]
    fn test_empty_size_rejected() {
        let bytes = SavedGeometry::new(Rect::new(0, 0, 0, 10), WindowState::NoState).to_bytes();
        assert!(matches!(
            SavedGeometry::from_bytes(&bytes),
            Err(GeometryBlobError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_state_priority() {
        let mut saved = SavedGeometry::new(Rect::new(0, 0, 10, 10), WindowState::Minimized);
        assert_eq!(saved.state(), WindowState::Minimized);
        saved.maximized = true;
        assert_eq!(saved.state(), WindowState::Maximized);
        saved.full_screen = true;
        assert_eq!(saved.state(), WindowState::FullScreen);
    }

    #[test]
    fn test_on_screen_rect_kept() {
        let saved = SavedGeometry::new(Rect::new(2000, 100, 800, 600), WindowState::NoState);
        assert_eq!(saved.fit_to_screens(&test_screens()), saved.rect);
    }

    #[test]
    fn test_off_screen_rect_recentered_on_primary() {
        let saved = SavedGeometry::new(Rect::new(-5000, -5000, 800, 600), WindowState::NoState);
        let fitted = saved.fit_to_screens(&test_screens());
        assert_eq!(fitted, Rect::new(560, 220, 800, 600));
        assert_eq!(fitted.center(), Rect::new(0, 0, 1920, 1040).center());
    }

    #[test]
    fn test_oversized_off_screen_rect_clipped() {
        let saved = SavedGeometry::new(Rect::new(9000, 9000, 4000, 3000), WindowState::NoState);
        let fitted = saved.fit_to_screens(&test_screens());
        assert_eq!(fitted, Rect::new(0, 0, 1920, 1040));
    }
}
