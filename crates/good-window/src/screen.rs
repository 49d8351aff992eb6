//! Monitor descriptions.
//!
//! Screens come from the native backend (`NativeTopLevelWindow::screens`).
//! All geometry is in physical desktop coordinates; the primary monitor
//! typically has its origin at `(0, 0)`.

use crate::geometry::{PixelRatio, Point, Rect};

/// Platform-specific screen identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenId(u64);

impl ScreenId {
    /// Create a screen ID from a raw value.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A physical display.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    id: ScreenId,
    name: String,
    geometry: Rect,
    work_area: Rect,
    scale_factor: f64,
    is_primary: bool,
}

impl Screen {
    /// Describe a screen.
    pub fn new(
        id: ScreenId,
        name: impl Into<String>,
        geometry: Rect,
        work_area: Rect,
        scale_factor: f64,
        is_primary: bool,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            geometry,
            work_area,
            scale_factor,
            is_primary,
        }
    }

    /// Platform identifier.
    pub fn id(&self) -> ScreenId {
        self.id
    }

    /// Human-readable name (e.g., "Dell U2720Q" or "Display 1").
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full geometry in the virtual desktop.
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    /// Usable area excluding taskbar/dock.
    pub fn work_area(&self) -> Rect {
        self.work_area
    }

    /// DPI scale factor.
    pub fn pixel_ratio(&self) -> PixelRatio {
        PixelRatio::new(self.scale_factor)
    }

    /// Whether this is the primary screen.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }
}

/// Queries over the set of connected screens.
pub trait ScreenSet {
    /// The primary screen, or the first one when none is flagged primary.
    fn primary(&self) -> Option<&Screen>;

    /// The screen whose full geometry contains `point`.
    fn at_point(&self, point: Point) -> Option<&Screen>;

    /// The screen sharing the largest area with `rect`, falling back to the
    /// screen whose work area center is closest to the rect center.
    fn nearest_to(&self, rect: &Rect) -> Option<&Screen>;

    /// True when `rect` overlaps at least one work area.
    fn any_work_area_intersects(&self, rect: &Rect) -> bool;

    /// `rect` clipped to the desktop work area: the bounding rectangle of
    /// its intersections with each screen's work area.
    fn clip_to_work_areas(&self, rect: &Rect) -> Rect;
}

fn area(rect: &Rect) -> i64 {
    if rect.is_empty() {
        0
    } else {
        rect.width as i64 * rect.height as i64
    }
}

fn distance_sq(a: Point, b: Point) -> i64 {
    let dx = (a.x - b.x) as i64;
    let dy = (a.y - b.y) as i64;
    dx * dx + dy * dy
}

impl ScreenSet for [Screen] {
    fn primary(&self) -> Option<&Screen> {
        self.iter().find(|s| s.is_primary).or_else(|| self.first())
    }

    fn at_point(&self, point: Point) -> Option<&Screen> {
        self.iter().find(|s| s.geometry.contains(point))
    }

    fn nearest_to(&self, rect: &Rect) -> Option<&Screen> {
        let best_overlap = self
            .iter()
            .map(|s| (s, area(&s.work_area.intersected(rect))))
            .filter(|(_, overlap)| *overlap > 0)
            .max_by_key(|(_, overlap)| *overlap)
            .map(|(s, _)| s);

        best_overlap.or_else(|| {
            let center = rect.center();
            self.iter()
                .min_by_key(|s| distance_sq(s.work_area.center(), center))
        })
    }

    fn any_work_area_intersects(&self, rect: &Rect) -> bool {
        self.iter().any(|s| s.work_area.intersects(rect))
    }

    fn clip_to_work_areas(&self, rect: &Rect) -> Rect {
        self.iter()
            .map(|s| s.work_area.intersected(rect))
            .fold(Rect::default(), |acc, r| acc.united(&r))
    }
}

#[cfg(test)]
pub(crate) fn test_screens() -> Vec<Screen> {
    vec![
        Screen::new(
            ScreenId::new(1),
            "Primary",
            Rect::new(0, 0, 1920, 1080),
            Rect::new(0, 0, 1920, 1040),
            1.0,
            true,
        ),
        Screen::new(
            ScreenId::new(2),
            "Secondary",
            Rect::new(1920, 0, 2560, 1440),
            Rect::new(1920, 0, 2560, 1440),
            2.0,
            false,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_and_at_point() {
        let screens = test_screens();
        assert_eq!(screens.primary().unwrap().name(), "Primary");
        assert_eq!(
            screens.at_point(Point::new(2000, 100)).unwrap().name(),
            "Secondary"
        );
        assert!(screens.at_point(Point::new(-10, -10)).is_none());
    }

    #[test]
    fn test_nearest_by_overlap() {
        let screens = test_screens();
        // Mostly on the secondary screen.
        let rect = Rect::new(1800, 100, 800, 600);
        assert_eq!(screens.nearest_to(&rect).unwrap().id(), ScreenId::new(2));
    }

    #[test]
    fn test_nearest_when_offscreen() {
        let screens = test_screens();
        let rect = Rect::new(-3000, 200, 400, 300);
        assert_eq!(screens.nearest_to(&rect).unwrap().id(), ScreenId::new(1));
    }

    #[test]
    fn test_clip_to_work_areas() {
        let screens = test_screens();
        let rect = Rect::new(-10, -10, 100, 100);
        assert_eq!(screens.clip_to_work_areas(&rect), Rect::new(0, 0, 90, 90));

        // Spanning both screens keeps the bounding rect of both pieces.
        let spanning = Rect::new(1900, 10, 40, 40);
        assert_eq!(screens.clip_to_work_areas(&spanning), spanning);
    }
}
