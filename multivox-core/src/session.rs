//! Interactive session state for mask editing.
//!
//! The original viewer kept the active color, focus color, and brush
//! settings in function-local statics inside the UI loop; here they are
//! explicit fields of a session object that the UI layer drives with
//! click and per-frame tick events.

use crate::error::{Error, Result};
use crate::raster::Rgb;
use crate::segmentation::{AlphaSource, SegmentationMaskStore};

/// Mouse button of a click event, as reported by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

/// Paint brush settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BrushSettings {
    /// Disc radius in pixels.
    pub radius: u32,
    /// Stamp color.
    pub color: Rgb,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            radius: 5,
            color: [255, 255, 255],
        }
    }
}

/// Frame-counted timer for the highlight-then-revert blink interaction.
///
/// Duration is defined in frame counts, not wall-clock time; the timer
/// fires exactly once per armed blink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkTimer {
    counter: u32,
    duration: u32,
    active: bool,
}

impl BlinkTimer {
    /// Creates a disarmed timer with the given duration in frames.
    #[must_use]
    pub fn new(duration: u32) -> Self {
        Self {
            counter: 0,
            duration,
            active: false,
        }
    }

    /// Arms the timer, restarting the count.
    pub fn start(&mut self) {
        self.active = true;
        self.counter = 0;
    }

    /// Disarms the timer without firing.
    pub fn cancel(&mut self) {
        self.active = false;
        self.counter = 0;
    }

    /// Whether a blink is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advances the timer by one frame. Returns true exactly once, on the
    /// frame the configured duration is reached.
    pub fn tick(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.counter += 1;
        if self.counter >= self.duration {
            self.cancel();
            return true;
        }
        false
    }
}

impl Default for BlinkTimer {
    fn default() -> Self {
        Self::new(10)
    }
}

/// Session state driving a [`SegmentationMaskStore`] from UI events.
#[derive(Debug, Clone, Default)]
pub struct InteractionSession {
    /// Brush used while paint mode is enabled.
    pub brush: BrushSettings,
    active_color: Option<Rgb>,
    focus_color: Option<Rgb>,
    focus_enabled: bool,
    paint_enabled: bool,
    blink: BlinkTimer,
    alpha_source: AlphaSource,
}

impl InteractionSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mask color selected by the last click.
    #[must_use]
    pub fn active_color(&self) -> Option<Rgb> {
        self.active_color
    }

    /// Color currently isolated by a focus pass.
    #[must_use]
    pub fn focus_color(&self) -> Option<Rgb> {
        self.focus_color
    }

    /// Whether a blink highlight is in progress.
    #[must_use]
    pub fn in_blink(&self) -> bool {
        self.blink.is_active()
    }

    #[must_use]
    pub fn paint_enabled(&self) -> bool {
        self.paint_enabled
    }

    #[must_use]
    pub fn focus_enabled(&self) -> bool {
        self.focus_enabled
    }

    /// Alpha source used when the output reverts to the distance
    /// composition.
    #[must_use]
    pub fn alpha_source(&self) -> AlphaSource {
        self.alpha_source
    }

    pub fn set_alpha_source(&mut self, source: AlphaSource) {
        self.alpha_source = source;
    }

    pub fn set_paint_enabled(&mut self, enabled: bool) {
        self.paint_enabled = enabled;
    }

    /// Overrides the blink duration, in frames.
    pub fn set_blink_duration(&mut self, frames: u32) {
        self.blink = BlinkTimer::new(frames);
    }

    /// Enables or disables right-click focus mode. Disabling reverts the
    /// output to the distance composition.
    ///
    /// # Errors
    ///
    /// Propagates [`SegmentationMaskStore::apply_distance_alpha`] errors
    /// when disabling.
    pub fn set_focus_enabled(
        &mut self,
        store: &mut SegmentationMaskStore,
        enabled: bool,
    ) -> Result<()> {
        self.focus_enabled = enabled;
        if !enabled {
            self.focus_color = None;
            store.apply_distance_alpha(self.alpha_source)?;
        }
        Ok(())
    }

    /// Handles a click on the output view at pixel `(x, y)`.
    ///
    /// The mask color under the cursor becomes the active color. A left
    /// click starts a blink highlight of that region (unless one is in
    /// progress), or paints while paint mode is enabled; a right click
    /// refocuses while focus mode is enabled and the color changed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PixelOutOfRange`] for coordinates outside the
    /// mask, and propagates store errors from the triggered operation.
    pub fn click(
        &mut self,
        store: &mut SegmentationMaskStore,
        x: usize,
        y: usize,
        button: MouseButton,
    ) -> Result<()> {
        let Some(color) = store.mask_color_at(x, y) else {
            return Err(Error::PixelOutOfRange {
                index: y * store.mask().width() + x,
                count: store.mask().pixel_count(),
            });
        };
        self.active_color = Some(color);

        match button {
            MouseButton::Left if self.paint_enabled => {
                #[allow(clippy::cast_possible_wrap)]
                store.paint_disc(x as i64, y as i64, self.brush.radius, self.brush.color)?;
            }
            MouseButton::Left => {
                if !self.blink.is_active() {
                    store.focus_color(color)?;
                    self.focus_color = Some(color);
                    self.blink.start();
                }
            }
            MouseButton::Right => {
                if self.focus_enabled && self.focus_color != Some(color) {
                    store.focus_color(color)?;
                    self.focus_color = Some(color);
                }
            }
        }
        Ok(())
    }

    /// Per-frame tick. Advances the blink timer and, exactly once when the
    /// configured duration is reached, reverts the output to the distance
    /// composition. Returns true on the frame the revert happened.
    ///
    /// # Errors
    ///
    /// Propagates [`SegmentationMaskStore::apply_distance_alpha`] errors
    /// from the revert.
    pub fn advance_frame(&mut self, store: &mut SegmentationMaskStore) -> Result<bool> {
        if self.blink.tick() {
            log::debug!("blink ended, reverting to distance alpha");
            store.apply_distance_alpha(self.alpha_source)?;
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::RgbaRaster;

    fn store_with_distance() -> SegmentationMaskStore {
        let mut mask = RgbaRaster::filled(4, 4, [10, 20, 30, 255]);
        mask.set_pixel(3, 3, [200, 0, 0, 255]);
        let mut store = SegmentationMaskStore::new();
        store.load_mask(mask, None);
        store
            .load_distance(RgbaRaster::filled(4, 4, [90, 0, 0, 255]))
            .unwrap();
        store
    }

    #[test]
    fn test_blink_timer_fires_once() {
        let mut timer = BlinkTimer::new(3);
        assert!(!timer.tick());
        timer.start();
        assert!(!timer.tick());
        assert!(!timer.tick());
        assert!(timer.tick());
        assert!(!timer.is_active());
        assert!(!timer.tick());
    }

    #[test]
    fn test_left_click_starts_blink_and_focuses() {
        let mut store = store_with_distance();
        let mut session = InteractionSession::new();
        session.click(&mut store, 3, 3, MouseButton::Left).unwrap();

        assert!(session.in_blink());
        assert_eq!(session.active_color(), Some([200, 0, 0]));
        assert_eq!(session.focus_color(), Some([200, 0, 0]));
        assert_eq!(store.output().alpha_at(3 * 4 + 3), 255);
        assert_eq!(store.output().alpha_at(0), 0);
    }

    #[test]
    fn test_left_click_during_blink_only_updates_active_color() {
        let mut store = store_with_distance();
        let mut session = InteractionSession::new();
        session.click(&mut store, 3, 3, MouseButton::Left).unwrap();
        session.click(&mut store, 0, 0, MouseButton::Left).unwrap();

        assert_eq!(session.active_color(), Some([10, 20, 30]));
        // Focus still on the first region.
        assert_eq!(session.focus_color(), Some([200, 0, 0]));
        assert_eq!(store.output().alpha_at(0), 0);
    }

    #[test]
    fn test_blink_reverts_exactly_once() {
        let mut store = store_with_distance();
        let mut session = InteractionSession::new();
        session.set_blink_duration(2);
        session.click(&mut store, 3, 3, MouseButton::Left).unwrap();

        assert!(!session.advance_frame(&mut store).unwrap());
        assert!(session.advance_frame(&mut store).unwrap());
        // Output alpha restored from the distance raster.
        assert_eq!(store.output().alpha_at(0), 90);
        assert!(!session.advance_frame(&mut store).unwrap());
    }

    #[test]
    fn test_right_click_refocuses_only_when_enabled() {
        let mut store = store_with_distance();
        let mut session = InteractionSession::new();

        session.click(&mut store, 3, 3, MouseButton::Right).unwrap();
        assert_eq!(session.focus_color(), None);

        session.set_focus_enabled(&mut store, true).unwrap();
        session.click(&mut store, 3, 3, MouseButton::Right).unwrap();
        assert_eq!(session.focus_color(), Some([200, 0, 0]));
        assert_eq!(store.output().alpha_at(0), 0);
    }

    #[test]
    fn test_disabling_focus_reverts_output() {
        let mut store = store_with_distance();
        let mut session = InteractionSession::new();
        session.set_focus_enabled(&mut store, true).unwrap();
        session.click(&mut store, 0, 0, MouseButton::Right).unwrap();

        session.set_focus_enabled(&mut store, false).unwrap();
        assert_eq!(session.focus_color(), None);
        assert_eq!(store.output().alpha_at(0), 90);
    }

    #[test]
    fn test_paint_click() {
        let mut store = store_with_distance();
        let mut session = InteractionSession::new();
        session.set_paint_enabled(true);
        session.brush = BrushSettings {
            radius: 1,
            color: [7, 7, 7],
        };
        session.click(&mut store, 1, 1, MouseButton::Left).unwrap();

        assert_eq!(store.mask_color_at(1, 1), Some([7, 7, 7]));
        // Painting never arms the blink timer.
        assert!(!session.in_blink());
    }

    #[test]
    fn test_click_out_of_bounds() {
        let mut store = store_with_distance();
        let mut session = InteractionSession::new();
        let result = session.click(&mut store, 10, 10, MouseButton::Left);
        assert!(matches!(result, Err(Error::PixelOutOfRange { .. })));
    }

    #[test]
    fn test_uniform_alpha_source() {
        let mut store = store_with_distance();
        let mut session = InteractionSession::new();
        session.set_alpha_source(AlphaSource::Uniform(255));
        session.set_blink_duration(1);
        session.click(&mut store, 0, 0, MouseButton::Left).unwrap();
        assert!(session.advance_frame(&mut store).unwrap());
        assert_eq!(store.output().alpha_at(3 * 4 + 3), 255);
    }
}
