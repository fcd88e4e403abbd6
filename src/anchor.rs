//! Docking presentation.
//!
//! The host can ask the orb to dock beside an on-screen rectangle (for
//! example an embedded video). Docking never touches the simulation: the
//! particles keep living in the local viewport, and only the final mapping
//! from local pixels to surface pixels changes.
//!
//! ```text
//! surface = origin + local * scale
//! ```
//!
//! Centered: `origin = (0, 0)`, `scale = 1`. Docked: the orb shrinks about
//! its top-left corner to `docked_scale` and its top-left sits `margin`
//! pixels left of the rectangle, level with its top edge.
//!
//! Transitions are a pure function of `(from, to, ticks elapsed)` with a
//! cubic ease-in-out, so the renderer never queries layout.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Screen rectangle pushed by the host, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl AnchorRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Whether every edge is a finite number.
    pub fn is_finite(&self) -> bool {
        self.left.is_finite() && self.top.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Docking parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorConfig {
    /// Scale of the docked orb, in `(0, 1]`.
    pub docked_scale: f32,
    /// Horizontal gap between the docked orb's left edge and the rectangle.
    pub margin: f32,
    /// Length of a dock/undock transition, in ticks. Zero snaps.
    pub transition_ticks: u32,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            docked_scale: 0.25,
            margin: 130.0,
            transition_ticks: 30,
        }
    }
}

/// Affine map from local viewport pixels to surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presentation {
    pub origin: Vec2,
    pub scale: f32,
}

impl Presentation {
    pub const CENTERED: Presentation = Presentation {
        origin: Vec2::ZERO,
        scale: 1.0,
    };

    /// Presentation for an optional anchor.
    pub fn for_anchor(anchor: Option<AnchorRect>, config: &AnchorConfig) -> Self {
        match anchor {
            Some(rect) => Self {
                origin: Vec2::new(rect.left - config.margin, rect.top),
                scale: config.docked_scale,
            },
            None => Self::CENTERED,
        }
    }

    #[inline]
    pub fn apply(&self, local: Vec2) -> Vec2 {
        self.origin + local * self.scale
    }

    pub fn lerp(self, to: Presentation, t: f32) -> Self {
        Self {
            origin: self.origin.lerp(to.origin, t),
            scale: self.scale + (to.scale - self.scale) * t,
        }
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self::CENTERED
    }
}

/// Cubic ease-in-out on `[0, 1]`.
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

/// Presentation `elapsed` ticks into a transition of `duration` ticks.
pub fn tween(from: Presentation, to: Presentation, elapsed: u64, duration: u32) -> Presentation {
    if duration == 0 || elapsed >= u64::from(duration) {
        return to;
    }
    from.lerp(to, ease_in_out(elapsed as f32 / duration as f32))
}

/// Running dock/undock transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorTween {
    from: Presentation,
    to: Presentation,
    started_at: u64,
    anchor: Option<AnchorRect>,
}

impl AnchorTween {
    pub fn new() -> Self {
        Self {
            from: Presentation::CENTERED,
            to: Presentation::CENTERED,
            started_at: 0,
            anchor: None,
        }
    }

    /// Current target anchor.
    #[inline]
    pub fn anchor(&self) -> Option<AnchorRect> {
        self.anchor
    }

    /// Start moving towards a new anchor at tick `now`.
    ///
    /// The new transition starts from whatever is on screen at `now`, so
    /// re-targeting mid-flight does not jump.
    pub fn retarget(&mut self, anchor: Option<AnchorRect>, now: u64, config: &AnchorConfig) {
        if anchor == self.anchor {
            return;
        }
        self.from = self.sample(now, config);
        self.to = Presentation::for_anchor(anchor, config);
        self.started_at = now;
        self.anchor = anchor;
    }

    /// Presentation at tick `now`.
    pub fn sample(&self, now: u64, config: &AnchorConfig) -> Presentation {
        tween(
            self.from,
            self.to,
            now.saturating_sub(self.started_at),
            config.transition_ticks,
        )
    }

    /// Whether the transition has reached its target at tick `now`.
    pub fn is_settled(&self, now: u64, config: &AnchorConfig) -> bool {
        now.saturating_sub(self.started_at) >= u64::from(config.transition_ticks)
    }
}

impl Default for AnchorTween {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video() -> AnchorRect {
        AnchorRect::new(600.0, 80.0, 480.0, 270.0)
    }

    #[test]
    fn test_rect_finiteness() {
        assert!(video().is_finite());
        assert!(!AnchorRect::new(f32::NAN, 0.0, 10.0, 10.0).is_finite());
        assert!(!AnchorRect::new(0.0, 0.0, f32::INFINITY, 10.0).is_finite());
    }

    #[test]
    fn test_docked_presentation() {
        let config = AnchorConfig::default();
        let p = Presentation::for_anchor(Some(video()), &config);
        assert_eq!(p.origin, Vec2::new(470.0, 80.0));
        assert_eq!(p.scale, 0.25);
        assert_eq!(p.apply(Vec2::new(400.0, 400.0)), Vec2::new(570.0, 180.0));

        assert_eq!(Presentation::for_anchor(None, &config), Presentation::CENTERED);
    }

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
        assert!(ease_in_out(0.25) < 0.25);
        assert!(ease_in_out(0.75) > 0.75);
    }

    #[test]
    fn test_tween_reaches_target() {
        let config = AnchorConfig::default();
        let mut tween = AnchorTween::new();
        tween.retarget(Some(video()), 10, &config);

        assert_eq!(tween.sample(10, &config), Presentation::CENTERED);
        let mid = tween.sample(25, &config);
        assert!(mid.scale < 1.0 && mid.scale > 0.25);
        assert!(!tween.is_settled(25, &config));

        let end = tween.sample(40, &config);
        assert_eq!(end, Presentation::for_anchor(Some(video()), &config));
        assert!(tween.is_settled(40, &config));
    }

    #[test]
    fn test_retarget_mid_flight_is_continuous() {
        let config = AnchorConfig::default();
        let mut tween = AnchorTween::new();
        tween.retarget(Some(video()), 0, &config);

        let before = tween.sample(12, &config);
        tween.retarget(None, 12, &config);
        assert_eq!(tween.sample(12, &config), before);
        assert_eq!(tween.sample(12 + 30, &config), Presentation::CENTERED);
    }

    #[test]
    fn test_same_anchor_does_not_restart() {
        let config = AnchorConfig::default();
        let mut tween = AnchorTween::new();
        tween.retarget(Some(video()), 0, &config);
        tween.retarget(Some(video()), 20, &config);
        assert!(tween.is_settled(30, &config));
    }

    #[test]
    fn test_zero_duration_snaps() {
        let config = AnchorConfig {
            transition_ticks: 0,
            ..AnchorConfig::default()
        };
        let mut tween = AnchorTween::new();
        tween.retarget(Some(video()), 5, &config);
        assert_eq!(tween.sample(5, &config).scale, 0.25);
    }
}
