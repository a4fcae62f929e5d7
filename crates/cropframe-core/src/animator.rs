//! Time-driven interpolation between two transform states.
//!
//! The animator owns no clock and no callbacks. The owner starts an animation,
//! then polls [`TransformAnimator::tick`] once per frame with the host's
//! timestamp and applies the returned [`AnimationFrame`].
//!
//! Two animation kinds exist:
//! - **Translation** (pan/fling settle): X and Y only, decelerating curve
//! - **Double-tap zoom**: X, Y and scale together, accelerate-decelerate curve
//!
//! Starting an animation while another is in flight replaces it. The replaced
//! animation never reports completion.

use std::f64::consts::PI;

/// Easing curve applied to normalized progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolator {
    /// Fast start, slow finish: `1 - (1 - t)^2`.
    Decelerate,
    /// Slow start and finish: `cos((t + 1) * PI) / 2 + 0.5`.
    AccelerateDecelerate,
}

impl Interpolator {
    /// Map progress `t` (clamped to 0.0-1.0) onto the curve.
    #[inline]
    pub fn interpolate(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Interpolator::Decelerate => 1.0 - (1.0 - t) * (1.0 - t),
            Interpolator::AccelerateDecelerate => ((t + 1.0) * PI).cos() / 2.0 + 0.5,
        }
    }
}

/// Which transition is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    Translation,
    DoubleTapZoom,
}

/// One tagged value produced by a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    X(f64),
    Y(f64),
    Scale(f64),
}

/// Interpolated state for a single tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    pub kind: AnimationKind,
    pub x: f64,
    pub y: f64,
    /// Present only for [`AnimationKind::DoubleTapZoom`].
    pub scale: Option<f64>,
    /// True on the last frame of the animation. Reported exactly once.
    pub finished: bool,
}

impl AnimationFrame {
    /// Samples in application order: scale first, then X, then Y.
    pub fn samples(&self) -> impl Iterator<Item = Sample> {
        self.scale
            .map(Sample::Scale)
            .into_iter()
            .chain([Sample::X(self.x), Sample::Y(self.y)])
    }
}

#[derive(Debug, Clone, Copy)]
struct Track {
    from: f64,
    to: f64,
}

impl Track {
    fn at(&self, fraction: f64) -> f64 {
        self.from + (self.to - self.from) * fraction
    }
}

#[derive(Debug, Clone)]
struct Animation {
    kind: AnimationKind,
    interpolator: Interpolator,
    duration_ms: f64,
    /// Latched on the first tick after start.
    started_at: Option<f64>,
    x: Track,
    y: Track,
    scale: Option<Track>,
}

/// Polled animator for position and scale transitions.
#[derive(Debug, Clone)]
pub struct TransformAnimator {
    translation_duration_ms: f64,
    zoom_duration_ms: f64,
    active: Option<Animation>,
}

impl Default for TransformAnimator {
    fn default() -> Self {
        Self::new(250.0, 500.0)
    }
}

impl TransformAnimator {
    pub fn new(translation_duration_ms: f64, zoom_duration_ms: f64) -> Self {
        Self {
            translation_duration_ms,
            zoom_duration_ms,
            active: None,
        }
    }

    /// Start a pan transition, replacing any running animation.
    pub fn animate_translation(&mut self, from_x: f64, to_x: f64, from_y: f64, to_y: f64) {
        self.start(Animation {
            kind: AnimationKind::Translation,
            interpolator: Interpolator::Decelerate,
            duration_ms: self.translation_duration_ms,
            started_at: None,
            x: Track { from: from_x, to: to_x },
            y: Track { from: from_y, to: to_y },
            scale: None,
        });
    }

    /// Start a combined pan + zoom transition, replacing any running animation.
    pub fn animate_double_tap_zoom(
        &mut self,
        from_x: f64,
        to_x: f64,
        from_y: f64,
        to_y: f64,
        from_scale: f64,
        to_scale: f64,
    ) {
        self.start(Animation {
            kind: AnimationKind::DoubleTapZoom,
            interpolator: Interpolator::AccelerateDecelerate,
            duration_ms: self.zoom_duration_ms,
            started_at: None,
            x: Track { from: from_x, to: to_x },
            y: Track { from: from_y, to: to_y },
            scale: Some(Track {
                from: from_scale,
                to: to_scale,
            }),
        });
    }

    fn start(&mut self, animation: Animation) {
        if self.cancel() {
            log::debug!("replacing in-flight animation with {:?}", animation.kind);
        } else {
            log::debug!("starting {:?} animation", animation.kind);
        }
        self.active = Some(animation);
    }

    /// Drop the running animation without reporting completion.
    ///
    /// Returns `true` if something was cancelled. Calling it again is a no-op.
    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Kind of the running animation, if any.
    pub fn kind(&self) -> Option<AnimationKind> {
        self.active.as_ref().map(|a| a.kind)
    }

    /// Advance to `now_ms` and return the interpolated state.
    ///
    /// Returns `None` when idle. The frame with `finished == true` carries the
    /// exact target values, after which the animator is idle again.
    pub fn tick(&mut self, now_ms: f64) -> Option<AnimationFrame> {
        let animation = self.active.as_mut()?;
        let started_at = *animation.started_at.get_or_insert(now_ms);

        let elapsed = (now_ms - started_at).max(0.0);
        let progress = if animation.duration_ms > 0.0 {
            (elapsed / animation.duration_ms).min(1.0)
        } else {
            1.0
        };

        if progress >= 1.0 {
            let done = self.active.take()?;
            return Some(AnimationFrame {
                kind: done.kind,
                x: done.x.to,
                y: done.y.to,
                scale: done.scale.map(|s| s.to),
                finished: true,
            });
        }

        let fraction = animation.interpolator.interpolate(progress);
        Some(AnimationFrame {
            kind: animation.kind,
            x: animation.x.at(fraction),
            y: animation.y.at(fraction),
            scale: animation.scale.map(|s| s.at(fraction)),
            finished: false,
        })
    }
}
