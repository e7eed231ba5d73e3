//! Progress drivers.
//!
//! The cloud never advances progress itself; it polls a
//! [`TransitionDriver`] once per frame. [`Tween`] animates progress over
//! wall-clock time with an easing curve, [`FixedProgress`] holds a manually
//! set value for scrubbing.
//!
//! ```ignore
//! // 0 -> 1 over 2.5 seconds, fast start, long settle
//! let mut tween = Tween::new(0.0, 1.0, 2.5, Easing::Power4Out);
//! tween.advance(clock.update());
//! cloud.advance(tween.current_progress(), input.pointer_ndc());
//! ```

/// Source of the transition progress.
pub trait TransitionDriver {
    /// Current (already eased) progress. Values outside `[0, 1]` are allowed.
    fn current_progress(&self) -> f32;
}

impl TransitionDriver for f32 {
    fn current_progress(&self) -> f32 {
        *self
    }
}

/// Easing curves, named after the usual `PowerN` family.
///
/// `Power1` is quadratic, `Power4` is quintic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    Power1In,
    Power1Out,
    Power1InOut,
    Power2In,
    Power2Out,
    Power2InOut,
    Power3In,
    Power3Out,
    Power3InOut,
    Power4In,
    #[default]
    Power4Out,
    Power4InOut,
}

impl Easing {
    /// Map `t ∈ [0, 1]` to eased progress. Input is clamped.
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::Power1In => ease_in(t, 2),
            Easing::Power1Out => ease_out(t, 2),
            Easing::Power1InOut => ease_in_out(t, 2),
            Easing::Power2In => ease_in(t, 3),
            Easing::Power2Out => ease_out(t, 3),
            Easing::Power2InOut => ease_in_out(t, 3),
            Easing::Power3In => ease_in(t, 4),
            Easing::Power3Out => ease_out(t, 4),
            Easing::Power3InOut => ease_in_out(t, 4),
            Easing::Power4In => ease_in(t, 5),
            Easing::Power4Out => ease_out(t, 5),
            Easing::Power4InOut => ease_in_out(t, 5),
        }
    }
}

#[inline]
fn ease_in(t: f32, power: i32) -> f32 {
    t.powi(power)
}

#[inline]
fn ease_out(t: f32, power: i32) -> f32 {
    1.0 - (1.0 - t).powi(power)
}

#[inline]
fn ease_in_out(t: f32, power: i32) -> f32 {
    if t < 0.5 {
        (2.0 * t).powi(power) * 0.5
    } else {
        1.0 - (2.0 * (1.0 - t)).powi(power) * 0.5
    }
}

/// Time-based tween between two progress values.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

impl Tween {
    /// A tween of `duration` seconds. Non-positive durations finish immediately.
    pub fn new(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: if duration.is_finite() { duration.max(0.0) } else { 0.0 },
            elapsed: 0.0,
            easing,
        }
    }

    /// The demo intro: 0 → 1 over 2.5 s with `Power4Out`.
    pub fn intro() -> Self {
        Self::new(0.0, 1.0, 2.5, Easing::Power4Out)
    }

    /// Advance by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed = (self.elapsed + dt).min(self.duration);
        }
    }

    /// Jump to `seconds` into the tween (scrubbing).
    pub fn seek(&mut self, seconds: f32) {
        self.elapsed = if seconds.is_finite() {
            seconds.clamp(0.0, self.duration)
        } else {
            0.0
        };
    }

    pub fn restart(&mut self) {
        self.elapsed = 0.0;
    }

    /// Linear time fraction in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        if self.duration == 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }
}

impl TransitionDriver for Tween {
    fn current_progress(&self) -> f32 {
        let eased = self.easing.apply(self.fraction());
        if eased >= 1.0 {
            // Land exactly on the end value
            return self.to;
        }
        self.from + (self.to - self.from) * eased
    }
}

/// Manually set progress, the programmatic stand-in for a slider.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FixedProgress(pub f32);

impl FixedProgress {
    pub fn set(&mut self, progress: f32) {
        self.0 = progress;
    }

    /// Nudge by `delta`, keeping the value inside `[0, 1]`.
    pub fn nudge(&mut self, delta: f32) {
        self.0 = (self.0 + delta).clamp(0.0, 1.0);
    }
}

impl TransitionDriver for FixedProgress {
    fn current_progress(&self) -> f32 {
        self.0
    }
}
