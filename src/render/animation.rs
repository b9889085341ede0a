// Fade animation support for shown and hidden images

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum EasingType {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Slow start and end, like the classic "swing" fade
    #[default]
    Swing,
}

impl EasingType {
    /// Apply easing function to progress
    pub fn apply(&self, t: f32) -> f32 {
        // https://easings.net/
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::Linear => t,
            EasingType::EaseIn => t * t,
            EasingType::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            EasingType::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - t)
                }
            }
            EasingType::Swing => 0.5 - (std::f32::consts::PI * t).cos() / 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

/// One running fade of a displayed image
#[derive(Debug, Clone)]
pub struct Fade {
    pub direction: FadeDirection,
    pub start_time: Instant,
    pub duration: Duration,
    pub easing: EasingType,
}

impl Fade {
    pub fn new(direction: FadeDirection, start_time: Instant, duration: Duration) -> Self {
        Self {
            direction,
            start_time,
            duration,
            easing: EasingType::default(),
        }
    }

    pub fn fade_in(duration: Duration) -> Self {
        Self::new(FadeDirection::In, Instant::now(), duration)
    }

    pub fn fade_out(duration: Duration) -> Self {
        Self::new(FadeDirection::Out, Instant::now(), duration)
    }

    pub fn with_easing(mut self, easing: EasingType) -> Self {
        self.easing = easing;
        self
    }

    /// Animation progress (0.0 to 1.0) at `now`
    pub fn progress_at(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start_time);
        if elapsed >= self.duration {
            1.0
        } else {
            elapsed.as_secs_f32() / self.duration.as_secs_f32()
        }
    }

    /// Opacity (0.0 transparent, 1.0 opaque) at `now`
    pub fn opacity_at(&self, now: Instant) -> f32 {
        let eased = self.easing.apply(self.progress_at(now));
        match self.direction {
            FadeDirection::In => eased,
            FadeDirection::Out => 1.0 - eased,
        }
    }

    pub fn is_completed_at(&self, now: Instant) -> bool {
        self.progress_at(now) >= 1.0
    }
}
