use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Easing curves
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ease {
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Timeline: shared start/duration bookkeeping
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
struct Timeline {
    start: f64,
    duration: f64,
    ease: Ease,
}

impl Timeline {
    fn progress(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        self.ease.apply((now - self.start) / self.duration)
    }

    fn finished(&self, now: f64) -> bool {
        now >= self.start + self.duration
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

// ---------------------------------------------------------------------------
// Tween – a single animated scalar
// ---------------------------------------------------------------------------

/// An animated `f64`. Retargeting starts the next animation from whatever
/// value is on screen, so the latest target always wins.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    from: f64,
    to: f64,
    timeline: Timeline,
}

impl Tween {
    /// A tween already resting at `value`.
    pub fn at(value: f64) -> Self {
        Self {
            from: value,
            to: value,
            timeline: Timeline {
                start: 0.0,
                duration: 0.0,
                ease: Ease::Linear,
            },
        }
    }

    pub fn value(&self, now: f64) -> f64 {
        lerp(self.from, self.to, self.timeline.progress(now))
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn retarget(&mut self, to: f64, now: f64, duration: f64, ease: Ease) {
        self.from = self.value(now);
        self.to = to;
        self.timeline = Timeline {
            start: now,
            duration,
            ease,
        };
    }

    pub fn is_animating(&self, now: f64) -> bool {
        !self.timeline.finished(now) && self.from != self.to
    }
}

// ---------------------------------------------------------------------------
// SeriesTween – an animated point sequence
// ---------------------------------------------------------------------------

/// Animated `[x, y]` points. Point `i` of the new target starts at point `i`
/// of what is currently displayed; points with no predecessor rise from the
/// `y = baseline` line at their own x. Surplus old points are dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesTween {
    from: Vec<[f64; 2]>,
    to: Vec<[f64; 2]>,
    timeline: Timeline,
}

impl SeriesTween {
    pub fn at(points: Vec<[f64; 2]>) -> Self {
        Self {
            from: points.clone(),
            to: points,
            timeline: Timeline {
                start: 0.0,
                duration: 0.0,
                ease: Ease::Linear,
            },
        }
    }

    pub fn points(&self, now: f64) -> Vec<[f64; 2]> {
        let t = self.timeline.progress(now);
        self.from
            .iter()
            .zip(&self.to)
            .map(|(a, b)| [lerp(a[0], b[0], t), lerp(a[1], b[1], t)])
            .collect()
    }

    pub fn target(&self) -> &[[f64; 2]] {
        &self.to
    }

    pub fn retarget(
        &mut self,
        to: Vec<[f64; 2]>,
        baseline: f64,
        now: f64,
        duration: f64,
        ease: Ease,
    ) {
        let current = self.points(now);
        self.from = to
            .iter()
            .enumerate()
            .map(|(i, p)| current.get(i).copied().unwrap_or([p[0], baseline]))
            .collect();
        self.to = to;
        self.timeline = Timeline {
            start: now,
            duration,
            ease,
        };
    }

    pub fn is_animating(&self, now: f64) -> bool {
        !self.timeline.finished(now) && self.from != self.to
    }
}
