/// Timed alpha fade advanced by the tick loop.
///
/// The engine keeps at most one of these in flight for its current phase;
/// dropping the value cancels the fade. `advance` yields control back to the
/// caller every tick until the configured duration has elapsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Fade {
    pub from: f32,
    pub to: f32,
    pub duration_secs: f64,
    elapsed_secs: f64,
}

impl Fade {
    pub fn new(from: f32, to: f32, duration_secs: f64) -> Self {
        Self {
            from,
            to,
            duration_secs: duration_secs.max(0.0),
            elapsed_secs: 0.0,
        }
    }

    /// Advances by `dt` seconds. Returns true once the fade has completed.
    pub fn advance(&mut self, dt: f64) -> bool {
        self.elapsed_secs += dt.max(0.0);
        self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed_secs >= self.duration_secs
    }

    /// Current interpolated alpha, clamped to the end value on completion.
    pub fn alpha(&self) -> f32 {
        if self.duration_secs <= 0.0 || self.is_complete() {
            return self.to;
        }
        let progress = (self.elapsed_secs / self.duration_secs) as f32;
        lerp(self.from, self.to, progress)
    }
}

pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_completes_after_duration() {
        let mut fade = Fade::new(0.0, 1.0, 1.0);

        assert!(!fade.advance(0.4));
        assert!(!fade.advance(0.4));
        assert!(fade.advance(0.4));
        assert!(fade.is_complete());
    }

    #[test]
    fn test_alpha_interpolates_and_clamps() {
        let mut fade = Fade::new(0.0, 1.0, 2.0);

        fade.advance(1.0);
        assert!((fade.alpha() - 0.5).abs() < 1e-6);

        fade.advance(5.0);
        assert_eq!(fade.alpha(), 1.0);
    }

    #[test]
    fn test_zero_duration_is_immediately_complete() {
        let mut fade = Fade::new(0.0, 1.0, 0.0);

        assert!(fade.is_complete());
        assert_eq!(fade.alpha(), 1.0);
        assert!(fade.advance(0.0));
    }

    #[test]
    fn test_negative_dt_does_not_rewind() {
        let mut fade = Fade::new(0.0, 1.0, 1.0);

        fade.advance(0.6);
        fade.advance(-5.0);
        assert!(!fade.is_complete());
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(0.0, 10.0, 2.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, -1.0), 0.0);
    }
}
