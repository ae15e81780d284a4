//! Timed character-by-character reveal of one sentence

/// Reveal state of the sentence on screen
///
/// The first character appears one `speed` interval after the sentence
/// starts. Fast-forward jumps to the end, but only once at least one
/// character is visible.
#[derive(Debug, Clone, PartialEq)]
pub struct Teletype {
    total: usize,
    revealed: usize,
    elapsed: f32,
    speed: f32,
}

impl Teletype {
    pub fn new(text: &str, speed: f32) -> Self {
        let total = text.chars().count();
        Self {
            total,
            revealed: if speed > 0.0 && speed.is_finite() { 0 } else { total },
            elapsed: 0.0,
            speed,
        }
    }

    pub fn advance(&mut self, dt: f32, fast_forward: bool) {
        if self.is_done() {
            return;
        }
        if fast_forward && self.revealed > 0 {
            self.revealed = self.total;
            return;
        }
        self.elapsed += dt;
        while self.elapsed >= self.speed && self.revealed < self.total {
            self.elapsed -= self.speed;
            self.revealed += 1;
        }
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn is_done(&self) -> bool {
        self.revealed >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveals_at_speed() {
        let mut t = Teletype::new("abcd", 0.1);
        assert_eq!(t.revealed(), 0);
        t.advance(0.25, false);
        assert_eq!(t.revealed(), 2);
        t.advance(1.0, false);
        assert_eq!(t.revealed(), 4);
        assert!(t.is_done());
    }

    #[test]
    fn test_fast_forward_needs_a_visible_character() {
        let mut t = Teletype::new("hello", 0.1);
        t.advance(0.01, true);
        assert_eq!(t.revealed(), 0);
        t.advance(0.1, false);
        assert_eq!(t.revealed(), 1);
        t.advance(0.0, true);
        assert!(t.is_done());
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        let mut t = Teletype::new("héé", 0.1);
        t.advance(0.35, false);
        assert!(t.is_done());
        assert_eq!(t.revealed(), 3);
    }

    #[test]
    fn test_unusable_speed_reveals_instantly() {
        for speed in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(Teletype::new("hi", speed).is_done(), "speed {speed}");
        }
    }

    #[test]
    fn test_empty_sentence_is_done() {
        assert!(Teletype::new("", 0.025).is_done());
    }
}
