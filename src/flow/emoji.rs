//! Floating emoji animator as a bounded pool
//!
//! Elements are spawned on a fixed schedule and expire after their animation
//! (plus a short linger). The pool refuses spawns past its capacity, so the
//! number of live DOM nodes never exceeds `capacity()`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Default palette
pub const EMOJIS: [&str; 10] = ["💗", "💖", "✨", "🌸", "🫧", "💞", "🎀", "🌷", "🩷", "😊"];

/// Left edge position range (vw)
pub const LEFT_RANGE: (f32, f32) = (0.0, 100.0);
/// Font size range (px)
pub const SIZE_RANGE: (f32, f32) = (16.0, 32.0);
/// Float-up animation duration range (s)
pub const DURATION_RANGE: (f32, f32) = (9.0, 19.0);
/// Horizontal drift and rotation, both symmetric around zero
pub const DRIFT_MAX_PX: f32 = 60.0;
pub const SPIN_MAX_DEG: f32 = 60.0;

/// A single decorative element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingEmoji {
    pub id: u32,
    pub symbol: String,
    pub left_vw: f32,
    pub size_px: f32,
    pub duration_s: f32,
    pub drift_px: i32,
    pub spin_deg: i32,
    /// Page time (ms) at which the element is removed
    pub expires_at_ms: f64,
}

impl FloatingEmoji {
    /// Inline style for the overlay element
    pub fn style(&self) -> String {
        format!(
            "left:{:.2}vw;font-size:{:.1}px;animation-duration:{:.2}s;--drift:{}px;--spin:{}deg",
            self.left_vw, self.size_px, self.duration_s, self.drift_px, self.spin_deg
        )
    }
}

/// When spawns happen: an initial staggered burst, then a fixed interval forever
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiSchedule {
    pub burst: u32,
    pub burst_spacing_ms: u32,
    pub interval_ms: u32,
}

impl Default for EmojiSchedule {
    fn default() -> Self {
        Self {
            burst: EMOJI_BURST,
            burst_spacing_ms: EMOJI_BURST_SPACING_MS,
            interval_ms: EMOJI_INTERVAL_MS,
        }
    }
}

impl EmojiSchedule {
    /// Delays (ms from start) of the initial burst
    pub fn burst_offsets(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.burst).map(move |i| i.saturating_mul(self.burst_spacing_ms))
    }

    /// Repeat interval, or None when the page only wants the burst
    pub fn repeat_interval_ms(&self) -> Option<u32> {
        (self.interval_ms > 0).then_some(self.interval_ms)
    }

    /// Every spawn time in [0, until_ms], sorted
    pub fn spawn_times(&self, until_ms: u64) -> Vec<u64> {
        let mut times: Vec<u64> = self
            .burst_offsets()
            .map(u64::from)
            .filter(|&t| t <= until_ms)
            .collect();
        if let Some(interval) = self.repeat_interval_ms() {
            let interval = interval as u64;
            times.extend((1..).map(|n| n * interval).take_while(|&t| t <= until_ms));
        }
        times.sort_unstable();
        times
    }
}

/// Browser timers take a signed 32-bit delay; larger values saturate
pub fn timer_delay_ms(ms: u32) -> i32 {
    i32::try_from(ms).unwrap_or(i32::MAX)
}

/// Live floating elements with an explicit ceiling
#[derive(Debug, Clone)]
pub struct EmojiPool {
    palette: Vec<String>,
    capacity: usize,
    linger_ms: u32,
    live: Vec<FloatingEmoji>,
    next_id: u32,
}

impl Default for EmojiPool {
    fn default() -> Self {
        Self::new(EMOJIS.iter().map(|s| s.to_string()).collect(), EMOJI_CAPACITY)
    }
}

impl EmojiPool {
    pub fn new(palette: Vec<String>, capacity: usize) -> Self {
        Self {
            palette,
            capacity,
            linger_ms: EMOJI_LINGER_MS,
            live: Vec::with_capacity(capacity),
            next_id: 1,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn live(&self) -> usize {
        self.live.len()
    }

    pub fn is_full(&self) -> bool {
        self.live.len() >= self.capacity
    }

    /// Spawn one element at `now_ms`; None when full or the palette is empty
    pub fn spawn<R: Rng>(&mut self, now_ms: f64, rng: &mut R) -> Option<FloatingEmoji> {
        if self.is_full() || self.palette.is_empty() {
            return None;
        }

        let symbol = self.palette[rng.random_range(0..self.palette.len())].clone();
        let left_vw = rng.random_range(LEFT_RANGE.0..LEFT_RANGE.1);
        let size_px = rng.random_range(SIZE_RANGE.0..SIZE_RANGE.1);
        let duration_s = rng.random_range(DURATION_RANGE.0..DURATION_RANGE.1);
        let drift_px = rng.random_range(-DRIFT_MAX_PX..DRIFT_MAX_PX).round() as i32;
        let spin_deg = rng.random_range(-SPIN_MAX_DEG..SPIN_MAX_DEG).round() as i32;

        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        let emoji = FloatingEmoji {
            id,
            symbol,
            left_vw,
            size_px,
            duration_s,
            drift_px,
            spin_deg,
            expires_at_ms: now_ms + duration_s as f64 * 1000.0 + self.linger_ms as f64,
        };
        self.live.push(emoji.clone());
        Some(emoji)
    }

    /// Drop everything whose time is up, returning the removed ids
    pub fn expire(&mut self, now_ms: f64) -> Vec<u32> {
        let mut expired = Vec::new();
        self.live.retain(|e| {
            if e.expires_at_ms <= now_ms {
                expired.push(e.id);
                false
            } else {
                true
            }
        });
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_within_ranges() {
        let mut pool = EmojiPool::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..20 {
            let e = pool.spawn(0.0, &mut rng).unwrap();
            assert!(EMOJIS.contains(&e.symbol.as_str()));
            assert!((0.0..100.0).contains(&e.left_vw));
            assert!((16.0..32.0).contains(&e.size_px));
            assert!((9.0..19.0).contains(&e.duration_s));
            assert!((-60..=60).contains(&e.drift_px));
            assert!((-60..=60).contains(&e.spin_deg));
            let lifetime = e.expires_at_ms;
            assert!(lifetime >= 10_000.0 && lifetime <= 20_000.0);
        }
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut pool = EmojiPool::new(vec!["✨".to_string()], 3);
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(pool.spawn(0.0, &mut rng).is_some());
        assert!(pool.spawn(0.0, &mut rng).is_some());
        assert!(pool.spawn(0.0, &mut rng).is_some());
        assert!(pool.spawn(0.0, &mut rng).is_none());
        assert_eq!(pool.live(), 3);
    }

    #[test]
    fn test_expire_frees_slots() {
        let mut pool = EmojiPool::new(vec!["✨".to_string()], 1);
        let mut rng = Pcg32::seed_from_u64(2);
        let e = pool.spawn(0.0, &mut rng).unwrap();
        assert!(pool.expire(e.expires_at_ms - 1.0).is_empty());
        assert_eq!(pool.expire(e.expires_at_ms), vec![e.id]);
        assert_eq!(pool.live(), 0);
        assert!(pool.spawn(e.expires_at_ms, &mut rng).is_some());
    }

    #[test]
    fn test_empty_palette_spawns_nothing() {
        let mut pool = EmojiPool::new(Vec::new(), 4);
        let mut rng = Pcg32::seed_from_u64(3);
        assert!(pool.spawn(0.0, &mut rng).is_none());
    }

    #[test]
    fn test_schedule_burst_then_interval() {
        let schedule = EmojiSchedule::default();
        let offsets: Vec<u32> = schedule.burst_offsets().collect();
        assert_eq!(offsets, vec![0, 250, 500, 750, 1000, 1250, 1500, 1750]);

        let times = schedule.spawn_times(1300);
        assert_eq!(times, vec![0, 250, 500, 650, 750, 1000, 1250, 1300]);
    }

    #[test]
    fn test_zero_interval_is_burst_only() {
        let schedule = EmojiSchedule {
            interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(schedule.repeat_interval_ms(), None);
        assert_eq!(schedule.spawn_times(10_000).len(), 8);
        assert_eq!(EmojiSchedule::default().repeat_interval_ms(), Some(650));
    }

    #[test]
    fn test_large_schedule_saturates() {
        let schedule = EmojiSchedule {
            burst: 4,
            burst_spacing_ms: u32::MAX / 2,
            interval_ms: 650,
        };
        let offsets: Vec<u32> = schedule.burst_offsets().collect();
        assert_eq!(offsets, vec![0, u32::MAX / 2, u32::MAX - 1, u32::MAX]);
        assert_eq!(timer_delay_ms(u32::MAX), i32::MAX);
        assert_eq!(timer_delay_ms(250), 250);
    }

    #[test]
    fn test_style_string() {
        let e = FloatingEmoji {
            id: 1,
            symbol: "🌸".to_string(),
            left_vw: 12.5,
            size_px: 20.0,
            duration_s: 10.0,
            drift_px: -4,
            spin_deg: 30,
            expires_at_ms: 11_000.0,
        };
        assert_eq!(
            e.style(),
            "left:12.50vw;font-size:20.0px;animation-duration:10.00s;--drift:-4px;--spin:30deg"
        );
    }

    proptest! {
        #[test]
        fn prop_live_never_exceeds_capacity(seed in any::<u64>(), capacity in 1usize..40, minutes in 1u64..5) {
            let schedule = EmojiSchedule::default();
            let mut pool = EmojiPool::new(vec!["💗".to_string(), "✨".to_string()], capacity);
            let mut rng = Pcg32::seed_from_u64(seed);
            for t in schedule.spawn_times(minutes * 60_000) {
                pool.expire(t as f64);
                pool.spawn(t as f64, &mut rng);
                prop_assert!(pool.live() <= pool.capacity());
            }
        }
    }
}
