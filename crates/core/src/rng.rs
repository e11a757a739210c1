//! Explicit, seedable random stream shared by every generation stage.
//!
//! A [`LevelRng`] is passed by `&mut` through the pipeline; nothing reads
//! ambient randomness. Every bounded draw is built from raw 32-bit words with
//! the same rejection rule, so swapping the backing stream changes values but
//! never the number or order of draws a stage makes.

use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

use crate::config::RngStream;

#[derive(Clone, Debug)]
pub struct LevelRng {
    seed: u64,
    words_drawn: u64,
    source: StreamSource,
}

#[derive(Clone, Debug)]
enum StreamSource {
    ChaCha8(Box<ChaCha8Rng>),
    SmallFast(SmallFastState),
}

impl LevelRng {
    pub fn new(seed: u64) -> Self {
        Self::with_stream(seed, RngStream::ChaCha8)
    }

    pub fn with_stream(seed: u64, stream: RngStream) -> Self {
        let source = match stream {
            RngStream::ChaCha8 => StreamSource::ChaCha8(Box::new(ChaCha8Rng::seed_from_u64(seed))),
            RngStream::SmallFast => StreamSource::SmallFast(SmallFastState::seeded(seed)),
        };
        Self { seed, words_drawn: 0, source }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of raw words consumed so far.
    pub fn position(&self) -> u64 {
        self.words_drawn
    }

    pub fn next_word(&mut self) -> u32 {
        self.words_drawn += 1;
        match &mut self.source {
            StreamSource::ChaCha8(rng) => rng.next_u32(),
            StreamSource::SmallFast(state) => state.advance(),
        }
    }

    /// Uniform draw in `lower..=upper`; returns `lower` without drawing when
    /// the range is empty or a single value.
    pub fn range(&mut self, lower: i32, upper: i32) -> i32 {
        if upper <= lower {
            return lower;
        }
        let interval = (upper - lower) as u32 + 1;
        lower + self.below(interval) as i32
    }

    pub fn percent(&mut self, percent: i32) -> bool {
        self.range(0, 99) < percent.clamp(0, 100)
    }

    /// Sum of `clump_factor` smaller dice spanning `lower..=upper`, biased
    /// toward the middle of the range.
    pub fn clumped_range(&mut self, lower: i32, upper: i32, clump_factor: i32) -> i32 {
        if upper <= lower {
            return lower;
        }
        if clump_factor <= 1 {
            return self.range(lower, upper);
        }
        let span = upper - lower;
        let sides = span / clump_factor;
        let wide_dice = span % clump_factor;
        let mut total = 0;
        for die in 0..clump_factor {
            total += if die < wide_dice { self.range(0, sides + 1) } else { self.range(0, sides) };
        }
        total + lower
    }

    /// Uniform pick from `items`. Empty slices draw nothing and a single item
    /// is returned without a draw; otherwise one bounded draw is made.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.range(0, items.len() as i32 - 1) as usize;
        items.get(index)
    }

    /// In-place Fisher–Yates shuffle, walking from the back.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for index in (1..items.len()).rev() {
            let swap_with = self.range(0, index as i32) as usize;
            items.swap(index, swap_with);
        }
    }

    fn below(&mut self, bound: u32) -> u32 {
        let divisor = u32::MAX / bound;
        loop {
            let value = self.next_word() / divisor;
            if value < bound {
                return value;
            }
        }
    }
}

/// Four-word small-fast generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SmallFastState {
    a: u32,
    b: u32,
    c: u32,
    d: u32,
}

impl SmallFastState {
    fn seeded(seed: u64) -> Self {
        let low = seed as u32;
        let mut state = Self { a: 0xF1EA_5EED, b: low, c: low ^ ((seed >> 32) as u32), d: low };
        for _ in 0..20 {
            state.advance();
        }
        state
    }

    fn advance(&mut self) -> u32 {
        let e = self.a.wrapping_sub(self.b.rotate_left(27));
        self.a = self.b ^ self.c.rotate_left(17);
        self.b = self.c.wrapping_add(self.d);
        self.c = self.d.wrapping_add(e);
        self.d = e.wrapping_add(self.a);
        self.d
    }
}
