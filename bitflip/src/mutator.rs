//! The two bit-flip passes from the "Fuzzing Like a Caveman" posts.

use log::debug;
use rand_core::RngCore;

use crate::rng::{below, XorShift64};

/// Fraction of a buffer's usable length flipped by one pass.
pub const FLIP_RATE: f64 = 0.01;

/// Bytes spared at a buffer edge so format markers survive mutation.
pub const MARGIN: usize = 4;

/// array of bitmasks to apply to individual bytes via xor
pub static FLIP_ARRAY: [u8; 8] = [1, 2, 4, 8, 16, 32, 64, 128];

/// Flip one bit by round-tripping the byte through its textual binary form.
/// Lands on the same value as `byte ^ (0x80 >> bit)`, with the string work
/// as the price of the detour.
#[inline]
fn toggle_bit_textual(byte: u8, bit: usize) -> u8 {
    let mut digits = format!("{:08b}", byte).into_bytes();
    digits[bit] = if digits[bit] == b'1' { b'0' } else { b'1' };
    let text = String::from_utf8(digits).expect("binary digits are ascii");
    u8::from_str_radix(&text, 2).expect("eight binary digits fit a byte")
}

/// Random bit flipper over byte buffers, one pass per call.
///
/// The generator is injectable so runs can be replayed draw for draw; the
/// rate defaults to flipping 1% of the eligible bytes.
pub struct BitFlipper<R = XorShift64> {
    rng: R,
    flip_rate: f64,
}

impl BitFlipper {
    /// Create a flipper driven by the crate's xorshift generator.
    pub fn new(seed: u64) -> Self {
        BitFlipper::from_rng(XorShift64::new(seed))
    }
}

impl<R: RngCore> BitFlipper<R> {
    /// Create a flipper over any generator.
    pub fn from_rng(rng: R) -> Self {
        BitFlipper {
            rng,
            flip_rate: FLIP_RATE,
        }
    }

    /// Replace the default 1% flip rate.
    pub fn with_flip_rate(mut self, flip_rate: f64) -> Self {
        self.flip_rate = flip_rate;
        self
    }

    /// First version of the caveman bit flip, after
    /// <https://h0mbre.github.io/Fuzzing-Like-A-Caveman/>.
    ///
    /// Flips land in `[4, len - 4)` so the head and tail markers of a
    /// JPEG-style input both survive. The flipped bit counts from the most
    /// significant end, and every flip round-trips its byte through the
    /// textual binary form.
    pub fn flip_v1<'a>(&mut self, data: &'a mut [u8]) -> &'a mut [u8] {
        // Anything shorter than both margins plus one byte has no window.
        if data.len() <= 2 * MARGIN {
            debug!("buffer of {} bytes has no flippable window", data.len());
            return data;
        }

        // The flip budget counts from len - 4 while the window itself
        // spans len - 8 positions.
        let length = data.len() - MARGIN;
        let num_of_flips = (length as f64 * self.flip_rate) as usize;

        let mut chosen_indexes = vec![];
        for _ in 0..num_of_flips {
            chosen_indexes.push(MARGIN + below(&mut self.rng, length - MARGIN));
        }

        for index in chosen_indexes {
            let picked_bit = below(&mut self.rng, 8);
            data[index] = toggle_bit_textual(data[index], picked_bit);
        }

        data
    }

    /// Second version of the caveman bit flip, after
    /// <https://h0mbre.github.io/Fuzzing-Like-a-Caveman-2/>.
    ///
    /// Keeps only the tail margin: flips land in `[0, len - 4)`, applied as
    /// xor against a mask from [`FLIP_ARRAY`], least significant bit first.
    pub fn flip_v2<'a>(&mut self, data: &'a mut [u8]) -> &'a mut [u8] {
        let length = match data.len().checked_sub(MARGIN) {
            Some(length) => length,
            None => {
                debug!("length of data is too small");
                return data;
            }
        };

        let num_of_flips = (length as f64 * self.flip_rate) as usize;

        let mut picked_indexes = vec![];
        for _ in 0..num_of_flips {
            picked_indexes.push(below(&mut self.rng, length));
        }

        for index in picked_indexes {
            let mask = FLIP_ARRAY[below(&mut self.rng, FLIP_ARRAY.len())];
            data[index] ^= mask;
        }

        data
    }
}
