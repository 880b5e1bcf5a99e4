//! C ABI surface over the caveman bit flippers, loadable from C or through
//! Python's ctypes so foreign harnesses can race all three passes.
//!
//! Every export takes a raw buffer plus its length, mutates the buffer in
//! place and hands the same pointer back so callers can chain them. A null
//! pointer or a buffer too short for the pass comes back untouched.

use std::cell::RefCell;
use std::slice;
use std::time::{SystemTime, UNIX_EPOCH};

use log::warn;
use rand::{seq::SliceRandom, Rng};

use bitflip::{BitFlipper, FLIP_ARRAY, FLIP_RATE, MARGIN};

thread_local! {
    /// Flipper behind `bit_flip_one` and `bit_flip_two`, seeded from the
    /// clock once per thread.
    static FLIPPER: RefCell<BitFlipper> = RefCell::new(BitFlipper::new(clock_seed()));
}

/// Nanoseconds since the epoch. A clock sitting before the epoch seeds
/// zero, which the generator nudges to its fixed fallback.
fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64)
}

/// Standalone rendition of the second caveman pass, driven by `rand`'s
/// thread-local generator instead of the shared flipper. The mask comes
/// first and the index second on each draw.
///
/// # Safety
///
/// `data` must be null or valid for reads and writes of `len` bytes.
#[no_mangle]
pub unsafe extern "C" fn bit_flip(data: *mut u8, len: usize) -> *mut u8 {
    if data.is_null() {
        return data;
    }

    let mut rng = rand::thread_rng();

    let length = match len.checked_sub(MARGIN) {
        Some(length) => length,
        None => {
            warn!("length of data is too small");
            return data;
        }
    };

    let num_of_flips = (length as f64 * FLIP_RATE) as usize;

    let data_slice = slice::from_raw_parts_mut(data, len);

    (0..num_of_flips).for_each(|_| {
        let mask = FLIP_ARRAY.choose(&mut rng).expect("flip table is not empty");
        let data_index = rng.gen_range(0..length);
        data_slice[data_index] ^= mask;
    });

    data
}

/// First caveman pass over a raw buffer: flips sit in `[4, len - 4)` with
/// the bit picked most-significant-first through the textual round trip.
///
/// # Safety
///
/// Same contract as [`bit_flip`].
#[no_mangle]
pub unsafe extern "C" fn bit_flip_one(data: *mut u8, len: usize) -> *mut u8 {
    if data.is_null() {
        return data;
    }
    if len <= 2 * MARGIN {
        warn!("length of data is too small");
        return data;
    }

    let data_slice = slice::from_raw_parts_mut(data, len);
    FLIPPER.with(|flipper| {
        flipper.borrow_mut().flip_v1(data_slice);
    });

    data
}

/// Second caveman pass over a raw buffer: flips sit in `[0, len - 4)` as
/// xor masks, least significant bit first.
///
/// # Safety
///
/// Same contract as [`bit_flip`].
#[no_mangle]
pub unsafe extern "C" fn bit_flip_two(data: *mut u8, len: usize) -> *mut u8 {
    if data.is_null() {
        return data;
    }
    if len < MARGIN {
        warn!("length of data is too small");
        return data;
    }

    let data_slice = slice::from_raw_parts_mut(data, len);
    FLIPPER.with(|flipper| {
        flipper.borrow_mut().flip_v2(data_slice);
    });

    data
}
