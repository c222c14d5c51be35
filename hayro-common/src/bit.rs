//! Reading and writing packed big-endian bit streams.
//!
//! Mesh-based shadings store their vertex data as a sequence of unsigned integers
//! with arbitrary bit widths (between 1 and 32), packed most significant bit first.

use core::fmt;

/// The width of a packed sample, guaranteed to be between 1 and 32 bits.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct BitSize(u8);

impl BitSize {
    /// A single bit.
    pub const ONE: Self = Self(1);
    /// A full byte.
    pub const EIGHT: Self = Self(8);

    /// Create a new bit size. Returns `None` unless `bits` is in `1..=32`.
    #[inline]
    pub fn from_u8(bits: u8) -> Option<Self> {
        (1..=32).contains(&bits).then_some(Self(bits))
    }

    /// The number of bits.
    #[inline]
    pub fn bits(&self) -> u8 {
        self.0
    }

    /// The mask selecting the lower `bits` bits.
    #[inline]
    pub fn mask(&self) -> u32 {
        bit_mask(self.0)
    }

    /// The largest value representable with this many bits, i.e. `2^bits - 1`.
    #[inline]
    pub fn max_value(&self) -> u32 {
        self.mask()
    }
}

impl fmt::Debug for BitSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitSize({})", self.0)
    }
}

/// Get the mask for the given bit size.
#[inline]
pub fn bit_mask(bit_size: u8) -> u32 {
    ((1u64 << bit_size.min(32) as u64) - 1) as u32
}

/// Map a raw sample with the given maximum value linearly into `[range_min, range_max]`.
///
/// A sample of `0` yields exactly `range_min` and a sample of `max_value` yields
/// exactly `range_max`.
#[inline]
pub fn interpolate(value: u32, max_value: u32, range_min: f64, range_max: f64) -> f64 {
    if value == 0 || max_value == 0 {
        return range_min;
    }

    if value >= max_value {
        return range_max;
    }

    range_min + value as f64 * (range_max - range_min) / max_value as f64
}

/// A bit reader.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    cur_pos: usize,
}

impl<'a> BitReader<'a> {
    /// Create a new bit reader.
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, cur_pos: 0 }
    }

    /// Align the reader to the next byte boundary.
    ///
    /// Does nothing if the reader already is at a byte boundary.
    #[inline]
    pub fn align(&mut self) {
        let bit_pos = self.bit_pos();

        if bit_pos != 0 {
            self.cur_pos += 8 - bit_pos;
        }
    }

    /// Read the next sample with the given width.
    ///
    /// Returns `None` if fewer than `bit_size` bits are left. In that case, the
    /// position of the reader stays unchanged.
    #[inline]
    pub fn read(&mut self, bit_size: BitSize) -> Option<u32> {
        let bits = bit_size.bits() as usize;

        if self.cur_pos + bits > self.data.len() * 8 {
            return None;
        }

        let byte_pos = self.byte_pos();
        let bit_pos = self.bit_pos();
        let end_byte_pos = (bit_pos + bits - 1) / 8;
        let mut buf = [0u8; 8];

        for (i, b) in buf.iter_mut().enumerate().take(end_byte_pos + 1) {
            *b = *self.data.get(byte_pos + i)?;
        }

        let item = (u64::from_be_bytes(buf) >> (64 - bit_pos - bits)) as u32 & bit_size.mask();
        self.cur_pos += bits;

        Some(item)
    }

    /// Whether no complete byte is left to read.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.byte_pos() >= self.data.len()
    }

    /// The number of bits that have not been consumed yet.
    #[inline]
    pub fn remaining_bits(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.cur_pos)
    }

    /// Get the current byte position.
    #[inline]
    pub fn byte_pos(&self) -> usize {
        self.cur_pos / 8
    }

    /// Get the current position within the byte.
    #[inline]
    pub fn bit_pos(&self) -> usize {
        self.cur_pos % 8
    }

    /// Get the current position in bits.
    #[inline]
    pub fn cur_pos(&self) -> usize {
        self.cur_pos
    }
}

/// A bit writer that packs samples of varying widths into a growable buffer.
///
/// This is the inverse of [`BitReader`] and is mostly used to assemble
/// mesh streams programmatically.
#[derive(Debug, Default, Clone)]
pub struct BitWriter {
    data: Vec<u8>,
    cur_pos: usize,
}

impl BitWriter {
    /// Create a new, empty bit writer.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the lower `bit_size` bits of `value`, most significant bit first.
    pub fn write(&mut self, value: u32, bit_size: BitSize) {
        let value = value & bit_size.mask();

        for i in (0..bit_size.bits()).rev() {
            let byte_pos = self.cur_pos / 8;

            if byte_pos == self.data.len() {
                self.data.push(0);
            }

            if (value >> i) & 1 == 1 {
                self.data[byte_pos] |= 0x80 >> (self.cur_pos % 8);
            }

            self.cur_pos += 1;
        }
    }

    /// Write multiple numbers with the same width.
    pub fn write_all(&mut self, values: impl IntoIterator<Item = u32>, bit_size: BitSize) {
        for value in values {
            self.write(value, bit_size);
        }
    }

    /// Pad with zero bits up to the next byte boundary.
    #[inline]
    pub fn align(&mut self) {
        let bit_pos = self.cur_pos % 8;

        if bit_pos != 0 {
            self.cur_pos += 8 - bit_pos;
        }
    }

    /// Return the number of written bits, including padding.
    #[inline]
    pub fn cur_pos(&self) -> usize {
        self.cur_pos
    }

    /// Consume the writer and return the written bytes.
    #[inline]
    pub fn finish(self) -> Vec<u8> {
        self.data
    }
}
