//! Width arithmetic and byte/word packing.
//!
//! Rows are laid out least-significant byte first. A row of `width` bits
//! occupies [`num_bytes`] bytes on the host side and [`num_words`] 32-bit
//! words on the engine side; bits above `width` are always zero after a
//! conversion in either direction.

/// Bits per engine word.
const WORD_BITS: u32 = 32;

/// Number of bytes needed for one row of `width` bits.
pub const fn num_bytes(width: u32) -> u32 {
    width.div_ceil(8)
}

/// Number of 32-bit words needed for one row of `width` bits.
pub const fn num_words(width: u32) -> u32 {
    width.div_ceil(WORD_BITS)
}

/// Returns the valid-bit mask for word `word` of a row that is `width` bits wide.
pub const fn word_mask(width: u32, word: u32) -> u32 {
    let low = word.saturating_mul(WORD_BITS);
    if width <= low {
        0
    } else if width - low >= WORD_BITS {
        u32::MAX
    } else {
        (1u32 << (width - low)) - 1
    }
}

/// Packs `rows` byte rows into engine words, masking every word to `width`.
///
/// `src` holds `rows * num_bytes(width)` bytes. Missing trailing rows are
/// left zero; the caller is expected to have checked the length.
pub fn bytes_to_words(src: &[u8], width: u32, rows: usize) -> Vec<u32> {
    if width == 0 {
        return Vec::new();
    }
    let bytes_per_row = num_bytes(width) as usize;
    let words_per_row = num_words(width) as usize;
    let mut out = vec![0u32; words_per_row * rows];

    for (row, chunk) in src.chunks_exact(bytes_per_row).take(rows).enumerate() {
        let dst = &mut out[row * words_per_row..(row + 1) * words_per_row];
        for (i, &byte) in chunk.iter().enumerate() {
            dst[i / 4] |= u32::from(byte) << ((i % 4) * 8);
        }
        for (w, word) in dst.iter_mut().enumerate() {
            *word &= word_mask(width, w as u32);
        }
    }
    out
}

/// Unpacks `rows` rows of engine words into bytes, masking to `width` first.
pub fn words_to_bytes(src: &[u32], width: u32, rows: usize) -> Vec<u8> {
    if width == 0 {
        return Vec::new();
    }
    let bytes_per_row = num_bytes(width) as usize;
    let words_per_row = num_words(width) as usize;
    let mut out = Vec::with_capacity(bytes_per_row * rows);

    for row in src.chunks_exact(words_per_row).take(rows) {
        for i in 0..bytes_per_row {
            let word = row[i / 4] & word_mask(width, (i / 4) as u32);
            out.push((word >> ((i % 4) * 8)) as u8);
        }
    }
    out
}
