//! Program image loading.
//!
//! Programs reach the harness as flat little-endian binaries. The raw
//! image is staged in the caller's arena (matching the fixed-memory
//! contract of the targets being measured), then packed into the
//! address-aligned 32-bit words the memory stub serves on the instruction
//! port.

use std::fs;
use std::path::Path;

use crate::common::HarnessError;
use crate::mem::StaticArena;

/// Packs little-endian bytes into instruction words, zero-padding a
/// trailing partial word.
pub fn words_from_bytes(data: &[u8]) -> Vec<u32> {
    let mut words = Vec::with_capacity(data.len().div_ceil(4));
    let mut chunks = data.chunks_exact(4);
    for chunk in chunks.by_ref() {
        words.push(u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    let rem = chunks.remainder();
    if !rem.is_empty() {
        let mut last = [0u8; 4];
        last[..rem.len()].copy_from_slice(rem);
        words.push(u32::from_le_bytes(last));
    }
    words
}

/// Loads a flat binary program image from disk, staging the raw bytes in
/// `arena` before packing.
pub fn load_program<P: AsRef<Path>>(
    path: P,
    arena: &mut StaticArena,
) -> Result<Vec<u32>, HarnessError> {
    let path = path.as_ref();
    let data =
        fs::read(path).map_err(|e| HarnessError::Load(format!("{}: {}", path.display(), e)))?;
    if data.is_empty() {
        return Err(HarnessError::Load(format!(
            "{}: empty image",
            path.display()
        )));
    }
    let slice = arena.alloc(data.len()).ok_or_else(|| {
        HarnessError::Load(format!(
            "{}: image of {} bytes exceeds arena capacity of {} bytes",
            path.display(),
            data.len(),
            arena.capacity()
        ))
    })?;
    arena.get_mut(slice).copy_from_slice(&data);
    Ok(words_from_bytes(arena.get(slice)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_words_little_endian() {
        let words = words_from_bytes(&[0x93, 0x00, 0xA0, 0x02]);
        assert_eq!(words, vec![0x02A0_0093]);
    }

    #[test]
    fn pads_trailing_bytes() {
        let words = words_from_bytes(&[0x01, 0x02, 0x03, 0x04, 0x05]);
        assert_eq!(words, vec![0x0403_0201, 0x0000_0005]);
    }

    #[test]
    fn oversized_image_is_a_load_error() {
        let path = std::env::temp_dir().join(format!("loader_big_{}.bin", std::process::id()));
        fs::write(&path, [0u8; 64]).unwrap();

        let mut arena = StaticArena::new(16);
        let err = load_program(&path, &mut arena);
        assert!(matches!(err, Err(HarnessError::Load(_))));

        // The failed load leaves the arena usable.
        let mut arena = StaticArena::new(64);
        let words = load_program(&path, &mut arena).unwrap();
        assert_eq!(words.len(), 16);

        fs::remove_file(&path).unwrap();
    }
}
