use bitvec::prelude::*;

/// Bit sequences are most-significant-bit first within each byte.
pub type Bits = BitVec<u8, Msb0>;

/// Packed bytes plus the number of bits in them that carry data. Bits past
/// `bit_count` in the last byte are padding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackedBitstream {
    bytes: Vec<u8>,
    bit_count: usize,
}

impl PackedBitstream {
    pub fn from_parts(bytes: Vec<u8>, bit_count: usize) -> Self {
        PackedBitstream { bytes, bit_count }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    pub fn padding_bits(&self) -> usize {
        (self.bytes.len() * 8).saturating_sub(self.bit_count)
    }

    pub fn into_parts(self) -> (Vec<u8>, usize) {
        (self.bytes, self.bit_count)
    }
}

#[derive(Default, Debug)]
pub struct BitWriter {
    bits: Bits,
}

impl BitWriter {
    pub fn new() -> Self {
        BitWriter { bits: Bits::new() }
    }

    pub fn with_capacity(bits: usize) -> Self {
        BitWriter {
            bits: Bits::with_capacity(bits),
        }
    }

    pub fn write(&mut self, code: &BitSlice<u8, Msb0>) {
        self.bits.extend_from_bitslice(code);
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Zeroes the padding and hands back the packed buffer.
    pub fn finish(mut self) -> PackedBitstream {
        let bit_count = self.bits.len();
        self.bits.set_uninitialized(false);
        PackedBitstream {
            bytes: self.bits.into_vec(),
            bit_count,
        }
    }
}

/// Reads bits up to the valid-bit count, never into the padding.
pub struct BitReader<'a> {
    bits: &'a BitSlice<u8, Msb0>,
    index: usize,
}

impl<'a> BitReader<'a> {
    /// Returns `None` when `bit_count` is larger than `bytes` can hold.
    pub fn new(bytes: &'a [u8], bit_count: usize) -> Option<Self> {
        let bits = BitSlice::<u8, Msb0>::from_slice(bytes).get(..bit_count)?;
        Some(BitReader { bits, index: 0 })
    }

    pub fn read(&mut self) -> Option<bool> {
        let bit = self.bits.get(self.index).map(|bit| *bit)?;
        self.index += 1;
        Some(bit)
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn remaining(&self) -> usize {
        self.bits.len() - self.index
    }
}

#[cfg(test)]
mod tests {
    use bitvec::prelude::*;

    use super::{BitReader, BitWriter, PackedBitstream};

    #[test]
    fn can_read_from_one_byte() {
        let s: [u8; 1] = [0b10101101];
        let mut reader = BitReader::new(&s, 8).unwrap();

        for expected in [true, false, true, false, true, true, false, true] {
            assert_eq!(reader.read(), Some(expected));
        }
        assert_eq!(reader.read(), None);
    }

    #[test]
    fn can_read_from_more_bytes() {
        let s: [u8; 2] = [0b10101101, 0b01010101];
        let mut reader = BitReader::new(&s, 16).unwrap();

        // read first byte
        for _ in 0..8 {
            reader.read().unwrap();
        }

        for expected in [false, true, false, true, false, true, false, true] {
            assert_eq!(reader.read(), Some(expected));
        }
        assert_eq!(reader.position(), 16);
    }

    #[test]
    fn reader_stops_before_padding() {
        let s: [u8; 1] = [0b1111_1111];
        let mut reader = BitReader::new(&s, 3).unwrap();
        assert_eq!(reader.remaining(), 3);
        assert_eq!(reader.read(), Some(true));
        assert_eq!(reader.read(), Some(true));
        assert_eq!(reader.read(), Some(true));
        assert_eq!(reader.read(), None);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn reader_rejects_oversized_bit_count() {
        assert!(BitReader::new(&[0u8; 2], 17).is_none());
        assert!(BitReader::new(&[], 0).is_some());
    }

    #[test]
    fn writer_packs_msb_first_with_zero_padding() {
        let mut writer = BitWriter::new();
        writer.write(bits![u8, Msb0; 1, 0, 1]);
        writer.write(bits![u8, Msb0; 1, 1, 1, 1, 0, 0, 1]);
        assert_eq!(writer.len(), 10);

        let packed = writer.finish();
        assert_eq!(packed.bytes(), &[0b1011_1110, 0b0100_0000]);
        assert_eq!(packed.bit_count(), 10);
        assert_eq!(packed.padding_bits(), 6);
    }

    #[test]
    fn empty_writer_yields_empty_stream() {
        let writer = BitWriter::new();
        assert!(writer.is_empty());
        assert_eq!(writer.finish(), PackedBitstream::default());
    }

    #[test]
    fn parts_round_trip() {
        let stream = PackedBitstream::from_parts(vec![0xAB, 0xC0], 10);
        assert_eq!(stream.padding_bits(), 6);
        assert_eq!(stream.into_parts(), (vec![0xAB, 0xC0], 10));
    }
}
