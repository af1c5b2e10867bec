use std::io::{self, Read, Write};

use crate::{bitmanipulation::PackedBitstream, frequency::FrequencyTable};

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

/// Stored form: valid-bit count as u64 LE, then exactly the bytes holding
/// those bits.
impl PackedBitstream {
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&(self.bit_count() as u64).to_le_bytes())?;
        writer.write_all(self.bytes())?;
        Ok(())
    }

    pub fn read<R: Read>(reader: &mut R) -> io::Result<PackedBitstream> {
        let mut bit_count_buf = [0; 8];
        reader.read_exact(&mut bit_count_buf)?;
        let bit_count = usize::try_from(u64::from_le_bytes(bit_count_buf))
            .map_err(|_| invalid("bit count does not fit in memory".to_string()))?;

        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        if bytes.len() != bit_count.div_ceil(8) {
            return Err(invalid(format!(
                "{} valid bits need {} bytes, found {}",
                bit_count,
                bit_count.div_ceil(8),
                bytes.len()
            )));
        }
        Ok(PackedBitstream::from_parts(bytes, bit_count))
    }
}

/// Sidecar form: number of distinct symbols as u16 LE, then each symbol in
/// ascending order followed by its count as u64 LE.
impl FrequencyTable<u8> {
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&(self.distinct() as u16).to_le_bytes())?;
        for (symbol, count) in self.iter() {
            writer.write_all(&[symbol])?;
            writer.write_all(&(count as u64).to_le_bytes())?;
        }
        Ok(())
    }

    pub fn read<R: Read>(reader: &mut R) -> io::Result<FrequencyTable<u8>> {
        let mut sizebuf = [0; 2];
        reader.read_exact(&mut sizebuf)?;
        let size = u16::from_le_bytes(sizebuf);
        if size == 0 || size > 256 {
            return Err(invalid(format!("{} is not a valid alphabet size", size)));
        }

        let mut counts = Vec::with_capacity(size as usize);
        let mut buf = [0; 9];
        for _ in 0..size {
            // Read symbol and count
            reader.read_exact(&mut buf)?;
            let symbol = buf[0];
            let mut count_bytes = [0; 8];
            count_bytes.copy_from_slice(&buf[1..]);
            let count = usize::try_from(u64::from_le_bytes(count_bytes))
                .map_err(|_| invalid(format!("count of {} does not fit in memory", symbol)))?;
            counts.push((symbol, count));
        }

        FrequencyTable::from_counts(counts).map_err(|e| invalid(e.to_string()))
    }
}
