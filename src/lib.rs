//! # rhuff
//!
//! Huffman compression of in-memory symbol sequences.
//!
//! ```rust
//! let input = b"aaabbc";
//! let table = rhuff::build_code(input)?;
//! let packed = rhuff::encode(input, &table)?;
//! let decoded = rhuff::decode(packed.bytes(), packed.bit_count(), &table)?;
//! assert_eq!(decoded, input);
//! # Ok::<(), rhuff::CodecError>(())
//! ```
//!
//! The code table is not part of the packed bitstream. A decoder needs the
//! same table, either handed over directly or rebuilt from the frequency
//! table, which always yields the identical code.

use std::{
    fmt,
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use log::info;

pub mod bitmanipulation;
pub mod code_table;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod frequency;
mod header;
pub mod tree;

pub use bitmanipulation::PackedBitstream;
pub use code_table::CodeTable;
pub use config::Config;
pub use decoder::decode;
pub use encoder::encode;
pub use error::{CodecError, Error};
pub use frequency::FrequencyTable;
pub use tree::{HuffmanTree, TreeNode};

/// One unit of the alphabet being compressed, e.g. `u8` or `char`.
pub trait Symbol: Copy + Ord + fmt::Debug {}

impl<T: Copy + Ord + fmt::Debug> Symbol for T {}

/// Counts, builds the tree and derives its code table.
pub fn build_code<S: Symbol>(input: &[S]) -> Result<CodeTable<S>, CodecError> {
    code_from_frequencies(&FrequencyTable::from_symbols(input)?)
}

pub fn code_from_frequencies<S: Symbol>(
    frequencies: &FrequencyTable<S>,
) -> Result<CodeTable<S>, CodecError> {
    let tree = HuffmanTree::build(frequencies)?;
    Ok(CodeTable::from_tree(&tree))
}

pub struct HuffmanCodec {
    config: Config,
}

impl HuffmanCodec {
    pub fn new(config: Config) -> Self {
        HuffmanCodec { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn frequencies<S: Symbol + Send + Sync>(
        &self,
        input: &[S],
    ) -> Result<FrequencyTable<S>, CodecError> {
        if input.len() >= self.config.parallel_threshold {
            FrequencyTable::par_from_symbols(input, self.config.chunk_size)
        } else {
            FrequencyTable::from_symbols(input)
        }
    }

    pub fn build_code<S: Symbol + Send + Sync>(
        &self,
        input: &[S],
    ) -> Result<CodeTable<S>, CodecError> {
        code_from_frequencies(&self.frequencies(input)?)
    }

    /// Encodes `input` with a code built from it. The frequency table is
    /// returned too, since it is what a standalone decoder rebuilds from.
    pub fn compress(
        &self,
        input: &[u8],
    ) -> Result<(FrequencyTable<u8>, PackedBitstream, CompressionReport), CodecError> {
        let frequencies = self.frequencies(input)?;
        let table = code_from_frequencies(&frequencies)?;
        let packed = encode(input, &table)?;
        let report = CompressionReport::new(&frequencies, &packed);
        Ok((frequencies, packed, report))
    }
}

impl Default for HuffmanCodec {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompressionReport {
    pub original_len: usize,
    pub packed_len: usize,
    pub bit_count: usize,
    pub distinct_symbols: usize,
    pub entropy: f64,
}

impl CompressionReport {
    fn new(frequencies: &FrequencyTable<u8>, packed: &PackedBitstream) -> Self {
        CompressionReport {
            original_len: frequencies.total(),
            packed_len: packed.bytes().len(),
            bit_count: packed.bit_count(),
            distinct_symbols: frequencies.distinct(),
            entropy: frequencies.entropy(),
        }
    }

    /// Packed size over original size.
    pub fn ratio(&self) -> f64 {
        self.packed_len as f64 / self.original_len as f64
    }

    /// Average bits spent per input symbol.
    pub fn mean_code_len(&self) -> f64 {
        self.bit_count as f64 / self.original_len as f64
    }
}

impl fmt::Display for CompressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bytes -> {} bytes ({:.1}%), {} distinct symbols, {:.3} bits/symbol (entropy {:.3})",
            self.original_len,
            self.packed_len,
            self.ratio() * 100.0,
            self.distinct_symbols,
            self.mean_code_len(),
            self.entropy
        )
    }
}

/// Where the frequency table for an artifact is stored.
pub fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut path = artifact.as_os_str().to_owned();
    path.push(".freq");
    PathBuf::from(path)
}

fn write_file<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    write(&mut writer)?;
    writer.flush()
}

/// Compresses `input` into the artifact at `output` and its frequency
/// sidecar next to it. The sidecar is written first and removed again if
/// the artifact cannot be written, so an artifact never exists without it.
pub fn compress(input: &Path, output: &Path, config: &Config) -> Result<CompressionReport, Error> {
    let data = fs::read(input)?;
    let (frequencies, packed, report) = HuffmanCodec::new(config.clone()).compress(&data)?;

    let sidecar = sidecar_path(output);
    write_file(&sidecar, |writer| frequencies.write(writer))?;
    if let Err(e) = write_file(output, |writer| packed.write(writer)) {
        let _ = fs::remove_file(&sidecar);
        return Err(e.into());
    }

    info!("compressed {:?} into {:?}: {}", input, output, report);
    Ok(report)
}

/// Restores the file compressed into `input`. Returns the number of bytes
/// written.
pub fn decompress(input: &Path, output: &Path) -> Result<usize, Error> {
    let packed = PackedBitstream::read(&mut BufReader::new(File::open(input)?))?;
    let frequencies = FrequencyTable::<u8>::read(&mut BufReader::new(File::open(
        sidecar_path(input),
    )?))?;

    let table = code_from_frequencies(&frequencies)?;
    let data = decode(packed.bytes(), packed.bit_count(), &table)?;
    if data.len() != frequencies.total() {
        return Err(CodecError::corrupt(
            packed.bit_count(),
            "decoded symbol count does not match the frequency sidecar",
        )
        .into());
    }

    write_file(output, |writer| writer.write_all(&data))?;

    info!("decompressed {:?} into {:?}: {} bytes", input, output, data.len());
    Ok(data.len())
}

/// Compresses and decompresses `input` in memory and checks the result is
/// identical.
pub fn verify(input: &Path, config: &Config) -> Result<CompressionReport, Error> {
    let data = fs::read(input)?;
    let frequencies = HuffmanCodec::new(config.clone()).frequencies(&data)?;
    let table = code_from_frequencies(&frequencies)?;
    let packed = encode(&data, &table)?;
    let decoded = decode(packed.bytes(), packed.bit_count(), &table)?;

    if let Some(position) = first_mismatch(&data, &decoded) {
        return Err(Error::RoundTripMismatch { position });
    }

    let report = CompressionReport::new(&frequencies, &packed);
    info!("verified {:?}: {}", input, report);
    Ok(report)
}

fn first_mismatch(expected: &[u8], actual: &[u8]) -> Option<usize> {
    expected
        .iter()
        .zip(actual)
        .position(|(a, b)| a != b)
        .or_else(|| (expected.len() != actual.len()).then(|| expected.len().min(actual.len())))
}
