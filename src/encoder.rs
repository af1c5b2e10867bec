use log::debug;

use crate::{
    bitmanipulation::{BitWriter, PackedBitstream},
    code_table::CodeTable,
    error::{CodecError, Result},
    Symbol,
};

/// Concatenates the code of every input symbol, in order, into one packed
/// bitstream.
pub fn encode<S: Symbol>(input: &[S], table: &CodeTable<S>) -> Result<PackedBitstream> {
    let mut writer = BitWriter::with_capacity(input.len());

    for (position, symbol) in input.iter().enumerate() {
        let code = table
            .get(symbol)
            .ok_or_else(|| CodecError::IncompleteCodeTable {
                symbol: format!("{:?}", symbol),
                position,
            })?;
        writer.write(code);
    }

    let packed = writer.finish();
    debug!(
        "encoded {} symbols into {} bits ({} bytes)",
        input.len(),
        packed.bit_count(),
        packed.bytes().len()
    );
    Ok(packed)
}

#[cfg(test)]
mod tests {
    use super::encode;
    use crate::{build_code, CodecError};

    #[test]
    fn packs_codes_in_symbol_order() {
        // a=0 c=10 b=11
        let table = build_code(b"abacba").unwrap();
        let packed = encode(b"abc", &table).unwrap();

        assert_eq!(packed.bit_count(), 5);
        assert_eq!(packed.bytes(), &[0b0111_0000]);
    }

    #[test]
    fn empty_input_encodes_to_nothing() {
        let table = build_code(b"abc").unwrap();
        let packed = encode(&[], &table).unwrap();
        assert_eq!(packed.bit_count(), 0);
        assert!(packed.bytes().is_empty());
    }

    #[test]
    fn skewed_input_packs_to_its_exact_length() {
        // 'a' costs one bit while the rare symbols cost up to eight
        let mut input = vec![b'a'; 10_000];
        input.extend(b"bcdefghi");
        let table = build_code(&input).unwrap();
        assert!(table.max_code_len() > 1);

        let packed = encode(&input, &table).unwrap();
        let rare_bits: usize = b"bcdefghi"
            .iter()
            .map(|s| table.get(s).unwrap().len())
            .sum();
        assert_eq!(packed.bit_count(), 10_000 + rare_bits);
        assert_eq!(packed.bytes().len(), packed.bit_count().div_ceil(8));
    }

    #[test]
    fn missing_symbol_is_reported_with_position() {
        let table = build_code(b"abc").unwrap();
        assert_eq!(
            encode(b"abxc", &table),
            Err(CodecError::IncompleteCodeTable {
                symbol: "120".to_string(),
                position: 2
            })
        );
    }
}
