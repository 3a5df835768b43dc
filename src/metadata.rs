//! Plain-text frequency header.
//!
//! The header is the only persisted form of the tree: `"<symbol> <count>"`
//! pairs for every nonzero count, ascending by symbol, single spaces between
//! tokens and nothing after the last one. The decoder rebuilds the identical
//! tree from it.

use crate::error::{HuffmanError, Result};
use crate::frequency::{FrequencyTable, ALPHABET_SIZE};

pub fn serialize_header(frequencies: &FrequencyTable) -> String {
    frequencies
        .present()
        .map(|(symbol, count)| format!("{symbol} {count}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rebuild a frequency table from header text. Any whitespace separates
/// tokens; symbols that are never mentioned stay at zero.
pub fn parse_header(header: &str) -> Result<FrequencyTable> {
    let tokens: Vec<&str> = header.split_whitespace().collect();
    if tokens.len() % 2 != 0 {
        return Err(HuffmanError::header(format!(
            "expected symbol/count pairs, found {} tokens",
            tokens.len()
        )));
    }

    let mut table = FrequencyTable::empty();
    let mut seen = [false; ALPHABET_SIZE];
    for pair in tokens.chunks_exact(2) {
        let symbol = parse_token(pair[0])?;
        let count = parse_token(pair[1])?;
        let symbol = u8::try_from(symbol)
            .map_err(|_| HuffmanError::header(format!("symbol {symbol} is out of range")))?;
        if std::mem::replace(&mut seen[symbol as usize], true) {
            return Err(HuffmanError::header(format!("symbol {symbol} appears twice")));
        }
        table.set(symbol, count);
    }

    if table.total().is_none() {
        return Err(HuffmanError::header("symbol counts overflow"));
    }
    Ok(table)
}

fn parse_token(token: &str) -> Result<usize> {
    token
        .parse()
        .map_err(|e| HuffmanError::header(format!("bad token {token:?}: {e}")))
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::frequency::SENTINEL;

    #[test]
    fn serializes_present_symbols_in_order() {
        let table = FrequencyTable::from_bytes(b"aaabbbbcc");
        assert_eq!(serialize_header(&table), "0 1 97 3 98 4 99 2");
    }

    #[test]
    fn sentinel_only_header() {
        assert_eq!(serialize_header(&FrequencyTable::from_bytes(b"")), "0 1");
    }

    #[test]
    fn parse_restores_table() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..30 {
            let mut table = FrequencyTable::empty();
            table.set(SENTINEL, 1);
            for _ in 0..rng.gen_range(0..60) {
                table.set(rng.gen_range(1..=u8::MAX), rng.gen_range(1..100_000));
            }
            assert_eq!(parse_header(&serialize_header(&table)).unwrap(), table);
        }
    }

    #[test]
    fn parse_tolerates_extra_whitespace() {
        let table = parse_header("  0 1\t97 3 \n").unwrap();
        assert_eq!(table.get(0), 1);
        assert_eq!(table.get(b'a'), 3);
        assert_eq!(table.total(), Some(4));
    }

    #[test]
    fn rejects_odd_token_count() {
        let err = parse_header("0 1 97").unwrap_err();
        assert!(matches!(err, HuffmanError::HeaderFormat(_)));
    }

    #[test]
    fn rejects_non_integer_tokens() {
        assert!(matches!(
            parse_header("0 1 a 3"),
            Err(HuffmanError::HeaderFormat(_))
        ));
        assert!(matches!(
            parse_header("0 -1"),
            Err(HuffmanError::HeaderFormat(_))
        ));
    }

    #[test]
    fn rejects_repeated_symbol() {
        assert!(matches!(
            parse_header("0 1 97 3 97 5"),
            Err(HuffmanError::HeaderFormat(_))
        ));
    }

    #[test]
    fn rejects_counts_that_overflow() {
        let header = format!("0 1 97 {} 98 {}", usize::MAX, usize::MAX);
        assert!(matches!(
            parse_header(&header),
            Err(HuffmanError::HeaderFormat(_))
        ));
        assert!(parse_header(&format!("97 {}", usize::MAX)).is_ok());
    }

    #[test]
    fn rejects_out_of_range_symbol() {
        assert!(matches!(
            parse_header("0 1 256 4"),
            Err(HuffmanError::HeaderFormat(_))
        ));
    }
}
