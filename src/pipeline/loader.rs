use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use encoding_rs::{DecoderResult, Encoding};

use crate::config::ColumnConfig;
use crate::error::{Result, ScanError};
use crate::models::RawRecord;

/// Resolve a WHATWG encoding label (`windows-1252`, `latin1`, `utf-8`, ...).
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| ScanError::UnknownEncoding(label.to_string()))
}

/// Read and decode `path`, then parse it into records.
pub fn load_file(
    path: &Path,
    encoding: &'static Encoding,
    delimiter: u8,
    columns: &ColumnConfig,
) -> Result<Vec<RawRecord>> {
    let bytes = std::fs::read(path)?;
    let text = decode(&bytes, encoding)?;
    parse_records(&text, delimiter, columns)
}

/// Strictly decode `bytes`; any malformed sequence is a [`ScanError::Decoding`].
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let capacity = decoder
        .max_utf8_buffer_length_without_replacement(bytes.len())
        .unwrap_or(bytes.len().saturating_mul(3));
    let mut text = String::with_capacity(capacity);
    let mut consumed = 0;

    loop {
        let (result, read) =
            decoder.decode_to_string_without_replacement(&bytes[consumed..], &mut text, true);
        consumed += read;
        match result {
            DecoderResult::InputEmpty => return Ok(text),
            DecoderResult::OutputFull => text.reserve(bytes.len() - consumed + 16),
            DecoderResult::Malformed(bad, after) => {
                return Err(ScanError::Decoding {
                    encoding: encoding.name(),
                    offset: consumed.saturating_sub(bad as usize + after as usize),
                });
            }
        }
    }
}

/// Parse decoded text into records in source order. Short rows are padded with
/// empty fields; a missing required header column is a [`ScanError::Schema`].
pub fn parse_records(text: &str, delimiter: u8, columns: &ColumnConfig) -> Result<Vec<RawRecord>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let index = ColumnIndex::resolve(&headers, columns)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        records.push(index.extract(&row));
    }

    tracing::debug!(rows = records.len(), "parsed input rows");
    Ok(records)
}

/// Positions of the required columns within a header row.
struct ColumnIndex {
    id: usize,
    name: usize,
    price: usize,
    reviews: usize,
    rating: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord, columns: &ColumnConfig) -> Result<Self> {
        let find = |wanted: &str| {
            headers.iter().position(|h| {
                h.trim_start_matches('\u{feff}')
                    .trim()
                    .eq_ignore_ascii_case(wanted.trim())
            })
        };

        let mut missing = Vec::new();
        let mut locate = |wanted: &String| {
            find(wanted.as_str()).unwrap_or_else(|| {
                missing.push(wanted.clone());
                0
            })
        };

        let index = ColumnIndex {
            id: locate(&columns.id),
            name: locate(&columns.name),
            price: locate(&columns.price),
            reviews: locate(&columns.reviews),
            rating: locate(&columns.rating),
        };

        if !missing.is_empty() {
            return Err(ScanError::Schema { missing });
        }
        Ok(index)
    }

    fn extract(&self, row: &StringRecord) -> RawRecord {
        let field = |i: usize| row.get(i).unwrap_or("").to_string();
        RawRecord {
            id: field(self.id),
            name: field(self.name),
            price_raw: field(self.price),
            reviews_raw: field(self.reviews),
            rating_raw: field(self.rating),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,product_name,price,reviews_count,avg_rate\n";

    fn columns() -> ColumnConfig {
        ColumnConfig::default()
    }

    #[test]
    fn test_parse_preserves_order_and_raw_text() {
        let text = format!(
            "{}1,NIVEA Spray,EGP 99.00,554 verified ratings,4.4/5\n2,\"Lamp, Desk\",\"EGP 1,299.00\",,\n",
            HEADER
        );
        let records = parse_records(&text, b',', &columns()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "1");
        assert_eq!(records[0].reviews_raw, "554 verified ratings");
        assert_eq!(records[0].rating_raw, "4.4/5");
        assert_eq!(records[1].name, "Lamp, Desk");
        assert_eq!(records[1].price_raw, "EGP 1,299.00");
        assert_eq!(records[1].reviews_raw, "");
    }

    #[test]
    fn test_columns_in_any_order_with_extras() {
        let text = "avg_rate;sku;Product_Name ;price;id;reviews_count\n3/5;X1;Kettle;EGP 10;7;12\n";
        let records = parse_records(text, b';', &columns()).unwrap();
        assert_eq!(
            records[0],
            RawRecord {
                id: "7".to_string(),
                name: "Kettle".to_string(),
                price_raw: "EGP 10".to_string(),
                reviews_raw: "12".to_string(),
                rating_raw: "3/5".to_string(),
            }
        );
    }

    #[test]
    fn test_short_row_is_padded() {
        let text = format!("{}9,Mug\n", HEADER);
        let records = parse_records(&text, b',', &columns()).unwrap();
        assert_eq!(records[0].name, "Mug");
        assert_eq!(records[0].price_raw, "");
        assert_eq!(records[0].rating_raw, "");
    }

    #[test]
    fn test_missing_columns_is_schema_error() {
        let text = "id,product_name,price\n1,Mug,EGP 5\n";
        match parse_records(text, b',', &columns()) {
            Err(ScanError::Schema { missing }) => {
                assert_eq!(missing, vec!["reviews_count", "avg_rate"]);
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_bom_on_first_header() {
        let text = format!("\u{feff}{}1,Mug,EGP 5,1,1/5\n", HEADER);
        let records = parse_records(&text, b',', &columns()).unwrap();
        assert_eq!(records[0].id, "1");
    }

    #[test]
    fn test_decode_windows_1252() {
        let encoding = resolve_encoding("latin1").unwrap();
        // 0xE9 is 'é' in windows-1252
        let text = decode(b"Cr\xe8me br\xfbl\xe9e", encoding).unwrap();
        assert_eq!(text, "Crème brûlée");
    }

    #[test]
    fn test_decode_malformed_is_error() {
        let encoding = resolve_encoding("utf-8").unwrap();
        match decode(b"ok\xffno", encoding) {
            Err(ScanError::Decoding { encoding, offset }) => {
                assert_eq!(encoding, "UTF-8");
                assert!(offset <= 3);
            }
            other => panic!("expected decoding error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_encoding_label() {
        assert!(matches!(
            resolve_encoding("klingon-8"),
            Err(ScanError::UnknownEncoding(_))
        ));
    }

    #[test]
    fn test_load_file_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        let mut bytes = HEADER.as_bytes().to_vec();
        bytes.extend_from_slice(b"1,Caf\xe9 Mug,EGP 50,3 ratings,4/5\n");
        std::fs::write(&path, bytes).unwrap();

        let encoding = resolve_encoding("windows-1252").unwrap();
        let records = load_file(&path, encoding, b',', &columns()).unwrap();
        assert_eq!(records[0].name, "Café Mug");
    }
}
