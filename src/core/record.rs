use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

/// Column holding the asset identifier.
pub const UID_FIELD: &str = "UID";
/// Column holding the human-readable product name.
pub const PRODUCT_FIELD: &str = "ProductName";
/// Identifier substituted when a record has no usable `UID`.
pub const UNKNOWN_UID: &str = "unknown";

/// One row of the asset sheet, fields kept in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    fields: Vec<(String, String)>,
}

impl AssetRecord {
    pub fn new<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up a field by exact column name. The first column wins on duplicates.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Asset identifier, or [`UNKNOWN_UID`] when the column is absent or blank.
    pub fn uid(&self) -> &str {
        match self.get(UID_FIELD) {
            Some(uid) if !uid.trim().is_empty() => uid,
            _ => UNKNOWN_UID,
        }
    }

    pub fn product_name(&self) -> &str {
        self.get(PRODUCT_FIELD).unwrap_or("")
    }

    /// Text encoded into the code: every field as `key: value`, one per line.
    pub fn payload(&self) -> String {
        self.fields
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Caption printed beneath the code.
    pub fn caption(&self) -> String {
        format!("UID {} | {}", self.uid(), self.product_name())
    }

    /// File-system safe form of [`AssetRecord::uid`] used for output names.
    ///
    /// Path and shell-reserved characters, control characters and `%` itself
    /// become `%XX` per UTF-8 byte, so distinct UIDs keep distinct stems.
    pub fn file_stem(&self) -> String {
        let mut stem = String::with_capacity(self.uid().len());
        for ch in self.uid().chars() {
            match ch {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '%' => escape(ch, &mut stem),
                c if c.is_control() => escape(c, &mut stem),
                c => stem.push(c),
            }
        }
        stem
    }
}

fn escape(ch: char, out: &mut String) {
    let mut buf = [0u8; 4];
    for byte in ch.encode_utf8(&mut buf).bytes() {
        out.push_str(&format!("%{byte:02X}"));
    }
}

/// Read every record from a CSV file with a header row.
pub fn load_records(path: &Path) -> Result<Vec<AssetRecord>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open asset file {}", path.display()))?;
    read_records(file).with_context(|| format!("failed to parse asset file {}", path.display()))
}

/// Parse CSV text into records. Ragged rows and a missing header are errors.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<AssetRecord>> {
    let mut table = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = table
        .headers()
        .context("failed to read header row")?
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            if idx == 0 {
                name.trim_start_matches('\u{feff}').to_string()
            } else {
                name.to_string()
            }
        })
        .collect();
    if headers.is_empty() {
        return Err(anyhow!("missing header row"));
    }

    let mut records = Vec::new();
    for (idx, row) in table.records().enumerate() {
        // header is line 1
        let row = row.with_context(|| format!("malformed record at line {}", idx + 2))?;
        records.push(AssetRecord::new(
            headers.iter().cloned().zip(row.iter().map(str::to_string)),
        ));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(fields: &[(&str, &str)]) -> AssetRecord {
        AssetRecord::new(fields.iter().copied())
    }

    #[test]
    fn payload_keeps_column_order() {
        let rec = record(&[("UID", "A1"), ("ProductName", "Laptop"), ("Location", "HQ")]);
        assert_eq!(rec.payload(), "UID: A1\nProductName: Laptop\nLocation: HQ");
    }

    #[test]
    fn caption_uses_uid_and_product() {
        let rec = record(&[("UID", "A1"), ("ProductName", "Laptop")]);
        assert_eq!(rec.caption(), "UID A1 | Laptop");
    }

    #[test]
    fn missing_uid_becomes_placeholder() {
        let rec = record(&[("ProductName", "Desk")]);
        assert_eq!(rec.uid(), UNKNOWN_UID);
        assert_eq!(rec.caption(), "UID unknown | Desk");
        assert_eq!(rec.file_stem(), "unknown");

        let blank = record(&[("UID", "  "), ("ProductName", "Desk")]);
        assert_eq!(blank.uid(), UNKNOWN_UID);
    }

    #[test]
    fn missing_product_is_empty() {
        let rec = record(&[("UID", "A1")]);
        assert_eq!(rec.product_name(), "");
        assert_eq!(rec.caption(), "UID A1 | ");
    }

    #[test]
    fn file_stem_escapes_path_separators() {
        let rec = record(&[("UID", "../A/1")]);
        assert_eq!(rec.file_stem(), "..%2FA%2F1");
        assert_eq!(record(&[("UID", "C:\\tmp\n")]).file_stem(), "C%3A%5Ctmp%0A");
    }

    #[test]
    fn distinct_uids_keep_distinct_file_stems() {
        let uids = ["A/1", "A_1", "A%2F1", "A:1", "A\u{7f}1", "Ä/1"];
        let stems: Vec<String> = uids
            .iter()
            .map(|&uid| record(&[("UID", uid)]).file_stem())
            .collect();
        assert_eq!(
            stems,
            vec!["A%2F1", "A_1", "A%252F1", "A%3A1", "A%7F1", "Ä%2F1"]
        );
    }

    #[test]
    fn reads_rows_with_extra_columns() {
        let csv = "UID,ProductName,Serial\nA1,Laptop,SN-1\nA2,,SN-2\n";
        let records = read_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].uid(), "A1");
        assert_eq!(records[0].get("Serial"), Some("SN-1"));
        assert_eq!(records[1].product_name(), "");
        assert_eq!(records[1].payload(), "UID: A2\nProductName: \nSerial: SN-2");
    }

    #[test]
    fn quoted_fields_keep_commas_and_newlines() {
        let csv = "UID,ProductName\nA1,\"Desk, oak\nlarge\"\n";
        let records = read_records(csv.as_bytes()).unwrap();
        assert_eq!(records[0].product_name(), "Desk, oak\nlarge");
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let csv = "\u{feff}UID,ProductName\nA1,Laptop\n";
        let records = read_records(csv.as_bytes()).unwrap();
        assert_eq!(records[0].uid(), "A1");
    }

    #[test]
    fn header_only_yields_no_records() {
        let records = read_records("UID,ProductName\n".as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = read_records("".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("missing header row"));
    }

    #[test]
    fn ragged_row_is_rejected() {
        let csv = "UID,ProductName\nA1,Laptop,extra\n";
        let err = read_records(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_records(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.csv"));
    }
}
