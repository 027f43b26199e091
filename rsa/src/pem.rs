//! PEM armor around DER key material.

use crate::RsaError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

fn markers(marker: &str) -> (String, String) {
    (
        format!("-----BEGIN {marker}-----"),
        format!("-----END {marker}-----"),
    )
}

/// Extracts and Base64-decodes the payload between the `marker` lines.
///
/// Anything before the BEGIN line and after the END line is ignored,
/// trailing whitespace and CRLF endings are tolerated, and
/// `Name: Value` header lines inside the body are skipped. A missing
/// or mismatched marker pair is an error.
pub fn load_pem(contents: &[u8], marker: &str) -> Result<Vec<u8>, RsaError> {
    let text = std::str::from_utf8(contents)
        .map_err(|_| RsaError::Codec("PEM content is not valid ASCII".to_string()))?;
    let (pem_start, pem_end) = markers(marker);

    let mut in_pem_part = false;
    let mut seen_pem_start = false;
    let mut seen_pem_end = false;
    let mut payload = String::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line == pem_start {
            if in_pem_part {
                return Err(RsaError::Codec(format!(
                    "seen start marker {pem_start:?} twice"
                )));
            }
            in_pem_part = true;
            seen_pem_start = true;
            continue;
        }

        if !in_pem_part {
            continue;
        }

        if line == pem_end {
            in_pem_part = false;
            seen_pem_end = true;
            break;
        }

        // Explanatory header fields, e.g. "Proc-Type: 4,ENCRYPTED".
        if line.contains(':') {
            continue;
        }

        payload.push_str(line);
    }

    if !seen_pem_start {
        return Err(RsaError::Codec(format!(
            "no PEM start marker {pem_start:?} found"
        )));
    }
    if !seen_pem_end {
        return Err(RsaError::Codec(format!(
            "no PEM end marker {pem_end:?} found"
        )));
    }

    STANDARD
        .decode(payload.as_bytes())
        .map_err(|e| RsaError::Codec(format!("invalid base64 payload: {e}")))
}

/// Wraps DER content in PEM armor: Base64 in 64-column lines between the
/// `marker` pair, with a trailing newline.
pub fn save_pem(contents: &[u8], marker: &str) -> Vec<u8> {
    let (pem_start, pem_end) = markers(marker);
    let b64 = STANDARD.encode(contents);

    let mut out = String::with_capacity(b64.len() + pem_start.len() + pem_end.len() + 16);
    out.push_str(&pem_start);
    out.push('\n');
    for chunk in b64.as_bytes().chunks(64) {
        out.push_str(std::str::from_utf8(chunk).expect("base64 output is ASCII"));
        out.push('\n');
    }
    out.push_str(&pem_end);
    out.push('\n');

    out.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = "RSA PUBLIC KEY";

    #[test]
    fn round_trip() {
        let payload: Vec<u8> = (0u8..=255).collect();
        let pem = save_pem(&payload, MARKER);
        assert_eq!(load_pem(&pem, MARKER).unwrap(), payload);
    }

    #[test]
    fn output_shape() {
        let pem = save_pem(&[0x2a; 100], MARKER);
        let text = String::from_utf8(pem).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.first(), Some(&"-----BEGIN RSA PUBLIC KEY-----"));
        assert_eq!(lines.last(), Some(&"-----END RSA PUBLIC KEY-----"));
        assert!(text.ends_with('\n'));
        for line in &lines[1..lines.len() - 1] {
            assert!(line.len() <= 64);
        }
    }

    #[test]
    fn tolerates_crlf_and_surrounding_noise() {
        let pem = concat!(
            "comment before the key\r\n",
            "-----BEGIN RSA PUBLIC KEY-----\r\n",
            "Proc-Type: 4,ENCRYPTED\r\n",
            "AAECAwQF  \r\n",
            "-----END RSA PUBLIC KEY-----\r\n",
            "comment after the key\r\n",
        );
        assert_eq!(
            load_pem(pem.as_bytes(), MARKER).unwrap(),
            vec![0, 1, 2, 3, 4, 5]
        );
    }

    #[test]
    fn rejects_missing_markers() {
        assert!(load_pem(b"AAECAwQF", MARKER).is_err());

        let no_end = "-----BEGIN RSA PUBLIC KEY-----\nAAECAwQF\n";
        assert!(load_pem(no_end.as_bytes(), MARKER).is_err());

        // An END line for a different marker does not terminate the body.
        let mismatched = concat!(
            "-----BEGIN RSA PUBLIC KEY-----\n",
            "AAECAwQF\n",
            "-----END RSA PRIVATE KEY-----\n",
        );
        assert!(load_pem(mismatched.as_bytes(), MARKER).is_err());
    }

    #[test]
    fn rejects_duplicate_start() {
        let pem = concat!(
            "-----BEGIN RSA PUBLIC KEY-----\n",
            "-----BEGIN RSA PUBLIC KEY-----\n",
            "AAECAwQF\n",
            "-----END RSA PUBLIC KEY-----\n",
        );
        assert!(load_pem(pem.as_bytes(), MARKER).is_err());
    }

    #[test]
    fn rejects_bad_base64() {
        let pem = concat!(
            "-----BEGIN RSA PUBLIC KEY-----\n",
            "not base64 at all!\n",
            "-----END RSA PUBLIC KEY-----\n",
        );
        assert!(load_pem(pem.as_bytes(), MARKER).is_err());
    }
}
