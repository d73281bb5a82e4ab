use sol_tx::SolError;

/// Lowercase hex, two digits per byte.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

pub fn from_hex(text: &str) -> Result<Vec<u8>, SolError> {
    hex::decode(text).map_err(|e| SolError::InvalidHex(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_digit_bytes_are_zero_padded() {
        assert_eq!(to_hex(&[0x00, 0x01, 0x0a, 0xff]), "00010aff");
    }

    #[test]
    fn empty_input() {
        assert_eq!(to_hex(&[]), "");
        assert_eq!(from_hex("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn round_trip_all_byte_values() {
        let bytes: Vec<u8> = (0..=255u8).collect();
        let text = to_hex(&bytes);
        assert_eq!(text.len(), 512);
        assert_eq!(text, text.to_lowercase());
        assert_eq!(from_hex(&text).unwrap(), bytes);
    }

    #[test]
    fn payload_literal_decodes() {
        assert_eq!(
            from_hex("b712469c946da122").unwrap(),
            vec![0xb7, 0x12, 0x46, 0x9c, 0x94, 0x6d, 0xa1, 0x22]
        );
    }

    #[test]
    fn odd_length_is_rejected() {
        assert!(matches!(from_hex("abc"), Err(SolError::InvalidHex(_))));
    }
}
