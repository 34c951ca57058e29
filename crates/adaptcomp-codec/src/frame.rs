//! Framed container: `[magic "ACMP"][variant id][payload]`

use adaptcomp_types::{AlgorithmVariant, Error, Result};

/// Container magic bytes
pub const MAGIC: &[u8; 4] = b"ACMP";

/// Header length in bytes
pub const HEADER_LEN: usize = MAGIC.len() + 1;

/// Wrap a codec payload with the container header
pub fn pack(variant: AlgorithmVariant, payload: &[u8]) -> Vec<u8> {
    let mut framed = Vec::with_capacity(HEADER_LEN + payload.len());
    framed.extend_from_slice(MAGIC);
    framed.push(variant.id());
    framed.extend_from_slice(payload);
    framed
}

/// Split a container into its variant and payload
pub fn unpack(data: &[u8]) -> Result<(AlgorithmVariant, &[u8])> {
    if data.len() < HEADER_LEN {
        return Err(Error::frame(format!(
            "Container too short: {} bytes, header needs {}",
            data.len(),
            HEADER_LEN
        )));
    }

    let (header, payload) = data.split_at(HEADER_LEN);
    if &header[..MAGIC.len()] != MAGIC {
        return Err(Error::frame("Missing ACMP magic"));
    }

    let id = header[MAGIC.len()];
    let variant = AlgorithmVariant::from_id(id)
        .ok_or_else(|| Error::frame(format!("Unknown algorithm id: {}", id)))?;

    Ok((variant, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack() {
        let framed = pack(AlgorithmVariant::Brotli, b"payload");
        assert_eq!(&framed[..4], MAGIC);

        let (variant, payload) = unpack(&framed).unwrap();
        assert_eq!(variant, AlgorithmVariant::Brotli);
        assert_eq!(payload, b"payload");
    }

    #[test]
    fn test_empty_payload() {
        let framed = pack(AlgorithmVariant::Gzip, b"");
        assert_eq!(framed.len(), HEADER_LEN);
        assert_eq!(unpack(&framed).unwrap().1, b"");
    }

    #[test]
    fn test_rejects_bad_headers() {
        assert!(unpack(b"ACM").is_err());
        assert!(unpack(b"ZZZZ\x01data").is_err());

        let error = unpack(b"ACMP\xFFdata").unwrap_err();
        assert_eq!(error.kind(), adaptcomp_types::ErrorKind::Frame);
    }
}
