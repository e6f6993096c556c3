/// Utility function to convert 16-bit big-endian `Vec<u8>` to `Vec<u16>`
pub fn convert_buf_u8_u16(buf: Vec<u8>) -> Vec<u16> {
    buf.chunks_exact(2)
        .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
        .collect()
}

/// Utility function to convert `&[u16]` to 16-bit big-endian `Vec<u8>`
pub fn convert_buf_u16_u8(buf: &[u16]) -> Vec<u8> {
    let mut buf_u8: Vec<u8> = Vec::with_capacity(buf.len() * 2);

    for sample in buf {
        buf_u8.extend_from_slice(&sample.to_be_bytes());
    }

    buf_u8
}
