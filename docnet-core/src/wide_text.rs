//! Two-phase text retrieval and UTF-16LE decoding.
//!
//! Engine text accessors are called twice: once with an empty buffer to
//! learn the size in bytes (terminator included), then with a buffer of that
//! size. Two decoding policies exist and are used by different accessors:
//!
//! - [`read_sized`] (metadata): a size of 2 bytes or less means empty, and the
//!   last 2 bytes are excluded from decoding.
//! - [`read_trimmed`] (bookmark titles): the whole buffer is decoded, then a
//!   single trailing NUL character is stripped if present.

/// Size in bytes of the UTF-16 terminator.
const TERMINATOR_LEN: usize = 2;

/// Length-based retrieval. `fill` is the engine accessor.
pub(crate) fn read_sized<F>(mut fill: F, context: &str) -> String
where
    F: FnMut(&mut [u8]) -> usize,
{
    let length = fill(&mut [0u8; 0][..]);
    if length <= TERMINATOR_LEN {
        return String::new();
    }

    let mut buffer = vec![0u8; length];
    fill(buffer.as_mut_slice());

    decode_utf16le(&buffer[..length - TERMINATOR_LEN], context)
}

/// Decode-then-trim retrieval. `fill` is the engine accessor.
pub(crate) fn read_trimmed<F>(mut fill: F, context: &str) -> String
where
    F: FnMut(&mut [u8]) -> usize,
{
    let length = fill(&mut [0u8; 0][..]);
    let mut buffer = vec![0u8; length];
    if length > 0 {
        fill(buffer.as_mut_slice());
    }

    let mut text = decode_utf16le(&buffer, context);
    if text.ends_with('\0') {
        text.pop();
    }
    text
}

/// Decode UTF-16LE bytes.
///
/// Invalid sequences are replaced (lossy) and a trailing odd byte is dropped;
/// both are logged since they indicate a misbehaving engine or document.
pub(crate) fn decode_utf16le(bytes: &[u8], context: &str) -> String {
    if bytes.len() % 2 != 0 {
        log::warn!(
            "UTF-16 buffer size is odd ({} bytes) in {context}, dropping last byte",
            bytes.len()
        );
    }

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    match String::from_utf16(&units) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("Invalid UTF-16 sequence in {context}: {e} - using lossy conversion");
            String::from_utf16_lossy(&units)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn utf16le(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    /// Behaves like an engine accessor that owns `payload`.
    fn accessor(payload: Vec<u8>) -> (impl FnMut(&mut [u8]) -> usize, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let fill = move |buf: &mut [u8]| {
            counter.set(counter.get() + 1);
            if buf.len() >= payload.len() {
                buf[..payload.len()].copy_from_slice(&payload);
            }
            payload.len()
        };
        (fill, calls)
    }

    #[test]
    fn test_sized_strips_terminator() {
        let mut payload = utf16le("PDF - Wikipedia");
        payload.extend_from_slice(&[0, 0]);
        let (fill, calls) = accessor(payload);

        assert_eq!(read_sized(fill, "Title"), "PDF - Wikipedia");
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_sized_terminator_only_skips_second_call() {
        let (fill, calls) = accessor(vec![0, 0]);
        assert_eq!(read_sized(fill, "Title"), "");
        assert_eq!(calls.get(), 1);

        let (fill, calls) = accessor(Vec::new());
        assert_eq!(read_sized(fill, "Title"), "");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_sized_non_ascii() {
        let mut payload = utf16le("Gödel, Escher, Bach: 日本語");
        payload.extend_from_slice(&[0, 0]);
        let (fill, _) = accessor(payload);
        assert_eq!(read_sized(fill, "Subject"), "Gödel, Escher, Bach: 日本語");
    }

    #[test]
    fn test_trimmed_strips_single_nul() {
        let mut payload = utf16le("Template");
        payload.extend_from_slice(&[0, 0]);
        let (fill, calls) = accessor(payload);
        assert_eq!(read_trimmed(fill, "bookmark title"), "Template");
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_trimmed_strips_only_one_nul() {
        let mut payload = utf16le("A");
        payload.extend_from_slice(&[0, 0, 0, 0]);
        let (fill, _) = accessor(payload);
        assert_eq!(read_trimmed(fill, "bookmark title"), "A\0");
    }

    #[test]
    fn test_trimmed_without_terminator() {
        let (fill, _) = accessor(utf16le("No terminator"));
        assert_eq!(read_trimmed(fill, "bookmark title"), "No terminator");
    }

    #[test]
    fn test_trimmed_empty() {
        let (fill, calls) = accessor(Vec::new());
        assert_eq!(read_trimmed(fill, "bookmark title"), "");
        assert_eq!(calls.get(), 1);

        let (fill, _) = accessor(vec![0, 0]);
        assert_eq!(read_trimmed(fill, "bookmark title"), "");
    }

    #[test]
    fn test_decode_odd_length_drops_last_byte() {
        let mut bytes = utf16le("ab");
        bytes.push(0x41);
        assert_eq!(decode_utf16le(&bytes, "test"), "ab");
    }

    #[test]
    fn test_decode_lone_surrogate_is_lossy() {
        let bytes = [0x00, 0xD8, 0x41, 0x00];
        assert_eq!(decode_utf16le(&bytes, "test"), "\u{FFFD}A");
    }
}
