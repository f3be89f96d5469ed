//! Bitmap asset framing
//!
//! Icons and status screens are P4 (binary) PBM files embedded into the
//! firmware image. A PBM carries a three-line ASCII header - magic,
//! comment, dimensions - followed by rows of MSB-first packed pixels,
//! each row padded to a byte boundary. Only the framing is handled here;
//! drawing belongs to the renderer.

/// Errors raised while framing a bitmap asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AssetError {
    /// Not a binary PBM (missing `P4` magic)
    BadMagic,
    /// Header ended before all three lines were seen
    TruncatedHeader,
    /// Dimension line is not two ASCII integers
    BadDimensions,
    /// Pixel data shorter than the declared dimensions require
    Truncated,
}

/// A framed monochrome bitmap borrowing the embedded asset bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitmap<'a> {
    pub width: u32,
    pub height: u32,
    /// MSB-first packed rows, each padded to a byte boundary
    pub data: &'a [u8],
}

impl Bitmap<'_> {
    /// Bytes per packed row
    pub fn stride(&self) -> usize {
        self.width.div_ceil(8) as usize
    }
}

/// Frame a P4 PBM: validate the three-line header and the data length
pub fn parse_pbm(bytes: &[u8]) -> Result<Bitmap<'_>, AssetError> {
    let (magic, rest) = take_line(bytes).ok_or(AssetError::TruncatedHeader)?;
    if magic != b"P4" {
        return Err(AssetError::BadMagic);
    }

    // Second header line is a comment; content is not interpreted
    let (_, rest) = take_line(rest).ok_or(AssetError::TruncatedHeader)?;

    let (dims, data) = take_line(rest).ok_or(AssetError::TruncatedHeader)?;
    let (width, height) = parse_dimensions(dims).ok_or(AssetError::BadDimensions)?;

    let expected = width.div_ceil(8) as usize * height as usize;
    if data.len() < expected {
        return Err(AssetError::Truncated);
    }

    Ok(Bitmap {
        width,
        height,
        data: &data[..expected],
    })
}

/// Split off one `\n`-terminated line, without the terminator
fn take_line(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let pos = bytes.iter().position(|&b| b == b'\n')?;
    Some((&bytes[..pos], &bytes[pos + 1..]))
}

fn parse_dimensions(line: &[u8]) -> Option<(u32, u32)> {
    let text = core::str::from_utf8(line).ok()?;
    let mut parts = text.split_ascii_whitespace();
    let width: u32 = parts.next()?.parse().ok()?;
    let height: u32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || width == 0 || height == 0 {
        return None;
    }
    Some((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_a_minimal_bitmap() {
        // 10x2: two rows of two bytes each
        let bytes = b"P4\n# icon\n10 2\n\xAA\x80\x55\x40";
        let bitmap = parse_pbm(bytes).unwrap();
        assert_eq!((bitmap.width, bitmap.height), (10, 2));
        assert_eq!(bitmap.stride(), 2);
        assert_eq!(bitmap.data, &[0xAA, 0x80, 0x55, 0x40]);
    }

    #[test]
    fn test_trailing_bytes_are_ignored() {
        let bytes = b"P4\n#\n8 1\n\xFF\x00\x00";
        let bitmap = parse_pbm(bytes).unwrap();
        assert_eq!(bitmap.data, &[0xFF]);
    }

    #[test]
    fn test_rejects_wrong_magic() {
        assert_eq!(parse_pbm(b"P1\n#\n8 1\n\xFF"), Err(AssetError::BadMagic));
    }

    #[test]
    fn test_rejects_truncated_header() {
        assert_eq!(parse_pbm(b"P4\n# icon"), Err(AssetError::TruncatedHeader));
    }

    #[test]
    fn test_rejects_bad_dimension_line() {
        assert_eq!(
            parse_pbm(b"P4\n#\neight 1\n\xFF"),
            Err(AssetError::BadDimensions)
        );
    }

    #[test]
    fn test_rejects_short_pixel_data() {
        assert_eq!(parse_pbm(b"P4\n#\n16 2\n\xFF\xFF"), Err(AssetError::Truncated));
    }
}
