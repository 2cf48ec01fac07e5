use super::constants::*;
use endian_writer::{EndianReader, LittleEndianReader};
use texture_preview_pixels::mipmap::full_chain_len;

/// The fields of a DDS header that decoding needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DdsHeader {
    /// `dwSize`; 124 in well formed files
    pub header_size: u32,
    /// `dwFlags`
    pub flags: u32,
    /// Height of the top level in pixels
    pub height: u32,
    /// Width of the top level in pixels
    pub width: u32,
    /// `dwMipMapCount` as stored, whether or not the flag is set
    pub raw_mipmap_count: u32,
    /// `ddspf.dwFlags`
    pub pixel_flags: u32,
    /// `ddspf.dwFourCC`
    pub fourcc: u32,
    /// `ddspf.dwRGBBitCount`
    pub rgb_bit_count: u32,
    /// Red, green, blue and alpha bit masks
    pub masks: [u32; 4],
    /// DXGI format from the DX10 extension header, when present
    pub dxgi_format: Option<u32>,
}

impl DdsHeader {
    /// Offset of the pixel data from the start of the file.
    pub fn data_offset(&self) -> usize {
        match self.dxgi_format {
            Some(_) => DDS_HEADER_SIZE + DX10_HEADER_SIZE,
            None => DDS_HEADER_SIZE,
        }
    }

    /// Number of mip levels stored, at least 1 and at most a full chain for the top level.
    pub fn mipmap_count(&self) -> u32 {
        if (self.flags & DDSD_MIPMAPCOUNT) != 0 {
            self.raw_mipmap_count
                .min(full_chain_len(self.width, self.height))
                .max(1)
        } else {
            1
        }
    }
}

/// Checks the magic and that a full legacy header is present.
#[inline]
pub fn likely_dds(data: &[u8]) -> bool {
    data.len() >= DDS_HEADER_SIZE && data[..4] == DDS_MAGIC.to_le_bytes()
}

/// Attempts to parse the header of a DDS file from the given slice.
///
/// # Return
///
/// `None` if the magic is wrong or the data is too short to hold the headers, including
/// the DX10 extension header when the FOURCC announces one.
#[inline]
pub fn parse_dds(data: &[u8]) -> Option<DdsHeader> {
    if !likely_dds(data) {
        return None;
    }

    // SAFETY: We checked data.len() >= DDS_HEADER_SIZE (128), so every legacy field
    // offset (at most 0x68) + 4 is in bounds.
    let mut reader = unsafe { LittleEndianReader::new(data.as_ptr()) };
    let read = |reader: &mut LittleEndianReader, offset: usize| unsafe {
        reader.read_u32_at(offset as isize)
    };

    let fourcc = read(&mut reader, FOURCC_OFFSET);
    let pixel_flags = read(&mut reader, DDS_PIXELFORMAT_FLAGS_OFFSET);
    let dxgi_format = if (pixel_flags & DDPF_FOURCC) != 0 && fourcc == FOURCC_DX10 {
        // DX10 header present, ensure the data is long enough.
        if data.len() < DDS_HEADER_SIZE + DX10_HEADER_SIZE {
            return None;
        }
        // SAFETY: We checked data.len() >= 148, so DX10_FORMAT_OFFSET (0x80) + 4 is safe.
        Some(read(&mut reader, DX10_FORMAT_OFFSET))
    } else {
        None
    };

    Some(DdsHeader {
        header_size: read(&mut reader, DDS_SIZE_OFFSET),
        flags: read(&mut reader, DDS_FLAGS_OFFSET),
        height: read(&mut reader, DDS_HEIGHT_OFFSET),
        width: read(&mut reader, DDS_WIDTH_OFFSET),
        raw_mipmap_count: read(&mut reader, DDS_MIPMAP_COUNT_OFFSET),
        pixel_flags,
        fourcc,
        rgb_bit_count: read(&mut reader, DDS_PIXELFORMAT_RGBBITCOUNT_OFFSET),
        masks: [
            read(&mut reader, DDS_PIXELFORMAT_RBITMASK_OFFSET),
            read(&mut reader, DDS_PIXELFORMAT_GBITMASK_OFFSET),
            read(&mut reader, DDS_PIXELFORMAT_BBITMASK_OFFSET),
            read(&mut reader, DDS_PIXELFORMAT_ABITMASK_OFFSET),
        ],
        dxgi_format,
    })
}
