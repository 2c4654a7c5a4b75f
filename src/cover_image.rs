//! In-memory cover payloads and MIME inference.

const PNG_SIGNATURE: [u8; 4] = [0x89, b'P', b'N', b'G'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverMime {
    Png,
    Jpeg,
}

impl CoverMime {
    /// PNG when the payload starts with the PNG signature, JPEG otherwise.
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(&PNG_SIGNATURE) {
            Self::Png
        } else {
            Self::Jpeg
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// Downloaded cover bytes, held only while one directory is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    data: Vec<u8>,
    mime: CoverMime,
}

impl CoverImage {
    pub fn new(data: Vec<u8>) -> Self {
        let mime = CoverMime::sniff(&data);
        Self { data, mime }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn mime(&self) -> CoverMime {
        self.mime
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
