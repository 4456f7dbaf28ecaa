use thiserror::Error;

/// Longest locator echoed verbatim in error messages. Data URLs are cut here.
const MAX_LOCATOR_DISPLAY: usize = 64;

/// A hex color code that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("wrong color code: expected 6 or 8 hex digits, got {0}")]
    Length(usize),
    #[error("wrong color code: {found:?} at position {position} is not a lowercase hex digit")]
    Digit { position: usize, found: char },
}

/// Why an image could not be loaded or decoded.
#[derive(Debug, Error)]
pub enum DecodeCause {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("malformed data URI: missing ',' separator")]
    MalformedDataUri,
    #[error("unsupported data URI encoding: only base64 payloads are accepted")]
    UnsupportedDataUriEncoding,
    #[error("unsupported locator scheme `{0}`")]
    UnsupportedScheme(String),
}

/// The host could not load or decode the image behind `locator`.
#[derive(Debug, Error)]
#[error("image load error `{}`: {cause}", abbreviate(.locator))]
pub struct DecodeError {
    pub locator: String,
    #[source]
    pub cause: DecodeCause,
}

impl DecodeError {
    pub fn new(locator: impl Into<String>, cause: impl Into<DecodeCause>) -> Self {
        Self {
            locator: locator.into(),
            cause: cause.into(),
        }
    }
}

/// Crate-wide error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("failed to encode surface: {0}")]
    Encode(#[source] image::ImageError),
    #[error("output surface is {}, expected {}", dims(.actual), dims(.expected))]
    SurfaceSize {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

pub type Result<T> = std::result::Result<T, Error>;

fn dims(&(width, height): &(u32, u32)) -> String {
    format!("{width}x{height}")
}

fn abbreviate(locator: &str) -> String {
    match locator.char_indices().nth(MAX_LOCATOR_DISPLAY) {
        Some((cut, _)) => format!("{}...", &locator[..cut]),
        None => locator.to_string(),
    }
}
