use thiserror::Error;

/// Errors that can occur when fetching a source image over HTTP
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The supplied URL could not be parsed or uses an unsupported scheme
    #[error("Invalid image URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Network or connection error before a response was received
    #[error("Request failed for '{url}': {message}")]
    Request { url: String, message: String },

    /// The remote server answered with a non-success status
    #[error("Remote server returned {status} for '{url}'")]
    Status { url: String, status: u16 },

    /// The response body could not be read to completion
    #[error("Failed to read response body from '{url}': {message}")]
    Body { url: String, message: String },
}

/// Errors related to decoding source images and encoding JPEG output
#[derive(Debug, Clone, Error)]
pub enum EncodeError {
    /// The source bytes are not a decodable image
    #[error("Failed to decode source image: {message}")]
    Decode { message: String },

    /// JPEG encoding failed
    #[error("Failed to encode JPEG at quality {quality}: {message}")]
    Encode { quality: u8, message: String },
}

/// Errors that can occur when publishing the compressed image
#[derive(Debug, Clone, Error)]
pub enum UploadError {
    /// Network or connection error talking to the asset host
    #[error("Upload transport error: {message}")]
    Transport { message: String },

    /// The asset host rejected the upload
    #[error("Upload rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The asset host answered with a body we could not interpret
    #[error("Invalid upload response: {message}")]
    InvalidResponse { message: String },
}
