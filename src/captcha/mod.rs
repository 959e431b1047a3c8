//! CAPTCHA session issuance.

pub mod artifacts;
pub mod fetcher;

pub use artifacts::ArtifactWriter;
pub use fetcher::{to_data_uri, CaptchaChallenge, CaptchaFetcher, DATA_URI_PREFIX};
