//! Response envelope normalization.
//!
//! The store answers some routes with a bare payload and others with the
//! payload wrapped as `{"data": ...}`. Both shapes collapse into the payload
//! here so no call site has to branch on shape.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub(super) fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

/// Decodes a response body in either envelope shape.
pub(super) fn decode<T>(body: &[u8]) -> Result<T, serde_json::Error>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_slice::<Envelope<T>>(body).map(Envelope::into_inner)
}
