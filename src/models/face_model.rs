use bytes::Bytes;
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct ImageInput {
    pub im_bytes: Bytes,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LivenessOutput {
    pub live: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerificationOutput {
    pub verified: bool,
}

/// `encoding` serializes as `null` when no face was found.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EncodingOutput {
    pub encoding: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchFaceInput {
    pub encodings: Vec<Vec<f64>>,
    pub target: String,
}

/// `index` is -1 when nothing matched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchOutput {
    pub index: i64,
}

impl MatchOutput {
    pub fn no_match() -> Self {
        MatchOutput { index: -1 }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthOutput {
    pub status: &'static str,
}
