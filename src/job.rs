//! JSON job format for evaluating one multi-multiplication from the CLI.
//!
//! ```json
//! { "scalars": ["<64 hex>", ...], "points": ["<64 hex>", ...] }
//! ```
//!
//! Scalars are canonical 32-byte little-endian encodings. Points are
//! compressed Ristretto encodings; all-zero bytes encode the identity.

use core::fmt;

use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use serde_json::{Value, json};

use crate::multimul::{MAX_TERMS, ReductionStats, multi_mul_batched_with_stats, multi_mul_with_stats};

/// Errors raised while decoding a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    Json(String),
    MissingField(&'static str),
    NotAString { field: &'static str, index: usize },
    Hex { field: &'static str, index: usize, reason: String },
    Length { field: &'static str, index: usize, length: usize },
    NonCanonicalScalar { index: usize },
    InvalidPoint { index: usize },
    LengthMismatch { scalars: usize, points: usize },
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::JobError::*;
        match self {
            Json(reason) => write!(f, "invalid job JSON: {reason}"),
            MissingField(field) => write!(f, "job is missing the '{field}' array"),
            NotAString { field, index } => write!(f, "{field}[{index}] must be a hex string"),
            Hex { field, index, reason } => write!(f, "{field}[{index}] is not valid hex: {reason}"),
            Length { field, index, length } => {
                write!(f, "{field}[{index}] must be 32 bytes, got {length}")
            }
            NonCanonicalScalar { index } => {
                write!(f, "scalars[{index}] is not reduced modulo the group order")
            }
            InvalidPoint { index } => write!(f, "points[{index}] is not a valid Ristretto encoding"),
            LengthMismatch { scalars, points } => {
                write!(f, "job has {scalars} scalars but {points} points")
            }
        }
    }
}

impl std::error::Error for JobError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub scalars: Vec<Scalar>,
    pub points: Vec<RistrettoPoint>,
}

/// Result of evaluating a [`Job`].
#[derive(Debug, Clone, Copy)]
pub struct JobOutcome {
    pub result: RistrettoPoint,
    pub stats: ReductionStats,
    pub batched: bool,
}

impl Job {
    pub fn from_json(text: &str) -> Result<Self, JobError> {
        let value: Value = serde_json::from_str(text).map_err(|e| JobError::Json(e.to_string()))?;

        let scalars = hex_array(&value, "scalars")?
            .iter()
            .enumerate()
            .map(|(index, bytes)| decode_scalar(bytes, index))
            .collect::<Result<Vec<_>, _>>()?;
        let points = hex_array(&value, "points")?
            .iter()
            .enumerate()
            .map(|(index, bytes)| decode_point(bytes, index))
            .collect::<Result<Vec<_>, _>>()?;

        if scalars.len() != points.len() {
            return Err(JobError::LengthMismatch {
                scalars: scalars.len(),
                points: points.len(),
            });
        }
        Ok(Self { scalars, points })
    }

    pub fn to_json(&self) -> Value {
        json!({
            "scalars": self.scalars.iter().map(|s| hex::encode(s.as_bytes())).collect::<Vec<_>>(),
            "points": self.points.iter().map(encode_point).collect::<Vec<_>>(),
        })
    }

    pub fn len(&self) -> usize {
        self.scalars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty()
    }

    /// Evaluates the job, chunking when it holds more than [`MAX_TERMS`] terms.
    pub fn evaluate(&self) -> JobOutcome {
        let batched = self.len() > MAX_TERMS;
        let (result, stats) = if batched {
            multi_mul_batched_with_stats(&self.scalars, &self.points)
        } else {
            multi_mul_with_stats(&self.scalars, &self.points)
        };
        JobOutcome {
            result,
            stats,
            batched,
        }
    }
}

impl JobOutcome {
    pub fn to_json(&self) -> Value {
        json!({
            "result": encode_point(&self.result),
            "terms": self.stats.terms,
            "rounds": self.stats.rounds,
            "absorbed": self.stats.absorbed,
            "residual_bits": self.stats.residual_bits,
            "ladder_additions": self.stats.ladder_additions,
            "ladder_doublings": self.stats.ladder_doublings,
            "phase": self.stats.final_phase.name(),
            "budget_exhausted": self.stats.budget_exhausted,
            "batched": self.batched,
        })
    }
}

pub fn encode_point(point: &RistrettoPoint) -> String {
    hex::encode(point.compress().as_bytes())
}

fn hex_array(value: &Value, field: &'static str) -> Result<Vec<[u8; 32]>, JobError> {
    let items = value
        .get(field)
        .and_then(Value::as_array)
        .ok_or(JobError::MissingField(field))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let text = item.as_str().ok_or(JobError::NotAString { field, index })?;
            let bytes = hex::decode(text.trim()).map_err(|e| JobError::Hex {
                field,
                index,
                reason: e.to_string(),
            })?;
            <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| JobError::Length {
                field,
                index,
                length: bytes.len(),
            })
        })
        .collect()
}

fn decode_scalar(bytes: &[u8; 32], index: usize) -> Result<Scalar, JobError> {
    Option::<Scalar>::from(Scalar::from_canonical_bytes(*bytes))
        .ok_or(JobError::NonCanonicalScalar { index })
}

fn decode_point(bytes: &[u8; 32], index: usize) -> Result<RistrettoPoint, JobError> {
    CompressedRistretto(*bytes)
        .decompress()
        .ok_or(JobError::InvalidPoint { index })
}
