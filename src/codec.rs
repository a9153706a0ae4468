//! Record codec
//!
//! Completed answer sets are stored as field-named JSON so that a record
//! stays readable for as long as it is kept. Payloads written by the first
//! version of the bot (`FavFood` / `FavGane` keys, plus bookkeeping keys) are
//! still accepted on decode.

use crate::state_machine::FormAnswers;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("malformed record payload: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

#[derive(Debug, Error)]
#[error("failed to encode answers: {0}")]
pub struct EncodeError(#[from] serde_json::Error);

pub fn encode(answers: &FormAnswers) -> Result<Vec<u8>, EncodeError> {
    Ok(serde_json::to_vec(answers)?)
}

pub fn decode(payload: &[u8]) -> Result<FormAnswers, DecodeError> {
    Ok(serde_json::from_slice(payload)?)
}
