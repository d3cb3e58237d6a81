use thiserror::Error;

use crate::signature::Signature;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("argument type mismatch: holder expects `{expected}`, call requested `{requested}`")]
    ArgumentTypeMismatch {
        expected: Signature,
        requested: Signature,
    },
}

impl CallError {
    pub fn mismatch(expected: &Signature, requested: Signature) -> Self {
        CallError::ArgumentTypeMismatch {
            expected: expected.clone(),
            requested,
        }
    }
}
