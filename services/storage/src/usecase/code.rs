use rand::RngExt;

use sanrakshan_domain::code::{CODE_ALPHABET, CODE_LEN, CodeValue};

use crate::domain::repository::{CodeRepository, CodeSource};
use crate::domain::types::MAX_CODE_ATTEMPTS;
use crate::error::StorageServiceError;

/// Draws codes uniformly from [`CODE_ALPHABET`] using the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeSource;

impl CodeSource for RandomCodeSource {
    fn next_code(&self) -> CodeValue {
        let mut rng = rand::rng();
        let mut indices = [0usize; CODE_LEN];
        for i in &mut indices {
            *i = rng.random_range(0..CODE_ALPHABET.len());
        }
        CodeValue::from_indices(indices)
    }
}

/// Produces codes not currently held by an active validation code.
///
/// The check here only avoids known collisions; the partial unique index on
/// active codes decides at insert time.
pub struct CodeGenerator<S, C>
where
    S: CodeSource,
    C: CodeRepository,
{
    pub source: S,
    pub codes: C,
}

impl<S, C> CodeGenerator<S, C>
where
    S: CodeSource,
    C: CodeRepository,
{
    pub async fn generate(&self) -> Result<CodeValue, StorageServiceError> {
        let (code, _) = self.generate_within(MAX_CODE_ATTEMPTS).await?;
        Ok(code)
    }

    /// Draw at most `budget` candidates. Returns the code and how many were drawn.
    pub async fn generate_within(
        &self,
        budget: u32,
    ) -> Result<(CodeValue, u32), StorageServiceError> {
        for attempt in 1..=budget {
            let candidate = self.source.next_code();
            if !self.codes.is_active(&candidate).await? {
                return Ok((candidate, attempt));
            }
            tracing::debug!(attempt, "validation code collision");
        }
        Err(StorageServiceError::GenerationExhausted)
    }
}
