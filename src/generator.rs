use crate::collab::{GenerateOptions, PasswordGenerator};
use crate::error::{DbpassError, Result};

/// Settings used by the "generate strong password" action.
pub const STRONG_PASSWORD: GenerateOptions = GenerateOptions {
    length: 16,
    numbers: true,
    uppercase: true,
};

/// Lowercase letters plus every requested class. Strict mode guarantees at least
/// one character from each enabled class.
pub struct RandomPasswordGenerator;

impl PasswordGenerator for RandomPasswordGenerator {
    fn generate(&self, options: GenerateOptions) -> Result<String> {
        let required = 1 + usize::from(options.numbers) + usize::from(options.uppercase);
        if options.length < required {
            return Err(DbpassError::Generator(format!(
                "a password of length {} cannot satisfy {} required character classes",
                options.length, required
            )));
        }

        let pg = passwords::PasswordGenerator {
            length: options.length,
            numbers: options.numbers,
            lowercase_letters: true,
            uppercase_letters: options.uppercase,
            symbols: false,
            spaces: false,
            exclude_similar_characters: false,
            strict: true,
        };
        pg.generate_one()
            .map_err(|e| DbpassError::Generator(e.to_string()))
    }
}
