use crate::error::{AppError, Result};

pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|_| AppError::Internal)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash).map_err(|_| AppError::Internal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_not_plaintext() {
        let hash = hash_password("hunter22").unwrap();
        assert_ne!(hash, "hunter22");
    }

    #[test]
    fn verify_accepts_original_password() {
        let hash = hash_password("hunter22").unwrap();
        assert!(verify_password("hunter22", &hash).unwrap());
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("hunter22").unwrap();
        assert!(!verify_password("hunter23", &hash).unwrap());
    }
}
