pub type MoonlakeResult<T> = Result<T, MoonlakeError>;

#[derive(thiserror::Error, Debug)]
pub enum MoonlakeError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("geometry error: {0}")]
    Geometry(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MoonlakeError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            MoonlakeError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            MoonlakeError::geometry("x")
                .to_string()
                .contains("geometry error:")
        );
        assert!(
            MoonlakeError::storage("x")
                .to_string()
                .contains("storage error:")
        );
        assert!(
            MoonlakeError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = MoonlakeError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
