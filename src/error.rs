use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum TextBoxError {
    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),

    #[error("render surface error: {0}")]
    /// The host's render surface failed while the layout was being replayed
    Surface(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TextBoxError {
    /// Wrap a host-side failure so it can be surfaced through the draw phase
    pub fn surface<E: std::error::Error + Send + Sync + 'static>(error: E) -> TextBoxError {
        TextBoxError::Surface(Box::new(error))
    }
}
