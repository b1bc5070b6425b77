/// Errors specific to the Discord gateway layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("discord config: {0}")]
    Config(String),

    #[error("discord gateway: {0}")]
    Gateway(#[from] serenity::Error),

    #[error("discord send: {0}")]
    Send(String),
}
