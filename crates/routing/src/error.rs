#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no route matches {0}")]
    UnknownRoute(String),
}

pub type Result<T> = std::result::Result<T, Error>;
