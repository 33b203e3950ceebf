use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Any failure of the describe-instances call; the message is the SDK's.
    #[error("{0}")]
    Provider(String),

    #[error("instance {instance} is missing required field `{field}`")]
    MissingField {
        field: &'static str,
        instance: String,
    },

    #[error("more than one public instance matched: `{first}` and `{second}`")]
    MultipleProxies { first: String, second: String },
}

impl Error {
    pub fn provider(err: impl std::fmt::Display) -> Self {
        Error::Provider(err.to_string())
    }

    pub fn missing_field(field: &'static str, instance: Option<&str>) -> Self {
        Error::MissingField {
            field,
            instance: instance.unwrap_or("<unknown>").to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
