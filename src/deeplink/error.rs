use thiserror::Error;

/// Why a deep link produced no navigation.
///
/// All of these are recoverable: navigation state is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeepLinkError {
    #[error("Malformed deep link '{url}': {reason}")]
    Malformed { url: String, reason: String },

    #[error("Unsupported deep link scheme '{scheme}' (expected '{expected}')")]
    UnsupportedScheme { scheme: String, expected: String },

    #[error("No route matches deep link '{url}'")]
    UnknownRoute { url: String },

    /// The link names something that does not exist.
    #[error("Deep link target '{target}' could not be resolved: {reason}")]
    Unresolved { target: String, reason: String },

    #[error("No navigation stack is mounted")]
    NotMounted,

    /// A newer link started resolving before this one finished.
    #[error("Deep link '{url}' was superseded by a newer link")]
    Superseded { url: String },
}
