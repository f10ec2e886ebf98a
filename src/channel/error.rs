use thiserror::Error;

use super::interface::ChannelId;

/// Errors raised while wiring observers to a channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// A second consumer tried to attach to a single-consumer channel.
    #[error("Channel {channel} already has an observer attached")]
    DuplicateObserver { channel: ChannelId },
}
