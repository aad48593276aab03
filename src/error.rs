use thiserror::Error;
use tokio::time::error::Elapsed;

/// Possible errors for the package.
#[derive(Error, Debug)]
pub enum RconError {
    /// Returned if we received a packet that does not have a type known to us.
    #[error("unknown rcon packet type: {0}")]
    UnknownPacketType(i32),
    /// Returned if the header is mangled in some way (bad offsets, incomplete
    /// response)
    #[error("packet header malformed (can't parse size, id or type)")]
    MalformedPacketHeader(#[from] std::array::TryFromSliceError),
    /// Returned if the body is mangled in some way.
    #[error("packet body malformed (not valid ascii or utf-8)")]
    MalformedPacketBody(#[from] std::str::Utf8Error),
    /// Returned if a packet declares more payload than the bytes that
    /// actually arrived.
    #[error("packet truncated: declared {expected} bytes, got {actual}")]
    TruncatedPacket { expected: usize, actual: usize },
    /// Returned if the host:port could not be resolved to an address.
    #[error("failed to resolve server address")]
    AddressResolution(#[source] std::io::Error),
    /// Returned if the host is down, rcon is disabled or a firewall is in
    /// the way.
    #[error("host cannot be reached")]
    UnreachableHost(#[source] std::io::Error),
    /// Internal error used if the stream was successfully established, but
    /// there was a problem writing to the socket.
    #[error("cannot send message to host")]
    SendError(#[source] std::io::Error),
    /// Internal error used if the stream was successfully established, but
    /// there was a problem reading from the socket.
    #[error("cannot receive response from host")]
    ReceiveError(#[source] std::io::Error),
    /// Returned if you can't remember the password.
    #[error("failed to log in, bad rcon password?")]
    AuthenticationError,
    /// Returned if the command response echoes an id we never sent, so it
    /// cannot be trusted as the answer to our command.
    #[error("response id {got} does not match request id {want}")]
    CorrelationError { want: i32, got: i32 },
    /// Returned if the server did not respond in time.
    #[error("timeout")]
    TimeoutError(#[from] Elapsed),
}
