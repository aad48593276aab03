use crate::{
    error::RconError,
    packet::{Packet, PacketType},
};
use log::trace;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream};
use tokio::time::timeout;

/// Id the server must echo back for a successful login.
const LOGIN_ID: i32 = 1;
/// Id correlating the session's single command with its response.
const COMMAND_ID: i32 = 2;
/// Deadline for connecting and for each read. The protocol has no keepalive,
/// so a silent server would otherwise hang the session forever.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// One authenticate-and-execute rcon session. `connect()` opens the TCP
/// stream and logs in; [Client::command] relays a single command and returns
/// the server's reply. The stream is closed when the client drops, on success
/// and on every failure path alike.
///
/// ## Example
/// ```no_run
/// use craftcon::client::Client;
/// use std::error::Error;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn Error>> {
///     let client = Client::connect("127.0.0.1:25575", "<rcon password>").await?;
///     let response = client.command("list").await?;
///
///     println!("{}", response.body());
///     Ok(())
/// }
/// ```
pub struct Client {
    stream: TcpStream,
}

/// A command's textual reply. Many commands produce no output, in which case
/// the body is empty.
pub struct Response {
    body: String,
}

impl Response {
    pub fn body(&self) -> &str {
        self.body.as_ref()
    }
}

impl Client {
    /// Resolves `address` (host:port), connects and authenticates with
    /// `password`. A login response echoing any id other than the one we sent
    /// (servers conventionally reply with -1) means the password was refused.
    pub async fn connect(address: &str, password: &str) -> Result<Self, RconError> {
        let target = lookup_host(address)
            .await
            .map_err(RconError::AddressResolution)?
            .next()
            .ok_or_else(|| {
                RconError::AddressResolution(std::io::ErrorKind::AddrNotAvailable.into())
            })?;

        let mut stream = timeout(DEFAULT_TIMEOUT, TcpStream::connect(target))
            .await?
            .map_err(RconError::UnreachableHost)?;

        trace!("opened tcp stream to {}, attempting auth", target);

        let login = Packet::new(LOGIN_ID, PacketType::Login, password);
        Self::write_packet(&mut stream, &login).await?;

        let reply = Self::read_packet(&mut stream).await?;
        trace!("login reply carries id {}", reply.id());
        if reply.id() != LOGIN_ID {
            return Err(RconError::AuthenticationError);
        }

        trace!("auth complete");
        Ok(Client { stream })
    }

    /// Runs `command` and returns the reply body. Consumes the client: the
    /// session is strictly login-then-one-command, after which the connection
    /// is done.
    pub async fn command(mut self, command: &str) -> Result<Response, RconError> {
        let request = Packet::new(COMMAND_ID, PacketType::Command, command);

        trace!("sending command packet to server");
        Self::write_packet(&mut self.stream, &request).await?;

        let reply = Self::read_packet(&mut self.stream).await?;
        trace!("command reply carries id {}", reply.id());
        if reply.id() != COMMAND_ID {
            return Err(RconError::CorrelationError {
                want: COMMAND_ID,
                got: reply.id(),
            });
        }

        Ok(Response {
            body: reply.body().to_string(),
        })
    }

    async fn write_packet(stream: &mut TcpStream, packet: &Packet) -> Result<(), RconError> {
        stream
            .write_all(&packet.pack())
            .await
            .map_err(RconError::SendError)
    }

    /// Reads one length-prefixed packet: the 4-byte length field first, then
    /// exactly that many more bytes. TCP gives no framing guarantee, so a
    /// single fixed-buffer read would split packets on segment boundaries.
    async fn read_packet(stream: &mut TcpStream) -> Result<Packet, RconError> {
        let mut prefix = [0; 4];
        timeout(DEFAULT_TIMEOUT, stream.read_exact(&mut prefix))
            .await?
            .map_err(RconError::ReceiveError)?;

        let declared = i32::from_le_bytes(prefix);
        if declared < Packet::BASE_PACKET_SIZE as i32 {
            return Err(RconError::TruncatedPacket {
                expected: Packet::BASE_PACKET_SIZE,
                actual: declared.max(0) as usize,
            });
        }

        let mut raw = vec![0; declared as usize + prefix.len()];
        raw[..4].copy_from_slice(&prefix);
        timeout(DEFAULT_TIMEOUT, stream.read_exact(&mut raw[4..]))
            .await?
            .map_err(RconError::ReceiveError)?;

        Packet::unpack(&raw)
    }
}

/// One-shot session: resolve, connect, log in, run `command`, tear down.
/// Returns the command's output, which may be empty.
pub async fn send_command(
    address: &str,
    password: &str,
    command: &str,
) -> Result<String, RconError> {
    let client = Client::connect(address, password).await?;
    let response = client.command(command).await?;
    Ok(response.body().to_string())
}
