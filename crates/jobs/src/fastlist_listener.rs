use rbldns_application::ports::FastlistPort;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

const DEFAULT_RECV_BUFFER_BYTES: usize = 256 * 1024;
const MAX_DATAGRAM_BYTES: usize = 65_535;

/// Binds a UDP socket for fastlist updates with an enlarged receive buffer.
pub fn bind_fastlist_socket(addr: SocketAddr, recv_buffer_bytes: usize) -> io::Result<UdpSocket> {
    use socket2::{Domain, Protocol, Socket, Type};

    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    socket.set_recv_buffer_size(recv_buffer_bytes)?;
    socket.bind(&addr.into())?;
    socket.set_nonblocking(true)?;

    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket)
}

/// Receives fastlist datagrams and hands them to the dataset.
///
/// The socket is bound when the job is built, so a port that cannot be bound
/// surfaces to the caller before any worker starts. There is no reply
/// protocol: malformed datagrams are logged and dropped.
pub struct FastlistListenerJob {
    port: Arc<dyn FastlistPort>,
    socket: UdpSocket,
    shutdown: CancellationToken,
}

impl FastlistListenerJob {
    /// Binds the dataset's listen address with the default receive buffer.
    pub fn bind(port: Arc<dyn FastlistPort>) -> io::Result<Self> {
        Self::bind_with_recv_buffer(port, DEFAULT_RECV_BUFFER_BYTES)
    }

    pub fn bind_with_recv_buffer(
        port: Arc<dyn FastlistPort>,
        recv_buffer_bytes: usize,
    ) -> io::Result<Self> {
        let socket = bind_fastlist_socket(port.listen_addr(), recv_buffer_bytes)?;
        Ok(Self::with_socket(port, socket))
    }

    pub fn with_socket(port: Arc<dyn FastlistPort>, socket: UdpSocket) -> Self {
        Self {
            port,
            socket,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub async fn start(self: Arc<Self>) {
        match self.local_addr() {
            Ok(addr) => info!(listen = %addr, "Fastlist listener started"),
            Err(_) => info!("Fastlist listener started"),
        }
        tokio::spawn(self.serve());
    }

    /// Runs the receive loop until cancelled.
    pub async fn serve(self: Arc<Self>) {
        let mut buf = vec![0u8; MAX_DATAGRAM_BYTES];

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("FastlistListenerJob: shutting down");
                    break;
                }
                received = self.socket.recv_from(&mut buf) => match received {
                    Ok((len, peer)) => {
                        if let Err(e) = self.port.handle_datagram(&buf[..len], peer) {
                            warn!(peer = %peer, error = %e, "Dropping fastlist datagram");
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "Fastlist receive failed");
                    }
                }
            }
        }
    }
}
