use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use crate::socket::client::SocketType;
use boring::ssl::{SslConnector, SslMethod, SslVerifyMode, SslVersion};
use tokio::net::TcpStream;
use url::Url;

/// Manages the connection process: DNS -> TCP -> SSL.
/// Roughly equivalent to net::ConnectJob.
pub struct ConnectJob;

impl ConnectJob {
    pub async fn connect(url: &Url) -> Result<SocketType, NetError> {
        let tls = match url.scheme() {
            "http" => false,
            "https" => true,
            _ => return Err(NetError::UnknownUrlScheme),
        };
        let host = url.host_str().ok_or(NetError::InvalidUrl)?;
        let port = url.port_or_known_default().ok_or(NetError::InvalidUrl)?;

        // 1. DNS Resolution
        let lookup_host = host.trim_start_matches('[').trim_end_matches(']');
        tracing::debug!(host = %lookup_host, port, "resolving");
        let addrs: Vec<_> = tokio::net::lookup_host((lookup_host, port))
            .await
            .dns_context()?
            .collect();
        if addrs.is_empty() {
            return Err(NetError::NameNotResolved);
        }

        // 2. TCP Connect, first address that answers wins
        let mut last_err = NetError::ConnectionFailed;
        let mut stream = None;
        for addr in addrs {
            match TcpStream::connect(addr).await.connection_context() {
                Ok(s) => {
                    tracing::debug!(%addr, "connected");
                    stream = Some(s);
                    break;
                }
                Err(e) => {
                    tracing::debug!(%addr, error = %e, "connect attempt failed");
                    last_err = e;
                }
            }
        }
        let stream = stream.ok_or(last_err)?;

        // 3. SSL Handshake (if https)
        if !tls {
            return Ok(SocketType::Tcp(stream));
        }

        let mut builder =
            SslConnector::builder(SslMethod::tls()).map_err(|_| NetError::SslProtocolError)?;
        builder
            .set_min_proto_version(Some(SslVersion::TLS1_2))
            .map_err(|_| NetError::SslProtocolError)?;
        // Only HTTP/1.1 is spoken over the connection.
        builder
            .set_alpn_protos(b"\x08http/1.1")
            .map_err(|_| NetError::SslProtocolError)?;
        builder.set_verify(SslVerifyMode::PEER);

        let connector = builder.build();
        let mut config = connector
            .configure()
            .map_err(|_| NetError::SslProtocolError)?;
        let identity = ServerIdentity::for_host(lookup_host);
        config.set_use_server_name_indication(identity.sni);
        config.set_verify_hostname(identity.verify_hostname);

        let tls_stream = tokio_boring::connect(config, lookup_host, stream)
            .await
            .map_err(|e| {
                tracing::debug!(host = %lookup_host, error = ?e, "SSL handshake failed");
                NetError::SslProtocolError
            })?;

        Ok(SocketType::Ssl(tls_stream))
    }
}

/// How the server certificate is tied to the host that was dialed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ServerIdentity {
    /// Send the host name in the ClientHello.
    sni: bool,
    /// Match the certificate against the host: DNS SANs for names, IP SANs
    /// for address literals.
    verify_hostname: bool,
}

impl ServerIdentity {
    fn for_host(host: &str) -> Self {
        // Per RFC 6066, SNI MUST NOT be set for raw IP addresses. The
        // certificate is still checked against the address.
        Self {
            sni: should_set_sni(host),
            verify_hostname: true,
        }
    }
}

fn should_set_sni(host: &str) -> bool {
    host.parse::<std::net::IpAddr>().is_err()
}
