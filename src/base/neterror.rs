use thiserror::Error;

/// Declares `NetError` together with its code table, so the enum,
/// `as_i32` and `From<i32>` cannot drift apart.
macro_rules! net_errors {
    ($( $(#[$meta:meta])* $name:ident = $code:literal => $msg:tt, )*) => {
        #[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
        pub enum NetError {
            $(
                $(#[$meta])*
                #[error($msg)]
                $name,
            )*
            /// A code with no named variant.
            #[error("Unknown network error ({0})")]
            Unknown(i32),
        }

        impl NetError {
            pub fn as_i32(&self) -> i32 {
                match self {
                    $( NetError::$name => $code, )*
                    NetError::Unknown(code) => *code,
                }
            }
        }

        impl From<i32> for NetError {
            fn from(code: i32) -> Self {
                match code {
                    $( $code => NetError::$name, )*
                    _ => NetError::Unknown(code),
                }
            }
        }
    };
}

net_errors! {
    // Connection errors: -100 to -199
    ConnectionClosed = -100 => "Connection closed (TCP FIN)",
    ConnectionReset = -101 => "Connection reset (TCP RST)",
    ConnectionRefused = -102 => "Connection refused",
    ConnectionAborted = -103 => "Connection aborted",
    ConnectionFailed = -104 => "Connection failed",
    NameNotResolved = -105 => "Name not resolved",
    InternetDisconnected = -106 => "Internet disconnected",
    SslProtocolError = -107 => "SSL protocol error",
    AddressInvalid = -108 => "Address invalid",
    AddressUnreachable = -109 => "Address unreachable",
    ConnectionTimedOut = -118 => "Connection timed out",
    NetworkAccessDenied = -138 => "Network access denied",

    // HTTP errors: -300 to -399
    InvalidUrl = -300 => "Invalid URL",
    UnknownUrlScheme = -302 => "Unknown URL scheme",
    InvalidResponse = -320 => "Invalid response",
    EmptyResponse = -324 => "Empty response",
    /// The response declared a charset this crate cannot decode.
    EncodingDetectionFailed = -340 => "Encoding detection failed",
    /// The body ended before the declared `Content-Length`.
    ContentLengthMismatch = -354 => "Content-Length mismatch",

    // Body and header errors, local codes from -900
    HttpBodyError = -900 => "Failed to read response body",
    InvalidUtf8 = -901 => "Response body is not valid UTF-8",
    InvalidHeader = -902 => "Invalid header name or value",
    RequestBodyError = -903 => "Failed to send request body",
}

impl NetError {
    /// True for failures that happened below HTTP: resolving, connecting,
    /// or moving bytes over an established connection.
    pub fn is_connection_error(&self) -> bool {
        (-199..=-100).contains(&self.as_i32())
    }
}
