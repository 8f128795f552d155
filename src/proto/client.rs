//! Synchronous RouterOS API client.
//!
//! One client wraps one blocking stream. Every exchange is a strict
//! request-then-wait cycle: [`ApiClient::talk`] writes a sentence, then
//! reads reply sentences until the terminal `!done`. There is no
//! pipelining and no reconnect; a failed operation abandons the
//! connection.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use log::debug;
use md5::{Digest, Md5};

use crate::config::RouterConfig;
use crate::error::{Error, Result};
use crate::proto::sentence::{self, Reply};

/// Client for the RouterOS binary API, generic over the underlying stream.
pub struct ApiClient<S> {
    stream: S,
}

impl ApiClient<TcpStream> {
    /// Open a TCP connection to the router and perform the login
    /// handshake. The configured timeout, when present, bounds the
    /// connect as well as every subsequent read and write.
    pub fn connect(config: &RouterConfig) -> Result<Self> {
        let address = (config.host.as_str(), config.port);
        let stream = match config.timeout_secs {
            Some(secs) => {
                let timeout = Duration::from_secs(secs);
                let resolved = address.to_socket_addrs()?.next().ok_or_else(|| {
                    Error::Io(io::Error::new(
                        io::ErrorKind::AddrNotAvailable,
                        format!("cannot resolve router address {}", config.host),
                    ))
                })?;
                let stream = TcpStream::connect_timeout(&resolved, timeout)?;
                stream.set_read_timeout(Some(timeout))?;
                stream.set_write_timeout(Some(timeout))?;
                stream
            }
            None => TcpStream::connect(address)?,
        };
        debug!("Connected to router at {}:{}", config.host, config.port);

        let mut client = ApiClient { stream };
        client.login(&config.username, &config.password)?;
        Ok(client)
    }
}

impl<S: Read + Write> ApiClient<S> {
    /// Wrap an already-connected stream. Callers are expected to run
    /// [`login`](Self::login) before issuing commands.
    pub fn new(stream: S) -> Self {
        ApiClient { stream }
    }

    /// Send one request sentence and collect replies until `!done`.
    ///
    /// Empty reply sentences are noise and are skipped; they do not
    /// terminate the cycle. The terminal `!done` reply is included in the
    /// returned list.
    pub fn talk<I, T>(&mut self, words: I) -> Result<Vec<Reply>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        sentence::write_sentence(&mut self.stream, words)?;
        self.stream.flush()?;

        let mut replies = Vec::new();
        loop {
            let words = sentence::read_sentence(&mut self.stream)?;
            if words.is_empty() {
                continue;
            }
            let reply = sentence::parse_reply(&words);
            let done = reply.tag == "!done";
            replies.push(reply);
            if done {
                return Ok(replies);
            }
        }
    }

    /// Perform the challenge-response login handshake.
    ///
    /// `/login` yields a hex challenge in `ret`; the response digest is
    /// MD5 of a zero byte, the password, and the raw challenge bytes.
    pub fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let replies = self.talk(["/login"])?;
        let challenge_hex = replies
            .iter()
            .find_map(|reply| reply.attributes.get("ret"))
            .ok_or_else(|| Error::AuthenticationFailed {
                reason: "login challenge missing from reply".to_string(),
            })?;
        let challenge = hex::decode(challenge_hex).map_err(|_| Error::AuthenticationFailed {
            reason: format!("malformed login challenge: {}", challenge_hex),
        })?;

        let mut digest = Md5::new();
        digest.update([0u8]);
        digest.update(password.as_bytes());
        digest.update(&challenge);
        let response = format!("00{}", hex::encode(digest.finalize()));

        let replies = self.talk([
            "/login".to_string(),
            format!("=name={}", username),
            format!("=response={}", response),
        ])?;
        if let Some(failure) = replies.iter().find(|reply| reply.tag != "!done") {
            return Err(Error::AuthenticationFailed {
                reason: failure
                    .message()
                    .unwrap_or(&failure.tag)
                    .to_string(),
            });
        }

        debug!("Logged in as {}", username);
        Ok(())
    }
}
