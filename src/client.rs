use imap;
use native_tls;

use crate::config::{Config, Password};
use crate::eval::eval_expression;

type Session = imap::Session<native_tls::TlsStream<std::net::TcpStream>>;

/// Errors returned while talking to the IMAP server.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// TCP or TLS setup failed.
    #[error("connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: imap::error::Error,
    },

    /// The server rejected the credentials.
    #[error("login as {username}: {source}")]
    Login {
        username: String,
        #[source]
        source: imap::error::Error,
    },

    /// STATUS failed for one mailbox.
    #[error("status of mailbox {mailbox}: {source}")]
    Status {
        mailbox: String,
        #[source]
        source: imap::error::Error,
    },

    /// LIST failed.
    #[error("list mailboxes: {0}")]
    List(#[source] imap::error::Error),
}

/// Evaluated connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub hostname: String,
    pub port: u16,
    pub username: String,
    pub password: Password,
}

impl Credentials {
    /// Evaluate the credential options, `None` unless all of them are set.
    pub fn from_config(config: &Config) -> Option<Self> {
        let credentials = Self {
            hostname: eval_expression(&config.hostname),
            port: config.port,
            username: eval_expression(&config.username),
            password: Password::new(eval_expression(config.password.as_str())),
        };
        credentials.is_complete().then(|| credentials)
    }

    fn is_complete(&self) -> bool {
        !self.hostname.is_empty()
            && !self.username.is_empty()
            && !self.password.as_str().is_empty()
            && self.port != 0
    }
}

/// Where the bar item gets its counts from.
pub trait UnreadSource {
    fn unread_count(&mut self, mailbox: &str) -> Result<u32, ClientError>;

    /// End the session. Failures are only logged.
    fn logout(&mut self);
}

pub struct UnreadClient {
    session: Session,
}

impl UnreadClient {
    pub fn connect(credentials: &Credentials) -> Result<Self, ClientError> {
        let Credentials {
            hostname,
            port,
            username,
            password,
        } = credentials;

        log::debug!("connecting to {}:{} as {}", hostname, port, username);

        let client = imap::ClientBuilder::new(hostname.as_str(), *port)
            .native_tls()
            .map_err(|source| ClientError::Connect {
                host: hostname.clone(),
                port: *port,
                source,
            })?;

        let session = client
            .login(username, password.as_str())
            .map_err(|e| ClientError::Login {
                username: username.clone(),
                source: e.0,
            })?;

        Ok(Self { session })
    }

    pub fn list_boxes(&mut self) -> Result<Vec<String>, ClientError> {
        let boxes = self
            .session
            .list(Some(""), Some("*"))
            .map_err(ClientError::List)?;
        let res = boxes.iter().map(|b| String::from(b.name())).collect();
        Ok(res)
    }
}

impl UnreadSource for UnreadClient {
    fn unread_count(&mut self, mailbox: &str) -> Result<u32, ClientError> {
        let status = self
            .session
            .status(mailbox, "(UNSEEN)")
            .map_err(|source| ClientError::Status {
                mailbox: mailbox.to_string(),
                source,
            })?;
        let unseen = status.unseen.unwrap_or(0);
        log::debug!("mailbox {} has {} unseen", mailbox, unseen);
        Ok(unseen)
    }

    fn logout(&mut self) {
        if let Err(err) = self.session.logout() {
            log::warn!("IMAP logout failed: {}", err);
        }
    }
}
