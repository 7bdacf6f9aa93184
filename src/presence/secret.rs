//! Join secrets: what friends receive to join our server, and how a received
//! one turns into client commands.

use std::fmt;

/// Characters never allowed through into a console command.
const UNSAFE_CHARS: [char; 4] = ['"', ';', '\r', '\n'];

/// Why a join secret was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JoinSecretError {
    #[error("join secret is empty")]
    Empty,
    #[error("join secret has {0} fields, expected at most 3")]
    TooManyFields(usize),
    #[error("join secret has no usable server address")]
    NoAddress,
}

/// A client command produced by joining through presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAction {
    SetPassword(String),
    Connect(String),
}

impl fmt::Display for ClientAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetPassword(password) => write!(f, "set password \"{}\"", password),
            Self::Connect(address) => write!(f, "connect {}", address),
        }
    }
}

/// Server to join, as decoded from a secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinTarget {
    pub address: String,
    pub content_set: Option<String>,
    pub password: Option<String>,
}

impl JoinTarget {
    /// Commands to run, in order.
    #[must_use]
    pub fn actions(&self) -> Vec<ClientAction> {
        let mut actions = Vec::with_capacity(2);
        if let Some(password) = &self.password {
            actions.push(ClientAction::SetPassword(password.clone()));
        }
        actions.push(ClientAction::Connect(self.address.clone()));
        actions
    }
}

fn strip_unsafe(value: &str) -> String {
    value.chars().filter(|c| !UNSAFE_CHARS.contains(c)).collect()
}

/// Decode `"<address> [<content-set> [<password>]]"`.
pub fn parse_join_secret(secret: &str) -> Result<JoinTarget, JoinSecretError> {
    let fields: Vec<&str> = secret.split_whitespace().collect();

    match fields.len() {
        0 => return Err(JoinSecretError::Empty),
        1..=3 => {}
        n => return Err(JoinSecretError::TooManyFields(n)),
    }

    let address = strip_unsafe(fields[0]);
    if address.is_empty() {
        return Err(JoinSecretError::NoAddress);
    }

    let password = fields
        .get(2)
        .map(|password| strip_unsafe(password))
        .filter(|password| !password.is_empty());

    Ok(JoinTarget {
        address,
        content_set: fields.get(1).map(|s| (*s).to_string()),
        password,
    })
}

/// Build the secret published for our current server.
///
/// The password is only included when sharing is enabled, the server needs
/// one and it is set; otherwise the field is an empty quoted string.
#[must_use]
pub fn encode_join_secret(
    address: &str,
    content_set: &str,
    password: Option<&str>,
    share_password: bool,
    server_needs_password: bool,
) -> String {
    match password {
        Some(password) if share_password && server_needs_password && !password.is_empty() => {
            format!("{} {} {}", address, content_set, password)
        }
        _ => format!("{} {} \"\"", address, content_set),
    }
}
