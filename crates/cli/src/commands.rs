//! CLI subcommands and their reports.

use anyhow::Context;
use clap::{Subcommand, ValueEnum};
use endpoint::{AddressText, Endpoint, ParseOrder};
use std::fmt;
use tracing::debug;

/// Family order for `inspect`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    #[default]
    Ipv6First,
    Ipv4First,
}

impl From<OrderArg> for ParseOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Ipv6First => ParseOrder::Ipv6First,
            OrderArg::Ipv4First => ParseOrder::Ipv4First,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse an address literal and show family, canonical text and hash.
    Inspect {
        address: String,
        port: u16,
        #[arg(long, value_enum, default_value_t)]
        order: OrderArg,
    },
    /// Compare two `addr:port` endpoints.
    Compare { a: Endpoint, b: Endpoint },
    /// Dump the native socket-address bytes for an address (Unix only).
    Native { address: String, port: u16 },
}

/// Outcome of a command, rendered for the terminal.
#[derive(Debug)]
pub enum CommandResult {
    Inspected {
        endpoint: Endpoint,
        address: AddressText,
        hash: u64,
    },
    Compared {
        a: Endpoint,
        b: Endpoint,
        equal: bool,
        hash_a: u64,
        hash_b: u64,
    },
    Native {
        endpoint: Endpoint,
        bytes: Vec<u8>,
    },
}

impl Command {
    pub fn execute(self) -> anyhow::Result<CommandResult> {
        match self {
            Command::Inspect {
                address,
                port,
                order,
            } => {
                let endpoint = Endpoint::from_string_with(&address, port, order.into())?;
                let (text, _) = endpoint.to_parts()?;
                let hash = endpoint.hash_code()?;
                debug!(%endpoint, hash, "inspected");
                Ok(CommandResult::Inspected {
                    endpoint,
                    address: text,
                    hash,
                })
            }
            Command::Compare { a, b } => Ok(CommandResult::Compared {
                a,
                b,
                equal: a == b,
                hash_a: a.hash_code()?,
                hash_b: b.hash_code()?,
            }),
            Command::Native { address, port } => native_dump(&address, port),
        }
    }
}

#[cfg(unix)]
fn native_dump(address: &str, port: u16) -> anyhow::Result<CommandResult> {
    let endpoint = Endpoint::from_string(address, port)?;
    let native = endpoint
        .to_native()
        .with_context(|| format!("cannot lay out {}", endpoint))?;
    Ok(CommandResult::Native {
        endpoint,
        bytes: native.as_bytes().to_vec(),
    })
}

#[cfg(not(unix))]
fn native_dump(_address: &str, _port: u16) -> anyhow::Result<CommandResult> {
    anyhow::bail!("native socket layouts are only available on Unix")
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Inspected {
                endpoint,
                address,
                hash,
            } => {
                writeln!(f, "family:  {}", endpoint.family())?;
                writeln!(f, "address: {}", address)?;
                writeln!(f, "port:    {}", endpoint.port())?;
                write!(f, "hash:    {:#018x}", hash)
            }
            CommandResult::Compared {
                a,
                b,
                equal,
                hash_a,
                hash_b,
            } => {
                writeln!(f, "{} {} {}", a, if *equal { "==" } else { "!=" }, b)?;
                writeln!(f, "hash a:  {:#018x}", hash_a)?;
                write!(f, "hash b:  {:#018x}", hash_b)
            }
            CommandResult::Native { endpoint, bytes } => {
                writeln!(f, "{} ({} bytes)", endpoint, bytes.len())?;
                for (i, chunk) in bytes.chunks(8).enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{:04x}:", i * 8)?;
                    for byte in chunk {
                        write!(f, " {:02x}", byte)?;
                    }
                }
                Ok(())
            }
        }
    }
}
