//! Line commands read by the `aodv-node` binary from stdin.

use aodv_core::types::NodeAddress;

/// A parsed stdin line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `<hex-dest> <text>`: send `text` as user data.
    Send { destination: NodeAddress, text: String },
    /// `routes`: print the route table.
    Routes,
    /// `address <hex>`: set the local address.
    Address(NodeAddress),
    /// `quit`: stop the node.
    Quit,
}

/// Parse one line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim_start();
    let command = match head {
        "routes" => Command::Routes,
        "quit" | "exit" => Command::Quit,
        "address" => Command::Address(parse_address(rest)?),
        dest => {
            if rest.is_empty() {
                return Err(format!("nothing to send to {dest}"));
            }
            Command::Send {
                destination: parse_address(dest)?,
                text: rest.to_string(),
            }
        }
    };
    Ok(Some(command))
}

fn parse_address(s: &str) -> Result<NodeAddress, String> {
    s.parse().map_err(|e| format!("'{s}': {e}"))
}
