//! KDS WebSocket protocol
//!
//! Server → Screen: KdsMessage (push)
//! Screen → Server: KdsCommand (subscription control)

use serde::{Deserialize, Serialize};

use crate::models::{Destination, KdsBoard, TicketLine, TicketOrderFlag};

/// Server → kitchen screen push message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KdsMessage {
    /// Handshake done (or subscriber lagged), carries the full board
    Ready { board: KdsBoard },

    /// A ticket line changed status
    LineChanged { location_id: i64, line: TicketLine },

    /// Flags of a ticket were replaced
    FlagChanged {
        location_id: i64,
        ticket_id: i64,
        #[serde(default)]
        flags: Vec<TicketOrderFlag>,
    },
}

/// Kitchen screen → server command
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KdsCommand {
    /// Restrict pushes to one station (`None` = every station)
    Subscribe { destination: Option<Destination> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_tagged_snake_case() {
        let msg = KdsMessage::FlagChanged {
            location_id: 3,
            ticket_id: 7,
            flags: vec![],
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "flag_changed");
        assert_eq!(json["ticket_id"], 7);
    }

    #[test]
    fn subscribe_command_parses() {
        let cmd: KdsCommand =
            serde_json::from_str(r#"{"type":"subscribe","destination":"bar"}"#).unwrap();
        match cmd {
            KdsCommand::Subscribe { destination } => {
                assert_eq!(destination, Some(Destination::Bar))
            }
        }
    }
}
