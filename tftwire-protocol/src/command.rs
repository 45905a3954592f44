//! Command identifiers and the static command table
//!
//! The set of commands is closed: a command byte is accepted only if it
//! appears in [`COMMANDS`], and each entry fixes the declared-length bounds
//! and the way its payload is consumed.

/// Command identifier (the CMD byte of a frame)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CommandId {
    /// Fill a rectangle with a solid colour
    FillRect = 0x00,
    /// Blit a streamed image
    Image = 0x01,
    /// Draw a text string
    DrawString = 0x02,
    /// Clear the screen
    Clear = 0x03,
    /// Raw controller command + data passthrough
    Raw = 0x04,
    /// Fill a batch of equally sized squares
    SquareBatch = 0x05,
}

/// How a command's payload is consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PayloadKind {
    /// No payload; the handler runs once with a sentinel byte
    Empty,
    /// Accumulated in the scratch buffer, executed once complete
    Buffered,
    /// Forwarded to the device as it arrives, only the count is tracked
    Streamed,
}

/// Static description of one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandSpec {
    /// Command identifier
    pub id: CommandId,
    /// Smallest acceptable declared length
    pub min_len: u32,
    /// Largest acceptable declared length (`None` = unbounded)
    pub max_len: Option<u32>,
    /// Payload handling
    pub kind: PayloadKind,
}

/// Sentinel passed to the handler of a zero-length command
pub const EMPTY_PAYLOAD_SENTINEL: u8 = 0x00;

/// Every command understood by the parser
pub const COMMANDS: [CommandSpec; 6] = [
    CommandSpec {
        id: CommandId::FillRect,
        min_len: 10,
        max_len: None,
        kind: PayloadKind::Buffered,
    },
    CommandSpec {
        id: CommandId::Image,
        min_len: 8,
        max_len: None,
        kind: PayloadKind::Streamed,
    },
    CommandSpec {
        id: CommandId::DrawString,
        min_len: 8,
        max_len: None,
        kind: PayloadKind::Buffered,
    },
    CommandSpec {
        id: CommandId::Clear,
        min_len: 0,
        max_len: Some(0),
        kind: PayloadKind::Empty,
    },
    CommandSpec {
        id: CommandId::Raw,
        min_len: 1,
        max_len: None,
        kind: PayloadKind::Streamed,
    },
    CommandSpec {
        id: CommandId::SquareBatch,
        min_len: 12,
        max_len: None,
        kind: PayloadKind::Streamed,
    },
];

impl CommandId {
    /// Look up a command byte in the command table
    pub fn from_byte(byte: u8) -> Option<Self> {
        COMMANDS
            .iter()
            .find(|spec| spec.id as u8 == byte)
            .map(|spec| spec.id)
    }

    /// Convert to the wire byte
    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    /// Table entry for this command
    pub fn spec(self) -> &'static CommandSpec {
        // Every variant has exactly one table entry, at its own discriminant
        &COMMANDS[self as usize]
    }
}

impl CommandSpec {
    /// Check a declared length against this command's bounds
    pub fn accepts_len(&self, len: u32) -> bool {
        len >= self.min_len && self.max_len.map_or(true, |max| len <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_discriminant() {
        for (i, spec) in COMMANDS.iter().enumerate() {
            assert_eq!(spec.id as usize, i);
            assert_eq!(spec.id.spec(), spec);
        }
    }

    #[test]
    fn test_from_byte() {
        assert_eq!(CommandId::from_byte(0x00), Some(CommandId::FillRect));
        assert_eq!(CommandId::from_byte(0x01), Some(CommandId::Image));
        assert_eq!(CommandId::from_byte(0x03), Some(CommandId::Clear));
        assert_eq!(CommandId::from_byte(0x05), Some(CommandId::SquareBatch));
        assert_eq!(CommandId::from_byte(0x06), None);
        assert_eq!(CommandId::from_byte(0xFF), None);
    }

    #[test]
    fn test_length_bounds() {
        let fill = CommandId::FillRect.spec();
        assert!(!fill.accepts_len(4));
        assert!(fill.accepts_len(10));
        assert!(fill.accepts_len(64));

        let clear = CommandId::Clear.spec();
        assert!(clear.accepts_len(0));
        assert!(!clear.accepts_len(1));

        let raw = CommandId::Raw.spec();
        assert!(!raw.accepts_len(0));
        assert!(raw.accepts_len(1));
    }
}
