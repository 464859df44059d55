//! Demo header and frame data model shared by the parser and writer.

use std::borrow::Cow;
use std::fmt;

/// Width of each NUL-padded name field in the header.
pub const NAME_LEN: usize = 260;

/// Size of the per-packet command info block (flags plus two view setups).
pub const CMD_INFO_LEN: usize = 76;

/// Encoded size of the demo header.
pub const HEADER_LEN: usize = 8 + 4 + 4 + 4 * NAME_LEN + 4 + 4 + 4 + 4;

/// Fixed metadata block at the start of every demo.
///
/// # Examples
///
/// ```
/// use demcut::Header;
///
/// let header = Header {
///     map: "cp_gullywash_final1".into(),
///     ..Header::default()
/// };
/// assert_eq!(header.demo_protocol, 3);
/// assert_eq!(header.ticks, 0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    /// Demo file protocol. Only [`SUPPORTED_DEMO_PROTOCOLS`](crate::SUPPORTED_DEMO_PROTOCOLS) are accepted.
    pub demo_protocol: u32,
    /// Network protocol of the recording server.
    pub network_protocol: u32,
    /// Server name or address.
    pub server: String,
    /// Name of the recording client.
    pub nick: String,
    /// Map the demo was recorded on.
    pub map: String,
    /// Game directory (e.g. `"tf"`).
    pub game: String,
    /// Playback length in seconds.
    pub duration: f32,
    /// Playback length in ticks.
    pub ticks: u32,
    /// Number of recorded frames.
    pub frames: u32,
    /// Encoded size of the signon section in bytes.
    pub signon_length: u32,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            demo_protocol: 3,
            network_protocol: 24,
            server: String::new(),
            nick: String::new(),
            map: String::new(),
            game: "tf".into(),
            duration: 0.0,
            ticks: 0,
            frames: 0,
            signon_length: 0,
        }
    }
}

impl Header {
    /// Seconds per tick implied by the header, if it records a usable one.
    pub fn tick_interval(&self) -> Option<f32> {
        if self.ticks > 0 && self.duration.is_finite() && self.duration > 0.0 {
            Some(self.duration / self.ticks as f32)
        } else {
            None
        }
    }
}

/// Closed set of frame kinds, with their wire tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum FrameKind {
    /// Network packet recorded during the signon handshake.
    Signon = 1,
    /// Network packet recorded during play.
    Packet = 2,
    /// Marks the tick at which the client synchronizes its clock.
    SyncTick = 3,
    /// Console command issued by the recording client.
    ConsoleCmd = 4,
    /// User input command.
    UserCmd = 5,
    /// Send table and server class definitions.
    DataTables = 6,
    /// End-of-stream marker.
    Stop = 7,
    /// Full string table snapshot.
    StringTables = 8,
}

impl FrameKind {
    /// Every kind, in tag order.
    pub const ALL: [FrameKind; 8] = [
        FrameKind::Signon,
        FrameKind::Packet,
        FrameKind::SyncTick,
        FrameKind::ConsoleCmd,
        FrameKind::UserCmd,
        FrameKind::DataTables,
        FrameKind::Stop,
        FrameKind::StringTables,
    ];

    /// Decode a wire tag.
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| *kind as u8 == tag)
    }

    /// Wire tag of this kind.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Control records whose wire tick is meaningless; they take the tick of
    /// the frame before them.
    pub fn is_tick_independent(self) -> bool {
        matches!(
            self,
            FrameKind::SyncTick | FrameKind::DataTables | FrameKind::StringTables
        )
    }

    /// The context slot this kind defines, if any.
    pub fn context_role(self) -> Option<ContextRole> {
        match self {
            FrameKind::DataTables => Some(ContextRole::DataTables),
            FrameKind::StringTables => Some(ContextRole::StringTables),
            FrameKind::SyncTick => Some(ContextRole::SyncTick),
            _ => None,
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameKind::Signon => "signon",
            FrameKind::Packet => "packet",
            FrameKind::SyncTick => "synctick",
            FrameKind::ConsoleCmd => "consolecmd",
            FrameKind::UserCmd => "usercmd",
            FrameKind::DataTables => "datatables",
            FrameKind::Stop => "stop",
            FrameKind::StringTables => "stringtables",
        };
        f.write_str(name)
    }
}

/// State-defining roles a standalone cut must carry ahead of its window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContextRole {
    /// Latest data table definition.
    DataTables,
    /// Latest full string table snapshot.
    StringTables,
    /// Latest synchronize-tick marker.
    SyncTick,
}

/// Body shared by signon and play packets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PacketData<'a> {
    /// Opaque command info block (flags and view origins/angles).
    pub cmd_info: [u8; CMD_INFO_LEN],
    /// Incoming sequence number.
    pub sequence_in: u32,
    /// Outgoing sequence number.
    pub sequence_out: u32,
    /// Raw network message data.
    pub data: Cow<'a, [u8]>,
}

impl PacketData<'_> {
    fn into_owned(self) -> PacketData<'static> {
        PacketData {
            cmd_info: self.cmd_info,
            sequence_in: self.sequence_in,
            sequence_out: self.sequence_out,
            data: Cow::Owned(self.data.into_owned()),
        }
    }
}

/// Kind-specific frame contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload<'a> {
    /// See [`FrameKind::Signon`].
    Signon(PacketData<'a>),
    /// See [`FrameKind::Packet`].
    Packet(PacketData<'a>),
    /// See [`FrameKind::SyncTick`].
    SyncTick,
    /// See [`FrameKind::ConsoleCmd`]. Usually a NUL-terminated command line.
    ConsoleCmd(Cow<'a, [u8]>),
    /// See [`FrameKind::UserCmd`].
    UserCmd {
        /// Outgoing command sequence number.
        sequence: u32,
        /// Encoded user command.
        data: Cow<'a, [u8]>,
    },
    /// See [`FrameKind::DataTables`].
    DataTables(Cow<'a, [u8]>),
    /// See [`FrameKind::Stop`].
    Stop,
    /// See [`FrameKind::StringTables`].
    StringTables(Cow<'a, [u8]>),
}

/// One record of the demo stream.
///
/// Payload bytes borrow from the parsed input; [`into_owned`](Frame::into_owned)
/// detaches a frame from it.
///
/// # Examples
///
/// ```
/// use demcut::{Frame, FrameKind, Payload};
///
/// let frame = Frame::new(120, Payload::ConsoleCmd(b"+attack\0".as_slice().into()));
/// assert_eq!(frame.kind(), FrameKind::ConsoleCmd);
/// assert_eq!(frame.tick, 120);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Effective tick. For tick-independent kinds this is inherited from the
    /// preceding frame.
    pub tick: u32,
    /// Kind-specific contents.
    pub payload: Payload<'a>,
}

impl<'a> Frame<'a> {
    /// Build a frame from its parts.
    pub fn new(tick: u32, payload: Payload<'a>) -> Self {
        Self { tick, payload }
    }

    /// Kind derived from the payload variant.
    pub fn kind(&self) -> FrameKind {
        match self.payload {
            Payload::Signon(_) => FrameKind::Signon,
            Payload::Packet(_) => FrameKind::Packet,
            Payload::SyncTick => FrameKind::SyncTick,
            Payload::ConsoleCmd(_) => FrameKind::ConsoleCmd,
            Payload::UserCmd { .. } => FrameKind::UserCmd,
            Payload::DataTables(_) => FrameKind::DataTables,
            Payload::Stop => FrameKind::Stop,
            Payload::StringTables(_) => FrameKind::StringTables,
        }
    }

    /// Detach the frame from the buffer it was parsed from.
    pub fn into_owned(self) -> Frame<'static> {
        let payload = match self.payload {
            Payload::Signon(p) => Payload::Signon(p.into_owned()),
            Payload::Packet(p) => Payload::Packet(p.into_owned()),
            Payload::SyncTick => Payload::SyncTick,
            Payload::ConsoleCmd(d) => Payload::ConsoleCmd(Cow::Owned(d.into_owned())),
            Payload::UserCmd { sequence, data } => Payload::UserCmd {
                sequence,
                data: Cow::Owned(data.into_owned()),
            },
            Payload::DataTables(d) => Payload::DataTables(Cow::Owned(d.into_owned())),
            Payload::Stop => Payload::Stop,
            Payload::StringTables(d) => Payload::StringTables(Cow::Owned(d.into_owned())),
        };
        Frame {
            tick: self.tick,
            payload,
        }
    }
}
