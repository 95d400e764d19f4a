//! Transport: playback state, playlist and incoming commands.

mod command;
mod fsm;
mod playlist;

pub use command::{
    command_channel, shutdown_channel, CommandSender, ShutdownTrigger, TransportCommand,
    COMMAND_CAPACITY,
};
pub use fsm::{PlaybackState, TransitionResult, TransportEvent, TransportFsm};
pub use playlist::{Playlist, Step};
