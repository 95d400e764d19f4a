//! Playback state machine.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Stopped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent {
    Play,
    TogglePause,
    Stop,
    TrackFinished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionResult {
    None,
    StateChanged(PlaybackState),
}

#[derive(Debug, Default)]
pub struct TransportFsm {
    state: PlaybackState,
}

impl TransportFsm {
    pub fn new() -> Self {
        Self {
            state: PlaybackState::Stopped,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn transition(&mut self, event: TransportEvent) -> TransitionResult {
        use PlaybackState::*;
        use TransportEvent::*;

        let next = match (event, self.state) {
            (Play, Stopped | Paused) => Some(Playing),
            (TogglePause, Playing) => Some(Paused),
            (TogglePause, Paused) => Some(Playing),
            (Stop | TrackFinished, Playing | Paused) => Some(Stopped),
            _ => None,
        };

        match next {
            Some(state) => {
                self.state = state;
                TransitionResult::StateChanged(state)
            }
            None => TransitionResult::None,
        }
    }
}
