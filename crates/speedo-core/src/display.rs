//! One-line status readout rendered every refresh tick.

use crate::cadence::Cadence;
use std::fmt;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub track: String,
    pub cadence: Cadence,
    pub rate: f32,
    pub position: Option<Duration>,
    pub duration: Option<Duration>,
}

impl StatusLine {
    pub fn new(track: &Path, cadence: Cadence, rate: f32) -> Self {
        let track = track
            .file_name()
            .unwrap_or(track.as_os_str())
            .to_string_lossy()
            .into_owned();

        Self {
            track,
            cadence,
            rate,
            position: None,
            duration: None,
        }
    }

    pub fn with_times(mut self, position: Option<Duration>, duration: Option<Duration>) -> Self {
        self.position = position;
        self.duration = duration;
        self
    }
}

fn clock(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t", self.track)?;
        match self.cadence.rpm {
            Some(rpm) => write!(f, "{rpm:5.0}\t")?,
            None => write!(f, "{:>5}\t", "-")?,
        }
        write!(f, "{:05.2}", self.cadence.percent())?;

        match (self.position, self.duration) {
            (Some(pos), Some(total)) => write!(f, "\t{}/{}", clock(pos), clock(total)),
            (None, Some(total)) => write!(f, "\t{}", clock(total)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_line() {
        let cadence = Cadence {
            rpm: Some(120.0),
            multiplier: 0.12,
        };
        let line = StatusLine::new(Path::new("/music/ride.mp3"), cadence, 0.37);
        assert_eq!(line.to_string(), "ride.mp3\t  120\t12.00");
    }

    #[test]
    fn test_voltage_line() {
        let line = StatusLine::new(Path::new("hill.wav"), Cadence::from_multiplier(0.75), 0.75);
        assert_eq!(line.to_string(), "hill.wav\t    -\t75.00");
    }

    #[test]
    fn test_small_percent_zero_padded() {
        let cadence = Cadence {
            rpm: Some(30.0),
            multiplier: 0.03,
        };
        let line = StatusLine::new(Path::new("a.mp3"), cadence, 0.28);
        assert_eq!(line.to_string(), "a.mp3\t   30\t03.00");
    }

    #[test]
    fn test_times() {
        let line = StatusLine::new(Path::new("a.mp3"), Cadence::from_multiplier(1.0), 1.0)
            .with_times(Some(Duration::from_secs(65)), Some(Duration::from_secs(200)));
        assert_eq!(line.to_string(), "a.mp3\t    -\t100.00\t1:05/3:20");
    }
}
