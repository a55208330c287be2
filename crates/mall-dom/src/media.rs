//! Media element state
//!
//! Playback state carried by `<video>` and `<audio>` elements.

/// Network state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NetworkState {
    #[default]
    Empty = 0,
    Idle = 1,
    Loading = 2,
    NoSource = 3,
}

/// Ready state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    #[default]
    HaveNothing = 0,
    HaveMetadata = 1,
    HaveCurrentData = 2,
    HaveFutureData = 3,
    HaveEnoughData = 4,
}

/// Playback state of one media element
#[derive(Debug, Clone, PartialEq)]
pub struct MediaState {
    /// Resource URL selected by the last `load()`
    pub current_src: String,
    pub network_state: NetworkState,
    pub ready_state: ReadyState,
    pub current_time: f64,
    pub paused: bool,
    /// Number of `load()` calls, used to assert one-shot source assignment
    pub load_count: u32,
}

impl MediaState {
    pub fn new() -> Self {
        Self {
            current_src: String::new(),
            network_state: NetworkState::Empty,
            ready_state: ReadyState::HaveNothing,
            current_time: 0.0,
            paused: true,
            load_count: 0,
        }
    }

    /// Start playback
    pub fn play(&mut self) {
        self.paused = false;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Reset and begin fetching `src`
    pub fn load(&mut self, src: &str) {
        self.current_src = src.to_string();
        self.network_state = if src.is_empty() {
            NetworkState::NoSource
        } else {
            NetworkState::Loading
        };
        self.ready_state = ReadyState::HaveNothing;
        self.current_time = 0.0;
        self.paused = true;
        self.load_count += 1;
    }

    pub fn seek(&mut self, time: f64) {
        self.current_time = time.max(0.0);
    }

    /// Advance buffering; returns `true` when the element first reaches
    /// `HaveCurrentData` (the point where `loadeddata` fires)
    pub fn set_ready_state(&mut self, state: ReadyState) -> bool {
        let crossed = self.ready_state < ReadyState::HaveCurrentData
            && state >= ReadyState::HaveCurrentData;
        self.ready_state = state;
        if state >= ReadyState::HaveEnoughData {
            self.network_state = NetworkState::Idle;
        }
        crossed
    }
}

impl Default for MediaState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_resets_playback() {
        let mut media = MediaState::new();
        media.set_ready_state(ReadyState::HaveEnoughData);
        media.play();
        media.seek(12.5);

        media.load("assets/hero.mp4");
        assert!(media.paused);
        assert_eq!(media.current_time, 0.0);
        assert_eq!(media.ready_state, ReadyState::HaveNothing);
        assert_eq!(media.network_state, NetworkState::Loading);
        assert_eq!(media.load_count, 1);
    }

    #[test]
    fn test_loadeddata_crossing() {
        let mut media = MediaState::new();
        assert!(!media.set_ready_state(ReadyState::HaveMetadata));
        assert!(media.set_ready_state(ReadyState::HaveCurrentData));
        assert!(!media.set_ready_state(ReadyState::HaveEnoughData));
    }

    #[test]
    fn test_seek_clamps_negative() {
        let mut media = MediaState::new();
        media.seek(-3.0);
        assert_eq!(media.current_time, 0.0);
    }
}
