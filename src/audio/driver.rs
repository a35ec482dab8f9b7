//! Per-frame analysis sampling and playback state tracking.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::analyser::{validate_fft_size, AnalyserNode, DEFAULT_FFT_SIZE};
use super::context::{AudioContext, ContextState};
use super::graph::{AudioGraph, MediaSourceNode};
use super::media::{MediaElement, MediaEvent, MediaObserver};
use crate::error::{Result, VizError};

/// Transport state as last reported by the media element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    /// Seconds
    pub current_time: f64,
    /// Seconds, 0 until known
    pub duration: f64,
    pub volume: f32,
    pub muted: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: 1.0,
            muted: false,
        }
    }
}

/// Buffers borrowed from the driver for one tick.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisFrame<'a> {
    pub frequency: &'a [u8],
    pub time: &'a [u8],
}

/// Owns the analysis side of one media element and refreshes the frequency
/// and time buffers once per frame.
pub struct AnalysisDriver {
    media: Option<Arc<MediaElement>>,
    observer: Option<MediaObserver>,
    /// Claimed source waiting for metadata before the graph is built
    pending_source: Option<MediaSourceNode>,
    graph: Option<AudioGraph>,
    context: AudioContext,
    fft_size: usize,
    frequency: Vec<u8>,
    time: Vec<u8>,
    playback: PlaybackState,
}

impl AnalysisDriver {
    pub fn new() -> Self {
        Self {
            media: None,
            observer: None,
            pending_source: None,
            graph: None,
            context: AudioContext::new(),
            fft_size: DEFAULT_FFT_SIZE,
            frequency: Vec::new(),
            time: Vec::new(),
            playback: PlaybackState::default(),
        }
    }

    /// Attach to `media` with an analyser of `fft_size` points.
    pub fn initialize(&mut self, media: Arc<MediaElement>, fft_size: usize) -> Result<()> {
        if self.media.is_some() {
            return Err(VizError::GraphAlreadyConnected);
        }
        let fft_size = validate_fft_size(fft_size)?;
        let source = MediaSourceNode::new(&media)?;

        self.observer = Some(media.subscribe());
        self.fft_size = fft_size;
        self.frequency = vec![0; fft_size / 2];
        self.time = vec![128; fft_size / 2];

        self.context = AudioContext::new();
        if media.is_playing() {
            self.context.resume()?;
        }

        self.playback = PlaybackState {
            is_playing: media.is_playing(),
            current_time: media.current_time(),
            duration: media.track_info().map(|t| t.duration_secs).unwrap_or(0.0),
            volume: media.volume(),
            muted: media.is_muted(),
        };

        if media.has_metadata() {
            self.connect(source)?;
        } else {
            debug!("waiting for metadata before building the audio graph");
            self.pending_source = Some(source);
        }

        info!(element = media.id(), fft_size, "analysis driver initialized");
        self.media = Some(media);
        Ok(())
    }

    fn connect(&mut self, source: MediaSourceNode) -> Result<()> {
        let analyser = AnalyserNode::new(self.fft_size)?;
        self.graph = Some(AudioGraph::connect(source, analyser));
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.graph.as_ref().is_some_and(|g| g.is_connected())
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Drain media events and refresh both buffers while the context runs.
    /// A paused or ended element feeds the analyser silence, so the spectrum
    /// decays to zero. A suspended context returns the last buffers unchanged.
    pub fn sample(&mut self) -> AnalysisFrame<'_> {
        self.pump_events();

        if self.context.is_running() {
            if let Some(graph) = self.graph.as_mut() {
                graph.sample_into(&mut self.frequency, &mut self.time, self.playback.is_playing);
            }
        }

        AnalysisFrame {
            frequency: &self.frequency,
            time: &self.time,
        }
    }

    pub fn pump_events(&mut self) {
        let events: Vec<MediaEvent> = match &self.observer {
            Some(observer) => observer.drain().collect(),
            None => return,
        };
        for event in events {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::Play => {
                self.playback.is_playing = true;
                if let Err(e) = self.context.resume() {
                    warn!("could not resume audio context: {}", e);
                }
            }
            MediaEvent::Pause => self.playback.is_playing = false,
            MediaEvent::TimeUpdate(t) => self.playback.current_time = t,
            MediaEvent::DurationChange(d) => self.playback.duration = d,
            MediaEvent::Ended => {
                self.playback.is_playing = false;
                self.playback.current_time = self.playback.duration;
            }
            MediaEvent::VolumeChange { volume, muted } => {
                self.playback.volume = volume;
                self.playback.muted = muted;
            }
            MediaEvent::Emptied => {
                self.playback.is_playing = false;
                self.playback.current_time = 0.0;
                self.playback.duration = 0.0;
                self.frequency.fill(0);
                self.time.fill(128);
            }
            MediaEvent::LoadedMetadata => {
                if let Some(source) = self.pending_source.take() {
                    if let Err(e) = self.connect(source) {
                        warn!("failed to build audio graph: {}", e);
                    }
                }
            }
        }
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    pub fn context_state(&self) -> ContextState {
        self.context.state()
    }

    pub fn frequency(&self) -> &[u8] {
        &self.frequency
    }

    pub fn time(&self) -> &[u8] {
        &self.time
    }

    /// Detach from the media element and release everything `initialize`
    /// acquired. Safe to call more than once.
    pub fn teardown(&mut self) {
        let Some(media) = self.media.take() else {
            return;
        };
        if let Some(observer) = self.observer.take() {
            media.unsubscribe(observer.id());
        }
        if let Some(mut graph) = self.graph.take() {
            graph.disconnect();
        }
        self.pending_source = None;
        media.release_source();
        self.context.close();
        info!(element = media.id(), "analysis driver torn down");
    }

    /// Rebuild the graph with a new FFT size on the same element.
    pub fn reconfigure(&mut self, fft_size: usize) -> Result<()> {
        let fft_size = validate_fft_size(fft_size)?;
        let Some(media) = self.media.clone() else {
            self.fft_size = fft_size;
            return Ok(());
        };
        self.teardown();
        self.initialize(media, fft_size)
    }
}

impl Default for AnalysisDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AnalysisDriver {
    fn drop(&mut self) {
        self.teardown();
    }
}
