// Audio module - cpal output stream fed from a bounded sample queue
//
// The core pushes 44.1 kHz mono samples once per frame; the cpal callback
// drains them at its own pace. The queue is bounded to roughly a quarter
// second so a stalled consumer cannot grow it without limit, and underruns
// play silence.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, Stream, StreamConfig};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::apu::SAMPLE_RATE;

/// Maximum queued samples (~250 ms) before old ones are dropped
const QUEUE_LIMIT: usize = SAMPLE_RATE as usize / 4;

/// Errors from audio device setup
#[derive(Debug)]
pub enum AudioError {
    /// No output device is available
    NoDevice,
    /// The stream could not be built or started
    Stream(String),
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioError::NoDevice => write!(f, "no audio output device available"),
            AudioError::Stream(msg) => write!(f, "audio stream error: {}", msg),
        }
    }
}

impl std::error::Error for AudioError {}

/// Audio output handle
pub struct AudioOutput {
    _stream: Stream,
    queue: Arc<Mutex<VecDeque<f32>>>,
}

impl AudioOutput {
    /// Open the default output device at 44.1 kHz mono
    pub fn new() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        let stream_config = StreamConfig {
            channels: 1,
            sample_rate: SampleRate(SAMPLE_RATE),
            buffer_size: cpal::BufferSize::Default,
        };

        let queue = Arc::new(Mutex::new(VecDeque::new()));
        let callback_queue = Arc::clone(&queue);

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut queue = callback_queue.lock().unwrap();
                    for sample in data.iter_mut() {
                        *sample = queue.pop_front().unwrap_or(0.0);
                    }
                },
                |err| eprintln!("audio stream error: {}", err),
                None,
            )
            .map_err(|err| AudioError::Stream(err.to_string()))?;

        stream
            .play()
            .map_err(|err| AudioError::Stream(err.to_string()))?;

        Ok(AudioOutput {
            _stream: stream,
            queue,
        })
    }

    /// Queue one frame's worth of samples, applying the output gain
    pub fn queue_samples(&self, samples: &[i16], volume: f32) {
        let mut queue = self.queue.lock().unwrap();

        for &sample in samples {
            queue.push_back(sample as f32 / i16::MAX as f32 * volume);
        }

        // Shed the oldest samples rather than drifting ever further behind
        while queue.len() > QUEUE_LIMIT {
            queue.pop_front();
        }
    }

    /// Samples currently waiting in the queue
    pub fn queued_len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }
}
