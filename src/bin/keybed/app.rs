//! Application wiring: audio stream, command queues, terminal lifecycle.

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{execute, terminal::supports_keyboard_enhancement};
use rtrb::RingBuffer;

use keybed::synth::{SynthHandle, VoiceBank, VoiceCommand};
use keybed::MAX_BLOCK_SIZE;

use crate::ui::UiApp;

/// Capacity of the voice-command queue. Far more than a pair of hands can
/// produce between two audio callbacks.
const COMMAND_QUEUE_SIZE: usize = 256;

/// Capacity of the sample tap feeding the scope and spectrum views.
const AUDIO_TAP_SIZE: usize = 8192;

/// Build the audio stream and the UI, run until quit, restore the terminal.
pub fn run() -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    let (cmd_tx, cmd_rx) = RingBuffer::<VoiceCommand>::new(COMMAND_QUEUE_SIZE);
    let (mut tap_tx, tap_rx) = RingBuffer::<f32>::new(AUDIO_TAP_SIZE);

    let mut bank = VoiceBank::new(sample_rate, cmd_rx);
    let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames_to_render =
                        (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let block = &mut render_buf[..frames_to_render];

                    bank.render_block(block);

                    // Mono fan-out to every channel, plus the lossy UI tap.
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = s;
                        }
                        let _ = tap_tx.push(s);
                    }

                    frames_written += frames_to_render;
                }
            },
            |err| eprintln!("audio error: {err}"),
            None,
        )
        .wrap_err("failed to build output stream")?;

    stream.play().wrap_err("failed to start audio stream")?;

    let mut terminal = ratatui::init();

    // Release events only arrive on terminals that implement the kitty
    // keyboard protocol; everywhere else the UI falls back to auto-repeat
    // hold tracking.
    let key_release_supported = supports_keyboard_enhancement().unwrap_or(false);
    let mut stdout = std::io::stdout();
    execute!(stdout, EnableMouseCapture)?;
    if key_release_supported {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }

    let synth = SynthHandle::new(cmd_tx);
    let result = UiApp::new(synth, tap_rx, sample_rate, key_release_supported)
        .run(&mut terminal);

    if key_release_supported {
        let _ = execute!(stdout, PopKeyboardEnhancementFlags);
    }
    let _ = execute!(stdout, DisableMouseCapture);
    ratatui::restore();

    result
}
