#[cfg(not(feature = "visualization"))]
fn main() {
    eprintln!(
        "The odometer CLI requires the \"visualization\" feature. Rebuild with `--features visualization` to enable the terminal display."
    );
}

#[cfg(feature = "visualization")]
mod cli {
    use std::env;
    use std::io::{self, Read, Write};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use anyhow::Context;
    use odometer::autorun::TickTimer;
    use odometer::engine::{Command, InputEvent, Odometer};
    use odometer::visualization::{DrumRenderer, TerminalRenderer};
    use odometer::CounterConfig;

    #[cfg(feature = "click")]
    use odometer::click::ClickSynth;
    #[cfg(feature = "streaming")]
    use odometer::streaming::{AudioDevice, FeedbackStream, StreamConfig};

    const FRAME_INTERVAL_MS: u64 = 16;

    /// Decodes raw stdin bytes, folding CSI arrow sequences into events.
    struct KeyDecoder {
        // 0 = plain, 1 = saw ESC, 2 = saw ESC [
        esc_state: u8,
    }

    enum KeyAction {
        Event(InputEvent),
        Quit,
        None,
    }

    impl KeyDecoder {
        fn new() -> Self {
            KeyDecoder { esc_state: 0 }
        }

        fn decode(&mut self, byte: u8) -> KeyAction {
            match self.esc_state {
                1 => {
                    self.esc_state = if byte == b'[' { 2 } else { 0 };
                    KeyAction::None
                }
                2 => {
                    self.esc_state = 0;
                    match byte {
                        b'A' | b'C' => KeyAction::Event(InputEvent::Increment),
                        b'B' | b'D' => KeyAction::Event(InputEvent::Decrement),
                        _ => KeyAction::None,
                    }
                }
                _ => match byte {
                    0x1B => {
                        self.esc_state = 1;
                        KeyAction::None
                    }
                    b'+' | b'=' | b'k' => KeyAction::Event(InputEvent::Increment),
                    b'-' | b'j' => KeyAction::Event(InputEvent::Decrement),
                    b'r' | b'R' => KeyAction::Event(InputEvent::Reset),
                    b'a' | b'A' => KeyAction::Event(InputEvent::ToggleAuto),
                    b'q' | b'Q' | b'\x03' => KeyAction::Quit,
                    _ => KeyAction::None,
                },
            }
        }
    }

    #[cfg(unix)]
    fn set_raw_terminal_mode() {
        let _ = std::process::Command::new("stty")
            .arg("-echo")
            .arg("raw")
            .status();
    }

    #[cfg(not(unix))]
    fn set_raw_terminal_mode() {}

    #[cfg(unix)]
    fn restore_terminal_mode() {
        let _ = std::process::Command::new("stty")
            .arg("echo")
            .arg("-raw")
            .status();
    }

    #[cfg(not(unix))]
    fn restore_terminal_mode() {}

    fn print_usage() {
        eprintln!(
            "Usage:\n  odometer [--drums N] [--interval MS] [--config FILE] [--no-sound]{}\n\nFlags:\n  --drums N            Number of drums (1-18, default 6)\n  --interval MS        Auto-run tick interval in milliseconds (default 200)\n  --config FILE        Load configuration from a JSON file\n  --no-sound           Disable the click cue{}\n  -h, --help           Show this help\n\nKeys:\n  + / = / Up / Right   Increment\n  - / Down / Left      Decrement\n  r                    Reset to zero\n  a                    Toggle auto-run\n  q                    Quit\n",
            if cfg!(feature = "click") {
                " [--export-click FILE]"
            } else {
                ""
            },
            if cfg!(feature = "click") {
                "\n  --export-click FILE  Write one click cue to a WAV file and exit"
            } else {
                ""
            }
        );
    }

    pub fn run() -> anyhow::Result<()> {
        println!("Mechanical Odometer - Terminal Drum Counter");
        println!("============================================\n");

        let mut config_file: Option<String> = None;
        let mut drums_override: Option<usize> = None;
        let mut interval_override: Option<u64> = None;
        let mut no_sound = false;
        let mut show_help = false;
        #[cfg(feature = "click")]
        let mut export_click: Option<String> = None;

        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--drums" => match args.next().and_then(|v| v.parse().ok()) {
                    Some(n) => drums_override = Some(n),
                    None => {
                        eprintln!("--drums requires a numeric argument");
                        show_help = true;
                    }
                },
                "--interval" => match args.next().and_then(|v| v.parse().ok()) {
                    Some(ms) => interval_override = Some(ms),
                    None => {
                        eprintln!("--interval requires a numeric argument");
                        show_help = true;
                    }
                },
                "--config" => match args.next() {
                    Some(path) => config_file = Some(path),
                    None => {
                        eprintln!("--config requires a file argument");
                        show_help = true;
                    }
                },
                #[cfg(feature = "click")]
                "--export-click" => match args.next() {
                    Some(path) => export_click = Some(path),
                    None => {
                        eprintln!("--export-click requires a file argument");
                        show_help = true;
                    }
                },
                "--no-sound" => {
                    no_sound = true;
                }
                "--help" | "-h" => {
                    show_help = true;
                }
                _ => {
                    eprintln!("Unknown flag: {}", arg);
                    show_help = true;
                }
            }
        }

        if show_help {
            print_usage();
            return Ok(());
        }

        #[cfg(feature = "click")]
        if let Some(path) = export_click {
            let mut synth = ClickSynth::default();
            synth
                .export_wav(&path)
                .with_context(|| format!("failed to export click cue to '{}'", path))?;
            println!("Click cue written to {}", path);
            return Ok(());
        }

        let mut config = match &config_file {
            Some(path) => CounterConfig::load(path)
                .with_context(|| format!("failed to load config '{}'", path))?,
            None => CounterConfig::default(),
        };
        if let Some(drums) = drums_override {
            config.drum_count = drums;
        }
        if let Some(interval) = interval_override {
            config.auto_interval_ms = interval;
        }
        config.validate().context("invalid configuration")?;

        println!("Configuration:");
        println!("  Drums:         {}", config.drum_count);
        println!("  Max value:     {}", 10i64.pow(config.drum_count as u32) - 1);
        println!("  Auto interval: {} ms", config.auto_interval_ms);
        println!("  Animation:     {} ms\n", config.animation_ms);

        let mut odometer = Odometer::with_config(&config);
        let mut renderer = TerminalRenderer::new(config.drum_count, config.animation_duration());

        #[cfg(feature = "streaming")]
        let mut audio = if no_sound {
            None
        } else {
            match open_audio() {
                Ok(pair) => {
                    println!("Audio device initialized - click cue enabled\n");
                    Some(pair)
                }
                Err(err) => {
                    eprintln!("Audio unavailable, running silent: {}\n", err);
                    None
                }
            }
        };
        #[cfg(not(feature = "streaming"))]
        let _ = no_sound;

        // raw keyboard input thread, one byte at a time
        let (key_tx, key_rx) = mpsc::channel::<u8>();
        let input_running = Arc::new(AtomicBool::new(true));
        let input_running_clone = Arc::clone(&input_running);
        std::thread::spawn(move || {
            set_raw_terminal_mode();
            let mut stdin = io::stdin();
            let mut buf = [0u8; 1];
            while input_running_clone.load(Ordering::Relaxed) {
                if stdin.read_exact(&mut buf).is_ok() {
                    if key_tx.send(buf[0]).is_err() {
                        break;
                    }
                    if buf[0] == b'\x03' {
                        break;
                    }
                }
            }
            restore_terminal_mode();
        });

        let (tick_tx, tick_rx) = mpsc::channel::<()>();
        let mut tick_timer: Option<TickTimer> = None;

        let mut events_processed: u64 = 0;
        let mut clicks_played: u64 = 0;
        let mut decoder = KeyDecoder::new();
        let session_start = Instant::now();
        let mut last_frame = Instant::now();
        let mut running = true;

        // initial un-animated render
        for command in odometer.initialize() {
            if let Command::RenderDrum {
                index,
                angle_degrees,
                animate,
            } = command
            {
                renderer.render_drum(index, angle_degrees, animate);
            }
        }

        print!("\x1B[?25l");
        for _ in 0..4 {
            println!();
        }

        while running {
            std::thread::sleep(Duration::from_millis(FRAME_INTERVAL_MS));

            let mut pending: Vec<InputEvent> = Vec::new();
            while let Ok(byte) = key_rx.try_recv() {
                match decoder.decode(byte) {
                    KeyAction::Event(event) => pending.push(event),
                    KeyAction::Quit => running = false,
                    KeyAction::None => {}
                }
            }
            while tick_rx.try_recv().is_ok() {
                if odometer.auto_running() {
                    pending.push(InputEvent::Tick);
                }
            }

            for event in pending {
                events_processed += 1;
                for command in odometer.handle(event) {
                    match command {
                        Command::RenderDrum {
                            index,
                            angle_degrees,
                            animate,
                        } => renderer.render_drum(index, angle_degrees, animate),
                        Command::PlayClick => {
                            clicks_played += 1;
                            #[cfg(feature = "streaming")]
                            if let Some((stream, _device, synth)) = audio.as_mut() {
                                let samples = synth.render_click();
                                stream.play_click(&samples);
                            }
                        }
                        Command::AutoRunChanged(auto_on) => {
                            if auto_on {
                                tick_timer = Some(TickTimer::start(
                                    odometer.sequencer().interval(),
                                    tick_tx.clone(),
                                ));
                            } else if let Some(mut timer) = tick_timer.take() {
                                timer.stop();
                            }
                        }
                    }
                }
            }

            let now = Instant::now();
            renderer.advance(now - last_frame);
            last_frame = now;

            let [top, mid, bottom] = renderer.render_rows();
            let auto_label = if odometer.auto_running() {
                "AUTO"
            } else {
                "idle"
            };

            print!("\x1B[4A");
            print!("\x1B[2K\r  \x1B[2m{}\x1B[0m\n", top);
            print!("\x1B[2K\r  {}\n", mid);
            print!("\x1B[2K\r  \x1B[2m{}\x1B[0m\n", bottom);
            print!(
                "\x1B[2K\r[{:>6.1}s] value: {:0width$} | {} | clicks: {}\n",
                session_start.elapsed().as_secs_f32(),
                odometer.engine().count(),
                auto_label,
                clicks_played,
                width = config.drum_count,
            );
            io::stdout().flush().ok();
        }

        input_running.store(false, Ordering::Relaxed);
        if let Some(mut timer) = tick_timer.take() {
            timer.stop();
        }
        #[cfg(feature = "streaming")]
        if let Some((_stream, device, _synth)) = audio.take() {
            device.finish();
        }

        restore_terminal_mode();
        println!("\x1B[?25h");
        io::stdout().flush().ok();

        println!("\n=== Session Statistics ===");
        println!(
            "Duration:          {:.2} seconds",
            session_start.elapsed().as_secs_f32()
        );
        println!("Events processed:  {}", events_processed);
        println!("Clicks played:     {}", clicks_played);
        println!(
            "Final value:       {:0width$}",
            odometer.engine().count(),
            width = config.drum_count
        );
        println!("\nOdometer stopped.");

        Ok(())
    }

    #[cfg(feature = "streaming")]
    fn open_audio() -> odometer::Result<(FeedbackStream, AudioDevice, ClickSynth)> {
        let synth = ClickSynth::default();
        let stream_config = StreamConfig::low_latency(synth.sample_rate());
        let stream = FeedbackStream::new(stream_config)?;
        let device = AudioDevice::new(
            stream_config.sample_rate,
            stream_config.channels,
            stream.get_buffer(),
        )?;
        Ok((stream, device, synth))
    }
}

#[cfg(feature = "visualization")]
fn main() -> anyhow::Result<()> {
    cli::run()
}
