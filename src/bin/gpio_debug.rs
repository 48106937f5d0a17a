//! Minimal GPIO debug tool - prints every line change on the toy's inputs
//!
//! Usage: cargo run --bin gpio-debug [-- --active-high] [--seconds 30]
//!
//! Always uses the sysfs backend, with pins and polarity from
//! config/toy_settings.json. Ctrl-C to quit.

use std::thread;
use std::time::{Duration, Instant};

use spincat::input::{Channel, InputSource, Level, SysfsGpio};
use spincat::settings::ToySettings;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut settings = ToySettings::load();
    settings.apply_args(&args);

    let run_for = args
        .iter()
        .position(|a| a == "--seconds")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs);

    println!("=== GPIO Debug Tool ===");
    println!("Root: {}", settings.gpio_root);
    println!(
        "Button pin {}, sensor pins {:?}, {:?}",
        settings.button_pin, settings.sensor_pins, settings.polarity
    );
    println!("Trigger the button or any sensor.\n");

    let mut gpio = match SysfsGpio::open(&settings.gpio_root, settings.button_pin, &settings.sensor_pins) {
        Ok(gpio) => gpio,
        Err(e) => {
            eprintln!("Cannot open GPIO: {}", e);
            std::process::exit(1);
        }
    };

    let started = Instant::now();
    // Outer None: not read yet. Inner None: last read failed.
    let mut last: Vec<Option<Option<Level>>> = vec![None; Channel::ALL.len()];

    while run_for.is_none_or(|limit| started.elapsed() < limit) {
        for (i, channel) in Channel::ALL.into_iter().enumerate() {
            let reading = gpio.read_channel(channel);
            let level = reading.as_ref().ok().copied();
            if last[i] == Some(level) {
                continue;
            }
            let stamp = started.elapsed().as_millis();
            match (&reading, level) {
                (Ok(_), Some(level)) => {
                    let state = if settings.polarity.is_triggered(level) {
                        "TRIGGERED"
                    } else {
                        "released"
                    };
                    println!("[{:>7} ms] {:<9} {:?} -> {}", stamp, channel.to_string(), level, state);
                }
                (Err(e), _) => println!("[{:>7} ms] {:<9} read failed: {}", stamp, channel.to_string(), e),
                _ => {}
            }
            last[i] = Some(level);
        }
        thread::sleep(settings.poll_interval());
    }

    gpio.release();
}
