//! hand_halo — interactive entry point.

use hand_halo::app::{run, AppConfig};
use halo_field::MessageSet;
use std::io::{self, Write};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Hand Halo — Gesture-Controlled Particle Messages      ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Keyboard simulation  (use --features leap for hardware)");
    println!();

    let cfg = if std::env::args().any(|a| a == "--quick") {
        println!("  Quick-start: 700 particles, default messages\n");
        AppConfig::default()
    } else {
        configure_interactively()
    };

    println!();
    println!("  Opening visualizer window…");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn configure_interactively() -> AppConfig {
    let defaults = MessageSet::default();

    println!("  Messages are drawn with a 5x7 block font — keep them short.");
    println!("  Press Enter to accept a default.");
    println!();

    let vee  = pick_message("peace sign (V)", &defaults.vee);
    let open = pick_message("open palm  (O)", &defaults.open);
    let fist = pick_message("fist       (F)", &defaults.fist);

    let particle_count: usize = {
        let n = read_line("  Particle count (default 700): ")
            .trim()
            .parse()
            .unwrap_or(700);
        n.clamp(50, 5000)
    };

    AppConfig {
        messages: MessageSet { vee, open, fist },
        particle_count,
        ..AppConfig::default()
    }
}

fn pick_message(gesture: &str, default: &str) -> String {
    let line = read_line(&format!("  Message for {} [{}]: ", gesture, default));
    let line = line.trim();
    if line.is_empty() {
        default.to_string()
    } else {
        line.to_string()
    }
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
