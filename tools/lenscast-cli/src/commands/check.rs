//! Check input capabilities.

use lenscast_frame_model::geometry::Rect;
use lenscast_input_tracker::backends::detect_best_backend;
use lenscast_input_tracker::InputStatus;

pub fn run(width: u32, height: u32) -> anyhow::Result<()> {
    println!("Lenscast Input Check");
    println!("{}", "=".repeat(50));

    let bounds = Rect::new(0.0, 0.0, width as f64, height as f64);
    let mut backend = detect_best_backend(bounds);
    let caps = backend.capabilities();

    println!("Backend: {}", backend.name());
    let mark = |ok: bool| if ok { "[OK]  " } else { "[MISS]" };
    println!("{} Pointer samples", mark(caps.move_samples));
    println!("{} Button edges (click zoom)", mark(caps.button_edges));
    println!("{} Key edges (manual zoom)", mark(caps.key_edges));

    println!();
    match caps.status() {
        InputStatus::Active => println!("Input hook available. Focus zoom is ready."),
        InputStatus::Degraded => println!(
            "Input hook unavailable. Frames will be composed without zoom; \
             on Linux, add your user to the 'input' group."
        ),
    }

    backend.shutdown();
    Ok(())
}
