/// mstack Terminal Demo - Articulated Arm
/// 
/// Walks a jointed arm through the transform stack and prints each joint's
/// committed model matrix.
/// Usage:
///   mstack-terminal [base-yaw-degrees]
/// Set RUST_LOG=debug (or trace) to watch the stack operations.

use crossterm::terminal;
use mstack_terminal::{demo_arm, ArmDemo, MatrixPrinter};
use std::error::Error;
use std::io::{stdout, Write};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let yaw_degrees: f32 = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse()
            .map_err(|e| format!("Invalid base yaw {:?}: {}", arg, e))?,
        None => 30.0,
    };

    let (width, height) = viewport_size(terminal::size().ok());

    let mut demo = ArmDemo::new(width as u32, height as u32)?;
    let reports = demo.walk(&demo_arm(yaw_degrees.to_radians()))?;

    let mut stdout = stdout();
    MatrixPrinter::default().draw(&mut stdout, &reports)?;
    stdout.flush()?;

    log::info!("stack back at depth {}", demo.stack().size());
    Ok(())
}

/// Fall back to a classic 80x24 viewport when not attached to a terminal or
/// when the terminal reports an empty size
fn viewport_size(reported: Option<(u16, u16)>) -> (u16, u16) {
    match reported {
        Some((width, height)) if width > 0 && height > 0 => (width, height),
        _ => (80, 24),
    }
}
