/// Coloured matrix dumps for the terminal
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use mstack_core::Transform;
use std::io::Write;

use crate::JointReport;

/// Writes joint reports as indented, coloured blocks
pub struct MatrixPrinter {
    indent: usize,
}

impl MatrixPrinter {
    pub fn new(indent: usize) -> Self {
        Self { indent }
    }

    pub fn draw<W: Write>(&self, writer: &mut W, reports: &[JointReport]) -> std::io::Result<()> {
        for report in reports {
            self.draw_report(writer, report)?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    fn draw_report<W: Write>(&self, writer: &mut W, report: &JointReport) -> std::io::Result<()> {
        let pad = " ".repeat(report.depth.saturating_sub(1) * self.indent);
        let [x, y, z] = report.origin;

        writer.queue(SetForegroundColor(Color::Yellow))?;
        writer.queue(Print(format!("{}{} (depth {})", pad, report.name, report.depth)))?;
        writer.queue(SetForegroundColor(Color::DarkGrey))?;
        writer.queue(Print(format!("  origin ({:.3}, {:.3}, {:.3})", x, y, z)))?;
        match report.ndc {
            Some([nx, ny, nz]) => {
                // Flag anything outside the view volume
                let visible = [nx, ny, nz].iter().all(|c| c.abs() <= 1.0);
                let color = if visible { Color::Green } else { Color::Red };
                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(format!("  ndc ({:.3}, {:.3}, {:.3})", nx, ny, nz)))?;
            }
            None => {
                writer.queue(SetForegroundColor(Color::Red))?;
                writer.queue(Print("  ndc (behind camera)"))?;
            }
        }
        writer.queue(Print('\n'))?;

        writer.queue(SetForegroundColor(Color::Cyan))?;
        for line in Transform::debug_format(&report.model).lines() {
            writer.queue(Print(format!("{}  {}\n", pad, line)))?;
        }
        Ok(())
    }
}

impl Default for MatrixPrinter {
    fn default() -> Self {
        Self::new(2)
    }
}
