// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::geometry::GeometryStats;
use crate::slicer::{HullSide, SlicedHull};
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report the outcome of a slice with colors
    pub fn report_slice(file: &str, hull: &SlicedHull, duration: Duration) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Sliced:".bold(), file.cyan());
        println!("{}", "━".repeat(80).bright_black());

        for side in [HullSide::Upper, HullSide::Lower] {
            let mesh = hull.hull(side);
            println!(
                "  {} {} triangles in {} ranges",
                format!("{}:", Self::side_name(side)).bright_black(),
                mesh.triangle_count().to_string().cyan(),
                mesh.submesh_count().to_string().cyan()
            );
        }

        match hull.cap_submesh() {
            Some(index) => println!(
                "  {} range {}",
                "Cross-section:".bright_black(),
                index.to_string().green()
            ),
            None => println!(
                "  {} {}",
                "Cross-section:".bright_black(),
                "not triangulated, hulls are open".yellow()
            ),
        }

        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report mesh statistics
    pub fn report_stats(file: &str, stats: &GeometryStats) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Mesh:".bold(), file.cyan());
        println!("{}", "━".repeat(80).bright_black());

        Self::print_field("Vertices", stats.vertex_count.to_string());
        Self::print_field("Triangles", stats.triangle_count.to_string());
        Self::print_field("Submeshes", stats.submesh_count.to_string());
        Self::print_field("Volume", format!("{:.4}", stats.volume));
        Self::print_field("Surface Area", format!("{:.4}", stats.surface_area));
        Self::print_field(
            "Centroid",
            format!(
                "({:.3}, {:.3}, {:.3})",
                stats.centroid[0], stats.centroid[1], stats.centroid[2]
            ),
        );
        let [x, y, z] = stats.extent();
        Self::print_field("Size", format!("{:.3} × {:.3} × {:.3}", x, y, z));

        let closed = if stats.is_closed {
            "Yes".green()
        } else {
            "No".yellow()
        };
        println!("  {} {}", "Closed:".bright_black(), closed);
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    fn print_field(name: &str, value: String) {
        println!("  {} {}", format!("{}:", name).bright_black(), value.cyan());
    }

    fn side_name(side: HullSide) -> &'static str {
        match side {
            HullSide::Upper => "Upper",
            HullSide::Lower => "Lower",
        }
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}
