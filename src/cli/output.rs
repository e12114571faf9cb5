//! Output formatting for CLI

use crate::analysis::{Figure, PlotKind};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print one figure as an indented table
pub fn print_figure(figure: &Figure) {
    print_subsection(&format!(
        "Figure {} ({} vs {})",
        figure.id, figure.y_label, figure.x_label
    ));
    for series in &figure.series {
        println!("  {}", series.name);
        for point in &series.points {
            let label = point.label.as_deref().unwrap_or("-");
            match (figure.kind, point.x) {
                (PlotKind::Scatter, Some(x)) => {
                    println!("    {label:20} x = {x:>9.4}  y = {:>9.4}", point.y)
                }
                _ => println!("    {label:20} {:>9.4}", point.y),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_separators() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(30_000), "30,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }
}
