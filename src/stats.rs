//! Knowledge base statistics.
//!
//! Used by `kbchat stats` to show what the loaded dataset covers: entry and
//! category totals and a per-category breakdown.

use anyhow::Result;

use kb_chat_core::models::StoreStats;

use crate::config::Config;
use crate::knowledge;

/// Run the stats command: load the dataset and print a summary.
pub fn run_stats(config: &Config) -> Result<()> {
    let store = knowledge::load_from_config(config)?;
    let stats = store.stats();
    let dataset_size = std::fs::metadata(&config.knowledge.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("kbchat knowledge base stats");
    println!("===========================");
    println!();
    println!("  Dataset:     {}", config.knowledge.path.display());
    println!("  Size:        {}", format_bytes(dataset_size));
    println!();
    print!("{}", render_breakdown(&stats));
    println!();

    Ok(())
}

/// Totals plus the per-category table, as printed by `kbchat stats`.
fn render_breakdown(stats: &StoreStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("  Questions:   {}\n", stats.total_questions));
    out.push_str(&format!("  Categories:  {}\n", stats.total_categories));

    if !stats.category_breakdown.is_empty() {
        out.push('\n');
        out.push_str("  By category:\n");
        out.push_str(&format!("  {:<28} {:>6} {:>6}\n", "CATEGORY", "COUNT", "SHARE"));
        out.push_str(&format!("  {}\n", "-".repeat(42)));
        for c in &stats.category_breakdown {
            out.push_str(&format!(
                "  {:<28} {:>6} {:>5}%\n",
                c.category,
                c.count,
                percent(c.count, stats.total_questions)
            ));
        }
    }
    out
}

fn percent(part: usize, total: usize) -> usize {
    if total > 0 {
        (part * 100) / total
    } else {
        0
    }
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_chat_core::models::CategoryCount;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_breakdown_table() {
        let stats = StoreStats {
            total_questions: 4,
            total_categories: 2,
            category_breakdown: vec![
                CategoryCount {
                    category: "pje".to_string(),
                    count: 3,
                },
                CategoryCount {
                    category: "vidaas".to_string(),
                    count: 1,
                },
            ],
        };
        let out = render_breakdown(&stats);
        assert!(out.contains("Questions:   4"));
        assert!(out.contains("CATEGORY"));
        let pje_line = out.lines().find(|l| l.trim_start().starts_with("pje")).unwrap();
        assert!(pje_line.contains("75%"));
    }

    #[test]
    fn test_empty_store_has_no_table() {
        let out = render_breakdown(&StoreStats {
            total_questions: 0,
            total_categories: 0,
            category_breakdown: vec![],
        });
        assert!(!out.contains("CATEGORY"));
        assert_eq!(percent(1, 0), 0);
    }
}
