//! Basic reconciliation example

use ledger_reconcile::{write_csv, FieldMapping, MatchConfig, Reconciler};
use std::collections::HashMap;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn row(cells: &[(&str, &str)]) -> HashMap<String, String> {
    cells
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG wins, otherwise info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    println!("🏦 Ledger Reconcile - Basic Reconciliation Example\n");

    // 1. Rows as they come out of two differently shaped exports
    let bank_rows = vec![
        row(&[("Posting Date", "01/02/2024"), ("Amount", "$2,500.00"), ("Memo", "ACME Corp payment")]),
        row(&[("Posting Date", "01/03/2024"), ("Amount", "-120.00"), ("Memo", "Electricity")]),
        row(&[("Posting Date", "01/08/2024"), ("Amount", "-45.99"), ("Memo", "Software subscription")]),
        row(&[("Posting Date", "01/09/2024"), ("Amount", "-15.00"), ("Memo", "Monthly fee")]),
    ];
    let book_rows = vec![
        row(&[("date", "2024-01-02"), ("total", "2500"), ("narration", "Invoice INV-1001")]),
        row(&[("date", "2024-01-05"), ("total", "-120"), ("narration", "Power bill")]),
        row(&[("date", "2024-01-30"), ("total", "-45.99"), ("narration", "SaaS renewal")]),
        row(&[("date", "2024-01-31"), ("total", "-300.00"), ("narration", "Accrued rent")]),
    ];

    let bank_mapping = FieldMapping::new(
        "Posting Date".to_string(),
        "Amount".to_string(),
        "Memo".to_string(),
    );
    let book_mapping = FieldMapping::new(
        "date".to_string(),
        "total".to_string(),
        "narration".to_string(),
    );

    // 2. Auto-match
    println!("🔗 Running auto-match...");
    let mut reconciler = Reconciler::new(MatchConfig::default());
    let stats = reconciler.run(&bank_rows, &bank_mapping, &book_rows, &book_mapping)?;
    println!(
        "  ✓ {} of {} bank transactions matched ({}%): {} exact, {} fuzzy\n",
        stats.matched, stats.total, stats.match_rate, stats.exact_matches, stats.fuzzy_matches
    );

    // 3. Resolve a leftover by hand
    println!("✍️  Manual matching...");
    let selected_id = reconciler
        .store()
        .unmatched_bank()
        .iter()
        .find(|r| r.record.description.contains("Software"))
        .map(|r| r.id.clone());

    if let Some(selected_id) = selected_id {
        let candidate_id = reconciler
            .candidates_for(&selected_id, "45.99")?
            .candidates
            .first()
            .map(|r| r.id.clone());

        if let Some(candidate_id) = candidate_id {
            let pair = reconciler.manual_match(&selected_id, &candidate_id)?;
            println!(
                "  ✓ Linked '{}' with '{}' ({})",
                pair.bank.record.description, pair.book.record.description, pair.confidence
            );
        }
    }
    println!();

    // 4. Summary
    let stats = reconciler.statistics();
    println!("📊 Summary");
    println!("  Match rate:         {}%", stats.match_rate);
    println!("  Matched value:      {}", stats.matched_value);
    println!("  Unmatched bank:     {} ({})", stats.unmatched_bank, stats.unmatched_bank_value);
    println!("  Unmatched books:    {}", stats.unmatched_book);

    let report = reconciler.validate_integrity();
    println!("  Integrity:          {}\n", if report.is_valid { "OK" } else { "BROKEN" });

    // 5. Export
    println!("📄 matched.csv");
    write_csv(&reconciler.export_matched(), std::io::stdout())?;
    println!("\n📄 unmatched_books.csv");
    write_csv(&reconciler.export_unmatched_book(), std::io::stdout())?;

    Ok(())
}
