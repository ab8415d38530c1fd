use crate::models::Transaction;
use anyhow::{Context, Result};
use std::path::Path;

/// Write a transaction ledger to a CSV file, oldest first.
pub fn save_transactions_to_csv(transactions: &[Transaction], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    writer.write_record(["id", "userId", "kind", "amount", "timestamp", "balanceAfter"])?;
    for tx in transactions {
        writer.write_record([
            tx.id.clone(),
            tx.user_id.clone(),
            tx.kind.as_str().to_string(),
            format!("{:.2}", tx.amount),
            tx.timestamp.to_rfc3339(),
            format!("{:.2}", tx.balance_after),
        ])?;
    }
    writer.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;
    use chrono::Utc;

    #[test]
    fn test_csv_has_header_and_one_row_per_transaction() {
        let transactions = vec![
            Transaction {
                id: "t1".into(),
                user_id: "u1".into(),
                kind: TransactionKind::Deposit,
                amount: 1000.0,
                timestamp: Utc::now(),
                balance_after: 1000.0,
            },
            Transaction {
                id: "t2".into(),
                user_id: "u1".into(),
                kind: TransactionKind::Bet,
                amount: 100.0,
                timestamp: Utc::now(),
                balance_after: 900.0,
            },
        ];

        let path = std::env::temp_dir().join("betbook_export_test.csv");
        save_transactions_to_csv(&transactions, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,userId,kind"));
        assert!(lines[1].contains("deposit"));
        assert!(lines[2].contains("900.00"));
        std::fs::remove_file(&path).ok();
    }
}
