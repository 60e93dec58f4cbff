//! Builds the financial context sent along with insight requests.

use api_types::insight::{
    AccountContext, AnalysisContext, MonthContext, QuestionContext, TransactionContext,
};
use chrono::NaiveDate;
use engine::{Account, MonthlySummary, Transaction};

/// How many of the newest transactions a question carries by default.
pub const DEFAULT_RECENT_TRANSACTIONS: usize = 20;

fn transaction(tx: &Transaction) -> TransactionContext {
    TransactionContext {
        id: tx.id.clone(),
        account_id: tx.account_id.clone(),
        date: tx.date.clone(),
        amount: tx.amount.to_major(),
        currency: tx.currency.code().to_string(),
        category: tx.category.clone(),
        merchant: tx.merchant.clone(),
        description: tx.description.clone(),
        is_recurring: tx.is_recurring,
    }
}

fn month(summary: &MonthlySummary) -> MonthContext {
    MonthContext {
        month: summary.month.clone(),
        income: summary.income.to_major(),
        expenses: summary.expenses.to_major(),
        savings: summary.savings.to_major(),
    }
}

/// Context for a free-form question.
///
/// `transactions` is expected newest first; only the first `recent` are
/// included.
pub fn question_context(
    today: NaiveDate,
    accounts: &[Account],
    transactions: &[Transaction],
    summary: &[MonthlySummary],
    recent: usize,
) -> QuestionContext {
    QuestionContext {
        current_date: today.format("%Y-%m-%d").to_string(),
        accounts: accounts
            .iter()
            .map(|a| AccountContext {
                name: a.name.clone(),
                balance: a.balance.to_major(),
                kind: a.kind.as_str().to_string(),
            })
            .collect(),
        recent_transactions: transactions.iter().take(recent).map(transaction).collect(),
        monthly_summary: summary.iter().map(month).collect(),
    }
}

/// Context for a deep analysis: the full history plus the monthly series.
pub fn analysis_context(transactions: &[Transaction], summary: &[MonthlySummary]) -> AnalysisContext {
    AnalysisContext {
        transactions: transactions.iter().map(transaction).collect(),
        summary: summary.iter().map(month).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::seed;

    #[test]
    fn question_context_limits_recent_transactions() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 21).unwrap();
        let ctx = question_context(
            today,
            &seed::accounts(),
            &seed::transactions(),
            &seed::monthly_summaries(),
            DEFAULT_RECENT_TRANSACTIONS,
        );
        assert_eq!(ctx.current_date, "2024-05-21");
        assert_eq!(ctx.recent_transactions.len(), 20);
        assert_eq!(ctx.recent_transactions[0].id, "t1");
        assert_eq!(ctx.accounts[2].kind, "CREDIT_CARD");
        assert_eq!(ctx.accounts[2].balance, -1240.5);

        let json = serde_json::to_value(&ctx).unwrap();
        assert!(json.get("recentTransactions").is_some());
        assert_eq!(json["recentTransactions"][0]["isRecurring"], false);
        assert_eq!(json["accounts"][0]["type"], "CHECKING");
    }

    #[test]
    fn analysis_context_carries_full_history() {
        let ctx = analysis_context(&seed::transactions(), &seed::monthly_summaries());
        assert_eq!(ctx.transactions.len(), 22);
        assert_eq!(ctx.summary.len(), 10);
        assert_eq!(ctx.summary[9].expenses, 2036.49);
    }
}
