//! Printable HTML budget report
//!
//! A self-contained page with one table per bucket and a summary block. All
//! user text is escaped.

use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::analysis::{sum_budget, BudgetTotals};
use crate::models::{BudgetSheet, Bucket, DigitGrouping, ExpenseItem, Money};

const STYLE: &str = r#"
    body { font-family: 'Courier New', monospace; margin: 20px; line-height: 1.4; }
    .header { text-align: center; margin-bottom: 30px; border: 2px solid #000; padding: 20px; }
    .title { font-size: 24px; font-weight: bold; margin-bottom: 10px; }
    .section { margin-bottom: 25px; border: 1px solid #000; padding: 15px; }
    .section-title { font-size: 18px; font-weight: bold; margin-bottom: 15px; text-transform: uppercase; }
    table { width: 100%; border-collapse: collapse; margin-bottom: 10px; }
    th, td { border: 1px solid #000; padding: 8px; text-align: left; }
    th { background-color: #f0f0f0; }
    .total-row, .summary { font-weight: bold; background-color: #f5f5f5; }
    .summary { padding: 15px; margin-top: 20px; }
    .deficit { color: #c00; }
"#;

/// Escape text for element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

struct Formatter<'a> {
    symbol: &'a str,
    grouping: DigitGrouping,
}

impl Formatter<'_> {
    fn money(&self, amount: Money) -> String {
        escape(&amount.format_with(self.symbol, self.grouping))
    }
}

/// Render the full report for `sheet`, dated `date`
pub fn render_report(sheet: &BudgetSheet, date: NaiveDate, symbol: &str, grouping: DigitGrouping) -> String {
    let fmt = Formatter { symbol, grouping };
    let totals = BudgetTotals::from_sheet(sheet);
    let period = date.format("%B %Y").to_string();
    let symbol = escape(symbol);

    let mut html = String::new();
    // writes to a String cannot fail
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Budget Report - {period}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <div class=\"header\">\n<div class=\"title\">{symbol} 50/30/20 BUDGET REPORT</div>\n<div>{period}</div>\n</div>\n",
    );

    html.push_str("<div class=\"section\">\n<div class=\"section-title\">Income</div>\n<table>\n");
    let _ = write!(
        html,
        "<thead><tr><th>Subcategory</th><th>Payday</th><th>Budget ({symbol})</th><th>Actual ({symbol})</th></tr></thead>\n<tbody>\n"
    );
    for item in &sheet.income {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&item.subcategory),
            item.payday.format("%Y-%m-%d"),
            fmt.money(item.budget),
            fmt.money(item.actual)
        );
    }
    let _ = writeln!(
        html,
        "<tr class=\"total-row\"><td colspan=\"3\">TOTAL INCOME</td><td>{}</td></tr>\n</tbody>\n</table>\n</div>",
        fmt.money(totals.income)
    );

    for bucket in Bucket::EXPENSES {
        if let Some(items) = sheet.expenses(bucket) {
            expense_section(&mut html, &fmt, bucket, items, &symbol);
        }
    }

    let leftover = totals.leftover();
    let _ = write!(
        html,
        "<div class=\"summary\">\n<div class=\"section-title\">Summary</div>\n<table>\n\
         <tr><td>Total Income</td><td>{}</td></tr>\n\
         <tr><td>Total Expenses</td><td>{}</td></tr>\n\
         <tr><td>Leftover/Deficit</td><td{}>{}</td></tr>\n\
         </table>\n</div>\n</body>\n</html>\n",
        fmt.money(totals.income),
        fmt.money(totals.expenses()),
        if leftover.is_negative() { " class=\"deficit\"" } else { "" },
        fmt.money(leftover)
    );

    html
}

fn expense_section(html: &mut String, fmt: &Formatter<'_>, bucket: Bucket, items: &[ExpenseItem], symbol: &str) {
    let title = match bucket {
        Bucket::Needs => "Needs (50%)",
        Bucket::Wants => "Wants (30%)",
        _ => "Savings (20%)",
    };
    let _ = write!(
        html,
        "<div class=\"section\">\n<div class=\"section-title\">{title}</div>\n<table>\n\
         <thead><tr><th>Category</th><th>Budget ({symbol})</th><th>Actual ({symbol})</th></tr></thead>\n<tbody>\n"
    );
    for item in items {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&item.category),
            fmt.money(item.budget),
            fmt.money(item.actual)
        );
    }
    let actual: Money = items.iter().map(|i| i.actual).sum();
    let _ = writeln!(
        html,
        "<tr class=\"total-row\"><td>TOTAL {}</td><td>{}</td><td>{}</td></tr>\n</tbody>\n</table>\n</div>",
        bucket.as_str().to_uppercase(),
        fmt.money(sum_budget(items)),
        fmt.money(actual)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 14).unwrap()
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_report_sections() {
        let html = render_report(&BudgetSheet::sample(), date(), "₹", DigitGrouping::Indian);

        assert!(html.contains("<title>Budget Report - February 2025</title>"));
        assert!(html.contains("Needs (50%)"));
        assert!(html.contains("Wants (30%)"));
        assert!(html.contains("Savings (20%)"));
        assert!(html.contains("TOTAL INCOME</td><td>₹12,00,000.00"));
        assert!(html.contains("TOTAL SAVINGS"));
        assert!(html.contains("Leftover/Deficit"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut sheet = BudgetSheet::blank();
        sheet.wants[0].category = "<script>alert(1)</script>".into();

        let html = render_report(&sheet, date(), "$", DigitGrouping::Western);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_deficit_is_marked() {
        let mut sheet = BudgetSheet::blank();
        sheet.needs[0].actual = Money::from_major(100);

        let html = render_report(&sheet, date(), "$", DigitGrouping::Western);
        assert!(html.contains("class=\"deficit\">-$100.00"));
    }
}
