//! Rule-table narrative over aggregate KPIs
//!
//! Each rule compares one KPI against fixed thresholds and picks a canned
//! Spanish sentence. Output order: sales vs budget, labour, waste.

use shared::models::{FinanceTotals, InsightSentence, InsightSeverity};

/// COL% strictly above this is critical
pub const COL_CRITICAL_PCT: f64 = 35.0;
/// COL% strictly above this (and up to critical) is a warning
pub const COL_WARNING_PCT: f64 = 30.0;
/// Sales within ±5% of budget count as on target
pub const BUDGET_BAND_PCT: f64 = 5.0;
/// Waste strictly above this share of sales is a warning
pub const WASTE_WARNING_PCT: f64 = 3.0;

pub fn generate(totals: &FinanceTotals) -> Vec<InsightSentence> {
    if totals.sales <= 0.0 {
        return vec![sentence(
            "no_data",
            InsightSeverity::Info,
            "No hay ventas registradas en el periodo seleccionado.".to_string(),
        )];
    }

    let mut out = Vec::with_capacity(3);
    out.push(budget_sentence(totals));
    out.push(labour_sentence(totals));
    out.push(waste_sentence(totals));
    out
}

/// Labour cost as a percentage of sales
pub fn col_pct(totals: &FinanceTotals) -> f64 {
    totals.labour_cost * 100.0 / totals.sales
}

fn budget_sentence(t: &FinanceTotals) -> InsightSentence {
    if t.budget <= 0.0 {
        return sentence(
            "budget_missing",
            InsightSeverity::Info,
            format!(
                "Ventas de {} sin presupuesto definido para comparar.",
                euros(t.sales)
            ),
        );
    }
    let variance = (t.sales - t.budget) * 100.0 / t.budget;
    if variance > BUDGET_BAND_PCT {
        sentence(
            "sales_above_budget",
            InsightSeverity::Ok,
            format!(
                "Las ventas ({}) superan el presupuesto en un {}.",
                euros(t.sales),
                pct(variance)
            ),
        )
    } else if variance < -BUDGET_BAND_PCT {
        sentence(
            "sales_below_budget",
            InsightSeverity::Warning,
            format!(
                "Las ventas ({}) están un {} por debajo del presupuesto ({}).",
                euros(t.sales),
                pct(-variance),
                euros(t.budget)
            ),
        )
    } else {
        sentence(
            "sales_on_budget",
            InsightSeverity::Ok,
            format!(
                "Las ventas ({}) están en línea con el presupuesto ({}).",
                euros(t.sales),
                euros(t.budget)
            ),
        )
    }
}

fn labour_sentence(t: &FinanceTotals) -> InsightSentence {
    let col = col_pct(t);
    if col > COL_CRITICAL_PCT {
        sentence(
            "col_critical",
            InsightSeverity::Critical,
            format!(
                "Alerta: el coste laboral supone el {} de las ventas, por encima del {}.",
                pct(col),
                pct(COL_CRITICAL_PCT)
            ),
        )
    } else if col > COL_WARNING_PCT {
        sentence(
            "col_warning",
            InsightSeverity::Warning,
            format!(
                "El coste laboral ({}) se acerca al límite del {}.",
                pct(col),
                pct(COL_CRITICAL_PCT)
            ),
        )
    } else {
        sentence(
            "col_ok",
            InsightSeverity::Ok,
            format!("El coste laboral ({}) está bajo control.", pct(col)),
        )
    }
}

fn waste_sentence(t: &FinanceTotals) -> InsightSentence {
    let share = t.waste_total * 100.0 / t.sales;
    if share > WASTE_WARNING_PCT {
        sentence(
            "waste_warning",
            InsightSeverity::Warning,
            format!(
                "La merma ({}) supone el {} de las ventas, por encima del {}.",
                euros(t.waste_total),
                pct(share),
                pct(WASTE_WARNING_PCT)
            ),
        )
    } else {
        sentence(
            "waste_ok",
            InsightSeverity::Ok,
            format!("La merma se mantiene en el {} de las ventas.", pct(share)),
        )
    }
}

fn sentence(key: &str, severity: InsightSeverity, text: String) -> InsightSentence {
    InsightSentence {
        key: key.to_string(),
        severity,
        text,
    }
}

/// `35,2 %`
fn pct(v: f64) -> String {
    format!("{v:.1} %").replace('.', ",")
}

/// `1234,50 €`
fn euros(v: f64) -> String {
    format!("{v:.2} €").replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(sales: f64, budget: f64, labour: f64, waste: f64) -> FinanceTotals {
        FinanceTotals {
            sales,
            budget,
            labour_cost: labour,
            waste_total: waste,
            days: 7,
        }
    }

    fn keys(sentences: &[InsightSentence]) -> Vec<&str> {
        sentences.iter().map(|s| s.key.as_str()).collect()
    }

    #[test]
    fn col_36_is_critical() {
        let out = generate(&totals(1000.0, 1000.0, 360.0, 10.0));
        assert!(keys(&out).contains(&"col_critical"));
        let critical = out.iter().find(|s| s.key == "col_critical").unwrap();
        assert_eq!(critical.severity, InsightSeverity::Critical);
        assert!(critical.text.contains("36,0 %"));
    }

    #[test]
    fn col_29_is_not_critical() {
        let out = generate(&totals(1000.0, 1000.0, 290.0, 10.0));
        assert!(!keys(&out).contains(&"col_critical"));
        assert!(keys(&out).contains(&"col_ok"));
    }

    #[test]
    fn col_band_edges() {
        let warn = generate(&totals(1000.0, 1000.0, 350.0, 0.0));
        assert!(keys(&warn).contains(&"col_warning"));
        let ok = generate(&totals(1000.0, 1000.0, 300.0, 0.0));
        assert!(keys(&ok).contains(&"col_ok"));
    }

    #[test]
    fn budget_band() {
        assert_eq!(generate(&totals(1050.0, 1000.0, 0.0, 0.0))[0].key, "sales_on_budget");
        assert_eq!(generate(&totals(950.0, 1000.0, 0.0, 0.0))[0].key, "sales_on_budget");
        assert_eq!(generate(&totals(1100.0, 1000.0, 0.0, 0.0))[0].key, "sales_above_budget");
        let below = generate(&totals(800.0, 1000.0, 0.0, 0.0));
        assert_eq!(below[0].key, "sales_below_budget");
        assert_eq!(below[0].severity, InsightSeverity::Warning);
        assert_eq!(generate(&totals(800.0, 0.0, 0.0, 0.0))[0].key, "budget_missing");
    }

    #[test]
    fn waste_threshold() {
        assert!(keys(&generate(&totals(1000.0, 1000.0, 0.0, 31.0))).contains(&"waste_warning"));
        assert!(keys(&generate(&totals(1000.0, 1000.0, 0.0, 30.0))).contains(&"waste_ok"));
    }

    #[test]
    fn no_sales_is_single_sentence() {
        let out = generate(&totals(0.0, 1000.0, 300.0, 10.0));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].key, "no_data");
    }
}
