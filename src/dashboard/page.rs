//! HTML rendering for the dashboard

use std::fmt::Write;

use super::form::{FormValues, FIELDS};
use crate::models::PredictionResponse;

/// What to show under the form
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Empty,
    Prediction(PredictionResponse),
    FormErrors(Vec<String>),
    Failure(String),
}

const FEATURE_GUIDE: [&str; 6] = [
    "Debt-to-Income (DTI) = total monthly debt payments ÷ monthly gross income.",
    "Credit Utilization = total credit used ÷ total credit limit.",
    "Late payments = how many times you were 30/60/90+ days late in the last 24 months.",
    "Open Loans / Credit Lines = number of active credit accounts.",
    "Real Estate Loans = number of mortgages or property loans.",
    "Dependents = people you support financially (e.g., children).",
];

const STYLE: &str = r#"
body { margin: 0; background: #0b1220; color: #e6eeff;
  font-family: Inter, system-ui, -apple-system, "Segoe UI", Roboto, Ubuntu, Cantarell, "Helvetica Neue", sans-serif; }
main { display: grid; grid-template-columns: 1.35fr 0.9fr; gap: 24px; padding: 32px; }
h1 { padding: 32px 32px 0; margin: 0; }
.card { background: rgba(0,0,0,0.60); border: 1px solid rgba(255,255,255,0.08); border-radius: 18px;
  padding: 18px; box-shadow: 0 8px 24px rgba(0,0,0,.35); }
.columns { display: grid; grid-template-columns: repeat(3, 1fr); gap: 16px; }
label { display: block; font-size: 0.85rem; margin-bottom: 12px; }
input { width: 100%; box-sizing: border-box; margin-top: 4px; padding: 6px; border-radius: 6px;
  border: 1px solid #334; background: #111a2e; color: inherit; }
button { width: 100%; padding: 10px; border: 0; border-radius: 8px; background: #ff4b4b; color: #fff;
  font-weight: 600; cursor: pointer; }
.metric .label { font-size: 0.9rem; opacity: 0.8; }
.metric .value { font-size: 2.2rem; font-weight: 600; }
.badge { margin-top: 12px; padding: 12px 16px; border-radius: 8px; }
.badge.success { background: rgba(33,195,84,0.2); color: #7fe0a0; }
.badge.error { background: rgba(255,43,43,0.2); color: #ff9c9c; }
.feature-card { background: rgba(0,0,0,0.55); border-radius: 12px; padding: 14px; margin-bottom: 12px;
  font-size: 0.92rem; line-height: 1.35rem; }
"#;

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Probability as a percentage with two decimals
pub fn format_probability(p: f64) -> String {
    format!("{:.2}%", p * 100.0)
}

pub fn decision_badge(prediction: &PredictionResponse) -> String {
    let class = if prediction.decision.is_high_risk() { "error" } else { "success" };
    format!(
        r#"<div class="badge {}">Decision: {} • Threshold: {:.3}</div>"#,
        class, prediction.decision, prediction.threshold
    )
}

fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Empty => String::new(),
        Outcome::Prediction(p) => format!(
            r#"<div class="metric"><div class="label">Probability of Default</div><div class="value">{}</div></div>{}"#,
            format_probability(p.prob_default),
            decision_badge(p)
        ),
        Outcome::FormErrors(errors) => {
            let items: String = errors
                .iter()
                .map(|e| format!("<li>{}</li>", escape_html(e)))
                .collect();
            format!(r#"<div class="badge error"><ul>{}</ul></div>"#, items)
        }
        Outcome::Failure(message) => {
            format!(r#"<div class="badge error">{}</div>"#, escape_html(message))
        }
    }
}

fn render_inputs(values: &FormValues) -> String {
    let mut html = String::from(r#"<div class="columns">"#);
    for column in 0..3 {
        html.push_str("<div>");
        for field in FIELDS.iter().filter(|f| f.column == column) {
            let value = values
                .get(field.name())
                .cloned()
                .unwrap_or_else(|| field.default_text());
            let _ = write!(
                html,
                r#"<label>{label}<input type="number" name="{name}" min="{min}" max="{max}" step="{step}" value="{value}" required></label>"#,
                label = escape_html(field.label),
                name = field.name(),
                min = field.min,
                max = field.max,
                step = field.step,
                value = escape_html(&value),
            );
        }
        html.push_str("</div>");
    }
    html.push_str("</div>");
    html
}

/// Full dashboard page. `mode` describes where predictions come from.
pub fn render(values: &FormValues, outcome: &Outcome, mode: &str) -> String {
    let guide: String = FEATURE_GUIDE
        .iter()
        .map(|text| format!(r#"<div class="feature-card">{}</div>"#, escape_html(text)))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Loan Default Predictor (UK)</title>
<style>{style}</style>
</head>
<body>
<h1>💳 Loan Default Predictor</h1>
<main>
<section class="card">
<form method="post" action="/predict">
{inputs}
<button type="submit">Predict risk</button>
</form>
<div class="result">{outcome}</div>
<p class="mode">Scoring with {mode}</p>
</section>
<aside class="card">
<h3>Feature guide</h3>
{guide}
</aside>
</main>
</body>
</html>"#,
        style = STYLE,
        inputs = render_inputs(values),
        outcome = render_outcome(outcome),
        mode = escape_html(mode),
        guide = guide,
    )
}
