//! Server-rendered markup for the symptom form and its result panel.

use uuid::Uuid;

use super::{layout, Section};
use crate::checker::{CheckerState, SymptomChecker};
use crate::config::APP_NAME;
use crate::models::{AnalysisResult, RiskLevel, Severity};

/// Seconds between reloads while an analysis is running.
const LOADING_REFRESH_SECS: u32 = 2;

const PAGE_STYLE: &str = r##"*,*::before,*::after{box-sizing:border-box}
body{margin:0;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;background:#f8fafc;color:#0f172a}
main{max-width:1100px;margin:0 auto;padding:24px;display:grid;gap:24px;grid-template-columns:repeat(auto-fit,minmax(320px,1fr))}
header.top{text-align:center;padding:32px 16px 0}
.card{background:#fff;border-radius:16px;box-shadow:0 4px 24px rgba(0,0,0,.06);padding:24px}
h1{font-size:1.75rem;margin:0 0 4px}
h2{font-size:1.1rem;margin:0 0 12px}
h3{font-size:1rem;margin:16px 0 8px}
input[type=text]{width:100%;padding:12px;border:1px solid #cbd5e1;border-radius:10px;font-size:1rem}
.severity{display:flex;gap:8px;margin:12px 0}
.severity label{flex:1;text-align:center;padding:8px;border:1px solid #cbd5e1;border-radius:10px;cursor:pointer}
.btn{display:inline-block;padding:12px 16px;border:none;border-radius:10px;font-size:1rem;font-weight:600;cursor:pointer}
.btn-primary{background:#0d9488;color:#fff;width:100%}
.btn-primary:disabled{background:#94a3b8;cursor:not-allowed}
.btn-add{background:#e2e8f0;color:#0f172a;width:100%}
.chips{display:flex;flex-wrap:wrap;gap:8px;margin:16px 0;padding:0;list-style:none}
.chip{display:flex;align-items:center;gap:6px;background:#f1f5f9;border-radius:999px;padding:4px 4px 4px 12px;font-size:.9rem}
.chip form{margin:0}
.chip button{border:none;background:#cbd5e1;border-radius:999px;width:22px;height:22px;cursor:pointer}
.muted{color:#64748b}
.alert{border-radius:12px;padding:16px;margin-bottom:16px}
.alert-emergency{background:#fef2f2;border:1px solid #fecaca;color:#991b1b}
.alert-error{background:#fff7ed;border:1px solid #fed7aa;color:#9a3412}
.alert-info{background:#eff6ff;border:1px solid #bfdbfe;color:#1e3a8a}
.result-header{display:flex;justify-content:space-between;align-items:center;margin-bottom:16px}
.badge{padding:4px 12px;border-radius:999px;font-size:.85rem;font-weight:700}
.risk-low{background:#dcfce7;color:#166534}
.risk-medium{background:#fef9c3;color:#854d0e}
.risk-high{background:#ffedd5;color:#9a3412}
.risk-critical{background:#fee2e2;color:#991b1b;animation:pulse 1.5s infinite}
@keyframes pulse{50%{opacity:.55}}
.bar-row{margin:8px 0}
.bar-label{display:flex;justify-content:space-between;font-size:.9rem}
.bar{background:#e2e8f0;border-radius:999px;height:10px;overflow:hidden}
.bar span{display:block;height:100%;background:#0d9488}
.condition{border-top:1px solid #e2e8f0;padding:8px 0}
.disclaimer{font-size:.8rem;color:#64748b;margin-top:16px}
footer{text-align:center;font-size:.8rem;color:#64748b;padding:0 16px 32px}"##;

/// Escape text for safe inclusion in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

fn risk_class(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "risk-low",
        RiskLevel::Medium => "risk-medium",
        RiskLevel::High => "risk-high",
        RiskLevel::Critical => "risk-critical",
    }
}

fn list_items(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect()
}

fn render_section(section: &Section<'_>) -> String {
    match section {
        Section::EmergencyAlert(alert) => format!(
            r##"<div class="alert alert-emergency" role="alert"><strong>Urgent!</strong> {}</div>"##,
            escape_html(alert)
        ),
        Section::RiskBadge(level) => format!(
            r##"<div class="result-header"><h2>Analysis Result</h2><span class="badge {}">{} Risk</span></div>"##,
            risk_class(*level),
            level
        ),
        Section::ClarificationQuestions(questions) => format!(
            r##"<div class="alert alert-info"><h3>Please Provide More Information</h3><ul>{}</ul></div>"##,
            list_items(questions)
        ),
        Section::ConditionChart(conditions) => {
            let bars: String = conditions
                .iter()
                .map(|c| {
                    format!(
                        r##"<div class="bar-row"><div class="bar-label"><span>{name}</span><span>{p}%</span></div><div class="bar"><span style="width:{p}%"></span></div></div>"##,
                        name = escape_html(&c.name),
                        p = c.probability
                    )
                })
                .collect();
            format!(r##"<section><h3>Condition Probability Overview</h3>{bars}</section>"##)
        }
        Section::ConditionDetails(conditions) => {
            let rows: String = conditions
                .iter()
                .map(|c| {
                    format!(
                        r##"<div class="condition"><strong>{}</strong> <span class="muted">{}% Likelihood</span><p>{}</p></div>"##,
                        escape_html(&c.name),
                        c.probability,
                        escape_html(&c.description)
                    )
                })
                .collect();
            format!(r##"<section><h3>Possible Condition Details</h3>{rows}</section>"##)
        }
        Section::SymptomSeverity(entries) => {
            let rows: String = entries
                .iter()
                .map(|e| {
                    format!(
                        "<li>{}: <strong>{}</strong></li>",
                        escape_html(&e.symptom),
                        e.severity
                    )
                })
                .collect();
            format!(r##"<section><h3>Symptom Analysis</h3><ul>{rows}</ul></section>"##)
        }
        Section::LifestyleTips(tips) => format!(
            r##"<section><h3>Lifestyle &amp; Self-Care Tips</h3><ul>{}</ul></section>"##,
            list_items(tips)
        ),
        Section::HealthTip(tip) => format!(
            r##"<section><h3>Health Tip</h3><p>{}</p></section>"##,
            escape_html(tip)
        ),
        Section::Disclaimer(text) => {
            format!(r##"<p class="disclaimer">{}</p>"##, escape_html(text))
        }
    }
}

/// Markup for a successful analysis, sections in layout order.
pub fn render_result(result: &AnalysisResult) -> String {
    layout(result).iter().map(render_section).collect()
}

/// Markup for the result panel in any checker state.
pub fn render_result_panel(state: &CheckerState) -> String {
    match state {
        CheckerState::Idle => r##"<div class="muted"><h2>Waiting for symptoms...</h2><p>Your detailed analysis will appear here.</p></div>"##.to_string(),
        CheckerState::Loading => r##"<div class="muted" aria-busy="true"><h2>AI is analyzing your symptoms...</h2></div>"##.to_string(),
        CheckerState::Failure(message) => format!(
            r##"<div class="alert alert-error" role="alert">{}</div>"##,
            escape_html(message)
        ),
        CheckerState::Success(result) => render_result(result),
    }
}

fn render_severity_options(selected: Severity) -> String {
    Severity::all()
        .iter()
        .map(|s| {
            format!(
                r##"<label><input type="radio" name="severity" value="{v}"{checked}> {v}</label>"##,
                v = s.as_str(),
                checked = if *s == selected { " checked" } else { "" }
            )
        })
        .collect()
}

fn render_symptom_chips(session_id: &Uuid, checker: &SymptomChecker) -> String {
    let disabled = if checker.is_loading() { " disabled" } else { "" };
    let chips: String = checker
        .collector()
        .symptoms()
        .iter()
        .enumerate()
        .map(|(index, symptom)| {
            format!(
                r##"<li class="chip">{name} <span class="muted">({severity})</span><form method="post" action="/sessions/{session_id}/symptoms/{index}/remove"><button type="submit" aria-label="Remove {name}"{disabled}>&times;</button></form></li>"##,
                name = escape_html(&symptom.name),
                severity = symptom.severity,
            )
        })
        .collect();
    format!(r##"<ul class="chips">{chips}</ul>"##)
}

/// Full page for one form session.
pub fn render_page(session_id: &Uuid, checker: &SymptomChecker) -> String {
    let loading = checker.is_loading();
    let refresh = if loading {
        format!(r##"<meta http-equiv="refresh" content="{LOADING_REFRESH_SECS}">"##)
    } else {
        String::new()
    };
    let input_disabled = if loading { " disabled" } else { "" };
    let check_disabled = if checker.can_submit() { "" } else { " disabled" };
    let check_label = if loading { "Analyzing..." } else { "Check Symptoms" };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{refresh}
<title>{APP_NAME}</title>
<style>
{PAGE_STYLE}
</style>
</head>
<body>
<header class="top">
  <h1>{APP_NAME}</h1>
  <p class="muted">Describe your symptoms and get an informational risk analysis.</p>
</header>
<main>
  <div class="card">
    <h2>Your Symptoms</h2>
    <form method="post" action="/sessions/{session_id}/symptoms">
      <input type="text" name="name" placeholder="e.g., headache, fever" autocomplete="off" required{input_disabled}>
      <div class="severity">{severity_options}</div>
      <button type="submit" class="btn btn-add"{input_disabled}>Add Symptom</button>
    </form>
    {chips}
    <form method="post" action="/sessions/{session_id}/check">
      <button type="submit" class="btn btn-primary"{check_disabled}>{check_label}</button>
    </form>
  </div>
  <div class="card">
    {panel}
  </div>
</main>
<footer>
  <p><strong>Disclaimer:</strong> This tool is for informational purposes only.</p>
  <p>It is not a substitute for professional medical advice, diagnosis, or treatment. Always seek the advice of your physician or other qualified health provider with any questions you may have regarding a medical condition.</p>
</footer>
</body>
</html>"##,
        severity_options = render_severity_options(checker.collector().current_severity()),
        chips = render_symptom_chips(session_id, checker),
        panel = render_result_panel(checker.state()),
    )
}
