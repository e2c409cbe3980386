//! Server-rendered HTML pages.

use crate::affordability;
use crate::calculator::CalculatorView;
use crate::geo;
use crate::types::{CityData, CityListing};

const SITE_NAME: &str = "Income Calculator";

const CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
body{background:#f9fafb;color:#111827;font-family:system-ui,sans-serif}
a{color:#2563eb;text-decoration:none}
main{display:flex;flex-direction:column;align-items:center;padding:3rem 1rem}
h1{font-size:2.25rem;font-weight:800;margin-bottom:1rem;text-align:center}
.lead{font-size:1.1rem;color:#4b5563;text-align:center;max-width:42rem;margin-bottom:2rem}
.calc{background:#fff;border:1px solid #f3f4f6;border-radius:12px;box-shadow:0 20px 40px rgba(0,0,0,.12);width:100%;max-width:32rem;overflow:hidden}
.calc header{background:#2563eb;color:#fff;padding:1.5rem;text-align:center}
.calc header p{color:#dbeafe;font-size:.85rem;text-transform:uppercase;letter-spacing:.05em;margin-top:.25rem}
.calc form{padding:2rem;display:flex;flex-direction:column;gap:1.5rem}
.calc label{display:block;font-weight:600;font-size:.9rem;margin-bottom:.5rem;color:#374151}
.calc input{width:100%;padding:1rem;font-size:1.1rem;border:2px solid #e5e7eb;border-radius:8px;background:#f9fafb}
.calc input:disabled{background:#f3f4f6;cursor:not-allowed}
.calc button{padding:.8rem;background:#2563eb;color:#fff;border:none;border-radius:8px;font-weight:600;cursor:pointer}
.banner{background:#eff6ff;color:#1e40af;padding:.5rem 1rem;border-radius:6px;text-align:center;font-size:.9rem}
.result{text-align:center;padding:1.5rem;border-radius:12px;border:2px solid}
.result h3{font-size:1.9rem;font-weight:800;margin-bottom:.25rem}
.yes{background:#f0fdf4;border-color:#bbf7d0;color:#166534}
.no{background:#fef2f2;border-color:#fecaca;color:#991b1b}
.pending{border:2px dashed #e5e7eb;color:#9ca3af}
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(14rem,1fr));gap:1rem;width:100%;max-width:64rem}
.card{display:flex;justify-content:space-between;align-items:center;background:#fff;border:1px solid #e5e7eb;border-radius:8px;padding:1rem;color:#1f2937}
.card small{display:block;color:#6b7280;font-size:.75rem}
.state{text-transform:capitalize;text-align:center;justify-content:center}
article{max-width:42rem;margin-top:4rem;line-height:1.6}
article p{margin:.75rem 0}
.tip{background:#eff6ff;border:1px solid #dbeafe;border-radius:8px;padding:1rem;color:#1e40af}
footer{padding:2rem;text-align:center;color:#9ca3af;font-size:.85rem;border-top:1px solid #e5e7eb}
"#;

/// Title and description for a page's `<head>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
}

impl PageMeta {
    pub fn home() -> Self {
        Self {
            title: "US Salary Needed Calculator (2025 Data)".to_string(),
            description: "Calculate the salary needed to rent an apartment in any US zip code based on HUD 2025 data.".to_string(),
        }
    }

    pub fn state(state_slug: &str) -> Self {
        let name = geo::display_name(state_slug).to_uppercase();
        Self {
            title: format!("Salary Needed to Live in {} (2025 Data)", name),
            description: format!(
                "See rental costs and salary requirements for every city in {}. Based on official HUD FY2025 data.",
                name
            ),
        }
    }

    pub fn city(state_slug: &str, city: &CityData) -> Self {
        Self {
            title: format!(
                "Salary needed to live in {}, {} | {}",
                city.city,
                geo::display_name(state_slug),
                SITE_NAME
            ),
            description: format!(
                "Current 2025 rent prices for {} ({}). Calculate if you can afford to live in {}.",
                city.city, city.zip, city.city
            ),
        }
    }

    pub fn city_not_found() -> Self {
        Self {
            title: "City Not Found".to_string(),
            description: String::new(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            title: "Page Not Found".to_string(),
            description: String::new(),
        }
    }
}

/// Escape text for use in HTML content and quoted attributes
pub fn escape(text: &str) -> String {
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

/// Percent-encode one URL path segment. Only unreserved characters
/// (`A-Z a-z 0-9 - . _ ~`) pass through.
pub fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

fn city_path(state_slug: &str, city_slug: &str) -> String {
    format!(
        "/{}/{}",
        encode_path_segment(state_slug),
        encode_path_segment(city_slug)
    )
}

/// Group thousands: 59940 -> "59,940"
pub fn format_currency(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn layout(meta: &PageMeta, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">
<title>{title}</title><meta name="description" content="{description}"><style>{CSS}</style></head>
<body>{body}</body></html>"#,
        title = escape(&meta.title),
        description = escape(&meta.description),
    )
}

/// The calculator widget. Submitting the form reloads `action` with the
/// `zip` and `salary` query parameters.
pub fn calculator(view: &CalculatorView, action: &str) -> String {
    let banner = view
        .rent
        .map(|rent| {
            format!(
                r#"<div class="banner">Average 2-Bed Rent: <strong>${}/mo</strong></div>"#,
                format_currency(u64::from(rent))
            )
        })
        .unwrap_or_default();

    let result = match &view.result {
        Some(result) => {
            let (class, verdict) = if result.is_affordable {
                ("yes", "YES ✅")
            } else {
                ("no", "NO ❌")
            };
            format!(
                r#"<div class="result {class}"><h3>{verdict}</h3><p>Rent is <strong>{percent}%</strong> of your income.</p></div>"#,
                percent = result.percent_display(),
            )
        }
        None => format!(r#"<div class="result pending">{}</div>"#, view.placeholder),
    };

    format!(
        r#"<section class="calc"><header><h2>Can I Afford It?</h2><p>{label}</p></header>
<form method="get" action="{action}">
<div><label for="zip">Where do you want to live?</label>
<input id="zip" name="zip" inputmode="numeric" maxlength="5" placeholder="Enter Zip Code" value="{zip}"></div>
{banner}
<div><label for="salary">What is your Annual Salary?</label>
<input id="salary" name="salary" inputmode="decimal" placeholder="$ e.g. 65000" value="{salary}"{disabled}></div>
<button type="submit">Calculate</button>
{result}
</form></section>"#,
        label = escape(&view.location_label),
        action = escape(action),
        zip = escape(&view.zip),
        salary = escape(&view.salary),
        disabled = if view.salary_enabled { "" } else { " disabled" },
    )
}

pub fn home(view: &CalculatorView) -> String {
    let states: String = geo::STATES
        .iter()
        .map(|(slug, _)| {
            format!(
                r#"<a class="card state" href="/{slug}">{name}</a>"#,
                name = geo::display_name(slug)
            )
        })
        .collect();

    let body = format!(
        r#"<main><h1>US Salary &amp; Rent Calculator</h1>
<p class="lead">Find out exactly how much you need to earn to live comfortably in any zip code. Based on the <strong>30% Rent Rule</strong> and official 2025 HUD data.</p>
{calculator}
<h2 style="margin:4rem 0 2rem">Browse Rent Data by State</h2>
<div class="grid">{states}</div></main>
<footer>© 2025 {SITE_NAME} • Data source: HUD User</footer>"#,
        calculator = calculator(view, "/"),
    );
    layout(&PageMeta::home(), &body)
}

pub fn state(state_slug: &str, cities: &[CityListing]) -> String {
    let cards: String = cities
        .iter()
        .map(|city| {
            format!(
                r#"<a class="card" href="{href}"><div><strong>{name}</strong><small>Zip: {zip}</small></div><div><strong>${rent}</strong><small>2-BED</small></div></a>"#,
                href = escape(&city_path(state_slug, &city.slug)),
                name = escape(&city.name),
                zip = escape(&city.zip),
                rent = format_currency(u64::from(city.rent)),
            )
        })
        .collect();

    let body = format!(
        r#"<main><h1 style="text-transform:capitalize">Rent &amp; Salary Data for {name}</h1>
<p class="lead">Select a city below to calculate affordability based on current 2025 market rents.</p>
<div class="grid">{cards}</div></main>"#,
        name = geo::display_name(state_slug),
    );
    layout(&PageMeta::state(state_slug), &body)
}

pub fn city(state_slug: &str, city_slug: &str, city: &CityData, view: &CalculatorView) -> String {
    let name = escape(&city.city);
    let rent = format_currency(u64::from(city.rent));
    let needed = format_currency(affordability::recommended_salary(city.rent));

    let body = format!(
        r#"<main><h1>Salary needed for {name}</h1>
<p class="lead">Current market data for <strong>{name}, {state}</strong> (Zip: {zip}).<br>Based on HUD FY2026 Fair Market Rents.</p>
{calculator}
<article><h3>How much do you need to earn?</h3>
<p>To live comfortably in <strong>{name}</strong>, housing experts recommend spending no more than 30% of your gross monthly income on rent.</p>
<p>The current fair market rent for a 2-bedroom apartment in this area is <strong>${rent}/mo</strong>.</p>
<div class="tip">💡 <strong>Quick Math:</strong> You typically need to earn roughly <strong>${needed} per year</strong> to get approved for an apartment here.</div>
</article></main>"#,
        state = geo::display_name(state_slug).to_uppercase(),
        zip = escape(&city.zip),
        calculator = calculator(view, &city_path(state_slug, city_slug)),
    );
    layout(&PageMeta::city(state_slug, city), &body)
}

pub fn not_found(meta: &PageMeta, message: &str) -> String {
    let body = format!(
        r#"<main><h1>{title}</h1><p class="lead">{message}</p><a href="/">Back to the calculator</a></main>"#,
        title = escape(&meta.title),
        message = escape(message),
    );
    layout(meta, &body)
}
