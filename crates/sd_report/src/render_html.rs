// crates/sd_report/src/render_html.rs
//
// Deterministic, offline HTML renderer with a small phrasebook.
// Section order: heading → stacked bar → legend → influence panel → footer.
// All content fields are HTML-escaped; no external assets.

use std::fmt::Write as _;

use sd_pipeline::{DistributionReport, InfluenceView, LegendRow};

use crate::{check_report, fmt_amount, fmt_fixed, ReportError};

// ------------------------- i18n phrasebook -------------------------

#[derive(Copy, Clone)]
struct Phrase {
    key: &'static str,
    en: &'static str,
    fr: &'static str,
}

const PHRASES: &[Phrase] = &[
    Phrase { key: "supported",  en: "Supported proposals",    fr: "Propositions soutenues" },
    Phrase { key: "proposal",   en: "Proposal",               fr: "Proposition" },
    Phrase { key: "share",      en: "Share",                  fr: "Part" },
    Phrase { key: "total",      en: "Total staked",           fr: "Total engagé" },
    Phrase { key: "no_stakes",  en: "No active stakes.",      fr: "Aucun engagement actif." },
    Phrase { key: "influence",  en: "Your voting influence",  fr: "Votre influence de vote" },
    Phrase { key: "balance",    en: "Balance",                fr: "Solde" },
    Phrase { key: "active",     en: "Active",                 fr: "Actif" },
    Phrase { key: "inactive",   en: "Inactive",               fr: "Inactif" },
    Phrase { key: "account",    en: "Account",                fr: "Compte" },
    Phrase { key: "engine",     en: "Engine",                 fr: "Moteur" },
];

fn t(lang: &str, key: &str) -> &'static str {
    let fr = lang == "fr" || lang.starts_with("fr-") || lang.starts_with("fr_");
    PHRASES
        .iter()
        .find(|p| p.key == key)
        .map(|p| if fr { p.fr } else { p.en })
        .unwrap_or("")
}

/// Segment colors, assigned by row position.
const PALETTE: &[&str] = &["#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#06b6d4", "#84cc16", "#ec4899"];
const OTHERS_COLOR: &str = "#9ca3af";

// ------------------------- formatting helpers -------------------------

/// Escape text for HTML.
fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

fn color_for(pos: usize, row: &LegendRow) -> &'static str {
    if row.navigable {
        PALETTE[pos % PALETTE.len()]
    } else {
        OTHERS_COLOR
    }
}

// ------------------------- HTML builder -------------------------

pub struct HtmlBuilder<'a> {
    lang: &'a str,
    digits: u32,
    buf: String,
}

impl<'a> HtmlBuilder<'a> {
    pub fn new(lang: &'a str, digits: u32) -> Self {
        Self { lang, digits, buf: String::with_capacity(8 * 1024) }
    }

    /// Start document with a minimal, asset-free head.
    pub fn start(&mut self, title: &str) {
        let _ = write!(
            self.buf,
            "<!doctype html><html lang=\"{}\"><head><meta charset=\"utf-8\">\
             <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\
             <title>{}</title>\
             <style>\
             body{{font-family:system-ui,-apple-system,Segoe UI,Roboto,Ubuntu,Arial,sans-serif;margin:24px;}}\
             .bar{{display:flex;height:12px;border-radius:6px;overflow:hidden;background:#eee;margin:12px 0}}\
             .seg{{height:100%}}\
             .dot{{display:inline-block;width:10px;height:10px;border-radius:50%;margin-right:6px}}\
             table{{border-collapse:collapse}}\
             td,th{{padding:4px 8px;border-bottom:1px solid #ddd;text-align:left}}\
             td.num{{text-align:right}}\
             .muted{{opacity:0.8}}\
             </style></head><body>",
            esc(self.lang),
            esc(title)
        );
    }

    pub fn finish(mut self) -> String {
        self.buf.push_str("</body></html>");
        self.buf
    }

    pub fn section_heading(&mut self, heading: &str, account: Option<&str>) {
        let _ = write!(self.buf, "<h1>{}</h1>", esc(heading));
        if let Some(a) = account {
            let _ = write!(self.buf, "<p class=\"muted\">{}: <code>{}</code></p>", esc(t(self.lang, "account")), esc(a));
        }
    }

    /// Horizontal stacked bar; segment widths are the display percentages.
    pub fn section_bar(&mut self, rows: &[LegendRow]) {
        self.buf.push_str("<div class=\"bar\" role=\"img\">");
        for (pos, row) in rows.iter().enumerate() {
            let _ = write!(
                self.buf,
                "<div class=\"seg\" style=\"width:{}%;background:{}\" title=\"{}\"></div>",
                fmt_fixed(row.display_percentage, self.digits),
                color_for(pos, row),
                esc(&row.proposal_name)
            );
        }
        self.buf.push_str("</div>");
    }

    /// Legend table. Only navigable rows link to their proposal.
    pub fn section_legend(&mut self, rows: &[LegendRow], total: &str) {
        let _ = write!(
            self.buf,
            "<h2>{}</h2><p class=\"muted\">{}: {}</p>\
             <table><thead><tr><th>{}</th><th>{}</th></tr></thead><tbody>",
            esc(t(self.lang, "supported")),
            esc(t(self.lang, "total")),
            esc(total),
            esc(t(self.lang, "proposal")),
            esc(t(self.lang, "share")),
        );
        for (pos, row) in rows.iter().enumerate() {
            let name = esc(&row.proposal_name);
            let label = match (&row.proposal_id, row.navigable) {
                (Some(id), true) => format!("<a href=\"#proposal-{}\">{}</a>", esc(id.as_str()), name),
                _ => name,
            };
            let _ = write!(
                self.buf,
                "<tr><td><span class=\"dot\" style=\"background:{}\"></span>{}</td><td class=\"num\">{}%</td></tr>",
                color_for(pos, row),
                label,
                fmt_fixed(row.display_percentage, self.digits)
            );
        }
        self.buf.push_str("</tbody></table>");
    }

    pub fn section_empty(&mut self) {
        let _ = write!(
            self.buf,
            "<h2>{}</h2><p class=\"muted\">{}</p>",
            esc(t(self.lang, "supported")),
            esc(t(self.lang, "no_stakes"))
        );
    }

    pub fn section_influence(&mut self, inf: &InfluenceView) {
        let _ = write!(
            self.buf,
            "<h2>{}</h2><table><tbody>\
             <tr><td>{}</td><td class=\"num\">{}</td></tr>\
             <tr><td>{}</td><td class=\"num\">{}</td></tr>\
             <tr><td>{}</td><td class=\"num\">{}</td></tr>\
             </tbody></table>",
            esc(t(self.lang, "influence")),
            esc(t(self.lang, "balance")),
            fmt_amount(inf.total),
            esc(t(self.lang, "active")),
            fmt_amount(inf.active),
            esc(t(self.lang, "inactive")),
            fmt_amount(inf.inactive),
        );
    }

    pub fn section_footer(&mut self, engine_name: &str, engine_version: &str) {
        let _ = write!(
            self.buf,
            "<footer class=\"muted\"><small>{}: {} {}</small></footer>",
            esc(t(self.lang, "engine")),
            esc(engine_name),
            esc(engine_version)
        );
    }
}

// ------------------------- top-level entry -------------------------

/// Render the whole report as one self-contained HTML document.
pub fn render_html(r: &DistributionReport, lang: &str) -> Result<String, ReportError> {
    check_report(r)?;
    let mut h = HtmlBuilder::new(lang, r.display_digits);
    h.start(&r.heading);
    h.section_heading(&r.heading, r.account.as_deref());

    match r.rows.as_deref() {
        Some(rows) if !rows.is_empty() => {
            h.section_bar(rows);
            h.section_legend(rows, &fmt_amount(r.total));
        }
        _ => h.section_empty(),
    }

    if let Some(inf) = r.influence.as_ref() {
        h.section_influence(inf);
    }
    h.section_footer(&r.engine.name, &r.engine.version);
    Ok(h.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(esc("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
    }

    #[test]
    fn phrasebook_falls_back_to_english() {
        assert_eq!(t("fr-CA", "share"), "Part");
        assert_eq!(t("de", "share"), "Share");
        assert_eq!(t("en", "missing-key"), "");
    }
}
