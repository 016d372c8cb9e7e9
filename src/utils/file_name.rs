// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Names for exported CSV and backup files.

use time::{Date, macros::format_description};

/// Fallback base when nothing filesystem-safe is left of the requested name.
const DEFAULT_BASE: &str = "export";

/// Reduce `value` to a lowercase, filesystem-safe base name.
///
/// # Steps
/// - Transliterate Unicode to ASCII with `deunicode` (e.g. "cotações" → "cotacoes").
/// - Keep ASCII alphanumerics and `-`; everything else becomes `_`.
/// - Collapse runs of `_` and trim them from both ends.
pub fn sanitize_base(value: &str) -> String {
    let transliterated = deunicode::deunicode(value).to_ascii_lowercase();
    let mut out = String::with_capacity(transliterated.len());

    for ch in transliterated.chars() {
        let mapped = if ch.is_ascii_alphanumeric() || ch == '-' {
            ch
        } else {
            '_'
        };
        if mapped == '_' && (out.is_empty() || out.ends_with('_')) {
            continue;
        }
        out.push(mapped);
    }

    while out.ends_with('_') {
        out.pop();
    }

    if out.is_empty() {
        DEFAULT_BASE.to_string()
    } else {
        out
    }
}

/// Build `<base>_<YYYY-MM-DD>.<extension>` for a download.
///
/// # Examples
///
/// ```
/// use time::macros::date;
/// use travelcrm::utils::dated_file_name;
///
/// assert_eq!(dated_file_name("clientes", date!(2026 - 10 - 16), "csv"), "clientes_2026-10-16.csv");
/// ```
pub fn dated_file_name(base: &str, date: Date, extension: &str) -> String {
    let stamp = date
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string());
    let extension = extension.trim_start_matches('.');
    format!("{}_{stamp}.{extension}", sanitize_base(base))
}

/// File name for a full backup taken on `date`.
pub fn backup_file_name(date: Date) -> String {
    dated_file_name("backup_crm", date, "json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    // Accents are transliterated and separators collapse to single underscores.
    #[test]
    fn sanitize_base_transliterates_and_collapses() {
        assert_eq!(sanitize_base("Cotações  de Março"), "cotacoes_de_marco");
        assert_eq!(sanitize_base("../fornecedores/"), "fornecedores");
    }

    // Nothing usable left falls back to the default base.
    #[test]
    fn sanitize_base_falls_back_when_empty() {
        assert_eq!(sanitize_base("***"), "export");
        assert_eq!(sanitize_base(""), "export");
    }

    #[test]
    fn dated_file_name_appends_iso_date_and_extension() {
        let day = date!(2025 - 01 - 05);
        assert_eq!(dated_file_name("agenda", day, ".csv"), "agenda_2025-01-05.csv");
        assert_eq!(backup_file_name(day), "backup_crm_2025-01-05.json");
    }
}
