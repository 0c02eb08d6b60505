//! Parser de páginas del sitio del juego
//!
//! Extrae los datos estructurados de guild y personaje a partir del HTML
//! crudo. Todo fallo de parseo degrada a valores por defecto (0 / cadena
//! vacía); este módulo nunca retorna error para no abortar el render de la
//! guild completa por markup roto.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{BaseCharacter, CharacterDetails, Guild};

lazy_static! {
    /// "57 membros. (Max: 80 Players )" en la tabla de info de la guild
    static ref MEMBER_COUNT_RE: Regex =
        Regex::new(r"(\d+)\s*membros.*?Max:\s*(\d+)").expect("member count regex");
    /// background-image: url(/images/outfit.php?...) del div de la skin
    static ref SKIN_URL_RE: Regex =
        Regex::new(r"background-image:\s*url\(([^)]+)\)").expect("skin url regex");
}

/// Parsea la página de una guild. Campos ausentes degradan a 0 / vacío;
/// `list` queda filtrada a miembros con nombre y vocación no vacíos y
/// level > 0.
pub fn parse_guild(guild_id: u32, html: &str) -> Guild {
    let name = slice_between_ci(html, "<h1", "</h1>")
        .map(strip_tags)
        .unwrap_or_default();

    let description = slice_between_ci(html, "<p", "</p>")
        .map(strip_tags)
        .unwrap_or_default();

    let page_text = strip_tags(html);
    let (members, max_members) = match MEMBER_COUNT_RE.captures(&page_text) {
        Some(caps) => (parse_number(&caps[1]), parse_number(&caps[2])),
        None => (0, 0),
    };

    let list = parse_roster(html);
    let online = count_online_status(html);

    Guild {
        id: guild_id,
        name,
        description,
        online,
        members,
        max_members,
        list,
    }
}

/// Parsea la página de un personaje: resets de la fila etiquetada "Resets"
/// y la URL de la skin del estilo inline del div del outfit.
pub fn parse_character(base_url: &str, html: &str) -> CharacterDetails {
    let mut resets = 0;
    let mut pos = 0;
    while let Some((start, end)) = next_tag_block_ci(html, "<tr", "</tr>", pos) {
        let row = &html[start..end];
        let cells = collect_cells(row);
        if cells.len() >= 2 && to_lower(&cells[0]).contains("resets") {
            resets = parse_number(&cells[1]);
            break;
        }
        pos = end;
    }

    let skin = outfit_div_style(html)
        .and_then(|style| {
            SKIN_URL_RE
                .captures(&style)
                .map(|caps| format!("{}{}", base_url, caps[1].trim().trim_matches('\'')))
        })
        .unwrap_or_default();

    CharacterDetails { resets, skin }
}

/// Filas del roster: el <table> que sigue al contenedor de la lista de
/// miembros. Cada fila: [rank, nombre (link), vocación, level, status].
fn parse_roster(html: &str) -> Vec<BaseCharacter> {
    let lc = to_lower(html);
    let Some(anchor) = lc.find("tablecontentandrightshadow") else {
        return Vec::new();
    };
    let region = &html[anchor..];

    let mut members = Vec::new();
    let mut pos = 0;
    while let Some((start, end)) = next_tag_block_ci(region, "<tr", "</tr>", pos) {
        let row = &region[start..end];
        let cells = collect_cells(row);
        if cells.len() >= 4 {
            let name = slice_between_ci(&cells[1], "<a", "</a>")
                .map(strip_tags)
                .unwrap_or_default();
            let vocation = strip_tags(&cells[2])
                .split_whitespace()
                .last()
                .unwrap_or_default()
                .to_string();
            let level = parse_number(&strip_tags(&cells[3]));
            let online = cells
                .iter()
                .any(|c| to_lower(c).contains("onlinestatus") && status_is_online(c));

            if !name.is_empty() && !vocation.is_empty() && level > 0 {
                members.push(BaseCharacter {
                    name,
                    vocation,
                    level,
                    online,
                });
            }
        }
        pos = end;
    }
    members
}

fn status_is_online(cell: &str) -> bool {
    to_lower(&strip_tags(cell)).starts_with("online")
}

/// Celdas de status con un span verde, sobre la página completa
fn count_online_status(html: &str) -> u32 {
    let lc = to_lower(html);
    let mut count = 0;
    let mut pos = 0;
    while let Some(rel) = lc[pos..].find("onlinestatus") {
        let start = pos + rel;
        let cell_end = lc[start..]
            .find("</td>")
            .map(|e| start + e)
            .unwrap_or(lc.len());
        if lc[start..cell_end].contains("green") {
            count += 1;
        }
        pos = cell_end.max(start + 1);
    }
    count
}

/// Tag de apertura (con atributos) del div del outfit
fn outfit_div_style(html: &str) -> Option<String> {
    let lc = to_lower(html);
    let start = lc.find("outfitchradcters")?;
    let open_end = html[start..].find('>')? + start;
    let open_start = html[..start].rfind('<')?;
    Some(html[open_start..open_end].to_string())
}

/// Celdas <td> de una fila, con su markup interno intacto
fn collect_cells(row: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut pos = 0;
    while let Some((start, end)) = next_tag_block_ci(row, "<td", "</td>", pos) {
        let block = &row[start..end];
        cells.push(inner_after_open_tag(block));
        pos = end;
    }
    cells
}

fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Contenido entre el cierre del tag de apertura y el tag de cierre,
/// búsqueda case-insensitive
fn slice_between_ci<'a>(s: &'a str, open_pat: &str, close_pat: &str) -> Option<&'a str> {
    let lc = to_lower(s);
    let open = to_lower(open_pat);
    let close = to_lower(close_pat);
    let o = lc.find(&open)?;
    let after = s[o..].find('>')? + o + 1;
    let cr = lc[after..].find(&close)?;
    Some(&s[after..after + cr])
}

/// Siguiente bloque `<tag ...> ... </tag>` a partir de `from`, retornando
/// los offsets (inicio del tag de apertura, fin del tag de cierre)
fn next_tag_block_ci(s: &str, open_pat: &str, close_pat: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let open = to_lower(open_pat);
    let close = to_lower(close_pat);
    let start = lc.get(from..)?.find(&open)? + from;
    let open_end = s[start..].find('>')? + start + 1;
    let end_rel = lc[open_end..].find(&close)?;
    Some((start, open_end + end_rel + close_pat.len()))
}

fn inner_after_open_tag(block: &str) -> String {
    if let Some(oe) = block.find('>') {
        if let Some(cs) = block.rfind('<') {
            if cs > oe {
                return block[oe + 1..cs].to_string();
            }
        }
    }
    String::new()
}

fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&out)
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Dígitos iniciales de un texto ("120", "120 (paused)"); sin dígitos → 0
fn parse_number(s: &str) -> u32 {
    let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}
