//! Abbreviation dictionaries and the substitution pass.
//!
//! Terms are matched case-insensitively on word boundaries, longest term
//! first, so `knit 2 together` wins over `knit`. A match at the start of a
//! capitalised word keeps the capital (`Knit 1` becomes `K1`).

use crate::domain::value_objects::{CraftType, Language};

/// One dictionary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
    pub full: &'static str,
    pub short: &'static str,
    /// Drop the space before a following count (`k 2` becomes `k2`).
    pub joins_count: bool,
}

const fn t(full: &'static str, short: &'static str) -> Term {
    Term {
        full,
        short,
        joins_count: false,
    }
}

const fn counted(full: &'static str, short: &'static str) -> Term {
    Term {
        full,
        short,
        joins_count: true,
    }
}

const SHARED: &[Term] = &[
    t("right side", "RS"),
    t("wrong side", "WS"),
    t("stitches", "sts"),
    t("stitch", "st"),
    t("repeat", "rep"),
    t("remaining", "rem"),
    t("beginning", "beg"),
    t("together", "tog"),
    t("pattern", "patt"),
    t("following", "foll"),
    t("continue", "cont"),
];

const KNITTING_US: &[Term] = &[
    t("knit 2 together through back loop", "k2tog tbl"),
    t("purl 2 together through back loop", "p2tog tbl"),
    t("through back loop", "tbl"),
    t("slip slip knit", "ssk"),
    t("knit 2 together", "k2tog"),
    t("purl 2 together", "p2tog"),
    t("purl 3 together", "p3tog"),
    t("pass slipped stitch over", "psso"),
    t("stockinette stitch", "St st"),
    t("make 1 left", "M1L"),
    t("make 1 right", "M1R"),
    t("make 1 purlwise", "M1P"),
    t("make 1", "M1"),
    t("yarn over", "yo"),
    t("slip marker", "sm"),
    t("place marker", "pm"),
    t("bind off", "BO"),
    t("cast on", "CO"),
    t("decrease", "dec"),
    t("increase", "inc"),
    counted("knit", "k"),
    counted("purl", "p"),
    counted("slip", "sl"),
];

const KNITTING_UK: &[Term] = &[
    t("knit 2 together through back loop", "k2tog tbl"),
    t("purl 2 together through back loop", "p2tog tbl"),
    t("through back loop", "tbl"),
    t("slip slip knit", "ssk"),
    t("knit 2 together", "k2tog"),
    t("purl 2 together", "p2tog"),
    t("purl 3 together", "p3tog"),
    t("pass slipped stitch over", "psso"),
    t("stockinette stitch", "st st"),
    t("make 1 left", "M1L"),
    t("make 1 right", "M1R"),
    t("make 1 purlwise", "M1P"),
    t("make 1", "M1"),
    t("yarn over", "yfwd"),
    t("slip marker", "sm"),
    t("place marker", "pm"),
    t("bind off", "cast off"),
    t("decrease", "dec"),
    t("increase", "inc"),
    counted("knit", "k"),
    counted("purl", "p"),
    counted("slip", "sl"),
];

const CROCHET_US: &[Term] = &[
    t("single crochet 2 together", "sc2tog"),
    t("single crochet 3 together", "sc3tog"),
    t("half double crochet", "hdc"),
    t("single crochet", "sc"),
    t("double crochet", "dc"),
    t("treble crochet", "tr"),
    t("slip stitch", "sl st"),
    t("second", "2nd"),
    t("skip", "sk"),
    t("space", "sp"),
    counted("chain", "ch"),
];

/// UK crochet names stitches one step taller than US crochet.
const CROCHET_UK: &[Term] = &[
    t("single crochet 2 together", "dc2tog"),
    t("single crochet 3 together", "dc3tog"),
    t("half double crochet", "htr"),
    t("single crochet", "dc"),
    t("double crochet", "tr"),
    t("treble crochet", "dtr"),
    t("slip stitch", "ss"),
    t("second", "2nd"),
    t("skip", "miss"),
    t("space", "sp"),
    counted("chain", "ch"),
];

/// Abbreviation dictionary for one craft and language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminology {
    pub craft: CraftType,
    pub language: Language,
    terms: Vec<Term>,
}

impl Terminology {
    pub fn new(craft: CraftType, language: Language) -> Self {
        let specific = match (craft, language) {
            (CraftType::Knitting, Language::EnUs) => KNITTING_US,
            (CraftType::Knitting, Language::EnUk) => KNITTING_UK,
            (CraftType::Crochet, Language::EnUs) => CROCHET_US,
            (CraftType::Crochet, Language::EnUk) => CROCHET_UK,
        };
        let mut terms: Vec<Term> = specific.iter().chain(SHARED).copied().collect();
        // Longest first; ties keep dictionary order.
        terms.sort_by(|a, b| b.full.len().cmp(&a.full.len()));
        Self {
            craft,
            language,
            terms,
        }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Rewrite full terms in `text` to their abbreviations.
    pub fn abbreviate(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut i = 0;
        while i < text.len() {
            let rest = &text[i..];
            let at_boundary = !text[..i].chars().next_back().is_some_and(is_word_char);
            let hit = at_boundary
                .then(|| self.terms.iter().find(|term| matches_at(rest, term.full)))
                .flatten();

            let Some(term) = hit else {
                let ch = rest.chars().next().map_or(1, char::len_utf8);
                out.push_str(&rest[..ch]);
                i += ch;
                continue;
            };

            if rest.starts_with(|c: char| c.is_uppercase()) {
                let mut chars = term.short.chars();
                if let Some(first) = chars.next() {
                    out.extend(first.to_uppercase());
                    out.push_str(chars.as_str());
                }
            } else {
                out.push_str(term.short);
            }
            i += term.full.len();

            if term.joins_count {
                let after = &text[i..];
                if after.starts_with(' ') && after[1..].starts_with(|c: char| c.is_ascii_digit()) {
                    i += 1;
                }
            }
        }
        out
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// `rest` starts with `term` (ASCII case-insensitive) followed by a word
/// boundary.
fn matches_at(rest: &str, term: &str) -> bool {
    rest.len() >= term.len()
        && rest.is_char_boundary(term.len())
        && rest[..term.len()].eq_ignore_ascii_case(term)
        && !rest[term.len()..].chars().next().is_some_and(is_word_char)
}
