//! Stitch patterns that ship with Knitwright.
//!
//! Row text uses full words; the generator abbreviates on request. Users
//! add their own patterns through [`crate::pattern_loader`].

use knitwright_core::domain::{CraftType, DomainError, PatternRow, StitchPattern};

/// Every built-in pattern, ordered by id.
pub fn all_patterns() -> Result<Vec<StitchPattern>, DomainError> {
    Ok(vec![
        eyelet_lace()?,
        feather_and_fan()?,
        rib_2x2()?,
        seed()?,
        v_stitch()?,
    ])
}

fn rows(lines: &[&str]) -> Vec<PatternRow> {
    lines.iter().map(|l| PatternRow::new(*l)).collect()
}

pub fn seed() -> Result<StitchPattern, DomainError> {
    StitchPattern::new(
        "seed",
        "Seed Stitch",
        CraftType::Knitting,
        2,
        vec![PatternRow::new("knit 1, *purl 1, knit 1; repeat from * to end")
            .with_note("Worked over an odd number of stitches, every row is the same")],
    )
    .map(|p| p.with_balance(1))
}

pub fn rib_2x2() -> Result<StitchPattern, DomainError> {
    StitchPattern::new(
        "rib-2x2",
        "2x2 Rib",
        CraftType::Knitting,
        4,
        rows(&[
            "knit 2, *purl 2, knit 2; repeat from * to end",
            "purl 2, *knit 2, purl 2; repeat from * to end",
        ]),
    )
    .map(|p| p.with_balance(2))
}

pub fn eyelet_lace() -> Result<StitchPattern, DomainError> {
    StitchPattern::new(
        "eyelet-lace",
        "Eyelet Lace",
        CraftType::Knitting,
        4,
        rows(&[
            "*knit 2, yarn over, knit 2 together; repeat from * across",
            "purl across",
            "knit across",
            "purl across",
        ]),
    )
}

pub fn feather_and_fan() -> Result<StitchPattern, DomainError> {
    StitchPattern::new(
        "feather-and-fan",
        "Feather and Fan",
        CraftType::Knitting,
        18,
        rows(&[
            "knit across",
            "purl across",
            "*(knit 2 together) 3 times, (yarn over, knit 1) 6 times, (knit 2 together) 3 times; \
             repeat from * across",
            "knit across",
        ]),
    )
}

pub fn v_stitch() -> Result<StitchPattern, DomainError> {
    StitchPattern::new(
        "v-stitch",
        "V-Stitch",
        CraftType::Crochet,
        3,
        vec![
            PatternRow::new(
                "chain 3, skip next stitch, *(double crochet, chain 1, double crochet) in next \
                 stitch, skip next 2 stitches; repeat from * across, double crochet in last \
                 stitch, turn",
            ),
            PatternRow::new(
                "chain 3, (double crochet, chain 1, double crochet) in each chain-1 space across, \
                 double crochet in top of turning chain, turn",
            )
            .with_note("Each V sits in the centre of the V below"),
        ],
    )
    .map(|p| p.with_balance(2))
}
