use anyhow::{Result, bail};

use crate::core::host::{Rewrite, SourceRange};

/// Apply source rewrites, replacing each range with its replacement text.
///
/// Rewrites may arrive in any order. Ranges must fall on UTF-8 boundaries of
/// `source` and must not overlap.
pub fn apply_rewrites(source: &str, rewrites: &[Rewrite]) -> Result<String> {
    let mut ordered: Vec<&Rewrite> = rewrites.iter().collect();
    ordered.sort_by_key(|r| (r.range.start, r.range.end));

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0usize;
    let mut previous: Option<SourceRange> = None;
    for rewrite in ordered {
        let start = rewrite.range.start as usize;
        let end = rewrite.range.end as usize;
        if previous.is_some_and(|prev| prev.overlaps(&rewrite.range)) {
            bail!(
                "Overlapping rewrite at {} (bytes {}..{})",
                rewrite.loc,
                start,
                end
            );
        }
        let (Some(kept), Some(_)) = (source.get(cursor..start), source.get(start..end)) else {
            bail!(
                "Rewrite at {} is outside the source (bytes {}..{})",
                rewrite.loc,
                start,
                end
            );
        };
        output.push_str(kept);
        output.push_str(&rewrite.replacement);
        cursor = end;
        previous = Some(rewrite.range);
    }
    output.push_str(&source[cursor..]);

    Ok(output)
}
