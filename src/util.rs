use unicode_width::UnicodeWidthStr;

/// `m:ss`, minutes unpadded
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// How many fixed-width columns of `names` fit in `width` cells, given a
/// `gap` between columns. Always at least one.
pub fn grid_columns<S: AsRef<str>>(names: &[S], width: u16, gap: u16) -> (usize, u16) {
    let widest = names
        .iter()
        .map(|n| n.as_ref().width())
        .max()
        .unwrap_or(0)
        .max(1);
    let cell = u16::try_from(widest).unwrap_or(u16::MAX);

    let columns = (width.saturating_add(gap) / cell.saturating_add(gap)).max(1);
    (columns as usize, cell)
}
